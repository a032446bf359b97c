//! Event vocabulary: canonical dispatch names, wire frames, and the
//! normalized message record.
//!
//! Two layers:
//!
//! - **[`WireMessage`]**: the raw inbound frame as the server encodes it.
//!   Event naming varies across server versions (`CRY_DETECTED`,
//!   `crying_alert`, ...) and the payload is an untyped JSON value.
//! - **[`NormalizedMessage`]**: the canonical internal record after the
//!   normalization boundary — canonical event name, validated
//!   [`HealthReading`], and an optional [`AlertPayload`].
//!
//! A message carries an alert message and a severity together or not at
//! all; that invariant is structural here — a normalized message holds
//! `Option<AlertPayload>` and the payload owns both fields.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::severity::Severity;

// ─────────────────────────────────────────────────────────────────────────────
// CanonicalEvent — dispatch names
// ─────────────────────────────────────────────────────────────────────────────

/// Canonical event name used for dispatch, independent of the server's wire
/// vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CanonicalEvent {
    /// Generic sensor update; every sensor-bearing message is also
    /// re-broadcast under this name.
    HealthUpdate,
    /// Cry detection fired.
    CryingAlert,
    /// Temperature crossed the fever threshold.
    FeverAlert,
    /// Server-side critical condition.
    CriticalAlert,
    /// Sickness detection fired.
    SicknessAlert,
    /// Client-generated connection lifecycle event.
    Connection,
    /// Client-generated transport error event.
    Error,
    /// Unknown identifier, carried lowercased.
    Other(String),
}

impl CanonicalEvent {
    /// Map a wire identifier to its canonical name.
    ///
    /// Already-canonical names pass through unchanged; known server
    /// identifiers map via a static table; anything else falls back to the
    /// lowercased raw identifier.
    #[must_use]
    pub fn from_wire(raw: &str) -> Self {
        match raw {
            "health_update" | "HEALTH_UPDATE" => Self::HealthUpdate,
            "crying_alert" | "CRY_DETECTED" => Self::CryingAlert,
            "fever_alert" | "FEVER_ALERT" => Self::FeverAlert,
            "critical_alert" | "CRITICAL_ALERT" => Self::CriticalAlert,
            "sickness_alert" | "SICK_DETECTED" => Self::SicknessAlert,
            "connection" => Self::Connection,
            "error" => Self::Error,
            other => Self::Other(other.to_lowercase()),
        }
    }

    /// The canonical dispatch name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::HealthUpdate => "health_update",
            Self::CryingAlert => "crying_alert",
            Self::FeverAlert => "fever_alert",
            Self::CriticalAlert => "critical_alert",
            Self::SicknessAlert => "sickness_alert",
            Self::Connection => "connection",
            Self::Error => "error",
            Self::Other(name) => name,
        }
    }
}

impl std::fmt::Display for CanonicalEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for CanonicalEvent {
    fn from(raw: String) -> Self {
        Self::from_wire(&raw)
    }
}

impl From<CanonicalEvent> for String {
    fn from(event: CanonicalEvent) -> Self {
        event.as_str().to_owned()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire frame
// ─────────────────────────────────────────────────────────────────────────────

/// Raw inbound frame as parsed from a WebSocket text message.
///
/// `data` stays untyped here; the normalization boundary validates it into a
/// [`HealthReading`] and fails closed on schema mismatch.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WireMessage {
    /// Server event identifier, canonical or not.
    pub event: String,
    /// Untyped payload.
    #[serde(default)]
    pub data: serde_json::Value,
    /// Human-readable alert message, present only on alert-bearing events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alert: Option<String>,
    /// Alert severity, present only on alert-bearing events.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,
}

/// Validated sensor payload carried by every sensor-bearing message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HealthReading {
    /// Server-assigned record id.
    pub id: i64,
    /// Ambient temperature in degrees Celsius.
    pub temperature: f64,
    /// Relative humidity in percent.
    pub humidity: f64,
    /// Whether cry detection fired for this reading.
    pub cry_detected: bool,
    /// Whether sickness detection fired for this reading.
    pub sick_detected: bool,
    /// When the reading was recorded.
    pub created_at: DateTime<Utc>,
    /// Optional free-form annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Normalized record
// ─────────────────────────────────────────────────────────────────────────────

/// Alert fields of a normalized message. Both fields travel together; a
/// message never carries one without the other.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AlertPayload {
    /// Human-readable alert message.
    pub message: String,
    /// Severity tier.
    pub severity: Severity,
}

/// Canonical internal form of a server-pushed message.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NormalizedMessage {
    /// Canonical event name.
    pub event: CanonicalEvent,
    /// Validated sensor payload.
    pub data: HealthReading,
    /// Alert message and severity, or absent for plain updates.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alert: Option<AlertPayload>,
}

/// Connection lifecycle state as dispatched on the `connection` channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// The transport holds a live open handle.
    Connected,
    /// No live handle exists.
    Disconnected,
}

impl std::fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Connected => f.write_str("connected"),
            Self::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Payload delivered to dispatcher subscribers.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RealtimeEvent {
    /// A normalized sensor-bearing message.
    Message(NormalizedMessage),
    /// Transport connection state changed.
    Connection {
        /// New connection state.
        status: ConnectionStatus,
    },
    /// Transport-level error.
    Error {
        /// Error description.
        message: String,
    },
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
