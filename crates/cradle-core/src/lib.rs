//! # cradle-core
//!
//! Foundation types for the Cradle baby-health monitor client.
//!
//! This crate provides the shared vocabulary that all other Cradle crates
//! depend on:
//!
//! - **Severity tiers**: `Severity` with per-tier auto-dismiss durations,
//!   `HistoryPolicy` for alert-history retention
//! - **Events**: `CanonicalEvent` dispatch names with the wire-identifier
//!   mapping table, `WireMessage` raw frames, `HealthReading` validated
//!   sensor payloads, `NormalizedMessage` / `AlertPayload` canonical records
//! - **Backoff**: linear reconnect delay math and the default reconnect limits

#![deny(unsafe_code)]

pub mod backoff;
pub mod events;
pub mod severity;

pub use backoff::{
    reconnect_delay, ALERT_HISTORY_LIMIT, DEFAULT_RECONNECT_ATTEMPTS,
    DEFAULT_RECONNECT_BASE_DELAY_MS,
};
pub use events::{
    AlertPayload, CanonicalEvent, ConnectionStatus, HealthReading, NormalizedMessage,
    RealtimeEvent, WireMessage,
};
pub use severity::{HistoryPolicy, Severity};
