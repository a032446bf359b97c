//! Settings type definitions.
//!
//! Every field carries a serde default so partial settings files merge
//! cleanly over the compiled defaults.

use cradle_core::{
    HistoryPolicy, ALERT_HISTORY_LIMIT, DEFAULT_RECONNECT_ATTEMPTS,
    DEFAULT_RECONNECT_BASE_DELAY_MS,
};
use serde::{Deserialize, Serialize};

/// Default REST API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.example.com";
/// Default WebSocket endpoint.
pub const DEFAULT_SOCKET_URL: &str = "wss://api.example.com/socket";
/// Default REST request timeout in milliseconds.
pub const DEFAULT_API_TIMEOUT_MS: u64 = 10_000;

/// Root settings object.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CradleSettings {
    /// REST API settings.
    #[serde(default)]
    pub api: ApiSettings,
    /// Realtime socket settings.
    #[serde(default)]
    pub socket: SocketSettings,
    /// Alert engine settings.
    #[serde(default)]
    pub alerts: AlertSettings,
}

/// REST API settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSettings {
    /// Base URL for REST endpoints.
    #[serde(default = "default_api_base_url")]
    pub base_url: String,
    /// Request timeout in milliseconds.
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

/// Realtime socket settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SocketSettings {
    /// WebSocket endpoint; the user id and token are appended at connect.
    #[serde(default = "default_socket_url")]
    pub url: String,
    /// Maximum automatic reconnect attempts after an abnormal close.
    #[serde(default = "default_reconnect_attempts")]
    pub reconnect_attempts: u32,
    /// Base delay for the linear reconnect backoff in milliseconds.
    #[serde(default = "default_reconnect_base_delay_ms")]
    pub reconnect_base_delay_ms: u64,
}

/// Alert engine settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertSettings {
    /// Maximum number of alerts kept in history.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// Which severities the history retains.
    #[serde(default)]
    pub history_policy: HistoryPolicy,
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_owned()
}
fn default_api_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}
fn default_socket_url() -> String {
    DEFAULT_SOCKET_URL.to_owned()
}
fn default_reconnect_attempts() -> u32 {
    DEFAULT_RECONNECT_ATTEMPTS
}
fn default_reconnect_base_delay_ms() -> u64 {
    DEFAULT_RECONNECT_BASE_DELAY_MS
}
fn default_history_limit() -> usize {
    ALERT_HISTORY_LIMIT
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: default_api_base_url(),
            timeout_ms: default_api_timeout_ms(),
        }
    }
}

impl Default for SocketSettings {
    fn default() -> Self {
        Self {
            url: default_socket_url(),
            reconnect_attempts: default_reconnect_attempts(),
            reconnect_base_delay_ms: default_reconnect_base_delay_ms(),
        }
    }
}

impl Default for AlertSettings {
    fn default() -> Self {
        Self {
            history_limit: default_history_limit(),
            history_policy: HistoryPolicy::default(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = CradleSettings::default();
        assert_eq!(settings.api.base_url, "https://api.example.com");
        assert_eq!(settings.api.timeout_ms, 10_000);
        assert_eq!(settings.socket.url, "wss://api.example.com/socket");
        assert_eq!(settings.socket.reconnect_attempts, 5);
        assert_eq!(settings.socket.reconnect_base_delay_ms, 1000);
        assert_eq!(settings.alerts.history_limit, 50);
        assert_eq!(settings.alerts.history_policy, HistoryPolicy::CriticalAndWarning);
    }

    #[test]
    fn empty_json_yields_defaults() {
        let settings: CradleSettings = serde_json::from_str("{}").unwrap();
        assert_eq!(settings.socket.reconnect_attempts, 5);
        assert_eq!(settings.alerts.history_limit, 50);
    }

    #[test]
    fn partial_section_fills_remaining_fields() {
        let settings: CradleSettings =
            serde_json::from_str(r#"{"socket": {"reconnectAttempts": 3}}"#).unwrap();
        assert_eq!(settings.socket.reconnect_attempts, 3);
        assert_eq!(settings.socket.reconnect_base_delay_ms, 1000);
        assert_eq!(settings.socket.url, "wss://api.example.com/socket");
    }

    #[test]
    fn camel_case_field_names() {
        let json = serde_json::to_value(CradleSettings::default()).unwrap();
        assert!(json["socket"].get("reconnectBaseDelayMs").is_some());
        assert!(json["alerts"].get("historyPolicy").is_some());
    }

    #[test]
    fn history_policy_round_trips() {
        let settings: CradleSettings =
            serde_json::from_str(r#"{"alerts": {"historyPolicy": "all"}}"#).unwrap();
        assert_eq!(settings.alerts.history_policy, HistoryPolicy::All);
    }
}
