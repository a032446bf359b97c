//! Alert severity tiers and history retention policy.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Auto-dismiss delay for critical alerts in milliseconds.
pub const CRITICAL_DISMISS_MS: u64 = 10_000;
/// Auto-dismiss delay for warning alerts in milliseconds.
pub const WARNING_DISMISS_MS: u64 = 7_000;
/// Auto-dismiss delay for info alerts in milliseconds.
pub const INFO_DISMISS_MS: u64 = 5_000;

/// Severity tier of a server-pushed alert.
///
/// Ordered by urgency: `Info < Warning < Critical`. The tier determines the
/// side-effect intensity (sound, haptics, modal) and whether the alert is
/// retained in history.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational notice; no sound, lightweight feedback.
    Info,
    /// Needs attention soon; soft alarm and dismissable modal.
    Warning,
    /// Needs immediate attention; loud alarm and blocking modal.
    Critical,
}

impl Severity {
    /// How long an alert of this severity stays live before auto-dismissing,
    /// measured from alert creation.
    #[must_use]
    pub fn dismiss_after(self) -> Duration {
        let ms = match self {
            Self::Critical => CRITICAL_DISMISS_MS,
            Self::Warning => WARNING_DISMISS_MS,
            Self::Info => INFO_DISMISS_MS,
        };
        Duration::from_millis(ms)
    }

    /// Lowercase wire name of the tier.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Warning => "warning",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which severities the alert history retains.
///
/// The default keeps only critical and warning alerts; info alerts fire their
/// side effects but leave no history entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum HistoryPolicy {
    /// Retain critical and warning alerts only.
    #[default]
    CriticalAndWarning,
    /// Retain every severity, info included.
    All,
}

impl HistoryPolicy {
    /// Whether an alert of the given severity is recorded in history.
    #[must_use]
    pub fn admits(self, severity: Severity) -> bool {
        match self {
            Self::All => true,
            Self::CriticalAndWarning => severity >= Severity::Warning,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
