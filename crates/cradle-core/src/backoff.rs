//! Reconnect backoff math.
//!
//! The transport reconnects with a linear backoff: the n-th attempt waits
//! `n * base_delay`. The async scheduling lives in `cradle-realtime`; this
//! module holds the portable, sync-only pieces.

use std::time::Duration;

/// Default maximum number of automatic reconnect attempts.
pub const DEFAULT_RECONNECT_ATTEMPTS: u32 = 5;
/// Default base delay between reconnect attempts in milliseconds.
pub const DEFAULT_RECONNECT_BASE_DELAY_MS: u64 = 1000;
/// Maximum number of alerts retained in history, newest first.
pub const ALERT_HISTORY_LIMIT: usize = 50;

/// Delay before the given reconnect attempt (1-based).
///
/// Linear backoff: `attempt * base_delay`. With the defaults the five
/// attempts wait 1 s, 2 s, 3 s, 4 s, and 5 s.
#[must_use]
pub fn reconnect_delay(attempt: u32, base_delay_ms: u64) -> Duration {
    Duration::from_millis(u64::from(attempt).saturating_mul(base_delay_ms))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
