//! Alert lifecycle state machine.
//!
//! One logical "current alert" slot plus a bounded newest-first history:
//!
//! - A normalized message **without** an alert payload resolves the slot
//!   (situation back to normal).
//! - A message **with** an alert payload unconditionally supersedes the slot
//!   — there is no severity-based suppression — and fires the severity
//!   side-effect routine every time.
//! - Each alert schedules its own auto-dismiss timer. The timer compares the
//!   alert's process-monotonic sequence number against the slot at fire
//!   time, so a stale timer for a superseded alert is a no-op; timers are
//!   never cancelled, only their effect is suppressed.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use cradle_core::{
    CanonicalEvent, HealthReading, HistoryPolicy, NormalizedMessage, RealtimeEvent, Severity,
    ALERT_HISTORY_LIMIT,
};
use cradle_realtime::{Dispatcher, Subscription};
use parking_lot::Mutex;
use tracing::debug;

use crate::effects::run_effects;
use crate::sinks::Sinks;

/// A live or historical alert.
#[derive(Clone, Debug, PartialEq)]
pub struct Alert {
    /// Process-monotonic identity; auto-dismiss timers compare this.
    pub seq: u64,
    /// Canonical event that raised the alert.
    pub event: CanonicalEvent,
    /// Human-readable alert message.
    pub message: String,
    /// Severity tier.
    pub severity: Severity,
    /// When the alert was raised.
    pub timestamp: DateTime<Utc>,
    /// The sensor reading that accompanied the alert.
    pub data: HealthReading,
}

/// Engine configuration.
#[derive(Clone, Copy, Debug)]
pub struct AlertConfig {
    /// Maximum history entries, newest first.
    pub history_limit: usize,
    /// Which severities the history retains.
    pub history_policy: HistoryPolicy,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            history_limit: ALERT_HISTORY_LIMIT,
            history_policy: HistoryPolicy::default(),
        }
    }
}

#[derive(Default)]
struct Slot {
    current: Option<Alert>,
    history: VecDeque<Alert>,
}

/// Consumes normalized messages and maintains alert state.
pub struct AlertEngine {
    sinks: Sinks,
    config: AlertConfig,
    seq: AtomicU64,
    slot: Arc<Mutex<Slot>>,
}

impl AlertEngine {
    /// Create an engine over the given sinks.
    #[must_use]
    pub fn new(sinks: Sinks, config: AlertConfig) -> Self {
        Self {
            sinks,
            config,
            seq: AtomicU64::new(0),
            slot: Arc::new(Mutex::new(Slot::default())),
        }
    }

    /// Subscribe the engine to the generic `health_update` channel.
    ///
    /// Every sensor-bearing message is re-broadcast there, so a single
    /// registration sees each message exactly once — alert events included.
    pub fn attach(engine: &Arc<Self>, dispatcher: &Dispatcher) -> Subscription {
        let engine = Arc::clone(engine);
        dispatcher.on(CanonicalEvent::HealthUpdate.as_str(), move |event| {
            engine.handle_event(event);
        })
    }

    /// Dispatcher entry point; connection and error events are not alerts.
    pub fn handle_event(&self, event: &RealtimeEvent) {
        if let RealtimeEvent::Message(message) = event {
            self.handle_message(message);
        }
    }

    /// Feed one normalized message through the state machine.
    ///
    /// Must be called within a tokio runtime: side effects and the
    /// auto-dismiss timer run as spawned tasks.
    pub fn handle_message(&self, message: &NormalizedMessage) {
        let Some(payload) = &message.alert else {
            // A plain health update means the situation resolved.
            let mut slot = self.slot.lock();
            if slot.current.take().is_some() {
                debug!("health update resolved the active alert");
            }
            return;
        };

        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let alert = Alert {
            seq,
            event: message.event.clone(),
            message: payload.message.clone(),
            severity: payload.severity,
            timestamp: Utc::now(),
            data: message.data.clone(),
        };
        debug!(seq, severity = %alert.severity, "alert raised");

        {
            let mut slot = self.slot.lock();
            slot.current = Some(alert.clone());
            if self.config.history_policy.admits(alert.severity) {
                slot.history.push_front(alert.clone());
                slot.history.truncate(self.config.history_limit);
            }
        }

        let _ = tokio::spawn(run_effects(
            self.sinks.clone(),
            alert.severity,
            alert.message.clone(),
        ));

        let slot = Arc::clone(&self.slot);
        let delay = alert.severity.dismiss_after();
        let _ = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let mut slot = slot.lock();
            if slot.current.as_ref().is_some_and(|current| current.seq == seq) {
                slot.current = None;
                debug!(seq, "alert auto-dismissed");
            }
        });
    }

    /// Explicitly clear the current alert.
    pub fn dismiss(&self) {
        if self.slot.lock().current.take().is_some() {
            debug!("alert dismissed");
        }
    }

    /// The live alert, if any.
    #[must_use]
    pub fn current_alert(&self) -> Option<Alert> {
        self.slot.lock().current.clone()
    }

    /// Snapshot of the alert history, newest first.
    #[must_use]
    pub fn history(&self) -> Vec<Alert> {
        self.slot.lock().history.iter().cloned().collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sinks::{
        FeedbackClass, HapticSink, Notice, NoticeSink, PlayProfile, SinkError, SoundSink,
    };
    use async_trait::async_trait;
    use cradle_core::AlertPayload;
    use std::time::Duration;

    /// Records every sink invocation as a string, optionally failing sound.
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
        fail_sound: bool,
    }

    impl Recorder {
        fn failing_sound() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                fail_sound: true,
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    #[async_trait]
    impl SoundSink for Recorder {
        async fn play(&self, sound: &str, profile: PlayProfile) -> Result<(), SinkError> {
            if self.fail_sound {
                return Err(SinkError::Sound("no audio device".into()));
            }
            self.calls.lock().push(format!(
                "sound:{sound}:{:.1}:{}",
                profile.volume,
                profile.stop_after.as_millis()
            ));
            Ok(())
        }
    }

    #[async_trait]
    impl HapticSink for Recorder {
        async fn pulse(&self, class: FeedbackClass) -> Result<(), SinkError> {
            self.calls.lock().push(format!("haptic:{class:?}"));
            Ok(())
        }
    }

    #[async_trait]
    impl NoticeSink for Recorder {
        async fn show(&self, notice: Notice) -> Result<(), SinkError> {
            let kind = if notice.blocking { "blocking" } else { "dismissable" };
            self.calls.lock().push(format!("notice:{kind}"));
            Ok(())
        }
    }

    fn recording_engine(config: AlertConfig) -> (Arc<Recorder>, Arc<AlertEngine>) {
        let recorder = Arc::new(Recorder::default());
        let sinks = Sinks {
            sound: Arc::clone(&recorder) as _,
            haptics: Arc::clone(&recorder) as _,
            notices: Arc::clone(&recorder) as _,
        };
        (recorder, Arc::new(AlertEngine::new(sinks, config)))
    }

    fn reading(id: i64) -> HealthReading {
        HealthReading {
            id,
            temperature: 36.8,
            humidity: 55.0,
            cry_detected: false,
            sick_detected: false,
            created_at: "2026-08-07T10:00:00Z".parse().unwrap(),
            notes: None,
        }
    }

    fn alert_message(text: &str, severity: Severity) -> NormalizedMessage {
        NormalizedMessage {
            event: CanonicalEvent::CryingAlert,
            data: reading(1),
            alert: Some(AlertPayload {
                message: text.into(),
                severity,
            }),
        }
    }

    fn plain_message() -> NormalizedMessage {
        NormalizedMessage {
            event: CanonicalEvent::HealthUpdate,
            data: reading(2),
            alert: None,
        }
    }

    // -- slot and history --

    #[tokio::test(start_paused = true)]
    async fn alert_becomes_current_and_recorded() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("crying", Severity::Warning));

        let current = engine.current_alert().unwrap();
        assert_eq!(current.message, "crying");
        assert_eq!(current.severity, Severity::Warning);
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn info_alerts_leave_no_history() {
        let (_, engine) = recording_engine(AlertConfig::default());
        for _ in 0..10 {
            engine.handle_message(&alert_message("fyi", Severity::Info));
        }
        assert!(engine.current_alert().is_some());
        assert!(engine.history().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn critical_and_warning_both_recorded() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        engine.handle_message(&alert_message("crying", Severity::Warning));

        let history = engine.history();
        assert_eq!(history.len(), 2);
        // Newest first
        assert_eq!(history[0].message, "crying");
        assert_eq!(history[1].message, "fever");
    }

    #[tokio::test(start_paused = true)]
    async fn all_policy_records_info() {
        let (_, engine) = recording_engine(AlertConfig {
            history_limit: 50,
            history_policy: HistoryPolicy::All,
        });
        engine.handle_message(&alert_message("fyi", Severity::Info));
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn history_is_bounded() {
        let (_, engine) = recording_engine(AlertConfig {
            history_limit: 3,
            history_policy: HistoryPolicy::default(),
        });
        for i in 0..5 {
            engine.handle_message(&alert_message(&format!("alert {i}"), Severity::Warning));
        }
        let history = engine.history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].message, "alert 4");
        assert_eq!(history[2].message, "alert 2");
    }

    #[tokio::test(start_paused = true)]
    async fn plain_update_resolves_current_but_keeps_history() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        assert!(engine.current_alert().is_some());

        engine.handle_message(&plain_message());
        assert!(engine.current_alert().is_none());
        assert_eq!(engine.history().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn explicit_dismiss_clears_current() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        engine.dismiss();
        assert!(engine.current_alert().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn lower_severity_still_supersedes() {
        let (recorder, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        engine.handle_message(&alert_message("fyi", Severity::Info));

        let current = engine.current_alert().unwrap();
        assert_eq!(current.severity, Severity::Info);

        // Every qualifying message fires a fresh side-effect invocation.
        tokio::time::sleep(Duration::from_secs(2)).await;
        let notices = recorder
            .calls()
            .iter()
            .filter(|c| c.starts_with("notice:"))
            .count();
        assert_eq!(notices, 2);
    }

    // -- auto-dismiss timers --

    #[tokio::test(start_paused = true)]
    async fn warning_auto_dismisses_after_seven_seconds() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("crying", Severity::Warning));

        tokio::time::sleep(Duration::from_millis(6900)).await;
        assert!(engine.current_alert().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(engine.current_alert().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn critical_auto_dismisses_after_ten_seconds() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));

        tokio::time::sleep(Duration::from_millis(9900)).await;
        assert!(engine.current_alert().is_some());

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(engine.current_alert().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn stale_timer_does_not_clear_newer_alert() {
        let (_, engine) = recording_engine(AlertConfig::default());

        // A at t=0 (critical, dismisses at t=10s)
        engine.handle_message(&alert_message("A", Severity::Critical));

        // B at t=5s (warning, dismisses at t=12s)
        tokio::time::sleep(Duration::from_secs(5)).await;
        engine.handle_message(&alert_message("B", Severity::Warning));

        // t=10.1s: A's timer has fired but B must remain current, unchanged.
        tokio::time::sleep(Duration::from_millis(5100)).await;
        let current = engine.current_alert().expect("B still current");
        assert_eq!(current.message, "B");

        // t=12.1s: B's own timer clears it.
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert!(engine.current_alert().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn history_survives_auto_dismiss() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("crying", Severity::Warning));
        tokio::time::sleep(Duration::from_secs(8)).await;
        assert!(engine.current_alert().is_none());
        assert_eq!(engine.history().len(), 1);
    }

    // -- side effects --

    #[tokio::test(start_paused = true)]
    async fn critical_effect_sequence() {
        let (recorder, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        tokio::time::sleep(Duration::from_secs(2)).await;

        let calls = recorder.calls();
        assert_eq!(
            calls,
            vec![
                "sound:alarm:1.0:5000",
                "haptic:Error",
                "haptic:Error",
                "haptic:Error",
                "notice:blocking",
            ]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn warning_effect_sequence() {
        let (recorder, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("crying", Severity::Warning));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let calls = recorder.calls();
        assert_eq!(
            calls,
            vec!["sound:alarm:0.6:3000", "haptic:Warning", "notice:dismissable"]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn info_effects_have_no_sound() {
        let (recorder, engine) = recording_engine(AlertConfig::default());
        engine.handle_message(&alert_message("fyi", Severity::Info));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let calls = recorder.calls();
        assert_eq!(calls, vec!["haptic:Success", "notice:dismissable"]);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_alarm_does_not_suppress_the_modal() {
        let recorder = Arc::new(Recorder::failing_sound());
        let sinks = Sinks {
            sound: Arc::clone(&recorder) as _,
            haptics: Arc::clone(&recorder) as _,
            notices: Arc::clone(&recorder) as _,
        };
        let engine = AlertEngine::new(sinks, AlertConfig::default());
        engine.handle_message(&alert_message("fever", Severity::Critical));
        tokio::time::sleep(Duration::from_secs(2)).await;

        let calls = recorder.calls();
        assert!(calls.contains(&"notice:blocking".to_owned()));
        assert_eq!(calls.iter().filter(|c| c.starts_with("haptic:")).count(), 3);
    }

    // -- dispatcher wiring --

    #[tokio::test(start_paused = true)]
    async fn attached_engine_handles_each_message_once() {
        let dispatcher = Arc::new(Dispatcher::new());
        let (recorder, engine) = recording_engine(AlertConfig::default());
        let _sub = AlertEngine::attach(&engine, &dispatcher);

        // The transport emits an alert message on its canonical channel and
        // re-broadcasts it on health_update; the engine listens only on the
        // generic channel, so it handles the message exactly once.
        let message = alert_message("crying", Severity::Warning);
        let payload = RealtimeEvent::Message(message);
        dispatcher.emit("crying_alert", &payload);
        dispatcher.emit("health_update", &payload);

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(engine.history().len(), 1);
        let notices = recorder
            .calls()
            .iter()
            .filter(|c| c.starts_with("notice:"))
            .count();
        assert_eq!(notices, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn connection_events_are_ignored() {
        let (_, engine) = recording_engine(AlertConfig::default());
        engine.handle_event(&RealtimeEvent::Connection {
            status: cradle_core::ConnectionStatus::Disconnected,
        });
        engine.handle_event(&RealtimeEvent::Error {
            message: "transport".into(),
        });
        assert!(engine.current_alert().is_none());
        assert!(engine.history().is_empty());
    }
}
