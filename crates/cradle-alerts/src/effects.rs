//! Severity-tiered side-effect routine.
//!
//! One invocation per qualifying alert, fire-and-forget relative to the
//! engine's state machine. Every sink call is individually caught and
//! logged; a failure never suppresses the remaining steps.
//!
//! | severity | sound                          | haptics                   | notice            |
//! |----------|--------------------------------|---------------------------|-------------------|
//! | critical | alarm, vol 1.0, auto-stop 5 s  | 3 error pulses, 500 ms apart | blocking modal |
//! | warning  | alarm, vol 0.6, auto-stop 3 s  | 1 warning pulse           | dismissable modal |
//! | info     | none                           | 1 success pulse           | lightweight       |

use std::time::Duration;

use cradle_core::Severity;
use tracing::warn;

use crate::sinks::{FeedbackClass, Notice, PlayProfile, Sinks};

/// Sound identifier used for alert alarms.
const ALARM_SOUND: &str = "alarm";

/// Gap between the repeated critical haptic pulses.
const CRITICAL_PULSE_GAP: Duration = Duration::from_millis(500);

/// Run the full side-effect routine for one alert.
pub(crate) async fn run_effects(sinks: Sinks, severity: Severity, message: String) {
    match severity {
        Severity::Critical => {
            play_sound(
                &sinks,
                PlayProfile {
                    volume: 1.0,
                    looping: false,
                    stop_after: Duration::from_millis(5000),
                },
            )
            .await;
            for i in 0..3 {
                pulse(&sinks, FeedbackClass::Error).await;
                if i < 2 {
                    tokio::time::sleep(CRITICAL_PULSE_GAP).await;
                }
            }
            show(
                &sinks,
                Notice {
                    title: "EMERGENCY ALERT".into(),
                    message,
                    blocking: true,
                },
            )
            .await;
        }
        Severity::Warning => {
            play_sound(
                &sinks,
                PlayProfile {
                    volume: 0.6,
                    looping: false,
                    stop_after: Duration::from_millis(3000),
                },
            )
            .await;
            pulse(&sinks, FeedbackClass::Warning).await;
            show(
                &sinks,
                Notice {
                    title: "Warning".into(),
                    message,
                    blocking: false,
                },
            )
            .await;
        }
        Severity::Info => {
            pulse(&sinks, FeedbackClass::Success).await;
            show(
                &sinks,
                Notice {
                    title: "Notice".into(),
                    message,
                    blocking: false,
                },
            )
            .await;
        }
    }
}

async fn play_sound(sinks: &Sinks, profile: PlayProfile) {
    if let Err(e) = sinks.sound.play(ALARM_SOUND, profile).await {
        warn!(error = %e, "failed to play alarm");
    }
}

async fn pulse(sinks: &Sinks, class: FeedbackClass) {
    if let Err(e) = sinks.haptics.pulse(class).await {
        warn!(error = %e, "failed to trigger haptic pulse");
    }
}

async fn show(sinks: &Sinks, notice: Notice) {
    if let Err(e) = sinks.notices.show(notice).await {
        warn!(error = %e, "failed to show notice");
    }
}
