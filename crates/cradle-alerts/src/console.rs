//! Console sink implementations.
//!
//! Used by the CLI binary and handy in tests. Sound and haptics become log
//! lines; notices print to stdout so they are visible without a log filter.

use async_trait::async_trait;
use tracing::info;

use crate::sinks::{FeedbackClass, HapticSink, Notice, NoticeSink, PlayProfile, SinkError, SoundSink};

/// Logs sound playback instead of playing it.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleSound;

#[async_trait]
impl SoundSink for ConsoleSound {
    async fn play(&self, sound: &str, profile: PlayProfile) -> Result<(), SinkError> {
        info!(
            sound,
            volume = profile.volume,
            stop_after_ms = u64::try_from(profile.stop_after.as_millis()).unwrap_or(u64::MAX),
            "playing sound"
        );
        Ok(())
    }
}

/// Logs haptic pulses.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleHaptics;

#[async_trait]
impl HapticSink for ConsoleHaptics {
    async fn pulse(&self, class: FeedbackClass) -> Result<(), SinkError> {
        info!(?class, "haptic pulse");
        Ok(())
    }
}

/// Prints notices to stdout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleNotices;

#[async_trait]
impl NoticeSink for ConsoleNotices {
    async fn show(&self, notice: Notice) -> Result<(), SinkError> {
        let marker = if notice.blocking { "!!" } else { "--" };
        println!("{marker} {}: {}", notice.title, notice.message);
        Ok(())
    }
}
