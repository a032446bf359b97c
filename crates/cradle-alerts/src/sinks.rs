//! Side-effect sink seams.
//!
//! The engine treats sound, haptics, and user-facing notices as opaque
//! asynchronous sinks. Implementations live at the application edge (mobile
//! bindings, console output, test recorders); the engine only knows the
//! traits. Sink failures are caught at the call site and logged — a failed
//! alarm must never prevent the modal from appearing.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

/// A sink backend failure. Opaque to the engine; only ever logged.
#[derive(Debug, Error)]
pub enum SinkError {
    /// Sound playback failed.
    #[error("sound backend: {0}")]
    Sound(String),
    /// Haptic trigger failed.
    #[error("haptic backend: {0}")]
    Haptic(String),
    /// Notice display failed.
    #[error("notice backend: {0}")]
    Notice(String),
}

/// Playback parameters for one sound invocation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayProfile {
    /// Volume in `[0.0, 1.0]`.
    pub volume: f64,
    /// Whether playback loops until stopped.
    pub looping: bool,
    /// Auto-stop playback after this long.
    pub stop_after: Duration,
}

/// Haptic feedback classes, mirroring platform notification feedback types.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeedbackClass {
    /// Error-class pulse (strongest).
    Error,
    /// Warning-class pulse.
    Warning,
    /// Success-class pulse (lightest).
    Success,
}

/// A user-facing notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Short title line.
    pub title: String,
    /// Body message.
    pub message: String,
    /// Blocking notices cannot be dismissed by tapping the backdrop; they
    /// carry a single acknowledgement action.
    pub blocking: bool,
}

/// Plays a sound by identifier with the given profile.
#[async_trait]
pub trait SoundSink: Send + Sync {
    /// Start playback; the implementation owns the auto-stop timer.
    async fn play(&self, sound: &str, profile: PlayProfile) -> Result<(), SinkError>;
}

/// Triggers a haptic pulse of a given feedback class.
#[async_trait]
pub trait HapticSink: Send + Sync {
    /// Fire one pulse.
    async fn pulse(&self, class: FeedbackClass) -> Result<(), SinkError>;
}

/// Shows a user-facing notice.
#[async_trait]
pub trait NoticeSink: Send + Sync {
    /// Display the notice.
    async fn show(&self, notice: Notice) -> Result<(), SinkError>;
}

/// The three sinks the severity routine fires into.
#[derive(Clone)]
pub struct Sinks {
    /// Sound playback.
    pub sound: Arc<dyn SoundSink>,
    /// Haptic feedback.
    pub haptics: Arc<dyn HapticSink>,
    /// User-facing notices.
    pub notices: Arc<dyn NoticeSink>,
}
