//! # cradle-alerts
//!
//! The alert lifecycle engine of the Cradle monitor:
//!
//! - **[`AlertEngine`]**: consumes normalized alert-bearing messages,
//!   maintains the current-alert slot and bounded history, and drives
//!   per-alert auto-dismiss timers keyed on alert identity
//! - **Side-effect sinks**: [`SoundSink`], [`HapticSink`], [`NoticeSink`] —
//!   opaque async seams the severity routine fires into; failures are caught
//!   and logged, never propagated
//! - **Console sinks**: log/stdout implementations for the CLI and tests

#![deny(unsafe_code)]

pub mod console;
mod effects;
pub mod engine;
pub mod sinks;

pub use console::{ConsoleHaptics, ConsoleNotices, ConsoleSound};
pub use engine::{Alert, AlertConfig, AlertEngine};
pub use sinks::{FeedbackClass, HapticSink, Notice, NoticeSink, PlayProfile, SinkError, Sinks, SoundSink};
