//! # cradle-realtime
//!
//! The real-time update pipeline of the Cradle monitor:
//!
//! - **[`SocketClient`]**: one full-duplex WebSocket connection with
//!   automatic linear-backoff reconnect and connection-state events
//! - **[`normalize`]**: raw wire frames → canonical [`NormalizedMessage`]
//!   records, failing closed on schema mismatch
//! - **[`Dispatcher`]**: event-name → subscriber fan-out with
//!   snapshot-then-iterate delivery and per-callback panic isolation
//!
//! Nothing in this crate throws upward into consumer code: failures become
//! dispatched `connection`/`error` events or log lines.
//!
//! [`NormalizedMessage`]: cradle_core::NormalizedMessage

#![deny(unsafe_code)]

pub mod dispatch;
pub mod errors;
pub mod normalize;
pub mod socket;

pub use dispatch::{Dispatcher, Subscription};
pub use errors::NormalizeError;
pub use normalize::{normalize, normalize_wire};
pub use socket::{SocketClient, SocketConfig};
