//! Realtime pipeline error types.

use thiserror::Error;

/// Why an inbound frame was rejected at the normalization boundary.
///
/// Rejected frames are dropped and logged; they never reach subscribers and
/// never crash the pipeline.
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// The frame was not valid JSON or lacked the envelope fields.
    #[error("malformed frame: {0}")]
    Parse(#[from] serde_json::Error),
    /// The envelope parsed but the payload violated the event schema.
    #[error("schema violation: {0}")]
    Schema(String),
}
