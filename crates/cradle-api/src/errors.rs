//! API error types.

use cradle_auth::AuthError;
use thiserror::Error;

/// Errors that can occur on REST calls.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Credential lookup failed (typically `Unauthenticated`).
    #[error("auth: {0}")]
    Auth(#[from] AuthError),
    /// Transport-level HTTP failure.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The endpoint rejected the request.
    #[error("endpoint returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        message: String,
    },
}

/// Result type for API operations.
pub type Result<T> = std::result::Result<T, ApiError>;
