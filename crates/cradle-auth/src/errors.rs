//! Auth error types.

use thiserror::Error;

/// Errors that can occur during authentication.
#[derive(Debug, Error)]
pub enum AuthError {
    /// No credential is available; callers skip the operation.
    #[error("not authenticated")]
    Unauthenticated,
    /// Transport-level HTTP failure.
    #[error("auth request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The auth endpoint rejected the request.
    #[error("auth endpoint returned {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, best effort.
        message: String,
    },
    /// Token storage I/O failure.
    #[error("token storage: {0}")]
    Io(#[from] std::io::Error),
    /// Token storage serialization failure.
    #[error("token storage: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for auth operations.
pub type Result<T> = std::result::Result<T, AuthError>;
