//! Error types for the listing backend client.

use thiserror::Error;

/// Errors from the backend signing endpoint.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The request could not be sent or its response not read.
    #[error("Backend request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("Backend returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The backend answered without a usable event id.
    #[error("Invalid backend response: {0}")]
    InvalidResponse(String),
}

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;
