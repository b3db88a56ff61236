//! Error types for image upload.

use thiserror::Error;

use crate::nostr::NostrError;

/// Errors that can occur while uploading an image.
#[derive(Debug, Error)]
pub enum UploadError {
    /// The file is not an image. Nothing was sent.
    #[error("Only images are supported, got {0}")]
    UnsupportedFileType(String),

    /// The request could not be sent or its response not read.
    #[error("Upload request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upload service answered with a non-success status.
    #[error("Upload service returned {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body or service message.
        message: String,
    },

    /// The upload service reported success but returned no file.
    #[error("Upload service returned no file")]
    EmptyResponse,

    /// Signing the HTTP auth event failed.
    #[error("Failed to sign upload authorization: {0}")]
    Auth(#[source] NostrError),
}

/// Result type for upload operations.
pub type UploadResult<T> = Result<T, UploadError>;
