//! Upload service response types.

use serde::{Deserialize, Serialize};

/// Pixel dimensions of an uploaded image.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

/// A file stored by the upload service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadedFile {
    /// Stored file name.
    pub name: String,
    /// Public URL of the file.
    pub url: String,
    /// URL of a thumbnail.
    pub thumbnail: String,
    /// Blurhash placeholder.
    pub blurhash: String,
    /// SHA-256 of the stored file, hex.
    pub sha256: String,
    /// Media class reported by the service (`picture`, `video`).
    #[serde(rename = "type")]
    pub media_type: String,
    /// MIME type.
    pub mime: String,
    /// Size in bytes.
    pub size: u64,
    /// Image dimensions, when reported.
    pub dimensions: Option<Dimensions>,
}

/// Envelope returned by the upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct UploadResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Vec<UploadedFile>,
}

impl UploadResponse {
    /// The first file of a successful response.
    pub(crate) fn into_first_file(self) -> Option<UploadedFile> {
        if self.status == "error" {
            return None;
        }
        self.data.into_iter().next()
    }
}
