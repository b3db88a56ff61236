//! Multipart image upload with optional NIP-98 authorization.

use log::{debug, info};
use reqwest::header::AUTHORIZATION;
use reqwest::multipart::{Form, Part};

use super::error::{UploadError, UploadResult};
use super::types::{UploadResponse, UploadedFile};
use crate::nostr::{http_auth_draft, http_auth_header, unix_now, EventSigner};

/// Default upload endpoint.
pub const DEFAULT_UPLOAD_URL: &str = "https://nostr.build/api/v2/upload/files";

/// Multipart field carrying the file.
pub const UPLOAD_FIELD: &str = "fileToUpload";

/// Returns true for `image/*` MIME types.
#[must_use]
pub fn is_image_mime(mime: &str) -> bool {
    mime.trim().to_ascii_lowercase().starts_with("image/")
}

/// Client for the image hosting service.
#[derive(Debug, Clone)]
pub struct ImageUploader {
    client: reqwest::Client,
    upload_url: String,
}

impl Default for ImageUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageUploader {
    /// Creates an uploader for [`DEFAULT_UPLOAD_URL`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_url(DEFAULT_UPLOAD_URL)
    }

    /// Creates an uploader for a custom endpoint.
    #[must_use]
    pub fn with_url(upload_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            upload_url: upload_url.into(),
        }
    }

    /// The endpoint files are posted to.
    #[must_use]
    pub fn upload_url(&self) -> &str {
        &self.upload_url
    }

    /// Uploads one image.
    ///
    /// With a `signer`, a NIP-98 event bound to the endpoint and `POST` is
    /// signed immediately before the request and sent as `Authorization`.
    ///
    /// # Errors
    ///
    /// - [`UploadError::UnsupportedFileType`] for a non-image MIME type,
    ///   before any signing or I/O
    /// - [`UploadError::Auth`] if signing the authorization fails
    /// - [`UploadError::Http`], [`UploadError::Status`] or
    ///   [`UploadError::EmptyResponse`] for transport and service failures
    pub async fn upload(
        &self,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
        signer: Option<&dyn EventSigner>,
    ) -> UploadResult<UploadedFile> {
        if !is_image_mime(mime) {
            return Err(UploadError::UnsupportedFileType(mime.to_string()));
        }

        let part = Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(mime)?;
        let form = Form::new().part(UPLOAD_FIELD, part);

        let mut request = self.client.post(&self.upload_url).multipart(form);
        if let Some(signer) = signer {
            let draft = http_auth_draft(&self.upload_url, "POST", None, unix_now());
            let event = signer.sign_event(draft).await.map_err(UploadError::Auth)?;
            let header = http_auth_header(&event).map_err(UploadError::Auth)?;
            request = request.header(AUTHORIZATION, header);
        }

        debug!("uploading {file_name} ({mime}) to {}", self.upload_url);
        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(UploadError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let body: UploadResponse = response.json().await?;
        if body.status == "error" {
            return Err(UploadError::Status {
                status: status.as_u16(),
                message: body.message,
            });
        }

        let file = body.into_first_file().ok_or(UploadError::EmptyResponse)?;
        info!("uploaded {file_name} to {}", file.url);
        Ok(file)
    }
}
