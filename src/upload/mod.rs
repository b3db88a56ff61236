//! Image upload to the marketplace's media host.
//!
//! Listing images are posted as multipart form data. When the user is signed
//! in, each request carries a NIP-98 `Authorization` header signed through
//! the same [`EventSigner`](crate::nostr::EventSigner) used for events.

mod client;
mod error;
mod types;

pub use client::{is_image_mime, ImageUploader, DEFAULT_UPLOAD_URL, UPLOAD_FIELD};
pub use error::{UploadError, UploadResult};
pub use types::{Dimensions, UploadedFile};
