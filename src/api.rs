//! Operation facade for the marketplace application.
//!
//! Every operation takes the [`ClientConfig`] snapshot and the signer by
//! reference and runs build → sign → publish strictly in order. Signing of a
//! multi-event operation completes before the first publish starts, so a
//! failed build or signature never leaves anything half-published.

use std::sync::Arc;

use log::{debug, warn};
use thiserror::Error;

use crate::backend::{BackendError, ListingBackend};
use crate::config::{ClientConfig, ConfigError, SignInMode};
use crate::nostr::{
    deletion_draft, direct_message_draft, ensure_mode, handler_information_draft,
    handler_recommendation_draft, listing_draft, npub_to_hex, parse_pubkey_hex, unix_now,
    validate_npub, DelegatedSigner, EventDraft, EventSigner, LocalKeySigner, NostrError,
    SignedEvent, SigningCapability,
};
use crate::relay::{NostrSdkTransport, PublishReceipt, RelayError, RelayPublisher, RelayTransport};
use crate::upload::{ImageUploader, UploadError, UploadedFile};

/// Errors surfaced by facade operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Key, signing, encryption or event error.
    #[error(transparent)]
    Nostr(#[from] NostrError),

    /// Relay publishing error.
    #[error(transparent)]
    Relay(#[from] RelayError),

    /// Image upload error.
    #[error(transparent)]
    Upload(#[from] UploadError),

    /// Configuration error.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Backend signing endpoint error.
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Result type for facade operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Builds the signer for the configured sign-in mode.
///
/// # Errors
///
/// - [`ConfigError::NotSignedIn`] when no sign-in mode is configured
/// - [`NostrError::ExternalCapabilityUnavailable`] in delegated mode without
///   a capability
/// - [`ConfigError::MissingEncryptedKey`] in local-key mode without a stored
///   key
pub fn signer_for_mode(
    config: &ClientConfig,
    capability: Option<Arc<dyn SigningCapability>>,
    passphrase: Option<&str>,
) -> CoreResult<Box<dyn EventSigner>> {
    match config.require_sign_in()? {
        SignInMode::Delegated => Ok(Box::new(DelegatedSigner::new(capability)?)),
        SignInMode::LocalKey => {
            let blob = config
                .encrypted_private_key
                .as_deref()
                .ok_or(ConfigError::MissingEncryptedKey)?;
            Ok(Box::new(LocalKeySigner::new(blob, passphrase)))
        }
    }
}

/// Accepts a recipient as `npub` or hex and returns the hex public key.
///
/// # Errors
///
/// Returns [`NostrError::InvalidEncoding`] for a malformed key.
pub fn resolve_pubkey(recipient: &str) -> CoreResult<String> {
    if validate_npub(recipient) {
        return Ok(npub_to_hex(recipient)?);
    }
    Ok(parse_pubkey_hex(recipient)?.to_hex())
}

/// A signed event together with its publish receipt.
#[derive(Debug, Clone)]
pub struct SentEvent {
    /// The event as published.
    pub event: SignedEvent,
    /// Where it landed.
    pub receipt: PublishReceipt,
}

/// Result of posting a listing.
#[derive(Debug, Clone)]
pub enum PostedListing {
    /// Signed here and published to the relay set.
    Published {
        /// The listing.
        listing: SentEvent,
        /// Handler recommendation and information, when the listing has a
        /// `d` tag.
        handlers: Vec<SentEvent>,
    },
    /// Signed and published by the backend.
    ViaBackend {
        /// Event id reported by the backend.
        id: String,
        /// Author public key, hex.
        pubkey: String,
        /// The listing as sent.
        draft: EventDraft,
    },
}

impl PostedListing {
    /// The listing's event id.
    #[must_use]
    pub fn event_id(&self) -> &str {
        match self {
            Self::Published { listing, .. } => &listing.event.id,
            Self::ViaBackend { id, .. } => id,
        }
    }
}

/// Entry point for marketplace operations.
///
/// Holds the long-lived collaborators (publisher, uploader and optional
/// backend). Per-user state comes in with every call.
#[derive(Debug)]
pub struct ShopstrCore<T: RelayTransport = NostrSdkTransport> {
    publisher: RelayPublisher<T>,
    uploader: ImageUploader,
    backend: Option<ListingBackend>,
}

impl Default for ShopstrCore<NostrSdkTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl ShopstrCore<NostrSdkTransport> {
    /// Creates a core that publishes through `nostr-sdk` and uploads to the
    /// default media host.
    ///
    /// # Examples
    ///
    /// ```
    /// use shopstr_core::ShopstrCore;
    ///
    /// let core = ShopstrCore::new();
    /// assert!(core.backend().is_none());
    /// ```
    #[must_use]
    pub fn new() -> Self {
        Self::with_publisher(RelayPublisher::default())
    }
}

impl<T: RelayTransport> ShopstrCore<T> {
    /// Creates a core around an existing publisher.
    #[must_use]
    pub fn with_publisher(publisher: RelayPublisher<T>) -> Self {
        Self {
            publisher,
            uploader: ImageUploader::new(),
            backend: None,
        }
    }

    /// Replaces the image uploader.
    #[must_use]
    pub fn with_uploader(mut self, uploader: ImageUploader) -> Self {
        self.uploader = uploader;
        self
    }

    /// Routes local-key listings through the backend signing endpoint.
    #[must_use]
    pub fn with_backend(mut self, backend: ListingBackend) -> Self {
        self.backend = Some(backend);
        self
    }

    /// The relay publisher.
    #[must_use]
    pub const fn publisher(&self) -> &RelayPublisher<T> {
        &self.publisher
    }

    /// The configured backend, if any.
    #[must_use]
    pub const fn backend(&self) -> Option<&ListingBackend> {
        self.backend.as_ref()
    }

    /// Posts a listing created now. See [`post_listing_at`](Self::post_listing_at).
    ///
    /// # Errors
    ///
    /// See [`post_listing_at`](Self::post_listing_at).
    pub async fn post_listing(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        values: Vec<Vec<String>>,
    ) -> CoreResult<PostedListing> {
        self.post_listing_at(config, signer, values, unix_now()).await
    }

    /// Posts a listing (kind 30402) with the given creation time.
    ///
    /// In local-key mode with a backend configured, the listing goes to the
    /// backend. Otherwise the listing and, when it has a `d` tag, its handler
    /// recommendation and information events are all signed first and then
    /// published one after another.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer does not match the configuration,
    /// signing fails, or any of the events reaches no relay.
    pub async fn post_listing_at(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        values: Vec<Vec<String>>,
        created_at: i64,
    ) -> CoreResult<PostedListing> {
        check_signer(config, signer)?;
        let draft = listing_draft(values, created_at);

        if let (Some(backend), Some(local)) = (&self.backend, signer.as_local_key()) {
            let keypair = local.unlock()?;
            let pubkey = keypair.pubkey_hex();
            let id = backend.post_event(&keypair, &draft, &config.relays).await?;
            return Ok(PostedListing::ViaBackend { id, pubkey, draft });
        }

        let d_value = draft
            .tag_value("d")
            .filter(|d| !d.is_empty())
            .map(str::to_string);
        let listing = signer.sign_event(draft).await?;

        let mut handler_events = Vec::new();
        match d_value {
            Some(d) => {
                let recommendation = handler_recommendation_draft(&listing.pubkey, &d, created_at);
                let information = handler_information_draft(&d, created_at);
                handler_events.push(signer.sign_event(recommendation).await?);
                handler_events.push(signer.sign_event(information).await?);
            }
            None => warn!("listing {} has no d value, skipping handler events", listing.id),
        }

        let listing = self.publish(config, listing).await?;
        let mut handlers = Vec::with_capacity(handler_events.len());
        for event in handler_events {
            handlers.push(self.publish(config, event).await?);
        }

        Ok(PostedListing::Published { listing, handlers })
    }

    /// Builds and signs an encrypted direct message (kind 4) without
    /// publishing it. `recipient` may be an `npub` or hex.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer does not match the configuration, the
    /// recipient key is malformed, or encryption or signing fails.
    pub async fn build_direct_message(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        recipient: &str,
        message: &str,
    ) -> CoreResult<SignedEvent> {
        check_signer(config, signer)?;
        let recipient = resolve_pubkey(recipient)?;
        let draft = direct_message_draft(signer, &recipient, message, unix_now()).await?;
        Ok(signer.sign_event(draft).await?)
    }

    /// Builds, signs and publishes an encrypted direct message.
    ///
    /// # Errors
    ///
    /// See [`build_direct_message`](Self::build_direct_message); also fails
    /// if no relay accepts the event.
    pub async fn send_direct_message(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        recipient: &str,
        message: &str,
    ) -> CoreResult<SentEvent> {
        let event = self
            .build_direct_message(config, signer, recipient, message)
            .await?;
        self.publish(config, event).await
    }

    /// Signs an arbitrary draft and publishes it.
    ///
    /// # Errors
    ///
    /// Returns an error if the signer does not match the configuration,
    /// signing fails, or no relay accepts the event.
    pub async fn finalize_and_send(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        draft: EventDraft,
    ) -> CoreResult<SentEvent> {
        check_signer(config, signer)?;
        let event = signer.sign_event(draft).await?;
        self.publish(config, event).await
    }

    /// Requests deletion of `event_ids` (kind 5) with `reason` as content.
    ///
    /// # Errors
    ///
    /// See [`finalize_and_send`](Self::finalize_and_send).
    pub async fn delete_events(
        &self,
        config: &ClientConfig,
        signer: &dyn EventSigner,
        event_ids: &[String],
        reason: &str,
    ) -> CoreResult<SentEvent> {
        let draft = deletion_draft(event_ids, reason, unix_now());
        self.finalize_and_send(config, signer, draft).await
    }

    /// Uploads a listing image. With a `signer`, the request carries NIP-98
    /// authorization.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::UnsupportedFileType`] for non-images before any
    /// I/O, a signer mismatch error, or the upload failure.
    pub async fn upload_image(
        &self,
        config: &ClientConfig,
        signer: Option<&dyn EventSigner>,
        file_name: &str,
        mime: &str,
        bytes: Vec<u8>,
    ) -> CoreResult<UploadedFile> {
        if let Some(signer) = signer {
            check_signer(config, signer)?;
        }
        Ok(self.uploader.upload(file_name, mime, bytes, signer).await?)
    }

    async fn publish(&self, config: &ClientConfig, event: SignedEvent) -> CoreResult<SentEvent> {
        debug!("publishing kind {} event {}", event.kind, event.id);
        let receipt = self.publisher.publish(&config.relays, &event).await?;
        Ok(SentEvent { event, receipt })
    }
}

fn check_signer(config: &ClientConfig, signer: &dyn EventSigner) -> CoreResult<()> {
    let mode = config.require_sign_in()?;
    ensure_mode(signer, mode)?;
    Ok(())
}
