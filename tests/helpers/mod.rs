//! Reusable test helpers for integration tests.
//!
//! Configuration helpers go through the same `MemoryStore` path the
//! application uses. The HTTP helper is a local axum server that records
//! the first request it receives and answers with a canned response.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::Bytes;
use axum::http::{header, HeaderMap, Method, StatusCode, Uri};
use axum::Router;
use shopstr_core::config::{ClientConfig, MemoryStore};
use shopstr_core::nostr::IdentityKeypair;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// Passphrase used for every local-key test identity.
pub const PASSPHRASE: &str = "correct-horse";

/// Signs `keypair` in with a local key and returns the store and the loaded
/// configuration.
pub fn local_sign_in(keypair: &IdentityKeypair) -> (MemoryStore, ClientConfig) {
    let store = MemoryStore::new();
    let nsec = keypair.export_nsec().expect("nsec export");
    ClientConfig::sign_in_local(&store, &nsec, PASSPHRASE).expect("local sign-in");
    let config = ClientConfig::load(&store).expect("config load");
    (store, config)
}

/// Signs `keypair` in through an external signer and returns the store and
/// the loaded configuration.
pub fn delegated_sign_in(keypair: &IdentityKeypair) -> (MemoryStore, ClientConfig) {
    let store = MemoryStore::new();
    let npub = keypair.npub().expect("npub");
    ClientConfig::sign_in_delegated(&store, &npub).expect("delegated sign-in");
    let config = ClientConfig::load(&store).expect("config load");
    (store, config)
}

/// Builds a tag from string slices.
pub fn tag(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| (*s).to_string()).collect()
}

/// A request captured by [`serve_once`].
#[derive(Debug)]
pub struct CapturedRequest {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl CapturedRequest {
    /// Returns the value of `name`, if present and valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }
}

/// Serves canned JSON on every path of a random local port.
///
/// Returns the base URL (`http://127.0.0.1:<port>`) and a handle that
/// resolves to the first request received.
pub async fn serve_once(status: StatusCode, body: &'static str) -> (String, JoinHandle<CapturedRequest>) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (tx, rx) = oneshot::channel();
    let tx = Arc::new(Mutex::new(Some(tx)));

    let app = Router::new().fallback(
        move |method: Method, uri: Uri, headers: HeaderMap, request_body: Bytes| {
            let tx = Arc::clone(&tx);
            async move {
                if let Some(tx) = tx.lock().unwrap().take() {
                    let _ = tx.send(CapturedRequest {
                        method,
                        path: uri.path().to_string(),
                        headers,
                        body: request_body,
                    });
                }
                (status, [(header::CONTENT_TYPE, "application/json")], body)
            }
        },
    );
    tokio::spawn(async move {
        axum::serve(listener, app.into_make_service()).await.unwrap();
    });

    let captured = tokio::spawn(async move { rx.await.expect("no request received") });
    (format!("http://{addr}"), captured)
}
