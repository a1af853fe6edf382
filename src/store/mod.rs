//! The external realtime document store, modeled as an injected capability.
//!
//! The session controller receives a [`MessageStore`] at construction and an
//! explicit initialization result, instead of a module-global client with an
//! always-true "configured" flag. Subscriptions deliver full result-set
//! snapshots; every snapshot replaces the client's message list wholesale.

use std::env;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::types::{Message, MessageDraft};

mod http;
mod memory;

pub use http::HttpStore;
pub use memory::MemoryStore;

/// Snapshots are capped at the oldest 100 messages, timestamp ascending.
pub const SNAPSHOT_LIMIT: usize = 100;

/// Poll interval for the HTTP snapshot subscription.
pub const POLL_INTERVAL_MS: u64 = 1_000;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store is not configured: {0}")]
    Unconfigured(String),

    #[error("the store denied access")]
    PermissionDenied,

    #[error("store request failed: {0}")]
    Request(String),

    #[error("store returned a malformed response: {0}")]
    Malformed(String),
}

/// How a failure maps onto the UI: both fatal classes halt the subscription
/// behind a blocking notice; transient failures are logged and swallowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FailureClass {
    Config,
    Permission,
    Transient,
}

impl StoreError {
    pub fn class(&self) -> FailureClass {
        match self {
            StoreError::Unconfigured(_) => FailureClass::Config,
            StoreError::PermissionDenied => FailureClass::Permission,
            StoreError::Request(_) | StoreError::Malformed(_) => FailureClass::Transient,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.class() != FailureClass::Transient
    }
}

/// One delivery on the subscription channel.
#[derive(Debug)]
pub enum StoreEvent {
    /// A full replacement result set, superseding all prior state.
    Snapshot(Vec<Message>),
    /// The subscription failed fatally and will deliver nothing further.
    Failed(StoreError),
}

/// A live snapshot subscription. Dropping it tears the feed down.
pub struct Subscription {
    receiver: mpsc::UnboundedReceiver<StoreEvent>,
}

impl Subscription {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<StoreEvent>) -> Self {
        Self { receiver }
    }

    /// The next snapshot or fatal error; `None` once the feed has ended.
    pub async fn next_event(&mut self) -> Option<StoreEvent> {
        self.receiver.recv().await
    }
}

#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Open a snapshot stream over the messages collection, timestamp
    /// ascending, capped at [`SNAPSHOT_LIMIT`].
    async fn subscribe(&self) -> Result<Subscription, StoreError>;

    /// Create a message; the store assigns id and timestamp.
    async fn create(&self, draft: MessageDraft) -> Result<(), StoreError>;

    /// Record the first open of a self-destructing image. The store must not
    /// overwrite an already-set view anchor.
    async fn mark_viewed(&self, id: &str, viewed_at_ms: i64) -> Result<(), StoreError>;

    /// Mark an image terminally expired.
    async fn mark_expired(&self, id: &str) -> Result<(), StoreError>;

    /// Delete a message. Deleting an id that no longer exists is success.
    async fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Build the configured store backend.
///
/// `GHOSTLINE_STORE=memory` selects the in-process store for offline demos;
/// otherwise `STORE_BASE_URL` must point at the document-store REST API.
pub fn from_env() -> Result<Arc<dyn MessageStore>, StoreError> {
    if let Ok(backend) = env::var("GHOSTLINE_STORE") {
        if backend.eq_ignore_ascii_case("memory") {
            return Ok(Arc::new(MemoryStore::new()));
        }
    }

    let base_url = env::var("STORE_BASE_URL")
        .map_err(|_| StoreError::Unconfigured("STORE_BASE_URL is not set".to_string()))?;
    Ok(Arc::new(HttpStore::new(&base_url)?))
}
