//! REST client for the document-store backend.
//!
//! The subscription is a polling loop: every [`POLL_INTERVAL_MS`] it fetches
//! the full ordered result set and emits it as a wholesale snapshot.
//! Transient fetch failures are logged and retried; permission and
//! configuration failures end the stream with a fatal event.

use std::time::Duration;

use reqwest::StatusCode;
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::types::{MessageDraft, MessageRecord};

use super::{
    MessageStore, POLL_INTERVAL_MS, SNAPSHOT_LIMIT, StoreError, StoreEvent, Subscription,
};

#[derive(Debug)]
pub struct HttpStore {
    client: reqwest::Client,
    base_url: String,
}

impl HttpStore {
    pub fn new(base_url: &str) -> Result<Self, StoreError> {
        if base_url.trim().is_empty() {
            return Err(StoreError::Unconfigured(
                "store base URL is empty".to_string(),
            ));
        }
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|err| StoreError::Unconfigured(err.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/messages", self.base_url)
    }

    fn document_url(&self, id: &str) -> String {
        format!("{}/messages/{}", self.base_url, id)
    }

    async fn fetch_snapshot(&self) -> Result<Vec<MessageRecord>, StoreError> {
        let response = self
            .client
            .get(self.collection_url())
            .query(&[
                ("orderBy", "timestamp"),
                ("limit", &SNAPSHOT_LIMIT.to_string()),
            ])
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;
        let response = check_status(response)?;
        response
            .json::<Vec<MessageRecord>>()
            .await
            .map_err(|err| StoreError::Malformed(err.to_string()))
    }
}

/// Map an HTTP status onto the store failure taxonomy. 404 on mutations is
/// handled at the call sites that treat it as idempotent success.
fn check_status(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
    match response.status() {
        status if status.is_success() => Ok(response),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(StoreError::PermissionDenied),
        status => Err(StoreError::Request(format!("unexpected status {status}"))),
    }
}

#[async_trait::async_trait]
impl MessageStore for HttpStore {
    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let poller = HttpStore {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
        };

        tokio::spawn(async move {
            loop {
                match poller.fetch_snapshot().await {
                    Ok(records) => {
                        let messages = records
                            .into_iter()
                            .filter_map(MessageRecord::into_message)
                            .collect();
                        if sender.send(StoreEvent::Snapshot(messages)).is_err() {
                            debug!("snapshot subscriber went away, stopping poll loop");
                            break;
                        }
                    }
                    Err(err) if err.is_fatal() => {
                        let _ = sender.send(StoreEvent::Failed(err));
                        break;
                    }
                    Err(err) => {
                        warn!("snapshot fetch failed, will retry: {err}");
                    }
                }
                tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
            }
        });

        Ok(Subscription::new(receiver))
    }

    async fn create(&self, draft: MessageDraft) -> Result<(), StoreError> {
        let response = self
            .client
            .post(self.collection_url())
            .json(&draft)
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;
        check_status(response).map(|_| ())
    }

    async fn mark_viewed(&self, id: &str, viewed_at_ms: i64) -> Result<(), StoreError> {
        let patch = serde_json::json!({
            "imageSettings": { "isViewed": true, "viewedAt": viewed_at_ms }
        });
        self.patch_document(id, patch).await
    }

    async fn mark_expired(&self, id: &str) -> Result<(), StoreError> {
        let patch = serde_json::json!({
            "imageSettings": { "isExpired": true }
        });
        self.patch_document(id, patch).await
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        let response = self
            .client
            .delete(self.document_url(id))
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).map(|_| ())
    }
}

impl HttpStore {
    async fn patch_document(&self, id: &str, patch: serde_json::Value) -> Result<(), StoreError> {
        let response = self
            .client
            .patch(self.document_url(id))
            .json(&patch)
            .send()
            .await
            .map_err(|err| StoreError::Request(err.to_string()))?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(());
        }
        check_status(response).map(|_| ())
    }
}
