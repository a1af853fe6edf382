//! In-process store backend.
//!
//! Backs the integration tests and the `GHOSTLINE_STORE=memory` offline
//! demo. Behaves like the real backend: assigns ids and timestamps, pushes a
//! fresh wholesale snapshot to every subscriber after each mutation, and
//! treats mutations of absent ids as success.

use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::types::{Message, MessageDraft, MessagePayload, MessageRecord, now_millis};

use super::{MessageStore, SNAPSHOT_LIMIT, StoreError, StoreEvent, Subscription};

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    next_id: u64,
    messages: Vec<Message>,
    subscribers: Vec<mpsc::UnboundedSender<StoreEvent>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current contents, snapshot-ordered. Test observability.
    pub fn messages(&self) -> Vec<Message> {
        snapshot(&self.inner.lock().expect("memory store poisoned").messages)
    }

    fn mutate(&self, apply: impl FnOnce(&mut Vec<Message>)) {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        apply(&mut inner.messages);
        let event_snapshot = snapshot(&inner.messages);
        inner
            .subscribers
            .retain(|sender| sender.send(StoreEvent::Snapshot(event_snapshot.clone())).is_ok());
    }
}

fn snapshot(messages: &[Message]) -> Vec<Message> {
    let mut ordered = messages.to_vec();
    ordered.sort_by_key(|msg| msg.timestamp_ms);
    ordered.truncate(SNAPSHOT_LIMIT);
    ordered
}

#[async_trait::async_trait]
impl MessageStore for MemoryStore {
    async fn subscribe(&self) -> Result<Subscription, StoreError> {
        let (sender, receiver) = mpsc::unbounded_channel();
        let mut inner = self.inner.lock().expect("memory store poisoned");
        // Initial snapshot mirrors the realtime listener firing on attach.
        let _ = sender.send(StoreEvent::Snapshot(snapshot(&inner.messages)));
        inner.subscribers.push(sender);
        Ok(Subscription::new(receiver))
    }

    async fn create(&self, draft: MessageDraft) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().expect("memory store poisoned");
        inner.next_id += 1;
        let record = MessageRecord {
            id: format!("mem-{}", inner.next_id),
            user_id: Some(draft.user_id),
            text: draft.text,
            image: draft.image,
            image_settings: draft.image_settings,
            audio: draft.audio,
            timestamp: now_millis(),
            vanish_at: draft.vanish_at,
            ..Default::default()
        };
        let message = record
            .into_message()
            .ok_or_else(|| StoreError::Malformed("draft carries no payload".to_string()))?;
        inner.messages.push(message);
        let event_snapshot = snapshot(&inner.messages);
        inner
            .subscribers
            .retain(|sender| sender.send(StoreEvent::Snapshot(event_snapshot.clone())).is_ok());
        Ok(())
    }

    async fn mark_viewed(&self, id: &str, viewed_at_ms: i64) -> Result<(), StoreError> {
        self.mutate(|messages| {
            for msg in messages.iter_mut().filter(|msg| msg.id == id) {
                if let MessagePayload::Image { settings, .. } = &mut msg.payload {
                    if !settings.is_viewed {
                        settings.is_viewed = true;
                        settings.viewed_at = Some(viewed_at_ms);
                    }
                }
            }
        });
        Ok(())
    }

    async fn mark_expired(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|messages| {
            for msg in messages.iter_mut().filter(|msg| msg.id == id) {
                if let MessagePayload::Image { settings, .. } = &mut msg.payload {
                    settings.is_expired = true;
                }
            }
        });
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.mutate(|messages| messages.retain(|msg| msg.id != id));
        Ok(())
    }
}
