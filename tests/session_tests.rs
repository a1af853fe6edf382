//! Integration tests for the chat session over the in-memory store.
//!
//! Exercises the send paths, the one-shot image view/expire transitions, the
//! vanish sweeper, and snapshot subscriptions end to end.

use std::sync::Arc;

use ghostline::feed;
use ghostline::session::ChatSession;
use ghostline::store::{MemoryStore, MessageStore, StoreEvent};
use ghostline::types::{ImageSettings, MessagePayload, VANISH_WINDOW_MS, now_millis};

fn session_with_store(identity: &str) -> (ChatSession, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let session = ChatSession::new(store.clone(), identity.to_string());
    (session, store)
}

mod text_tests {
    use super::*;

    #[tokio::test]
    async fn sending_text_trims_and_persists() {
        let (session, store) = session_with_store("user_aaaaaaaaa");

        session.send_text("  hello world  ", false).await.unwrap();

        let messages = store.messages();
        assert_eq!(messages.len(), 1);
        assert_eq!(
            messages[0].payload,
            MessagePayload::Text("hello world".to_string())
        );
        assert_eq!(messages[0].author_id, "user_aaaaaaaaa");
        assert_eq!(messages[0].vanish_at_ms, None);
    }

    #[tokio::test]
    async fn blank_text_writes_nothing() {
        let (session, store) = session_with_store("user_aaaaaaaaa");

        session.send_text("   ", false).await.unwrap();
        session.send_text("", true).await.unwrap();

        assert!(store.messages().is_empty());
    }

    #[tokio::test]
    async fn vanish_send_carries_a_sixty_second_deadline() {
        let (session, store) = session_with_store("user_aaaaaaaaa");

        let before = now_millis();
        session.send_text("gone soon", true).await.unwrap();
        let after = now_millis();

        let deadline = store.messages()[0].vanish_at_ms.unwrap();
        assert!(deadline >= before + VANISH_WINDOW_MS);
        assert!(deadline <= after + VANISH_WINDOW_MS);
    }
}

mod image_lifecycle_tests {
    use super::*;

    async fn sent_image(session: &ChatSession, duration: Option<u32>) -> (String, ImageSettings) {
        session
            .send_image("aGk=".to_string(), duration, false)
            .await
            .unwrap();
        let messages = session_messages(session).await;
        let msg = messages.last().unwrap();
        (msg.id.clone(), msg.image_settings().unwrap().clone())
    }

    // Reads back through a fresh subscription rather than reaching into the
    // store, the same way the UI sees state.
    async fn session_messages(session: &ChatSession) -> Vec<ghostline::types::Message> {
        let mut subscription = session.connect().await.unwrap();
        match subscription.next_event().await {
            Some(StoreEvent::Snapshot(list)) => list,
            other => panic!("expected snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn first_view_sets_the_anchor_exactly_once() {
        let (session, store) = session_with_store("user_bbbbbbbbb");
        let (id, settings) = sent_image(&session, Some(30)).await;
        assert!(!settings.is_viewed);

        session.view_image(&id, &settings).await.unwrap();
        let viewed = store.messages()[0].image_settings().unwrap().clone();
        assert!(viewed.is_viewed);
        let anchor = viewed.viewed_at.unwrap();

        // A second view request must not move the anchor.
        session.view_image(&id, &viewed).await.unwrap();
        let after = store.messages()[0].image_settings().unwrap().clone();
        assert_eq!(after.viewed_at, Some(anchor));
    }

    #[tokio::test]
    async fn expire_is_refused_while_time_remains() {
        let (session, store) = session_with_store("user_bbbbbbbbb");
        let (id, settings) = sent_image(&session, Some(30)).await;

        session.view_image(&id, &settings).await.unwrap();
        let viewed = store.messages()[0].image_settings().unwrap().clone();

        session.expire_image(&id, &viewed).await.unwrap();
        assert!(!store.messages()[0].image_settings().unwrap().is_expired);
    }

    #[tokio::test]
    async fn expire_lands_once_the_deadline_has_passed() {
        let (session, store) = session_with_store("user_bbbbbbbbb");
        let (id, settings) = sent_image(&session, Some(30)).await;
        session.view_image(&id, &settings).await.unwrap();

        let mut stale = store.messages()[0].image_settings().unwrap().clone();
        stale.viewed_at = Some(now_millis() - 31_000);

        session.expire_image(&id, &stale).await.unwrap();
        assert!(store.messages()[0].image_settings().unwrap().is_expired);
    }

    #[tokio::test]
    async fn unlimited_images_never_expire() {
        let (session, store) = session_with_store("user_bbbbbbbbb");
        let (id, settings) = sent_image(&session, None).await;
        session.view_image(&id, &settings).await.unwrap();

        let mut stale = store.messages()[0].image_settings().unwrap().clone();
        stale.viewed_at = Some(now_millis() - 3_600_000);

        session.expire_image(&id, &stale).await.unwrap();
        assert!(!store.messages()[0].image_settings().unwrap().is_expired);
    }
}

mod sweeper_tests {
    use super::*;

    #[tokio::test]
    async fn sweep_deletes_only_my_due_messages() {
        let store = Arc::new(MemoryStore::new());
        let mine = ChatSession::new(store.clone(), "user_mmmmmmmmm".to_string());
        let theirs = ChatSession::new(store.clone(), "user_ttttttttt".to_string());

        mine.send_text("mine, vanishing", true).await.unwrap();
        theirs.send_text("theirs, vanishing", true).await.unwrap();

        let known = store.messages();
        assert_eq!(known.len(), 2);

        // Nothing is due yet.
        assert_eq!(mine.sweep(&known, now_millis()).await, 0);
        assert_eq!(store.messages().len(), 2);

        // Past the window my message goes; the other author's stays.
        let later = now_millis() + VANISH_WINDOW_MS + 1_000;
        assert_eq!(mine.sweep(&known, later).await, 1);

        let remaining = store.messages();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].author_id, "user_ttttttttt");
    }

    #[tokio::test]
    async fn deleting_an_absent_id_is_success() {
        let (_, store) = session_with_store("user_mmmmmmmmm");
        store.delete("never-existed").await.unwrap();
    }

    #[tokio::test]
    async fn feed_hides_due_messages_even_before_the_sweep() {
        let (session, store) = session_with_store("user_mmmmmmmmm");
        session.send_text("ephemeral", true).await.unwrap();

        let known = store.messages();
        let deadline = known[0].vanish_at_ms.unwrap();

        assert_eq!(feed::visible_at(&known, deadline - 1).len(), 1);
        assert!(feed::visible_at(&known, deadline).is_empty());
    }
}

mod subscription_tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_get_an_initial_snapshot_then_updates() {
        let (session, _) = session_with_store("user_sssssssss");

        let mut subscription = session.connect().await.unwrap();
        match subscription.next_event().await {
            Some(StoreEvent::Snapshot(list)) => assert!(list.is_empty()),
            other => panic!("expected empty initial snapshot, got {other:?}"),
        }

        session.send_text("first", false).await.unwrap();
        match subscription.next_event().await {
            Some(StoreEvent::Snapshot(list)) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].payload, MessagePayload::Text("first".to_string()));
            }
            other => panic!("expected updated snapshot, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn each_mutation_replaces_the_snapshot_wholesale() {
        let (session, store) = session_with_store("user_sssssssss");
        let mut subscription = session.connect().await.unwrap();
        let _ = subscription.next_event().await;

        session.send_text("one", false).await.unwrap();
        session.send_text("two", false).await.unwrap();

        let _ = subscription.next_event().await;
        match subscription.next_event().await {
            Some(StoreEvent::Snapshot(list)) => assert_eq!(list.len(), 2),
            other => panic!("expected snapshot, got {other:?}"),
        }

        store.delete(&store.messages()[0].id).await.unwrap();
        match subscription.next_event().await {
            Some(StoreEvent::Snapshot(list)) => {
                assert_eq!(list.len(), 1);
                assert_eq!(list[0].payload, MessagePayload::Text("two".to_string()));
            }
            other => panic!("expected snapshot after delete, got {other:?}"),
        }
    }
}
