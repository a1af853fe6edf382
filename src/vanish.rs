//! Vanish sweeping: selecting which messages this client must delete.
//!
//! Every client sees the same broadcast room, so deletion load is split by
//! authorship: only the originating client issues the delete for its own
//! expired vanish messages. Everyone else just stops displaying them (the
//! feed projection handles that independently).

use crate::types::Message;

/// Messages whose vanish deadline has passed and which the local identity
/// authored. One sweeper tick issues exactly one delete per returned id.
pub fn due_deletions<'a>(messages: &'a [Message], identity: &str, now_ms: i64) -> Vec<&'a str> {
    messages
        .iter()
        .filter(|msg| msg.is_mine(identity))
        .filter(|msg| matches!(msg.vanish_at_ms, Some(deadline) if deadline < now_ms))
        .map(|msg| msg.id.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MessagePayload;

    fn vanish_message(id: &str, author: &str, vanish_at: Option<i64>) -> Message {
        Message {
            id: id.to_string(),
            author_id: author.to_string(),
            payload: MessagePayload::Text("hi".into()),
            timestamp_ms: 0,
            vanish_at_ms: vanish_at,
            reactions: Default::default(),
            is_reported: false,
            guardian: None,
        }
    }

    #[test]
    fn only_own_expired_vanish_messages_are_due() {
        let messages = vec![
            vanish_message("own-due", "userA", Some(5_000)),
            vanish_message("foreign-due", "userB", Some(5_000)),
            vanish_message("own-pending", "userA", Some(9_000)),
            vanish_message("own-permanent", "userA", None),
        ];

        assert_eq!(due_deletions(&messages, "userA", 6_000), vec!["own-due"]);
    }

    #[test]
    fn deadline_is_exclusive() {
        let messages = vec![vanish_message("m", "userA", Some(5_000))];
        assert!(due_deletions(&messages, "userA", 4_999).is_empty());
        assert!(due_deletions(&messages, "userA", 5_000).is_empty());
        assert_eq!(due_deletions(&messages, "userA", 5_001), vec!["m"]);
    }

    #[test]
    fn foreign_identity_never_produces_deletes() {
        let messages = vec![vanish_message("m", "userB", Some(5_000))];
        assert!(due_deletions(&messages, "userA", 4_999).is_empty());
        assert!(due_deletions(&messages, "userA", 5_001).is_empty());
    }
}
