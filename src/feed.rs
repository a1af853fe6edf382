//! Display projection over the received message set.
//!
//! Hiding expired vanish messages is purely a display concern: the snapshot
//! itself is never mutated, so the sweeper can still see those messages and
//! decide deletion by authorship.

use crate::types::Message;

/// True while `msg` should still be rendered at `now_ms`.
pub fn is_visible_at(msg: &Message, now_ms: i64) -> bool {
    match msg.vanish_at_ms {
        None => true,
        Some(deadline) => deadline > now_ms,
    }
}

/// The messages to display at `now_ms`, in snapshot order.
pub fn visible_at(messages: &[Message], now_ms: i64) -> Vec<&Message> {
    messages
        .iter()
        .filter(|msg| is_visible_at(msg, now_ms))
        .collect()
}
