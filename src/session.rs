//! Chat session orchestration.
//!
//! [`ChatSession`] owns the injected store capability and the local identity
//! and performs every outbound operation: sends, the one-shot view/expire
//! transitions, and the vanish sweep. [`SessionState`] is the small
//! connect/disconnect/skip/exit state machine the UI mirrors.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::lifecycle;
use crate::store::{MessageStore, StoreError, Subscription};
use crate::types::{ImageSettings, Message, MessageDraft, UserProfile, VANISH_WINDOW_MS, now_millis};
use crate::vanish;

/// There is no peer matching behind the UI; every client shares one room.
pub const GLOBAL_ROOM_LABEL: &str = "Global Chat";

/// Delay between the disconnect and reconnect halves of a skip.
pub const SKIP_RECONNECT_MS: u64 = 300;

#[derive(Clone)]
pub struct ChatSession {
    store: Arc<dyn MessageStore>,
    identity: String,
}

impl PartialEq for ChatSession {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.store, &other.store) && self.identity == other.identity
    }
}

impl ChatSession {
    pub fn new(store: Arc<dyn MessageStore>, identity: String) -> Self {
        Self { store, identity }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    /// Open a fresh snapshot subscription for the connected state.
    pub async fn connect(&self) -> Result<Subscription, StoreError> {
        self.store.subscribe().await
    }

    fn vanish_deadline(vanish_mode: bool) -> Option<i64> {
        vanish_mode.then(|| now_millis() + VANISH_WINDOW_MS)
    }

    /// Send a text message. The caller is responsible for the PII
    /// confirmation gate; failures surface so the composer keeps its text.
    pub async fn send_text(&self, text: &str, vanish_mode: bool) -> Result<(), StoreError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Ok(());
        }
        let draft = MessageDraft::text(
            &self.identity,
            trimmed.to_string(),
            Self::vanish_deadline(vanish_mode),
        );
        self.store.create(draft).await
    }

    pub async fn send_image(
        &self,
        data: String,
        duration: Option<u32>,
        vanish_mode: bool,
    ) -> Result<(), StoreError> {
        let draft = MessageDraft::image(
            &self.identity,
            data,
            duration,
            Self::vanish_deadline(vanish_mode),
        );
        self.store.create(draft).await
    }

    pub async fn send_audio(&self, data: String, vanish_mode: bool) -> Result<(), StoreError> {
        let draft = MessageDraft::audio(&self.identity, data, Self::vanish_deadline(vanish_mode));
        self.store.create(draft).await
    }

    /// The receiver's explicit open of a self-destructing image.
    ///
    /// Idempotent: an already-viewed or expired image produces no write, so
    /// the view anchor is set exactly once.
    pub async fn view_image(
        &self,
        msg_id: &str,
        settings: &ImageSettings,
    ) -> Result<(), StoreError> {
        match lifecycle::request_view(settings, now_millis()) {
            Some(receipt) => self.store.mark_viewed(msg_id, receipt.viewed_at_ms).await,
            None => Ok(()),
        }
    }

    /// The timer engine's expire signal. A no-op unless the countdown has
    /// genuinely run out and the image is not already expired.
    pub async fn expire_image(
        &self,
        msg_id: &str,
        settings: &ImageSettings,
    ) -> Result<(), StoreError> {
        if lifecycle::request_expire(settings, now_millis()) {
            self.store.mark_expired(msg_id).await
        } else {
            Ok(())
        }
    }

    /// One sweeper tick: delete my own messages whose vanish deadline has
    /// passed. Delete failures are logged and swallowed; the feed projection
    /// hides these messages regardless. Returns how many deletes were issued.
    pub async fn sweep(&self, messages: &[Message], now_ms: i64) -> usize {
        let due = vanish::due_deletions(messages, &self.identity, now_ms);
        let issued = due.len();
        for id in due {
            if let Err(err) = self.store.delete(id).await {
                warn!(id, "vanish cleanup delete failed: {err}");
            }
        }
        issued
    }

    /// Reaction persistence is an unresolved gap in the backend; record the
    /// intent without inventing a write.
    pub fn react(&self, msg_id: &str, emoji: &str) {
        debug!(msg_id, emoji, "reaction sent");
    }

    /// Message reporting has no backend endpoint yet; record the report so
    /// the rendering mask driven by `isReported` stays the only effect.
    pub fn report(&self, msg_id: &str) {
        info!(msg_id, "message reported");
    }
}

// ============================================
// Session state machine
// ============================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    /// Profile form; nothing is connected yet.
    Landing,
    Connected,
    /// Profile submitted but the chat is stopped.
    Offline,
}

/// The UI-facing session flags. Pure state transitions; the UI performs the
/// actual subscription setup/teardown when `phase` changes.
#[derive(Clone, Debug)]
pub struct SessionState {
    pub profile: UserProfile,
    pub vanish_mode: bool,
    pub phase: SessionPhase,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            profile: UserProfile::default(),
            vanish_mode: false,
            phase: SessionPhase::Landing,
        }
    }
}

impl SessionState {
    /// Submit the profile form and enter the connected state.
    /// Rejects names shorter than two characters.
    pub fn start_chat(&mut self, profile: UserProfile) -> Result<(), &'static str> {
        if profile.name.trim().len() < 2 {
            return Err("Please enter a valid name.");
        }
        self.profile = profile;
        self.phase = SessionPhase::Connected;
        Ok(())
    }

    pub fn stop_chat(&mut self) {
        if self.phase == SessionPhase::Connected {
            self.phase = SessionPhase::Offline;
        }
    }

    pub fn reconnect(&mut self) {
        if self.phase == SessionPhase::Offline {
            self.phase = SessionPhase::Connected;
        }
    }

    /// Toggling vanish mode changes future sends only, never history.
    pub fn toggle_vanish_mode(&mut self) {
        self.vanish_mode = !self.vanish_mode;
    }

    /// Back to the landing page, dropping all session-scoped state.
    pub fn exit(&mut self) {
        *self = Self::default();
    }

    pub fn counterpart_label(&self) -> &'static str {
        GLOBAL_ROOM_LABEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named_profile(name: &str) -> UserProfile {
        UserProfile {
            name: name.to_string(),
            ..UserProfile::default()
        }
    }

    #[test]
    fn start_chat_requires_a_real_name() {
        let mut state = SessionState::default();
        assert!(state.start_chat(named_profile("x")).is_err());
        assert_eq!(state.phase, SessionPhase::Landing);

        assert!(state.start_chat(named_profile("Maya")).is_ok());
        assert_eq!(state.phase, SessionPhase::Connected);
    }

    #[test]
    fn stop_and_reconnect_cycle() {
        let mut state = SessionState::default();
        state.start_chat(named_profile("Maya")).unwrap();

        state.stop_chat();
        assert_eq!(state.phase, SessionPhase::Offline);

        state.reconnect();
        assert_eq!(state.phase, SessionPhase::Connected);
    }

    #[test]
    fn exit_resets_everything() {
        let mut state = SessionState::default();
        state.start_chat(named_profile("Maya")).unwrap();
        state.toggle_vanish_mode();

        state.exit();
        assert_eq!(state.phase, SessionPhase::Landing);
        assert!(!state.vanish_mode);
        assert!(state.profile.name.is_empty());
    }

    #[test]
    fn vanish_toggle_flips_future_behavior_only() {
        let mut state = SessionState::default();
        assert!(!state.vanish_mode);
        state.toggle_vanish_mode();
        assert!(state.vanish_mode);
        state.toggle_vanish_mode();
        assert!(!state.vanish_mode);
    }
}
