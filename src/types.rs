use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::warn;

/// How long a vanish-mode message stays alive after sending.
pub const VANISH_WINDOW_MS: i64 = 60_000;

/// Current wall-clock time in epoch milliseconds. All lifecycle math works on
/// absolute millisecond timestamps so it can be recomputed at any point.
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as i64
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeMode {
    Dark,
    Light,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuardianLevel {
    Safe,
    Warning,
    Danger,
}

/// Safety classification attached to a message by an external moderator.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuardianStatus {
    pub level: GuardianLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Timer settings carried by self-destructing images.
///
/// `duration == None` means unlimited: the countdown never expires it.
/// `viewed_at` is set exactly once, at the receiver's first open, and is the
/// anchor every countdown evaluation derives from.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSettings {
    pub duration: Option<u32>,
    pub is_viewed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewed_at: Option<i64>,
    pub is_expired: bool,
}

impl ImageSettings {
    pub fn with_duration(duration: Option<u32>) -> Self {
        Self {
            duration,
            ..Self::default()
        }
    }

    pub fn is_unlimited(&self) -> bool {
        self.duration.is_none()
    }
}

/// Message payload as a proper sum type. The wire format stores these as
/// optional sibling fields; decoding collapses them so an image can never
/// coexist with an audio clip in one domain message.
#[derive(Clone, Debug, PartialEq)]
pub enum MessagePayload {
    Text(String),
    Image {
        /// Base64 image bytes, no data-URL prefix.
        data: String,
        settings: ImageSettings,
    },
    Audio(String),
    System(String),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Message {
    /// Store-assigned document id.
    pub id: String,
    /// Local identity of the sending client.
    pub author_id: String,
    pub payload: MessagePayload,
    /// Store-assigned creation time, epoch millis.
    pub timestamp_ms: i64,
    /// Absolute deadline after which the message must be hidden and its
    /// author must request deletion. `None` means permanent.
    pub vanish_at_ms: Option<i64>,
    pub reactions: BTreeMap<String, u32>,
    pub is_reported: bool,
    pub guardian: Option<GuardianStatus>,
}

impl Message {
    pub fn is_mine(&self, identity: &str) -> bool {
        self.author_id == identity
    }

    pub fn is_vanish(&self) -> bool {
        self.vanish_at_ms.is_some()
    }

    pub fn image_settings(&self) -> Option<&ImageSettings> {
        match &self.payload {
            MessagePayload::Image { settings, .. } => Some(settings),
            _ => None,
        }
    }
}

/// Ephemeral per-session profile. Never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UserProfile {
    pub name: String,
    pub gender: String,
    pub age: String,
    pub location: String,
    pub interests: String,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: "Male".to_string(),
            age: "18-21".to_string(),
            location: "India (General)".to_string(),
            interests: String::new(),
        }
    }
}

// ============================================
// Wire records
// ============================================

/// A message document as the store serves it: one record, optional payload
/// fields. Produced by the store layer and collapsed into [`Message`].
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRecord {
    #[serde(default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_settings: Option<ImageSettings>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vanish_at: Option<i64>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub reactions: BTreeMap<String, u32>,
    #[serde(default)]
    pub is_reported: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guardian_status: Option<GuardianStatus>,
}

impl MessageRecord {
    /// Collapse the optional payload fields into the domain sum type.
    ///
    /// Records carrying more than one payload decode by fixed precedence
    /// (image, audio, text); records carrying none are dropped.
    pub fn into_message(self) -> Option<Message> {
        let payload = if let Some(data) = self.image {
            if self.audio.is_some() || self.text.is_some() {
                warn!(id = %self.id, "record carries extra payload fields, keeping image");
            }
            MessagePayload::Image {
                data,
                settings: self.image_settings.unwrap_or_default(),
            }
        } else if let Some(audio) = self.audio {
            if self.text.is_some() {
                warn!(id = %self.id, "record carries extra payload fields, keeping audio");
            }
            MessagePayload::Audio(audio)
        } else if let Some(text) = self.text {
            MessagePayload::Text(text)
        } else {
            warn!(id = %self.id, "dropping message record with no payload");
            return None;
        };

        Some(Message {
            id: self.id,
            author_id: self.user_id.unwrap_or_default(),
            payload,
            timestamp_ms: self.timestamp,
            vanish_at_ms: self.vanish_at,
            reactions: self.reactions,
            is_reported: self.is_reported,
            guardian: self.guardian_status,
        })
    }
}

/// Outbound message fields. The store assigns `id` and `timestamp`.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDraft {
    pub user_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_settings: Option<ImageSettings>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vanish_at: Option<i64>,
}

impl MessageDraft {
    fn empty(user_id: &str, vanish_at: Option<i64>) -> Self {
        Self {
            user_id: user_id.to_string(),
            text: None,
            image: None,
            image_settings: None,
            audio: None,
            vanish_at,
        }
    }

    pub fn text(user_id: &str, text: String, vanish_at: Option<i64>) -> Self {
        Self {
            text: Some(text),
            ..Self::empty(user_id, vanish_at)
        }
    }

    pub fn image(
        user_id: &str,
        data: String,
        duration: Option<u32>,
        vanish_at: Option<i64>,
    ) -> Self {
        Self {
            image: Some(data),
            image_settings: Some(ImageSettings::with_duration(duration)),
            ..Self::empty(user_id, vanish_at)
        }
    }

    pub fn audio(user_id: &str, data: String, vanish_at: Option<i64>) -> Self {
        Self {
            audio: Some(data),
            ..Self::empty(user_id, vanish_at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_with_text_becomes_text_message() {
        let record = MessageRecord {
            id: "m1".into(),
            user_id: Some("user_abc".into()),
            text: Some("hello".into()),
            timestamp: 42,
            ..Default::default()
        };
        let msg = record.into_message().unwrap();
        assert_eq!(msg.payload, MessagePayload::Text("hello".into()));
        assert!(msg.is_mine("user_abc"));
        assert!(!msg.is_vanish());
    }

    #[test]
    fn image_takes_precedence_over_stray_payloads() {
        let record = MessageRecord {
            id: "m2".into(),
            image: Some("aGk=".into()),
            audio: Some("aGk=".into()),
            text: Some("ignored".into()),
            ..Default::default()
        };
        let msg = record.into_message().unwrap();
        assert!(matches!(msg.payload, MessagePayload::Image { .. }));
    }

    #[test]
    fn audio_takes_precedence_over_stray_text() {
        let record = MessageRecord {
            id: "m2a".into(),
            audio: Some("aGk=".into()),
            text: Some("ignored".into()),
            ..Default::default()
        };
        let msg = record.into_message().unwrap();
        assert_eq!(msg.payload, MessagePayload::Audio("aGk=".into()));
    }

    #[test]
    fn payloadless_record_is_dropped() {
        let record = MessageRecord {
            id: "m3".into(),
            ..Default::default()
        };
        assert!(record.into_message().is_none());
    }

    #[test]
    fn draft_serializes_without_absent_fields() {
        let draft = MessageDraft::text("user_abc", "hi".into(), None);
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["text"], "hi");
        assert!(json.get("image").is_none());
        assert!(json.get("vanishAt").is_none());
    }

    #[test]
    fn image_settings_round_trip_uses_camel_case() {
        let settings = ImageSettings {
            duration: Some(30),
            is_viewed: true,
            viewed_at: Some(1000),
            is_expired: false,
        };
        let json = serde_json::to_value(&settings).unwrap();
        assert_eq!(json["isViewed"], true);
        assert_eq!(json["viewedAt"], 1000);
        let back: ImageSettings = serde_json::from_value(json).unwrap();
        assert_eq!(back, settings);
    }
}
