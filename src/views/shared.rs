//! Constants and helpers shared across views.

use time::format_description::FormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

pub const GENDER_OPTIONS: &[&str] = &["Male", "Female", "Non-binary", "Other"];

pub const AGE_OPTIONS: &[&str] = &["18-21", "22-25", "26-30", "31-40", "41-50", "50+"];

pub const LOCATION_OPTIONS: &[&str] = &[
    "Kerala (Malayalam/English)",
    "Tamil Nadu (Tamil/English)",
    "Maharashtra (Mumbai/Pune)",
    "Delhi (NCR)",
    "Karnataka (Bangalore)",
    "Andhra Pradesh / Telangana",
    "West Bengal",
    "Punjab",
    "Uttar Pradesh",
    "India (General)",
    "USA",
    "UK",
    "Canada",
    "UAE",
    "Other",
];

/// Visible-duration choices for a self-destructing image; `None` is ∞.
pub const IMAGE_TIMER_OPTIONS: &[(&str, Option<u32>)] = &[
    ("30s", Some(30)),
    ("50s", Some(50)),
    ("1m", Some(60)),
    ("2m", Some(120)),
    ("∞", None),
];

pub const DEFAULT_IMAGE_TIMER: Option<u32> = Some(30);

pub const QUICK_REACTIONS: &[&str] = &["❤️", "😂", "😮", "😢", "🔥", "👍", "🎉", "👀"];

pub const INTEREST_SUGGESTIONS: &[&str] =
    &["Music", "Movies", "Gaming", "Travel", "Tech", "Cricket"];

/// Text bubbles longer than this collapse behind a read-more toggle.
pub const MAX_TEXT_LENGTH: usize = 300;

const MESSAGE_TIME_FORMAT: &[FormatItem<'static>] =
    format_description!("[hour repr:12 padding:zero]:[minute padding:zero] [period case:upper]");

/// Render an epoch-millis timestamp as a local wall-clock label.
pub fn format_message_timestamp(timestamp_ms: i64) -> Option<String> {
    let mut datetime = OffsetDateTime::from_unix_timestamp(timestamp_ms.div_euclid(1000)).ok()?;
    if let Ok(offset) = UtcOffset::current_local_offset() {
        datetime = datetime.to_offset(offset);
    }
    datetime.format(MESSAGE_TIME_FORMAT).ok()
}

/// Badge label for an image duration selection.
pub fn duration_label(duration: Option<u32>) -> String {
    match duration {
        Some(secs) => format!("{secs}s"),
        None => "∞".to_string(),
    }
}
