//! Countdown evaluation for self-destructing images.
//!
//! Remaining time is always recomputed from the stored `viewed_at` anchor and
//! the caller's clock, never decremented in memory, so an evaluation is
//! correct after remounts, backgrounding, or missed ticks.

use crate::types::ImageSettings;

/// Outcome of one countdown evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    /// No duration set: visible forever once opened.
    Infinite,
    /// Whole seconds left before forced expiry, always >= 1.
    Remaining(i64),
    /// The deadline has passed; the image must expire now.
    Expire,
}

impl Countdown {
    pub fn is_due(self) -> bool {
        matches!(self, Countdown::Expire)
    }

    /// Seconds to show in a timer badge, if a finite countdown is running.
    pub fn seconds(self) -> Option<i64> {
        match self {
            Countdown::Remaining(secs) => Some(secs),
            Countdown::Expire => Some(0),
            Countdown::Infinite => None,
        }
    }
}

/// Evaluate the countdown for an image at `now_ms`.
///
/// Returns `None` when no countdown applies: the image has not been opened
/// yet (no `viewed_at` anchor) or is already expired. Re-evaluating an
/// expired image therefore never re-signals expiry.
pub fn evaluate(settings: &ImageSettings, now_ms: i64) -> Option<Countdown> {
    if settings.is_expired || !settings.is_viewed {
        return None;
    }
    let viewed_at = settings.viewed_at?;
    let Some(duration) = settings.duration else {
        return Some(Countdown::Infinite);
    };

    let end = viewed_at + i64::from(duration) * 1000;
    // Ceiling division; div_euclid floors toward negative infinity, so the
    // +999 form stays correct when the deadline is already behind now_ms.
    let remaining = (end - now_ms + 999).div_euclid(1000);
    if remaining <= 0 {
        Some(Countdown::Expire)
    } else {
        Some(Countdown::Remaining(remaining))
    }
}
