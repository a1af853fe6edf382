//! Per-image lifecycle: which phase an image is in and which transitions are
//! allowed. Phases are derived from the stored [`ImageSettings`] fields, so
//! the model reacts to whatever record was last received; sender and receiver
//! copies are not actively synchronized.

use crate::timer::{self, Countdown};
use crate::types::ImageSettings;

/// Receiver-side phase of a self-destructing image.
///
/// `Expired` is terminal: both transitions guard on it, so re-entering
/// `Viewing` is impossible no matter how often the record is re-evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReceiverPhase {
    /// Not yet opened. The payload stays hidden behind a confirm action.
    Locked,
    /// Opened; the countdown runs (or never ends, for unlimited duration).
    Viewing,
    Expired,
}

/// Sender-side, read-only mirror of the peer's progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SenderPhase {
    /// Delivered, not yet opened by the peer.
    Sent,
    /// The peer opened it and the countdown is running.
    SeenCountingDown,
    Expired,
}

pub fn receiver_phase(settings: &ImageSettings) -> ReceiverPhase {
    if settings.is_expired {
        ReceiverPhase::Expired
    } else if settings.is_viewed {
        ReceiverPhase::Viewing
    } else {
        ReceiverPhase::Locked
    }
}

pub fn sender_phase(settings: &ImageSettings) -> SenderPhase {
    if settings.is_expired {
        SenderPhase::Expired
    } else if settings.is_viewed {
        SenderPhase::SeenCountingDown
    } else {
        SenderPhase::Sent
    }
}

/// Receipt for a granted view transition: the anchor the countdown will
/// derive from. Only produced once per image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ViewReceipt {
    pub viewed_at_ms: i64,
}

/// Request the `Locked -> Viewing` transition at `now_ms`.
///
/// Returns `None` for anything but a locked image: viewing an already-viewed
/// or expired image is a no-op, and `viewed_at` is never overwritten.
pub fn request_view(settings: &ImageSettings, now_ms: i64) -> Option<ViewReceipt> {
    match receiver_phase(settings) {
        ReceiverPhase::Locked => Some(ViewReceipt {
            viewed_at_ms: now_ms,
        }),
        ReceiverPhase::Viewing | ReceiverPhase::Expired => None,
    }
}

/// Request the `* -> Expired` transition at `now_ms`.
///
/// True only when the countdown has actually reached its deadline and the
/// image is not already expired; repeated evaluations after the transition
/// are no-ops.
pub fn request_expire(settings: &ImageSettings, now_ms: i64) -> bool {
    matches!(timer::evaluate(settings, now_ms), Some(Countdown::Expire))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn locked(duration: Option<u32>) -> ImageSettings {
        ImageSettings::with_duration(duration)
    }

    fn apply_view(settings: &mut ImageSettings, receipt: ViewReceipt) {
        settings.is_viewed = true;
        settings.viewed_at = Some(receipt.viewed_at_ms);
    }

    #[test]
    fn locked_image_grants_exactly_one_view() {
        let mut settings = locked(Some(30));
        assert_eq!(receiver_phase(&settings), ReceiverPhase::Locked);

        let receipt = request_view(&settings, 1_000).unwrap();
        assert_eq!(receipt.viewed_at_ms, 1_000);
        apply_view(&mut settings, receipt);

        assert_eq!(receiver_phase(&settings), ReceiverPhase::Viewing);
        // Second attempt is rejected; viewedAt stays at the first open.
        assert_eq!(request_view(&settings, 9_000), None);
        assert_eq!(settings.viewed_at, Some(1_000));
    }

    #[test]
    fn expired_image_cannot_be_viewed_again() {
        let settings = ImageSettings {
            duration: Some(30),
            is_viewed: true,
            viewed_at: Some(1_000),
            is_expired: true,
        };
        assert_eq!(receiver_phase(&settings), ReceiverPhase::Expired);
        assert_eq!(request_view(&settings, 50_000), None);
    }

    #[test]
    fn expire_fires_once_at_deadline() {
        let mut settings = locked(Some(30));
        let receipt = request_view(&settings, 1_000).unwrap();
        apply_view(&mut settings, receipt);

        assert!(!request_expire(&settings, 30_000));
        assert!(request_expire(&settings, 31_001));

        settings.is_expired = true;
        // Already expired: re-evaluation must not re-fire.
        assert!(!request_expire(&settings, 40_000));
    }

    #[test]
    fn unlimited_image_never_reaches_expired() {
        let mut settings = locked(None);
        let receipt = request_view(&settings, 1_000).unwrap();
        apply_view(&mut settings, receipt);
        assert!(!request_expire(&settings, i64::MAX / 2));
        assert_eq!(receiver_phase(&settings), ReceiverPhase::Viewing);
    }

    #[test]
    fn sender_phase_mirrors_receiver_progress() {
        let mut settings = locked(Some(30));
        assert_eq!(sender_phase(&settings), SenderPhase::Sent);

        let receipt = request_view(&settings, 1_000).unwrap();
        apply_view(&mut settings, receipt);
        assert_eq!(sender_phase(&settings), SenderPhase::SeenCountingDown);

        settings.is_expired = true;
        assert_eq!(sender_phase(&settings), SenderPhase::Expired);
    }
}
