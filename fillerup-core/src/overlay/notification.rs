//! Notification slot state machine

use fillerup_hal::{AppTimer, TimerId};
use heapless::String;

use crate::config::MAX_MESSAGE_LEN;
use crate::traits::{MessageLayer, RootLayer};

/// A request to show text for a while
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationRequest<'a> {
    /// Text to show, truncated to [`MAX_MESSAGE_LEN`] bytes
    pub text: &'a str,
    /// Dismiss this many milliseconds after the latest show
    pub expires_after_ms: u32,
}

/// Dismissal timer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Slot {
    /// No dismissal pending
    Idle,
    /// Dismissal armed
    Pending {
        /// Timer that will dismiss the overlay
        timer: TimerId,
        /// Uptime at which it is due (ms)
        deadline_ms: u64,
    },
}

/// How [`NotificationOverlay::show`] armed the dismissal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ShowOutcome {
    /// A fresh timer was registered
    Registered(TimerId),
    /// The pending timer was pushed back
    Rescheduled(TimerId),
    /// No timer could be registered; the text stays until the next show
    Untimed,
}

/// Single-slot overlay with debounced dismissal
#[derive(Debug, Clone)]
pub struct NotificationOverlay {
    slot: Slot,
    text: Option<String<MAX_MESSAGE_LEN>>,
}

impl Default for NotificationOverlay {
    fn default() -> Self {
        Self::new()
    }
}

/// Copy `text`, cut at the last char boundary that fits
fn truncate(text: &str) -> String<MAX_MESSAGE_LEN> {
    let mut out = String::new();
    for ch in text.chars() {
        if out.push(ch).is_err() {
            break;
        }
    }
    out
}

impl NotificationOverlay {
    /// Create an empty overlay
    pub const fn new() -> Self {
        Self {
            slot: Slot::Idle,
            text: None,
        }
    }

    /// Show `request`, arming or pushing back the dismissal timer
    pub fn show(
        &mut self,
        request: NotificationRequest<'_>,
        now_ms: u64,
        root: RootLayer,
        timer: &mut dyn AppTimer,
        layer: &mut dyn MessageLayer,
    ) -> ShowOutcome {
        let after = request.expires_after_ms;
        let deadline_ms = now_ms.saturating_add(after as u64);

        let mut outcome = None;
        if let Slot::Pending { timer: id, .. } = self.slot {
            if timer.reschedule(id, after) {
                self.slot = Slot::Pending {
                    timer: id,
                    deadline_ms,
                };
                outcome = Some(ShowOutcome::Rescheduled(id));
            } else {
                debug!("overlay: timer {} no longer pending", id.0);
                self.slot = Slot::Idle;
            }
        }

        let outcome = match outcome {
            Some(outcome) => outcome,
            None => match timer.register(after) {
                Ok(id) => {
                    self.slot = Slot::Pending {
                        timer: id,
                        deadline_ms,
                    };
                    ShowOutcome::Registered(id)
                }
                Err(e) => {
                    warn!("overlay: cannot arm dismissal: {:?}", e);
                    ShowOutcome::Untimed
                }
            },
        };

        if self.text.is_none() {
            layer.create(root);
        }
        let text = truncate(request.text);
        layer.draw(&text);
        self.text = Some(text);

        outcome
    }

    /// Handle a timer fire
    ///
    /// Returns true if it dismissed the overlay. Fires for any id other
    /// than the pending one are stale and ignored.
    pub fn on_timer_fired(&mut self, id: TimerId, layer: &mut dyn MessageLayer) -> bool {
        match self.slot {
            Slot::Pending { timer, .. } if timer == id => {
                self.slot = Slot::Idle;
                if self.text.take().is_some() {
                    layer.destroy();
                }
                true
            }
            _ => {
                debug!("overlay: stale timer {}", id.0);
                false
            }
        }
    }

    /// Cancel any pending dismissal and remove the overlay now
    pub fn teardown(&mut self, timer: &mut dyn AppTimer, layer: &mut dyn MessageLayer) {
        if let Slot::Pending { timer: id, .. } = self.slot {
            timer.cancel(id);
        }
        self.slot = Slot::Idle;
        if self.text.take().is_some() {
            layer.destroy();
        }
    }

    /// Dismissal timer state
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Whether a message layer is on screen
    pub fn is_visible(&self) -> bool {
        self.text.is_some()
    }

    /// Currently shown text
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Uptime at which the overlay will be dismissed, if armed
    pub fn deadline_ms(&self) -> Option<u64> {
        match self.slot {
            Slot::Pending { deadline_ms, .. } => Some(deadline_ms),
            Slot::Idle => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeTimer, RecordingMessage};

    const ROOT: RootLayer = RootLayer(1);

    fn request(text: &str, ms: u32) -> NotificationRequest<'_> {
        NotificationRequest {
            text,
            expires_after_ms: ms,
        }
    }

    #[test]
    fn test_show_registers_and_materialises() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        let outcome = overlay.show(request("hello", 3000), 0, ROOT, &mut timer, &mut layer);

        assert!(matches!(outcome, ShowOutcome::Registered(_)));
        assert_eq!(overlay.deadline_ms(), Some(3000));
        assert_eq!(layer.created, 1);
        assert_eq!(layer.texts, ["hello"]);
    }

    #[test]
    fn test_second_show_extends_deadline() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        let first = overlay.show(request("a", 1500), 0, ROOT, &mut timer, &mut layer);
        assert!(timer.advance_to(100).is_empty());
        let second = overlay.show(request("b", 1500), 100, ROOT, &mut timer, &mut layer);

        let ShowOutcome::Registered(id) = first else {
            panic!("expected registration, got {:?}", first);
        };
        assert_eq!(second, ShowOutcome::Rescheduled(id));
        assert_eq!(timer.registered(), 1);
        assert_eq!(layer.created, 1);

        // Not dismissed at the first deadline
        assert!(timer.advance_to(1500).is_empty());
        assert!(overlay.is_visible());

        // Dismissed 1500 ms after the second show
        let fired = timer.advance_to(1600);
        assert_eq!(fired, [id]);
        assert!(overlay.on_timer_fired(id, &mut layer));
        assert!(!overlay.is_visible());
        assert_eq!(overlay.slot(), Slot::Idle);
        assert_eq!(layer.destroyed, 1);
    }

    #[test]
    fn test_reschedule_failure_registers_fresh_timer() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        let first = overlay.show(request("a", 1000), 0, ROOT, &mut timer, &mut layer);
        let ShowOutcome::Registered(old) = first else {
            panic!("expected registration, got {:?}", first);
        };

        // Timer fired but its event has not been handled yet
        assert_eq!(timer.advance_to(1000), [old]);
        let second = overlay.show(request("b", 1000), 1000, ROOT, &mut timer, &mut layer);
        let ShowOutcome::Registered(new) = second else {
            panic!("expected registration, got {:?}", second);
        };
        assert_ne!(old, new);

        // The late fire for the old timer must not dismiss the new text
        assert!(!overlay.on_timer_fired(old, &mut layer));
        assert_eq!(overlay.text(), Some("b"));
        assert_eq!(layer.created, 1);
        assert_eq!(layer.destroyed, 0);
    }

    #[test]
    fn test_stale_fire_after_teardown_is_ignored() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        let outcome = overlay.show(request("a", 1000), 0, ROOT, &mut timer, &mut layer);
        let ShowOutcome::Registered(id) = outcome else {
            panic!("expected registration, got {:?}", outcome);
        };
        overlay.teardown(&mut timer, &mut layer);

        assert!(!timer.is_pending(id));
        assert!(!overlay.on_timer_fired(id, &mut layer));
        assert_eq!(layer.destroyed, 1);
    }

    #[test]
    fn test_teardown_when_idle_is_noop() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        overlay.teardown(&mut timer, &mut layer);
        assert_eq!(layer.destroyed, 0);
    }

    #[test]
    fn test_registration_failure_still_shows() {
        let mut timer = FakeTimer::new();
        timer.set_exhausted(true);
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        let outcome = overlay.show(request("a", 1000), 0, ROOT, &mut timer, &mut layer);
        assert_eq!(outcome, ShowOutcome::Untimed);
        assert_eq!(overlay.slot(), Slot::Idle);
        assert!(overlay.is_visible());

        // Next show arms a timer once one is available
        timer.set_exhausted(false);
        let outcome = overlay.show(request("b", 1000), 10, ROOT, &mut timer, &mut layer);
        assert!(matches!(outcome, ShowOutcome::Registered(_)));
        assert_eq!(layer.created, 1);
    }

    #[test]
    fn test_text_truncated_on_char_boundary() {
        let mut timer = FakeTimer::new();
        let mut layer = RecordingMessage::default();
        let mut overlay = NotificationOverlay::new();

        // 63 ASCII bytes then a two-byte char that does not fit
        let mut long = std::string::String::from("x").repeat(63);
        long.push('é');
        overlay.show(request(&long, 1000), 0, ROOT, &mut timer, &mut layer);

        assert_eq!(overlay.text().map(str::len), Some(63));
    }
}
