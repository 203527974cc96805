//! Outbound message queue

use fillerup_protocol::{DeliveryError, Dictionary};

/// Queue dictionaries for the companion
///
/// `send` only enqueues. Delivery is reported later as an `OutboxSent` or
/// `OutboxFailed` event.
pub trait Outbox {
    /// Enqueue `dict`
    fn send(&mut self, dict: &Dictionary) -> Result<(), DeliveryError>;
}
