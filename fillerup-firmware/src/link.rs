//! Core collaborators backed by task channels

use fillerup_core::traits::Outbox;
use fillerup_hal::Vibes;
use fillerup_protocol::{DeliveryError, Dictionary, LinkMessage};

use crate::channels::{LINK_TX_CHANNEL, VIBE_REQUEST};

/// Queues pushes for `link_tx_task`
pub struct LinkOutbox;

impl Outbox for LinkOutbox {
    fn send(&mut self, dict: &Dictionary) -> Result<(), DeliveryError> {
        LINK_TX_CHANNEL
            .try_send(LinkMessage::Push(dict.clone()))
            .map_err(|_| DeliveryError::Busy)
    }
}

/// Requests pulses from `vibes_task`
pub struct SignalVibes;

impl Vibes for SignalVibes {
    fn short_pulse(&mut self) {
        VIBE_REQUEST.signal(());
    }
}
