//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;

use fillerup_core::state::Event;
use fillerup_protocol::LinkMessage;

/// Channel capacity for face events
const EVENT_CHANNEL_SIZE: usize = 8;

/// Channel capacity for outgoing link messages
const LINK_TX_CHANNEL_SIZE: usize = 4;

/// Everything the face reacts to; the controller task is the only receiver
pub static EVENT_CHANNEL: Channel<CriticalSectionRawMutex, Event, EVENT_CHANNEL_SIZE> =
    Channel::new();

/// Messages queued for the companion
pub static LINK_TX_CHANNEL: Channel<CriticalSectionRawMutex, LinkMessage, LINK_TX_CHANNEL_SIZE> =
    Channel::new();

/// Latest ack or nack from the companion, for the push in flight
pub static LINK_ANSWERED: Signal<CriticalSectionRawMutex, LinkMessage> = Signal::new();

/// Signal that a vibration pulse was requested
pub static VIBE_REQUEST: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Signal that the overlay timer table changed
pub static TIMER_WAKE: Signal<CriticalSectionRawMutex, ()> = Signal::new();
