//! Events delivered to the face

use fillerup_hal::{LocalTime, TimerId};
use fillerup_protocol::{DeliveryError, Dictionary};

use super::connectivity::BatteryState;
use crate::time::TimeUnits;
use crate::traits::RootLayer;

/// Host callbacks, as data
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Event {
    // Window lifecycle
    /// Window is on screen; create layers under the root
    WindowLoad(RootLayer),
    /// Window is going away; destroy layers
    WindowUnload,

    // Time
    /// Tick subscription fired
    Tick { time: LocalTime, changed: TimeUnits },

    // Connectivity
    /// Companion link state report
    Bluetooth { connected: bool },
    /// Battery state report
    Battery(BatteryState),

    // Companion messaging
    /// Dictionary received from the companion
    InboxReceived(Dictionary),
    /// Inbound message lost
    InboxDropped(DeliveryError),
    /// Companion acknowledged this dictionary
    OutboxSent(Dictionary),
    /// Companion did not take this dictionary
    OutboxFailed {
        dict: Dictionary,
        reason: DeliveryError,
    },

    // Timers
    /// Overlay dismissal timer fired
    MessageTimerFired(TimerId),
}
