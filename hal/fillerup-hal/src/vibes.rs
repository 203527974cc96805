//! Vibration motor abstraction

/// Fire-and-forget vibration
///
/// The core only asks for a pulse; pattern timing and motor drive belong
/// to the implementation.
pub trait Vibes {
    /// Emit one short pulse
    fn short_pulse(&mut self);
}
