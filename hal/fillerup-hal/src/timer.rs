//! One-shot application timers
//!
//! Mirrors the host's app-timer facility: register a callback delay,
//! reschedule it while pending, or cancel it. The fire itself is delivered
//! back to the core as an event carrying the [`TimerId`].

/// Handle to a registered timer
///
/// Hosts must never reuse an id, so a fire that races a cancel can be
/// recognised as stale by comparing ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub u32);

impl TimerId {
    /// Id following this one
    pub const fn next(self) -> Self {
        TimerId(self.0.wrapping_add(1))
    }
}

/// Errors from the timer facility
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerError {
    /// No timer slots left
    Exhausted,
}

/// Application timer facility
pub trait AppTimer {
    /// Register a timer that fires once after `after_ms`
    fn register(&mut self, after_ms: u32) -> Result<TimerId, TimerError>;

    /// Move a pending timer to fire `after_ms` from now
    ///
    /// Returns `false` if the timer is no longer pending (already fired or
    /// cancelled). The id is then dead and must not be used again.
    fn reschedule(&mut self, id: TimerId, after_ms: u32) -> bool;

    /// Cancel a pending timer; unknown ids are ignored
    fn cancel(&mut self, id: TimerId);
}
