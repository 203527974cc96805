//! Wall clock abstraction

/// Local wall-clock reading at minute resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    /// Hour of day (0-23)
    pub hour: u8,
    /// Minute of hour (0-59)
    pub minute: u8,
    /// Second of minute (0-59)
    pub second: u8,
}

impl LocalTime {
    /// Create a reading, clamping out-of-range fields
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: if hour > 23 { 23 } else { hour },
            minute: if minute > 59 { 59 } else { minute },
            second: if second > 59 { 59 } else { second },
        }
    }

    /// Convert seconds since midnight (wrapping at 24h)
    pub const fn from_seconds_of_day(seconds: u32) -> Self {
        let seconds = seconds % 86_400;
        Self {
            hour: (seconds / 3600) as u8,
            minute: ((seconds / 60) % 60) as u8,
            second: (seconds % 60) as u8,
        }
    }
}

/// Source of local time and user clock preferences
pub trait WallClock {
    /// Current local time
    fn now(&self) -> LocalTime;

    /// Whether the user prefers a 24-hour clock
    fn is_24h_style(&self) -> bool;

    /// Monotonic milliseconds since boot
    fn uptime_ms(&self) -> u64;
}
