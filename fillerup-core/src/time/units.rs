//! Tick change masks

use fillerup_hal::LocalTime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Bitmask of calendar units that changed since the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeUnits(u8);

impl TimeUnits {
    pub const NONE: TimeUnits = TimeUnits(0);
    pub const SECOND: TimeUnits = TimeUnits(1 << 0);
    pub const MINUTE: TimeUnits = TimeUnits(1 << 1);
    pub const HOUR: TimeUnits = TimeUnits(1 << 2);
    pub const DAY: TimeUnits = TimeUnits(1 << 3);

    /// Raw bits
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// Returns true if every unit in `other` is set
    pub const fn contains(self, other: TimeUnits) -> bool {
        self.0 & other.0 == other.0
    }

    /// Union of both masks
    pub const fn union(self, other: TimeUnits) -> Self {
        TimeUnits(self.0 | other.0)
    }

    /// Units that differ between two readings
    ///
    /// Without a previous reading only the finest unit in `now` counts as
    /// changed, so a first tick never looks like an hour boundary.
    pub fn between(previous: Option<LocalTime>, now: LocalTime) -> Self {
        let Some(prev) = previous else {
            return TimeUnits::SECOND.union(TimeUnits::MINUTE);
        };

        let mut changed = TimeUnits::NONE;
        if prev.second != now.second {
            changed = changed.union(TimeUnits::SECOND);
        }
        if prev.minute != now.minute || prev.hour != now.hour {
            changed = changed.union(TimeUnits::MINUTE);
        }
        if prev.hour != now.hour {
            changed = changed.union(TimeUnits::HOUR);
            if now.hour < prev.hour {
                changed = changed.union(TimeUnits::DAY);
            }
        }
        changed
    }
}

impl core::ops::BitOr for TimeUnits {
    type Output = TimeUnits;

    fn bitor(self, rhs: TimeUnits) -> TimeUnits {
        self.union(rhs)
    }
}

/// Resolution of the tick subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TickUnit {
    /// Tick every second (simulated-time runs)
    Second,
    /// Tick every minute
    #[default]
    Minute,
}

impl TickUnit {
    /// Tick period in milliseconds
    pub const fn period_ms(self) -> u32 {
        match self {
            TickUnit::Second => 1_000,
            TickUnit::Minute => 60_000,
        }
    }

    /// Returns true if a reading that changed `changed` should be
    /// delivered at this resolution
    ///
    /// Coarser units imply finer ones, so a reading that only moved the
    /// hour still wakes a second subscriber.
    pub const fn wants(self, changed: TimeUnits) -> bool {
        match self {
            TickUnit::Second => changed.bits() != 0,
            TickUnit::Minute => changed.contains(TimeUnits::MINUTE),
        }
    }
}
