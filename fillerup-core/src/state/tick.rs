//! Tick fan-out and hourly vibration

use fillerup_hal::{LocalTime, Vibes};

use crate::settings::Settings;
use crate::time::TimeUnits;
use crate::traits::LayerSet;

/// Result of handling one tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TickOutcome {
    /// Layers that were redrawn
    pub layers_drawn: u8,
    /// The hourly buzz fired
    pub vibrated: bool,
}

/// Forwards each tick to every face layer
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    last: Option<LocalTime>,
    ticks: u32,
}

impl TickScheduler {
    /// Scheduler that has seen no ticks
    pub const fn new() -> Self {
        Self {
            last: None,
            ticks: 0,
        }
    }

    /// Redraw every layer for `time`; buzz on an hour boundary when the
    /// settings allow it
    pub fn on_tick(
        &mut self,
        time: LocalTime,
        changed: TimeUnits,
        settings: &Settings,
        face: &mut dyn LayerSet,
        vibes: &mut dyn Vibes,
    ) -> TickOutcome {
        let layers_drawn = Self::redraw(time, face);

        let vibrated = changed.contains(TimeUnits::HOUR) && settings.hour_vibrate_due(time.hour);
        if vibrated {
            debug!("tick: hourly vibration at {}", time.hour);
            vibes.short_pulse();
        }

        self.last = Some(time);
        self.ticks = self.ticks.wrapping_add(1);

        TickOutcome {
            layers_drawn,
            vibrated,
        }
    }

    /// Draw every layer for `time` without counting a tick
    ///
    /// Returns the number of layers drawn
    pub fn redraw(time: LocalTime, face: &mut dyn LayerSet) -> u8 {
        let mut layers_drawn = 0u8;
        face.for_each_layer(&mut |layer| {
            layer.draw(time.hour, time.minute);
            layers_drawn = layers_drawn.saturating_add(1);
        });
        layers_drawn
    }

    /// Time of the most recent tick
    pub fn last(&self) -> Option<LocalTime> {
        self.last
    }

    /// Ticks handled since boot
    pub fn tick_count(&self) -> u32 {
        self.ticks
    }
}
