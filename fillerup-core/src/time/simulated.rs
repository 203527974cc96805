//! Stepping clock for simulated runs
//!
//! Replays a scripted sequence of wall-clock readings so a whole day of
//! face updates can be watched in a minute. Each scenario starts at a
//! fixed epoch time and advances by a fixed step per tick; after the last
//! step the next scenario (or the first again) begins.

use fillerup_hal::LocalTime;

/// Jan 1, 2015 00:00:00 UTC
pub const DEFAULT_START_EPOCH: u32 = 1_420_070_400;

/// 61 minutes, so every step moves both the hour and the minute
pub const DEFAULT_STEP_SECONDS: u32 = 3_660;

/// Steps per scenario
pub const DEFAULT_STEP_COUNT: u16 = 60;

/// One scripted run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Scenario {
    /// Epoch seconds of the first reading
    pub start_epoch: u32,
    /// Seconds added per step
    pub step_seconds: u32,
    /// Readings before moving on
    pub step_count: u16,
}

impl Default for Scenario {
    fn default() -> Self {
        Self {
            start_epoch: DEFAULT_START_EPOCH,
            step_seconds: DEFAULT_STEP_SECONDS,
            step_count: DEFAULT_STEP_COUNT,
        }
    }
}

/// Clock that advances one scripted step per call
#[derive(Debug, Clone)]
pub struct SimulatedClock<'a> {
    scenarios: &'a [Scenario],
    scenario: usize,
    step: u16,
    epoch: u32,
}

impl<'a> SimulatedClock<'a> {
    /// Create a clock over `scenarios`; an empty slice yields a clock
    /// frozen at [`DEFAULT_START_EPOCH`]
    pub fn new(scenarios: &'a [Scenario]) -> Self {
        Self {
            scenarios,
            scenario: 0,
            step: 0,
            epoch: DEFAULT_START_EPOCH,
        }
    }

    /// Epoch seconds of the most recent reading
    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    /// Produce the next reading (UTC)
    pub fn advance(&mut self) -> LocalTime {
        let Some(mut current) = self.scenarios.get(self.scenario).copied() else {
            return LocalTime::from_seconds_of_day(self.epoch);
        };

        if self.step >= current.step_count {
            self.step = 0;
            self.scenario = (self.scenario + 1) % self.scenarios.len();
            current = self.scenarios[self.scenario];
        }

        if self.step == 0 {
            self.epoch = current.start_epoch;
        } else {
            self.epoch = self.epoch.wrapping_add(current.step_seconds);
        }
        self.step += 1;

        LocalTime::from_seconds_of_day(self.epoch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scenario_steps() {
        let scenarios = [Scenario::default()];
        let mut clock = SimulatedClock::new(&scenarios);

        assert_eq!(clock.advance(), LocalTime::new(0, 0, 0));
        assert_eq!(clock.advance(), LocalTime::new(1, 1, 0));
        assert_eq!(clock.advance(), LocalTime::new(2, 2, 0));
    }

    #[test]
    fn test_restarts_after_step_count() {
        let scenarios = [Scenario {
            start_epoch: 0,
            step_seconds: 60,
            step_count: 2,
        }];
        let mut clock = SimulatedClock::new(&scenarios);

        assert_eq!(clock.advance(), LocalTime::new(0, 0, 0));
        assert_eq!(clock.advance(), LocalTime::new(0, 1, 0));
        assert_eq!(clock.advance(), LocalTime::new(0, 0, 0));
    }

    #[test]
    fn test_moves_to_next_scenario() {
        let scenarios = [
            Scenario {
                start_epoch: 0,
                step_seconds: 60,
                step_count: 1,
            },
            Scenario {
                start_epoch: 12 * 3600,
                step_seconds: 60,
                step_count: 1,
            },
        ];
        let mut clock = SimulatedClock::new(&scenarios);

        assert_eq!(clock.advance().hour, 0);
        assert_eq!(clock.advance().hour, 12);
        assert_eq!(clock.advance().hour, 0);
    }

    #[test]
    fn test_empty_is_frozen() {
        let mut clock = SimulatedClock::new(&[]);
        assert_eq!(clock.advance(), clock.advance());
    }
}
