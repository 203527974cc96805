//! Wall clock derived from uptime
//!
//! The board has no battery-backed clock, so wall time is the configured
//! power-on time plus uptime.

use embassy_time::Instant;
use fillerup_hal::{LocalTime, WallClock};

use crate::config::{CLOCK_START_SECONDS, CLOCK_STYLE_24H};

/// [`WallClock`] counting from the configured start time
#[derive(Debug, Clone, Copy)]
pub struct FaceClock {
    start_seconds: u32,
    style_24h: bool,
}

impl FaceClock {
    /// Clock as configured in face.toml
    pub const fn configured() -> Self {
        Self {
            start_seconds: CLOCK_START_SECONDS,
            style_24h: CLOCK_STYLE_24H,
        }
    }
}

impl WallClock for FaceClock {
    fn now(&self) -> LocalTime {
        let uptime_s = (Instant::now().as_secs() % 86_400) as u32;
        LocalTime::from_seconds_of_day(self.start_seconds + uptime_s)
    }

    fn is_24h_style(&self) -> bool {
        self.style_24h
    }

    fn uptime_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
