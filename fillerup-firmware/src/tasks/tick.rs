//! Tick task for wall-clock updates
//!
//! Samples the clock once per second and posts a `Tick` event whenever
//! the configured unit changed.

use defmt::*;
use embassy_time::{Duration, Ticker};
use fillerup_core::state::Event;
use fillerup_core::time::{TickUnit, TimeUnits};
use fillerup_hal::LocalTime;

use crate::channels::EVENT_CHANNEL;

#[cfg(feature = "simulated-time")]
use fillerup_core::time::{
    simulated::{DEFAULT_START_EPOCH, DEFAULT_STEP_COUNT, DEFAULT_STEP_SECONDS},
    Scenario, SimulatedClock,
};

/// Sampling interval
const SAMPLE_INTERVAL: Duration = Duration::from_millis(TickUnit::Second.period_ms() as u64);

#[cfg(feature = "simulated-time")]
static SCENARIOS: [Scenario; 1] = [Scenario {
    start_epoch: DEFAULT_START_EPOCH,
    step_seconds: DEFAULT_STEP_SECONDS,
    step_count: DEFAULT_STEP_COUNT,
}];

/// Tick task - posts tick events at `unit` resolution
#[embassy_executor::task]
pub async fn tick_task(unit: TickUnit) {
    info!("Tick task started ({:?})", unit);

    let mut ticker = Ticker::every(SAMPLE_INTERVAL);
    let mut last: Option<LocalTime> = None;

    #[cfg(feature = "simulated-time")]
    let mut clock = SimulatedClock::new(&SCENARIOS);
    #[cfg(not(feature = "simulated-time"))]
    let clock = crate::clock::FaceClock::configured();

    loop {
        ticker.next().await;

        #[cfg(feature = "simulated-time")]
        let now = clock.advance();
        #[cfg(not(feature = "simulated-time"))]
        let now = fillerup_hal::WallClock::now(&clock);

        let changed = TimeUnits::between(last, now);
        last = Some(now);

        if unit.wants(changed) {
            trace!("Tick {}:{} changed={}", now.hour, now.minute, changed.bits());
            EVENT_CHANNEL.send(Event::Tick { time: now, changed }).await;
        }
    }
}
