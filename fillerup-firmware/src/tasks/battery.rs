//! Battery monitor task
//!
//! VSYS is read through the board's 1:3 divider on ADC3; VBUS presence is
//! a plain GPIO.

use defmt::*;
use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Input;
use embassy_time::{Duration, Ticker};
use fillerup_core::state::{BatteryState, Event};

use crate::channels::EVENT_CHANNEL;

/// Sampling interval
const SAMPLE_INTERVAL: Duration = Duration::from_secs(60);

/// Cell voltage treated as empty (mV)
const EMPTY_MV: u32 = 3300;

/// Cell voltage treated as full (mV)
const FULL_MV: u32 = 4200;

/// Convert a raw 12-bit VSYS reading to a charge estimate
fn charge_percent(raw: u16) -> u8 {
    let mv = raw as u32 * 3 * 3300 / 4096;
    let clamped = mv.clamp(EMPTY_MV, FULL_MV);
    ((clamped - EMPTY_MV) * 100 / (FULL_MV - EMPTY_MV)) as u8
}

/// Battery task - posts a battery event when the reading changes
#[embassy_executor::task]
pub async fn battery_task(
    mut adc: Adc<'static, Async>,
    mut vsys: Channel<'static>,
    vbus: Input<'static>,
) {
    info!("Battery task started");

    let mut ticker = Ticker::every(SAMPLE_INTERVAL);
    let mut last: Option<BatteryState> = None;

    loop {
        match adc.read(&mut vsys).await {
            Ok(raw) => {
                let charge = charge_percent(raw);
                let plugged = vbus.is_high();
                let battery = BatteryState {
                    charge_percent: charge,
                    is_charging: plugged && charge < 100,
                    is_plugged: plugged,
                };
                if last != Some(battery) {
                    last = Some(battery);
                    EVENT_CHANNEL.send(Event::Battery(battery)).await;
                }
            }
            Err(e) => {
                warn!("VSYS read failed: {:?}", e);
            }
        }

        ticker.next().await;
    }
}
