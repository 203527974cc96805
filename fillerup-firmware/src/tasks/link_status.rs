//! Companion link state monitor
//!
//! The BLE module raises its STATE pin while a central is connected.

use defmt::*;
use embassy_rp::gpio::Input;
use embassy_time::Timer;
use fillerup_core::state::Event;

use crate::channels::EVENT_CHANNEL;

/// Debounce after an edge (ms)
const DEBOUNCE_MS: u64 = 50;

/// Link status task - reports the initial state, then every change
#[embassy_executor::task]
pub async fn link_status_task(mut state_pin: Input<'static>) {
    info!("Link status task started");

    let mut reported: Option<bool> = None;
    loop {
        let connected = state_pin.is_high();
        if reported != Some(connected) {
            reported = Some(connected);
            debug!("Link {}", if connected { "connected" } else { "disconnected" });
            EVENT_CHANNEL.send(Event::Bluetooth { connected }).await;
        }

        state_pin.wait_for_any_edge().await;
        Timer::after_millis(DEBOUNCE_MS).await;
    }
}
