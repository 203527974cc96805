//! Vibration task
//!
//! Runs one short pulse per request. Requests arriving mid-pulse collapse
//! into a single follow-up pulse.

use defmt::*;
use fillerup_hal_rp2040::vibes::VibeMotor;

use crate::channels::VIBE_REQUEST;

/// Vibration task
#[embassy_executor::task]
pub async fn vibes_task(mut motor: VibeMotor<'static>) {
    info!("Vibes task started");

    loop {
        VIBE_REQUEST.wait().await;
        motor.short_pulse().await;
        debug!("Vibration pulse {}", motor.pulse_count());
    }
}
