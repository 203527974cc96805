//! Vibration motor driver
//!
//! A single GPIO drives the motor transistor. Pulses are awaited by the
//! vibration task; the core requests them through a signal.

use embassy_rp::gpio::{Level, Output, Pin};
use embassy_rp::Peri;
use embassy_time::{Duration, Timer};

/// Length of a short pulse
pub const SHORT_PULSE: Duration = Duration::from_millis(150);

/// GPIO vibration motor
pub struct VibeMotor<'d> {
    pin: Output<'d>,
    pulses: u32,
}

impl<'d> VibeMotor<'d> {
    /// Create a motor driver; the motor starts off
    pub fn new<P: Pin>(pin: Peri<'d, P>) -> Self {
        Self {
            pin: Output::new(pin, Level::Low),
            pulses: 0,
        }
    }

    /// Run the motor for `duration`
    pub async fn pulse(&mut self, duration: Duration) {
        self.pin.set_high();
        Timer::after(duration).await;
        self.pin.set_low();
        self.pulses = self.pulses.wrapping_add(1);
    }

    /// Run one short pulse
    pub async fn short_pulse(&mut self) {
        self.pulse(SHORT_PULSE).await
    }

    /// Pulses emitted since boot
    pub fn pulse_count(&self) -> u32 {
        self.pulses
    }
}
