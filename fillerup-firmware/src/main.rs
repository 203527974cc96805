//! Filler Up - Watch Face Firmware
//!
//! Main firmware binary for RP2040-based watch boards. The face logic
//! lives in `fillerup-core`; this binary wires it to the clock, the BLE
//! bridge UART, the vibration motor and flash.
//!
//! Pin map:
//! - GPIO0/1: UART0 TX/RX to the BLE bridge
//! - GPIO2: BLE bridge STATE (high while connected)
//! - GPIO15: vibration motor
//! - GPIO24: VBUS sense
//! - GPIO29: VSYS/3 on ADC3

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use embassy_rp::adc::{Adc, Channel, Config as AdcConfig, InterruptHandler as AdcInterruptHandler};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Input, Pull};
use embassy_rp::peripherals::UART0;
use embassy_rp::uart::{BufferedInterruptHandler, Config as UartConfig, Uart};
use static_cell::StaticCell;
use {defmt_rtt as _, panic_probe as _};

use fillerup_hal_rp2040::flash::Rp2040Store;
use fillerup_hal_rp2040::vibes::VibeMotor;

use crate::config::FACE_CONFIG;

mod channels;
mod clock;
mod config;
mod layers;
mod link;
mod tasks;
mod timer;

bind_interrupts!(struct Irqs {
    UART0_IRQ => BufferedInterruptHandler<UART0>;
    ADC_IRQ_FIFO => AdcInterruptHandler;
});

// Static cells for UART buffers (must live forever)
static TX_BUF: StaticCell<[u8; 256]> = StaticCell::new();
static RX_BUF: StaticCell<[u8; 256]> = StaticCell::new();

/// Main entry point
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("Filler Up firmware starting...");

    let p = embassy_rp::init(Default::default());

    // Preferences
    let mut store = Rp2040Store::new(p.FLASH, p.DMA_CH0);
    match store.load().await {
        Ok(found) => info!("Loaded {} stored keys", found),
        Err(e) => warn!("Preference load failed, using defaults: {:?}", e),
    }

    // Companion link: BLE bridge on UART0
    let tx_buf = TX_BUF.init([0u8; 256]);
    let rx_buf = RX_BUF.init([0u8; 256]);
    let uart = Uart::new_blocking(p.UART0, p.PIN_0, p.PIN_1, UartConfig::default());
    let uart = uart.into_buffered(Irqs, tx_buf, rx_buf);
    let (tx, rx) = uart.split();
    let link_state = Input::new(p.PIN_2, Pull::Down);

    // Vibration motor
    let motor = VibeMotor::new(p.PIN_15);

    // Battery sense
    let adc = Adc::new(p.ADC, Irqs, AdcConfig::default());
    let vsys = Channel::new_pin(p.PIN_29, Pull::None);
    let vbus = Input::new(p.PIN_24, Pull::None);

    info!(
        "Face config: settings={}ms bluetooth={}ms tick={:?}",
        FACE_CONFIG.settings_message_ms, FACE_CONFIG.bluetooth_message_ms, FACE_CONFIG.tick_unit
    );

    // Spawn tasks
    spawner.spawn(tasks::controller_task(store)).unwrap();
    spawner.spawn(tasks::message_timer_task()).unwrap();
    spawner.spawn(tasks::tick_task(FACE_CONFIG.tick_unit)).unwrap();
    spawner.spawn(tasks::link_rx_task(rx)).unwrap();
    spawner.spawn(tasks::link_tx_task(tx)).unwrap();
    spawner.spawn(tasks::link_status_task(link_state)).unwrap();
    spawner.spawn(tasks::vibes_task(motor)).unwrap();
    spawner
        .spawn(tasks::battery_task(adc, vsys, vbus))
        .unwrap();

    info!("All tasks spawned, face running");
}
