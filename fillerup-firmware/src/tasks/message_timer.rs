//! Overlay timer task
//!
//! Sleeps until the earliest registered deadline and reports every due
//! timer to the controller.

use defmt::*;
use embassy_futures::select::{select, Either};
use embassy_time::{Instant, Timer};
use fillerup_core::state::Event;

use crate::channels::{EVENT_CHANNEL, TIMER_WAKE};
use crate::timer::TIMERS;

/// Message timer task
#[embassy_executor::task]
pub async fn message_timer_task() {
    info!("Message timer task started");

    loop {
        let next = TIMERS.lock(|table| table.borrow().earliest());

        match next {
            Some(at) => {
                // Woken early when the table changes
                if let Either::First(()) = select(Timer::at(at), TIMER_WAKE.wait()).await {
                    fire_due().await;
                }
            }
            None => TIMER_WAKE.wait().await,
        }
    }
}

async fn fire_due() {
    let due = TIMERS.lock(|table| table.borrow_mut().take_due(Instant::now()));
    for id in due {
        debug!("Timer {} fired", id.0);
        EVENT_CHANNEL.send(Event::MessageTimerFired(id)).await;
    }
}
