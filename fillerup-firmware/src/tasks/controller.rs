//! Main controller task
//!
//! Owns the watch face and feeds it every event in arrival order. Storage
//! and layers live here too, so a handler never races another task.

use defmt::*;

use fillerup_core::state::{Event, WatchFace};
use fillerup_core::traits::{Io, RootLayer};
use fillerup_hal_rp2040::flash::Rp2040Store;

use crate::channels::EVENT_CHANNEL;
use crate::clock::FaceClock;
use crate::config::{CLOCK_STYLE_24H, FACE_CONFIG};
use crate::layers::{BannerLayer, FillLayer, HourLayer, MinuteLayer, StatusBar};
use crate::link::{LinkOutbox, SignalVibes};
use crate::timer::EmbassyTimer;

/// Root layer of the only window
const MAIN_WINDOW: RootLayer = RootLayer(0);

/// Controller task - main dispatch loop
#[embassy_executor::task]
pub async fn controller_task(mut store: Rp2040Store<'static>) {
    info!("Controller task started");

    let mut face = WatchFace::boot(FACE_CONFIG, &mut store);
    info!(
        "Settings: vibrate={} window={}..{} bt={}",
        face.settings().hour_vibrate_enabled,
        face.settings().hour_vibrate_start,
        face.settings().hour_vibrate_end,
        face.settings().bluetooth_vibrate_enabled
    );

    let mut timer = EmbassyTimer;
    let mut vibes = SignalVibes;
    let clock = FaceClock::configured();
    let mut outbox = LinkOutbox;
    let mut layers = (
        FillLayer::new(),
        HourLayer::new(CLOCK_STYLE_24H),
        MinuteLayer::new(),
    );
    let mut banner = BannerLayer::new();
    let mut status = StatusBar::new();

    let mut io = Io {
        store: &mut store,
        timer: &mut timer,
        vibes: &mut vibes,
        clock: &clock,
        outbox: &mut outbox,
        face: &mut layers,
        message: &mut banner,
        status: &mut status,
    };

    dispatch(&mut face, Event::WindowLoad(MAIN_WINDOW), &mut io);

    loop {
        let event = EVENT_CHANNEL.receive().await;
        dispatch(&mut face, event, &mut io);
    }
}

fn dispatch(face: &mut WatchFace, event: Event, io: &mut Io<'_>) {
    trace!("Event: {:?}", event);
    if let Err(e) = face.handle(event, io) {
        error!("Face error: {:?}", e);
        panic!("unrecoverable face error");
    }
}
