//! Watch face context
//!
//! Owns all face state. Host collaborators are borrowed per call through
//! [`Io`], so the same instance runs against hardware or test fakes.

use fillerup_hal::{PersistentStore, StoreError};
use fillerup_protocol::Dictionary;

use super::connectivity::{BatteryState, ConnectivityState, LinkChange};
use super::events::Event;
use super::tick::TickScheduler;
use crate::config::{FaceConfig, BLUETOOTH_LOST_TEXT, NEW_VERSION_TEXT, SETTINGS_RECEIVED_TEXT};
use crate::overlay::{NotificationOverlay, NotificationRequest};
use crate::pairing::{PairingChannel, Received};
use crate::settings::Settings;
use crate::time::TimeUnits;
use crate::traits::{Io, RootLayer};

/// Errors that escape event handling
///
/// Only storage writes are fatal; everything else is logged and absorbed
/// by the handler that hit it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaceError {
    /// Persisting settings failed
    Storage(StoreError),
}

impl From<StoreError> for FaceError {
    fn from(e: StoreError) -> Self {
        FaceError::Storage(e)
    }
}

/// The running watch face
#[derive(Debug, Clone)]
pub struct WatchFace {
    config: FaceConfig,
    settings: Settings,
    overlay: NotificationOverlay,
    ticker: TickScheduler,
    connectivity: ConnectivityState,
    pairing: PairingChannel,
    root: Option<RootLayer>,
}

impl WatchFace {
    /// Load settings and build the face; no layers exist until `WindowLoad`
    pub fn boot(config: FaceConfig, store: &mut dyn PersistentStore) -> Self {
        let settings = Settings::load(store);
        Self {
            config,
            settings,
            overlay: NotificationOverlay::new(),
            ticker: TickScheduler::new(),
            connectivity: ConnectivityState::new(),
            pairing: PairingChannel::new(),
            root: None,
        }
    }

    /// Dispatch one event
    pub fn handle(&mut self, event: Event, io: &mut Io<'_>) -> Result<(), FaceError> {
        match event {
            Event::WindowLoad(root) => self.on_window_load(root, io),
            Event::WindowUnload => self.on_window_unload(io),
            Event::Tick { time, changed } => {
                if self.root.is_none() {
                    trace!("face: tick before window load");
                    return Ok(());
                }
                self.ticker
                    .on_tick(time, changed, &self.settings, io.face, io.vibes);
            }
            Event::Bluetooth { connected } => self.on_bluetooth(connected, io),
            Event::Battery(battery) => self.on_battery(battery, io),
            Event::InboxReceived(dict) => self.on_inbox_received(&dict, io)?,
            Event::InboxDropped(reason) => self.pairing.on_dropped(reason),
            Event::OutboxSent(dict) => self.pairing.on_sent(&dict, io.store)?,
            Event::OutboxFailed { dict, reason } => self.pairing.on_failed(&dict, reason),
            Event::MessageTimerFired(id) => {
                self.overlay.on_timer_fired(id, io.message);
            }
        }
        Ok(())
    }

    /// Tear everything down before exit
    pub fn shutdown(&mut self, io: &mut Io<'_>) {
        self.on_window_unload(io);
        info!("face: shut down after {} ticks", self.ticker.tick_count());
    }

    fn on_window_load(&mut self, root: RootLayer, io: &mut Io<'_>) {
        if self.root.is_some() {
            warn!("face: duplicate window load ignored");
            return;
        }
        self.root = Some(root);
        io.face.for_each_layer(&mut |layer| layer.create(root));

        // Indicators start from whatever was reported before the window
        io.status.create(root);
        if let Some(connected) = self.connectivity.bluetooth_connected() {
            io.status.show_bluetooth(connected);
        }
        if let Some(battery) = self.connectivity.battery() {
            io.status.show_battery(battery);
        }

        // First frame without waiting for the next tick
        self.ticker.on_tick(
            io.clock.now(),
            TimeUnits::NONE,
            &self.settings,
            io.face,
            io.vibes,
        );
        debug!("face: window loaded");
    }

    fn on_window_unload(&mut self, io: &mut Io<'_>) {
        if self.root.take().is_none() {
            warn!("face: window unload without load ignored");
            return;
        }
        self.overlay.teardown(io.timer, io.message);
        io.status.destroy();
        io.face.for_each_layer(&mut |layer| layer.destroy());
        debug!("face: window unloaded");
    }

    fn on_bluetooth(&mut self, connected: bool, io: &mut Io<'_>) {
        let change = self.connectivity.update_bluetooth(connected);
        if self.root.is_some() {
            io.status.show_bluetooth(connected);
            Self::redraw(io);
        }

        if change == LinkChange::Lost {
            info!("face: bluetooth connection lost");
            self.notify(BLUETOOTH_LOST_TEXT, self.config.bluetooth_message_ms, io);
            if self.settings.bluetooth_vibrate_enabled {
                io.vibes.short_pulse();
            }
        }
    }

    fn on_battery(&mut self, battery: BatteryState, io: &mut Io<'_>) {
        if self.connectivity.update_battery(battery) {
            debug!("face: battery {}%", battery.charge_percent);
        }
        if self.root.is_some() {
            io.status.show_battery(battery);
            Self::redraw(io);
        }
    }

    /// Draw the face for the current time outside the tick cadence
    fn redraw(io: &mut Io<'_>) {
        TickScheduler::redraw(io.clock.now(), io.face);
    }

    fn on_inbox_received(&mut self, dict: &Dictionary, io: &mut Io<'_>) -> Result<(), FaceError> {
        let received =
            self.pairing
                .on_received(dict, &mut self.settings, io.store, io.outbox, io.clock)?;

        if let Received::SettingsApplied {
            new_version_available,
            ..
        } = received
        {
            let text = if new_version_available {
                NEW_VERSION_TEXT
            } else {
                SETTINGS_RECEIVED_TEXT
            };
            self.notify(text, self.config.settings_message_ms, io);
        }
        Ok(())
    }

    fn notify(&mut self, text: &str, expires_after_ms: u32, io: &mut Io<'_>) {
        let Some(root) = self.root else {
            debug!("face: no window for notification");
            return;
        };
        self.overlay.show(
            NotificationRequest {
                text,
                expires_after_ms,
            },
            io.clock.uptime_ms(),
            root,
            io.timer,
            io.message,
        );
    }

    pub fn config(&self) -> &FaceConfig {
        &self.config
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn overlay(&self) -> &NotificationOverlay {
        &self.overlay
    }

    pub fn connectivity(&self) -> &ConnectivityState {
        &self.connectivity
    }

    pub fn pairing(&self) -> &PairingChannel {
        &self.pairing
    }

    /// Returns true between `WindowLoad` and `WindowUnload`
    pub fn is_loaded(&self) -> bool {
        self.root.is_some()
    }
}
