//! Face layers for the RP2040 board
//!
//! Pixel output lives on the display module; these layers compute what
//! each element shows and log it.

use defmt::*;
use fillerup_core::state::BatteryState;
use fillerup_core::traits::{FaceLayer, MessageLayer, RootLayer, StatusLayer};

/// Water level rising through the hour
pub struct FillLayer {
    root: Option<RootLayer>,
    level_percent: u8,
}

impl FillLayer {
    pub const fn new() -> Self {
        Self {
            root: None,
            level_percent: 0,
        }
    }
}

impl FaceLayer for FillLayer {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
    }

    fn draw(&mut self, _hour: u8, minute: u8) {
        let level = (minute as u16 * 100 / 60) as u8;
        if level != self.level_percent {
            self.level_percent = level;
            trace!("fill: {}%", level);
        }
    }

    fn destroy(&mut self) {
        self.root = None;
    }
}

/// Hour numeral in the configured clock style
pub struct HourLayer {
    root: Option<RootLayer>,
    style_24h: bool,
    shown: Option<u8>,
}

impl HourLayer {
    pub const fn new(style_24h: bool) -> Self {
        Self {
            root: None,
            style_24h,
            shown: None,
        }
    }

    fn display_hour(&self, hour: u8) -> u8 {
        if self.style_24h {
            return hour;
        }
        match hour % 12 {
            0 => 12,
            h => h,
        }
    }
}

impl FaceLayer for HourLayer {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
        self.shown = None;
    }

    fn draw(&mut self, hour: u8, _minute: u8) {
        let shown = self.display_hour(hour);
        if self.shown != Some(shown) {
            self.shown = Some(shown);
            debug!("hour: {}", shown);
        }
    }

    fn destroy(&mut self) {
        self.root = None;
    }
}

/// Minute marks along the glass
pub struct MinuteLayer {
    root: Option<RootLayer>,
}

impl MinuteLayer {
    pub const fn new() -> Self {
        Self { root: None }
    }
}

impl FaceLayer for MinuteLayer {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
    }

    fn draw(&mut self, hour: u8, minute: u8) {
        trace!("time: {}:{}", hour, minute);
    }

    fn destroy(&mut self) {
        self.root = None;
    }
}

/// Notification banner
pub struct BannerLayer {
    root: Option<RootLayer>,
}

impl BannerLayer {
    pub const fn new() -> Self {
        Self { root: None }
    }
}

impl MessageLayer for BannerLayer {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
    }

    fn draw(&mut self, text: &str) {
        info!("banner: {}", text);
    }

    fn destroy(&mut self) {
        self.root = None;
        debug!("banner dismissed");
    }
}

/// Bluetooth and battery indicators
pub struct StatusBar {
    root: Option<RootLayer>,
}

impl StatusBar {
    pub const fn new() -> Self {
        Self { root: None }
    }
}

impl StatusLayer for StatusBar {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
        debug!("status bar attached to root {}", root.0);
    }

    fn show_bluetooth(&mut self, connected: bool) {
        info!("status: bluetooth {}", if connected { "up" } else { "down" });
    }

    fn show_battery(&mut self, battery: BatteryState) {
        debug!(
            "status: battery {}% charging={} plugged={}",
            battery.charge_percent, battery.is_charging, battery.is_plugged
        );
    }

    fn destroy(&mut self) {
        self.root = None;
    }
}
