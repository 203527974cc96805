//! Connectivity snapshot
//!
//! Owned by the host and observed here. Only transitions matter: a
//! repeated report of the same state changes nothing, and the first report
//! after boot only establishes the baseline.

/// Battery reading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BatteryState {
    /// Charge in percent (0-100)
    pub charge_percent: u8,
    /// Currently charging
    pub is_charging: bool,
    /// Plugged into power
    pub is_plugged: bool,
}

/// Result of a bluetooth report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkChange {
    /// Link went down
    Lost,
    /// Link came up
    Restored,
    /// First report since boot; nothing to compare against
    Initial,
    /// Same as the previous report
    Unchanged,
}

/// Last known link and battery state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    bluetooth: Option<bool>,
    battery: Option<BatteryState>,
}

impl ConnectivityState {
    /// Nothing reported yet
    pub const fn new() -> Self {
        Self {
            bluetooth: None,
            battery: None,
        }
    }

    /// Record a bluetooth report
    pub fn update_bluetooth(&mut self, connected: bool) -> LinkChange {
        let previous = self.bluetooth.replace(connected);
        match (previous, connected) {
            (None, _) => LinkChange::Initial,
            (Some(was), now) if was == now => LinkChange::Unchanged,
            (Some(_), false) => LinkChange::Lost,
            (Some(_), true) => LinkChange::Restored,
        }
    }

    /// Record a battery report; returns true if it differs from the last one
    pub fn update_battery(&mut self, battery: BatteryState) -> bool {
        self.battery.replace(battery) != Some(battery)
    }

    /// Last reported link state, if any
    pub fn bluetooth_connected(&self) -> Option<bool> {
        self.bluetooth
    }

    /// Last reported battery state, if any
    pub fn battery(&self) -> Option<BatteryState> {
        self.battery
    }
}
