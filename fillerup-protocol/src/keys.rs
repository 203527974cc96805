//! Stable wire keys
//!
//! Adding a preference means adding a key. Never renumber or reuse one:
//! a stale companion app must keep working against current firmware and
//! the other way around.

/// Known dictionary keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageKey {
    /// Current settings schema version (in/out)
    CurrentVersion,
    /// Installed version advertisement (in, legacy)
    InstalledVersion,
    /// Hourly vibration enabled, 0/1 (in)
    HourVibrate,
    /// Vibrate on bluetooth loss, 0/1 (in)
    BluetoothVibrate,
    /// First hour of the vibration window, 0-23 (in)
    HourVibrateStart,
    /// End hour of the vibration window, 0-23 (in)
    HourVibrateEnd,
    /// Watch clock is in 24-hour style, 0/1 (out)
    Clock24Hour,
    /// Companion asks for setup info (in)
    RequestSetupInfo,
}

// Wire format values
const KEY_CURRENT_VERSION: u32 = 0;
const KEY_INSTALLED_VERSION: u32 = 1;
const KEY_HOUR_VIBRATE: u32 = 2;
const KEY_BLUETOOTH_VIBRATE: u32 = 3;
const KEY_HOUR_VIBRATE_START: u32 = 4;
const KEY_HOUR_VIBRATE_END: u32 = 5;
const KEY_CLOCK_24_HOUR: u32 = 6;
const KEY_REQUEST_SETUP_INFO: u32 = 7;

impl MessageKey {
    /// Parse a key from its wire value
    pub fn from_u32(raw: u32) -> Option<Self> {
        match raw {
            KEY_CURRENT_VERSION => Some(MessageKey::CurrentVersion),
            KEY_INSTALLED_VERSION => Some(MessageKey::InstalledVersion),
            KEY_HOUR_VIBRATE => Some(MessageKey::HourVibrate),
            KEY_BLUETOOTH_VIBRATE => Some(MessageKey::BluetoothVibrate),
            KEY_HOUR_VIBRATE_START => Some(MessageKey::HourVibrateStart),
            KEY_HOUR_VIBRATE_END => Some(MessageKey::HourVibrateEnd),
            KEY_CLOCK_24_HOUR => Some(MessageKey::Clock24Hour),
            KEY_REQUEST_SETUP_INFO => Some(MessageKey::RequestSetupInfo),
            _ => None,
        }
    }

    /// Convert to wire value
    pub fn to_u32(self) -> u32 {
        match self {
            MessageKey::CurrentVersion => KEY_CURRENT_VERSION,
            MessageKey::InstalledVersion => KEY_INSTALLED_VERSION,
            MessageKey::HourVibrate => KEY_HOUR_VIBRATE,
            MessageKey::BluetoothVibrate => KEY_BLUETOOTH_VIBRATE,
            MessageKey::HourVibrateStart => KEY_HOUR_VIBRATE_START,
            MessageKey::HourVibrateEnd => KEY_HOUR_VIBRATE_END,
            MessageKey::Clock24Hour => KEY_CLOCK_24_HOUR,
            MessageKey::RequestSetupInfo => KEY_REQUEST_SETUP_INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_values_are_stable() {
        assert_eq!(MessageKey::CurrentVersion.to_u32(), 0);
        assert_eq!(MessageKey::InstalledVersion.to_u32(), 1);
        assert_eq!(MessageKey::HourVibrate.to_u32(), 2);
        assert_eq!(MessageKey::BluetoothVibrate.to_u32(), 3);
        assert_eq!(MessageKey::HourVibrateStart.to_u32(), 4);
        assert_eq!(MessageKey::HourVibrateEnd.to_u32(), 5);
        assert_eq!(MessageKey::Clock24Hour.to_u32(), 6);
        assert_eq!(MessageKey::RequestSetupInfo.to_u32(), 7);
    }

    #[test]
    fn test_unknown_key() {
        assert!(MessageKey::from_u32(8).is_none());
        assert!(MessageKey::from_u32(u32::MAX).is_none());
    }
}
