//! Face configuration definitions

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::time::TickUnit;

/// Maximum overlay text length in bytes
pub const MAX_MESSAGE_LEN: usize = 64;

/// Confirmation shown after a settings push
pub const SETTINGS_RECEIVED_TEXT: &str = "Settings received!";

/// Confirmation shown when the companion ships a newer schema
pub const NEW_VERSION_TEXT: &str = "Settings received.\nNew version available!";

/// Warning shown when the companion disconnects
pub const BLUETOOTH_LOST_TEXT: &str = "Bluetooth connection lost!";

/// Default settings confirmation duration
pub const DEFAULT_SETTINGS_MESSAGE_MS: u32 = 3000;

/// Default bluetooth warning duration
pub const DEFAULT_BLUETOOTH_MESSAGE_MS: u32 = 8000;

/// Shortest overlay duration accepted from configuration
pub const MIN_MESSAGE_MS: u32 = 250;

/// Longest overlay duration accepted from configuration
pub const MAX_MESSAGE_MS: u32 = 60_000;

/// Errors from validating a [`FaceConfig`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Settings message duration outside the accepted range
    SettingsDuration,
    /// Bluetooth message duration outside the accepted range
    BluetoothDuration,
}

/// Watch face configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceConfig {
    /// How long the settings confirmation stays up (ms)
    pub settings_message_ms: u32,
    /// How long the bluetooth warning stays up (ms)
    pub bluetooth_message_ms: u32,
    /// Tick subscription granularity
    pub tick_unit: TickUnit,
}

impl FaceConfig {
    /// Default configuration, usable in const context
    pub const DEFAULT: FaceConfig = FaceConfig {
        settings_message_ms: DEFAULT_SETTINGS_MESSAGE_MS,
        bluetooth_message_ms: DEFAULT_BLUETOOTH_MESSAGE_MS,
        tick_unit: TickUnit::Minute,
    };

    /// Check that durations are within the accepted range
    ///
    /// Usable in const context, so a generated configuration can be
    /// checked at compile time.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if !duration_ok(self.settings_message_ms) {
            return Err(ConfigError::SettingsDuration);
        }
        if !duration_ok(self.bluetooth_message_ms) {
            return Err(ConfigError::BluetoothDuration);
        }
        Ok(())
    }
}

const fn duration_ok(ms: u32) -> bool {
    ms >= MIN_MESSAGE_MS && ms <= MAX_MESSAGE_MS
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
