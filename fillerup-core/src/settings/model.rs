//! Settings record, loading and inbound updates

use fillerup_hal::{PersistentStore, StorageKey, StoreError};
use fillerup_protocol::{Dictionary, MessageKey, Tuple};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::migration::{self, LoadPlan};
use crate::time::in_range;

/// Default first hour of the vibration window
pub const DEFAULT_RANGE_START: u8 = 9;

/// Default end hour (exclusive) of the vibration window
pub const DEFAULT_RANGE_END: u8 = 18;

/// Highest valid hour value
pub const MAX_HOUR: i32 = 23;

/// The persisted preference record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Settings {
    /// Schema version last pushed by the companion (never decreases)
    pub schema_version: i32,
    /// Legacy installed-version advertisement, 0 when untracked
    pub installed_version: i32,
    /// The record was loaded as a legacy one, so `installed_version` is kept
    ///
    /// Decided by the migration table at load and never persisted.
    pub tracks_installed_version: bool,
    /// Vibrate on the hour
    pub hour_vibrate_enabled: bool,
    /// First hour of the vibration window
    pub hour_vibrate_start: u8,
    /// End hour (exclusive) of the vibration window; equal to start means always
    pub hour_vibrate_end: u8,
    /// Vibrate when the companion disconnects
    pub bluetooth_vibrate_enabled: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: 0,
            installed_version: 0,
            tracks_installed_version: false,
            hour_vibrate_enabled: false,
            hour_vibrate_start: DEFAULT_RANGE_START,
            hour_vibrate_end: DEFAULT_RANGE_END,
            bluetooth_vibrate_enabled: true,
        }
    }
}

/// Why an inbound tuple was not applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SkipReason {
    /// Key unknown to this build
    UnknownKey,
    /// Known key that is not a setting (outbound-only or control)
    NotASetting,
    /// Value outside the key's domain
    OutOfRange,
    /// Schema version lower than the current one
    VersionRegression,
}

/// Outcome of applying an inbound dictionary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ApplyReport {
    /// Tuples that mutated (or confirmed) a field
    pub applied: u8,
    /// Tuples logged and skipped
    pub skipped: u8,
}

fn read_or(store: &mut dyn PersistentStore, key: StorageKey, default: i32) -> i32 {
    match store.read_int(key) {
        Ok(value) => value,
        Err(StoreError::NotFound) => default,
        Err(e) => {
            warn!("settings: read {:?} failed ({:?}), using default", key, e);
            default
        }
    }
}

fn read_hour(store: &mut dyn PersistentStore, key: StorageKey, default: u8) -> u8 {
    let value = read_or(store, key, default as i32);
    match u8::try_from(value) {
        Ok(hour) if value <= MAX_HOUR => hour,
        _ => {
            warn!("settings: stored {:?} = {} out of range", key, value);
            default
        }
    }
}

impl Settings {
    /// Load from `store`, filling absent keys with defaults
    ///
    /// The schema version is read first; the migration table then decides
    /// which of the remaining keys are meaningful for that record.
    pub fn load(store: &mut dyn PersistentStore) -> Self {
        let defaults = Settings::default();

        let schema_version = read_or(store, StorageKey::CurrentVersion, defaults.schema_version);
        let plan = migration::plan_for(schema_version);
        let settings = Self::load_with_plan(store, schema_version, plan);

        info!(
            "settings: loaded v{} hour={} {}..{} bt={}",
            settings.schema_version,
            settings.hour_vibrate_enabled,
            settings.hour_vibrate_start,
            settings.hour_vibrate_end,
            settings.bluetooth_vibrate_enabled
        );
        settings
    }

    fn load_with_plan(store: &mut dyn PersistentStore, schema_version: i32, plan: LoadPlan) -> Self {
        let defaults = Settings::default();

        let (hour_vibrate_start, hour_vibrate_end) = if plan.read_range {
            (
                read_hour(store, StorageKey::HourVibrateStart, defaults.hour_vibrate_start),
                read_hour(store, StorageKey::HourVibrateEnd, defaults.hour_vibrate_end),
            )
        } else {
            (0, 0)
        };

        let installed_version = if plan.track_installed_version {
            read_or(store, StorageKey::InstalledVersion, defaults.installed_version)
        } else {
            0
        };

        Self {
            schema_version,
            installed_version,
            tracks_installed_version: plan.track_installed_version,
            hour_vibrate_enabled: read_or(
                store,
                StorageKey::HourVibrate,
                defaults.hour_vibrate_enabled as i32,
            ) != 0,
            hour_vibrate_start,
            hour_vibrate_end,
            bluetooth_vibrate_enabled: read_or(
                store,
                StorageKey::BluetoothVibrate,
                defaults.bluetooth_vibrate_enabled as i32,
            ) != 0,
        }
    }

    /// Write every field to `store`
    ///
    /// Stops at the first failing write. Writes are idempotent, so a save
    /// interrupted midway is repaired by the next one.
    pub fn save(&self, store: &mut dyn PersistentStore) -> Result<(), StoreError> {
        store.write_int(StorageKey::CurrentVersion, self.schema_version)?;
        store.write_int(StorageKey::InstalledVersion, self.installed_version)?;
        store.write_int(StorageKey::HourVibrate, self.hour_vibrate_enabled as i32)?;
        store.write_int(
            StorageKey::BluetoothVibrate,
            self.bluetooth_vibrate_enabled as i32,
        )?;
        store.write_int(StorageKey::HourVibrateStart, self.hour_vibrate_start as i32)?;
        store.write_int(StorageKey::HourVibrateEnd, self.hour_vibrate_end as i32)?;
        Ok(())
    }

    /// Apply every tuple of an inbound dictionary in arrival order
    pub fn apply(&mut self, update: &Dictionary) -> ApplyReport {
        let mut report = ApplyReport::default();
        for tuple in update.iter() {
            match self.apply_tuple(tuple) {
                Ok(key) => {
                    debug!("settings: {:?} = {}", key, tuple.value);
                    report.applied = report.applied.saturating_add(1);
                }
                Err(reason) => {
                    warn!(
                        "settings: skipped key {} = {} ({:?})",
                        tuple.key, tuple.value, reason
                    );
                    report.skipped = report.skipped.saturating_add(1);
                }
            }
        }
        report
    }

    /// Apply a single tuple
    pub fn apply_tuple(&mut self, tuple: &Tuple) -> Result<MessageKey, SkipReason> {
        let key = tuple.message_key().ok_or(SkipReason::UnknownKey)?;
        let value = tuple.value;

        match key {
            MessageKey::CurrentVersion => {
                if value < 0 {
                    return Err(SkipReason::OutOfRange);
                }
                if value < self.schema_version {
                    return Err(SkipReason::VersionRegression);
                }
                self.schema_version = value;
            }
            MessageKey::InstalledVersion => {
                // Only legacy records read it back, so nothing else keeps it
                if !self.tracks_installed_version {
                    return Err(SkipReason::NotASetting);
                }
                if value < 0 {
                    return Err(SkipReason::OutOfRange);
                }
                self.installed_version = value;
            }
            MessageKey::HourVibrate => self.hour_vibrate_enabled = value != 0,
            MessageKey::BluetoothVibrate => self.bluetooth_vibrate_enabled = value != 0,
            MessageKey::HourVibrateStart => self.hour_vibrate_start = hour_value(value)?,
            MessageKey::HourVibrateEnd => self.hour_vibrate_end = hour_value(value)?,
            MessageKey::Clock24Hour | MessageKey::RequestSetupInfo => {
                return Err(SkipReason::NotASetting)
            }
        }
        Ok(key)
    }

    /// Returns true if the hourly buzz should fire at `hour`
    pub fn hour_vibrate_due(&self, hour: u8) -> bool {
        self.hour_vibrate_enabled
            && in_range(hour, self.hour_vibrate_start, self.hour_vibrate_end)
    }

    /// Returns true if the companion ships a newer schema than the one
    /// advertised as installed
    pub fn has_newer_version(&self) -> bool {
        self.installed_version != 0 && self.schema_version > self.installed_version
    }
}

fn hour_value(value: i32) -> Result<u8, SkipReason> {
    if (0..=MAX_HOUR).contains(&value) {
        Ok(value as u8)
    } else {
        Err(SkipReason::OutOfRange)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::LEGACY_RANGE_VERSION;
    use crate::testing::FlakyStore;
    use fillerup_hal::MemoryStore;

    fn dict(pairs: &[(u32, i32)]) -> Dictionary {
        Dictionary::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_empty_store_loads_defaults() {
        let mut store = MemoryStore::new();
        let settings = Settings::load(&mut store);
        assert_eq!(settings, Settings::default());
        assert!(!settings.hour_vibrate_enabled);
        assert!(settings.bluetooth_vibrate_enabled);
        assert_eq!((settings.hour_vibrate_start, settings.hour_vibrate_end), (9, 18));
    }

    #[test]
    fn test_legacy_record_forces_always_range() {
        let mut store = MemoryStore::with_items(&[
            (StorageKey::CurrentVersion, LEGACY_RANGE_VERSION),
            (StorageKey::InstalledVersion, 11),
            (StorageKey::HourVibrate, 1),
            (StorageKey::HourVibrateStart, 22),
            (StorageKey::HourVibrateEnd, 6),
        ]);
        let settings = Settings::load(&mut store);

        assert_eq!(settings.hour_vibrate_start, 0);
        assert_eq!(settings.hour_vibrate_end, 0);
        assert_eq!(settings.installed_version, 11);
        assert!(settings.tracks_installed_version);
        assert!(settings.hour_vibrate_due(3));
    }

    #[test]
    fn test_record_after_threshold_reads_range() {
        let mut store = MemoryStore::with_items(&[
            (StorageKey::CurrentVersion, LEGACY_RANGE_VERSION + 1),
            (StorageKey::InstalledVersion, 11),
            (StorageKey::HourVibrateStart, 22),
            (StorageKey::HourVibrateEnd, 6),
        ]);
        let settings = Settings::load(&mut store);

        assert_eq!(settings.hour_vibrate_start, 22);
        assert_eq!(settings.hour_vibrate_end, 6);
        assert_eq!(settings.installed_version, 0);
        assert!(!settings.tracks_installed_version);
    }

    #[test]
    fn test_installed_version_ignored_on_current_record() {
        let mut store = MemoryStore::with_items(&[(StorageKey::CurrentVersion, 14)]);
        let mut settings = Settings::load(&mut store);

        let report = settings.apply(&dict(&[(1, 11), (0, 15)]));
        assert_eq!(report, ApplyReport { applied: 1, skipped: 1 });
        assert_eq!(settings.installed_version, 0);
        assert!(!settings.has_newer_version());

        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&mut store), settings);
    }

    #[test]
    fn test_installed_version_kept_on_legacy_record() {
        let mut store = MemoryStore::with_items(&[(StorageKey::CurrentVersion, 12)]);
        let mut settings = Settings::load(&mut store);

        assert_eq!(
            settings.apply_tuple(&Tuple { key: 1, value: 11 }),
            Ok(MessageKey::InstalledVersion)
        );
        assert!(settings.has_newer_version());

        settings.save(&mut store).unwrap();
        let reloaded = Settings::load(&mut store);
        assert_eq!(reloaded, settings);
        assert!(reloaded.has_newer_version());
    }

    #[test]
    fn test_out_of_range_stored_hour_uses_default() {
        let mut store = MemoryStore::with_items(&[
            (StorageKey::CurrentVersion, 14),
            (StorageKey::HourVibrateStart, 24),
            (StorageKey::HourVibrateEnd, -1),
        ]);
        let settings = Settings::load(&mut store);
        assert_eq!(settings.hour_vibrate_start, DEFAULT_RANGE_START);
        assert_eq!(settings.hour_vibrate_end, DEFAULT_RANGE_END);
    }

    #[test]
    fn test_read_failure_falls_back_to_default() {
        let mut store = FlakyStore::new(MemoryStore::with_items(&[(StorageKey::HourVibrate, 1)]));
        store.fail_reads(StoreError::Corrupted);
        let settings = Settings::load(&mut store);
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let mut store = MemoryStore::new();
        let settings = Settings {
            schema_version: 14,
            installed_version: 0,
            tracks_installed_version: false,
            hour_vibrate_enabled: true,
            hour_vibrate_start: 22,
            hour_vibrate_end: 6,
            bluetooth_vibrate_enabled: false,
        };
        settings.save(&mut store).unwrap();
        assert_eq!(Settings::load(&mut store), settings);
    }

    #[test]
    fn test_save_propagates_first_failure() {
        let mut store = FlakyStore::new(MemoryStore::new());
        store.fail_writes_after(2, StoreError::Flash);
        assert_eq!(Settings::default().save(&mut store), Err(StoreError::Flash));
        assert_eq!(store.inner().write_count(), 2);
    }

    #[test]
    fn test_apply_mixed_batch() {
        let mut settings = Settings::default();
        let report = settings.apply(&dict(&[(99, 5), (2, 1), (4, 25), (5, 6), (6, 1)]));

        assert_eq!(report, ApplyReport { applied: 2, skipped: 3 });
        assert!(settings.hour_vibrate_enabled);
        assert_eq!(settings.hour_vibrate_start, DEFAULT_RANGE_START);
        assert_eq!(settings.hour_vibrate_end, 6);
    }

    #[test]
    fn test_apply_only_unknown_keys_changes_nothing() {
        let mut settings = Settings::default();
        let report = settings.apply(&dict(&[(99, 5), (1000, -1)]));
        assert_eq!(report, ApplyReport { applied: 0, skipped: 2 });
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_apply_skip_reasons() {
        let mut settings = Settings {
            schema_version: 14,
            ..Settings::default()
        };
        let t = |key, value| Tuple { key, value };

        assert_eq!(settings.apply_tuple(&t(42, 0)), Err(SkipReason::UnknownKey));
        assert_eq!(settings.apply_tuple(&t(7, 0)), Err(SkipReason::NotASetting));
        assert_eq!(settings.apply_tuple(&t(6, 1)), Err(SkipReason::NotASetting));
        assert_eq!(settings.apply_tuple(&t(5, 24)), Err(SkipReason::OutOfRange));
        assert_eq!(settings.apply_tuple(&t(0, 13)), Err(SkipReason::VersionRegression));
        assert_eq!(settings.schema_version, 14);
        assert_eq!(settings.apply_tuple(&t(0, 15)), Ok(MessageKey::CurrentVersion));
        assert_eq!(settings.schema_version, 15);
    }

    #[test]
    fn test_apply_later_tuple_wins() {
        let mut settings = Settings::default();
        settings.apply(&dict(&[(3, 0), (3, 1)]));
        assert!(settings.bluetooth_vibrate_enabled);
    }

    #[test]
    fn test_bool_is_any_nonzero() {
        let mut settings = Settings::default();
        settings.apply(&dict(&[(2, -7)]));
        assert!(settings.hour_vibrate_enabled);
    }

    #[test]
    fn test_has_newer_version() {
        let mut settings = Settings::default();
        assert!(!settings.has_newer_version());

        settings.installed_version = 12;
        settings.schema_version = 12;
        assert!(!settings.has_newer_version());

        settings.schema_version = 14;
        assert!(settings.has_newer_version());
    }

    proptest::proptest! {
        #[test]
        fn test_load_save_load_is_idempotent(
            version in -2i32..20,
            installed in 0i32..20,
            hour in 0i32..3,
            bt in 0i32..3,
            start in -2i32..26,
            end in -2i32..26,
        ) {
            let mut store = MemoryStore::with_items(&[
                (StorageKey::CurrentVersion, version),
                (StorageKey::InstalledVersion, installed),
                (StorageKey::HourVibrate, hour),
                (StorageKey::BluetoothVibrate, bt),
                (StorageKey::HourVibrateStart, start),
                (StorageKey::HourVibrateEnd, end),
            ]);

            let first = Settings::load(&mut store);
            first.save(&mut store).unwrap();
            let second = Settings::load(&mut store);
            proptest::prop_assert_eq!(first, second);
            proptest::prop_assert!(second.hour_vibrate_start <= 23);
            proptest::prop_assert!(second.hour_vibrate_end <= 23);
        }
    }
}
