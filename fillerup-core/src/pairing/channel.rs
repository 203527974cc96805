//! Inbox/outbox handlers

use fillerup_hal::{PersistentStore, StorageKey, StoreError, WallClock};
use fillerup_protocol::{DeliveryError, Dictionary, InboundKind, MessageKey, SetupInfo};

use crate::settings::{ApplyReport, Settings, SCHEMA_VERSION};
use crate::traits::Outbox;

/// What an inbound dictionary led to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Received {
    /// Setup info was queued for the companion
    SetupInfoSent,
    /// Setup info could not be queued
    SetupInfoFailed(DeliveryError),
    /// Settings were updated and persisted
    SettingsApplied {
        report: ApplyReport,
        /// The companion ships a newer schema than the installed one
        new_version_available: bool,
    },
}

/// Message counters since boot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PairingStats {
    /// Pushes delivered to the face
    pub received: u32,
    /// Inbound messages lost before decoding
    pub dropped: u32,
    /// Pushes the companion acknowledged
    pub sent: u32,
    /// Pushes rejected or timed out
    pub failed: u32,
}

/// Handles companion traffic
#[derive(Debug, Clone, Default)]
pub struct PairingChannel {
    stats: PairingStats,
}

impl PairingChannel {
    /// Channel with all counters at zero
    pub const fn new() -> Self {
        Self {
            stats: PairingStats {
                received: 0,
                dropped: 0,
                sent: 0,
                failed: 0,
            },
        }
    }

    /// Handle an inbound dictionary
    ///
    /// A setup-info request is answered without touching settings. Anything
    /// else is applied tuple by tuple and then persisted; a failing write
    /// is returned to the caller.
    pub fn on_received(
        &mut self,
        dict: &Dictionary,
        settings: &mut Settings,
        store: &mut dyn PersistentStore,
        outbox: &mut dyn Outbox,
        clock: &dyn WallClock,
    ) -> Result<Received, StoreError> {
        self.stats.received = self.stats.received.wrapping_add(1);

        match InboundKind::classify(dict) {
            InboundKind::SetupInfoRequest => {
                let info = SetupInfo {
                    clock_24h: clock.is_24h_style(),
                    installed_version: SCHEMA_VERSION,
                };
                info!(
                    "pairing: setup info requested (24h={}, v{})",
                    info.clock_24h, info.installed_version
                );
                match outbox.send(&info.to_dictionary()) {
                    Ok(()) => Ok(Received::SetupInfoSent),
                    Err(reason) => {
                        warn!("pairing: setup info not queued: {:?}", reason);
                        Ok(Received::SetupInfoFailed(reason))
                    }
                }
            }
            InboundKind::SettingsUpdate => {
                let report = settings.apply(dict);
                settings.save(store)?;
                info!(
                    "pairing: settings applied ({} applied, {} skipped)",
                    report.applied, report.skipped
                );
                Ok(Received::SettingsApplied {
                    report,
                    new_version_available: settings.has_newer_version(),
                })
            }
        }
    }

    /// An inbound message never arrived intact
    pub fn on_dropped(&mut self, reason: DeliveryError) {
        self.stats.dropped = self.stats.dropped.wrapping_add(1);
        warn!("pairing: inbound message dropped: {:?}", reason);
    }

    /// The companion acknowledged `dict`
    ///
    /// An acknowledged clock style is remembered; the version tuple is
    /// informational.
    pub fn on_sent(
        &mut self,
        dict: &Dictionary,
        store: &mut dyn PersistentStore,
    ) -> Result<(), StoreError> {
        self.stats.sent = self.stats.sent.wrapping_add(1);

        for tuple in dict.iter() {
            match tuple.message_key() {
                Some(MessageKey::Clock24Hour) => {
                    store.write_int(StorageKey::Clock24Hour, (tuple.value != 0) as i32)?;
                    debug!("pairing: companion has 24h={}", tuple.value != 0);
                }
                Some(MessageKey::CurrentVersion) => {
                    info!("pairing: companion has installed version {}", tuple.value);
                }
                _ => warn!("pairing: ack for unrecognized key {}", tuple.key),
            }
        }
        Ok(())
    }

    /// The companion did not take `dict`; it is not retried
    pub fn on_failed(&mut self, dict: &Dictionary, reason: DeliveryError) {
        self.stats.failed = self.stats.failed.wrapping_add(1);
        warn!(
            "pairing: outbound message of {} tuples failed: {:?}",
            dict.len(),
            reason
        );
    }

    /// Snapshot of the counters
    pub fn stats(&self) -> PairingStats {
        self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeClock, FlakyStore, RecordingOutbox};
    use fillerup_hal::{LocalTime, MemoryStore};

    fn dict(pairs: &[(u32, i32)]) -> Dictionary {
        Dictionary::from_pairs(pairs).unwrap()
    }

    #[test]
    fn test_setup_request_replies_without_touching_settings() {
        let mut channel = PairingChannel::new();
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let mut outbox = RecordingOutbox::default();
        let clock = FakeClock::new(LocalTime::new(9, 0, 0), true);

        let result = channel
            .on_received(&dict(&[(7, 0), (2, 1)]), &mut settings, &mut store, &mut outbox, &clock)
            .unwrap();

        assert_eq!(result, Received::SetupInfoSent);
        assert_eq!(settings, Settings::default());
        assert_eq!(store.write_count(), 0);
        assert_eq!(outbox.sent.len(), 1);
        assert_eq!(outbox.sent[0].get(MessageKey::CurrentVersion), Some(SCHEMA_VERSION));
        assert_eq!(outbox.sent[0].get(MessageKey::Clock24Hour), Some(1));
    }

    #[test]
    fn test_setup_request_send_failure_is_reported() {
        let mut channel = PairingChannel::new();
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let mut outbox = RecordingOutbox::failing(DeliveryError::Busy);
        let clock = FakeClock::new(LocalTime::new(9, 0, 0), false);

        let result = channel
            .on_received(&dict(&[(7, 0)]), &mut settings, &mut store, &mut outbox, &clock)
            .unwrap();
        assert_eq!(result, Received::SetupInfoFailed(DeliveryError::Busy));
    }

    #[test]
    fn test_settings_update_is_persisted() {
        let mut channel = PairingChannel::new();
        let mut settings = Settings::default();
        let mut store = MemoryStore::new();
        let mut outbox = RecordingOutbox::default();
        let clock = FakeClock::new(LocalTime::new(9, 0, 0), false);

        let result = channel
            .on_received(
                &dict(&[(2, 1), (4, 22), (5, 6), (3, 0), (7, 0)]),
                &mut settings,
                &mut store,
                &mut outbox,
                &clock,
            )
            .unwrap();

        assert_eq!(
            result,
            Received::SettingsApplied {
                report: ApplyReport { applied: 4, skipped: 1 },
                new_version_available: false,
            }
        );
        assert_eq!(store.get(StorageKey::HourVibrateStart), Some(22));
        assert_eq!(store.get(StorageKey::BluetoothVibrate), Some(0));
        assert!(outbox.sent.is_empty());
    }

    #[test]
    fn test_new_version_detected() {
        let mut channel = PairingChannel::new();
        let mut settings = Settings {
            schema_version: 12,
            installed_version: 12,
            tracks_installed_version: true,
            ..Settings::default()
        };
        let mut store = MemoryStore::new();
        let mut outbox = RecordingOutbox::default();
        let clock = FakeClock::new(LocalTime::new(9, 0, 0), false);

        let result = channel
            .on_received(&dict(&[(0, 14)]), &mut settings, &mut store, &mut outbox, &clock)
            .unwrap();
        assert!(matches!(
            result,
            Received::SettingsApplied {
                new_version_available: true,
                ..
            }
        ));
    }

    #[test]
    fn test_store_failure_propagates() {
        let mut channel = PairingChannel::new();
        let mut settings = Settings::default();
        let mut store = FlakyStore::new(MemoryStore::new());
        store.fail_writes_after(0, StoreError::Full);
        let mut outbox = RecordingOutbox::default();
        let clock = FakeClock::new(LocalTime::new(9, 0, 0), false);

        let result =
            channel.on_received(&dict(&[(2, 1)]), &mut settings, &mut store, &mut outbox, &clock);
        assert_eq!(result, Err(StoreError::Full));
    }

    #[test]
    fn test_on_sent_persists_clock_style_only() {
        let mut channel = PairingChannel::new();
        let mut store = MemoryStore::new();

        channel
            .on_sent(&dict(&[(6, 1), (0, 14), (42, 3)]), &mut store)
            .unwrap();

        assert_eq!(store.get(StorageKey::Clock24Hour), Some(1));
        assert_eq!(store.get(StorageKey::CurrentVersion), None);
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_counters() {
        let mut channel = PairingChannel::new();
        channel.on_dropped(DeliveryError::Malformed);
        channel.on_failed(&dict(&[(6, 0)]), DeliveryError::SendTimeout);

        let stats = channel.stats();
        assert_eq!(stats.dropped, 1);
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.received, 0);
    }
}
