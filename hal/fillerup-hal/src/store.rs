//! Persistent storage abstractions
//!
//! Provides a durable key to `i32` store. Every preference the watch face
//! keeps is a single integer, so the store never deals in blobs.

use heapless::FnvIndexMap;

/// Storage keys for persisted preferences
///
/// Wire keys 0-5 are mirrored one to one; key 6 remembers the clock style
/// the companion last acknowledged. Values are stable and must never be
/// renumbered, since old records outlive firmware updates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u32)]
pub enum StorageKey {
    /// Settings schema version last pushed by the companion
    CurrentVersion = 0,
    /// Legacy installed-version advertisement
    InstalledVersion = 1,
    /// Hourly vibration enabled (0/1)
    HourVibrate = 2,
    /// Vibration on bluetooth loss enabled (0/1)
    BluetoothVibrate = 3,
    /// First hour of the vibration window
    HourVibrateStart = 4,
    /// End hour (exclusive) of the vibration window
    HourVibrateEnd = 5,
    /// Companion-acknowledged 24-hour clock flag
    Clock24Hour = 6,
}

impl StorageKey {
    /// All keys, in numeric order
    pub const ALL: [StorageKey; 7] = [
        StorageKey::CurrentVersion,
        StorageKey::InstalledVersion,
        StorageKey::HourVibrate,
        StorageKey::BluetoothVibrate,
        StorageKey::HourVibrateStart,
        StorageKey::HourVibrateEnd,
        StorageKey::Clock24Hour,
    ];

    /// Get the key as its numeric value
    pub fn as_u32(self) -> u32 {
        self as u32
    }

    /// Create a key from its numeric value
    pub fn from_u32(value: u32) -> Option<Self> {
        match value {
            0 => Some(StorageKey::CurrentVersion),
            1 => Some(StorageKey::InstalledVersion),
            2 => Some(StorageKey::HourVibrate),
            3 => Some(StorageKey::BluetoothVibrate),
            4 => Some(StorageKey::HourVibrateStart),
            5 => Some(StorageKey::HourVibrateEnd),
            6 => Some(StorageKey::Clock24Hour),
            _ => None,
        }
    }
}

/// Errors from persistent storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Key has never been written
    NotFound,
    /// Underlying flash operation failed
    Flash,
    /// Stored item could not be decoded
    Corrupted,
    /// Storage is full
    Full,
    /// Storage refuses writes
    ReadOnly,
}

/// Durable key to integer store
///
/// Implementations must make each `write_int` durable before returning.
/// Individual writes are independent and idempotent; callers that write
/// several keys rely on that rather than on multi-key transactions.
pub trait PersistentStore {
    /// Read the value stored under `key`
    ///
    /// Returns [`StoreError::NotFound`] if the key was never written.
    fn read_int(&mut self, key: StorageKey) -> Result<i32, StoreError>;

    /// Write `value` under `key`
    fn write_int(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError>;
}

impl<T: PersistentStore + ?Sized> PersistentStore for &mut T {
    fn read_int(&mut self, key: StorageKey) -> Result<i32, StoreError> {
        (**self).read_int(key)
    }

    fn write_int(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError> {
        (**self).write_int(key, value)
    }
}

/// RAM-backed store
///
/// Used for host tests and as the working copy in front of slower media.
/// Can be locked read-only to simulate a failing partition.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: FnvIndexMap<StorageKey, i32, 8>,
    read_only: bool,
    writes: u32,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with `items`
    pub fn with_items(items: &[(StorageKey, i32)]) -> Self {
        let mut store = Self::new();
        for &(key, value) in items {
            // Capacity covers every StorageKey
            let _ = store.items.insert(key, value);
        }
        store
    }

    /// Refuse (or accept again) all writes
    pub fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    /// Number of successful writes since creation
    pub fn write_count(&self) -> u32 {
        self.writes
    }

    /// Peek at a value without going through the trait
    pub fn get(&self, key: StorageKey) -> Option<i32> {
        self.items.get(&key).copied()
    }
}

impl PersistentStore for MemoryStore {
    fn read_int(&mut self, key: StorageKey) -> Result<i32, StoreError> {
        self.items.get(&key).copied().ok_or(StoreError::NotFound)
    }

    fn write_int(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError> {
        if self.read_only {
            return Err(StoreError::ReadOnly);
        }
        self.items
            .insert(key, value)
            .map_err(|_| StoreError::Full)?;
        self.writes = self.writes.wrapping_add(1);
        Ok(())
    }
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for StorageKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        buffer[0] = self.as_u32() as u8;
        Ok(1)
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        if buffer.is_empty() {
            return Err(sequential_storage::map::SerializationError::BufferTooSmall);
        }
        match StorageKey::from_u32(buffer[0] as u32) {
            Some(key) => Ok((key, 1)),
            None => Err(sequential_storage::map::SerializationError::InvalidFormat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_roundtrip() {
        for key in StorageKey::ALL {
            assert_eq!(StorageKey::from_u32(key.as_u32()), Some(key));
        }
        assert_eq!(StorageKey::from_u32(7), None);
    }

    #[test]
    fn test_absent_key_is_not_found() {
        let mut store = MemoryStore::new();
        assert_eq!(
            store.read_int(StorageKey::HourVibrate),
            Err(StoreError::NotFound)
        );
    }

    #[test]
    fn test_write_then_read() {
        let mut store = MemoryStore::new();
        store.write_int(StorageKey::HourVibrateStart, 22).unwrap();
        assert_eq!(store.read_int(StorageKey::HourVibrateStart), Ok(22));
        assert_eq!(store.write_count(), 1);
    }

    #[test]
    fn test_read_only_rejects_writes() {
        let mut store = MemoryStore::with_items(&[(StorageKey::HourVibrate, 1)]);
        store.set_read_only(true);
        assert_eq!(
            store.write_int(StorageKey::HourVibrate, 0),
            Err(StoreError::ReadOnly)
        );
        assert_eq!(store.get(StorageKey::HourVibrate), Some(1));
    }
}
