//! Flash preference store for RP2040
//!
//! Uses sequential-storage for wear-leveled key-value storage in the last
//! 64KB of flash. Values are cached in RAM after [`Rp2040Store::load`];
//! reads never touch flash, and every write goes to flash before the cache
//! is updated.
//!
//! Implements the `PersistentStore` trait from `fillerup-hal`.

use embassy_futures::block_on;
use embassy_rp::dma::Channel;
use embassy_rp::flash::{Async, Flash, ERASE_SIZE};
use embassy_rp::peripherals::FLASH;
use embassy_rp::Peri;
use fillerup_hal::{MemoryStore, PersistentStore, StorageKey, StoreError};
use sequential_storage::cache::NoCache;
use sequential_storage::map;

/// Flash storage configuration
pub const FLASH_SIZE: usize = 2 * 1024 * 1024; // 2MB flash on the Pico
pub const STORE_PARTITION_SIZE: usize = 64 * 1024;
pub const STORE_PARTITION_START: usize = FLASH_SIZE - STORE_PARTITION_SIZE;

/// Flash erase size for RP2040
pub const FLASH_ERASE_SIZE: usize = ERASE_SIZE;

/// Flash range for the preference partition
pub const STORE_RANGE: core::ops::Range<u32> =
    (STORE_PARTITION_START as u32)..(FLASH_SIZE as u32);

/// Scratch space for one item (key + value + item header)
const ITEM_BUFFER_SIZE: usize = 32;

fn map_error<E>(e: sequential_storage::Error<E>) -> StoreError {
    match e {
        sequential_storage::Error::FullStorage => StoreError::Full,
        sequential_storage::Error::Corrupted { .. } => StoreError::Corrupted,
        _ => StoreError::Flash,
    }
}

/// RP2040 flash-backed preference store
pub struct Rp2040Store<'d> {
    flash: Flash<'d, FLASH, Async, FLASH_SIZE>,
    cache: MemoryStore,
}

impl<'d> Rp2040Store<'d> {
    /// Create a store; call [`Rp2040Store::load`] before first use
    pub fn new(flash: Peri<'d, FLASH>, dma: Peri<'d, impl Channel>) -> Self {
        Self {
            flash: Flash::new(flash, dma),
            cache: MemoryStore::new(),
        }
    }

    /// Read every known key from flash into the cache
    ///
    /// Returns the number of keys found. Keys that fail to decode are
    /// left absent, so the caller falls back to defaults for them.
    pub async fn load(&mut self) -> Result<usize, StoreError> {
        let mut found = 0;
        let mut items = heapless::Vec::<(StorageKey, i32), 8>::new();

        for key in StorageKey::ALL {
            let mut buffer = [0u8; ITEM_BUFFER_SIZE];
            let item = map::fetch_item::<StorageKey, &[u8], _>(
                &mut self.flash,
                STORE_RANGE,
                &mut NoCache::new(),
                &mut buffer,
                &key,
            )
            .await
            .map_err(map_error)?;

            match item.map(<[u8; 4]>::try_from) {
                Some(Ok(bytes)) => {
                    // Capacity covers every StorageKey
                    let _ = items.push((key, i32::from_le_bytes(bytes)));
                    found += 1;
                }
                Some(Err(_)) => {
                    #[cfg(feature = "defmt")]
                    defmt::warn!("flash: {} has a malformed value", key);
                }
                None => {}
            }
        }

        self.cache = MemoryStore::with_items(&items);
        Ok(found)
    }

    async fn store(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError> {
        let mut buffer = [0u8; ITEM_BUFFER_SIZE];
        let bytes = value.to_le_bytes();

        map::store_item(
            &mut self.flash,
            STORE_RANGE,
            &mut NoCache::new(),
            &mut buffer,
            &key,
            &bytes.as_slice(),
        )
        .await
        .map_err(map_error)
    }
}

impl<'d> PersistentStore for Rp2040Store<'d> {
    fn read_int(&mut self, key: StorageKey) -> Result<i32, StoreError> {
        self.cache.read_int(key)
    }

    fn write_int(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError> {
        if self.cache.get(key) == Some(value) {
            return Ok(());
        }

        // Durable before the cache changes
        block_on(self.store(key, value))?;
        self.cache.write_int(key, value)
    }
}
