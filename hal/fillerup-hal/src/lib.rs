//! Filler Up host abstraction layer
//!
//! The watch face core never talks to the platform directly. Everything it
//! needs from the host environment goes through the traits in this crate,
//! so the same logic runs on the RP2040 target and inside host tests.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  fillerup-core (WatchFace dispatch)     │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  fillerup-hal (this crate - traits)     │
//! └─────────────────────────────────────────┘
//!                     │
//!         ┌───────────┴───────────┐
//!         ▼                       ▼
//! ┌───────────────┐       ┌───────────────┐
//! │ fillerup-hal- │       │  MemoryStore  │
//! │    rp2040     │       │ (host tests)  │
//! └───────────────┘       └───────────────┘
//! ```
//!
//! # Traits
//!
//! - [`store::PersistentStore`] - Durable key to integer storage
//! - [`timer::AppTimer`] - One-shot application timers
//! - [`vibes::Vibes`] - Fire-and-forget vibration
//! - [`clock::WallClock`] - Local time and clock style

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod store;
pub mod timer;
pub mod vibes;

// Re-export key traits at crate root for convenience
pub use clock::{LocalTime, WallClock};
pub use store::{MemoryStore, PersistentStore, StorageKey, StoreError};
pub use timer::{AppTimer, TimerError, TimerId};
pub use vibes::Vibes;
