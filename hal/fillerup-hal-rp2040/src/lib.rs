//! RP2040-specific HAL for the Filler Up watch face
//!
//! This crate provides RP2040 implementations of the `fillerup-hal`
//! traits:
//!
//! - Flash-backed preference store (implements `fillerup_hal::PersistentStore`)
//! - GPIO vibration motor driver

#![no_std]

pub mod flash;
pub mod vibes;

// Re-export shared types from fillerup-hal for convenience
pub use fillerup_hal::{PersistentStore, StorageKey, StoreError};
