//! Board-agnostic core logic for the Filler Up watch face
//!
//! This crate contains everything with real state and failure handling,
//! independent of the platform it runs on:
//!
//! - Persisted settings with schema-version migration
//! - Wraparound hour-range predicate for hourly vibration
//! - Companion pairing protocol handling
//! - Single-slot notification overlay with debounced dismissal
//! - Tick handling and the event dispatch that ties it together
//!
//! Drawing, timers, storage and vibration are reached only through traits,
//! so every handler can be exercised on the host.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

// Must come first so the logging macros are visible to later modules
#[macro_use]
mod fmt;

pub mod config;
pub mod overlay;
pub mod pairing;
pub mod settings;
pub mod state;
pub mod time;
pub mod traits;

#[cfg(test)]
mod testing;
