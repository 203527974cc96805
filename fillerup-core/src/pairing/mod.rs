//! Companion pairing protocol handling
//!
//! Translates inbound dictionaries into settings changes or setup-info
//! replies, and records the outcome of everything sent back.

pub mod channel;

pub use channel::{PairingChannel, PairingStats, Received};
