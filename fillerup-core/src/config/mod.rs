//! Configuration types
//!
//! Board-agnostic face configuration. The firmware embeds a validated
//! `face.toml` as a [`FaceConfig`] constant at build time.

pub mod face;

pub use face::*;
