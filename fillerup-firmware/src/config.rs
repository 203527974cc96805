//! Face configuration generated from face.toml

use fillerup_core::config::FaceConfig;
use fillerup_core::time::TickUnit;

include!(concat!(env!("OUT_DIR"), "/face_config.rs"));

// Compile-time check that build.rs and the core agree on limits
const _: () = assert!(FACE_CONFIG.validate().is_ok());
