//! Persisted watch face settings
//!
//! One small record mirrored between the store, the companion app and
//! the running face. Loading goes through a version-gated migration table
//! so records written by older firmware keep their meaning.

pub mod migration;
pub mod model;

pub use migration::{LoadPlan, Migration, LEGACY_RANGE_VERSION, MIGRATIONS, SCHEMA_VERSION};
pub use model::{ApplyReport, Settings, SkipReason};
