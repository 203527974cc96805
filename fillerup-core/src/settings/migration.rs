//! Schema migration table
//!
//! Each entry covers stored versions up to and including `up_to` and
//! adjusts the [`LoadPlan`] before any field is read. Version 0 means no
//! record was ever written; no entry applies to it.

/// Last schema version without a configurable vibration window
pub const LEGACY_RANGE_VERSION: i32 = 12;

/// Settings schema version this firmware understands
pub const SCHEMA_VERSION: i32 = 14;

/// What a load should read from the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LoadPlan {
    /// Read the vibration window keys; otherwise use the "always" window
    pub read_range: bool,
    /// Read and keep the legacy installed-version advertisement
    pub track_installed_version: bool,
}

impl LoadPlan {
    /// Plan for current records
    pub const CURRENT: LoadPlan = LoadPlan {
        read_range: true,
        track_installed_version: false,
    };
}

/// One step in the migration table
#[derive(Debug, Clone, Copy)]
pub struct Migration {
    /// Highest stored version this entry applies to
    pub up_to: i32,
    /// Short name for logs
    pub name: &'static str,
    /// Adjust the plan
    pub apply: fn(&mut LoadPlan),
}

impl Migration {
    /// Returns true if this entry applies to a record at `stored`
    pub const fn applies_to(&self, stored: i32) -> bool {
        stored != 0 && stored <= self.up_to
    }
}

fn force_always_range(plan: &mut LoadPlan) {
    plan.read_range = false;
}

fn track_installed_version(plan: &mut LoadPlan) {
    plan.track_installed_version = true;
}

/// Migrations in ascending `up_to` order
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        up_to: LEGACY_RANGE_VERSION,
        name: "always-range",
        apply: force_always_range,
    },
    Migration {
        up_to: LEGACY_RANGE_VERSION,
        name: "installed-version",
        apply: track_installed_version,
    },
];

/// Build the load plan for a record at `stored` using [`MIGRATIONS`]
pub fn plan_for(stored: i32) -> LoadPlan {
    plan_with(MIGRATIONS, stored)
}

/// Build the load plan for a record at `stored` using `table`
pub fn plan_with(table: &[Migration], stored: i32) -> LoadPlan {
    let mut plan = LoadPlan::CURRENT;
    for migration in table.iter().filter(|m| m.applies_to(stored)) {
        debug!("settings: migration {} for version {}", migration.name, stored);
        (migration.apply)(&mut plan);
    }
    plan
}
