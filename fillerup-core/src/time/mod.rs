//! Time handling
//!
//! Hour-window predicate, tick change masks, and a stepping clock for
//! simulated runs.

pub mod range;
pub mod simulated;
pub mod units;

pub use range::in_range;
pub use simulated::{Scenario, SimulatedClock};
pub use units::{TickUnit, TimeUnits};
