//! Face state and event dispatch
//!
//! Every host callback becomes an [`Event`]; [`WatchFace::handle`] is the
//! single place where events meet state.

pub mod connectivity;
pub mod events;
pub mod face;
pub mod tick;

pub use connectivity::{BatteryState, ConnectivityState, LinkChange};
pub use events::Event;
pub use face::{FaceError, WatchFace};
pub use tick::{TickOutcome, TickScheduler};
