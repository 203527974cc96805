//! Per-call collaborator bundle

use fillerup_hal::{AppTimer, PersistentStore, Vibes, WallClock};

use super::{LayerSet, MessageLayer, Outbox, StatusLayer};

/// Everything a handler may touch, borrowed for one dispatch
pub struct Io<'a> {
    pub store: &'a mut dyn PersistentStore,
    pub timer: &'a mut dyn AppTimer,
    pub vibes: &'a mut dyn Vibes,
    pub clock: &'a dyn WallClock,
    pub outbox: &'a mut dyn Outbox,
    pub face: &'a mut dyn LayerSet,
    pub message: &'a mut dyn MessageLayer,
    pub status: &'a mut dyn StatusLayer,
}
