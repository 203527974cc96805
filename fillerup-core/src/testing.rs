//! Host fakes for unit tests

use std::string::String;
use std::vec::Vec;

use fillerup_hal::{
    AppTimer, LocalTime, MemoryStore, PersistentStore, StorageKey, StoreError, TimerError,
    TimerId, Vibes, WallClock,
};
use fillerup_protocol::{DeliveryError, Dictionary};

use crate::state::BatteryState;
use crate::traits::{FaceLayer, Io, MessageLayer, Outbox, RootLayer, StatusLayer};

/// Timer facility driven by explicit time steps
#[derive(Debug, Default)]
pub struct FakeTimer {
    now_ms: u64,
    last_id: u32,
    pending: Vec<(TimerId, u64)>,
    registered: u32,
    exhausted: bool,
}

impl FakeTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Refuse (or accept again) new registrations
    pub fn set_exhausted(&mut self, exhausted: bool) {
        self.exhausted = exhausted;
    }

    pub fn registered(&self) -> u32 {
        self.registered
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|&(p, _)| p == id)
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move time to `ms`, returning the timers that fired in deadline order
    pub fn advance_to(&mut self, ms: u64) -> Vec<TimerId> {
        self.now_ms = ms;
        let mut due: Vec<(TimerId, u64)> = self
            .pending
            .iter()
            .copied()
            .filter(|&(_, deadline)| deadline <= ms)
            .collect();
        due.sort_by_key(|&(_, deadline)| deadline);
        self.pending.retain(|&(_, deadline)| deadline > ms);
        due.into_iter().map(|(id, _)| id).collect()
    }
}

impl AppTimer for FakeTimer {
    fn register(&mut self, after_ms: u32) -> Result<TimerId, TimerError> {
        if self.exhausted {
            return Err(TimerError::Exhausted);
        }
        self.last_id += 1;
        let id = TimerId(self.last_id);
        self.pending.push((id, self.now_ms + after_ms as u64));
        self.registered += 1;
        Ok(id)
    }

    fn reschedule(&mut self, id: TimerId, after_ms: u32) -> bool {
        let now = self.now_ms;
        match self.pending.iter_mut().find(|(p, _)| *p == id) {
            Some(entry) => {
                entry.1 = now + after_ms as u64;
                true
            }
            None => false,
        }
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.retain(|&(p, _)| p != id);
    }
}

/// Store wrapper that injects failures
#[derive(Debug)]
pub struct FlakyStore {
    inner: MemoryStore,
    read_error: Option<StoreError>,
    write_budget: Option<(u32, StoreError)>,
}

impl FlakyStore {
    pub fn new(inner: MemoryStore) -> Self {
        Self {
            inner,
            read_error: None,
            write_budget: None,
        }
    }

    /// Fail every read with `error`
    pub fn fail_reads(&mut self, error: StoreError) {
        self.read_error = Some(error);
    }

    /// Let `ok` more writes succeed, then fail with `error`
    pub fn fail_writes_after(&mut self, ok: u32, error: StoreError) {
        self.write_budget = Some((ok, error));
    }

    pub fn inner(&self) -> &MemoryStore {
        &self.inner
    }
}

impl PersistentStore for FlakyStore {
    fn read_int(&mut self, key: StorageKey) -> Result<i32, StoreError> {
        match self.read_error {
            Some(e) => Err(e),
            None => self.inner.read_int(key),
        }
    }

    fn write_int(&mut self, key: StorageKey, value: i32) -> Result<(), StoreError> {
        if let Some((remaining, error)) = self.write_budget.as_mut() {
            if *remaining == 0 {
                return Err(*error);
            }
            *remaining -= 1;
        }
        self.inner.write_int(key, value)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FakeClock {
    pub time: LocalTime,
    pub is_24h: bool,
    pub uptime_ms: u64,
}

impl FakeClock {
    pub fn new(time: LocalTime, is_24h: bool) -> Self {
        Self {
            time,
            is_24h,
            uptime_ms: 0,
        }
    }
}

impl WallClock for FakeClock {
    fn now(&self) -> LocalTime {
        self.time
    }

    fn is_24h_style(&self) -> bool {
        self.is_24h
    }

    fn uptime_ms(&self) -> u64 {
        self.uptime_ms
    }
}

#[derive(Debug, Default)]
pub struct RecordingVibes {
    pub pulses: u32,
}

impl Vibes for RecordingVibes {
    fn short_pulse(&mut self) {
        self.pulses += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingOutbox {
    pub sent: Vec<Dictionary>,
    fail_with: Option<DeliveryError>,
}

impl RecordingOutbox {
    pub fn failing(reason: DeliveryError) -> Self {
        Self {
            sent: Vec::new(),
            fail_with: Some(reason),
        }
    }
}

impl Outbox for RecordingOutbox {
    fn send(&mut self, dict: &Dictionary) -> Result<(), DeliveryError> {
        if let Some(reason) = self.fail_with {
            return Err(reason);
        }
        self.sent.push(dict.clone());
        Ok(())
    }
}

#[derive(Debug, Default)]
pub struct RecordingFace {
    pub root: Option<RootLayer>,
    pub created: u32,
    pub destroyed: u32,
    pub draws: Vec<(u8, u8)>,
}

impl FaceLayer for RecordingFace {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
        self.created += 1;
    }

    fn draw(&mut self, hour: u8, minute: u8) {
        self.draws.push((hour, minute));
    }

    fn destroy(&mut self) {
        self.root = None;
        self.destroyed += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingMessage {
    pub created: u32,
    pub destroyed: u32,
    pub texts: Vec<String>,
}

impl MessageLayer for RecordingMessage {
    fn create(&mut self, _root: RootLayer) {
        self.created += 1;
    }

    fn draw(&mut self, text: &str) {
        self.texts.push(String::from(text));
    }

    fn destroy(&mut self) {
        self.destroyed += 1;
    }
}

#[derive(Debug, Default)]
pub struct RecordingStatus {
    pub root: Option<RootLayer>,
    pub created: u32,
    pub destroyed: u32,
    pub bluetooth: Vec<bool>,
    pub battery: Vec<BatteryState>,
}

impl StatusLayer for RecordingStatus {
    fn create(&mut self, root: RootLayer) {
        self.root = Some(root);
        self.created += 1;
    }

    fn show_bluetooth(&mut self, connected: bool) {
        self.bluetooth.push(connected);
    }

    fn show_battery(&mut self, battery: BatteryState) {
        self.battery.push(battery);
    }

    fn destroy(&mut self) {
        self.root = None;
        self.destroyed += 1;
    }
}

/// Every collaborator a [`crate::state::WatchFace`] needs
pub struct Rig {
    pub store: MemoryStore,
    pub timer: FakeTimer,
    pub vibes: RecordingVibes,
    pub clock: FakeClock,
    pub outbox: RecordingOutbox,
    pub face: [RecordingFace; 3],
    pub message: RecordingMessage,
    pub status: RecordingStatus,
}

impl Rig {
    pub fn new() -> Self {
        Self {
            store: MemoryStore::new(),
            timer: FakeTimer::new(),
            vibes: RecordingVibes::default(),
            clock: FakeClock::new(LocalTime::new(12, 0, 0), false),
            outbox: RecordingOutbox::default(),
            face: Default::default(),
            message: RecordingMessage::default(),
            status: RecordingStatus::default(),
        }
    }

    pub fn io(&mut self) -> Io<'_> {
        Io {
            store: &mut self.store,
            timer: &mut self.timer,
            vibes: &mut self.vibes,
            clock: &self.clock,
            outbox: &mut self.outbox,
            face: &mut self.face,
            message: &mut self.message,
            status: &mut self.status,
        }
    }

    /// Move uptime and timers to `ms`
    pub fn advance_to(&mut self, ms: u64) -> Vec<TimerId> {
        self.clock.uptime_ms = ms;
        self.timer.advance_to(ms)
    }
}
