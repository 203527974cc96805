//! Overlay dismissal timers
//!
//! The controller registers deadlines synchronously through [`EmbassyTimer`];
//! `message_timer_task` sleeps until the earliest one and posts a
//! `MessageTimerFired` event. A deadline that fires while the controller
//! is rescheduling it is already gone from the table, so the reschedule
//! fails and the late event is recognised as stale by its id.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::{Duration, Instant};
use fillerup_hal::{AppTimer, TimerError, TimerId};
use heapless::Vec;

use crate::channels::TIMER_WAKE;

/// Concurrent timers; the face needs one, a stale one may linger briefly
pub const MAX_TIMERS: usize = 4;

/// Pending deadlines
pub struct TimerTable {
    next: TimerId,
    pending: Vec<(TimerId, Instant), MAX_TIMERS>,
}

impl TimerTable {
    const fn new() -> Self {
        Self {
            next: TimerId(1),
            pending: Vec::new(),
        }
    }

    /// Earliest pending deadline
    pub fn earliest(&self) -> Option<Instant> {
        self.pending.iter().map(|&(_, at)| at).min()
    }

    /// Remove and return every timer due at `now`
    pub fn take_due(&mut self, now: Instant) -> Vec<TimerId, MAX_TIMERS> {
        let due = self
            .pending
            .iter()
            .filter(|&&(_, at)| at <= now)
            .map(|&(id, _)| id)
            .collect();
        self.pending.retain(|&(_, at)| at > now);
        due
    }
}

/// Shared timer table
pub static TIMERS: Mutex<CriticalSectionRawMutex, RefCell<TimerTable>> =
    Mutex::new(RefCell::new(TimerTable::new()));

/// `AppTimer` backed by [`TIMERS`]
pub struct EmbassyTimer;

fn deadline(after_ms: u32) -> Instant {
    Instant::now() + Duration::from_millis(after_ms as u64)
}

impl AppTimer for EmbassyTimer {
    fn register(&mut self, after_ms: u32) -> Result<TimerId, TimerError> {
        let at = deadline(after_ms);
        let id = TIMERS.lock(|table| -> Result<TimerId, TimerError> {
            let mut table = table.borrow_mut();
            let id = table.next;
            table
                .pending
                .push((id, at))
                .map_err(|_| TimerError::Exhausted)?;
            table.next = id.next();
            Ok(id)
        })?;
        TIMER_WAKE.signal(());
        Ok(id)
    }

    fn reschedule(&mut self, id: TimerId, after_ms: u32) -> bool {
        let at = deadline(after_ms);
        let found = TIMERS.lock(|table| {
            let mut table = table.borrow_mut();
            match table.pending.iter_mut().find(|(p, _)| *p == id) {
                Some(entry) => {
                    entry.1 = at;
                    true
                }
                None => false,
            }
        });
        if found {
            TIMER_WAKE.signal(());
        }
        found
    }

    fn cancel(&mut self, id: TimerId) {
        TIMERS.lock(|table| table.borrow_mut().pending.retain(|&(p, _)| p != id));
        TIMER_WAKE.signal(());
    }
}
