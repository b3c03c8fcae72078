//! Recording doubles for the host capabilities.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wodtimer_core::effects::Effects;
use wodtimer_core::{Cue, CuePlayer, Event, WakeLockError, WakeLockProvider};

#[derive(Default)]
pub struct RecordingCues {
    played: RefCell<Vec<Cue>>,
}

impl RecordingCues {
    pub fn count(&self, cue: Cue) -> usize {
        self.played.borrow().iter().filter(|c| **c == cue).count()
    }
}

impl CuePlayer for RecordingCues {
    fn play(&self, cue: Cue) {
        self.played.borrow_mut().push(cue);
    }
}

#[derive(Default)]
pub struct TrackingWakeLock {
    pub outstanding: Cell<i32>,
    pub max_outstanding: Cell<i32>,
    pub acquisitions: Cell<u32>,
    /// Every call to `acquire`, refused or not.
    pub attempts: Cell<u32>,
    pub releases: Cell<u32>,
    pub unsupported: bool,
}

impl TrackingWakeLock {
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Self::default()
        }
    }
}

impl WakeLockProvider for TrackingWakeLock {
    fn acquire(&self) -> Result<(), WakeLockError> {
        self.attempts.set(self.attempts.get() + 1);
        if self.unsupported {
            return Err(WakeLockError::Unsupported);
        }
        self.acquisitions.set(self.acquisitions.get() + 1);
        self.outstanding.set(self.outstanding.get() + 1);
        self.max_outstanding
            .set(self.max_outstanding.get().max(self.outstanding.get()));
        Ok(())
    }

    fn release(&self) {
        self.releases.set(self.releases.get() + 1);
        self.outstanding.set(self.outstanding.get() - 1);
    }
}

pub struct Harness {
    pub cues: Rc<RecordingCues>,
    pub wake_lock: Rc<TrackingWakeLock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_wake_lock(TrackingWakeLock::default())
    }

    pub fn with_wake_lock(wake_lock: TrackingWakeLock) -> Self {
        Self {
            cues: Rc::new(RecordingCues::default()),
            wake_lock: Rc::new(wake_lock),
        }
    }

    pub fn effects(&self) -> Effects {
        Effects::new(self.cues.clone(), self.wake_lock.clone())
    }
}

pub fn count<F: Fn(&Event) -> bool>(events: &[Event], pred: F) -> usize {
    events.iter().filter(|e| pred(e)).count()
}
