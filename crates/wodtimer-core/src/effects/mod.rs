//! Side effects scoped to "a timer is actively running": audio cues and the
//! screen wake-lock. Both are host capabilities reached through traits; the
//! engine only decides *when* they fire.

mod cues;
mod wake_lock;

use std::rc::Rc;

pub use cues::{Cue, CuePlayer, SilentCuePlayer};
pub use wake_lock::{NoWakeLock, ScreenWakeLock, WakeLockProvider};

/// Host capabilities handed to every session the widget creates.
#[derive(Clone)]
pub struct Effects {
    pub cues: Rc<dyn CuePlayer>,
    pub wake_lock: Rc<dyn WakeLockProvider>,
}

impl Effects {
    pub fn new(cues: Rc<dyn CuePlayer>, wake_lock: Rc<dyn WakeLockProvider>) -> Self {
        Self { cues, wake_lock }
    }

    /// No audio, no wake-lock capability.
    pub fn silent() -> Self {
        Self::new(Rc::new(SilentCuePlayer), Rc::new(NoWakeLock))
    }
}

impl std::fmt::Debug for Effects {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effects").finish_non_exhaustive()
    }
}
