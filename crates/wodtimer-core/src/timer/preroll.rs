//! "Get ready" countdown run before every segment.

use crate::effects::Cue;

pub const DEFAULT_PRE_ROLL_SECS: u64 = 10;

/// Outcome of one pre-roll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreRollStep {
    /// Still counting; play a beep.
    Beep { remaining: u64 },
    /// Reached zero; play the start cue and begin the segment.
    Go,
}

impl PreRollStep {
    pub fn cue(self) -> Cue {
        match self {
            PreRollStep::Beep { .. } => Cue::CountdownBeep,
            PreRollStep::Go => Cue::Start,
        }
    }
}

/// Nothing happens until the first tick, so starting twice in quick
/// succession makes no sound. Dropping the value cancels it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRoll {
    remaining: u64,
}

impl PreRoll {
    pub fn new(secs: u64) -> Self {
        Self {
            remaining: secs.max(1),
        }
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn tick(&mut self) -> PreRollStep {
        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            PreRollStep::Go
        } else {
            PreRollStep::Beep {
                remaining: self.remaining,
            }
        }
    }
}
