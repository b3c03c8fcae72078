use super::Advance;
use crate::effects::Cue;

/// Count-up, optionally capped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForTimeClock {
    cap_secs: Option<u64>,
    elapsed: u64,
}

impl ForTimeClock {
    pub fn new(cap_secs: Option<u64>) -> Self {
        Self {
            cap_secs,
            elapsed: 0,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn cap_secs(&self) -> Option<u64> {
        self.cap_secs
    }

    pub fn tick(&mut self, alert_secs: u64) -> Advance {
        self.elapsed += 1;
        let mut step = Advance::default();
        if let Some(cap) = self.cap_secs {
            if alert_secs > 0 && self.elapsed < cap && cap - self.elapsed == alert_secs {
                step.cues.push(Cue::Alert);
            }
            step.completed = self.elapsed >= cap;
        }
        step
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}
