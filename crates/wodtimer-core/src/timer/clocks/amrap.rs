use super::Advance;
use crate::effects::Cue;

/// Fixed-length count-down.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AmrapClock {
    total_secs: u64,
    elapsed: u64,
}

impl AmrapClock {
    pub fn new(total_secs: u64) -> Self {
        Self {
            total_secs,
            elapsed: 0,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    pub fn remaining(&self) -> u64 {
        self.total_secs.saturating_sub(self.elapsed)
    }

    pub fn tick(&mut self, alert_secs: u64) -> Advance {
        self.elapsed += 1;
        let mut step = Advance::default();
        if alert_secs > 0 && self.remaining() == alert_secs {
            step.cues.push(Cue::Alert);
        }
        step.completed = self.elapsed >= self.total_secs;
        step
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_fires_once_at_ten_remaining() {
        let mut clock = AmrapClock::new(20 * 60);
        let mut alerts = 0;
        for _ in 0..1190 {
            let step = clock.tick(10);
            alerts += step.cues.iter().filter(|c| **c == Cue::Alert).count();
            assert!(!step.completed);
        }
        assert_eq!(clock.remaining(), 10);
        assert_eq!(alerts, 1);
        for _ in 0..9 {
            assert!(!clock.tick(10).completed);
        }
        assert!(clock.tick(10).completed);
        assert_eq!(clock.elapsed(), 1200);
    }

    #[test]
    fn short_segment_never_alerts() {
        let mut clock = AmrapClock::new(5);
        let cues: usize = (0..5).map(|_| clock.tick(10).cues.len()).sum();
        assert_eq!(cues, 0);
    }
}
