use super::{Advance, Transition};

/// Alternating work/rest phases for a fixed round count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabataClock {
    rounds: u32,
    work_secs: u64,
    rest_secs: u64,
    current_round: u32,
    is_working: bool,
    secs_in_phase: u64,
    elapsed: u64,
    done: bool,
}

impl TabataClock {
    pub fn new(rounds: u32, work_secs: u64, rest_secs: u64) -> Self {
        Self {
            rounds,
            work_secs,
            rest_secs,
            current_round: 1,
            is_working: true,
            secs_in_phase: 0,
            elapsed: 0,
            done: false,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_working(&self) -> bool {
        self.is_working
    }

    fn phase_len(&self) -> u64 {
        if self.is_working {
            self.work_secs
        } else {
            self.rest_secs
        }
    }

    pub fn remaining_in_phase(&self) -> u64 {
        if self.done {
            return 0;
        }
        self.phase_len().saturating_sub(self.secs_in_phase)
    }

    pub fn cycle_secs(&self) -> u64 {
        self.work_secs + self.rest_secs
    }

    /// 0.0 .. 100.0 across all rounds.
    pub fn percent_complete(&self) -> f64 {
        let total = self.cycle_secs().saturating_mul(u64::from(self.rounds));
        if self.done || total == 0 {
            return if self.done { 100.0 } else { 0.0 };
        }
        let phase_offset = if self.is_working {
            self.secs_in_phase
        } else {
            self.work_secs + self.secs_in_phase
        };
        let done_secs = u64::from(self.current_round - 1) * self.cycle_secs() + phase_offset;
        (done_secs as f64 / total as f64 * 100.0).min(100.0)
    }

    pub fn tick(&mut self) -> Advance {
        self.elapsed += 1;
        self.secs_in_phase += 1;
        if self.secs_in_phase < self.phase_len() {
            return Advance::default();
        }
        if self.is_working && self.rest_secs > 0 {
            self.is_working = false;
            self.secs_in_phase = 0;
            return Advance::transition(Transition::PhaseChanged {
                round: self.current_round,
                is_working: false,
            });
        }
        // End of rest, or end of work when there is no rest phase.
        if self.current_round >= self.rounds {
            self.done = true;
            return Advance::completed();
        }
        self.current_round += 1;
        self.is_working = true;
        self.secs_in_phase = 0;
        Advance::transition(Transition::PhaseChanged {
            round: self.current_round,
            is_working: true,
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new(self.rounds, self.work_secs, self.rest_secs);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_tabata_completes_on_tick_240() {
        let mut clock = TabataClock::new(8, 20, 10);
        assert_eq!(clock.cycle_secs() * 8, 240);

        let mut work_to_rest = 0;
        let mut rest_to_work = 0;
        for tick in 1..=240 {
            let step = clock.tick();
            match step.transition {
                Some(Transition::PhaseChanged { is_working: false, .. }) => work_to_rest += 1,
                Some(Transition::PhaseChanged { is_working: true, .. }) => rest_to_work += 1,
                _ => {}
            }
            assert_eq!(step.completed, tick == 240, "tick {tick}");
        }
        assert_eq!(work_to_rest, 8);
        assert_eq!(rest_to_work, 7);
        assert_eq!(clock.current_round(), 8);
        assert_eq!(clock.percent_complete(), 100.0);
    }

    #[test]
    fn readout_counts_down_within_phase() {
        let mut clock = TabataClock::new(2, 20, 10);
        assert_eq!(clock.remaining_in_phase(), 20);
        for _ in 0..5 {
            clock.tick();
        }
        assert_eq!(clock.remaining_in_phase(), 15);
        for _ in 0..15 {
            clock.tick();
        }
        assert!(!clock.is_working());
        assert_eq!(clock.remaining_in_phase(), 10);
        assert_eq!(clock.current_round(), 1);
    }

    #[test]
    fn percent_complete_tracks_cycle_offset() {
        let mut clock = TabataClock::new(2, 20, 10);
        for _ in 0..25 {
            clock.tick();
        }
        // round 1, 5 s into rest: (0*30 + 20 + 5) / 60
        assert!((clock.percent_complete() - 25.0 / 60.0 * 100.0).abs() < 1e-9);
        for _ in 0..10 {
            clock.tick();
        }
        // round 2, 5 s into work: (30 + 5) / 60
        assert!((clock.percent_complete() - 35.0 / 60.0 * 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_rest_skips_rest_phase() {
        let mut clock = TabataClock::new(3, 10, 0);
        let mut completed_at = None;
        for tick in 1..=40 {
            if clock.tick().completed {
                completed_at = Some(tick);
                break;
            }
            assert!(clock.is_working());
        }
        assert_eq!(completed_at, Some(30));
    }

    #[test]
    fn reset_restores_first_round() {
        let mut clock = TabataClock::new(2, 5, 5);
        for _ in 0..12 {
            clock.tick();
        }
        clock.reset();
        assert_eq!(clock.current_round(), 1);
        assert!(clock.is_working());
        assert_eq!(clock.elapsed(), 0);
        assert_eq!(clock.remaining_in_phase(), 5);
    }
}
