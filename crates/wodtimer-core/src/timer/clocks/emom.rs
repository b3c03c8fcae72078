use super::{Advance, Transition};
use crate::effects::Cue;

/// Equal-length rounds; unbounded when `total_secs` is `None` (death-by).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmomClock {
    interval_secs: u64,
    total_secs: Option<u64>,
    elapsed: u64,
}

impl EmomClock {
    pub fn new(interval_secs: u64, total_secs: Option<u64>) -> Self {
        Self {
            interval_secs: interval_secs.max(1),
            total_secs,
            elapsed: 0,
        }
    }

    pub fn elapsed(&self) -> u64 {
        self.elapsed
    }

    pub fn interval_secs(&self) -> u64 {
        self.interval_secs
    }

    pub fn total_rounds(&self) -> Option<u64> {
        self.total_secs
            .map(|total| total.div_ceil(self.interval_secs).max(1))
    }

    /// 1-based. Held at the last round once a bounded clock has run out.
    pub fn current_round(&self) -> u64 {
        let round = self.elapsed / self.interval_secs + 1;
        match self.total_rounds() {
            Some(last) if self.is_finished() => round.min(last),
            _ => round,
        }
    }

    pub fn round_elapsed(&self) -> u64 {
        if self.is_finished() {
            return self.interval_secs;
        }
        self.elapsed % self.interval_secs
    }

    /// Capped by what is left of a bounded clock, so a partial last round
    /// counts down its real length.
    pub fn round_remaining(&self) -> u64 {
        let in_round = self.interval_secs - self.round_elapsed();
        match self.total_secs {
            Some(total) => in_round.min(total.saturating_sub(self.elapsed)),
            None => in_round,
        }
    }

    pub fn tick(&mut self, alert_secs: u64) -> Advance {
        let round_before = self.current_round();
        self.elapsed += 1;
        self.evaluate(round_before, alert_secs)
    }

    /// Jump to the start of the round after next: from 119 s with a 120 s
    /// interval this lands on 240. No intermediate ticks or cues.
    pub fn skip_round(&mut self) -> Advance {
        let round_before = self.current_round();
        let target = (round_before + 1).saturating_mul(self.interval_secs);
        self.elapsed = match self.total_secs {
            Some(total) => target.min(total),
            None => target,
        };
        self.evaluate(round_before, 0)
    }

    pub fn reset(&mut self) {
        self.elapsed = 0;
    }

    fn is_finished(&self) -> bool {
        self.total_secs.is_some_and(|total| self.elapsed >= total)
    }

    fn evaluate(&self, round_before: u64, alert_secs: u64) -> Advance {
        let mut step = Advance::default();
        if self.is_finished() {
            step.completed = true;
            return step;
        }
        if let Some(total) = self.total_secs {
            if alert_secs > 0 && total - self.elapsed == alert_secs {
                step.cues.push(Cue::Alert);
            }
        }
        let round = self.current_round();
        if round != round_before {
            step.transition = Some(Transition::RoundStarted { round });
        }
        step
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ticked(clock: &mut EmomClock, n: u64) {
        for _ in 0..n {
            clock.tick(10);
        }
    }

    #[test]
    fn rounds_follow_interval_boundaries() {
        let mut clock = EmomClock::new(120, Some(600));
        ticked(&mut clock, 119);
        assert_eq!(clock.current_round(), 1);
        assert_eq!(clock.round_remaining(), 1);
        let step = clock.tick(10);
        assert_eq!(clock.elapsed(), 120);
        assert_eq!(clock.current_round(), 2);
        assert_eq!(clock.round_elapsed(), 0);
        assert_eq!(step.transition, Some(Transition::RoundStarted { round: 2 }));
    }

    #[test]
    fn skip_from_last_second_of_round_one_lands_on_round_three() {
        let mut clock = EmomClock::new(120, Some(600));
        ticked(&mut clock, 119);
        let step = clock.skip_round();
        assert_eq!(clock.elapsed(), 240);
        assert_eq!(clock.current_round(), 3);
        assert_eq!(step.transition, Some(Transition::RoundStarted { round: 3 }));
        assert!(step.cues.is_empty());
    }

    #[test]
    fn skip_past_total_completes() {
        let mut clock = EmomClock::new(120, Some(240));
        ticked(&mut clock, 10);
        let step = clock.skip_round();
        assert!(step.completed);
        assert_eq!(clock.elapsed(), 240);
        assert_eq!(clock.current_round(), 2);
    }

    #[test]
    fn bounded_completes_at_total() {
        let mut clock = EmomClock::new(60, Some(180));
        ticked(&mut clock, 179);
        let step = clock.tick(10);
        assert!(step.completed);
        assert_eq!(step.transition, None);
        assert_eq!(clock.total_rounds(), Some(3));
    }

    #[test]
    fn alert_fires_once_before_total() {
        let mut clock = EmomClock::new(120, Some(600));
        let mut alerts = Vec::new();
        for _ in 0..600 {
            let step = clock.tick(10);
            if step.cues.contains(&Cue::Alert) {
                alerts.push(clock.elapsed());
            }
        }
        assert_eq!(alerts, vec![590]);
    }

    #[test]
    fn partial_last_round_counts_down_what_is_left() {
        let mut clock = EmomClock::new(180, Some(600));
        assert_eq!(clock.total_rounds(), Some(4));
        ticked(&mut clock, 540);
        assert_eq!(clock.current_round(), 4);
        assert_eq!(clock.round_remaining(), 60);
        ticked(&mut clock, 59);
        assert_eq!(clock.round_remaining(), 1);
        assert!(clock.tick(10).completed);
        assert_eq!(clock.round_remaining(), 0);
    }

    #[test]
    fn death_by_runs_forever() {
        let mut clock = EmomClock::new(60, None);
        for _ in 0..3600 {
            assert!(!clock.tick(10).completed);
        }
        assert_eq!(clock.current_round(), 61);
        assert_eq!(clock.total_rounds(), None);
    }
}
