//! Per-discipline tick drivers.
//!
//! Each clock owns the elapsed/round/phase counters of one segment and knows
//! nothing about pre-roll, pausing or side effects: one call to `tick` is one
//! second of accumulated work. Counters are plain accumulators, so a paused
//! segment simply stops receiving ticks.

mod amrap;
mod emom;
mod for_time;
mod tabata;

pub use amrap::AmrapClock;
pub use emom::EmomClock;
pub use for_time::ForTimeClock;
pub use tabata::TabataClock;

use serde::Serialize;

use super::plan::SegmentSpec;
use crate::effects::Cue;

/// Round or phase change observed during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Transition {
    RoundStarted { round: u64 },
    PhaseChanged { round: u32, is_working: bool },
}

/// What one tick produced.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Advance {
    pub cues: Vec<Cue>,
    pub transition: Option<Transition>,
    pub completed: bool,
}

impl Advance {
    fn transition(transition: Transition) -> Self {
        Self {
            transition: Some(transition),
            ..Self::default()
        }
    }

    fn completed() -> Self {
        Self {
            completed: true,
            ..Self::default()
        }
    }
}

/// Discipline-specific state for the running panel.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(
    tag = "discipline",
    rename_all = "SCREAMING_SNAKE_CASE",
    rename_all_fields = "camelCase"
)]
pub enum DisciplineView {
    Amrap {
        elapsed: u64,
        remaining: u64,
        total: u64,
    },
    Emom {
        elapsed: u64,
        current_round: u64,
        total_rounds: Option<u64>,
        round_elapsed: u64,
        round_remaining: u64,
    },
    Tabata {
        elapsed: u64,
        current_round: u32,
        rounds: u32,
        is_working: bool,
        remaining_in_phase: u64,
        percent_complete: f64,
    },
    ForTime {
        elapsed: u64,
        cap: Option<u64>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clock {
    Amrap(AmrapClock),
    Emom(EmomClock),
    Tabata(TabataClock),
    ForTime(ForTimeClock),
}

impl Clock {
    pub fn from_spec(spec: &SegmentSpec) -> Self {
        match *spec {
            SegmentSpec::Amrap { total_secs } => Clock::Amrap(AmrapClock::new(total_secs)),
            SegmentSpec::Emom {
                interval_secs,
                total_secs,
            } => Clock::Emom(EmomClock::new(interval_secs, total_secs)),
            SegmentSpec::Tabata {
                rounds,
                work_secs,
                rest_secs,
            } => Clock::Tabata(TabataClock::new(rounds, work_secs, rest_secs)),
            SegmentSpec::ForTime { cap_secs } => Clock::ForTime(ForTimeClock::new(cap_secs)),
        }
    }

    pub fn elapsed(&self) -> u64 {
        match self {
            Clock::Amrap(c) => c.elapsed(),
            Clock::Emom(c) => c.elapsed(),
            Clock::Tabata(c) => c.elapsed(),
            Clock::ForTime(c) => c.elapsed(),
        }
    }

    pub fn tick(&mut self, alert_secs: u64) -> Advance {
        match self {
            Clock::Amrap(c) => c.tick(alert_secs),
            Clock::Emom(c) => c.tick(alert_secs),
            Clock::Tabata(c) => c.tick(),
            Clock::ForTime(c) => c.tick(alert_secs),
        }
    }

    pub fn reset(&mut self) {
        match self {
            Clock::Amrap(c) => c.reset(),
            Clock::Emom(c) => c.reset(),
            Clock::Tabata(c) => c.reset(),
            Clock::ForTime(c) => c.reset(),
        }
    }

    /// Seconds shown on the single-line readout.
    pub fn readout_secs(&self) -> u64 {
        match self {
            Clock::Amrap(c) => c.remaining(),
            Clock::Emom(c) => c.round_remaining(),
            Clock::Tabata(c) => c.remaining_in_phase(),
            Clock::ForTime(c) => c.elapsed(),
        }
    }

    pub fn view(&self) -> DisciplineView {
        match self {
            Clock::Amrap(c) => DisciplineView::Amrap {
                elapsed: c.elapsed(),
                remaining: c.remaining(),
                total: c.total_secs(),
            },
            Clock::Emom(c) => DisciplineView::Emom {
                elapsed: c.elapsed(),
                current_round: c.current_round(),
                total_rounds: c.total_rounds(),
                round_elapsed: c.round_elapsed(),
                round_remaining: c.round_remaining(),
            },
            Clock::Tabata(c) => DisciplineView::Tabata {
                elapsed: c.elapsed(),
                current_round: c.current_round(),
                rounds: c.rounds(),
                is_working: c.is_working(),
                remaining_in_phase: c.remaining_in_phase(),
                percent_complete: c.percent_complete(),
            },
            Clock::ForTime(c) => DisciplineView::ForTime {
                elapsed: c.elapsed(),
                cap: c.cap_secs(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readout_follows_primary_counter() {
        let mut amrap = Clock::from_spec(&SegmentSpec::Amrap { total_secs: 60 });
        let mut for_time = Clock::from_spec(&SegmentSpec::ForTime { cap_secs: None });
        for _ in 0..15 {
            amrap.tick(10);
            for_time.tick(10);
        }
        assert_eq!(amrap.readout_secs(), 45);
        assert_eq!(for_time.readout_secs(), 15);
    }

    #[test]
    fn view_serializes_with_discipline_tag() {
        let clock = Clock::from_spec(&SegmentSpec::Tabata {
            rounds: 8,
            work_secs: 20,
            rest_secs: 10,
        });
        let json = serde_json::to_value(clock.view()).unwrap();
        assert_eq!(json["discipline"], "TABATA");
        assert_eq!(json["remainingInPhase"], 20);
        assert_eq!(json["isWorking"], true);
    }
}
