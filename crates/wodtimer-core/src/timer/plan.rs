//! Checked resolution of a [`TimerConfig`] into runnable segments.
//!
//! A [`WorkoutPlan`] can only be produced by [`PlanBuilder::build`], which
//! rejects degenerate values (zero rounds, zero-length work, ...) instead of
//! letting them reach the engine.

use serde::Serialize;

use super::config::{TimerConfig, TimerDiscipline};
use crate::error::ValidationError;

/// The discipline-specific parameters of one segment, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "discipline", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentSpec {
    Amrap {
        total_secs: u64,
    },
    Emom {
        interval_secs: u64,
        /// `None` for death-by.
        total_secs: Option<u64>,
    },
    Tabata {
        rounds: u32,
        work_secs: u64,
        rest_secs: u64,
    },
    ForTime {
        /// `None` when uncapped.
        cap_secs: Option<u64>,
    },
}

impl SegmentSpec {
    pub fn discipline(&self) -> TimerDiscipline {
        match self {
            SegmentSpec::Amrap { .. } => TimerDiscipline::Amrap,
            SegmentSpec::Emom { .. } => TimerDiscipline::Emom,
            SegmentSpec::Tabata { .. } => TimerDiscipline::Tabata,
            SegmentSpec::ForTime { .. } => TimerDiscipline::ForTime,
        }
    }

    /// Fixed length of the segment, if it has one.
    pub fn total_secs(&self) -> Option<u64> {
        match *self {
            SegmentSpec::Amrap { total_secs } => Some(total_secs),
            SegmentSpec::Emom { total_secs, .. } => total_secs,
            SegmentSpec::Tabata {
                rounds,
                work_secs,
                rest_secs,
            } => Some(u64::from(rounds).saturating_mul(work_secs.saturating_add(rest_secs))),
            SegmentSpec::ForTime { cap_secs } => cap_secs,
        }
    }
}

/// One resolved unit of a session. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Segment {
    index: usize,
    label: String,
    /// Rest countdown run before this segment's pre-roll.
    rest_before_secs: u64,
    spec: SegmentSpec,
}

impl Segment {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn rest_before_secs(&self) -> u64 {
        self.rest_before_secs
    }

    pub fn spec(&self) -> &SegmentSpec {
        &self.spec
    }

    pub fn discipline(&self) -> TimerDiscipline {
        self.spec.discipline()
    }
}

/// Ordered, validated segment list for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkoutPlan {
    discipline: TimerDiscipline,
    segments: Vec<Segment>,
}

impl WorkoutPlan {
    pub fn builder(discipline: TimerDiscipline, config: &TimerConfig) -> PlanBuilder<'_> {
        PlanBuilder::new(discipline, config)
    }

    pub fn discipline(&self) -> TimerDiscipline {
        self.discipline
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Sum of fixed segment lengths plus rests. `None` if any segment is open-ended.
    pub fn total_secs(&self) -> Option<u64> {
        self.segments.iter().try_fold(0u64, |acc, seg| {
            let len = seg.spec.total_secs()?;
            Some(acc.saturating_add(len).saturating_add(seg.rest_before_secs))
        })
    }
}

/// Builds a [`WorkoutPlan`] from the loose form state, checking every field
/// the chosen discipline reads. Fields belonging to other disciplines are
/// ignored.
pub struct PlanBuilder<'a> {
    discipline: TimerDiscipline,
    config: &'a TimerConfig,
}

impl<'a> PlanBuilder<'a> {
    pub fn new(discipline: TimerDiscipline, config: &'a TimerConfig) -> Self {
        Self { discipline, config }
    }

    pub fn build(self) -> Result<WorkoutPlan, ValidationError> {
        let cfg = self.config;
        let mut specs: Vec<(String, u64, SegmentSpec)> = Vec::new();

        match self.discipline {
            TimerDiscipline::Amrap => {
                at_least("duration", cfg.duration, 1)?;
                specs.push(("AMRAP".into(), 0, amrap(cfg.duration)));
                for (i, extra) in cfg.amrap_rounds.iter().enumerate() {
                    at_least(&format!("amrapRounds[{i}].duration"), extra.duration, 1)?;
                    specs.push((
                        format!("AMRAP {}", i + 2),
                        minutes(extra.rest),
                        amrap(extra.duration),
                    ));
                }
            }
            TimerDiscipline::Emom => {
                at_least("intervalMinutes", cfg.interval_minutes, 1)?;
                let interval_secs = minutes(cfg.interval_minutes);
                let total_secs = if cfg.is_death_by {
                    None
                } else {
                    at_least("duration", cfg.duration, 1)?;
                    Some(minutes(cfg.duration))
                };
                specs.push((
                    if cfg.is_death_by { "Death By" } else { "EMOM" }.into(),
                    0,
                    SegmentSpec::Emom {
                        interval_secs,
                        total_secs,
                    },
                ));
                if let Some(extra) = cfg.emom_round {
                    at_least("emomRound.round", extra.round, 1)?;
                    specs.push((
                        "EMOM 2".into(),
                        minutes(extra.rest),
                        SegmentSpec::Emom {
                            interval_secs,
                            total_secs: Some(interval_secs.saturating_mul(u64::from(extra.round))),
                        },
                    ));
                }
            }
            TimerDiscipline::Tabata => {
                at_least("rounds", cfg.rounds, 1)?;
                at_least("workSeconds", cfg.work_seconds, 1)?;
                let tabata = |rounds: u32| SegmentSpec::Tabata {
                    rounds,
                    work_secs: u64::from(cfg.work_seconds),
                    rest_secs: u64::from(cfg.rest_seconds),
                };
                specs.push(("Tabata".into(), 0, tabata(cfg.rounds)));
                if let Some(extra) = cfg.tabata_round {
                    at_least("tabataRound.round", extra.round, 1)?;
                    specs.push(("Tabata 2".into(), minutes(extra.rest), tabata(extra.round)));
                }
            }
            TimerDiscipline::ForTime => {
                let cap_secs = if cfg.no_time_cap {
                    None
                } else {
                    at_least("timeCap", cfg.time_cap, 1)?;
                    Some(minutes(cfg.time_cap))
                };
                specs.push(("For Time".into(), 0, SegmentSpec::ForTime { cap_secs }));
            }
        }

        let segments = specs
            .into_iter()
            .enumerate()
            .map(|(index, (label, rest_before_secs, spec))| Segment {
                index,
                label,
                rest_before_secs,
                spec,
            })
            .collect();

        Ok(WorkoutPlan {
            discipline: self.discipline,
            segments,
        })
    }
}

fn at_least(field: &str, value: u32, min: u32) -> Result<(), ValidationError> {
    if value < min {
        return Err(ValidationError::below_minimum(field, min, value));
    }
    Ok(())
}

fn minutes(min: u32) -> u64 {
    u64::from(min).saturating_mul(60)
}

fn amrap(duration_min: u32) -> SegmentSpec {
    SegmentSpec::Amrap {
        total_secs: minutes(duration_min),
    }
}
