//! Segment engine.
//!
//! Drives one resolved [`Segment`]: the optional pre-roll, then the
//! discipline clock. It does not use internal threads or wall-clock reads;
//! the caller invokes `tick()` once per second and every tick is counted as
//! exactly one second.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> PreRoll -> Running -> Completed
//!           |          |
//!           +-> Paused <+
//! ```
//!
//! Pre-roll and the clock never tick in the same call. `reset()` from any
//! non-completed state zeroes the clock and goes back to `Idle`.

use std::rc::Rc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::clocks::{Clock, DisciplineView, Transition};
use super::plan::Segment;
use super::preroll::{PreRoll, PreRollStep, DEFAULT_PRE_ROLL_SECS};
use crate::effects::{Cue, CuePlayer};
use crate::events::Event;
use crate::timer::TimerDiscipline;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentState {
    Idle,
    PreRoll,
    Running,
    Paused,
    Completed,
}

/// Engine behaviour switches, persisted as the `[engine]` settings section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineOptions {
    #[serde(default = "default_true")]
    pub with_pre_roll: bool,
    #[serde(default = "default_true")]
    pub with_wake_lock: bool,
    #[serde(default = "default_pre_roll_seconds")]
    pub pre_roll_seconds: u64,
    /// Seconds-before-end at which the alert cue plays. 0 disables it.
    #[serde(default = "default_alert_seconds")]
    pub alert_seconds: u64,
    /// Start the next segment without waiting for the caller.
    #[serde(default = "default_true")]
    pub auto_advance: bool,
    /// Return the widget to its badge once the session completes.
    #[serde(default)]
    pub auto_close_on_complete: bool,
}

fn default_true() -> bool {
    true
}
fn default_pre_roll_seconds() -> u64 {
    DEFAULT_PRE_ROLL_SECS
}
fn default_alert_seconds() -> u64 {
    10
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            with_pre_roll: true,
            with_wake_lock: true,
            pre_roll_seconds: default_pre_roll_seconds(),
            alert_seconds: default_alert_seconds(),
            auto_advance: true,
            auto_close_on_complete: false,
        }
    }
}

pub struct SegmentEngine {
    segment: Segment,
    clock: Clock,
    state: SegmentState,
    /// Present while counting down, including when paused mid-countdown.
    pre_roll: Option<PreRoll>,
    with_pre_roll: bool,
    pre_roll_secs: u64,
    alert_secs: u64,
    cues: Rc<dyn CuePlayer>,
}

impl SegmentEngine {
    pub fn new(segment: Segment, options: &EngineOptions, cues: Rc<dyn CuePlayer>) -> Self {
        let clock = Clock::from_spec(segment.spec());
        Self {
            segment,
            clock,
            state: SegmentState::Idle,
            pre_roll: None,
            with_pre_roll: options.with_pre_roll,
            pre_roll_secs: options.pre_roll_seconds,
            alert_secs: options.alert_seconds,
            cues,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SegmentState {
        self.state
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn elapsed(&self) -> u64 {
        self.clock.elapsed()
    }

    pub fn is_completed(&self) -> bool {
        self.state == SegmentState::Completed
    }

    /// Remaining pre-roll seconds, if a countdown is pending.
    pub fn pre_roll_remaining(&self) -> Option<u64> {
        self.pre_roll.as_ref().map(PreRoll::remaining)
    }

    /// Primary counter: pre-roll remaining while counting down, otherwise
    /// the discipline's readout.
    pub fn readout_secs(&self) -> u64 {
        self.pre_roll_remaining()
            .unwrap_or_else(|| self.clock.readout_secs())
    }

    pub fn view(&self) -> DisciplineView {
        self.clock.view()
    }

    /// Last round reached, for round-based disciplines.
    pub fn final_round(&self) -> Option<u64> {
        match self.clock.view() {
            DisciplineView::Emom { current_round, .. } => Some(current_round),
            DisciplineView::Tabata { current_round, .. } => Some(u64::from(current_round)),
            _ => None,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idempotent: starting a counting, running or completed segment does
    /// nothing. Starting a paused one resumes it.
    pub fn start(&mut self) -> Vec<Event> {
        match self.state {
            SegmentState::Idle => {
                if self.with_pre_roll {
                    self.state = SegmentState::PreRoll;
                    self.pre_roll = Some(PreRoll::new(self.pre_roll_secs));
                    debug!(segment = self.index(), "pre-roll started");
                    vec![Event::PreRollStarted {
                        segment_index: self.index(),
                        secs: self.pre_roll_secs.max(1),
                        at: Utc::now(),
                    }]
                } else {
                    let mut events = Vec::new();
                    self.play(Cue::Start, &mut events);
                    self.begin(&mut events);
                    events
                }
            }
            SegmentState::Paused => self.resume(),
            SegmentState::PreRoll | SegmentState::Running | SegmentState::Completed => Vec::new(),
        }
    }

    pub fn pause(&mut self) -> Vec<Event> {
        match self.state {
            SegmentState::PreRoll | SegmentState::Running => {
                self.state = SegmentState::Paused;
                vec![Event::SegmentPaused {
                    segment_index: self.index(),
                    elapsed_secs: self.elapsed(),
                    at: Utc::now(),
                }]
            }
            _ => Vec::new(),
        }
    }

    pub fn resume(&mut self) -> Vec<Event> {
        if self.state != SegmentState::Paused {
            return Vec::new();
        }
        self.state = if self.pre_roll.is_some() {
            SegmentState::PreRoll
        } else {
            SegmentState::Running
        };
        vec![Event::SegmentResumed {
            segment_index: self.index(),
            state: self.state,
            at: Utc::now(),
        }]
    }

    /// Zero the counters and cancel any pending countdown.
    pub fn reset(&mut self) -> Vec<Event> {
        if self.state == SegmentState::Completed {
            return Vec::new();
        }
        self.clock.reset();
        self.pre_roll = None;
        self.state = SegmentState::Idle;
        debug!(segment = self.index(), "segment reset");
        vec![Event::SegmentReset {
            segment_index: self.index(),
            at: Utc::now(),
        }]
    }

    pub fn tick(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.state {
            SegmentState::PreRoll => {
                let Some(pre_roll) = self.pre_roll.as_mut() else {
                    return events;
                };
                let step = pre_roll.tick();
                self.play(step.cue(), &mut events);
                if step == PreRollStep::Go {
                    self.pre_roll = None;
                    self.begin(&mut events);
                }
            }
            SegmentState::Running => {
                let step = self.clock.tick(self.alert_secs);
                for cue in step.cues {
                    self.play(cue, &mut events);
                }
                if let Some(transition) = step.transition {
                    events.push(self.transition_event(transition));
                }
                if step.completed {
                    self.complete(&mut events);
                }
            }
            _ => {}
        }
        events
    }

    /// For-Time "finish now". No-op for other disciplines and for segments
    /// that have not started counting.
    pub fn finish_now(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.segment.discipline() == TimerDiscipline::ForTime && self.has_started() {
            self.complete(&mut events);
        }
        events
    }

    /// EMOM "skip to next round". No-op for other disciplines.
    pub fn skip_round(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if !self.has_started() {
            return events;
        }
        let Clock::Emom(clock) = &mut self.clock else {
            return events;
        };
        let step = clock.skip_round();
        if let Some(transition) = step.transition {
            events.push(self.transition_event(transition));
        }
        if step.completed {
            self.complete(&mut events);
        }
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn index(&self) -> usize {
        self.segment.index()
    }

    /// Counting has begun and not finished (pre-roll excluded).
    fn has_started(&self) -> bool {
        match self.state {
            SegmentState::Running => true,
            SegmentState::Paused => self.pre_roll.is_none(),
            _ => false,
        }
    }

    fn begin(&mut self, events: &mut Vec<Event>) {
        self.state = SegmentState::Running;
        info!(
            segment = self.index(),
            discipline = %self.segment.discipline(),
            "segment started"
        );
        events.push(Event::SegmentStarted {
            segment_index: self.index(),
            discipline: self.segment.discipline(),
            at: Utc::now(),
        });
    }

    fn complete(&mut self, events: &mut Vec<Event>) {
        if self.state == SegmentState::Completed {
            return;
        }
        self.state = SegmentState::Completed;
        self.pre_roll = None;
        self.play(Cue::Finish, events);
        info!(
            segment = self.index(),
            elapsed = self.elapsed(),
            "segment completed"
        );
        events.push(Event::SegmentCompleted {
            segment_index: self.index(),
            discipline: self.segment.discipline(),
            elapsed_secs: self.elapsed(),
            at: Utc::now(),
        });
    }

    fn play(&self, cue: Cue, events: &mut Vec<Event>) {
        self.cues.play(cue);
        events.push(Event::CuePlayed {
            cue,
            at: Utc::now(),
        });
    }

    fn transition_event(&self, transition: Transition) -> Event {
        match transition {
            Transition::RoundStarted { round } => Event::RoundStarted {
                segment_index: self.index(),
                round,
                at: Utc::now(),
            },
            Transition::PhaseChanged { round, is_working } => Event::PhaseChanged {
                segment_index: self.index(),
                round,
                is_working,
                at: Utc::now(),
            },
        }
    }
}

impl std::fmt::Debug for SegmentEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SegmentEngine")
            .field("segment", &self.segment)
            .field("clock", &self.clock)
            .field("state", &self.state)
            .field("pre_roll", &self.pre_roll)
            .finish_non_exhaustive()
    }
}
