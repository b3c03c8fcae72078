//! Multi-segment orchestrator.
//!
//! A [`Session`] runs the segments of a [`WorkoutPlan`] back to back. It owns
//! the active [`SegmentEngine`], the rest countdown between segments and the
//! session's single wake-lock handle, and it is the only place that turns a
//! segment completion into "advance" or "session complete".

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use super::clocks::DisciplineView;
use super::engine::{EngineOptions, SegmentEngine, SegmentState};
use super::plan::{Segment, WorkoutPlan};
use crate::effects::{Effects, ScreenWakeLock};
use crate::events::Event;
use crate::format::format_clock;
use crate::history::{SegmentResult, WorkoutSummary};
use crate::timer::TimerDiscipline;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stage {
    /// Rest countdown before the active segment.
    Resting { remaining: u64, running: bool },
    /// The active engine owns the clock.
    Segment,
    /// Every segment completed.
    Finished,
}

/// Point-in-time view of the orchestrator.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub session_id: Uuid,
    pub segments: Vec<Segment>,
    pub active_index: usize,
    pub elapsed_in_segment: u64,
    pub is_running: bool,
    pub is_in_pre_roll: bool,
    pub is_resting: bool,
    pub is_complete: bool,
}

/// Everything the running panel draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningView {
    pub segment_index: usize,
    pub segment_count: usize,
    pub label: String,
    pub state: SegmentState,
    pub readout: String,
    pub pre_roll_remaining: Option<u64>,
    pub rest_remaining: Option<u64>,
    pub detail: DisciplineView,
}

pub struct Session {
    id: Uuid,
    plan: WorkoutPlan,
    options: EngineOptions,
    effects: Effects,
    engine: SegmentEngine,
    active_index: usize,
    stage: Stage,
    started_at: Option<DateTime<Utc>>,
    results: Vec<SegmentResult>,
    wake_lock: ScreenWakeLock,
}

impl Session {
    pub fn new(plan: WorkoutPlan, options: EngineOptions, effects: Effects) -> Self {
        let first = plan.segments()[0].clone();
        let engine = SegmentEngine::new(first, &options, effects.cues.clone());
        let wake_lock = ScreenWakeLock::new(effects.wake_lock.clone(), options.with_wake_lock);
        Self {
            id: Uuid::new_v4(),
            plan,
            options,
            effects,
            engine,
            active_index: 0,
            stage: Stage::Segment,
            started_at: None,
            results: Vec::new(),
            wake_lock,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn plan(&self) -> &WorkoutPlan {
        &self.plan
    }

    pub fn discipline(&self) -> TimerDiscipline {
        self.plan.discipline()
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn engine(&self) -> &SegmentEngine {
        &self.engine
    }

    pub fn is_complete(&self) -> bool {
        self.stage == Stage::Finished
    }

    pub fn is_running(&self) -> bool {
        match self.stage {
            Stage::Resting { running, .. } => running,
            Stage::Segment => matches!(
                self.engine.state(),
                SegmentState::PreRoll | SegmentState::Running
            ),
            Stage::Finished => false,
        }
    }

    pub fn wake_lock_held(&self) -> bool {
        self.wake_lock.is_held()
    }

    fn rest_remaining(&self) -> Option<u64> {
        match self.stage {
            Stage::Resting { remaining, .. } => Some(remaining),
            _ => None,
        }
    }

    /// The single-line readout shown by the minimized widget.
    pub fn readout(&self) -> String {
        format_clock(self.rest_remaining().unwrap_or_else(|| self.engine.readout_secs()))
    }

    pub fn state(&self) -> SessionState {
        SessionState {
            session_id: self.id,
            segments: self.plan.segments().to_vec(),
            active_index: self.active_index,
            elapsed_in_segment: self.engine.elapsed(),
            is_running: self.is_running(),
            is_in_pre_roll: self.stage == Stage::Segment
                && self.engine.state() == SegmentState::PreRoll,
            is_resting: matches!(self.stage, Stage::Resting { .. }),
            is_complete: self.is_complete(),
        }
    }

    pub fn running_view(&self) -> RunningView {
        let segment = self.engine.segment();
        RunningView {
            segment_index: self.active_index,
            segment_count: self.plan.len(),
            label: segment.label().to_string(),
            state: self.engine.state(),
            readout: self.readout(),
            pre_roll_remaining: self.engine.pre_roll_remaining(),
            rest_remaining: self.rest_remaining(),
            detail: self.engine.view(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Idempotent. The first call also announces the session.
    pub fn start(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        if self.started_at.is_none() {
            let now = Utc::now();
            self.started_at = Some(now);
            info!(
                session = %self.id,
                discipline = %self.plan.discipline(),
                segments = self.plan.len(),
                "session started"
            );
            events.push(Event::SessionStarted {
                session_id: self.id,
                discipline: self.plan.discipline(),
                segment_count: self.plan.len(),
                at: now,
            });
        }
        match &mut self.stage {
            Stage::Resting { running, .. } => *running = true,
            Stage::Segment => events.extend(self.engine.start()),
            Stage::Finished => {}
        }
        self.sync_wake_lock();
        events
    }

    pub fn pause(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match &mut self.stage {
            Stage::Resting { running, .. } => *running = false,
            Stage::Segment => events.extend(self.engine.pause()),
            Stage::Finished => {}
        }
        self.sync_wake_lock();
        events
    }

    pub fn resume(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match &mut self.stage {
            Stage::Resting { running, .. } => *running = true,
            Stage::Segment => events.extend(self.engine.resume()),
            Stage::Finished => {}
        }
        self.sync_wake_lock();
        events
    }

    /// Zero the active segment (or restart its rest) and stop counting.
    pub fn reset_segment(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        match self.stage {
            Stage::Resting { .. } => {
                self.stage = Stage::Resting {
                    remaining: self.engine.segment().rest_before_secs(),
                    running: false,
                };
            }
            Stage::Segment => events.extend(self.engine.reset()),
            Stage::Finished => {}
        }
        self.sync_wake_lock();
        events
    }

    pub fn finish_now(&mut self) -> Vec<Event> {
        if self.stage != Stage::Segment {
            return Vec::new();
        }
        let events = self.engine.finish_now();
        self.after_engine(events)
    }

    pub fn skip_round(&mut self) -> Vec<Event> {
        if self.stage != Stage::Segment {
            return Vec::new();
        }
        let events = self.engine.skip_round();
        self.after_engine(events)
    }

    /// Tear down early. Releases the wake-lock; the session is finished
    /// afterwards and will not emit `SessionCompleted`.
    pub fn stop(&mut self) -> Vec<Event> {
        if self.stage == Stage::Finished {
            self.wake_lock.release();
            return Vec::new();
        }
        self.stage = Stage::Finished;
        self.wake_lock.release();
        info!(session = %self.id, "session stopped");
        vec![Event::SessionStopped {
            session_id: self.id,
            at: Utc::now(),
        }]
    }

    /// Advance one second. Paused or finished sessions ignore the tick.
    pub fn tick(&mut self) -> Vec<Event> {
        if !self.is_running() {
            return Vec::new();
        }
        let index = self.active_index;
        let mut events = match self.stage {
            Stage::Resting { remaining, .. } => {
                let remaining = remaining.saturating_sub(1);
                if remaining == 0 {
                    debug!(segment = index, "rest finished");
                    self.stage = Stage::Segment;
                    self.engine.start()
                } else {
                    self.stage = Stage::Resting {
                        remaining,
                        running: true,
                    };
                    Vec::new()
                }
            }
            _ => {
                let events = self.engine.tick();
                self.after_engine(events)
            }
        };
        events.push(Event::TimeUpdate {
            segment_index: index,
            readout: self.readout(),
            at: Utc::now(),
        });
        self.sync_wake_lock();
        events
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Handle a completion reported by the active engine.
    fn after_engine(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        if self.stage != Stage::Segment || !self.engine.is_completed() {
            return events;
        }
        self.results.push(SegmentResult {
            index: self.active_index,
            label: self.engine.segment().label().to_string(),
            discipline: self.engine.segment().discipline(),
            elapsed_secs: self.engine.elapsed(),
            final_round: self.engine.final_round(),
        });

        let next_index = self.active_index + 1;
        let Some(next) = self.plan.segments().get(next_index).cloned() else {
            self.stage = Stage::Finished;
            self.wake_lock.release();
            let summary = self.summary();
            info!(
                session = %self.id,
                active_secs = summary.total_active_secs(),
                "session completed"
            );
            events.push(Event::SessionCompleted {
                summary,
                at: Utc::now(),
            });
            return events;
        };

        debug!(from = self.active_index, to = next_index, "advancing segment");
        let rest_secs = next.rest_before_secs();
        self.active_index = next_index;
        self.engine = SegmentEngine::new(next, &self.options, self.effects.cues.clone());
        if rest_secs > 0 {
            self.stage = Stage::Resting {
                remaining: rest_secs,
                running: self.options.auto_advance,
            };
            events.push(Event::RestStarted {
                segment_index: next_index,
                rest_secs,
                at: Utc::now(),
            });
        } else {
            self.stage = Stage::Segment;
            if self.options.auto_advance {
                events.extend(self.engine.start());
            }
        }
        self.sync_wake_lock();
        events
    }

    /// Hold the lock exactly while counting. The handle survives segment
    /// boundaries as long as the session keeps running.
    fn sync_wake_lock(&mut self) {
        if self.is_running() {
            self.wake_lock.acquire();
        } else {
            self.wake_lock.release();
        }
    }

    fn summary(&self) -> WorkoutSummary {
        WorkoutSummary {
            session_id: self.id,
            discipline: self.plan.discipline(),
            started_at: self.started_at.unwrap_or_else(Utc::now),
            completed_at: Utc::now(),
            segments: self.results.clone(),
        }
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("id", &self.id)
            .field("active_index", &self.active_index)
            .field("stage", &self.stage)
            .field("engine", &self.engine)
            .field("wake_lock", &self.wake_lock)
            .finish_non_exhaustive()
    }
}
