use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::effects::Cue;
use crate::history::WorkoutSummary;
use crate::timer::{SegmentState, TimerDiscipline};
use crate::widget::WidgetView;

/// Every state change in the engine produces an Event.
/// Hosts render from them; the history sink consumes `SessionCompleted`.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    SessionStarted {
        session_id: Uuid,
        discipline: TimerDiscipline,
        segment_count: usize,
        at: DateTime<Utc>,
    },
    /// Rest countdown before a supplementary segment.
    RestStarted {
        segment_index: usize,
        rest_secs: u64,
        at: DateTime<Utc>,
    },
    PreRollStarted {
        segment_index: usize,
        secs: u64,
        at: DateTime<Utc>,
    },
    SegmentStarted {
        segment_index: usize,
        discipline: TimerDiscipline,
        at: DateTime<Utc>,
    },
    /// Fired on every consumed tick with the single-line readout.
    TimeUpdate {
        segment_index: usize,
        readout: String,
        at: DateTime<Utc>,
    },
    CuePlayed {
        cue: Cue,
        at: DateTime<Utc>,
    },
    RoundStarted {
        segment_index: usize,
        round: u64,
        at: DateTime<Utc>,
    },
    PhaseChanged {
        segment_index: usize,
        round: u32,
        is_working: bool,
        at: DateTime<Utc>,
    },
    SegmentPaused {
        segment_index: usize,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    SegmentResumed {
        segment_index: usize,
        state: SegmentState,
        at: DateTime<Utc>,
    },
    SegmentReset {
        segment_index: usize,
        at: DateTime<Utc>,
    },
    SegmentCompleted {
        segment_index: usize,
        discipline: TimerDiscipline,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Fires once, after the last segment completed.
    SessionCompleted {
        summary: WorkoutSummary,
        at: DateTime<Utc>,
    },
    /// Session torn down before completing.
    SessionStopped {
        session_id: Uuid,
        at: DateTime<Utc>,
    },
    WidgetTransition {
        from: WidgetView,
        to: WidgetView,
        at: DateTime<Utc>,
    },
}
