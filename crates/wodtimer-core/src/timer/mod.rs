mod clocks;
mod config;
mod engine;
mod plan;
mod preroll;
mod session;

pub use clocks::{
    Advance, AmrapClock, Clock, DisciplineView, EmomClock, ForTimeClock, TabataClock, Transition,
};
pub use config::{AmrapRound, ExtraRound, TimerConfig, TimerDiscipline};
pub use engine::{EngineOptions, SegmentEngine, SegmentState};
pub use plan::{PlanBuilder, Segment, SegmentSpec, WorkoutPlan};
pub use preroll::{PreRoll, PreRollStep, DEFAULT_PRE_ROLL_SECS};
pub use session::{RunningView, Session, SessionState};
