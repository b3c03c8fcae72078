//! # wodtimer Core Library
//!
//! Interval-timer engine for workout timing. The library holds all timing
//! logic; hosts (the `wodtimer` CLI, or any UI shell) only forward user input,
//! call `tick()` once per second and render what comes back.
//!
//! ## Architecture
//!
//! - **Segment engine**: one clock per discipline (AMRAP, EMOM, Tabata,
//!   For-Time) behind a shared pre-roll/pause/reset state machine
//! - **Session**: chains the segments of a validated plan, owns the wake-lock
//! - **Widget**: five-state navigation machine that owns the session
//! - **Storage**: TOML-based settings
//!
//! ## Key Components
//!
//! - [`TimerWidget`]: the single root-scoped widget instance
//! - [`Session`]: multi-segment orchestrator
//! - [`WorkoutPlan`]: checked resolution of a [`TimerConfig`]
//! - [`Settings`]: persisted configuration

pub mod effects;
pub mod error;
pub mod events;
pub mod format;
pub mod history;
pub mod storage;
pub mod timer;
pub mod widget;

pub use effects::{Cue, CuePlayer, Effects, WakeLockProvider};
pub use error::{ConfigError, CoreError, ValidationError, WakeLockError};
pub use events::Event;
pub use history::{HistorySink, WorkoutSummary};
pub use storage::Settings;
pub use timer::{
    EngineOptions, Session, SessionState, TimerConfig, TimerDiscipline, WorkoutPlan,
};
pub use widget::{TimerWidget, WidgetView};
