//! Persistent timer widget.
//!
//! One [`TimerWidget`] is created by the host at its root scope and lives as
//! long as the host does, independent of whatever page the host is showing.
//! It owns the navigation state, the draft configuration, its on-screen
//! position and, while running, the [`Session`].
//!
//! ## State Transitions
//!
//! ```text
//! BADGE --select--> MENU --choose--> CONFIG --start--> RUNNING <--> MINIMIZED
//!                    ^                  |                  |            |
//!                    +------back--------+                  +--stop/close+--> BADGE
//! ```
//!
//! Minimizing only changes what is rendered; the session keeps ticking.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::effects::Effects;
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::history::HistorySink;
use crate::storage::Settings;
use crate::timer::{
    EngineOptions, RunningView, Session, TimerConfig, TimerDiscipline, WorkoutPlan,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WidgetView {
    Badge,
    Menu,
    Config,
    Running,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// Widget and viewport size, persisted as the `[widget]` settings section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetGeometry {
    #[serde(default = "default_width")]
    pub width: i32,
    #[serde(default = "default_height")]
    pub height: i32,
    #[serde(default = "default_viewport_width")]
    pub viewport_width: i32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: i32,
}

fn default_width() -> i32 {
    320
}
fn default_height() -> i32 {
    240
}
fn default_viewport_width() -> i32 {
    1280
}
fn default_viewport_height() -> i32 {
    800
}

impl Default for WidgetGeometry {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
        }
    }
}

impl WidgetGeometry {
    pub fn centered(&self) -> Position {
        Position {
            x: ((self.viewport_width - self.width) / 2).max(0),
            y: ((self.viewport_height - self.height) / 2).max(0),
        }
    }

    fn clamp(&self, x: i32, y: i32) -> Position {
        Position {
            x: x.clamp(0, (self.viewport_width - self.width).max(0)),
            y: y.clamp(0, (self.viewport_height - self.height).max(0)),
        }
    }
}

pub struct TimerWidget {
    view: WidgetView,
    discipline: Option<TimerDiscipline>,
    draft: TimerConfig,
    geometry: WidgetGeometry,
    position: Position,
    options: EngineOptions,
    effects: Effects,
    session: Option<Session>,
    history: Option<Box<dyn HistorySink>>,
}

impl TimerWidget {
    pub fn new(settings: &Settings, effects: Effects) -> Self {
        Self {
            view: WidgetView::Badge,
            discipline: None,
            draft: settings.defaults.clone(),
            geometry: settings.widget,
            position: settings.widget.centered(),
            options: settings.engine.clone(),
            effects,
            session: None,
            history: None,
        }
    }

    /// Install the sink that receives every completed session.
    pub fn set_history_sink(&mut self, sink: Box<dyn HistorySink>) {
        self.history = Some(sink);
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn view(&self) -> WidgetView {
        self.view
    }

    pub fn discipline(&self) -> Option<TimerDiscipline> {
        self.discipline
    }

    pub fn draft(&self) -> &TimerConfig {
        &self.draft
    }

    /// Form edits are only accepted while the form is shown.
    pub fn draft_mut(&mut self) -> Option<&mut TimerConfig> {
        (self.view == WidgetView::Config).then_some(&mut self.draft)
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// What the minimized view renders.
    pub fn readout(&self) -> Option<String> {
        self.session.as_ref().map(Session::readout)
    }

    /// What the running view renders.
    pub fn running_view(&self) -> Option<RunningView> {
        self.session.as_ref().map(Session::running_view)
    }

    // ── Navigation ───────────────────────────────────────────────────

    pub fn select(&mut self) -> Option<Event> {
        if self.view != WidgetView::Badge {
            return None;
        }
        self.position = self.geometry.centered();
        Some(self.go(WidgetView::Menu))
    }

    pub fn choose(&mut self, discipline: TimerDiscipline) -> Option<Event> {
        if self.view != WidgetView::Menu {
            return None;
        }
        self.discipline = Some(discipline);
        Some(self.go(WidgetView::Config))
    }

    pub fn back(&mut self) -> Option<Event> {
        if self.view != WidgetView::Config {
            return None;
        }
        Some(self.go(WidgetView::Menu))
    }

    /// From CONFIG: validate the draft, create the session and start it.
    /// While running: start (or resume) the active segment.
    pub fn start(&mut self) -> Result<Vec<Event>> {
        match self.view {
            WidgetView::Config => {
                let discipline = self.discipline.ok_or(ValidationError::MissingDiscipline)?;
                let plan = WorkoutPlan::builder(discipline, &self.draft).build()?;
                let mut session = Session::new(plan, self.options.clone(), self.effects.clone());
                let mut events = vec![self.go(WidgetView::Running)];
                events.extend(session.start());
                self.session = Some(session);
                Ok(events)
            }
            WidgetView::Running | WidgetView::Minimized => Ok(self.with_session(Session::start)),
            _ => Ok(Vec::new()),
        }
    }

    pub fn minimize(&mut self) -> Option<Event> {
        if self.view != WidgetView::Running {
            return None;
        }
        Some(self.go(WidgetView::Minimized))
    }

    pub fn maximize(&mut self) -> Option<Event> {
        if self.view != WidgetView::Minimized {
            return None;
        }
        Some(self.go(WidgetView::Running))
    }

    /// Back to the form from a running session. Elapsed time is discarded,
    /// the draft is kept.
    pub fn reconfigure(&mut self) -> Vec<Event> {
        if !matches!(self.view, WidgetView::Running | WidgetView::Minimized) {
            return Vec::new();
        }
        let mut events = self.teardown();
        events.push(self.go(WidgetView::Config));
        events
    }

    /// Stop/close from any state. Destroys the session.
    pub fn close(&mut self) -> Vec<Event> {
        if self.view == WidgetView::Badge {
            return Vec::new();
        }
        let mut events = self.teardown();
        self.discipline = None;
        events.push(self.go(WidgetView::Badge));
        events
    }

    pub fn drag_to(&mut self, x: i32, y: i32) {
        if self.view == WidgetView::Badge {
            return;
        }
        self.position = self.geometry.clamp(x, y);
    }

    // ── Session controls ─────────────────────────────────────────────

    pub fn tick(&mut self) -> Vec<Event> {
        let events = self.with_session(Session::tick);
        self.settle(events)
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.with_session(Session::pause)
    }

    pub fn resume(&mut self) -> Vec<Event> {
        self.with_session(Session::resume)
    }

    pub fn reset_segment(&mut self) -> Vec<Event> {
        self.with_session(Session::reset_segment)
    }

    pub fn finish_now(&mut self) -> Vec<Event> {
        let events = self.with_session(Session::finish_now);
        self.settle(events)
    }

    pub fn skip_round(&mut self) -> Vec<Event> {
        let events = self.with_session(Session::skip_round);
        self.settle(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn with_session(&mut self, f: impl FnOnce(&mut Session) -> Vec<Event>) -> Vec<Event> {
        self.session.as_mut().map(f).unwrap_or_default()
    }

    /// Hand a completed session to the history sink, then auto-close if
    /// configured.
    fn settle(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        let summary = events.iter().find_map(|e| match e {
            Event::SessionCompleted { summary, .. } => Some(summary),
            _ => None,
        });
        let Some(summary) = summary else {
            return events;
        };
        if let Some(sink) = self.history.as_mut() {
            if let Err(e) = sink.record(summary) {
                warn!(error = %e, session = %summary.session_id, "history sink rejected session");
            }
        }
        if self.options.auto_close_on_complete {
            events.extend(self.close());
        }
        events
    }

    fn teardown(&mut self) -> Vec<Event> {
        match self.session.take() {
            Some(mut session) => session.stop(),
            None => Vec::new(),
        }
    }

    fn go(&mut self, to: WidgetView) -> Event {
        let from = self.view;
        self.view = to;
        if to == WidgetView::Running && from == WidgetView::Config {
            info!(discipline = ?self.discipline, "widget running");
        } else {
            debug!(?from, ?to, "widget transition");
        }
        Event::WidgetTransition {
            from,
            to,
            at: Utc::now(),
        }
    }
}

impl std::fmt::Debug for TimerWidget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerWidget")
            .field("view", &self.view)
            .field("discipline", &self.discipline)
            .field("position", &self.position)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}
