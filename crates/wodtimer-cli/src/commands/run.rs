//! `wodtimer run`: drive the widget from a terminal.
//!
//! The terminal host walks the widget from its badge to the running view,
//! ticks it on a `tokio` interval and prints one readout line per second.
//! The finished session's summary goes to stdout through a history sink.

use std::io::Write;
use std::rc::Rc;
use std::time::Duration;

use clap::Args;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};
use wodtimer_core::effects::NoWakeLock;
use wodtimer_core::error::Result as CoreResult;
use wodtimer_core::timer::{DisciplineView, RunningView, SegmentSpec, SegmentState};
use wodtimer_core::{
    CoreError, Cue, CuePlayer, Effects, Event, HistorySink, Settings, TimerWidget, WorkoutPlan,
    WorkoutSummary,
};

use super::workout::WorkoutArgs;

#[derive(Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
    /// Milliseconds per tick; 0 runs as fast as possible
    #[arg(long, default_value_t = 1000)]
    pub tick_ms: u64,
    /// Print every event as one JSON line instead of readouts
    #[arg(long)]
    pub json: bool,
    /// End an open-ended segment after this many active seconds
    #[arg(long, value_name = "SECS")]
    pub finish_after: Option<u64>,
}

/// Rings the terminal bell.
struct TerminalCues {
    bell: bool,
}

impl CuePlayer for TerminalCues {
    fn play(&self, cue: Cue) {
        debug!(?cue, "cue");
        if self.bell {
            eprint!("\x07");
        }
    }
}

/// Writes each completed session to stdout as JSON.
struct StdoutHistory {
    compact: bool,
}

impl HistorySink for StdoutHistory {
    fn record(&mut self, summary: &WorkoutSummary) -> CoreResult<()> {
        let json = if self.compact {
            serde_json::to_string(summary)?
        } else {
            serde_json::to_string_pretty(summary)?
        };
        let mut out = std::io::stdout().lock();
        writeln!(out, "{json}")?;
        Ok(())
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let discipline = args.workout.discipline;
    let cfg = args.workout.apply(&settings.defaults);

    let plan = WorkoutPlan::builder(discipline, &cfg)
        .build()
        .map_err(CoreError::from)?;
    if plan.total_secs().is_none() && args.finish_after.is_none() {
        return Err("open-ended workout needs --finish-after SECS".into());
    }

    let effects = Effects::new(Rc::new(TerminalCues { bell: !args.json }), Rc::new(NoWakeLock));
    let mut widget = TimerWidget::new(&settings, effects);
    widget.set_history_sink(Box::new(StdoutHistory { compact: args.json }));

    widget.select();
    widget.choose(discipline);
    if let Some(draft) = widget.draft_mut() {
        *draft = cfg;
    }
    let events = widget.start()?;
    print_events(&args, &widget, &events)?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()?;
    runtime.block_on(drive(&args, &mut widget))
}

async fn drive(args: &RunArgs, widget: &mut TimerWidget) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = (args.tick_ms > 0).then(|| {
        let mut ticker = tokio::time::interval(Duration::from_millis(args.tick_ms));
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        ticker
    });
    // The first interval tick completes immediately.
    if let Some(ticker) = ticker.as_mut() {
        ticker.tick().await;
    }

    loop {
        if let Some(ticker) = ticker.as_mut() {
            ticker.tick().await;
        }
        let events = widget.tick();
        print_events(args, widget, &events)?;
        if events.iter().any(|e| matches!(e, Event::SessionCompleted { .. })) {
            return Ok(());
        }

        if let Some(limit) = args.finish_after {
            let events = finish_open_segment(widget, limit);
            print_events(args, widget, &events)?;
            if events
                .iter()
                .any(|e| matches!(e, Event::SessionCompleted { .. } | Event::SessionStopped { .. }))
            {
                return Ok(());
            }
        }
    }
}

/// The terminal has no "finish" button, so `--finish-after` presses it.
/// Death-by EMOM has no finish control and is stopped instead.
fn finish_open_segment(widget: &mut TimerWidget, limit: u64) -> Vec<Event> {
    let Some(session) = widget.session() else {
        return Vec::new();
    };
    let engine = session.engine();
    let spec = *engine.segment().spec();
    if engine.state() != SegmentState::Running || spec.total_secs().is_some() || engine.elapsed() < limit {
        return Vec::new();
    }
    if let SegmentSpec::ForTime { .. } = spec {
        info!(elapsed = limit, "finishing uncapped segment");
        widget.finish_now()
    } else {
        info!(elapsed = limit, "stopping open-ended segment");
        widget.close()
    }
}

fn print_events(
    args: &RunArgs,
    widget: &TimerWidget,
    events: &[Event],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut out = std::io::stdout().lock();
    if args.json {
        for event in events {
            writeln!(out, "{}", serde_json::to_string(event)?)?;
        }
        return Ok(());
    }

    // The completion tick's summary is already printed by the history sink.
    if events.iter().any(|e| matches!(e, Event::SessionCompleted { .. })) {
        return Ok(());
    }
    if events.iter().any(|e| matches!(e, Event::SessionStopped { .. })) {
        writeln!(out, "stopped")?;
        return Ok(());
    }
    let ticked = events.iter().any(|e| matches!(e, Event::TimeUpdate { .. }));
    if let (true, Some(view)) = (ticked, widget.running_view()) {
        writeln!(out, "{}", status_line(&view))?;
    }
    Ok(())
}

fn status_line(view: &RunningView) -> String {
    let position = if view.segment_count > 1 {
        format!(" [{}/{}]", view.segment_index + 1, view.segment_count)
    } else {
        String::new()
    };
    let phase = if view.rest_remaining.is_some() {
        "rest".to_string()
    } else if view.state == SegmentState::PreRoll {
        "get ready".to_string()
    } else {
        match view.detail {
            DisciplineView::Amrap { .. } => "remaining".to_string(),
            DisciplineView::Emom {
                current_round,
                total_rounds: Some(total),
                ..
            } => format!("round {current_round}/{total}"),
            DisciplineView::Emom { current_round, .. } => format!("round {current_round}"),
            DisciplineView::Tabata {
                current_round,
                rounds,
                is_working,
                ..
            } => format!(
                "{} {current_round}/{rounds}",
                if is_working { "work" } else { "rest" }
            ),
            DisciplineView::ForTime { .. } => "elapsed".to_string(),
        }
    };
    format!("{}{position} {phase} {}", view.label, view.readout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wodtimer_core::{TimerConfig, TimerDiscipline};

    fn running(discipline: TimerDiscipline) -> TimerWidget {
        let mut w = TimerWidget::new(&Settings::default(), Effects::silent());
        w.select();
        w.choose(discipline);
        w.start().unwrap();
        w
    }

    #[test]
    fn status_line_shows_pre_roll_then_phase() {
        let mut w = running(TimerDiscipline::Tabata);
        assert_eq!(status_line(&w.running_view().unwrap()), "Tabata get ready 00:10");
        for _ in 0..11 {
            w.tick();
        }
        assert_eq!(status_line(&w.running_view().unwrap()), "Tabata work 1/8 00:19");
    }

    #[test]
    fn status_line_counts_segments() {
        let mut settings = Settings::default();
        settings.engine.with_pre_roll = false;
        settings.defaults = TimerConfig {
            duration: 1,
            amrap_rounds: vec![wodtimer_core::timer::AmrapRound { duration: 1, rest: 1 }],
            ..TimerConfig::default()
        };
        let mut w = TimerWidget::new(&settings, Effects::silent());
        w.select();
        w.choose(TimerDiscipline::Amrap);
        w.start().unwrap();
        for _ in 0..60 {
            w.tick();
        }
        assert_eq!(status_line(&w.running_view().unwrap()), "AMRAP 2 [2/2] rest 01:00");
    }

    #[test]
    fn finish_after_only_touches_open_segments() {
        let mut w = running(TimerDiscipline::ForTime);
        for _ in 0..40 {
            w.tick();
        }
        assert!(finish_open_segment(&mut w, 5).is_empty());
    }
}
