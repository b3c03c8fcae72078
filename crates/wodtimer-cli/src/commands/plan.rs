use clap::Args;
use wodtimer_core::format::format_clock;
use wodtimer_core::timer::SegmentSpec;
use wodtimer_core::{CoreError, Settings, WorkoutPlan};

use super::workout::WorkoutArgs;

#[derive(Args)]
pub struct PlanArgs {
    #[command(flatten)]
    pub workout: WorkoutArgs,
    /// Print the plan as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn run(args: PlanArgs) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::load()?;
    let cfg = args.workout.apply(&settings.defaults);
    let plan = WorkoutPlan::builder(args.workout.discipline, &cfg)
        .build()
        .map_err(CoreError::from)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
        return Ok(());
    }

    for segment in plan.segments() {
        if segment.rest_before_secs() > 0 {
            println!("   rest {}", format_clock(segment.rest_before_secs()));
        }
        println!("{:>2}. {:<10} {}", segment.index() + 1, segment.label(), describe(segment.spec()));
    }
    match plan.total_secs() {
        Some(total) => println!("total {}", format_clock(total)),
        None => println!("total open-ended"),
    }
    Ok(())
}

fn describe(spec: &SegmentSpec) -> String {
    match *spec {
        SegmentSpec::Amrap { total_secs } => format_clock(total_secs),
        SegmentSpec::Emom {
            interval_secs,
            total_secs: Some(total),
        } => format!("{} every {}", format_clock(total), format_clock(interval_secs)),
        SegmentSpec::Emom {
            interval_secs,
            total_secs: None,
        } => format!("every {} until failure", format_clock(interval_secs)),
        SegmentSpec::Tabata {
            rounds,
            work_secs,
            rest_secs,
        } => format!("{rounds} x {work_secs}s on / {rest_secs}s off"),
        SegmentSpec::ForTime { cap_secs: Some(cap) } => format!("cap {}", format_clock(cap)),
        SegmentSpec::ForTime { cap_secs: None } => "no cap".to_string(),
    }
}
