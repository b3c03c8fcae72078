//! Workout flags shared by `run` and `plan`.

use clap::Args;
use wodtimer_core::timer::{AmrapRound, ExtraRound};
use wodtimer_core::{TimerConfig, TimerDiscipline};

#[derive(Args, Debug)]
pub struct WorkoutArgs {
    /// amrap, emom, tabata or for-time
    pub discipline: TimerDiscipline,

    /// Tabata rounds
    #[arg(long)]
    pub rounds: Option<u32>,
    /// Tabata work phase in seconds
    #[arg(long)]
    pub work: Option<u32>,
    /// Tabata rest phase in seconds
    #[arg(long)]
    pub rest: Option<u32>,
    /// AMRAP or EMOM duration in minutes
    #[arg(long)]
    pub duration: Option<u32>,
    /// EMOM round length in minutes
    #[arg(long)]
    pub interval: Option<u32>,
    /// For-Time cap in minutes
    #[arg(long)]
    pub time_cap: Option<u32>,
    /// EMOM with unbounded rounds
    #[arg(long)]
    pub death_by: bool,
    /// For-Time without a cap
    #[arg(long)]
    pub no_cap: bool,
    /// Extra AMRAP block as MIN[:REST], repeatable
    #[arg(long = "amrap-round", value_name = "MIN[:REST]", value_parser = parse_amrap_round)]
    pub amrap_rounds: Vec<AmrapRound>,
    /// Extra Tabata/EMOM block as ROUNDS[:REST]
    #[arg(long, value_name = "N[:REST]", value_parser = parse_extra_round)]
    pub extra_round: Option<ExtraRound>,
}

impl WorkoutArgs {
    /// Overlay the flags on top of the configured defaults.
    pub fn apply(&self, base: &TimerConfig) -> TimerConfig {
        let mut cfg = base.clone();
        if let Some(v) = self.rounds {
            cfg.rounds = v;
        }
        if let Some(v) = self.work {
            cfg.work_seconds = v;
        }
        if let Some(v) = self.rest {
            cfg.rest_seconds = v;
        }
        if let Some(v) = self.duration {
            cfg.duration = v;
        }
        if let Some(v) = self.interval {
            cfg.interval_minutes = v;
        }
        if let Some(v) = self.time_cap {
            cfg.time_cap = v;
        }
        cfg.is_death_by |= self.death_by;
        cfg.no_time_cap |= self.no_cap;
        if !self.amrap_rounds.is_empty() {
            cfg.amrap_rounds = self.amrap_rounds.clone();
        }
        match self.discipline {
            TimerDiscipline::Tabata if self.extra_round.is_some() => cfg.tabata_round = self.extra_round,
            TimerDiscipline::Emom if self.extra_round.is_some() => cfg.emom_round = self.extra_round,
            _ => {}
        }
        cfg
    }
}

/// `A` or `A:B`, both unsigned.
fn parse_pair(s: &str) -> Result<(u32, u32), String> {
    let (first, second) = match s.split_once(':') {
        Some((a, b)) => (a, Some(b)),
        None => (s, None),
    };
    let first = first
        .trim()
        .parse::<u32>()
        .map_err(|e| format!("invalid number '{first}': {e}"))?;
    let second = match second {
        Some(b) => b
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("invalid rest '{b}': {e}"))?,
        None => 0,
    };
    Ok((first, second))
}

fn parse_amrap_round(s: &str) -> Result<AmrapRound, String> {
    let (duration, rest) = parse_pair(s)?;
    Ok(AmrapRound { duration, rest })
}

fn parse_extra_round(s: &str) -> Result<ExtraRound, String> {
    let (round, rest) = parse_pair(s)?;
    Ok(ExtraRound { round, rest })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct Harness {
        #[command(flatten)]
        workout: WorkoutArgs,
    }

    fn parse(args: &[&str]) -> WorkoutArgs {
        let mut argv = vec!["wodtimer"];
        argv.extend_from_slice(args);
        Harness::try_parse_from(argv).unwrap().workout
    }

    #[test]
    fn pairs_parse_with_optional_rest() {
        assert_eq!(parse_pair("5"), Ok((5, 0)));
        assert_eq!(parse_pair("5:2"), Ok((5, 2)));
        assert!(parse_pair("five").is_err());
        assert!(parse_pair("5:").is_err());
    }

    #[test]
    fn flags_override_defaults() {
        let args = parse(&["tabata", "--rounds", "4", "--extra-round", "2:1"]);
        let cfg = args.apply(&TimerConfig::default());
        assert_eq!(cfg.rounds, 4);
        assert_eq!(cfg.work_seconds, 20);
        assert_eq!(cfg.tabata_round, Some(ExtraRound { round: 2, rest: 1 }));
        assert_eq!(cfg.emom_round, None);
    }

    #[test]
    fn repeated_amrap_rounds_keep_order() {
        let args = parse(&["amrap", "--amrap-round", "5:1", "--amrap-round", "3"]);
        let cfg = args.apply(&TimerConfig::default());
        assert_eq!(
            cfg.amrap_rounds,
            vec![
                AmrapRound { duration: 5, rest: 1 },
                AmrapRound { duration: 3, rest: 0 },
            ]
        );
    }

    #[test]
    fn discipline_accepts_loose_spelling() {
        assert_eq!(parse(&["for-time"]).discipline, TimerDiscipline::ForTime);
        assert_eq!(parse(&["EMOM"]).discipline, TimerDiscipline::Emom);
    }
}
