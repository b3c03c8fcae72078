//! User-authored timer configuration.
//!
//! `TimerConfig` is what the configuration form edits. It is deliberately
//! loose: every discipline's fields live side by side and nothing here is
//! checked. Turning it into something runnable goes through
//! [`PlanBuilder`](super::PlanBuilder).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TimerDiscipline {
    Amrap,
    Emom,
    Tabata,
    ForTime,
}

impl TimerDiscipline {
    pub const ALL: [TimerDiscipline; 4] = [
        TimerDiscipline::Amrap,
        TimerDiscipline::Emom,
        TimerDiscipline::Tabata,
        TimerDiscipline::ForTime,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TimerDiscipline::Amrap => "AMRAP",
            TimerDiscipline::Emom => "EMOM",
            TimerDiscipline::Tabata => "TABATA",
            TimerDiscipline::ForTime => "FOR_TIME",
        }
    }
}

impl fmt::Display for TimerDiscipline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerDiscipline {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_', ' '], "").as_str() {
            "amrap" => Ok(TimerDiscipline::Amrap),
            "emom" => Ok(TimerDiscipline::Emom),
            "tabata" => Ok(TimerDiscipline::Tabata),
            "fortime" => Ok(TimerDiscipline::ForTime),
            _ => Err(format!("unknown timer discipline: {s}")),
        }
    }
}

/// Supplementary AMRAP block. Both fields are minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmrapRound {
    pub duration: u32,
    #[serde(default)]
    pub rest: u32,
}

/// Supplementary Tabata/EMOM block: `round` rounds, preceded by `rest`
/// minutes of rest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraRound {
    pub round: u32,
    #[serde(default)]
    pub rest: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerConfig {
    /// Tabata round count.
    #[serde(default = "default_rounds")]
    pub rounds: u32,
    #[serde(default = "default_work_seconds")]
    pub work_seconds: u32,
    #[serde(default = "default_rest_seconds")]
    pub rest_seconds: u32,
    /// AMRAP total, or EMOM total unless death-by. Minutes.
    #[serde(default = "default_duration")]
    pub duration: u32,
    /// EMOM round length in minutes.
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,
    /// For-Time cap in minutes.
    #[serde(default = "default_time_cap")]
    pub time_cap: u32,
    #[serde(default)]
    pub is_death_by: bool,
    #[serde(default)]
    pub no_time_cap: bool,
    #[serde(default)]
    pub amrap_rounds: Vec<AmrapRound>,
    #[serde(default)]
    pub tabata_round: Option<ExtraRound>,
    #[serde(default)]
    pub emom_round: Option<ExtraRound>,
}

fn default_rounds() -> u32 {
    8
}
fn default_work_seconds() -> u32 {
    20
}
fn default_rest_seconds() -> u32 {
    10
}
fn default_duration() -> u32 {
    20
}
fn default_interval_minutes() -> u32 {
    1
}
fn default_time_cap() -> u32 {
    15
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            rounds: default_rounds(),
            work_seconds: default_work_seconds(),
            rest_seconds: default_rest_seconds(),
            duration: default_duration(),
            interval_minutes: default_interval_minutes(),
            time_cap: default_time_cap(),
            is_death_by: false,
            no_time_cap: false,
            amrap_rounds: Vec::new(),
            tabata_round: None,
            emom_round: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discipline_parses_loosely() {
        assert_eq!("amrap".parse::<TimerDiscipline>(), Ok(TimerDiscipline::Amrap));
        assert_eq!("for-time".parse::<TimerDiscipline>(), Ok(TimerDiscipline::ForTime));
        assert_eq!("FOR_TIME".parse::<TimerDiscipline>(), Ok(TimerDiscipline::ForTime));
        assert!("crossfit".parse::<TimerDiscipline>().is_err());
    }

    #[test]
    fn config_uses_camel_case_keys() {
        let json = r#"{
            "rounds": 4,
            "workSeconds": 30,
            "restSeconds": 15,
            "amrapRounds": [{"duration": 5, "rest": 1}],
            "emomRound": {"round": 3}
        }"#;
        let cfg: TimerConfig = serde_json::from_str(json).unwrap();
        assert_eq!(cfg.rounds, 4);
        assert_eq!(cfg.work_seconds, 30);
        assert_eq!(cfg.rest_seconds, 15);
        assert_eq!(cfg.duration, 20);
        assert_eq!(cfg.amrap_rounds, vec![AmrapRound { duration: 5, rest: 1 }]);
        assert_eq!(cfg.emom_round, Some(ExtraRound { round: 3, rest: 0 }));
    }

    #[test]
    fn discipline_serializes_screaming() {
        let json = serde_json::to_string(&TimerDiscipline::ForTime).unwrap();
        assert_eq!(json, "\"FOR_TIME\"");
    }
}
