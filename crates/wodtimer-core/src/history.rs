//! Handoff of finished sessions to an external workout-history store.
//!
//! The engine never reads history; it only produces a [`WorkoutSummary`] when
//! a session completes and passes it to whatever sink the host installed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::Result;
use crate::timer::TimerDiscipline;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SegmentResult {
    pub index: usize,
    pub label: String,
    pub discipline: TimerDiscipline,
    /// Active seconds, pre-roll and rest excluded. For-Time's result.
    pub elapsed_secs: u64,
    /// Last round reached, for round-based disciplines.
    #[serde(default)]
    pub final_round: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub session_id: Uuid,
    pub discipline: TimerDiscipline,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
    pub segments: Vec<SegmentResult>,
}

impl WorkoutSummary {
    pub fn total_active_secs(&self) -> u64 {
        self.segments.iter().map(|s| s.elapsed_secs).sum()
    }
}

/// Receives completed sessions.
pub trait HistorySink {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()>;
}

/// Keeps summaries in memory.
#[derive(Debug, Default)]
pub struct MemoryHistory {
    entries: Vec<WorkoutSummary>,
}

impl MemoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[WorkoutSummary] {
        &self.entries
    }
}

impl HistorySink for MemoryHistory {
    fn record(&mut self, summary: &WorkoutSummary) -> Result<()> {
        self.entries.push(summary.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_active_secs_sums_segments() {
        let now = Utc::now();
        let summary = WorkoutSummary {
            session_id: Uuid::new_v4(),
            discipline: TimerDiscipline::Amrap,
            started_at: now,
            completed_at: now,
            segments: vec![
                SegmentResult {
                    index: 0,
                    label: "AMRAP".into(),
                    discipline: TimerDiscipline::Amrap,
                    elapsed_secs: 600,
                    final_round: None,
                },
                SegmentResult {
                    index: 1,
                    label: "AMRAP 2".into(),
                    discipline: TimerDiscipline::Amrap,
                    elapsed_secs: 300,
                    final_round: None,
                },
            ],
        };
        assert_eq!(summary.total_active_secs(), 900);

        let mut sink = MemoryHistory::new();
        sink.record(&summary).unwrap();
        assert_eq!(sink.entries().len(), 1);
    }
}
