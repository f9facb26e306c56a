use std::cmp::Ordering;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{GridSize, engine::session_stats::ElapsedTime};

/// Result of one solved puzzle.
///
/// Emitted exactly once per win and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    /// Grid size the puzzle was played at
    pub grid_size: GridSize,
    /// Number of swaps it took
    pub move_count: usize,
    /// Time on the clock when the puzzle was solved (`MM:SS`)
    pub elapsed: ElapsedTime,
    /// When the puzzle was solved (ISO 8601 format)
    pub recorded_at: DateTime<Utc>,
}

impl ScoreRecord {
    /// Orders records best-first: fewer moves, then less time, then earlier.
    #[must_use]
    pub fn rank_cmp(&self, other: &Self) -> Ordering {
        self.move_count
            .cmp(&other.move_count)
            .then(self.elapsed.cmp(&other.elapsed))
            .then(self.recorded_at.cmp(&other.recorded_at))
    }
}
