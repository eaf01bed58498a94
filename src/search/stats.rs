//! Search statistics for diagnostics and tuning.

use serde::{Deserialize, Serialize};

/// Statistics collected during one search.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct SearchStats {
    /// Records in the tree when selection ran.
    pub elements: usize,

    /// First index of the opponent-reply phase.
    pub split: usize,

    /// Completed own turns found in the own-move phase.
    pub own_leaves: usize,

    /// Completed opponent turns found in the reply phase.
    pub reply_leaves: usize,

    /// The own-move phase found a goal and the reply phase was skipped.
    pub own_goal_found: bool,

    /// Total time spent searching (microseconds).
    pub time_us: u64,
}

impl SearchStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all statistics to zero.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Records added by the reply phase.
    #[must_use]
    pub fn reply_elements(&self) -> usize {
        self.elements.saturating_sub(self.split)
    }

    /// Tree records created per second.
    #[must_use]
    pub fn elements_per_second(&self) -> f64 {
        if self.time_us == 0 {
            0.0
        } else {
            self.elements as f64 / (self.time_us as f64 / 1_000_000.0)
        }
    }
}
