//! Search budgets and difficulty presets.

use serde::{Deserialize, Serialize};

/// Computer player strength.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    /// Difficulty for a persisted level in `{0, 1, 2}`, `None` when out of range.
    #[must_use]
    pub const fn from_level(level: i64) -> Option<Difficulty> {
        match level {
            0 => Some(Difficulty::Easy),
            1 => Some(Difficulty::Medium),
            2 => Some(Difficulty::Hard),
            _ => None,
        }
    }

    #[must_use]
    pub const fn level(self) -> u8 {
        match self {
            Difficulty::Easy => 0,
            Difficulty::Medium => 1,
            Difficulty::Hard => 2,
        }
    }

    /// Easy play picks from the own-move phase only.
    #[must_use]
    pub const fn uses_minimax(self) -> bool {
        !matches!(self, Difficulty::Easy)
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "easy" | "0" => Ok(Difficulty::Easy),
            "medium" | "1" => Ok(Difficulty::Medium),
            "hard" | "2" => Ok(Difficulty::Hard),
            other => Err(format!("unknown difficulty '{other}', expected easy, medium or hard")),
        }
    }
}

/// Budgets for one search.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Preset the budgets were taken from.
    pub difficulty: Difficulty,

    /// Stop expanding once the tree holds more elements than this.
    pub max_elements: usize,

    /// Ply depth of the own-move phase.
    pub own_depth: u8,

    /// Ply depth of the opponent-reply phase.
    pub reply_depth: u8,

    /// Seed of the tie-breaking RNG.
    /// Same seed produces the same move sequence.
    pub seed: u64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

impl SearchConfig {
    /// Preset budgets for `difficulty`.
    #[must_use]
    pub fn for_difficulty(difficulty: Difficulty) -> Self {
        let (max_elements, own_depth, reply_depth) = match difficulty {
            Difficulty::Easy => (50_000, 4, 8),
            Difficulty::Medium => (500_000, 16, 32),
            Difficulty::Hard => (5_000_000, 32, 64),
        };
        Self {
            difficulty,
            max_elements,
            own_depth,
            reply_depth,
            seed: 42,
        }
    }

    /// Create a new config with custom seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Create a new config with a custom element budget.
    pub fn with_max_elements(mut self, max_elements: usize) -> Self {
        self.max_elements = max_elements;
        self
    }
}
