//! Computer player search.
//!
//! - `pool`: block-pooled append-only record store
//! - `element`: the packed 64-bit tree record
//! - `tree`: tree walks and move selection
//! - `driver`: the two-phase search over a live board
//! - `config`: difficulty presets and budgets
//! - `stats`: per-search diagnostics

pub mod config;
pub mod driver;
pub mod element;
pub mod pool;
pub mod stats;
pub mod tree;

pub use config::{Difficulty, SearchConfig};
pub use driver::SearchDriver;
pub use element::{TreeElement, GAME_LOST, GOAL_LOST, GOAL_SCORED};
pub use pool::PoolArray;
pub use stats::SearchStats;
pub use tree::{EstimationTree, MAX_ANALYSIS_PATH};
