//! # paper-soccer
//!
//! Board engine and computer player for the pencil-and-paper game of paper
//! soccer.
//!
//! ## Architecture
//!
//! - **Arena Board**: points and edges live in flat vectors addressed by
//!   index; every edge is shared by its two endpoints.
//!
//! - **Packed Search Tree**: candidate moves are 64-bit records in a
//!   block-pooled store, linked to their parent by index.
//!
//! - **Two-Phase Search**: own turns first, then the opponent's replies,
//!   with the board replayed by make/unmake and restored afterwards.
//!
//! ## Modules
//!
//! - `core`: Players, RNG, preferences
//! - `board`: Board graph, directions, path log
//! - `rules`: Move legality and scoring
//! - `search`: Search tree, pooled store and driver
//! - `engine`: Board plus background analysis
//! - `game`: Turn and score bookkeeping

pub mod board;
pub mod core;
pub mod engine;
pub mod game;
pub mod rules;
pub mod search;

// Re-export commonly used types
pub use crate::core::{AnimSpeed, AppConfig, ConfigError, GameRng, PlayerId, PlayerMap};

pub use crate::board::{Board, BoardError, Direction, MoveError, Path, PathElement, PointId};

pub use crate::search::{
    Difficulty, EstimationTree, PoolArray, SearchConfig, SearchDriver, SearchStats, TreeElement,
};

pub use crate::engine::{AnalysisState, AnalysisTicket, EngineError, SoccerEngine};
pub use crate::game::{Match, MoveOutcome};
