//! Board graph, move directions and the path log.

pub mod direction;
pub mod error;
pub mod graph;
pub mod path;

pub use direction::Direction;
pub use error::{BoardError, MoveError, PathElementError};
pub use graph::{Board, Edge, EdgeId, Point, PointId, MIN_DIMENSION};
pub use path::{Path, PathElement};
