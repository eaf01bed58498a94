use thiserror::Error;

use super::direction::Direction;

/// A move or path was rejected by the board.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveError {
    #[error("no edge leaves ({x}, {y}) in direction {direction}")]
    MissingEdge { x: usize, y: usize, direction: Direction },

    #[error("edge leaving ({x}, {y}) in direction {direction} is already blocked")]
    EdgeBlocked { x: usize, y: usize, direction: Direction },
}

/// A board could not be built with the requested dimensions.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardError {
    #[error("board dimensions must be odd, got {width}x{height}")]
    EvenDimension { width: usize, height: usize },

    #[error("board must be at least {min}x{min}, got {width}x{height}")]
    TooSmall { width: usize, height: usize, min: usize },
}

/// A byte that is neither a move nor the round separator.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("invalid path element encoding {0:#04x}")]
pub struct PathElementError(pub u8);
