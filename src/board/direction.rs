//! Compass directions of the board graph.
//!
//! ```text
//!  7  0  1
//!   \ | /
//! 6 - + - 2
//!   / | \
//!  5  4  3
//! ```
//!
//! Direction 0 points north, i.e. toward increasing `y` (the top goal).

use serde::{Deserialize, Serialize};

/// One of the eight move directions, clockwise from north.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Direction {
    North = 0,
    NorthEast = 1,
    East = 2,
    SouthEast = 3,
    South = 4,
    SouthWest = 5,
    West = 6,
    NorthWest = 7,
}

impl Direction {
    /// All directions in index order.
    pub const ALL: [Direction; 8] = [
        Direction::North,
        Direction::NorthEast,
        Direction::East,
        Direction::SouthEast,
        Direction::South,
        Direction::SouthWest,
        Direction::West,
        Direction::NorthWest,
    ];

    /// Direction for an index in `0..8`.
    #[must_use]
    pub const fn from_index(index: u8) -> Option<Direction> {
        if index < 8 {
            Some(Self::from_bits(index))
        } else {
            None
        }
    }

    /// Direction from the low three bits of `bits`.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Direction {
        Self::ALL[(bits & 0x07) as usize]
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// The direction pointing back along the same edge.
    #[inline]
    #[must_use]
    pub const fn opposite(self) -> Direction {
        Self::from_bits(self as u8 + 4)
    }

    /// Grid offset `(dx, dy)` of one step in this direction.
    #[must_use]
    pub const fn offset(self) -> (isize, isize) {
        match self {
            Direction::North => (0, 1),
            Direction::NorthEast => (1, 1),
            Direction::East => (1, 0),
            Direction::SouthEast => (1, -1),
            Direction::South => (0, -1),
            Direction::SouthWest => (-1, -1),
            Direction::West => (-1, 0),
            Direction::NorthWest => (-1, 1),
        }
    }

    /// True for the four diagonal directions.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        self as u8 % 2 == 1
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.index())
    }
}
