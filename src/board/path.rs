//! Ordered move log.
//!
//! A `Path` is a sequence of `PathElement`s. Each element is either one move
//! (direction + player) or the round separator marking that the ball was put
//! back on the center point after a goal.
//!
//! Elements are single bytes taken from a fixed table, so building a path
//! never allocates per move, and short paths (a typical turn) stay inline.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::direction::Direction;
use super::error::PathElementError;
use crate::core::PlayerId;

const DIRECTION_MASK: u8 = 0x07;
const PLAYER_MASK: u8 = 0x08;
const SEPARATOR: u8 = 0x10;

/// One move of a path, or the round separator.
///
/// Layout: bits 0-2 direction, bit 3 player (0 = `Player1`), bit 4 separator.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PathElement(u8);

const fn element(direction: u8, player: u8) -> PathElement {
    PathElement(direction | (player << 3))
}

static ELEMENTS: [[PathElement; 8]; 2] = [
    [
        element(0, 0),
        element(1, 0),
        element(2, 0),
        element(3, 0),
        element(4, 0),
        element(5, 0),
        element(6, 0),
        element(7, 0),
    ],
    [
        element(0, 1),
        element(1, 1),
        element(2, 1),
        element(3, 1),
        element(4, 1),
        element(5, 1),
        element(6, 1),
        element(7, 1),
    ],
];

impl PathElement {
    /// The round separator.
    pub const SEPARATOR: PathElement = PathElement(SEPARATOR);

    /// The move of `player` in `direction`.
    #[inline]
    #[must_use]
    pub fn of(direction: Direction, player: PlayerId) -> PathElement {
        ELEMENTS[player.index()][direction.index() as usize]
    }

    #[inline]
    #[must_use]
    pub const fn is_separator(self) -> bool {
        self.0 & SEPARATOR != 0
    }

    /// Move direction, `None` for the separator.
    #[must_use]
    pub const fn direction(self) -> Option<Direction> {
        if self.is_separator() {
            None
        } else {
            Some(Direction::from_bits(self.0 & DIRECTION_MASK))
        }
    }

    /// Moving player, `None` for the separator.
    #[must_use]
    pub const fn player(self) -> Option<PlayerId> {
        if self.is_separator() {
            None
        } else if self.0 & PLAYER_MASK == 0 {
            Some(PlayerId::Player1)
        } else {
            Some(PlayerId::Player2)
        }
    }
}

impl From<PathElement> for u8 {
    fn from(element: PathElement) -> u8 {
        element.0
    }
}

impl TryFrom<u8> for PathElement {
    type Error = PathElementError;

    /// Accepts the sixteen move encodings and the separator.
    fn try_from(bits: u8) -> Result<Self, Self::Error> {
        match bits {
            SEPARATOR => Ok(PathElement::SEPARATOR),
            0..=0x0F => Ok(ELEMENTS[usize::from(bits >> 3)][usize::from(bits & DIRECTION_MASK)]),
            _ => Err(PathElementError(bits)),
        }
    }
}

impl std::fmt::Debug for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Display::fmt(self, f)
    }
}

impl std::fmt::Display for PathElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.direction(), self.player()) {
            (Some(direction), Some(player)) => write!(f, "[d{},p{}]", direction.index(), player.index() + 1),
            _ => write!(f, "[|]"),
        }
    }
}

/// Ordered sequence of moves and round separators.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Path {
    moves: SmallVec<[PathElement; 16]>,
}

impl Path {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Path made of `directions`, all played by `player`.
    #[must_use]
    pub fn from_directions(directions: &[Direction], player: PlayerId) -> Self {
        directions.iter().map(|&dir| PathElement::of(dir, player)).collect()
    }

    pub fn push(&mut self, element: PathElement) {
        self.moves.push(element);
    }

    /// Append every element of `other`, in order.
    pub fn append(&mut self, other: &Path) {
        self.moves.extend_from_slice(&other.moves);
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[PathElement] {
        &self.moves
    }

    pub fn iter(&self) -> impl Iterator<Item = PathElement> + '_ {
        self.moves.iter().copied()
    }

    /// Directions of the path, separators skipped.
    pub fn directions(&self) -> impl Iterator<Item = Direction> + '_ {
        self.moves.iter().filter_map(|e| e.direction())
    }

    #[must_use]
    pub fn first(&self) -> Option<PathElement> {
        self.moves.first().copied()
    }

    #[must_use]
    pub fn last(&self) -> Option<PathElement> {
        self.moves.last().copied()
    }

    /// The last `count` elements, used to animate the latest turn.
    #[must_use]
    pub fn last_moves(&self, count: usize) -> &[PathElement] {
        &self.moves[self.moves.len().saturating_sub(count)..]
    }

    /// Elements after the last separator.
    #[must_use]
    pub fn last_turn(&self) -> &[PathElement] {
        match self.moves.iter().rposition(|e| e.is_separator()) {
            Some(separator) => &self.moves[separator + 1..],
            None => &self.moves,
        }
    }

    /// The part of the longer path beyond the length of the shorter one.
    ///
    /// The shorter path is assumed, not checked, to be a prefix of the longer.
    #[must_use]
    pub fn diff(p1: &Path, p2: &Path) -> Path {
        let (shorter, longer) = if p1.len() < p2.len() { (p1, p2) } else { (p2, p1) };
        Path {
            moves: SmallVec::from_slice(&longer.moves[shorter.len()..]),
        }
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self {
            moves: iter.into_iter().collect(),
        }
    }
}

impl Extend<PathElement> for Path {
    fn extend<I: IntoIterator<Item = PathElement>>(&mut self, iter: I) {
        self.moves.extend(iter);
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} move(s): ", self.moves.len())?;
        for element in &self.moves {
            write!(f, "{element}")?;
        }
        Ok(())
    }
}
