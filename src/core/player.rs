//! Player identification and per-player data storage.
//!
//! ## PlayerId
//!
//! Paper soccer is strictly a two-player game. `Player1` attacks the top goal
//! (the row with the highest `y`), `Player2` attacks the bottom goal (row 0).
//!
//! ## PlayerMap
//!
//! Per-player data storage with O(1) access, indexable by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};

/// One of the two players.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PlayerId {
    /// Attacks the top goal, defends row 0.
    Player1,
    /// Attacks the bottom goal, defends the top row.
    Player2,
}

impl PlayerId {
    /// Both players, in seating order.
    pub const ALL: [PlayerId; 2] = [PlayerId::Player1, PlayerId::Player2];

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            PlayerId::Player1 => 0,
            PlayerId::Player2 => 1,
        }
    }

    /// Player for a 0-based index.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<PlayerId> {
        match index {
            0 => Some(PlayerId::Player1),
            1 => Some(PlayerId::Player2),
            _ => None,
        }
    }

    /// The other player.
    #[must_use]
    pub const fn opponent(self) -> PlayerId {
        match self {
            PlayerId::Player1 => PlayerId::Player2,
            PlayerId::Player2 => PlayerId::Player1,
        }
    }

    /// True if this player scores by reaching the top goal row.
    #[inline]
    #[must_use]
    pub const fn attacks_top(self) -> bool {
        matches!(self, PlayerId::Player1)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.index() + 1)
    }
}

/// Per-player data storage with O(1) access.
///
/// ## Example
///
/// ```
/// use paper_soccer::core::{PlayerId, PlayerMap};
///
/// let mut goals: PlayerMap<u32> = PlayerMap::with_value(0);
/// goals[PlayerId::Player2] += 1;
///
/// assert_eq!(goals[PlayerId::Player1], 0);
/// assert_eq!(goals[PlayerId::Player2], 1);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerMap<T> {
    data: [T; 2],
}

impl<T> PlayerMap<T> {
    /// Create a new PlayerMap with values from a factory function.
    pub fn new(factory: impl Fn(PlayerId) -> T) -> Self {
        Self {
            data: [factory(PlayerId::Player1), factory(PlayerId::Player2)],
        }
    }

    /// Create a new PlayerMap with both entries set to the same value.
    pub fn with_value(value: T) -> Self
    where
        T: Clone,
    {
        Self::new(|_| value.clone())
    }

    /// Get a reference to a player's data.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &T {
        &self.data[player.index()]
    }

    /// Get a mutable reference to a player's data.
    pub fn get_mut(&mut self, player: PlayerId) -> &mut T {
        &mut self.data[player.index()]
    }

    /// Iterate over (PlayerId, &T) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &T)> {
        PlayerId::ALL.into_iter().zip(self.data.iter())
    }

    /// Overwrite both entries.
    pub fn fill(&mut self, value: T)
    where
        T: Clone,
    {
        self.data = [value.clone(), value];
    }
}

impl<T> Index<PlayerId> for PlayerMap<T> {
    type Output = T;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl<T> IndexMut<PlayerId> for PlayerMap<T> {
    fn index_mut(&mut self, player: PlayerId) -> &mut Self::Output {
        self.get_mut(player)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_id_basics() {
        assert_eq!(PlayerId::Player1.index(), 0);
        assert_eq!(PlayerId::Player2.index(), 1);
        assert_eq!(format!("{}", PlayerId::Player1), "Player 1");
        assert_eq!(PlayerId::from_index(1), Some(PlayerId::Player2));
        assert_eq!(PlayerId::from_index(2), None);
    }

    #[test]
    fn test_opponent() {
        assert_eq!(PlayerId::Player1.opponent(), PlayerId::Player2);
        assert_eq!(PlayerId::Player2.opponent(), PlayerId::Player1);
        assert!(PlayerId::Player1.attacks_top());
        assert!(!PlayerId::Player2.attacks_top());
    }

    #[test]
    fn test_player_map_new() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 * 10);

        assert_eq!(map[PlayerId::Player1], 0);
        assert_eq!(map[PlayerId::Player2], 10);
    }

    #[test]
    fn test_player_map_mutation_and_fill() {
        let mut map: PlayerMap<u32> = PlayerMap::with_value(0);

        map[PlayerId::Player1] = 3;
        map[PlayerId::Player2] += 2;
        assert_eq!(map[PlayerId::Player1], 3);
        assert_eq!(map[PlayerId::Player2], 2);

        map.fill(0);
        assert_eq!(map, PlayerMap::with_value(0));
    }

    #[test]
    fn test_player_map_iter() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32);

        let pairs: Vec<_> = map.iter().collect();
        assert_eq!(pairs, vec![(PlayerId::Player1, &0), (PlayerId::Player2, &1)]);
    }

    #[test]
    fn test_player_map_serialization() {
        let map: PlayerMap<i32> = PlayerMap::new(|p| p.index() as i32 + 1);
        let json = serde_json::to_string(&map).unwrap();
        let deserialized: PlayerMap<i32> = serde_json::from_str(&json).unwrap();
        assert_eq!(map, deserialized);
    }
}
