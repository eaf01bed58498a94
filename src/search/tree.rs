//! Flat search tree over the pooled record store.
//!
//! Records refer to their parent by index; a root move has no parent. The
//! driver fills the tree in two phases: indices `[0, split)` hold the
//! searching player's own moves, `[split, len)` the opponent's replies to
//! the own-move leaves.

use std::collections::BTreeMap;
use std::ops::Range;

use rustc_hash::FxHashSet;
use tracing::warn;

use super::element::{TreeElement, GOAL_SCORED};
use super::pool::{PoolArray, BLOCK_SIZE};
use crate::board::{Direction, Path, PathElement};
use crate::core::{GameRng, PlayerId};

/// Longest move sequence the driver replays onto the board.
pub const MAX_ANALYSIS_PATH: usize = 100;

/// Search tree of packed candidate moves.
#[derive(Clone, Debug, Default)]
pub struct EstimationTree {
    elements: PoolArray<TreeElement>,
    has_leaf_move: bool,
}

impl EstimationTree {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, returning its index.
    pub fn add(&mut self, element: TreeElement) -> usize {
        self.has_leaf_move |= element.is_leaf_move();
        self.elements.push(element)
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> TreeElement {
        self.elements.get(index)
    }

    #[inline]
    pub fn set(&mut self, index: usize, element: TreeElement) {
        self.elements.set(index, element);
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn clear(&mut self) {
        self.elements.clear();
        self.has_leaf_move = false;
    }

    /// True once any record completing a turn has been added.
    #[inline]
    #[must_use]
    pub fn has_leaf_move(&self) -> bool {
        self.has_leaf_move
    }

    /// Moves from a root down to `index`, all attributed to `player`.
    /// `None` gives the empty path.
    #[must_use]
    pub fn path_to(&self, index: Option<usize>, player: PlayerId) -> Path {
        let mut directions = Vec::new();
        let mut cursor = index;
        while let Some(i) = cursor {
            let element = self.get(i);
            directions.push(element.direction());
            cursor = element.parent();
        }
        directions
            .into_iter()
            .rev()
            .map(|direction| PathElement::of(direction, player))
            .collect()
    }

    /// Non-allocating `path_to`: writes the directions root-first into `buf`
    /// and returns how many were written.
    ///
    /// Panics if the path is longer than `MAX_ANALYSIS_PATH`.
    pub fn path_to_into(&self, index: usize, buf: &mut [Direction; MAX_ANALYSIS_PATH]) -> usize {
        let mut len = 0;
        let mut cursor = Some(index);
        while let Some(i) = cursor {
            assert!(len < MAX_ANALYSIS_PATH, "analysis path longer than {MAX_ANALYSIS_PATH} moves");
            let element = self.get(i);
            buf[len] = element.direction();
            len += 1;
            cursor = element.parent();
        }
        buf[..len].reverse();
        len
    }

    /// True if any record from `from` onward still needs expanding.
    #[must_use]
    pub fn has_unanalyzed(&self, from: usize) -> bool {
        (from..self.len()).any(|i| !self.get(i).is_analysis_complete())
    }

    /// Number of leaf moves in `range`.
    #[must_use]
    pub fn leaf_count(&self, range: Range<usize>) -> usize {
        range.filter(|&i| self.get(i).is_leaf_move()).count()
    }

    /// Memory held by the record blocks.
    #[must_use]
    pub fn estimated_bytes(&self) -> usize {
        self.elements.block_count() * BLOCK_SIZE * std::mem::size_of::<TreeElement>()
    }

    /// Own-move leaf an opponent reply at `index` answers.
    fn own_ancestor(&self, index: usize, split: usize) -> Option<usize> {
        let mut parent = self.get(index).parent();
        while let Some(p) = parent {
            if p < split {
                return Some(p);
            }
            parent = self.get(p).parent();
        }
        None
    }

    /// Two-ply minimax over both phases.
    ///
    /// An own leaf that scores wins outright. Otherwise every own leaf is
    /// valued by the best reply the opponent found against it, and the own
    /// leaf whose best reply is weakest is played, ties broken at random.
    /// Falls back to [`EstimationTree::best_path_single_ply`] when no reply
    /// leaf exists.
    pub fn best_path_minimax(&self, split: usize, player: PlayerId, rng: &mut GameRng) -> Option<Path> {
        if let Some(goal) = (0..split).find(|&i| {
            let e = self.get(i);
            e.is_leaf_move() && e.estimation() == GOAL_SCORED
        }) {
            return Some(self.path_to(Some(goal), player));
        }

        let mut best_replies: BTreeMap<usize, i16> = BTreeMap::new();
        for i in split..self.len() {
            let element = self.get(i);
            if !element.is_leaf_move() {
                continue;
            }
            if let Some(own) = self.own_ancestor(i, split) {
                let value = best_replies.entry(own).or_insert(i16::MIN);
                *value = (*value).max(element.estimation());
            }
        }

        let Some(&weakest) = best_replies.values().min() else {
            warn!(split, len = self.len(), "no reply leaves, falling back to single-ply selection");
            return self.best_path_single_ply(split, player, rng);
        };

        let tied: Vec<usize> = best_replies
            .iter()
            .filter(|&(_, &value)| value == weakest)
            .map(|(&own, _)| own)
            .collect();
        let chosen = tied[rng.gen_index(tied.len())];
        Some(self.path_to(Some(chosen), player))
    }

    /// Pick the best-estimated own leaf.
    ///
    /// Own leaves after which the opponent was seen to score are skipped
    /// unless nothing else remains. Among the top estimations only siblings
    /// of the first candidate are considered.
    pub fn best_path_single_ply(&self, split: usize, player: PlayerId, rng: &mut GameRng) -> Option<Path> {
        let concedes: FxHashSet<usize> = (split..self.len())
            .filter(|&i| {
                let e = self.get(i);
                e.is_leaf_move() && e.estimation() == GOAL_SCORED
            })
            .filter_map(|i| self.own_ancestor(i, split))
            .collect();

        let own_leaves = (0..split).filter(|&i| self.get(i).is_leaf_move());
        let mut candidates: Vec<usize> = own_leaves.clone().filter(|i| !concedes.contains(i)).collect();
        if candidates.is_empty() {
            candidates = own_leaves.collect();
        }
        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by(|&a, &b| {
            let (ea, eb) = (self.get(a), self.get(b));
            eb.estimation()
                .cmp(&ea.estimation())
                .then(ea.parent_index().cmp(&eb.parent_index()))
        });

        let first = self.get(candidates[0]);
        let group = candidates
            .iter()
            .skip(1)
            .position(|&i| {
                let e = self.get(i);
                e.estimation() < first.estimation() || e.parent_index() > first.parent_index()
            })
            .map_or(candidates.len(), |p| p + 1);

        let chosen = candidates[rng.gen_index(group)];
        Some(self.path_to(Some(chosen), player))
    }
}
