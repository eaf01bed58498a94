//! Two-phase search for the computer player's turn.
//!
//! Phase one grows the tree of the searching player's own turns breadth-first
//! from the current position. Unless it already found a goal, phase two
//! grows the opponent's replies below every own turn that can be answered.
//! The board is replayed to each node with make/unmake before it is
//! expanded and is back in its original state when the search returns.

use std::time::Instant;

use tracing::{debug, info, trace};

use crate::board::{Board, Direction, Path};
use crate::core::{GameRng, PlayerId};
use crate::rules::{is_any_move_allowed, is_any_move_allowed_except, is_move_allowed};

use super::config::{Difficulty, SearchConfig};
use super::element::{TreeElement, GAME_LOST, GOAL_LOST, GOAL_SCORED};
use super::stats::SearchStats;
use super::tree::{EstimationTree, MAX_ANALYSIS_PATH};

/// Whose turns a phase is expanding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Side {
    Own,
    Opponent,
}

/// Search context of one computer player.
///
/// Owns the tree and the replay buffers; one search at a time.
pub struct SearchDriver {
    config: SearchConfig,
    player: PlayerId,
    tree: EstimationTree,
    rng: GameRng,

    /// Moves currently made on the board, root first.
    analysis_path: [Direction; MAX_ANALYSIS_PATH],
    analysis_len: usize,
    scratch: [Direction; MAX_ANALYSIS_PATH],

    stats: SearchStats,
}

impl SearchDriver {
    /// Create a driver searching for `player`.
    pub fn new(config: SearchConfig, player: PlayerId) -> Self {
        let rng = GameRng::new(config.seed);
        Self {
            config,
            player,
            tree: EstimationTree::new(),
            rng,
            analysis_path: [Direction::North; MAX_ANALYSIS_PATH],
            analysis_len: 0,
            scratch: [Direction::North; MAX_ANALYSIS_PATH],
            stats: SearchStats::default(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    #[must_use]
    pub fn player(&self) -> PlayerId {
        self.player
    }

    #[must_use]
    pub fn difficulty(&self) -> Difficulty {
        self.config.difficulty
    }

    /// Switch to the preset budgets of `difficulty`, keeping the seed.
    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        let seed = self.config.seed;
        self.config = SearchConfig::for_difficulty(difficulty).with_seed(seed);
    }

    /// Statistics of the last search.
    #[must_use]
    pub fn stats(&self) -> &SearchStats {
        &self.stats
    }

    /// Tree left by the last search.
    #[must_use]
    pub fn tree(&self) -> &EstimationTree {
        &self.tree
    }

    /// Compute the searching player's next turn.
    ///
    /// Returns `None` when no move is possible or the ball already sits in a
    /// goal. The board is mutated during the search and fully restored
    /// before returning.
    pub fn best_path(&mut self, board: &mut Board) -> Option<Path> {
        if !is_any_move_allowed(board, board.current()) || board.current_point().is_goal() {
            return None;
        }

        let start = Instant::now();
        self.stats.reset();
        self.tree.clear();
        self.analysis_len = 0;
        let mut rng = self.rng.fork();
        let own_top = self.player.attacks_top();

        info!(
            player = %self.player,
            difficulty = %self.config.difficulty,
            max_elements = self.config.max_elements,
            "search started"
        );
        trace!("board before search:\n{}", board.render());

        let mut own_goal = self.expand(board, None, 0, own_top);
        if !own_goal {
            own_goal = self.analyse_tree(board, 0, Side::Own);
        }
        let split = self.tree.len();
        debug!(
            elements = split,
            leaves = self.tree.leaf_count(0..split),
            own_goal,
            "own-move phase done"
        );

        if !own_goal {
            for i in 0..split {
                if self.tree.len() > self.config.max_elements {
                    break;
                }
                let element = self.tree.get(i);
                if element.allows_reply_analysis() {
                    self.prepare_board(board, i);
                    self.expand(board, Some(i), element.depth(), !own_top);
                }
            }
            self.unwind(board);
            self.analyse_tree(board, split, Side::Opponent);
            debug!(
                elements = self.tree.len() - split,
                leaves = self.tree.leaf_count(split..self.tree.len()),
                "reply phase done"
            );
        }

        let path = if self.config.difficulty.uses_minimax() {
            self.tree.best_path_minimax(split, self.player, &mut rng)
        } else {
            self.tree.best_path_single_ply(split, self.player, &mut rng)
        };

        self.stats.elements = self.tree.len();
        self.stats.split = split;
        self.stats.own_leaves = self.tree.leaf_count(0..split);
        self.stats.reply_leaves = self.tree.leaf_count(split..self.tree.len());
        self.stats.own_goal_found = own_goal;
        self.stats.time_us = start.elapsed().as_micros() as u64;

        info!(
            elements = self.stats.elements,
            bytes = self.tree.estimated_bytes(),
            elapsed_ms = self.stats.time_us / 1000,
            moves = path.as_ref().map_or(0, Path::len),
            "search finished"
        );
        path
    }

    /// Add one record per allowed move from the ball's position.
    ///
    /// `top_positive` orients estimations toward the top goal. Returns true
    /// if one of the moves scores for the acting side.
    fn expand(&mut self, board: &Board, parent: Option<usize>, parent_depth: u8, top_positive: bool) -> bool {
        let current = board.current();
        let depth = parent_depth.saturating_add(1);
        let mid = (board.height() / 2) as i32;
        let mut scores = false;

        for direction in Direction::ALL {
            if !is_move_allowed(board, current, direction) {
                continue;
            }
            let Some(next) = board.neighbour(current, direction) else {
                continue;
            };
            let point = board.point(next);

            let (estimation, turn_ends) = if point.is_goal() {
                let bottom = point.y() == 0;
                let estimation = if bottom == top_positive { GOAL_LOST } else { GOAL_SCORED };
                (estimation, true)
            } else if !is_any_move_allowed_except(board, next, direction.opposite()) {
                (GAME_LOST, true)
            } else {
                let offset = point.y() as i32 - mid;
                let estimation = if top_positive { offset } else { -offset };
                (estimation as i16, !point.is_marked())
            };

            scores |= estimation == GOAL_SCORED;
            self.tree
                .add(TreeElement::new(parent, estimation, depth, direction, turn_ends, turn_ends));
        }

        scores
    }

    /// Expand every open record from `start` onward, pass by pass, until the
    /// budgets are spent. Returns true if an own-move goal was found.
    fn analyse_tree(&mut self, board: &mut Board, start: usize, side: Side) -> bool {
        let (max_depth, top_positive) = match side {
            Side::Own => (self.config.own_depth, self.player.attacks_top()),
            Side::Opponent => (self.config.reply_depth, !self.player.attacks_top()),
        };
        let mut start = start;
        let mut keep_going = true;
        let mut goal_found = false;

        while keep_going && self.tree.has_unanalyzed(start) {
            let count = self.tree.len();
            for i in start..count {
                if !keep_going || self.tree.len() > self.config.max_elements {
                    keep_going = false;
                    break;
                }
                let element = self.tree.get(i);
                if element.is_analysis_complete() {
                    continue;
                }
                if element.depth() < max_depth || !self.tree.has_leaf_move() {
                    self.prepare_board(board, i);
                    if self.expand(board, Some(i), element.depth(), top_positive) && side == Side::Own {
                        keep_going = false;
                        goal_found = true;
                    }
                }
                self.tree.set(i, element.with_analysis_complete(true));
            }
            start = count;
        }

        self.unwind(board);
        goal_found
    }

    /// Replay the board to the position after the moves leading to `index`,
    /// keeping the prefix shared with the moves already made.
    fn prepare_board(&mut self, board: &mut Board, index: usize) {
        let len = self.tree.path_to_into(index, &mut self.scratch);
        let common = self.analysis_path[..self.analysis_len]
            .iter()
            .zip(&self.scratch[..len])
            .take_while(|(made, wanted)| made == wanted)
            .count();

        for &direction in self.analysis_path[common..self.analysis_len].iter().rev() {
            board.undo_move(direction);
        }
        for &direction in &self.scratch[common..len] {
            board.make_move(direction, self.player);
        }

        self.analysis_path[..len].copy_from_slice(&self.scratch[..len]);
        self.analysis_len = len;
    }

    /// Take back every move made by the search.
    fn unwind(&mut self, board: &mut Board) {
        for &direction in self.analysis_path[..self.analysis_len].iter().rev() {
            board.undo_move(direction);
        }
        self.analysis_len = 0;
    }
}
