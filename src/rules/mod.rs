//! Move legality and scoring.
//!
//! These are pure queries over a `Board`; they never mutate it. The search
//! driver calls them for every candidate move, the match controller once per
//! turn.

use crate::board::{Board, Direction, PointId};
use crate::core::PlayerId;

/// True if an edge leaves `point` in `direction` and is not blocked.
#[inline]
#[must_use]
pub fn is_move_allowed(board: &Board, point: PointId, direction: Direction) -> bool {
    board
        .edge_from(point, direction)
        .is_some_and(|edge| !edge.is_blocked())
}

/// True if at least one move from `point` is allowed.
#[must_use]
pub fn is_any_move_allowed(board: &Board, point: PointId) -> bool {
    Direction::ALL
        .into_iter()
        .any(|direction| is_move_allowed(board, point, direction))
}

/// True if a move from `point` other than `excluded` is allowed.
///
/// The search passes the edge it would arrive by, which is not drawn yet
/// while the move is only being estimated.
#[must_use]
pub fn is_any_move_allowed_except(board: &Board, point: PointId, excluded: Direction) -> bool {
    Direction::ALL
        .into_iter()
        .filter(|&direction| direction != excluded)
        .any(|direction| is_move_allowed(board, point, direction))
}

/// True if moving from `point` in `direction` lands on a marked point, so
/// the same player moves again.
///
/// Panics if the move is not allowed.
#[must_use]
pub fn must_rebounce(board: &Board, point: PointId, direction: Direction) -> bool {
    let Some(edge) = board.edge_from(point, direction) else {
        panic!("no edge leaves {point:?} in direction {direction}");
    };
    assert!(!edge.is_blocked(), "edge leaving {point:?} in direction {direction} is blocked");
    board.point(edge.opposite(point)).is_marked()
}

/// True if the ball is on either goal row.
#[inline]
#[must_use]
pub fn is_goal_scored(board: &Board) -> bool {
    board.is_goal_row(board.current_point().y())
}

/// Row a player scores on: `Player1` attacks the top goal.
#[must_use]
pub fn target_row(board: &Board, player: PlayerId) -> usize {
    if player.attacks_top() {
        board.height() - 1
    } else {
        0
    }
}

/// Player credited with the goal the ball currently sits in, if any.
#[must_use]
pub fn scorer(board: &Board) -> Option<PlayerId> {
    let y = board.current_point().y();
    PlayerId::ALL
        .into_iter()
        .find(|&player| is_goal_scored(board) && target_row(board, player) == y)
}
