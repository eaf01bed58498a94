//! Board graph and rules integration tests.

use paper_soccer::board::{Board, Direction, Path, PathElement};
use paper_soccer::core::PlayerId;
use paper_soccer::rules::{is_any_move_allowed, is_goal_scored, is_move_allowed, must_rebounce, scorer};
use proptest::prelude::*;

// =============================================================================
// Structure Tests
// =============================================================================

#[test]
fn test_standard_board_counts() {
    let board = Board::standard();
    assert_eq!(board.point_count(), 105);
    assert_eq!(board.edge_count(), 356);
    assert_eq!(board.edges().filter(|(_, e)| e.is_border()).count(), 40);
}

#[test]
fn test_no_edge_leaves_the_goal_mouth_sideways() {
    let board = Board::standard();
    for (id, point) in board.points() {
        if !point.is_goal() {
            continue;
        }
        for direction in Direction::ALL {
            if let Some(other) = board.neighbour(id, direction) {
                let far = board.point(other);
                // Every neighbour of a goal point lies between the posts.
                assert!((3..=5).contains(&far.x()), "({}, {}) -> ({}, {})", point.x(), point.y(), far.x(), far.y());
            }
        }
    }
}

#[test]
fn test_border_edges_are_axis_aligned_between_border_points() {
    let board = Board::standard();
    for (_, edge) in board.edges() {
        let [a, b] = edge.ends();
        let (a, b) = (board.point(a), board.point(b));
        let axis = a.x() == b.x() || a.y() == b.y();
        assert_eq!(edge.is_border(), a.is_border() && b.is_border() && axis);
    }
}

#[test]
fn test_other_odd_sizes_build() {
    for (w, h) in [(5, 5), (7, 9), (11, 15)] {
        let board = Board::new(w, h).unwrap();
        let center = board.point(board.center());
        assert_eq!((center.x(), center.y()), (w / 2, h / 2));
        assert!(is_any_move_allowed(&board, board.center()));
    }
    assert!(Board::new(9, 12).is_err());
}

// =============================================================================
// Goal Scenario
// =============================================================================

#[test]
fn test_move_into_top_goal_scores_for_player_one() {
    let mut board = Board::standard();
    let path = Path::from_directions(&[Direction::North; 5], PlayerId::Player2);
    board.apply_path(&path).unwrap();

    let (x, y) = (board.current_point().x(), board.current_point().y());
    assert_eq!((x, y), (4, 11));
    assert!(is_move_allowed(&board, board.current(), Direction::NorthWest));
    assert!(must_rebounce(&board, board.current(), Direction::NorthWest));

    board.apply_move(Direction::NorthWest, PlayerId::Player2).unwrap();
    assert!(is_goal_scored(&board));
    // Credit goes to the player defending the opposite row, whoever moved.
    assert_eq!(scorer(&board), Some(PlayerId::Player1));
}

#[test]
fn test_path_log_records_rounds() {
    let mut board = Board::standard();
    board.apply_move(Direction::East, PlayerId::Player1).unwrap();
    board.start_next_round();
    board.apply_move(Direction::West, PlayerId::Player2).unwrap();

    assert_eq!(board.path().len(), 3);
    assert_eq!(board.path().last_turn(), &[PathElement::of(Direction::West, PlayerId::Player2)]);
    assert_eq!(board.path().to_string(), "3 move(s): [d2,p1][|][d6,p2]");
}

// =============================================================================
// Properties
// =============================================================================

fn direction_strategy() -> impl Strategy<Value = Direction> {
    (0u8..8).prop_map(Direction::from_bits)
}

/// Render plus who drew every edge, in arena order.
fn state(board: &Board) -> (String, Vec<Option<PlayerId>>) {
    let drawn = board.edges().map(|(_, e)| e.drawn_by()).collect();
    (board.render(), drawn)
}

/// Apply random moves, skipping illegal ones, until a goal or a dead end.
fn random_walk(board: &mut Board, moves: &[Direction]) {
    for (i, &direction) in moves.iter().enumerate() {
        if is_goal_scored(board) || !is_any_move_allowed(board, board.current()) {
            break;
        }
        if is_move_allowed(board, board.current(), direction) {
            let player = if i % 2 == 0 { PlayerId::Player1 } else { PlayerId::Player2 };
            board.apply_move(direction, player).unwrap();
        }
    }
}

proptest! {
    #[test]
    fn prop_reset_is_idempotent(moves in prop::collection::vec(direction_strategy(), 0..60)) {
        let mut board = Board::standard();
        random_walk(&mut board, &moves);

        board.reset();
        let once = state(&board);
        let once_path = board.path().clone();
        board.reset();

        prop_assert_eq!(state(&board), once);
        prop_assert_eq!(board.path(), &once_path);
        prop_assert_eq!(state(&board), state(&Board::standard()));
    }

    #[test]
    fn prop_goal_iff_goal_row(moves in prop::collection::vec(direction_strategy(), 0..80)) {
        let mut board = Board::standard();
        random_walk(&mut board, &moves);

        let y = board.current_point().y();
        prop_assert_eq!(is_goal_scored(&board), y == 0 || y == 12);
    }

    #[test]
    fn prop_make_undo_round_trip(
        prefix in prop::collection::vec(direction_strategy(), 0..20),
        probe in direction_strategy(),
    ) {
        let mut board = Board::standard();
        random_walk(&mut board, &prefix);
        prop_assume!(!is_goal_scored(&board));
        prop_assume!(is_move_allowed(&board, board.current(), probe));

        let before = state(&board);
        let ball = board.current();
        board.make_move(probe, PlayerId::Player1);
        prop_assert_ne!(state(&board), before.clone());
        board.undo_move(probe);
        prop_assert_eq!(state(&board), before);
        prop_assert_eq!(board.current(), ball);
    }
}
