//! Arena-based board graph.
//!
//! Points and edges live in two flat vectors owned by the `Board` and refer
//! to each other by index. Every edge is shared by its two endpoints: a point
//! stores up to eight `EdgeId`s (one per direction, `EdgeId::NONE` when absent)
//! and an edge stores both `PointId`s.
//!
//! ## Layout of a standard 9x13 board
//!
//! ```text
//! y=12       g g g          goal row: posts and mouth
//! y=11 b b b b o b b b b    end line, open only in front of the goal
//! y=10 b o o o o o o o b
//!  ...
//! y=6  b o o o * o o o b    * = start point (center)
//!  ...
//! y=1  b b b b o b b b b
//! y=0        g g g
//! ```

use super::direction::Direction;
use super::error::{BoardError, MoveError};
use super::path::{Path, PathElement};
use crate::core::PlayerId;

/// Smallest accepted width and height.
pub const MIN_DIMENSION: usize = 5;

/// Index into the board's point arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PointId(u32);

impl PointId {
    /// Sentinel value representing no point.
    pub const NONE: PointId = PointId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Index into the board's edge arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeId(u32);

impl EdgeId {
    /// Sentinel value representing no edge.
    pub const NONE: EdgeId = EdgeId(u32::MAX);

    #[inline]
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// A vertex of the board.
#[derive(Clone, Debug)]
pub struct Point {
    x: usize,
    y: usize,
    border: bool,
    goal: bool,
    /// Set once a drawn edge touches the point, and always for the start point.
    visited: bool,
    edges: [EdgeId; 8],
}

impl Point {
    fn new(x: usize, y: usize, border: bool, goal: bool) -> Self {
        Self {
            x,
            y,
            border,
            goal,
            visited: false,
            edges: [EdgeId::NONE; 8],
        }
    }

    #[inline]
    #[must_use]
    pub fn x(&self) -> usize {
        self.x
    }

    #[inline]
    #[must_use]
    pub fn y(&self) -> usize {
        self.y
    }

    #[inline]
    #[must_use]
    pub fn is_border(&self) -> bool {
        self.border
    }

    /// True for the three points of either goal row.
    #[inline]
    #[must_use]
    pub fn is_goal(&self) -> bool {
        self.goal
    }

    #[inline]
    #[must_use]
    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// A ball arriving on a marked point must keep moving.
    #[inline]
    #[must_use]
    pub fn is_marked(&self) -> bool {
        self.border || self.visited
    }

    /// Edge leaving this point in `direction`, if any.
    #[inline]
    #[must_use]
    pub fn edge(&self, direction: Direction) -> Option<EdgeId> {
        let edge = self.edges[direction.index() as usize];
        (!edge.is_none()).then_some(edge)
    }
}

/// A drawable connection between two neighbouring points.
#[derive(Clone, Debug)]
pub struct Edge {
    ends: [PointId; 2],
    border: bool,
    drawn_by: Option<PlayerId>,
}

impl Edge {
    #[must_use]
    pub fn ends(&self) -> [PointId; 2] {
        self.ends
    }

    /// Pre-blocked pitch boundary.
    #[inline]
    #[must_use]
    pub fn is_border(&self) -> bool {
        self.border
    }

    #[inline]
    #[must_use]
    pub fn drawn_by(&self) -> Option<PlayerId> {
        self.drawn_by
    }

    #[inline]
    #[must_use]
    pub fn is_drawn(&self) -> bool {
        self.drawn_by.is_some()
    }

    #[inline]
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.border || self.drawn_by.is_some()
    }

    /// The endpoint that is not `point`.
    #[inline]
    #[must_use]
    pub fn opposite(&self, point: PointId) -> PointId {
        debug_assert!(self.ends.contains(&point), "{point:?} is not an endpoint of this edge");
        if self.ends[0] == point {
            self.ends[1]
        } else {
            self.ends[0]
        }
    }
}

/// The playing field: point and edge arenas plus the ball position and the
/// log of every move applied since the last reset.
#[derive(Clone, Debug)]
pub struct Board {
    width: usize,
    height: usize,
    /// `y * width + x` to point, `PointId::NONE` outside the octagon.
    table: Vec<PointId>,
    points: Vec<Point>,
    edges: Vec<Edge>,
    start: PointId,
    current: PointId,
    path: Path,
}

impl Board {
    /// The standard 9x13 board.
    #[must_use]
    pub fn standard() -> Self {
        match Self::new(9, 13) {
            Ok(board) => board,
            Err(err) => unreachable!("standard dimensions rejected: {err}"),
        }
    }

    /// Build a board; both dimensions must be odd and at least `MIN_DIMENSION`.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if width % 2 == 0 || height % 2 == 0 {
            return Err(BoardError::EvenDimension { width, height });
        }
        if width < MIN_DIMENSION || height < MIN_DIMENSION {
            return Err(BoardError::TooSmall {
                width,
                height,
                min: MIN_DIMENSION,
            });
        }

        let mut board = Self {
            width,
            height,
            table: vec![PointId::NONE; width * height],
            points: Vec::with_capacity(width * (height - 2) + 6),
            edges: Vec::new(),
            start: PointId::NONE,
            current: PointId::NONE,
            path: Path::new(),
        };

        board.create_points();
        board.create_edges();

        board.start = board.table[(height / 2) * width + width / 2];
        board.current = board.start;
        board.points[board.start.index()].visited = true;

        Ok(board)
    }

    fn create_points(&mut self) {
        let (post_left, post_right) = self.post_columns();

        for y in 1..self.height - 1 {
            for x in 0..self.width {
                let mut border = x == 0 || x == self.width - 1;
                if !border && (y == 1 || y == self.height - 2) {
                    border = x <= post_left || x >= post_right;
                }
                self.insert_point(Point::new(x, y, border, false));
            }
        }

        for y in [0, self.height - 1] {
            for x in post_left..=post_right {
                self.insert_point(Point::new(x, y, true, true));
            }
        }
    }

    fn insert_point(&mut self, point: Point) {
        let id = PointId(self.points.len() as u32);
        self.table[point.y * self.width + point.x] = id;
        self.points.push(point);
    }

    fn create_edges(&mut self) {
        for y in 0..self.height {
            for x in 0..self.width {
                let id = self.table[y * self.width + x];
                if id.is_none() {
                    continue;
                }
                for direction in Direction::ALL {
                    self.connect(id, direction);
                }
            }
        }
    }

    fn connect(&mut self, id: PointId, direction: Direction) {
        if self.points[id.index()].edge(direction).is_some() {
            return;
        }
        let Some(other) = self.step(id, direction) else {
            return;
        };
        if self.cuts_goal_post(id, other) || self.cuts_goal_post(other, id) {
            return;
        }

        let (a, b) = (&self.points[id.index()], &self.points[other.index()]);
        let border = a.border && b.border && !direction.is_diagonal();

        let edge = EdgeId(self.edges.len() as u32);
        self.edges.push(Edge {
            ends: [id, other],
            border,
            drawn_by: None,
        });
        self.points[id.index()].edges[direction.index() as usize] = edge;
        self.points[other.index()].edges[direction.opposite().index() as usize] = edge;
    }

    /// Diagonal from a goal post to the end-line point outside it.
    fn cuts_goal_post(&self, goal_side: PointId, field_side: PointId) -> bool {
        let (post_left, post_right) = self.post_columns();
        let (g, f) = (&self.points[goal_side.index()], &self.points[field_side.index()]);

        let crosses_end_line =
            (g.y == 0 && f.y == 1) || (g.y == self.height - 1 && f.y == self.height - 2);
        crosses_end_line
            && ((g.x == post_left && f.x + 1 == post_left) || (g.x == post_right && f.x == post_right + 1))
    }

    fn post_columns(&self) -> (usize, usize) {
        (self.width / 2 - 1, self.width / 2 + 1)
    }

    fn step(&self, id: PointId, direction: Direction) -> Option<PointId> {
        let point = &self.points[id.index()];
        let (dx, dy) = direction.offset();
        let x = point.x.checked_add_signed(dx)?;
        let y = point.y.checked_add_signed(dy)?;
        self.point_at(x, y)
    }

    // === Accessors ===

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> usize {
        self.height
    }

    /// The fixed start point in the middle of the board.
    #[inline]
    #[must_use]
    pub fn center(&self) -> PointId {
        self.start
    }

    /// Current ball position.
    #[inline]
    #[must_use]
    pub fn current(&self) -> PointId {
        self.current
    }

    #[inline]
    #[must_use]
    pub fn current_point(&self) -> &Point {
        self.point(self.current)
    }

    #[inline]
    #[must_use]
    pub fn point(&self, id: PointId) -> &Point {
        &self.points[id.index()]
    }

    #[inline]
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.index()]
    }

    /// Point at grid coordinates, `None` outside the playable octagon.
    #[must_use]
    pub fn point_at(&self, x: usize, y: usize) -> Option<PointId> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let id = self.table[y * self.width + x];
        (!id.is_none()).then_some(id)
    }

    /// Edge leaving `point` in `direction`.
    #[inline]
    #[must_use]
    pub fn edge_from(&self, point: PointId, direction: Direction) -> Option<&Edge> {
        self.point(point).edge(direction).map(|id| self.edge(id))
    }

    /// Point on the far side of the edge leaving `point` in `direction`.
    #[inline]
    #[must_use]
    pub fn neighbour(&self, point: PointId, direction: Direction) -> Option<PointId> {
        self.edge_from(point, direction).map(|edge| edge.opposite(point))
    }

    pub fn points(&self) -> impl Iterator<Item = (PointId, &Point)> {
        self.points
            .iter()
            .enumerate()
            .map(|(i, p)| (PointId(i as u32), p))
    }

    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges
            .iter()
            .enumerate()
            .map(|(i, e)| (EdgeId(i as u32), e))
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Every move applied since the last reset, rounds split by separators.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True if `y` is one of the two goal rows.
    #[inline]
    #[must_use]
    pub fn is_goal_row(&self, y: usize) -> bool {
        y == 0 || y == self.height - 1
    }

    // === Mutation ===

    /// Clear every drawn edge, visited flag and the path log, and put the
    /// ball back on the start point.
    pub fn reset(&mut self) {
        self.path.clear();
        for point in &mut self.points {
            point.visited = false;
        }
        for edge in &mut self.edges {
            edge.drawn_by = None;
        }
        self.current = self.start;
        self.points[self.start.index()].visited = true;
    }

    /// Move the ball without drawing anything.
    pub fn set_current(&mut self, point: PointId) {
        assert!(point.index() < self.points.len(), "{point:?} is not on this board");
        self.current = point;
    }

    /// Record a round separator and put the ball back on the start point.
    pub fn start_next_round(&mut self) {
        self.path.push(PathElement::SEPARATOR);
        self.current = self.start;
    }

    fn playable_edge(&self, direction: Direction) -> Result<EdgeId, MoveError> {
        let point = self.current_point();
        let (x, y) = (point.x, point.y);
        match point.edge(direction) {
            None => Err(MoveError::MissingEdge { x, y, direction }),
            Some(id) if self.edges[id.index()].is_blocked() => Err(MoveError::EdgeBlocked { x, y, direction }),
            Some(id) => Ok(id),
        }
    }

    fn draw(&mut self, edge: EdgeId, player: PlayerId) {
        let edge = &mut self.edges[edge.index()];
        edge.drawn_by = Some(player);
        let destination = edge.opposite(self.current);
        self.points[destination.index()].visited = true;
        self.current = destination;
    }

    /// Draw the edge from the ball in `direction` and log the move.
    ///
    /// A rejected move leaves the board untouched.
    pub fn apply_move(&mut self, direction: Direction, player: PlayerId) -> Result<(), MoveError> {
        let edge = self.playable_edge(direction)?;
        self.draw(edge, player);
        self.path.push(PathElement::of(direction, player));
        Ok(())
    }

    /// Apply every move of `path` in order.
    ///
    /// Separators are logged without moving the ball. On error the moves
    /// already applied stay applied.
    pub fn apply_path(&mut self, path: &Path) -> Result<(), MoveError> {
        for element in path.iter() {
            match (element.direction(), element.player()) {
                (Some(direction), Some(player)) => self.apply_move(direction, player)?,
                _ => self.path.push(element),
            }
        }
        Ok(())
    }

    /// Draw a move without logging it; search make/unmake only.
    ///
    /// Panics if the move is not playable.
    pub fn make_move(&mut self, direction: Direction, player: PlayerId) {
        match self.playable_edge(direction) {
            Ok(edge) => self.draw(edge, player),
            Err(err) => panic!("search replayed an illegal move: {err}"),
        }
    }

    /// Take back a move previously made in `direction`; search make/unmake only.
    ///
    /// The edge arriving at the ball is cleared, the ball's point stays
    /// visited only while another drawn edge still touches it, and the ball
    /// steps back. Panics if there is no drawn, non-border edge to take back.
    pub fn undo_move(&mut self, direction: Direction) {
        let back = direction.opposite();
        let current = self.current;
        let Some(edge_id) = self.points[current.index()].edge(back) else {
            panic!("no edge to take back in direction {direction}");
        };

        let edge = &mut self.edges[edge_id.index()];
        assert!(!edge.border, "cannot take back a border edge");
        assert!(edge.drawn_by.is_some(), "cannot take back an edge that was never drawn");
        edge.drawn_by = None;
        let previous = edge.opposite(current);

        let still_visited = current == self.start
            || self.points[current.index()]
                .edges
                .iter()
                .filter(|id| !id.is_none())
                .map(|id| &self.edges[id.index()])
                .any(|e| !e.border && e.is_drawn());
        self.points[current.index()].visited = still_visited;
        self.current = previous;
    }

    /// Text dump, top row first: `n` absent, `g` goal, `b` border,
    /// `v` visited, `o` free, `@` ball.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::with_capacity((self.width + 1) * self.height);
        for y in (0..self.height).rev() {
            for x in 0..self.width {
                let c = match self.point_at(x, y) {
                    None => 'n',
                    Some(id) if id == self.current => '@',
                    Some(id) => {
                        let point = self.point(id);
                        if point.goal {
                            'g'
                        } else if point.border {
                            'b'
                        } else if point.visited {
                            'v'
                        } else {
                            'o'
                        }
                    }
                };
                out.push(c);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drawn_edges(board: &Board) -> usize {
        board.edges().filter(|(_, e)| e.is_drawn()).count()
    }

    #[test]
    fn test_dimension_validation() {
        assert_eq!(
            Board::new(8, 13).unwrap_err(),
            BoardError::EvenDimension { width: 8, height: 13 }
        );
        assert_eq!(
            Board::new(3, 13).unwrap_err(),
            BoardError::TooSmall {
                width: 3,
                height: 13,
                min: MIN_DIMENSION
            }
        );
        assert!(Board::new(5, 5).is_ok());
    }

    #[test]
    fn test_standard_structure() {
        let board = Board::standard();

        assert_eq!(board.width(), 9);
        assert_eq!(board.height(), 13);
        assert_eq!(board.point_count(), 105);
        assert_eq!(board.edge_count(), 356);
        assert_eq!(board.edges().filter(|(_, e)| e.is_border()).count(), 40);
        assert_eq!(board.points().filter(|(_, p)| p.is_border()).count(), 40);
        assert_eq!(board.points().filter(|(_, p)| p.is_goal()).count(), 6);
    }

    #[test]
    fn test_small_board_structure() {
        let board = Board::new(5, 5).unwrap();
        assert_eq!(board.point_count(), 21);
        assert_eq!(board.edge_count(), 56);
        assert_eq!(board.edges().filter(|(_, e)| e.is_border()).count(), 16);
    }

    #[test]
    fn test_goal_rows_have_three_points() {
        let board = Board::standard();
        for y in [0, 12] {
            let xs: Vec<_> = (0..9).filter(|&x| board.point_at(x, y).is_some()).collect();
            assert_eq!(xs, vec![3, 4, 5]);
        }
        assert!(board.point_at(2, 0).is_none());
        assert!(board.point_at(9, 6).is_none());
    }

    #[test]
    fn test_center_is_start_and_visited() {
        let board = Board::standard();
        let center = board.point(board.center());
        assert_eq!((center.x(), center.y()), (4, 6));
        assert!(center.is_visited());
        assert_eq!(board.current(), board.center());
    }

    #[test]
    fn test_no_diagonal_outside_posts() {
        let board = Board::standard();
        let post = board.point_at(3, 12).unwrap();
        let outside = board.point_at(2, 11).unwrap();

        assert!(board.point(post).edge(Direction::SouthWest).is_none());
        assert!(board.point(outside).edge(Direction::NorthEast).is_none());

        let bottom_post = board.point_at(5, 0).unwrap();
        assert!(board.point(bottom_post).edge(Direction::NorthEast).is_none());
    }

    #[test]
    fn test_edges_are_shared() {
        let board = Board::standard();
        for (id, point) in board.points() {
            for dir in Direction::ALL {
                if let Some(edge) = point.edge(dir) {
                    let other = board.edge(edge).opposite(id);
                    assert_eq!(board.point(other).edge(dir.opposite()), Some(edge));
                }
            }
        }
    }

    #[test]
    fn test_apply_move_marks_and_logs() {
        let mut board = Board::standard();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();

        let point = board.current_point();
        assert_eq!((point.x(), point.y()), (4, 7));
        assert!(point.is_visited());
        assert_eq!(drawn_edges(&board), 1);
        assert_eq!(board.path().len(), 1);
        assert_eq!(
            board.edge_from(board.current(), Direction::South).unwrap().drawn_by(),
            Some(PlayerId::Player1)
        );
    }

    #[test]
    fn test_apply_move_rejects_blocked_edge() {
        let mut board = Board::standard();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();

        let err = board.apply_move(Direction::South, PlayerId::Player2).unwrap_err();
        assert_eq!(
            err,
            MoveError::EdgeBlocked {
                x: 4,
                y: 7,
                direction: Direction::South
            }
        );
        assert_eq!(board.path().len(), 1);
    }

    #[test]
    fn test_apply_move_rejects_missing_edge() {
        let mut board = Board::standard();
        let corner = board.point_at(0, 1).unwrap();
        board.set_current(corner);

        let err = board.apply_move(Direction::SouthWest, PlayerId::Player1).unwrap_err();
        assert!(matches!(err, MoveError::MissingEdge { x: 0, y: 1, .. }));
    }

    #[test]
    fn test_border_edges_block_wall_moves() {
        let mut board = Board::standard();
        let wall = board.point_at(0, 5).unwrap();
        board.set_current(wall);

        assert!(board.apply_move(Direction::North, PlayerId::Player1).is_err());
        assert!(board.apply_move(Direction::East, PlayerId::Player1).is_ok());
    }

    #[test]
    fn test_apply_path_partial_failure_keeps_prefix() {
        let mut board = Board::standard();
        let path = Path::from_directions(&[Direction::North, Direction::South], PlayerId::Player1);

        assert!(board.apply_path(&path).is_err());
        assert_eq!(drawn_edges(&board), 1);
        assert_eq!(board.path().len(), 1);
    }

    #[test]
    fn test_apply_path_logs_separator_without_moving() {
        let mut board = Board::standard();
        let mut path = Path::from_directions(&[Direction::East], PlayerId::Player2);
        path.push(PathElement::SEPARATOR);

        board.apply_path(&path).unwrap();
        assert_eq!(board.path(), &path);
        assert_eq!(board.current_point().x(), 5);
    }

    #[test]
    fn test_make_and_undo_restore_state() {
        let mut board = Board::standard();
        board.apply_move(Direction::East, PlayerId::Player1).unwrap();
        let before = board.render();
        let position = board.current();

        board.make_move(Direction::North, PlayerId::Player2);
        board.make_move(Direction::West, PlayerId::Player2);
        board.make_move(Direction::South, PlayerId::Player2);
        assert_eq!(board.current(), board.center());

        board.undo_move(Direction::South);
        board.undo_move(Direction::West);
        board.undo_move(Direction::North);

        assert_eq!(board.current(), position);
        assert_eq!(board.render(), before);
        assert_eq!(drawn_edges(&board), 1);
        assert_eq!(board.path().len(), 1);
    }

    #[test]
    fn test_undo_keeps_visited_when_other_edge_drawn() {
        let mut board = Board::standard();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();
        board.apply_move(Direction::East, PlayerId::Player2).unwrap();
        board.apply_move(Direction::South, PlayerId::Player1).unwrap();
        board.apply_move(Direction::SouthWest, PlayerId::Player1).unwrap();
        board.apply_move(Direction::East, PlayerId::Player2).unwrap();
        let junction = board.point_at(5, 6).unwrap();
        let side = board.point_at(5, 5).unwrap();
        assert_eq!(board.current(), side);

        // Re-enter the junction along a fresh edge and take it back.
        board.make_move(Direction::North, PlayerId::Player1);
        assert_eq!(board.current(), junction);
        board.undo_move(Direction::North);

        assert_eq!(board.current(), side);
        assert!(board.point(junction).is_visited());
        assert!(board.edge_from(side, Direction::North).is_some_and(|e| !e.is_drawn()));
    }

    #[test]
    #[should_panic(expected = "never drawn")]
    fn test_undo_of_undrawn_edge_panics() {
        let mut board = Board::standard();
        board.undo_move(Direction::North);
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut board = Board::standard();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();

        board.reset();
        let fresh = Board::standard();

        assert_eq!(board.render(), fresh.render());
        assert_eq!(drawn_edges(&board), 0);
        assert!(board.path().is_empty());
        assert_eq!(board.current(), board.center());
        assert!(board.point(board.center()).is_visited());
    }

    #[test]
    fn test_start_next_round() {
        let mut board = Board::standard();
        board.apply_move(Direction::North, PlayerId::Player1).unwrap();
        board.start_next_round();

        assert_eq!(board.current(), board.center());
        assert_eq!(board.path().last(), Some(PathElement::SEPARATOR));
    }

    #[test]
    fn test_render() {
        let board = Board::new(5, 5).unwrap();
        assert_eq!(board.render(), "ngggn\nbbobb\nbo@ob\nbbobb\nngggn\n");
    }
}
