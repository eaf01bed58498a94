//! Bit-packed search tree record.

use crate::board::Direction;

/// Estimation of a turn that ends in the opponent's goal.
pub const GOAL_SCORED: i16 = 10_000;
/// Estimation of a turn that ends in the mover's own goal.
pub const GOAL_LOST: i16 = -10_000;
/// Estimation of a turn that ends on a point with no way out.
pub const GAME_LOST: i16 = i16::MIN + 1;

const PARENT_MASK: u64 = 0x0000_0000_FFFF_FFFF;
const ESTIMATION_MASK: u64 = 0x0000_FFFF_0000_0000;
const DEPTH_MASK: u64 = 0x00FF_0000_0000_0000;
const DIRECTION_MASK: u64 = 0x0700_0000_0000_0000;
const COMPLETE_BIT: u64 = 0x0800_0000_0000_0000;
const LEAF_BIT: u64 = 0x1000_0000_0000_0000;

const ESTIMATION_SHIFT: u32 = 32;
const DEPTH_SHIFT: u32 = 48;
const DIRECTION_SHIFT: u32 = 56;

/// One candidate move of the search tree, packed into 64 bits.
///
/// Layout:
/// ```text
/// bits [0..31]  parent index (i32, -1 for a root move)
/// bits [32..47] estimation (i16)
/// bits [48..55] ply depth (u8)
/// bits [56..58] direction
/// bit  59       analysis complete (children generated)
/// bit  60       leaf move (the turn ends here)
/// bits [61..63] reserved
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct TreeElement(u64);

impl TreeElement {
    /// Pack a record. Field ranges are checked in debug builds only.
    #[must_use]
    pub fn new(
        parent: Option<usize>,
        estimation: i16,
        depth: u8,
        direction: Direction,
        analysis_complete: bool,
        leaf_move: bool,
    ) -> Self {
        let parent = match parent {
            Some(index) => {
                debug_assert!(index <= i32::MAX as usize, "parent index {index} does not fit 31 bits");
                index as i32
            }
            None => -1,
        };
        debug_assert!(direction.index() < 8);

        let mut raw = u64::from(parent as u32)
            | (u64::from(estimation as u16) << ESTIMATION_SHIFT)
            | (u64::from(depth) << DEPTH_SHIFT)
            | (u64::from(direction.index()) << DIRECTION_SHIFT);
        if analysis_complete {
            raw |= COMPLETE_BIT;
        }
        if leaf_move {
            raw |= LEAF_BIT;
        }
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    #[inline]
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }

    /// Signed parent index, negative for a root move.
    #[inline]
    #[must_use]
    pub const fn parent_index(self) -> i32 {
        (self.0 & PARENT_MASK) as u32 as i32
    }

    #[inline]
    #[must_use]
    pub const fn parent(self) -> Option<usize> {
        let index = self.parent_index();
        if index < 0 {
            None
        } else {
            Some(index as usize)
        }
    }

    #[inline]
    #[must_use]
    pub const fn estimation(self) -> i16 {
        ((self.0 & ESTIMATION_MASK) >> ESTIMATION_SHIFT) as u16 as i16
    }

    #[inline]
    #[must_use]
    pub const fn depth(self) -> u8 {
        ((self.0 & DEPTH_MASK) >> DEPTH_SHIFT) as u8
    }

    #[inline]
    #[must_use]
    pub const fn direction(self) -> Direction {
        Direction::from_bits(((self.0 & DIRECTION_MASK) >> DIRECTION_SHIFT) as u8)
    }

    #[inline]
    #[must_use]
    pub const fn is_analysis_complete(self) -> bool {
        self.0 & COMPLETE_BIT != 0
    }

    #[inline]
    #[must_use]
    pub const fn is_leaf_move(self) -> bool {
        self.0 & LEAF_BIT != 0
    }

    /// Same record with the analysis-complete bit set to `complete`.
    #[inline]
    #[must_use]
    pub const fn with_analysis_complete(self, complete: bool) -> Self {
        if complete {
            Self(self.0 | COMPLETE_BIT)
        } else {
            Self(self.0 & !COMPLETE_BIT)
        }
    }

    /// A completed turn the opponent can still answer.
    #[must_use]
    pub fn allows_reply_analysis(self) -> bool {
        self.is_leaf_move() && !matches!(self.estimation(), GAME_LOST | GOAL_LOST | GOAL_SCORED)
    }
}

impl std::fmt::Debug for TreeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeElement")
            .field("parent", &self.parent_index())
            .field("estimation", &self.estimation())
            .field("depth", &self.depth())
            .field("direction", &self.direction())
            .field("complete", &self.is_analysis_complete())
            .field("leaf", &self.is_leaf_move())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_root_move() {
        let e = TreeElement::new(None, -3, 1, Direction::SouthWest, false, true);
        assert_eq!(e.parent_index(), -1);
        assert_eq!(e.parent(), None);
        assert_eq!(e.estimation(), -3);
        assert_eq!(e.depth(), 1);
        assert_eq!(e.direction(), Direction::SouthWest);
        assert!(!e.is_analysis_complete());
        assert!(e.is_leaf_move());
    }

    #[test]
    fn test_reserved_bits_unused() {
        let e = TreeElement::new(Some(i32::MAX as usize), i16::MIN, u8::MAX, Direction::NorthWest, true, true);
        assert_eq!(e.raw() & 0xE000_0000_0000_0000, 0);
    }

    #[test]
    fn test_reply_analysis_filter() {
        let open = TreeElement::new(Some(0), 2, 1, Direction::North, true, true);
        assert!(open.allows_reply_analysis());

        for terminal in [GAME_LOST, GOAL_LOST, GOAL_SCORED] {
            let e = TreeElement::new(Some(0), terminal, 1, Direction::North, true, true);
            assert!(!e.allows_reply_analysis());
        }

        let mid_turn = TreeElement::new(Some(0), 2, 1, Direction::North, false, false);
        assert!(!mid_turn.allows_reply_analysis());
    }

    fn any_direction() -> impl Strategy<Value = Direction> {
        (0u8..8).prop_map(Direction::from_bits)
    }

    proptest! {
        #[test]
        fn prop_fields_survive_packing(
            parent in prop::option::of(0usize..=i32::MAX as usize),
            estimation in any::<i16>(),
            depth in any::<u8>(),
            direction in any_direction(),
            complete in any::<bool>(),
            leaf in any::<bool>(),
        ) {
            let e = TreeElement::new(parent, estimation, depth, direction, complete, leaf);
            prop_assert_eq!(e.parent(), parent);
            prop_assert_eq!(e.estimation(), estimation);
            prop_assert_eq!(e.depth(), depth);
            prop_assert_eq!(e.direction(), direction);
            prop_assert_eq!(e.is_analysis_complete(), complete);
            prop_assert_eq!(e.is_leaf_move(), leaf);
        }

        #[test]
        fn prop_complete_toggle_touches_one_bit(
            parent in prop::option::of(0usize..1_000_000),
            estimation in any::<i16>(),
            depth in any::<u8>(),
            direction in any_direction(),
            complete in any::<bool>(),
            leaf in any::<bool>(),
        ) {
            let e = TreeElement::new(parent, estimation, depth, direction, complete, leaf);
            let toggled = e.with_analysis_complete(!complete);
            prop_assert_eq!(toggled.is_analysis_complete(), !complete);
            prop_assert_eq!(toggled.raw() ^ e.raw(), COMPLETE_BIT);
            prop_assert_eq!(toggled.with_analysis_complete(complete), e);
        }
    }
}
