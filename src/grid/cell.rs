/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use bitflags::bitflags;

bitflags! {
    /// The eight independently addressable flags of a cell byte.
    ///
    /// The four wall bits obey the symmetry invariant maintained by
    /// [`Grid::set_wall`](super::Grid::set_wall); the remaining bits are
    /// plain per-cell state.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct CellFlags: u8 {
        /// The north edge is a wall.
        const WALL_N = 1 << 0;
        /// The south edge is a wall.
        const WALL_S = 1 << 1;
        /// The east edge is a wall.
        const WALL_E = 1 << 2;
        /// The west edge is a wall.
        const WALL_W = 1 << 3;
        /// A generator has carved into this cell.
        const VISITED_GEN = 1 << 4;
        /// A solver has expanded this cell.
        const VISITED_SOLVE = 1 << 5;
        /// The cell lies on the reported solution path.
        const ON_PATH = 1 << 6;
        /// Algorithm-specific scratch (dead-end purge, spawn marks, …).
        const MARK_AUX = 1 << 7;

        /// All four wall bits.
        const WALLS = Self::WALL_N.bits()
            | Self::WALL_S.bits()
            | Self::WALL_E.bits()
            | Self::WALL_W.bits();
        /// The bits owned by solvers, cleared by
        /// [`Grid::reset_solver_flags`](super::Grid::reset_solver_flags).
        const SOLVER = Self::VISITED_SOLVE.bits()
            | Self::ON_PATH.bits()
            | Self::MARK_AUX.bits();
    }
}

/// One of the four cardinal directions.
///
/// This is a closed set: the opposite direction is a fixed permutation,
/// and [`Dir::ALL`] fixes the canonical examination order (N, E, S, W)
/// used by every neighbor scan so that output is deterministic at a
/// given seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dir {
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Dir {
    /// The canonical examination order.
    pub const ALL: [Dir; 4] = [Dir::North, Dir::East, Dir::South, Dir::West];

    /// Returns the opposing direction.
    #[inline(always)]
    pub fn opposite(self) -> Dir {
        match self {
            Dir::North => Dir::South,
            Dir::East => Dir::West,
            Dir::South => Dir::North,
            Dir::West => Dir::East,
        }
    }

    /// Returns the wall flag guarding this direction.
    #[inline(always)]
    pub fn wall(self) -> CellFlags {
        match self {
            Dir::North => CellFlags::WALL_N,
            Dir::South => CellFlags::WALL_S,
            Dir::East => CellFlags::WALL_E,
            Dir::West => CellFlags::WALL_W,
        }
    }

    /// Returns the coordinate delta of one step in this direction.
    ///
    /// North is toward smaller `y`, west toward smaller `x`.
    #[inline(always)]
    pub fn delta(self) -> (isize, isize) {
        match self {
            Dir::North => (0, -1),
            Dir::East => (1, 0),
            Dir::South => (0, 1),
            Dir::West => (-1, 0),
        }
    }

    /// The direction one quarter turn to the left.
    #[inline(always)]
    pub fn left(self) -> Dir {
        match self {
            Dir::North => Dir::West,
            Dir::West => Dir::South,
            Dir::South => Dir::East,
            Dir::East => Dir::North,
        }
    }

    /// The direction one quarter turn to the right.
    #[inline(always)]
    pub fn right(self) -> Dir {
        self.left().opposite()
    }

    /// The inverse of `dir as u8`, for decoding event records.
    #[inline]
    pub fn from_index(index: u8) -> Option<Dir> {
        match index {
            0 => Some(Dir::North),
            1 => Some(Dir::East),
            2 => Some(Dir::South),
            3 => Some(Dir::West),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opposite_is_involution() {
        for dir in Dir::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.wall() & dir.opposite().wall(), CellFlags::empty());
        }
    }

    #[test]
    fn test_turns() {
        for dir in Dir::ALL {
            assert_eq!(dir.left().right(), dir);
            assert_eq!(dir.left().left(), dir.opposite());
        }
    }

    #[test]
    fn test_wall_bits_match_layout() {
        assert_eq!(CellFlags::WALL_N.bits(), 0b0001);
        assert_eq!(CellFlags::WALL_S.bits(), 0b0010);
        assert_eq!(CellFlags::WALL_E.bits(), 0b0100);
        assert_eq!(CellFlags::WALL_W.bits(), 0b1000);
        assert_eq!(CellFlags::WALLS.bits(), 0b1111);
    }
}
