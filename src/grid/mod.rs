/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The bit-packed cell grid.
//!
//! Every cell of a maze is a single byte: four wall bits, one bit each
//! for generator and solver visits, one for the solution path, and one
//! scratch bit for algorithm-specific marks (see [`CellFlags`]). A
//! [`Grid`] is a contiguous row-major buffer of such bytes, so a
//! 20,000 × 20,000 maze occupies 400 MB and all wall and flag queries
//! are constant-time masked loads.
//!
//! Walls are symmetric: the edge between two adjacent cells is
//! represented by one bit in each of them, and [`Grid::set_wall`] and
//! [`Grid::carve`] always update both sides. Everything else is
//! per-cell state with no symmetry rule.

mod cell;
pub use cell::*;

#[allow(clippy::module_inception)]
mod grid;
pub use grid::*;

use thiserror::Error;

/// The largest number of cells a [`Grid`] may hold (4 × 10⁸).
pub const MAX_CELLS: usize = 400_000_000;

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The requested grid dimensions are unusable: either side is smaller
/// than 2, or the cell count exceeds [`MAX_CELLS`].
#[error("invalid grid dimensions {width}x{height} (each side must be at least 2 and the product at most 4e8)")]
pub struct InvalidDimensions {
    /// The requested width.
    pub width: usize,
    /// The requested height.
    pub height: usize,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// A coordinate or a neighbor in a given direction lies outside the grid.
#[error("coordinate ({x}, {y}) is out of bounds")]
pub struct OutOfBounds {
    /// The offending x coordinate.
    pub x: usize,
    /// The offending y coordinate.
    pub y: usize,
}

/// Read-only access to per-cell state, for renderers and other
/// consumers that must not mutate the grid.
///
/// Implementations are thread-safe as long as no generator or solver is
/// concurrently running on the underlying storage; consumers that need
/// to overlap with a producer should take a [`snapshot`](Grid::snapshot)
/// or follow the [event stream](crate::events) instead.
pub trait GridReader {
    /// Returns `(width, height)`.
    fn dimensions(&self) -> (usize, usize);

    /// Returns the raw state byte of the cell at `(x, y)`.
    fn get_cell(&self, x: usize, y: usize) -> u8;
}
