/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Complexity metrics.
//!
//! One scan of the grid plus one breadth-first search: dead-end count,
//! mean branching factor, open-edge count, and the shortest-path
//! length between the canonical endpoints. The entrance and the exit
//! are terminal cells and never counted as dead ends, even with three
//! walls.

use crate::cancel::{CancelToken, Cancelled};
use crate::grid::{CellFlags, Dir, Grid};
use std::collections::VecDeque;

/// Structural metrics of a generated maze.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MazeStats {
    /// Non-terminal cells with exactly three walls.
    pub dead_ends: usize,
    /// Mean of `open edges − 1` over the non-dead-end cells.
    pub branching_factor: f64,
    /// Carved edges, each counted once.
    pub open_edges: usize,
    /// Steps of a shortest entrance-to-exit path, or `None` when the
    /// exit is unreachable.
    pub path_length: Option<usize>,
}

/// Computes the metrics of `grid`.
///
/// Read-only: the search keeps its distances on the side instead of
/// touching the solver flags.
pub fn analyze(grid: &Grid, token: &CancelToken) -> Result<MazeStats, Cancelled> {
    let (width, height) = (grid.width(), grid.height());
    let mut dead_ends = 0;
    let mut open_edges = 0;
    let mut branching_sum = 0usize;
    let mut branching_cells = 0usize;

    for y in 0..height {
        token.check()?;
        for x in 0..width {
            let flags = grid.flags(x, y);
            let walls = (flags & CellFlags::WALLS).bits().count_ones() as usize;
            let open = 4 - walls;
            if x + 1 < width && !grid.has_wall(x, y, Dir::East) {
                open_edges += 1;
            }
            if y + 1 < height && !grid.has_wall(x, y, Dir::South) {
                open_edges += 1;
            }
            if walls == 3 && (x, y) != grid.start() && (x, y) != grid.exit() {
                dead_ends += 1;
            } else {
                branching_sum += open.saturating_sub(1);
                branching_cells += 1;
            }
        }
    }

    Ok(MazeStats {
        dead_ends,
        branching_factor: branching_sum as f64 / branching_cells as f64,
        open_edges,
        path_length: shortest_path_len(grid, token)?,
    })
}

/// Breadth-first distance from the entrance to the exit, without
/// touching the grid's solver flags.
fn shortest_path_len(grid: &Grid, token: &CancelToken) -> Result<Option<usize>, Cancelled> {
    let width = grid.width();
    let exit = grid.exit().1 * width + grid.exit().0;
    let mut dist = vec![u32::MAX; grid.num_cells()];
    let mut queue = VecDeque::new();
    dist[0] = 0;
    queue.push_back(0u32);

    while let Some(idx) = queue.pop_front() {
        token.check()?;
        let idx = idx as usize;
        if idx == exit {
            return Ok(Some(dist[idx] as usize));
        }
        let (x, y) = (idx % width, idx / width);
        for (nx, ny, dir) in grid.neighbors(x, y) {
            if grid.has_wall(x, y, dir) {
                continue;
            }
            let next = ny * width + nx;
            if dist[next] == u32::MAX {
                dist[next] = dist[idx] + 1;
                queue.push_back(next as u32);
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corridor_stats() {
        // A single 4-cell corridor along the top row of a 4x2 grid.
        let mut grid = Grid::new(4, 2).unwrap();
        grid.fill_walls();
        for x in 0..3 {
            grid.carve(x, 0, Dir::East).unwrap();
        }
        grid.carve(3, 0, Dir::South).unwrap();
        let stats = analyze(&grid, &CancelToken::new()).unwrap();
        assert_eq!(stats.open_edges, 4);
        // The only three-walled cells are the terminal ones, which are
        // exempt.
        assert_eq!(stats.dead_ends, 0);
        assert_eq!(stats.path_length, Some(4));
        // Three corridor cells contribute one each; the walled-in
        // bottom cells and the endpoints contribute zero.
        assert!((stats.branching_factor - 3.0 / 8.0).abs() < 1e-9);
    }
}
