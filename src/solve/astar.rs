/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! A* with the Manhattan heuristic.
//!
//! The heuristic is admissible and consistent on a uniform grid, so
//! the first expansion of the exit yields an optimal path. Queue keys
//! are `(f, h, seq)`: lowest `f` first, ties broken toward the lower
//! heuristic (deeper along the path) and then insertion order.

use super::{manhattan, open_neighbors, reconstruct, Solution, NO_PARENT};
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Grid};
use dary_heap::QuaternaryHeap;
use dsi_progress_logger::ProgressLog;
use std::cmp::Reverse;

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let width = grid.width();
    let exit_xy = grid.exit();
    let exit = exit_xy.1 * width + exit_xy.0;

    pl.item_name("cell");
    pl.expected_updates(Some(grid.num_cells()));
    pl.start("Solving (A*)...");

    let mut parents = vec![NO_PARENT; grid.num_cells()];
    let mut g = vec![u64::MAX; grid.num_cells()];
    let mut heap = QuaternaryHeap::new();
    let mut seq = 0u64;

    let h0 = manhattan(grid.start(), exit_xy);
    parents[0] = 0;
    g[0] = 0;
    heap.push(Reverse((h0, h0, seq, 0u32)));
    let mut visited = 0;

    while let Some(Reverse((_, _, _, idx))) = heap.pop() {
        token.check()?;
        let idx_us = idx as usize;
        let (x, y) = (idx_us % width, idx_us / width);
        if grid.get_flag(x, y, CellFlags::VISITED_SOLVE) {
            // A stale queue entry: the cell was already expanded
            // through a better or equal key.
            continue;
        }
        grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
        sink.on_event(Event::visit(x, y, g[idx_us] as usize));
        visited += 1;
        pl.light_update();

        if idx_us == exit {
            pl.done();
            return Ok(Solution {
                found: true,
                path: reconstruct(width, &parents, exit),
                visited,
            });
        }

        for (nx, ny, _) in open_neighbors(grid, x, y) {
            let next = ny * width + nx;
            let tentative = g[idx_us] + 1;
            if tentative < g[next] {
                g[next] = tentative;
                parents[next] = idx;
                let h = manhattan((nx, ny), exit_xy);
                seq += 1;
                heap.push(Reverse((tentative + h, h, seq, next as u32)));
            }
        }
    }

    pl.done();
    Ok(Solution::not_found(visited))
}
