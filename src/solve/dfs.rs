/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Depth-first search.
//!
//! An explicit LIFO stack expanded newest-first; among the open
//! neighbors of a cell, north is explored first, then east, south,
//! west (they are pushed in reverse). Returns the first path found,
//! which is in general not the shortest.

use super::{open_neighbors, reconstruct, Solution, NO_PARENT};
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Grid};
use dsi_progress_logger::ProgressLog;

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let width = grid.width();
    let exit = grid.exit().1 * width + grid.exit().0;

    pl.item_name("cell");
    pl.expected_updates(Some(grid.num_cells()));
    pl.start("Solving (DFS)...");

    let mut parents = vec![NO_PARENT; grid.num_cells()];
    let mut stack = vec![0u32];
    parents[0] = 0;
    let mut visited = 0;
    let mut frame = [0u32; 4];

    while let Some(idx) = stack.pop() {
        token.check()?;
        let (x, y) = (idx as usize % width, idx as usize / width);
        grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
        sink.on_event(Event::visit(x, y, 0));
        visited += 1;
        pl.light_update();

        if idx as usize == exit {
            pl.done();
            return Ok(Solution {
                found: true,
                path: reconstruct(width, &parents, exit),
                visited,
            });
        }

        // Collect in N, E, S, W order, push reversed so that the
        // northmost open neighbor is expanded first.
        let mut found = 0;
        for (nx, ny, _) in open_neighbors(grid, x, y) {
            let next = (ny * width + nx) as u32;
            if parents[next as usize] == NO_PARENT {
                parents[next as usize] = idx;
                frame[found] = next;
                found += 1;
            }
        }
        for &next in frame[..found].iter().rev() {
            stack.push(next);
        }
    }

    pl.done();
    Ok(Solution::not_found(visited))
}
