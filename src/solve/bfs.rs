/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Breadth-first search.
//!
//! The uninformed baseline: a FIFO frontier expanded in insertion
//! order, returning a path with the minimum number of steps. Every
//! other optimal solver is checked against its path length in the test
//! suite.

use super::{open_neighbors, reconstruct, Solution, NO_PARENT};
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Grid};
use dsi_progress_logger::ProgressLog;
use std::collections::VecDeque;

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
    pl.start("Solving (BFS)...");

    let mut parents = vec![NO_PARENT; grid.num_cells()];
    let mut queue = VecDeque::new();
    parents[0] = 0;
    queue.push_back(0u32);
    let mut visited = 0;

    while let Some(idx) = queue.pop_front() {
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

        for (nx, ny, _) in open_neighbors(grid, x, y) {
            let next = (ny * width + nx) as u32;
            if parents[next as usize] == NO_PARENT {
                parents[next as usize] = idx;
                queue.push_back(next);
            }
        }
    }

    pl.done();
    Ok(Solution::not_found(visited))
}
