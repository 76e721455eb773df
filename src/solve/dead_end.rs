/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dead-end filling.
//!
//! A cellular automaton run on the whole grid: every sweep fills (sets
//! MARK_AUX on) each unfilled, non-terminal cell with at most one
//! unfilled open neighbor, and the iteration stops when a sweep fills
//! nothing. Filling eats every dead-end corridor back to its junction;
//! on a perfect maze the unfilled remainder is exactly the
//! entrance-to-exit path, which is then walked off. On a braided maze
//! the remainder also contains every cycle, so the final walk is a
//! depth-first search over unfilled cells and the result is not
//! guaranteed shortest.

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
    let exit_xy = grid.exit();
    let exit = exit_xy.1 * width + exit_xy.0;

    pl.item_name("sweep");
    pl.start("Solving (dead-end filling)...");

    // Phase 1: iterate sweeps until a fixed point.
    loop {
        token.check()?;
        let mut filled = 0;
        for y in 0..grid.height() {
            for x in 0..grid.width() {
                if (x, y) == grid.start() || (x, y) == exit_xy {
                    continue;
                }
                if grid.get_flag(x, y, CellFlags::MARK_AUX) {
                    continue;
                }
                let exits = open_neighbors(grid, x, y)
                    .filter(|&(nx, ny, _)| !grid.get_flag(nx, ny, CellFlags::MARK_AUX))
                    .count();
                if exits <= 1 {
                    grid.set_flag(x, y, CellFlags::MARK_AUX, true);
                    filled += 1;
                }
            }
        }
        pl.update();
        if filled == 0 {
            break;
        }
    }

    // Phase 2: walk the unfilled remainder from the entrance. On a
    // perfect maze the walk is forced; the depth-first stack handles
    // the cycles a braided maze leaves behind.
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

        if idx as usize == exit {
            pl.done();
            return Ok(Solution {
                found: true,
                path: reconstruct(width, &parents, exit),
                visited,
            });
        }

        let mut found = 0;
        for (nx, ny, _) in open_neighbors(grid, x, y) {
            if grid.get_flag(nx, ny, CellFlags::MARK_AUX)
                || grid.get_flag(nx, ny, CellFlags::VISITED_SOLVE)
            {
                continue;
            }
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
