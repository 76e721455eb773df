/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The recursive backtracker, iteratively.
//!
//! A depth-first carve with an explicit stack: at each step the top
//! cell picks one of its unvisited neighbors uniformly at random,
//! carves into it and pushes it; a cell with no unvisited neighbors is
//! popped. The random draw is taken *after* filtering, never by
//! shuffling a fixed cardinal order, so every survivor is equally
//! likely. Produces the classic long-corridor, low-branching texture.

use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::MazeRng;
use dsi_progress_logger::ProgressLog;
use rand::seq::IndexedRandom;

/// Carves a perfect maze into `grid`.
pub fn generate<S: EventSink>(
    grid: &mut Grid,
    rng: &mut MazeRng,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<(), Cancelled> {
    grid.fill_walls();

    pl.item_name("cell");
    pl.expected_updates(Some(grid.num_cells()));
    pl.start("Carving (recursive backtracker)...");

    let (sx, sy) = grid.start();
    grid.set_flag(sx, sy, CellFlags::VISITED_GEN, true);
    sink.on_event(Event::carve_cell(sx, sy));
    pl.light_update();

    let mut stack = vec![(sx, sy)];
    let mut candidates = [(0, 0, Dir::North); 4];

    while let Some(&(x, y)) = stack.last() {
        token.check()?;

        let mut found = 0;
        for (nx, ny, dir) in grid.neighbors(x, y) {
            if !grid.get_flag(nx, ny, CellFlags::VISITED_GEN) {
                candidates[found] = (nx, ny, dir);
                found += 1;
            }
        }

        if found == 0 {
            stack.pop();
            continue;
        }

        let &(nx, ny, dir) = candidates[..found]
            .choose(rng)
            .expect("the candidate set is non-empty");
        grid.carve(x, y, dir).expect("the neighbor is in bounds");
        grid.set_flag(nx, ny, CellFlags::VISITED_GEN, true);
        sink.on_event(Event::connect(x, y, dir));
        sink.on_event(Event::carve_cell(nx, ny));
        stack.push((nx, ny));
        pl.light_update();
    }

    pl.done();
    Ok(())
}
