/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Prim's algorithm.
//!
//! Grows the maze from the entrance by keeping a *frontier set* of
//! walls that separate a visited cell from an unvisited one. Each step
//! draws one frontier wall uniformly at random; if its far side is
//! still unvisited the wall is carved and the far cell's own frontier
//! walls join the set, otherwise the wall is discarded. Uniform draws
//! over the whole frontier produce the short, spiky branch texture
//! typical of Prim mazes.

use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Grid};
use crate::rng::MazeRng;
use dsi_progress_logger::ProgressLog;
use rand::Rng;

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
    pl.start("Carving (Prim)...");

    let (sx, sy) = grid.start();
    grid.set_flag(sx, sy, CellFlags::VISITED_GEN, true);
    sink.on_event(Event::carve_cell(sx, sy));
    pl.light_update();

    // Frontier walls as (visited cell, direction of the unvisited side).
    let mut frontier: Vec<_> = grid.neighbors(sx, sy).map(|(_, _, dir)| (sx, sy, dir)).collect();

    while !frontier.is_empty() {
        token.check()?;

        let drawn = rng.random_range(0..frontier.len());
        let (x, y, dir) = frontier.swap_remove(drawn);
        let (nx, ny) = grid.neighbor(x, y, dir).expect("frontier walls are interior");
        if grid.get_flag(nx, ny, CellFlags::VISITED_GEN) {
            // The far side was reached through another wall in the
            // meantime; the draw is discarded.
            continue;
        }

        grid.carve(x, y, dir).expect("the neighbor is in bounds");
        grid.set_flag(nx, ny, CellFlags::VISITED_GEN, true);
        sink.on_event(Event::connect(x, y, dir));
        sink.on_event(Event::carve_cell(nx, ny));
        pl.light_update();

        for (fx, fy, fdir) in grid.neighbors(nx, ny) {
            if !grid.get_flag(fx, fy, CellFlags::VISITED_GEN) {
                frontier.push((nx, ny, fdir));
            }
        }
    }

    pl.done();
    Ok(())
}
