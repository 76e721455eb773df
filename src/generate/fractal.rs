/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The fractal (block-parallel) generator.
//!
//! Divide and conquer in three steps: a recursive-backtracker maze is
//! carved on the *macro lattice* whose cells are `block_side`-sided
//! blocks of the real grid; then an independent backtracker runs
//! *inside* every block in parallel, treating the block boundary as a
//! wall; finally each carved macro-edge is stitched by opening exactly
//! one passage between the two blocks it joins, at the midpoint of
//! their shared edge.
//!
//! When `block_side` does not divide the grid, the lattice is the ceil
//! quotient and the blocks in the last column and row are simply
//! smaller. The per-block pass is embarrassingly parallel: no two
//! workers ever touch the same cell, which is what makes the
//! [`SyncSlice`] writes sound, and every worker derives its own
//! random stream from the block index, so the final grid does not
//! depend on scheduling. The visible seam along block boundaries is an
//! accepted aesthetic of the scheme.

use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventKind, EventSink, NullSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::{worker_rng, MazeRng};
use dsi_progress_logger::{no_logging, ProgressLog};
use rayon::prelude::*;
use sync_cell_slice::{SyncCell, SyncSlice};

use super::dfs;

/// Default side of a block.
pub const DEFAULT_BLOCK_SIDE: usize = 32;

/// Carves a perfect-per-block, macro-connected maze into `grid`.
pub fn generate<S: EventSink>(
    grid: &mut Grid,
    seed: u64,
    block_side: usize,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<(), Cancelled> {
    debug_assert!(block_side >= 2);
    grid.fill_walls();

    let (w, h) = (grid.width(), grid.height());
    let wb = w.div_ceil(block_side);
    let hb = h.div_ceil(block_side);

    pl.item_name("cell");
    pl.expected_updates(Some(grid.num_cells()));
    pl.start(format!("Carving (fractal, {}x{} blocks)...", wb, hb));

    // Step 1: a perfect maze over the block lattice.
    let mut macro_grid =
        Grid::lattice(wb, hb).expect("the macro lattice is smaller than the grid");
    dfs::generate(
        &mut macro_grid,
        &mut worker_rng(seed, 0),
        &mut NullSink,
        token,
        no_logging![],
    )?;

    // Step 2: independent per-block mazes, in parallel. Each worker
    // writes only to the cells of its own block.
    let sync = grid.bytes_mut().as_sync_slice();
    let block_events: Vec<Vec<Event>> = (0..wb * hb)
        .into_par_iter()
        .map(|block| {
            if token.is_cancelled() {
                return Vec::new();
            }
            let x0 = (block % wb) * block_side;
            let y0 = (block / wb) * block_side;
            let x1 = (x0 + block_side).min(w);
            let y1 = (y0 + block_side).min(h);
            carve_block(
                sync,
                w,
                (x0, y0, x1, y1),
                &mut worker_rng(seed, 1 + block as u64),
                token,
            )
        })
        .collect();
    token.check()?;

    // Flush the per-block recordings in block order; the event
    // interleaving of a parallel generator is not reproducible anyway,
    // but this keeps the stream well-formed.
    for events in block_events {
        pl.update_with_count(
            events
                .iter()
                .filter(|e| e.kind == EventKind::CarveCell)
                .count(),
        );
        for event in events {
            sink.on_event(event);
        }
    }

    // Step 3: stitch every carved macro-edge with one passage at the
    // floor midpoint of the shared block edge. Stitches only clear the
    // two facing boundary bits, so they cannot conflict with the
    // block-internal carving above.
    for by in 0..hb {
        token.check()?;
        for bx in 0..wb {
            if bx + 1 < wb && !macro_grid.has_wall(bx, by, Dir::East) {
                let x = (bx + 1) * block_side - 1;
                let y0 = by * block_side;
                let y1 = ((by + 1) * block_side).min(h);
                let y = y0 + (y1 - y0 - 1) / 2;
                grid.carve(x, y, Dir::East).expect("stitch cells are interior");
                sink.on_event(Event::connect(x, y, Dir::East));
            }
            if by + 1 < hb && !macro_grid.has_wall(bx, by, Dir::South) {
                let y = (by + 1) * block_side - 1;
                let x0 = bx * block_side;
                let x1 = ((bx + 1) * block_side).min(w);
                let x = x0 + (x1 - x0 - 1) / 2;
                grid.carve(x, y, Dir::South).expect("stitch cells are interior");
                sink.on_event(Event::connect(x, y, Dir::South));
            }
        }
    }

    pl.done();
    Ok(())
}

#[inline(always)]
fn cell_or(cells: &[SyncCell<u8>], idx: usize, bits: u8) {
    // SAFETY: every cell of a block is accessed by the single worker
    // that owns the block.
    unsafe { cells[idx].set(cells[idx].get() | bits) }
}

#[inline(always)]
fn cell_and(cells: &[SyncCell<u8>], idx: usize, mask: u8) {
    // SAFETY: as in cell_or.
    unsafe { cells[idx].set(cells[idx].get() & mask) }
}

#[inline(always)]
fn cell_get(cells: &[SyncCell<u8>], idx: usize) -> u8 {
    // SAFETY: as in cell_or.
    unsafe { cells[idx].get() }
}

/// Runs a recursive backtracker inside one block, treating the block
/// boundary as a wall, and returns the carve events in emission order.
fn carve_block(
    cells: &[SyncCell<u8>],
    width: usize,
    (x0, y0, x1, y1): (usize, usize, usize, usize),
    rng: &mut MazeRng,
    token: &CancelToken,
) -> Vec<Event> {
    use rand::seq::IndexedRandom;

    let visited = CellFlags::VISITED_GEN.bits();
    let mut events = Vec::with_capacity((x1 - x0) * (y1 - y0) * 2);
    let mut stack = vec![(x0, y0)];
    let mut candidates = [(0, 0, Dir::North); 4];

    cell_or(cells, y0 * width + x0, visited);
    events.push(Event::carve_cell(x0, y0));

    while let Some(&(x, y)) = stack.last() {
        if token.is_cancelled() {
            // Partial work is fine: the caller bails out right after
            // the join.
            break;
        }

        let mut found = 0;
        for dir in Dir::ALL {
            let (dx, dy) = dir.delta();
            let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy))
            else {
                continue;
            };
            if nx < x0 || nx >= x1 || ny < y0 || ny >= y1 {
                continue;
            }
            if cell_get(cells, ny * width + nx) & visited == 0 {
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
        cell_and(cells, y * width + x, !dir.wall().bits());
        cell_and(cells, ny * width + nx, !dir.opposite().wall().bits());
        cell_or(cells, ny * width + nx, visited);
        events.push(Event::connect(x, y, dir));
        events.push(Event::carve_cell(nx, ny));
        stack.push((nx, ny));
    }

    events
}
