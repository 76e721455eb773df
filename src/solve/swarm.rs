/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Swarm search: level-synchronous parallel BFS.
//!
//! The frontier of each distance level is split into chunks expanded by
//! rayon workers; a worker claims a discovered cell with a `fetch_or`
//! of VISITED_SOLVE on the atomic cell view, and the unique claimant
//! writes the parent entry. The per-worker sub-frontiers are merged
//! between levels, keeping the search level-synchronous, which is
//! what preserves optimality of the path *length*. Which parent claims
//! a cell first depends on scheduling, so the reported path (and the
//! visit interleaving) may differ between runs of equal length.

use super::{reconstruct, Solution, NO_PARENT};
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use dsi_progress_logger::ProgressLog;
use rayon::prelude::*;
use std::sync::atomic::Ordering;
use sync_cell_slice::SyncSlice;

/// Frontier cells per parallel job.
const CHUNK: usize = 1024;

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let (w, h) = (grid.width(), grid.height());
    let num_cells = w * h;
    let exit = num_cells - 1;

    pl.item_name("cell");
    pl.expected_updates(Some(num_cells));
    pl.start("Solving (swarm)...");

    let mut parents: Vec<u32> = vec![NO_PARENT; num_cells];
    parents[0] = 0;
    let mut visited = 1;
    let mut found = false;

    {
        let cells = grid.atomic_cells();
        let parents_sync = parents.as_sync_slice();
        let claimed = CellFlags::VISITED_SOLVE.bits();

        cells[0].fetch_or(claimed, Ordering::Relaxed);
        sink.on_event(Event::visit(0, 0, 0));
        pl.light_update();

        let mut frontier: Vec<u32> = vec![0];
        let mut distance = 0;
        while !frontier.is_empty() && !found {
            token.check()?;
            distance += 1;

            let levels: Vec<Vec<u32>> = frontier
                .par_chunks(CHUNK)
                .map(|chunk| {
                    let mut local = Vec::new();
                    for &idx in chunk {
                        let idx = idx as usize;
                        let (x, y) = (idx % w, idx / w);
                        let flags = cells[idx].load(Ordering::Relaxed);
                        for dir in Dir::ALL {
                            if flags & dir.wall().bits() != 0 {
                                continue;
                            }
                            let (dx, dy) = dir.delta();
                            let (Some(nx), Some(ny)) =
                                (x.checked_add_signed(dx), y.checked_add_signed(dy))
                            else {
                                continue;
                            };
                            if nx >= w || ny >= h {
                                continue;
                            }
                            let next = ny * w + nx;
                            if cells[next].fetch_or(claimed, Ordering::Relaxed) & claimed == 0 {
                                // The claim makes this worker the only
                                // writer of the parent entry.
                                unsafe { parents_sync[next].set(idx as u32) };
                                local.push(next as u32);
                            }
                        }
                    }
                    local
                })
                .collect();

            let mut next_frontier = Vec::new();
            for level in levels {
                for &n in &level {
                    sink.on_event(Event::visit(n as usize % w, n as usize / w, distance));
                    if n as usize == exit {
                        found = true;
                    }
                }
                visited += level.len();
                pl.update_with_count(level.len());
                next_frontier.extend_from_slice(&level);
            }
            frontier = next_frontier;
        }
    }
    pl.done();

    if found {
        Ok(Solution {
            found: true,
            path: reconstruct(w, &parents, exit),
            visited,
        })
    } else {
        Ok(Solution::not_found(visited))
    }
}
