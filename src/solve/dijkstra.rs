/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Uniform-cost search.
//!
//! Dijkstra over unit edge costs, kept as a separate solver so that
//! non-uniform weights have a place to land. The priority queue is a
//! quaternary heap keyed on `(cost, seq)`: the monotone sequence number
//! resolves equal costs in insertion order, which pins down the
//! expansion order exactly.

use super::{open_neighbors, reconstruct, Solution, NO_PARENT};
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
    let exit = grid.exit().1 * width + grid.exit().0;

    pl.item_name("cell");
    pl.expected_updates(Some(grid.num_cells()));
    pl.start("Solving (Dijkstra)...");

    let mut parents = vec![NO_PARENT; grid.num_cells()];
    let mut dist = vec![u64::MAX; grid.num_cells()];
    let mut heap = QuaternaryHeap::new();
    let mut seq = 0u64;

    parents[0] = 0;
    dist[0] = 0;
    heap.push(Reverse((0u64, seq, 0u32)));
    let mut visited = 0;

    while let Some(Reverse((cost, _, idx))) = heap.pop() {
        token.check()?;
        if cost > dist[idx as usize] {
            // A stale queue entry, superseded by a cheaper one.
            continue;
        }
        let (x, y) = (idx as usize % width, idx as usize / width);
        grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
        sink.on_event(Event::visit(x, y, cost as usize));
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
            let next = ny * width + nx;
            let next_cost = cost + 1;
            if next_cost < dist[next] {
                dist[next] = next_cost;
                parents[next] = idx;
                seq += 1;
                heap.push(Reverse((next_cost, seq, next as u32)));
            }
        }
    }

    pl.done();
    Ok(Solution::not_found(visited))
}
