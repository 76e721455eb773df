/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Bidirectional A*.
//!
//! Two A* searches, one from the entrance toward the exit and one the
//! other way, alternating one expansion each. The meeting test runs at
//! expansion time: when a side is about to expand a cell the other side
//! has already closed, that cell is the meeting point and the path is
//! stitched from the two parent chains. The Manhattan heuristic is
//! admissible and consistent on a unit-cost grid, so the first such
//! meeting yields an optimal path.

use super::{manhattan, reconstruct, Solution, NO_PARENT};
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Grid};
use dary_heap::QuaternaryHeap;
use dsi_progress_logger::ProgressLog;
use std::cmp::Reverse;

struct Side {
    parents: Vec<u32>,
    g: Vec<u64>,
    closed: Vec<bool>,
    heap: QuaternaryHeap<Reverse<(u64, u64, u64, u32)>>,
    seq: u64,
    /// The cell this side is searching toward.
    target: (usize, usize),
}

impl Side {
    fn new(num_cells: usize, root: usize, target: (usize, usize), width: usize) -> Side {
        let mut side = Side {
            parents: vec![NO_PARENT; num_cells],
            g: vec![u64::MAX; num_cells],
            closed: vec![false; num_cells],
            heap: QuaternaryHeap::new(),
            seq: 0,
            target,
        };
        side.parents[root] = root as u32;
        side.g[root] = 0;
        let h = manhattan((root % width, root / width), target);
        side.heap.push(Reverse((h, h, 0, root as u32)));
        side
    }
}

/// The outcome of expanding one cell on one side.
enum Step {
    Exhausted,
    Expanded,
    Met(usize),
}

fn expand_one<S: EventSink>(
    grid: &mut Grid,
    side: &mut Side,
    other: &Side,
    sink: &mut S,
    visited: &mut usize,
    pl: &mut impl ProgressLog,
) -> Step {
    let width = grid.width();
    loop {
        let Some(Reverse((_, _, _, idx))) = side.heap.pop() else {
            return Step::Exhausted;
        };
        let idx_us = idx as usize;
        if side.closed[idx_us] {
            continue;
        }
        // Meeting test, at expansion time and not at insertion time;
        // this is what makes the first meeting optimal.
        if other.closed[idx_us] {
            return Step::Met(idx_us);
        }

        side.closed[idx_us] = true;
        let (x, y) = (idx_us % width, idx_us / width);
        grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
        sink.on_event(Event::visit(x, y, side.g[idx_us] as usize));
        *visited += 1;
        pl.light_update();

        for (nx, ny, dir) in grid.neighbors(x, y) {
            if grid.has_wall(x, y, dir) {
                continue;
            }
            let next = ny * width + nx;
            let tentative = side.g[idx_us] + 1;
            if tentative < side.g[next] {
                side.g[next] = tentative;
                side.parents[next] = idx;
                let h = manhattan((nx, ny), side.target);
                side.seq += 1;
                side.heap.push(Reverse((tentative + h, h, side.seq, next as u32)));
            }
        }
        return Step::Expanded;
    }
}

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let width = grid.width();
    let num_cells = grid.num_cells();
    let start = 0;
    let exit = grid.exit().1 * width + grid.exit().0;

    pl.item_name("cell");
    pl.expected_updates(Some(num_cells));
    pl.start("Solving (bidirectional A*)...");

    let mut forward = Side::new(num_cells, start, grid.exit(), width);
    let mut backward = Side::new(num_cells, exit, grid.start(), width);
    let mut visited = 0;

    let meeting = loop {
        token.check()?;
        match expand_one(grid, &mut forward, &backward, sink, &mut visited, pl) {
            Step::Exhausted => break None,
            Step::Met(meet) => break Some(meet),
            Step::Expanded => {}
        }
        match expand_one(grid, &mut backward, &forward, sink, &mut visited, pl) {
            Step::Exhausted => break None,
            Step::Met(meet) => break Some(meet),
            Step::Expanded => {}
        }
    };
    pl.done();

    let Some(meet) = meeting else {
        return Ok(Solution::not_found(visited));
    };

    // Stitch: the forward chain already runs entrance → meeting; the
    // backward chain is followed from the meeting out to the exit.
    let mut path = reconstruct(width, &forward.parents, meet);
    let mut cur = meet as u32;
    loop {
        let parent = backward.parents[cur as usize];
        debug_assert_ne!(parent, NO_PARENT);
        if parent == cur {
            break;
        }
        cur = parent;
        path.push((cur as usize % width, cur as usize / width));
    }

    Ok(Solution {
        found: true,
        path,
        visited,
    })
}
