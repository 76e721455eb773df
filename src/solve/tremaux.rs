/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Trémaux's algorithm.
//!
//! A robot that physically walks from the entrance, leaving marks on
//! the corridors it traverses: each traversal adds one mark on both
//! ends, up to two. At every cell the robot (1) prefers an unmarked
//! corridor, drawn uniformly when there are several; (2) failing that,
//! turns around if the corridor it came through carries a single mark;
//! (3) failing that, takes a once-marked corridor; a cell whose every
//! corridor is twice-marked is a dead position and the search has
//! failed. Corridors marked twice are never entered again, which
//! bounds the walk by two traversals per edge; a hard cap of
//! `4 · cells` steps bounds it regardless.
//!
//! Marks need two bits per cell-side, so the whole marking state is
//! one extra byte per cell. The walk is recorded on a stack with loop
//! erasure (MARK_AUX doubles as the on-stack bit), so the reported
//! path is simple even though the robot may wander; on a perfect maze
//! the algorithm always succeeds, and a `found` result with an empty
//! path is a bug, not a benchmark artifact.

use super::Solution;
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::MazeRng;
use dsi_progress_logger::ProgressLog;
use rand::seq::IndexedRandom;

/// Per-cell corridor marks, two bits per direction.
struct Marks {
    bits: Vec<u8>,
    width: usize,
}

impl Marks {
    fn new(num_cells: usize, width: usize) -> Marks {
        Marks {
            bits: vec![0; num_cells],
            width,
        }
    }

    #[inline(always)]
    fn count(&self, x: usize, y: usize, dir: Dir) -> u8 {
        (self.bits[y * self.width + x] >> ((dir as u8) * 2)) & 0b11
    }

    #[inline(always)]
    fn add(&mut self, x: usize, y: usize, dir: Dir) {
        let count = self.count(x, y, dir);
        if count < 2 {
            self.bits[y * self.width + x] += 1 << ((dir as u8) * 2);
        }
    }
}

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    rng: &mut MazeRng,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let max_steps = 4 * grid.num_cells();
    let exit = grid.exit();

    pl.item_name("step");
    pl.expected_updates(Some(max_steps));
    pl.start("Solving (Trémaux)...");

    let mut marks = Marks::new(grid.num_cells(), grid.width());
    let (mut x, mut y) = grid.start();
    let mut came_from: Option<Dir> = None;
    let mut visited = 1;
    grid.set_flag(x, y, CellFlags::VISITED_SOLVE | CellFlags::MARK_AUX, true);
    sink.on_event(Event::visit(x, y, 0));
    let mut path = vec![(x, y)];

    let mut candidates = [Dir::North; 4];
    for _ in 0..max_steps {
        if (x, y) == exit {
            pl.done();
            return Ok(Solution {
                found: true,
                path,
                visited,
            });
        }
        token.check()?;

        // Rule 1: an unmarked corridor, drawn uniformly.
        let mut unmarked = 0;
        for (_, _, dir) in super::open_neighbors(grid, x, y) {
            if marks.count(x, y, dir) == 0 {
                candidates[unmarked] = dir;
                unmarked += 1;
            }
        }
        let step = if unmarked > 0 {
            *candidates[..unmarked]
                .choose(rng)
                .expect("the candidate set is non-empty")
        } else if let Some(back) = came_from.filter(|&back| marks.count(x, y, back) == 1) {
            // Rule 2: turn around through the singly marked entry.
            back
        } else {
            // Rule 3: any once-marked corridor.
            let mut once = 0;
            for (_, _, dir) in super::open_neighbors(grid, x, y) {
                if marks.count(x, y, dir) == 1 {
                    candidates[once] = dir;
                    once += 1;
                }
            }
            match candidates[..once].choose(rng) {
                Some(&dir) => dir,
                // Everything around is twice-marked: exhausted.
                None => break,
            }
        };

        marks.add(x, y, step);
        let (nx, ny) = grid
            .neighbor(x, y, step)
            .expect("open corridors are interior");
        marks.add(nx, ny, step.opposite());
        (x, y) = (nx, ny);
        came_from = Some(step.opposite());
        pl.light_update();

        if !grid.get_flag(x, y, CellFlags::VISITED_SOLVE) {
            grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
            sink.on_event(Event::visit(x, y, 0));
            visited += 1;
        }

        // Loop erasure: returning onto the recorded walk pops the
        // detour, keeping the path simple.
        if grid.get_flag(x, y, CellFlags::MARK_AUX) {
            while let Some(&(px, py)) = path.last() {
                if (px, py) == (x, y) {
                    break;
                }
                grid.set_flag(px, py, CellFlags::MARK_AUX, false);
                path.pop();
            }
        } else {
            grid.set_flag(x, y, CellFlags::MARK_AUX, true);
            path.push((x, y));
        }
    }

    pl.done();
    Ok(Solution::not_found(visited))
}
