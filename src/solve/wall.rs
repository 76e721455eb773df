/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Wall followers.
//!
//! The classic memoryless strategy: keep one hand on the wall and
//! walk. Each step tries, relative to the current heading, hand side
//! first, then straight, the far side, and finally back. On a perfect
//! maze this reaches the exit because all walls are connected to the
//! border; in a braided maze the follower can orbit an isolated cycle
//! forever, so the walk is capped at `4 · cells` steps and reported as
//! a failure beyond that.
//!
//! The reported path is the walk itself, which may be much longer than
//! the shortest path.

use super::Solution;
use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use dsi_progress_logger::ProgressLog;

/// Which hand stays on the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hand {
    Left,
    Right,
}

pub fn solve<S: EventSink>(
    grid: &mut Grid,
    hand: Hand,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution, Cancelled> {
    let max_steps = 4 * grid.num_cells();
    let exit = grid.exit();

    pl.item_name("step");
    pl.expected_updates(Some(max_steps));
    pl.start(format!(
        "Solving ({}-hand wall follower)...",
        match hand {
            Hand::Left => "left",
            Hand::Right => "right",
        }
    ));

    let (mut x, mut y) = grid.start();
    let mut visited = 1;
    grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
    sink.on_event(Event::visit(x, y, 0));

    // Face the first passable direction; a walled-in entrance has no
    // walk to follow.
    let Some(mut heading) = Dir::ALL.iter().copied().find(|&dir| passable(grid, x, y, dir))
    else {
        pl.done();
        return Ok(Solution::not_found(visited));
    };

    let mut path = vec![(x, y)];
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

        let preference = match hand {
            Hand::Left => [heading.left(), heading, heading.right(), heading.opposite()],
            Hand::Right => [heading.right(), heading, heading.left(), heading.opposite()],
        };
        let Some(dir) = preference.into_iter().find(|&dir| passable(grid, x, y, dir)) else {
            break;
        };
        heading = dir;
        (x, y) = grid.neighbor(x, y, heading).expect("passable edges are interior");
        path.push((x, y));
        if !grid.get_flag(x, y, CellFlags::VISITED_SOLVE) {
            grid.set_flag(x, y, CellFlags::VISITED_SOLVE, true);
            sink.on_event(Event::visit(x, y, 0));
            visited += 1;
        }
        pl.light_update();
    }

    pl.done();
    log::warn!("Wall follower gave up after {} steps", path.len() - 1);
    Ok(Solution::not_found(visited))
}

/// An edge is passable when it is open and leads to an in-bounds cell;
/// an open edge on the border (possible only in a corrupt file) counts
/// as a wall.
#[inline]
fn passable(grid: &Grid, x: usize, y: usize, dir: Dir) -> bool {
    !grid.has_wall(x, y, dir) && grid.neighbor(x, y, dir).is_some()
}
