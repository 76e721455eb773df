/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Dead-end braiding.
//!
//! Post-processes a generated maze by knocking one wall out of a
//! fraction of its dead ends, turning the spanning tree into a braided
//! maze with cycles. Dead ends are enumerated first and each is then
//! removed with independent probability `braid`, so the removed
//! fraction equals `braid` only in expectation.

use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::MazeRng;
use dsi_progress_logger::ProgressLog;
use rand::seq::IndexedRandom;
use rand::Rng;

/// Opens one random non-border wall of each dead end, with independent
/// probability `braid`.
pub fn braid<S: EventSink>(
    grid: &mut Grid,
    braid: f64,
    rng: &mut MazeRng,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<(), Cancelled> {
    debug_assert!((0.0..=1.0).contains(&braid));

    pl.item_name("dead end");
    pl.start("Braiding...");

    // Snapshot the dead ends before editing: opening walls never
    // creates new dead ends, but it removes some, and the removal
    // probability must apply to the original population.
    let mut dead_ends = Vec::new();
    for y in 0..grid.height() {
        token.check()?;
        for x in 0..grid.width() {
            if (grid.flags(x, y) & CellFlags::WALLS).bits().count_ones() == 3 {
                dead_ends.push((x, y));
            }
        }
    }
    log::info!("Found {} dead ends", dead_ends.len());

    let mut candidates = [Dir::North; 4];
    let mut removed = 0;
    for (x, y) in dead_ends {
        token.check()?;
        if !rng.random_bool(braid) {
            continue;
        }
        // Border walls are preserved: only walls with an in-bounds
        // neighbor qualify.
        let mut found = 0;
        for (_, _, dir) in grid.neighbors(x, y) {
            if grid.has_wall(x, y, dir) {
                candidates[found] = dir;
                found += 1;
            }
        }
        let &dir = candidates[..found]
            .choose(rng)
            .expect("a dead end always has a walled in-bounds neighbor");
        grid.carve(x, y, dir).expect("the neighbor is in bounds");
        sink.on_event(Event::connect(x, y, dir));
        removed += 1;
        pl.light_update();
    }

    log::info!("Removed {} dead ends", removed);
    pl.done();
    Ok(())
}
