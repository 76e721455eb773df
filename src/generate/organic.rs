/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The organic (multi-agent) generator.
//!
//! A population of independent walkers carves the maze concurrently.
//! Each *tick* has three phases:
//!
//! 1. **Propose** (parallel): every live agent draws one of its
//!    in-bounds neighbors uniformly from its own random stream. The
//!    phase touches no shared state, so it runs over all agents at
//!    once and its outcome depends on nothing but the seed.
//! 2. **Commit** (serial, in agent order): each proposal tries to claim
//!    its destination by a `fetch_or` of VISITED_GEN on the atomic cell
//!    view; the previous value tells winner from loser. The winner
//!    clears the two facing wall bits (the source cell is its own
//!    property, the destination has just become so) and moves there; a
//!    loser, or an agent that proposed an already-visited cell, is
//!    killed. The fixed commit order makes the final grid
//!    byte-reproducible at a given seed and agent count.
//! 3. **Respawn** (serial): dead agents are reseeded on unvisited cells
//!    *adjacent to the visited region*, carving the wall to one
//!    uniformly chosen visited neighbor at spawn time. Sampling is by
//!    rejection with a bounded number of attempts per tick, falling
//!    back to a deterministic scan when the whole population is dead;
//!    when fewer unvisited cells than agents remain, the population
//!    shrinks.
//!
//! Every carved cell is connected to a previously visited cell (its
//! claimer's source, or its spawn neighbor), and the first visited cell
//! is the entrance, so connectivity follows by induction. The texture
//! is fuzzy and high-branching, with many short dead ends and no long
//! rivers.

use crate::cancel::{CancelToken, Cancelled};
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::{rng_for_seed, worker_rng, MazeRng};
use dsi_progress_logger::ProgressLog;
use rand::seq::IndexedRandom;
use rand::Rng;
use rayon::prelude::*;
use std::sync::atomic::{AtomicU8, Ordering};

/// Hard cap on the default agent population.
pub const MAX_DEFAULT_AGENTS: usize = 16384;

/// Rejection-sampling attempts per missing agent and tick.
const SPAWN_ATTEMPTS: usize = 16;

struct Agent {
    rng: MazeRng,
    pos: Option<(usize, usize)>,
    proposal: Option<Dir>,
}

/// Carves a maze into `grid` with a swarm of parallel agents.
///
/// `agents` caps the population; the default is proportional to the
/// grid area, `min(cells / 64, 16384)`.
pub fn generate<S: EventSink>(
    grid: &mut Grid,
    seed: u64,
    agents: Option<usize>,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<(), Cancelled> {
    grid.fill_walls();

    let (w, h) = (grid.width(), grid.height());
    let num_cells = w * h;
    let target = agents.unwrap_or((num_cells / 64).clamp(1, MAX_DEFAULT_AGENTS));
    debug_assert!(target > 0);

    pl.item_name("cell");
    pl.expected_updates(Some(num_cells));
    pl.start(format!("Carving (organic, {} agents)...", target));

    let mut master = rng_for_seed(seed);
    let mut population: Vec<Agent> = (0..target)
        .map(|slot| Agent {
            rng: worker_rng(seed, slot as u64),
            pos: None,
            proposal: None,
        })
        .collect();

    let cells = grid.atomic_cells();
    let index = |x: usize, y: usize| y * w + x;
    let visited = |cells: &[AtomicU8], idx: usize| {
        cells[idx].load(Ordering::Relaxed) & CellFlags::VISITED_GEN.bits() != 0
    };

    // The first agent starts at the entrance; everyone else joins the
    // visited region through the respawn phase below.
    cells[0].fetch_or(CellFlags::VISITED_GEN.bits(), Ordering::Relaxed);
    sink.on_event(Event::carve_cell(0, 0));
    population[0].pos = Some((0, 0));
    let mut unvisited = num_cells - 1;
    pl.light_update();

    while unvisited > 0 {
        token.check()?;

        // Propose: read-only on the grid, one draw per live agent.
        population.par_iter_mut().for_each(|agent| {
            agent.proposal = agent.pos.map(|(x, y)| {
                let mut dirs = [Dir::North; 4];
                let mut found = 0;
                for dir in Dir::ALL {
                    let (dx, dy) = dir.delta();
                    if let (Some(nx), Some(ny)) =
                        (x.checked_add_signed(dx), y.checked_add_signed(dy))
                    {
                        if nx < w && ny < h {
                            dirs[found] = dir;
                            found += 1;
                        }
                    }
                }
                *dirs[..found]
                    .choose(&mut agent.rng)
                    .expect("every cell has an in-bounds neighbor")
            });
        });

        // Commit, in agent order.
        for agent in population.iter_mut() {
            let (Some((x, y)), Some(dir)) = (agent.pos, agent.proposal) else {
                continue;
            };
            let (dx, dy) = dir.delta();
            let (nx, ny) = (
                x.wrapping_add_signed(dx),
                y.wrapping_add_signed(dy),
            );
            let dst = index(nx, ny);
            let won = cells[dst].fetch_or(CellFlags::VISITED_GEN.bits(), Ordering::Relaxed)
                & CellFlags::VISITED_GEN.bits()
                == 0;
            if !won {
                agent.pos = None;
                continue;
            }
            cells[index(x, y)].fetch_and(!dir.wall().bits(), Ordering::Relaxed);
            cells[dst].fetch_and(!dir.opposite().wall().bits(), Ordering::Relaxed);
            sink.on_event(Event::connect(x, y, dir));
            sink.on_event(Event::carve_cell(nx, ny));
            agent.pos = Some((nx, ny));
            unvisited -= 1;
            pl.light_update();
            if unvisited == 0 {
                break;
            }
        }

        // Respawn dead agents next to the visited region, shrinking the
        // population once fewer unvisited cells remain than agents.
        let allowed = target.min(unvisited);
        let mut alive = population.iter().filter(|a| a.pos.is_some()).count();
        for slot in 0..population.len() {
            if alive >= allowed {
                break;
            }
            if population[slot].pos.is_some() {
                continue;
            }
            let mut spawned = None;
            for _ in 0..SPAWN_ATTEMPTS {
                let x = master.random_range(0..w);
                let y = master.random_range(0..h);
                if !visited(cells, index(x, y)) {
                    if let Some(dir) = visited_neighbor(cells, &mut master, w, h, x, y) {
                        spawned = Some((x, y, dir));
                        break;
                    }
                }
            }
            let Some((x, y, dir)) = spawned else { continue };
            spawn(cells, sink, w, (x, y, dir));
            population[slot].pos = Some((x, y));
            alive += 1;
            unvisited -= 1;
            pl.light_update();
        }

        if alive == 0 && unvisited > 0 {
            // The whole population is dead and rejection failed: fall
            // back to a scan so the tick always makes progress. An
            // unvisited cell bordering the visited region exists
            // whenever any unvisited cell does.
            let (x, y, dir) = scan_for_spawn(cells, &mut master, w, h)
                .expect("some unvisited cell borders the visited region");
            spawn(cells, sink, w, (x, y, dir));
            let slot = population
                .iter()
                .position(|a| a.pos.is_none())
                .expect("the whole population is dead");
            population[slot].pos = Some((x, y));
            unvisited -= 1;
            pl.light_update();
        }
    }

    pl.done();
    Ok(())
}

/// Claims the spawn cell and carves the wall to its chosen visited
/// neighbor, emitting the matching events.
fn spawn<S: EventSink>(
    cells: &[AtomicU8],
    sink: &mut S,
    w: usize,
    (x, y, dir): (usize, usize, Dir),
) {
    cells[y * w + x].fetch_or(CellFlags::VISITED_GEN.bits(), Ordering::Relaxed);
    cells[y * w + x].fetch_and(!dir.wall().bits(), Ordering::Relaxed);
    let (dx, dy) = dir.delta();
    let (nx, ny) = (x.wrapping_add_signed(dx), y.wrapping_add_signed(dy));
    cells[ny * w + nx].fetch_and(!dir.opposite().wall().bits(), Ordering::Relaxed);
    sink.on_event(Event::carve_cell(x, y));
    sink.on_event(Event::connect(x, y, dir));
}

/// Picks one visited in-bounds neighbor of `(x, y)` uniformly, if any.
fn visited_neighbor(
    cells: &[AtomicU8],
    rng: &mut MazeRng,
    w: usize,
    h: usize,
    x: usize,
    y: usize,
) -> Option<Dir> {
    let mut dirs = [Dir::North; 4];
    let mut found = 0;
    for dir in Dir::ALL {
        let (dx, dy) = dir.delta();
        let (Some(nx), Some(ny)) = (x.checked_add_signed(dx), y.checked_add_signed(dy)) else {
            continue;
        };
        if nx < w
            && ny < h
            && cells[ny * w + nx].load(Ordering::Relaxed) & CellFlags::VISITED_GEN.bits() != 0
        {
            dirs[found] = dir;
            found += 1;
        }
    }
    dirs[..found].choose(rng).copied()
}

/// Finds the first unvisited cell adjacent to the visited region, in
/// row-major order.
fn scan_for_spawn(
    cells: &[AtomicU8],
    rng: &mut MazeRng,
    w: usize,
    h: usize,
) -> Option<(usize, usize, Dir)> {
    for y in 0..h {
        for x in 0..w {
            if cells[y * w + x].load(Ordering::Relaxed) & CellFlags::VISITED_GEN.bits() == 0 {
                if let Some(dir) = visited_neighbor(cells, rng, w, h, x, y) {
                    return Some((x, y, dir));
                }
            }
        }
    }
    None
}
