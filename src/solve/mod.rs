/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Maze solvers.
//!
//! All solvers share the same contract: given a grid they search for a
//! path from the entrance to the exit and report it as a [`Solution`],
//! marking every expanded cell VISITED_SOLVE and, on success, every
//! path cell ON_PATH in a final pass. Neighbor examination order is
//! fixed to N, E, S, W everywhere, so the serial solvers are fully
//! deterministic at a given seed (only [`tremaux`] draws random
//! numbers; [`swarm`] is parallel and reproduces the path *length*, not
//! necessarily the path).
//!
//! An unreachable exit is data, not an error: the solver returns
//! `found = false` with an empty path and the caller decides (the CLI
//! maps it to [`NoPath`]).

pub mod astar;
pub mod bfs;
pub mod biastar;
pub mod dead_end;
pub mod dfs;
pub mod dijkstra;
pub mod swarm;
pub mod tremaux;
pub mod wall;

use crate::cancel::CancelToken;
use crate::events::{Event, EventSink};
use crate::grid::{CellFlags, Dir, Grid};
use crate::rng::rng_for_seed;
use anyhow::Result;
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use itertools::Itertools;
use thiserror::Error;

/// The available solver algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveAlgorithm {
    /// Breadth-first search; shortest path in steps.
    Bfs,
    /// Uniform-cost search; shortest path, insertion-order tie-breaks.
    Dijkstra,
    /// A* with the Manhattan heuristic; optimal.
    Astar,
    /// Bidirectional A*, alternating one expansion per side; optimal.
    BiAstar,
    /// Depth-first search; first path found, not optimal.
    Dfs,
    /// Left-hand wall follower; fails on isolated cycles.
    Left,
    /// Right-hand wall follower; symmetric to [`Left`](Self::Left).
    Right,
    /// Dead-end filling; optimal on perfect mazes only.
    DeadEnd,
    /// Trémaux's algorithm: a walking robot with corridor marks.
    Tremaux,
    /// Level-synchronous parallel BFS; optimal.
    Swarm,
}

impl SolveAlgorithm {
    /// The name used in CLI arguments.
    pub fn name(self) -> &'static str {
        match self {
            SolveAlgorithm::Bfs => "bfs",
            SolveAlgorithm::Dijkstra => "dijkstra",
            SolveAlgorithm::Astar => "astar",
            SolveAlgorithm::BiAstar => "biastar",
            SolveAlgorithm::Dfs => "dfs_solve",
            SolveAlgorithm::Left => "left",
            SolveAlgorithm::Right => "right",
            SolveAlgorithm::DeadEnd => "deadend",
            SolveAlgorithm::Tremaux => "tremaux",
            SolveAlgorithm::Swarm => "swarm",
        }
    }
}

impl std::fmt::Display for SolveAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Options shared by all solvers.
#[derive(Debug, Clone)]
pub struct SolveOptions {
    pub algorithm: SolveAlgorithm,
    /// Seed of the deterministic random stream (only Trémaux draws).
    pub seed: u64,
}

impl SolveOptions {
    pub fn new(algorithm: SolveAlgorithm, seed: u64) -> Self {
        Self { algorithm, seed }
    }
}

/// The outcome of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    /// Whether the exit was reached.
    pub found: bool,
    /// The reported path, entrance first, exit last; empty on failure.
    pub path: Vec<(usize, usize)>,
    /// The number of cells marked VISITED_SOLVE.
    pub visited: usize,
}

impl Solution {
    pub(crate) fn not_found(visited: usize) -> Solution {
        Solution {
            found: false,
            path: Vec::new(),
            visited,
        }
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
/// The solver ran to exhaustion without reaching the exit.
#[error("no path from the entrance to the exit")]
pub struct NoPath;

/// Sentinel for "not yet discovered" in solver parent maps. Cell
/// indices fit `u32` because the cell count is bounded by
/// [`MAX_CELLS`](crate::grid::MAX_CELLS).
pub(crate) const NO_PARENT: u32 = u32::MAX;

/// Runs the solver selected by `options` on `grid`.
///
/// Solver-owned flags are reset first; on success the path cells are
/// marked ON_PATH and reported through the sink.
pub fn solve<S: EventSink>(
    grid: &mut Grid,
    options: &SolveOptions,
    sink: &mut S,
    token: &CancelToken,
) -> Result<Solution> {
    let mut pl = ProgressLogger::default();
    pl.display_memory(true);
    solve_with(grid, options, sink, token, &mut pl)
}

/// As [`solve`], with a caller-provided progress logger.
pub fn solve_with<S: EventSink>(
    grid: &mut Grid,
    options: &SolveOptions,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<Solution> {
    log::info!(
        "Solving a {}x{} maze with \"{}\"",
        grid.width(),
        grid.height(),
        options.algorithm
    );
    grid.reset_solver_flags();

    let solution = match options.algorithm {
        SolveAlgorithm::Bfs => bfs::solve(grid, sink, token, pl)?,
        SolveAlgorithm::Dijkstra => dijkstra::solve(grid, sink, token, pl)?,
        SolveAlgorithm::Astar => astar::solve(grid, sink, token, pl)?,
        SolveAlgorithm::BiAstar => biastar::solve(grid, sink, token, pl)?,
        SolveAlgorithm::Dfs => dfs::solve(grid, sink, token, pl)?,
        SolveAlgorithm::Left => wall::solve(grid, wall::Hand::Left, sink, token, pl)?,
        SolveAlgorithm::Right => wall::solve(grid, wall::Hand::Right, sink, token, pl)?,
        SolveAlgorithm::DeadEnd => dead_end::solve(grid, sink, token, pl)?,
        SolveAlgorithm::Tremaux => {
            tremaux::solve(grid, &mut rng_for_seed(options.seed), sink, token, pl)?
        }
        SolveAlgorithm::Swarm => swarm::solve(grid, sink, token, pl)?,
    };

    if solution.found {
        debug_assert_path(grid, &solution.path);
        mark_path(grid, &solution.path, sink);
        log::info!(
            "Path of {} steps, {} cells visited",
            solution.path.len() - 1,
            solution.visited
        );
    } else {
        log::info!("No path found after visiting {} cells", solution.visited);
    }

    Ok(solution)
}

/// Iterates over the neighbors of `(x, y)` reachable through an open
/// edge, in the canonical N, E, S, W order.
pub(crate) fn open_neighbors(
    grid: &Grid,
    x: usize,
    y: usize,
) -> impl Iterator<Item = (usize, usize, Dir)> + '_ {
    grid.neighbors(x, y)
        .filter(move |&(_, _, dir)| !grid.has_wall(x, y, dir))
}

/// Follows a parent map from `last` back to the root (its own parent)
/// and returns the path root-first.
pub(crate) fn reconstruct(width: usize, parents: &[u32], last: usize) -> Vec<(usize, usize)> {
    let mut path = Vec::new();
    let mut cur = last as u32;
    loop {
        let idx = cur as usize;
        path.push((idx % width, idx / width));
        let parent = parents[idx];
        debug_assert_ne!(parent, NO_PARENT);
        if parent == cur {
            break;
        }
        cur = parent;
    }
    path.reverse();
    path
}

/// Marks the path cells ON_PATH and reports them, entrance first.
pub(crate) fn mark_path<S: EventSink>(grid: &mut Grid, path: &[(usize, usize)], sink: &mut S) {
    for &(x, y) in path {
        grid.set_flag(x, y, CellFlags::ON_PATH, true);
        sink.on_event(Event::path(x, y));
    }
}

/// Debug check of the path invariants: endpoints, unit steps, open
/// shared edges.
fn debug_assert_path(grid: &Grid, path: &[(usize, usize)]) {
    if cfg!(debug_assertions) {
        assert_eq!(path.first(), Some(&grid.start()));
        assert_eq!(path.last(), Some(&grid.exit()));
        for (&(x, y), &(nx, ny)) in path.iter().tuple_windows() {
            let step = open_neighbors(grid, x, y).any(|(ox, oy, _)| (ox, oy) == (nx, ny));
            assert!(step, "({x}, {y}) -> ({nx}, {ny}) is not an open unit step");
        }
    }
}

/// The Manhattan distance between two cells: admissible and consistent
/// on a uniform grid.
pub(crate) fn manhattan(from: (usize, usize), to: (usize, usize)) -> u64 {
    (from.0.abs_diff(to.0) + from.1.abs_diff(to.1)) as u64
}
