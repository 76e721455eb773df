/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{GlobalArgs, NumThreadsArg};
use crate::cancel::CancelToken;
use crate::events::NullSink;
use crate::generate::{generate_with, GenAlgorithm, GenOptions};
use crate::grid::Grid;
use crate::solve::{solve_with, SolveAlgorithm, SolveOptions};
use anyhow::Result;
use clap::Parser;
use dsi_progress_logger::no_logging;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(
    name = "benchmark",
    about = "Times every generator and solver on an NxN maze.",
    long_about = None
)]
pub struct CliArgs {
    #[arg(long, default_value_t = 256)]
    /// The side of the square benchmark maze.
    pub size: usize,

    #[arg(long, default_value_t = 0)]
    /// The seed of the deterministic random stream.
    pub seed: u64,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs, token: &CancelToken) -> Result<()> {
    let pool = args.num_threads.pool()?;
    let cells = args.size * args.size;

    println!(
        "{:<12} {:>12} {:>12} {:>12}",
        "generator", "time", "dead ends", "open edges"
    );
    for algorithm in [
        GenAlgorithm::Dfs,
        GenAlgorithm::Prim,
        GenAlgorithm::Fractal,
        GenAlgorithm::Organic,
    ] {
        let mut grid = Grid::new(args.size, args.size)?;
        let options = GenOptions::new(algorithm, args.seed);
        let start = Instant::now();
        pool.install(|| {
            generate_with(&mut grid, &options, &mut NullSink, token, no_logging![])
        })?;
        let elapsed = start.elapsed();
        let stats = crate::analysis::analyze(&grid, token)?;
        println!(
            "{:<12} {:>11.3}s {:>12} {:>12}",
            algorithm.name(),
            elapsed.as_secs_f64(),
            stats.dead_ends,
            stats.open_edges
        );
    }

    let mut grid = Grid::new(args.size, args.size)?;
    pool.install(|| {
        generate_with(
            &mut grid,
            &GenOptions::new(GenAlgorithm::Dfs, args.seed),
            &mut NullSink,
            token,
            no_logging![],
        )
    })?;

    println!();
    println!(
        "{:<12} {:>12} {:>12} {:>12}",
        "solver", "time", "path steps", "visited"
    );
    for algorithm in [
        SolveAlgorithm::Bfs,
        SolveAlgorithm::Dijkstra,
        SolveAlgorithm::Astar,
        SolveAlgorithm::BiAstar,
        SolveAlgorithm::Dfs,
        SolveAlgorithm::Left,
        SolveAlgorithm::Right,
        SolveAlgorithm::DeadEnd,
        SolveAlgorithm::Tremaux,
        SolveAlgorithm::Swarm,
    ] {
        let options = SolveOptions::new(algorithm, args.seed);
        let start = Instant::now();
        let solution = pool.install(|| {
            solve_with(&mut grid, &options, &mut NullSink, token, no_logging![])
        })?;
        let elapsed = start.elapsed();
        println!(
            "{:<12} {:>11.3}s {:>12} {:>12}",
            algorithm.name(),
            elapsed.as_secs_f64(),
            if solution.found {
                (solution.path.len() - 1).to_string()
            } else {
                "-".to_owned()
            },
            solution.visited
        );
    }

    log::info!("Benchmarked {} cells per run", cells);
    Ok(())
}
