/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{GlobalArgs, NumThreadsArg};
use crate::cancel::CancelToken;
use crate::events::{EventSink, NullSink, RecordingSink};
use crate::grid::Grid;
use crate::solve::{solve_with, NoPath, Solution, SolveAlgorithm, SolveOptions};
use crate::storage::{event_log::write_events, read_maze, write_maze};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum SolveAlgoArg {
    Bfs,
    Dijkstra,
    Astar,
    Biastar,
    #[value(name = "dfs_solve")]
    DfsSolve,
    Left,
    Right,
    Deadend,
    Tremaux,
    Swarm,
}

impl From<SolveAlgoArg> for SolveAlgorithm {
    fn from(value: SolveAlgoArg) -> Self {
        match value {
            SolveAlgoArg::Bfs => SolveAlgorithm::Bfs,
            SolveAlgoArg::Dijkstra => SolveAlgorithm::Dijkstra,
            SolveAlgoArg::Astar => SolveAlgorithm::Astar,
            SolveAlgoArg::Biastar => SolveAlgorithm::BiAstar,
            SolveAlgoArg::DfsSolve => SolveAlgorithm::Dfs,
            SolveAlgoArg::Left => SolveAlgorithm::Left,
            SolveAlgoArg::Right => SolveAlgorithm::Right,
            SolveAlgoArg::Deadend => SolveAlgorithm::DeadEnd,
            SolveAlgoArg::Tremaux => SolveAlgorithm::Tremaux,
            SolveAlgoArg::Swarm => SolveAlgorithm::Swarm,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "solve", about = "Solves a .maze file and reports the path.", long_about = None)]
pub struct CliArgs {
    /// The maze to solve.
    pub input: PathBuf,

    #[arg(long, value_enum, default_value_t = SolveAlgoArg::Bfs)]
    /// The solver algorithm.
    pub algo: SolveAlgoArg,

    #[arg(long, default_value_t = 0)]
    /// The seed of the deterministic random stream (only Trémaux
    /// draws).
    pub seed: u64,

    #[arg(short, long)]
    /// Write the solved maze, visit and path marks included, to this
    /// file.
    pub out: Option<PathBuf>,

    #[arg(long)]
    /// Also record the visit events next to the input (same basename,
    /// .events extension).
    pub record_events: bool,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(global_args: GlobalArgs, args: CliArgs, token: &CancelToken) -> Result<()> {
    let (mut grid, mut metadata) = read_maze(&args.input)?;
    let options = SolveOptions::new(args.algo.into(), args.seed);
    let pool = args.num_threads.pool()?;
    let mut pl = global_args.progress_logger();

    let solution = if args.record_events {
        let mut sink = RecordingSink::new();
        let solution = run(&pool, &mut grid, &options, &mut sink, token, &mut pl)?;
        write_events(args.input.with_extension("events"), sink.events())?;
        solution
    } else {
        run(&pool, &mut grid, &options, &mut NullSink, token, &mut pl)?
    };

    if !solution.found {
        return Err(NoPath.into());
    }

    if let Some(out) = args.out {
        metadata.push(("solver".to_owned(), options.algorithm.name().to_owned()));
        metadata.push(("path_steps".to_owned(), (solution.path.len() - 1).to_string()));
        write_maze(out, &grid, &metadata)?;
    }
    Ok(())
}

fn run<S: EventSink + Send>(
    pool: &rayon::ThreadPool,
    grid: &mut Grid,
    options: &SolveOptions,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut dsi_progress_logger::ProgressLogger,
) -> Result<Solution> {
    pool.install(|| solve_with(grid, options, sink, token, pl))
}
