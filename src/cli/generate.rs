/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::{GlobalArgs, NumThreadsArg};
use crate::analysis::analyze;
use crate::cancel::CancelToken;
use crate::events::{EventSink, NullSink, RecordingSink};
use crate::generate::{fractal::DEFAULT_BLOCK_SIDE, generate_with, GenAlgorithm, GenOptions};
use crate::grid::Grid;
use crate::storage::{event_log::write_events, write_maze};
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::SystemTime;

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum GenAlgoArg {
    Dfs,
    Prim,
    Fractal,
    Organic,
}

impl From<GenAlgoArg> for GenAlgorithm {
    fn from(value: GenAlgoArg) -> Self {
        match value {
            GenAlgoArg::Dfs => GenAlgorithm::Dfs,
            GenAlgoArg::Prim => GenAlgorithm::Prim,
            GenAlgoArg::Fractal => GenAlgorithm::Fractal,
            GenAlgoArg::Organic => GenAlgorithm::Organic,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "generate", about = "Generates a maze and writes it to a .maze file.", long_about = None)]
pub struct CliArgs {
    #[arg(long)]
    /// The grid width, at least 2.
    pub width: usize,

    #[arg(long)]
    /// The grid height, at least 2.
    pub height: usize,

    #[arg(long, value_enum, default_value_t = GenAlgoArg::Dfs)]
    /// The generation algorithm.
    pub algo: GenAlgoArg,

    #[arg(long, default_value_t = 0)]
    /// The seed of the deterministic random stream.
    pub seed: u64,

    #[arg(long, default_value_t = 0.0)]
    /// The fraction of dead ends to knock out, in [0, 1].
    pub braid: f64,

    #[arg(short, long)]
    /// The output .maze file.
    pub out: PathBuf,

    #[arg(long)]
    /// Also record the carve events next to the output (same basename,
    /// .events extension).
    pub record_events: bool,

    #[arg(long, default_value_t = DEFAULT_BLOCK_SIDE)]
    /// The block side of the fractal generator.
    pub block_side: usize,

    #[arg(long)]
    /// The agent population of the organic generator.
    pub agents: Option<usize>,

    #[clap(flatten)]
    pub num_threads: NumThreadsArg,
}

pub fn main(global_args: GlobalArgs, args: CliArgs, token: &CancelToken) -> Result<()> {
    let mut grid = Grid::new(args.width, args.height)?;
    let mut options = GenOptions::new(args.algo.into(), args.seed);
    options.braid = args.braid;
    options.block_side = args.block_side;
    options.agents = args.agents;

    let pool = args.num_threads.pool()?;
    let mut pl = global_args.progress_logger();

    if args.record_events {
        let mut sink = RecordingSink::new();
        run(&pool, &mut grid, &options, &mut sink, token, &mut pl)?;
        write_events(args.out.with_extension("events"), sink.events())?;
    } else {
        run(&pool, &mut grid, &options, &mut NullSink, token, &mut pl)?;
    }

    let stats = analyze(&grid, token)?;
    log::info!(
        "{} dead ends, branching factor {:.3}, shortest path {} steps",
        stats.dead_ends,
        stats.branching_factor,
        stats.path_length.expect("a generated maze is connected")
    );

    let metadata = vec![
        ("algo".to_owned(), options.algorithm.name().to_owned()),
        ("seed".to_owned(), options.seed.to_string()),
        ("braid".to_owned(), options.braid.to_string()),
        (
            "generated_ms".to_owned(),
            SystemTime::now()
                .duration_since(SystemTime::UNIX_EPOCH)
                .map(|d| d.as_millis().to_string())
                .unwrap_or_default(),
        ),
    ];
    write_maze(&args.out, &grid, &metadata)
}

fn run<S: EventSink + Send>(
    pool: &rayon::ThreadPool,
    grid: &mut Grid,
    options: &GenOptions,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut dsi_progress_logger::ProgressLogger,
) -> Result<()> {
    pool.install(|| generate_with(grid, options, sink, token, pl))
}
