/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! The command-line interface of the `warren` binary.
//!
//! One module per subcommand, each exposing a `CliArgs` parser and a
//! `main(global_args, args, token)` entry point; [`cli_main`] parses
//! and dispatches. Compiled only with the `cli` feature.

use crate::cancel::CancelToken;
use anyhow::{ensure, Result};
use clap::error::ErrorKind;
use clap::{Args, Parser, Subcommand};
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use std::time::Duration;
use thiserror::Error;

pub mod benchmark;
pub mod generate;
pub mod replay;
pub mod solve;

#[derive(Error, Debug)]
/// The command line could not be used as given.
#[error("{0}")]
pub struct UsageError(pub String);

/// Initializes the logging infrastructure of the binary.
pub fn init_env_logger() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()?;
    Ok(())
}

/// Parses a duration with an optional `ms`, `s`, or `m` suffix; a bare
/// number is milliseconds.
pub fn parse_duration(arg: &str) -> Result<Duration> {
    let arg = arg.trim();
    if let Some(value) = arg.strip_suffix("ms") {
        Ok(Duration::from_millis(value.trim().parse()?))
    } else if let Some(value) = arg.strip_suffix('s') {
        Ok(Duration::from_secs_f64(value.trim().parse()?))
    } else if let Some(value) = arg.strip_suffix('m') {
        Ok(Duration::from_secs_f64(value.trim().parse::<f64>()? * 60.0))
    } else {
        Ok(Duration::from_millis(arg.parse()?))
    }
}

/// Parses the number of threads from a string.
///
/// This function is meant to be used with `#[arg(..., value_parser =
/// num_threads_parser)]`.
pub fn num_threads_parser(arg: &str) -> Result<usize> {
    let num_threads = arg.parse::<usize>()?;
    ensure!(num_threads > 0, "Number of threads must be greater than 0");
    Ok(num_threads)
}

/// Shared CLI arguments for commands that specify a number of threads.
#[derive(Args, Debug)]
pub struct NumThreadsArg {
    #[arg(short = 'j', long, default_value_t = num_cpus::get().max(1), value_parser = num_threads_parser)]
    /// The number of threads to use.
    pub num_threads: usize,
}

impl NumThreadsArg {
    /// Builds a rayon pool of the requested width.
    pub fn pool(&self) -> Result<rayon::ThreadPool> {
        Ok(rayon::ThreadPoolBuilder::new()
            .num_threads(self.num_threads)
            .build()?)
    }
}

#[derive(Args, Debug)]
pub struct GlobalArgs {
    #[arg(long, value_parser = parse_duration, global = true, display_order = 1000)]
    /// How often to log progress. You can use the suffixes "ms", "s",
    /// and "m"; a bare number is milliseconds.
    pub log_interval: Option<Duration>,
}

impl GlobalArgs {
    /// A progress logger honoring `--log-interval`.
    pub(crate) fn progress_logger(&self) -> ProgressLogger {
        let mut pl = ProgressLogger::default();
        pl.display_memory(true);
        if let Some(duration) = self.log_interval {
            pl.log_interval(duration);
        }
        pl
    }
}

#[derive(Subcommand, Debug)]
pub enum SubCommands {
    Generate(generate::CliArgs),
    Solve(solve::CliArgs),
    Replay(replay::CliArgs),
    Benchmark(benchmark::CliArgs),
}

#[derive(Parser, Debug)]
#[command(name = "warren", version)]
/// Tools to generate, solve, replay, and benchmark grid mazes.
pub struct Cli {
    #[command(subcommand)]
    pub command: SubCommands,
    #[clap(flatten)]
    pub args: GlobalArgs,
}

/// The entry point of the command-line interface.
pub fn cli_main<I, T>(args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
{
    let start = std::time::Instant::now();
    let cli = match Cli::try_parse_from(args) {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.print()?;
            return Ok(());
        }
        Err(e) => return Err(UsageError(e.to_string()).into()),
    };

    let token = CancelToken::new();
    {
        let token = token.clone();
        ctrlc::set_handler(move || token.cancel())?;
    }

    match cli.command {
        SubCommands::Generate(args) => generate::main(cli.args, args, &token)?,
        SubCommands::Solve(args) => solve::main(cli.args, args, &token)?,
        SubCommands::Replay(args) => replay::main(cli.args, args, &token)?,
        SubCommands::Benchmark(args) => benchmark::main(cli.args, args, &token)?,
    }

    log::info!("The command took {:.3}s", start.elapsed().as_secs_f64());
    Ok(())
}
