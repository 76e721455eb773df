/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

use super::GlobalArgs;
use crate::analysis::analyze;
use crate::cancel::CancelToken;
use crate::events::{replay, replay_generation, EventKind};
use crate::storage::{event_log::read_events, read_maze, write_maze};
use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "replay", about = "Replays a .events log over a base maze.", long_about = None)]
pub struct CliArgs {
    /// The event log to replay.
    pub events: PathBuf,

    #[arg(long)]
    /// The base .maze file providing the dimensions (and, for solve
    /// logs, the walls).
    pub maze: PathBuf,

    #[arg(short, long)]
    /// Write the replayed grid to this file.
    pub out: Option<PathBuf>,
}

pub fn main(_global_args: GlobalArgs, args: CliArgs, token: &CancelToken) -> Result<()> {
    let events = read_events(&args.events)?;
    let (mut grid, metadata) = read_maze(&args.maze)?;

    // A generation recording starts from the all-walls state and its
    // first record is the claim of the entrance; a solve recording
    // applies on top of the loaded walls.
    let generation = events.first().is_some_and(|e| e.kind == EventKind::CarveCell);
    log::info!(
        "Replaying {} events ({} recording)",
        events.len(),
        if generation { "generation" } else { "solve" }
    );
    if generation {
        replay_generation(&mut grid, &events)?;
    } else {
        replay(&mut grid, &events)?;
    }

    let stats = analyze(&grid, token)?;
    log::info!(
        "{} dead ends, branching factor {:.3}, shortest path {}",
        stats.dead_ends,
        stats.branching_factor,
        stats
            .path_length
            .map(|steps| format!("{} steps", steps))
            .unwrap_or_else(|| "unreachable".to_owned())
    );

    if let Some(out) = args.out {
        write_maze(out, &grid, &metadata)?;
    }
    Ok(())
}
