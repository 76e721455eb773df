/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Maze generators.
//!
//! All generators share the same contract: given a grid, a seed, and
//! options, they leave behind a maze in which every cell is reachable
//! from the entrance through carved passages. With `braid = 0` the
//! result is *perfect*: the carved edges form a spanning tree, so any
//! two cells are joined by exactly one simple path. With `braid > 0`
//! the [braiding pass](braid()) knocks walls out of dead ends, allowing
//! cycles.
//!
//! [`dfs`] and [`prim`] are serial; [`fractal`] and [`organic`] are
//! data-parallel. All four produce a byte-identical grid when re-run
//! with the same seed and options, and all terminate in expected
//! O(cells) work.

pub mod braid;
pub mod dfs;
pub mod fractal;
pub mod organic;
pub mod prim;

pub use braid::braid;

use crate::cancel::CancelToken;
use crate::events::EventSink;
use crate::grid::Grid;
use crate::rng::{rng_for_seed, worker_rng};
use anyhow::Result;
use dsi_progress_logger::{ProgressLog, ProgressLogger};
use thiserror::Error;

/// Stream index reserved for the braiding pass, so that braiding draws
/// are decoupled from the generator's own draws.
const BRAID_STREAM: u64 = 0xb8a1d;

/// The available maze generation algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenAlgorithm {
    /// Recursive backtracker: long corridors, low branching.
    Dfs,
    /// Prim's algorithm: short spiky branches.
    Prim,
    /// Block-parallel divide and conquer; visible block seams.
    Fractal,
    /// Multi-agent parallel carving: fuzzy topology, short dead ends.
    Organic,
}

impl GenAlgorithm {
    /// The name used in CLI arguments and `.maze` metadata.
    pub fn name(self) -> &'static str {
        match self {
            GenAlgorithm::Dfs => "dfs",
            GenAlgorithm::Prim => "prim",
            GenAlgorithm::Fractal => "fractal",
            GenAlgorithm::Organic => "organic",
        }
    }
}

impl std::fmt::Display for GenAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
/// The generation options are unusable.
pub enum OptionsError {
    #[error("braid factor {0} is outside [0, 1]")]
    Braid(f64),
    #[error("block side {0} is smaller than 2")]
    BlockSide(usize),
    #[error("agent count must be positive")]
    Agents,
}

/// Options shared by all generators.
#[derive(Debug, Clone)]
pub struct GenOptions {
    pub algorithm: GenAlgorithm,
    /// Seed of the deterministic random stream.
    pub seed: u64,
    /// Fraction of dead ends to remove after generation, in `[0, 1]`.
    pub braid: f64,
    /// Side of the fractal generator's blocks.
    pub block_side: usize,
    /// Number of organic agents; `None` picks a default proportional to
    /// the grid area.
    pub agents: Option<usize>,
}

impl GenOptions {
    pub fn new(algorithm: GenAlgorithm, seed: u64) -> Self {
        Self {
            algorithm,
            seed,
            braid: 0.0,
            block_side: fractal::DEFAULT_BLOCK_SIDE,
            agents: None,
        }
    }

    /// Checks the options for consistency.
    pub fn validate(&self) -> Result<(), OptionsError> {
        if !(0.0..=1.0).contains(&self.braid) || self.braid.is_nan() {
            return Err(OptionsError::Braid(self.braid));
        }
        if self.algorithm == GenAlgorithm::Fractal && self.block_side < 2 {
            return Err(OptionsError::BlockSide(self.block_side));
        }
        if self.algorithm == GenAlgorithm::Organic && self.agents == Some(0) {
            return Err(OptionsError::Agents);
        }
        Ok(())
    }
}

/// Runs the generator selected by `options` on `grid`, followed by the
/// braiding pass when `options.braid > 0`.
///
/// The grid is reset to the all-walls state first; on success every
/// cell is marked VISITED_GEN and reachable from the entrance.
pub fn generate<S: EventSink>(
    grid: &mut Grid,
    options: &GenOptions,
    sink: &mut S,
    token: &CancelToken,
) -> Result<()> {
    let mut pl = ProgressLogger::default();
    pl.display_memory(true);
    generate_with(grid, options, sink, token, &mut pl)
}

/// As [`generate`], with a caller-provided progress logger.
pub fn generate_with<S: EventSink>(
    grid: &mut Grid,
    options: &GenOptions,
    sink: &mut S,
    token: &CancelToken,
    pl: &mut impl ProgressLog,
) -> Result<()> {
    options.validate()?;
    log::info!(
        "Generating a {}x{} maze with \"{}\" (seed {})",
        grid.width(),
        grid.height(),
        options.algorithm,
        options.seed
    );

    match options.algorithm {
        GenAlgorithm::Dfs => {
            dfs::generate(grid, &mut rng_for_seed(options.seed), sink, token, pl)?
        }
        GenAlgorithm::Prim => {
            prim::generate(grid, &mut rng_for_seed(options.seed), sink, token, pl)?
        }
        GenAlgorithm::Fractal => {
            fractal::generate(grid, options.seed, options.block_side, sink, token, pl)?
        }
        GenAlgorithm::Organic => {
            organic::generate(grid, options.seed, options.agents, sink, token, pl)?
        }
    }

    debug_assert!(grid.is_wall_symmetric());

    if options.braid > 0.0 {
        braid::braid(
            grid,
            options.braid,
            &mut worker_rng(options.seed, BRAID_STREAM),
            sink,
            token,
            pl,
        )?;
        debug_assert!(grid.is_wall_symmetric());
    }

    Ok(())
}
