/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

//! Deterministic randomness.
//!
//! All random choices in the crate come from [`SmallRng`] streams
//! derived from a single `u64` seed, so that a fixed seed reproduces a
//! run exactly. Serial components share [one stream](rng_for_seed);
//! parallel components give each worker [its own stream](worker_rng)
//! keyed on the worker index, which makes the final grid state
//! independent of scheduling.

use rand::rngs::SmallRng;
use rand::SeedableRng;

/// The pseudo-random source used throughout the crate.
pub type MazeRng = SmallRng;

/// Returns the stream for a seed.
pub fn rng_for_seed(seed: u64) -> MazeRng {
    SmallRng::seed_from_u64(seed)
}

/// Returns the independent stream of worker `worker` for a seed.
///
/// The worker index is diffused through a splitmix64 round before being
/// mixed into the seed, so that consecutive indices do not produce
/// correlated streams.
pub fn worker_rng(seed: u64, worker: u64) -> MazeRng {
    SmallRng::seed_from_u64(seed ^ splitmix64(worker.wrapping_add(1)))
}

/// One splitmix64 output step.
fn splitmix64(mut z: u64) -> u64 {
    z = z.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}
