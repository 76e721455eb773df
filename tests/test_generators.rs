/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use common::*;
use warren::prelude::*;

/// Universal invariants: wall symmetry, connectivity, and the
/// spanning-tree edge count, for every generator over a few seeds and
/// shapes.
#[test]
fn test_universal_invariants() {
    for algorithm in ALL_GENERATORS {
        for (width, height) in [(2, 2), (5, 5), (16, 16), (31, 9), (50, 34)] {
            for seed in [0, 1, 42] {
                let grid = gen(algorithm, width, height, seed, 0.0);
                let cells = width * height;
                assert!(
                    grid.is_wall_symmetric(),
                    "{algorithm} {width}x{height} seed {seed}: asymmetric walls"
                );
                assert_eq!(
                    reachable_cells(&grid),
                    cells,
                    "{algorithm} {width}x{height} seed {seed}: not connected"
                );
                assert_eq!(
                    grid.open_edges(),
                    cells - 1,
                    "{algorithm} {width}x{height} seed {seed}: not a spanning tree"
                );
                assert_eq!(flag_count(&grid, CellFlags::VISITED_GEN), cells);
            }
        }
    }
}

/// Re-running any generator with the same seed yields a byte-identical
/// grid; a different seed yields a different one.
#[test]
fn test_determinism() {
    for algorithm in ALL_GENERATORS {
        let first = gen(algorithm, 24, 24, 7, 0.0);
        let second = gen(algorithm, 24, 24, 7, 0.0);
        assert_eq!(
            first.bytes(),
            second.bytes(),
            "{algorithm}: same seed, different grids"
        );
        let other = gen(algorithm, 24, 24, 8, 0.0);
        assert_ne!(
            first.bytes(),
            other.bytes(),
            "{algorithm}: different seed, same grid"
        );
    }
}

/// A perfect 5x5 DFS maze has 24 open edges and a shortest path no
/// shorter than the Manhattan distance.
#[test]
fn test_dfs_5x5_seed_1() {
    let grid = gen(GenAlgorithm::Dfs, 5, 5, 1, 0.0);
    assert_eq!(grid.open_edges(), 24);
    let stats = analyze(&grid, &CancelToken::new()).unwrap();
    assert!(stats.path_length.unwrap() >= 8);
    assert_eq!(
        grid.bytes(),
        gen(GenAlgorithm::Dfs, 5, 5, 1, 0.0).bytes()
    );
}

/// A perfect 10x10 Prim maze is a spanning tree: 99 open edges.
#[test]
fn test_prim_10x10_seed_42() {
    let grid = gen(GenAlgorithm::Prim, 10, 10, 42, 0.0);
    assert_eq!(grid.open_edges(), 99);
    assert_eq!(reachable_cells(&grid), 100);
}

/// Full braiding removes every non-terminal dead end.
#[test]
fn test_full_braid_removes_dead_ends() {
    let grid = gen(GenAlgorithm::Dfs, 20, 20, 7, 1.0);
    let stats = analyze(&grid, &CancelToken::new()).unwrap();
    assert_eq!(stats.dead_ends, 0);
    assert!(grid.is_wall_symmetric());
    assert_eq!(reachable_cells(&grid), 400);
    // Cycles now exist.
    assert!(grid.open_edges() > 399);
}

/// Partial braiding never increases the dead-end count and keeps the
/// maze connected.
#[test]
fn test_partial_braid() {
    for seed in [3, 9, 27] {
        let perfect = analyze(&gen(GenAlgorithm::Dfs, 32, 32, seed, 0.0), &CancelToken::new())
            .unwrap()
            .dead_ends;
        let braided = analyze(&gen(GenAlgorithm::Dfs, 32, 32, seed, 0.5), &CancelToken::new())
            .unwrap()
            .dead_ends;
        assert!(braided < perfect);
        assert_eq!(reachable_cells(&gen(GenAlgorithm::Dfs, 32, 32, seed, 0.5)), 1024);
    }
}

/// Averaged over many runs, the surviving dead-end fraction stays
/// within a 0.1 tolerance of `1 - braid`.
#[cfg(feature = "slow_tests")]
#[test]
fn test_braid_fraction_average() {
    const RUNS: u64 = 64;
    const BRAID: f64 = 0.6;
    let token = CancelToken::new();
    let mut perfect_total = 0;
    let mut braided_total = 0;
    for seed in 0..RUNS {
        perfect_total += analyze(&gen(GenAlgorithm::Dfs, 24, 24, seed, 0.0), &token)
            .unwrap()
            .dead_ends;
        braided_total += analyze(&gen(GenAlgorithm::Dfs, 24, 24, seed, BRAID), &token)
            .unwrap()
            .dead_ends;
    }
    let bound = (1.0 - BRAID + 0.1) * perfect_total as f64;
    assert!(
        (braided_total as f64) <= bound,
        "{braided_total} dead ends left, bound {bound}"
    );
}

/// The organic generator with a small fixed population: connected,
/// perfect, reproducible.
#[test]
fn test_organic_64x64_16_agents() {
    let run = || {
        let mut grid = Grid::new(64, 64).unwrap();
        let mut options = GenOptions::new(GenAlgorithm::Organic, 0);
        options.agents = Some(16);
        generate(&mut grid, &options, &mut NullSink, &CancelToken::new()).unwrap();
        grid
    };
    let grid = run();
    assert_eq!(reachable_cells(&grid), 64 * 64);
    assert_eq!(grid.open_edges(), 64 * 64 - 1);
    assert_eq!(grid.bytes(), run().bytes());
}

/// The fractal generator with block sides that do not divide the
/// dimensions: the residual blocks are smaller but everything stays
/// connected and perfect.
#[test]
fn test_fractal_residual_blocks() {
    for (width, height, block_side) in [(50, 34, 32), (33, 33, 32), (100, 7, 8)] {
        let mut grid = Grid::new(width, height).unwrap();
        let mut options = GenOptions::new(GenAlgorithm::Fractal, 5);
        options.block_side = block_side;
        generate(&mut grid, &options, &mut NullSink, &CancelToken::new()).unwrap();
        assert_eq!(reachable_cells(&grid), width * height);
        assert_eq!(grid.open_edges(), width * height - 1);
        assert!(grid.is_wall_symmetric());
    }
}

/// A cancelled token aborts generation with the typed error.
#[test]
fn test_cancellation() {
    let token = CancelToken::new();
    token.cancel();
    for algorithm in ALL_GENERATORS {
        let mut grid = Grid::new(16, 16).unwrap();
        let err = generate(
            &mut grid,
            &GenOptions::new(algorithm, 0),
            &mut NullSink,
            &token,
        )
        .unwrap_err();
        assert!(err.chain().any(|c| c.downcast_ref::<Cancelled>().is_some()));
    }
}

/// Bad options are rejected before any carving.
#[test]
fn test_option_validation() {
    let mut grid = Grid::new(8, 8).unwrap();
    let mut options = GenOptions::new(GenAlgorithm::Dfs, 0);
    options.braid = 1.5;
    assert!(generate(&mut grid, &options, &mut NullSink, &CancelToken::new()).is_err());

    let mut options = GenOptions::new(GenAlgorithm::Fractal, 0);
    options.block_side = 1;
    assert!(generate(&mut grid, &options, &mut NullSink, &CancelToken::new()).is_err());

    assert!(Grid::new(1, 8).is_err());
    assert!(Grid::new(25_000, 25_000).is_err());
}
