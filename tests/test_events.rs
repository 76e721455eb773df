/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use common::*;
use warren::prelude::*;

/// Replaying a serial generation recording onto a fresh grid of the
/// same dimensions reproduces the original byte-for-byte.
#[test]
fn test_generation_replay() {
    for algorithm in [GenAlgorithm::Dfs, GenAlgorithm::Prim] {
        let mut grid = Grid::new(16, 16).unwrap();
        let mut sink = RecordingSink::new();
        generate(
            &mut grid,
            &GenOptions::new(algorithm, 21),
            &mut sink,
            &CancelToken::new(),
        )
        .unwrap();

        let mut replayed = Grid::new(16, 16).unwrap();
        replay_generation(&mut replayed, sink.events()).unwrap();
        assert_eq!(replayed.bytes(), grid.bytes(), "{algorithm}");
    }
}

/// Parallel generators reproduce the final state through their event
/// stream as well: the interleaving is not pinned down, but the edge
/// set is.
#[test]
fn test_parallel_generation_replay() {
    for algorithm in [GenAlgorithm::Fractal, GenAlgorithm::Organic] {
        let mut grid = Grid::new(40, 24).unwrap();
        let mut sink = RecordingSink::new();
        generate(
            &mut grid,
            &GenOptions::new(algorithm, 6),
            &mut sink,
            &CancelToken::new(),
        )
        .unwrap();

        let mut replayed = Grid::new(40, 24).unwrap();
        replay_generation(&mut replayed, sink.events()).unwrap();
        assert_eq!(replayed.bytes(), grid.bytes(), "{algorithm}");
    }
}

/// A braided recording carries the braiding carves too.
#[test]
fn test_braided_replay() {
    let mut grid = Grid::new(20, 20).unwrap();
    let mut options = GenOptions::new(GenAlgorithm::Dfs, 12);
    options.braid = 0.7;
    let mut sink = RecordingSink::new();
    generate(&mut grid, &options, &mut sink, &CancelToken::new()).unwrap();

    let mut replayed = Grid::new(20, 20).unwrap();
    replay_generation(&mut replayed, sink.events()).unwrap();
    assert_eq!(replayed.bytes(), grid.bytes());
}

/// Replaying a solve recording on top of the generated maze reproduces
/// the visit and path marks.
#[test]
fn test_solve_replay() {
    let mut grid = gen(GenAlgorithm::Dfs, 24, 24, 9, 0.0);
    let pristine = grid.snapshot();

    let mut sink = RecordingSink::new();
    let solution = solve(
        &mut grid,
        &SolveOptions::new(SolveAlgorithm::Bfs, 0),
        &mut sink,
        &CancelToken::new(),
    )
    .unwrap();
    assert!(solution.found);

    // Rebuild the pre-solve grid and apply the recording.
    let (width, height) = pristine.dimensions();
    let mut replayed = Grid::from_bytes(width, height, pristine.bytes().to_vec()).unwrap();
    replay(&mut replayed, sink.events()).unwrap();
    assert_eq!(replayed.bytes(), grid.bytes());
}

/// The channel sink hands the stream to a consumer thread without
/// reordering.
#[test]
fn test_channel_sink() {
    let (mut sink, rx) = ChannelSink::new(1024);
    let collector = std::thread::spawn(move || rx.iter().collect::<Vec<_>>());

    let mut grid = Grid::new(12, 12).unwrap();
    let mut reference = RecordingSink::new();
    generate(
        &mut grid,
        &GenOptions::new(GenAlgorithm::Dfs, 3),
        &mut reference,
        &CancelToken::new(),
    )
    .unwrap();

    let mut replay_grid = Grid::new(12, 12).unwrap();
    generate(
        &mut replay_grid,
        &GenOptions::new(GenAlgorithm::Dfs, 3),
        &mut sink,
        &CancelToken::new(),
    )
    .unwrap();
    drop(sink);

    assert_eq!(collector.join().unwrap(), reference.into_events());
}

/// Replay rejects events pointing outside the grid.
#[test]
fn test_replay_bounds() {
    let mut grid = Grid::new(4, 4).unwrap();
    let events = [Event::visit(9, 0, 0)];
    assert!(matches!(
        replay(&mut grid, &events),
        Err(ReplayError::OutOfBounds { x: 9, y: 0 })
    ));
}
