/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

mod common;

use common::*;
use warren::prelude::*;
use warren::storage::event_log::{read_events, write_events};
use warren::storage::{read_maze, read_maze_from, write_maze, write_maze_to, FormatError};

/// A 200x200 maze round-trips byte-for-byte through a file, in both
/// the compressed and the raw form.
#[test]
fn test_maze_round_trip() {
    let grid = gen(GenAlgorithm::Dfs, 200, 200, 31, 0.0);
    let metadata = vec![
        ("algo".to_owned(), "dfs".to_owned()),
        ("seed".to_owned(), "31".to_owned()),
    ];

    for compress in [false, true] {
        let mut buffer = Vec::new();
        write_maze_to(&mut buffer, &grid, &metadata, compress).unwrap();
        let (read, read_metadata) = read_maze_from(&mut &buffer[..]).unwrap();
        assert_eq!(read.dimensions(), grid.dimensions());
        assert_eq!(read.bytes(), grid.bytes(), "compress = {compress}");
        assert_eq!(read_metadata, metadata);
    }
}

/// Round trip through an actual file, with the size-based compression
/// choice left to the writer.
#[test]
fn test_maze_file_round_trip() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("maze.maze");
    let grid = gen(GenAlgorithm::Prim, 64, 48, 8, 0.25);
    write_maze(&path, &grid, &[]).unwrap();
    let (read, metadata) = read_maze(&path).unwrap();
    assert_eq!(read.bytes(), grid.bytes());
    assert!(metadata.is_empty());
}

/// The solver marks survive the round trip too: the cell bytes are
/// stored verbatim.
#[test]
fn test_round_trip_preserves_marks() {
    let mut grid = gen(GenAlgorithm::Dfs, 32, 32, 4, 0.0);
    run_solver(&mut grid, SolveAlgorithm::Astar, 0);
    let mut buffer = Vec::new();
    write_maze_to(&mut buffer, &grid, &[], true).unwrap();
    let (read, _) = read_maze_from(&mut &buffer[..]).unwrap();
    assert_eq!(read.bytes(), grid.bytes());
    assert_eq!(
        flag_count(&read, CellFlags::ON_PATH),
        flag_count(&grid, CellFlags::ON_PATH)
    );
}

#[test]
fn test_corrupt_files_are_rejected() {
    let grid = gen(GenAlgorithm::Dfs, 8, 8, 0, 0.0);
    let mut buffer = Vec::new();
    write_maze_to(&mut buffer, &grid, &[], false).unwrap();

    // Magic.
    let mut bad = buffer.clone();
    bad[0] = b'X';
    assert!(matches!(
        read_maze_from(&mut &bad[..]).unwrap_err().downcast_ref::<FormatError>(),
        Some(FormatError::BadMagic { .. })
    ));

    // Version from the future.
    let mut bad = buffer.clone();
    bad[4] = 0xFE;
    assert!(matches!(
        read_maze_from(&mut &bad[..]).unwrap_err().downcast_ref::<FormatError>(),
        Some(FormatError::UnsupportedVersion(_))
    ));

    // Truncation.
    let bad = &buffer[..buffer.len() - 7];
    assert!(matches!(
        read_maze_from(&mut &bad[..]).unwrap_err().downcast_ref::<FormatError>(),
        Some(FormatError::Truncated)
    ));

    // Zero dimensions.
    let mut bad = buffer.clone();
    bad[6..10].fill(0);
    assert!(matches!(
        read_maze_from(&mut &bad[..]).unwrap_err().downcast_ref::<FormatError>(),
        Some(FormatError::BadDimensions { .. })
    ));
}

/// Event logs round-trip through files, raw and compressed.
#[test]
fn test_event_log_file_round_trip() {
    let mut grid = Grid::new(16, 16).unwrap();
    let mut sink = RecordingSink::new();
    generate(
        &mut grid,
        &GenOptions::new(GenAlgorithm::Dfs, 77),
        &mut sink,
        &CancelToken::new(),
    )
    .unwrap();
    let events = sink.into_events();
    assert!(!events.is_empty());

    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("gen.events");
    write_events(&path, &events).unwrap();
    assert_eq!(read_events(&path).unwrap(), events);
}
