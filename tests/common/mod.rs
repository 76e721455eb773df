/*
 * SPDX-FileCopyrightText: 2025 The warren developers
 *
 * SPDX-License-Identifier: Apache-2.0 OR LGPL-2.1-or-later
 */

#![allow(dead_code)]

use warren::prelude::*;

pub const ALL_GENERATORS: [GenAlgorithm; 4] = [
    GenAlgorithm::Dfs,
    GenAlgorithm::Prim,
    GenAlgorithm::Fractal,
    GenAlgorithm::Organic,
];

/// Generates a maze, panicking on any failure.
pub fn gen(
    algorithm: GenAlgorithm,
    width: usize,
    height: usize,
    seed: u64,
    braid: f64,
) -> Grid {
    let mut grid = Grid::new(width, height).unwrap();
    let mut options = GenOptions::new(algorithm, seed);
    options.braid = braid;
    generate(&mut grid, &options, &mut NullSink, &CancelToken::new()).unwrap();
    grid
}

/// Solves a maze, panicking on any failure.
pub fn run_solver(grid: &mut Grid, algorithm: SolveAlgorithm, seed: u64) -> Solution {
    solve(
        grid,
        &SolveOptions::new(algorithm, seed),
        &mut NullSink,
        &CancelToken::new(),
    )
    .unwrap()
}

/// Counts the cells reachable from the entrance through open edges,
/// without relying on any crate-side search.
pub fn reachable_cells(grid: &Grid) -> usize {
    let (width, height) = (grid.width(), grid.height());
    let mut seen = vec![false; width * height];
    let mut stack = vec![(0, 0)];
    seen[0] = true;
    let mut count = 0;
    while let Some((x, y)) = stack.pop() {
        count += 1;
        for (nx, ny, dir) in grid.neighbors(x, y) {
            if !grid.has_wall(x, y, dir) && !seen[ny * width + nx] {
                seen[ny * width + nx] = true;
                stack.push((nx, ny));
            }
        }
    }
    count
}

/// Checks the path invariants: endpoints, unit steps over open edges.
pub fn assert_path_valid(grid: &Grid, path: &[(usize, usize)]) {
    assert_eq!(path.first(), Some(&grid.start()));
    assert_eq!(path.last(), Some(&grid.exit()));
    for pair in path.windows(2) {
        let ((x, y), (nx, ny)) = (pair[0], pair[1]);
        let dir = grid
            .neighbors(x, y)
            .find_map(|(cx, cy, dir)| ((cx, cy) == (nx, ny)).then_some(dir))
            .unwrap_or_else(|| panic!("({x}, {y}) and ({nx}, {ny}) are not adjacent"));
        assert!(
            !grid.has_wall(x, y, dir),
            "({x}, {y}) -> ({nx}, {ny}) crosses a wall"
        );
    }
}

/// Counts the cells carrying `flag`.
pub fn flag_count(grid: &Grid, flag: CellFlags) -> usize {
    let (width, height) = (grid.width(), grid.height());
    (0..height)
        .flat_map(|y| (0..width).map(move |x| (x, y)))
        .filter(|&(x, y)| grid.get_flag(x, y, flag))
        .count()
}
