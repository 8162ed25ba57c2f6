//! Shared test fixtures for the `navigation` submodule test suites.
//! This module exists to avoid repeating grid and body setup across many tests.
//! It does not own production navigation logic.

use crate::body::Body;
use crate::grid::{GridConfig, OccupancyGrid};
use crate::types::Cell;

pub(super) fn empty_grid(width: u32, height: u32) -> OccupancyGrid {
    OccupancyGrid::new(GridConfig::bounded(width, height)).expect("fixture grid")
}

pub(super) fn grid_with_blocks(width: u32, height: u32, blocks: &[(i32, i32)]) -> OccupancyGrid {
    let cells = blocks.iter().map(|(col, row)| Cell::new(*col, *row));
    OccupancyGrid::from_cells(GridConfig::bounded(width, height), cells).expect("fixture grid")
}

pub(super) fn body_from(width: u32, height: u32, cells: &[(i32, i32)], target_len: usize) -> Body {
    let cells = cells.iter().map(|(col, row)| Cell::new(*col, *row));
    Body::new(GridConfig::bounded(width, height), cells, target_len).expect("fixture body")
}

/// A ring of body cells around the single interior cell `(2, 2)` of a 7x7 grid,
/// head at `(1, 2)`, with everything outside the ring left free.
pub(super) fn ring_around_pocket_fixture() -> Body {
    body_from(
        7,
        7,
        &[
            (1, 2),
            (1, 1),
            (2, 1),
            (3, 1),
            (3, 2),
            (3, 3),
            (2, 3),
            (1, 3),
        ],
        9,
    )
}

pub(super) fn assert_steps_are_adjacent(config: GridConfig, start: Cell, path: &[Cell]) {
    let mut previous = start;
    for cell in path {
        assert!(config.are_adjacent(previous, *cell), "{previous} -> {cell} is not a single step");
        previous = *cell;
    }
}
