//! Greedy space-filling tour used as a coverage fallback.
//! Construction is heuristic: it can dead-end before covering every free cell or
//! before closing back onto its anchor, and `TourCoverage` reports exactly how far it got.

use std::collections::BTreeMap;

use super::mobility::open_space;
use crate::error::GridError;
use crate::grid::OccupancyGrid;
use crate::types::{Cell, Direction};

/// Order tried after the preferred heading.
const ROTATION: [Direction; 4] = [Direction::Right, Direction::Down, Direction::Left, Direction::Up];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TourCoverage {
    pub visited: usize,
    /// Free cells reachable from the anchor, anchor included.
    pub free_cells: usize,
    /// Last cell is adjacent to the anchor, so the tour can loop.
    pub closes_cycle: bool,
}

impl TourCoverage {
    pub fn is_complete(&self) -> bool {
        self.closes_cycle && self.visited == self.free_cells
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClosedTour {
    cells: Vec<Cell>,
    positions: BTreeMap<Cell, usize>,
    coverage: TourCoverage,
}

impl ClosedTour {
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn anchor(&self) -> Option<Cell> {
        self.cells.first().copied()
    }

    pub fn coverage(&self) -> TourCoverage {
        self.coverage
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.positions.contains_key(&cell)
    }

    /// Successor of `cell`. The last cell wraps to the anchor only when the tour closes.
    pub fn next_after(&self, cell: Cell) -> Option<Cell> {
        let index = *self.positions.get(&cell)?;
        match self.cells.get(index + 1) {
            Some(next) => Some(*next),
            None if self.coverage.closes_cycle => self.anchor(),
            None => None,
        }
    }
}

fn preference_order(heading: Direction) -> [Direction; 4] {
    let mut order = [heading; 4];
    for (slot, dir) in order.iter_mut().skip(1).zip(ROTATION.into_iter().filter(|d| *d != heading)) {
        *slot = dir;
    }
    order
}

/// Builds a tour anchored at `start`, continuing straight whenever possible.
/// Blocked cells other than `start` are never entered.
pub fn build_tour(
    grid: &OccupancyGrid,
    start: Cell,
    preferred_heading: Direction,
) -> Result<ClosedTour, GridError> {
    let config = grid.config();
    config.check(start)?;

    let mut visited = vec![false; config.cell_count()];
    let mut cells = vec![start];
    let mut positions = BTreeMap::new();
    positions.insert(start, 0);
    if let Some(index) = config.index(start) {
        visited[index] = true;
    }

    let mut heading = preferred_heading;
    let mut current = start;
    while cells.len() < config.cell_count() {
        let accepted = preference_order(heading).into_iter().find_map(|dir| {
            let next = config.step(current, dir)?;
            let index = config.index(next)?;
            (!visited[index] && grid.is_free(next)).then_some((dir, next, index))
        });
        let Some((dir, next, index)) = accepted else {
            break;
        };
        visited[index] = true;
        positions.insert(next, cells.len());
        cells.push(next);
        heading = dir;
        current = next;
    }

    let mut anchored = grid.clone();
    anchored.unblock(start);
    let closes_cycle = cells.len() >= 4 && config.are_adjacent(current, start);
    let coverage =
        TourCoverage { visited: cells.len(), free_cells: open_space(&anchored, start), closes_cycle };
    Ok(ClosedTour { cells, positions, coverage })
}
