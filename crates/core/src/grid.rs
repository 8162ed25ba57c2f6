//! Grid dimensions, neighbour stepping, and the per-tick occupancy grid.
//! This module exists so every other component asks one place what is in bounds and what is free.
//! It does not own the body or any routing policy.

use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::error::GridError;
use crate::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub width: u32,
    pub height: u32,
    /// Toroidal when set: stepping off an edge re-enters on the opposite edge.
    pub wrap: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { width: 24, height: 24, wrap: false }
    }
}

impl GridConfig {
    pub const fn bounded(width: u32, height: u32) -> Self {
        Self { width, height, wrap: false }
    }

    pub const fn toroidal(width: u32, height: u32) -> Self {
        Self { width, height, wrap: true }
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.width == 0 || self.height == 0 {
            return Err(GridError::ZeroSize { width: self.width, height: self.height });
        }
        if i32::try_from(self.width).is_err() || i32::try_from(self.height).is_err() {
            return Err(GridError::TooLarge { width: self.width, height: self.height });
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.col >= 0
            && cell.row >= 0
            && (cell.col as u32) < self.width
            && (cell.row as u32) < self.height
    }

    pub fn check(&self, cell: Cell) -> Result<(), GridError> {
        if self.contains(cell) {
            Ok(())
        } else {
            Err(GridError::OutOfBounds { cell, width: self.width, height: self.height })
        }
    }

    pub fn index(&self, cell: Cell) -> Option<usize> {
        self.contains(cell).then(|| cell.row as usize * self.width as usize + cell.col as usize)
    }

    pub fn cell_at_index(&self, index: usize) -> Cell {
        let width = self.width as usize;
        Cell { col: (index % width) as i32, row: (index / width) as i32 }
    }

    /// Row-major iteration over every cell.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.cell_count()).map(|index| self.cell_at_index(index))
    }

    pub fn center(&self) -> Cell {
        Cell { col: (self.width / 2) as i32, row: (self.height / 2) as i32 }
    }

    /// The neighbour of `cell` in `dir`, or `None` when the move leaves a bounded grid.
    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        let moved = cell.offset(dir);
        if self.contains(moved) {
            return Some(moved);
        }
        if !self.wrap || !self.contains(cell) {
            return None;
        }
        let wrapped = Cell {
            col: moved.col.rem_euclid(self.width as i32),
            row: moved.row.rem_euclid(self.height as i32),
        };
        (wrapped != cell).then_some(wrapped)
    }

    /// Distinct neighbours in `Direction::EVALUATION_ORDER`. On a torus two cells
    /// wide, both horizontal steps land on the same cell and it is yielded once.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let order = Direction::EVALUATION_ORDER;
        order.into_iter().enumerate().filter_map(move |(position, dir)| {
            let next = self.step(cell, dir)?;
            let repeated =
                order[..position].iter().any(|earlier| self.step(cell, *earlier) == Some(next));
            (!repeated).then_some(next)
        })
    }

    pub fn direction_between(&self, from: Cell, to: Cell) -> Option<Direction> {
        Direction::EVALUATION_ORDER.into_iter().find(|dir| self.step(from, *dir) == Some(to))
    }

    pub fn are_adjacent(&self, a: Cell, b: Cell) -> bool {
        self.direction_between(a, b).is_some()
    }

    /// Manhattan distance; on a torus each axis takes the shorter way round.
    pub fn distance(&self, a: Cell, b: Cell) -> u32 {
        let dc = a.col.abs_diff(b.col);
        let dr = a.row.abs_diff(b.row);
        if self.wrap {
            dc.min(self.width.saturating_sub(dc)) + dr.min(self.height.saturating_sub(dr))
        } else {
            dc + dr
        }
    }

    pub fn cell_at_pixel(&self, px: u32, py: u32, cell_px: u32) -> Result<Cell, GridError> {
        if cell_px == 0 {
            return Err(GridError::ZeroCellSize);
        }
        let cell = Cell { col: (px / cell_px) as i32, row: (py / cell_px) as i32 };
        if !self.contains(cell) {
            return Err(GridError::PixelOutOfBounds { px, py });
        }
        Ok(cell)
    }

    /// Top-left pixel of `cell` for a renderer drawing `cell_px`-sized squares.
    pub fn pixel_origin(&self, cell: Cell, cell_px: u32) -> Result<(u32, u32), GridError> {
        if cell_px == 0 {
            return Err(GridError::ZeroCellSize);
        }
        self.check(cell)?;
        Ok((cell.col as u32 * cell_px, cell.row as u32 * cell_px))
    }
}

/// Blocked/free flags for every cell, rebuilt each decision.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OccupancyGrid {
    config: GridConfig,
    blocked: Vec<bool>,
    blocked_count: usize,
}

impl OccupancyGrid {
    pub fn new(config: GridConfig) -> Result<Self, GridError> {
        config.validate()?;
        Ok(Self { config, blocked: vec![false; config.cell_count()], blocked_count: 0 })
    }

    pub fn from_cells<I>(config: GridConfig, cells: I) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Cell>,
    {
        let mut grid = Self::new(config)?;
        for cell in cells {
            config.check(cell)?;
            grid.block(cell);
        }
        Ok(grid)
    }

    /// Occupancy as seen by the next move: the tail is left free when the body
    /// is at its target length, because it vacates as the head advances.
    pub fn for_move(body: &Body) -> Result<Self, GridError> {
        let vacating = body.vacating_tail();
        Self::from_cells(body.config(), body.cells().filter(|cell| Some(*cell) != vacating))
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    /// Out-of-bounds cells read as blocked.
    pub fn is_blocked(&self, cell: Cell) -> bool {
        self.config.index(cell).is_none_or(|index| self.blocked[index])
    }

    pub fn is_free(&self, cell: Cell) -> bool {
        !self.is_blocked(cell)
    }

    /// Returns whether the flag changed.
    pub fn block(&mut self, cell: Cell) -> bool {
        self.set(cell, true)
    }

    pub fn unblock(&mut self, cell: Cell) -> bool {
        self.set(cell, false)
    }

    fn set(&mut self, cell: Cell, value: bool) -> bool {
        let Some(index) = self.config.index(cell) else {
            return false;
        };
        if self.blocked[index] == value {
            return false;
        }
        self.blocked[index] = value;
        if value {
            self.blocked_count += 1;
        } else {
            self.blocked_count -= 1;
        }
        true
    }

    pub fn free_count(&self) -> usize {
        self.blocked.len() - self.blocked_count
    }

    pub fn free_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.config.cells().filter(|cell| self.is_free(*cell))
    }

    pub fn step(&self, cell: Cell, dir: Direction) -> Option<Cell> {
        self.config.step(cell, dir)
    }

    pub fn snapshot(&self) -> OccupancySnapshot {
        let mut bits = vec![0u64; self.blocked.len().div_ceil(64)];
        for (index, blocked) in self.blocked.iter().enumerate() {
            if *blocked {
                bits[index / 64] |= 1 << (index % 64);
            }
        }
        OccupancySnapshot { config: self.config, bits: bits.into_boxed_slice() }
    }
}

/// Frozen bitset of a blocked set. Equal snapshots mean identical occupancy.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OccupancySnapshot {
    config: GridConfig,
    bits: Box<[u64]>,
}

impl OccupancySnapshot {
    pub fn blocked_count(&self) -> u32 {
        self.bits.iter().map(|word| word.count_ones()).sum()
    }
}
