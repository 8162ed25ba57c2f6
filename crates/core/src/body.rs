//! The agent's chain of cells, head first.

use std::collections::{BTreeSet, VecDeque};

use crate::error::GridError;
use crate::grid::GridConfig;
use crate::types::{Cell, Direction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Body {
    config: GridConfig,
    cells: VecDeque<Cell>,
    target_len: usize,
}

impl Body {
    pub fn new<I>(config: GridConfig, cells: I, target_len: usize) -> Result<Self, GridError>
    where
        I: IntoIterator<Item = Cell>,
    {
        config.validate()?;
        let cells: VecDeque<Cell> = cells.into_iter().collect();
        if cells.is_empty() {
            return Err(GridError::EmptyBody);
        }
        let mut seen = BTreeSet::new();
        for cell in &cells {
            config.check(*cell)?;
            if !seen.insert(*cell) {
                return Err(GridError::DuplicateBodyCell(*cell));
            }
        }
        for (from, to) in cells.iter().zip(cells.iter().skip(1)) {
            if !config.are_adjacent(*from, *to) {
                return Err(GridError::NotAdjacent { from: *from, to: *to });
            }
        }
        if target_len < cells.len() {
            return Err(GridError::TargetLengthTooShort { target_len, occupied: cells.len() });
        }
        Ok(Self { config, cells, target_len })
    }

    pub fn single(config: GridConfig, cell: Cell, target_len: usize) -> Result<Self, GridError> {
        Self::new(config, [cell], target_len.max(1))
    }

    pub fn config(&self) -> GridConfig {
        self.config
    }

    pub fn head(&self) -> Cell {
        self.cells[0]
    }

    pub fn tail(&self) -> Cell {
        self.cells[self.cells.len() - 1]
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().copied()
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.cells.contains(&cell)
    }

    /// The tail cell that the next move frees, if the body is not still growing.
    pub fn vacating_tail(&self) -> Option<Cell> {
        (self.cells.len() >= self.target_len).then(|| self.tail())
    }

    /// Direction of the most recent move.
    pub fn heading(&self) -> Option<Direction> {
        let neck = *self.cells.get(1)?;
        self.config.direction_between(neck, self.head())
    }

    /// Moves the head onto `next`. Nothing changes when the move is illegal.
    pub fn advance(&mut self, next: Cell) -> Result<(), GridError> {
        self.config.check(next)?;
        let head = self.head();
        if !self.config.are_adjacent(head, next) {
            return Err(GridError::NotAdjacent { from: head, to: next });
        }
        if self.contains(next) && Some(next) != self.vacating_tail() {
            return Err(GridError::SelfIntersection(next));
        }
        if self.cells.len() >= self.target_len {
            self.cells.pop_back();
        }
        self.cells.push_front(next);
        Ok(())
    }

    pub fn grow(&mut self) {
        self.target_len += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GridConfig {
        GridConfig::bounded(6, 6)
    }

    #[test]
    fn new_body_rejects_broken_chains() {
        assert_eq!(Body::new(config(), [], 3), Err(GridError::EmptyBody));
        assert_eq!(
            Body::new(config(), [Cell::new(1, 1), Cell::new(1, 2), Cell::new(1, 1)], 3),
            Err(GridError::DuplicateBodyCell(Cell::new(1, 1)))
        );
        assert_eq!(
            Body::new(config(), [Cell::new(1, 1), Cell::new(3, 1)], 3),
            Err(GridError::NotAdjacent { from: Cell::new(1, 1), to: Cell::new(3, 1) })
        );
        assert_eq!(
            Body::new(config(), [Cell::new(1, 1), Cell::new(2, 1)], 1),
            Err(GridError::TargetLengthTooShort { target_len: 1, occupied: 2 })
        );
    }

    #[test]
    fn growing_body_keeps_tail_until_target_length() {
        let mut body = Body::single(config(), Cell::new(2, 2), 3).expect("body");
        body.advance(Cell::new(3, 2)).expect("move right");
        body.advance(Cell::new(4, 2)).expect("move right");
        assert_eq!(body.len(), 3);
        assert_eq!(body.tail(), Cell::new(2, 2));
        assert_eq!(body.heading(), Some(Direction::Right));

        body.advance(Cell::new(4, 3)).expect("move down");
        assert_eq!(body.len(), 3);
        assert_eq!(body.tail(), Cell::new(3, 2));
        assert_eq!(body.heading(), Some(Direction::Down));
    }

    #[test]
    fn moving_into_vacating_tail_is_allowed() {
        let cells = [Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2), Cell::new(1, 2)];
        let mut body = Body::new(config(), cells, 4).expect("body");
        body.advance(Cell::new(1, 2)).expect("tail vacates this tick");
        assert_eq!(body.head(), Cell::new(1, 2));
        assert_eq!(body.len(), 4);
    }

    #[test]
    fn illegal_move_leaves_body_untouched() {
        let cells = [Cell::new(1, 1), Cell::new(2, 1), Cell::new(2, 2), Cell::new(1, 2)];
        let mut body = Body::new(config(), cells, 5).expect("body");
        let before = body.clone();
        assert_eq!(body.advance(Cell::new(1, 2)), Err(GridError::SelfIntersection(Cell::new(1, 2))));
        assert_eq!(
            body.advance(Cell::new(3, 3)),
            Err(GridError::NotAdjacent { from: Cell::new(1, 1), to: Cell::new(3, 3) })
        );
        assert_eq!(body, before);
    }
}
