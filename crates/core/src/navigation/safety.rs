//! Approves or rejects candidate head positions by the open space they leave reachable.

use super::mobility::open_space;
use crate::body::Body;
use crate::grid::OccupancyGrid;
use crate::types::Cell;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SafetyOracle {
    /// Minimum open space demanded even for a short body.
    pub floor: usize,
}

impl SafetyOracle {
    pub const fn new(floor: usize) -> Self {
        Self { floor }
    }

    pub fn threshold(&self, body_len: usize) -> usize {
        self.floor.max(body_len)
    }

    /// True iff `candidate` is free and the region reachable from it is
    /// strictly larger than the threshold for `body_len`.
    pub fn is_safe(&self, grid: &OccupancyGrid, candidate: Cell, body_len: usize) -> bool {
        if grid.is_blocked(candidate) {
            return false;
        }
        open_space(grid, candidate) > self.threshold(body_len)
    }

    /// Walks a copy of `body` along `path` and checks that every step is legal,
    /// the first step is safe, and that after arriving (and growing) the head
    /// still has more room than the body needs.
    pub fn verify_path(&self, body: &Body, path: &[Cell]) -> bool {
        let Some(first) = path.first().copied() else {
            return false;
        };
        let Ok(grid) = OccupancyGrid::for_move(body) else {
            return false;
        };
        if !self.is_safe(&grid, first, body.len()) {
            return false;
        }

        let mut simulated = body.clone();
        for cell in path {
            if simulated.advance(*cell).is_err() {
                return false;
            }
        }
        simulated.grow();

        let Ok(mut arrived) = OccupancyGrid::for_move(&simulated) else {
            return false;
        };
        let head = simulated.head();
        arrived.unblock(head);
        open_space(&arrived, head).saturating_sub(1) > self.threshold(simulated.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::navigation::search::find_path;
    use crate::navigation::test_support::*;

    #[test]
    fn threshold_is_floor_or_body_length() {
        let oracle = SafetyOracle::new(5);
        assert_eq!(oracle.threshold(2), 5);
        assert_eq!(oracle.threshold(12), 12);
    }

    #[test]
    fn occupied_and_outside_cells_are_never_safe() {
        let oracle = SafetyOracle::new(0);
        let grid = grid_with_blocks(6, 6, &[(2, 2)]);
        assert!(!oracle.is_safe(&grid, Cell::new(2, 2), 1));
        assert!(!oracle.is_safe(&grid, Cell::new(6, 0), 1));
        assert!(!oracle.is_safe(&grid, Cell::new(-1, 3), 1));
        assert!(oracle.is_safe(&grid, Cell::new(3, 3), 1));
    }

    #[test]
    fn pocket_smaller_than_body_is_rejected() {
        // A 2x2 pocket in the top-left corner sealed by a wall.
        let grid = grid_with_blocks(6, 6, &[(2, 0), (2, 1), (0, 2), (1, 2)]);
        let oracle = SafetyOracle::new(5);
        assert!(!oracle.is_safe(&grid, Cell::new(0, 0), 3));
        assert!(oracle.is_safe(&grid, Cell::new(4, 4), 3));
        assert!(!oracle.is_safe(&grid, Cell::new(4, 4), 40), "long body needs more room than exists");
    }

    #[test]
    fn verify_path_accepts_open_route() {
        let config = GridConfig::bounded(8, 8);
        let body = Body::new(config, [Cell::new(2, 2), Cell::new(1, 2), Cell::new(0, 2)], 3)
            .expect("body");
        let grid = OccupancyGrid::for_move(&body).expect("grid");
        let path = find_path(&grid, body.head(), Cell::new(5, 5));
        assert!(SafetyOracle::new(5).verify_path(&body, &path));
    }

    #[test]
    fn verify_path_rejects_route_into_sealed_pocket() {
        // Body walls off the top-left 2x2 pocket; the target sits inside it.
        let config = GridConfig::bounded(8, 8);
        let cells = [
            Cell::new(0, 2),
            Cell::new(1, 2),
            Cell::new(2, 2),
            Cell::new(2, 1),
            Cell::new(2, 0),
            Cell::new(3, 0),
        ];
        let body = Body::new(config, cells, 6).expect("body");
        let path = [Cell::new(0, 1)];
        assert!(!SafetyOracle::new(5).verify_path(&body, &path));
    }

    #[test]
    fn verify_path_rejects_empty_or_broken_paths() {
        let config = GridConfig::bounded(8, 8);
        let body = Body::single(config, Cell::new(3, 3), 3).expect("body");
        let oracle = SafetyOracle::new(5);
        assert!(!oracle.verify_path(&body, &[]));
        assert!(!oracle.verify_path(&body, &[Cell::new(5, 5)]));
    }
}
