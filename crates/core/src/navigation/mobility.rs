//! Open-space flood fill and bounded lookahead over hypothetical moves.
//! Both walk the grid with explicit queues/stacks so large grids never hit call-depth limits.

use std::collections::{BTreeMap, VecDeque};

use crate::config::LookaheadConfig;
use crate::grid::{OccupancyGrid, OccupancySnapshot};
use crate::types::{Cell, Direction};

/// Free cells reachable from `start` with 4-directional moves, `start` included.
/// A blocked or out-of-bounds start has no open space.
pub fn open_space(grid: &OccupancyGrid, start: Cell) -> usize {
    if grid.is_blocked(start) {
        return 0;
    }
    let config = grid.config();
    let mut visited = vec![false; config.cell_count()];
    let mut queue = VecDeque::new();
    let mut count = 0;

    if let Some(index) = config.index(start) {
        visited[index] = true;
    }
    queue.push_back(start);

    while let Some(current) = queue.pop_front() {
        count += 1;
        for next in config.neighbors(current) {
            let Some(index) = config.index(next) else {
                continue;
            };
            if !visited[index] && grid.is_free(next) {
                visited[index] = true;
                queue.push_back(next);
            }
        }
    }
    count
}

/// Unblocked 4-neighbours of `cell`.
pub fn free_neighbors(grid: &OccupancyGrid, cell: Cell) -> u32 {
    grid.config().neighbors(cell).filter(|next| grid.is_free(*next)).count() as u32
}

/// Highest score `future_mobility` can return at `depth`: each step loses at
/// least the cell it came from.
pub fn mobility_ceiling(depth: u32) -> u32 {
    3 * depth
}

#[derive(Clone, Copy, Debug)]
struct Frame {
    cell: Cell,
    remaining: u32,
    next_dir: usize,
    gain: u32,
    best: u32,
}

/// Best cumulative free-neighbour count over every self-avoiding move sequence of
/// `depth` steps from `position`. `position` counts as occupied while exploring.
pub fn future_mobility(grid: &OccupancyGrid, position: Cell, depth: u32) -> u32 {
    if depth == 0 || !grid.config().contains(position) {
        return 0;
    }
    let mut scratch = grid.clone();
    scratch.block(position);

    let mut stack = vec![Frame { cell: position, remaining: depth, next_dir: 0, gain: 0, best: 0 }];
    while let Some(frame) = stack.last_mut() {
        if frame.remaining == 0 || frame.next_dir == Direction::EVALUATION_ORDER.len() {
            let Some(done) = stack.pop() else {
                break;
            };
            let Some(parent) = stack.last_mut() else {
                return done.best;
            };
            scratch.unblock(done.cell);
            parent.best = parent.best.max(done.gain + done.best);
            continue;
        }

        let dir = Direction::EVALUATION_ORDER[frame.next_dir];
        frame.next_dir += 1;
        let remaining = frame.remaining - 1;
        let Some(next) = scratch.step(frame.cell, dir) else {
            continue;
        };
        if scratch.is_blocked(next) {
            continue;
        }
        scratch.block(next);
        let gain = free_neighbors(&scratch, next);
        stack.push(Frame { cell: next, remaining, next_dir: 0, gain, best: 0 });
    }
    0
}

/// Lookahead depth for the current body length: deeper while the body is short,
/// shallower as it grows, never below `min_depth`.
pub fn lookahead_depth(body_len: usize, lookahead: LookaheadConfig) -> u32 {
    let shrink = (body_len / lookahead.shrink_every.max(1) as usize) as u32;
    lookahead.max_depth.saturating_sub(shrink).max(lookahead.min_depth)
}

/// Memo for `future_mobility`, valid for exactly one occupancy layout.
#[derive(Clone, Debug, Default)]
pub struct MobilityCache {
    snapshot: Option<OccupancySnapshot>,
    entries: BTreeMap<(Cell, u32), u32>,
    hits: u64,
    misses: u64,
}

impl MobilityCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Scopes the cache to `grid`, dropping every entry recorded for a different layout.
    pub fn bind<'a>(&'a mut self, grid: &'a OccupancyGrid) -> MobilityScope<'a> {
        let snapshot = grid.snapshot();
        if self.snapshot.as_ref() != Some(&snapshot) {
            self.entries.clear();
            self.snapshot = Some(snapshot);
        }
        MobilityScope { grid, cache: self }
    }

    pub fn clear(&mut self) {
        self.snapshot = None;
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }
}

pub struct MobilityScope<'a> {
    grid: &'a OccupancyGrid,
    cache: &'a mut MobilityCache,
}

impl<'a> MobilityScope<'a> {
    pub fn grid(&self) -> &'a OccupancyGrid {
        self.grid
    }

    pub fn future_mobility(&mut self, position: Cell, depth: u32) -> u32 {
        if let Some(score) = self.cache.entries.get(&(position, depth)).copied() {
            self.cache.hits += 1;
            return score;
        }
        self.cache.misses += 1;
        let score = future_mobility(self.grid, position, depth);
        self.cache.entries.insert((position, depth), score);
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use crate::navigation::test_support::*;

    #[test]
    fn open_space_counts_the_whole_empty_grid() {
        let grid = empty_grid(6, 4);
        assert_eq!(open_space(&grid, Cell::new(3, 2)), 24);
    }

    #[test]
    fn open_space_stops_at_walls() {
        let grid = grid_with_blocks(5, 5, &[(2, 0), (2, 1), (2, 2), (2, 3), (2, 4)]);
        assert_eq!(open_space(&grid, Cell::new(0, 0)), 10);
        assert_eq!(open_space(&grid, Cell::new(2, 2)), 0, "blocked start has no space");
        assert_eq!(open_space(&grid, Cell::new(9, 9)), 0, "outside start has no space");
    }

    #[test]
    fn open_space_never_grows_when_obstacles_are_added() {
        let mut grid = empty_grid(7, 7);
        let start = Cell::new(0, 0);
        let mut previous = open_space(&grid, start);
        for (col, row) in [(3, 3), (1, 0), (0, 2), (1, 1), (6, 6)] {
            grid.block(Cell::new(col, row));
            let current = open_space(&grid, start);
            assert!(current <= previous, "open space grew from {previous} to {current}");
            previous = current;
        }
    }

    #[test]
    fn free_neighbors_ignores_edges_and_blocks() {
        let grid = grid_with_blocks(4, 4, &[(1, 0)]);
        assert_eq!(free_neighbors(&grid, Cell::new(0, 0)), 1);
        assert_eq!(free_neighbors(&grid, Cell::new(2, 2)), 4);
    }

    #[test]
    fn narrow_torus_counts_a_wrapped_neighbour_once() {
        let grid = OccupancyGrid::new(GridConfig::toroidal(2, 2)).expect("grid");
        let corner = Cell::new(0, 0);
        assert_eq!(free_neighbors(&grid, corner), 2);
        assert_eq!(open_space(&grid, corner), 4);
        for depth in 1..=3 {
            assert!(future_mobility(&grid, corner, depth) <= mobility_ceiling(depth));
        }
    }

    #[test]
    fn future_mobility_depth_zero_is_zero() {
        let grid = empty_grid(5, 5);
        assert_eq!(future_mobility(&grid, Cell::new(2, 2), 0), 0);
    }

    #[test]
    fn future_mobility_in_open_space_reaches_ceiling() {
        let grid = empty_grid(9, 9);
        for depth in 1..=4 {
            assert_eq!(future_mobility(&grid, Cell::new(4, 4), depth), mobility_ceiling(depth));
        }
    }

    #[test]
    fn future_mobility_in_dead_end_is_small() {
        // Corridor along row 0 closed at column 3.
        let grid = grid_with_blocks(4, 2, &[(0, 1), (1, 1), (2, 1), (3, 1), (3, 0)]);
        // From (0,0): only move is right to (1,0) (gain 1), then (2,0) (gain 0).
        assert_eq!(future_mobility(&grid, Cell::new(0, 0), 1), 1);
        assert_eq!(future_mobility(&grid, Cell::new(0, 0), 3), 1);
    }

    #[test]
    fn future_mobility_leaves_grid_untouched() {
        let grid = grid_with_blocks(5, 5, &[(1, 1)]);
        let before = grid.snapshot();
        let _ = future_mobility(&grid, Cell::new(2, 2), 4);
        assert_eq!(grid.snapshot(), before);
    }

    #[test]
    fn lookahead_depth_shrinks_with_body_length() {
        let lookahead = LookaheadConfig { max_depth: 8, min_depth: 3, shrink_every: 16 };
        assert_eq!(lookahead_depth(1, lookahead), 8);
        assert_eq!(lookahead_depth(16, lookahead), 7);
        assert_eq!(lookahead_depth(64, lookahead), 4);
        assert_eq!(lookahead_depth(500, lookahead), 3);
    }

    #[test]
    fn cache_is_cleared_when_occupancy_changes() {
        let mut grid = empty_grid(6, 6);
        let mut cache = MobilityCache::new();
        {
            let mut scope = cache.bind(&grid);
            // (0,1) keeps two options open, then (1,1) keeps three.
            assert_eq!(scope.future_mobility(Cell::new(0, 0), 2), 5);
            assert_eq!(scope.future_mobility(Cell::new(0, 0), 2), 5);
        }
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);

        grid.block(Cell::new(1, 0));
        let mut scope = cache.bind(&grid);
        let fresh = scope.future_mobility(Cell::new(0, 0), 2);
        assert_eq!(fresh, future_mobility(&grid, Cell::new(0, 0), 2));
        assert_eq!(cache.misses(), 2, "stale entry must not be reused");
    }
}
