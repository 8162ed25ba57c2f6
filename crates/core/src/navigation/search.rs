//! Shortest-path search over the occupancy grid.
//! Plain A* with a Manhattan heuristic, plus a Dijkstra variant that charges extra for
//! stepping into cells with few future options.

use std::collections::{BTreeMap, BTreeSet};

use super::mobility::{MobilityScope, mobility_ceiling};
use crate::grid::OccupancyGrid;
use crate::types::Cell;

/// Cost of one step in the weighted variant; penalties are expressed in the same units.
pub const STEP_COST: u32 = 10;
/// Lookahead depth used to price each relaxed neighbour in the weighted variant.
pub const PENALTY_LOOKAHEAD_DEPTH: u32 = 3;

/// Frontier entry. Ordering on `(cost, seq)` gives lowest cost first and FIFO among ties.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
struct OpenNode {
    cost: u32,
    seq: u64,
    cell: Cell,
}

/// Cells from `start` (exclusive) to `goal` (inclusive); empty when unreachable or already there.
pub fn find_path(grid: &OccupancyGrid, start: Cell, goal: Cell) -> Vec<Cell> {
    let config = grid.config();
    search(grid, start, goal, |_, next| (1, config.distance(next, goal)))
}

/// Risk-averse routing: each step into `next` costs `STEP_COST` plus
/// `penalty_per_missing_option` for every lookahead option `next` lacks.
/// No heuristic, so this is Dijkstra; paths may be longer than the Manhattan distance.
pub fn find_weighted_path(
    scope: &mut MobilityScope<'_>,
    start: Cell,
    goal: Cell,
    penalty_per_missing_option: u32,
) -> Vec<Cell> {
    let grid = scope.grid();
    let ceiling = mobility_ceiling(PENALTY_LOOKAHEAD_DEPTH);
    search(grid, start, goal, |_, next| {
        let mobility = scope.future_mobility(next, PENALTY_LOOKAHEAD_DEPTH);
        let deficit = ceiling.saturating_sub(mobility);
        (STEP_COST.saturating_add(penalty_per_missing_option.saturating_mul(deficit)), 0)
    })
}

/// Best-first search shared by both variants. `price(current, next)` returns the
/// step cost and the heuristic estimate for `next`.
fn search<Price>(grid: &OccupancyGrid, start: Cell, goal: Cell, mut price: Price) -> Vec<Cell>
where
    Price: FnMut(Cell, Cell) -> (u32, u32),
{
    let config = grid.config();
    if !config.contains(start) || grid.is_blocked(goal) || start == goal {
        return Vec::new();
    }

    let mut open_set = BTreeSet::new();
    let mut g_score = BTreeMap::new();
    let mut came_from = BTreeMap::new();
    let mut closed = BTreeSet::new();
    let mut seq = 0u64;

    g_score.insert(start, 0u32);
    open_set.insert(OpenNode { cost: config.distance(start, goal), seq, cell: start });

    while let Some(node) = open_set.pop_first() {
        let current = node.cell;
        if current == goal {
            return reconstruct_path(&came_from, start, goal);
        }
        if !closed.insert(current) {
            continue;
        }
        let Some(current_g) = g_score.get(&current).copied() else {
            continue;
        };
        for next in config.neighbors(current) {
            if grid.is_blocked(next) || closed.contains(&next) {
                continue;
            }
            let (step, estimate) = price(current, next);
            let tentative = current_g.saturating_add(step);
            if tentative < g_score.get(&next).copied().unwrap_or(u32::MAX) {
                came_from.insert(next, current);
                g_score.insert(next, tentative);
                seq += 1;
                open_set.insert(OpenNode { cost: tentative.saturating_add(estimate), seq, cell: next });
            }
        }
    }
    Vec::new()
}

fn reconstruct_path(came_from: &BTreeMap<Cell, Cell>, start: Cell, goal: Cell) -> Vec<Cell> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(previous) = came_from.get(&current).copied() {
        if previous == start {
            break;
        }
        path.push(previous);
        current = previous;
    }
    path.reverse();
    path
}
