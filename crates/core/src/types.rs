use std::fmt;

use serde::{Deserialize, Serialize};

/// A grid coordinate. Columns grow rightwards, rows grow downwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub col: i32,
    pub row: i32,
}

impl Cell {
    pub const fn new(col: i32, row: i32) -> Self {
        Self { col, row }
    }

    pub fn offset(self, dir: Direction) -> Self {
        let (dc, dr) = dir.delta();
        Self { col: self.col + dc, row: self.row + dr }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.col, self.row)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Direction {
    Down,
    Right,
    Up,
    Left,
}

impl Direction {
    /// Fixed evaluation order shared by search, flood-fill, lookahead and survival.
    /// Changing it changes which of several equal-cost moves wins.
    pub const EVALUATION_ORDER: [Direction; 4] =
        [Direction::Down, Direction::Right, Direction::Up, Direction::Left];

    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Down => (0, 1),
            Direction::Right => (1, 0),
            Direction::Up => (0, -1),
            Direction::Left => (-1, 0),
        }
    }
}

/// Decision-engine state, see `Navigator::decide`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NavMode {
    SeekTarget,
    Following,
    #[default]
    Replan,
    Survival,
    Trapped,
}

/// Which path provider produced a move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Provider {
    ShortestPath,
    ClosedTour,
    Survival,
}

/// Variant used by the shortest-path provider.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Routing {
    #[default]
    Shortest,
    MobilityWeighted,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Decision {
    /// Commit `next` as the new head. `planned` holds the remaining queued
    /// cells after `next`, for visualization only.
    Move { next: Cell, provider: Provider, planned: Vec<Cell> },
    /// No legal move preserves the agent. Terminal until reset.
    Trapped,
}

impl Decision {
    pub fn next_cell(&self) -> Option<Cell> {
        match self {
            Decision::Move { next, .. } => Some(*next),
            Decision::Trapped => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum LogEvent {
    ModeChanged { from: NavMode, to: NavMode },
    PathPlanned { goal: Cell, path_len: u32, routing: Routing },
    PathRejected { goal: Cell, path_len: u32 },
    TourRebuilt { anchor: Cell, visited: u32, closes_cycle: bool },
    SurvivalMove { cell: Cell, score: u32 },
    Trapped { head: Cell },
    TargetEaten { cell: Cell, score: u32 },
    Reset { resets: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum StopReason {
    Trapped,
    BoardFilled,
    BudgetExhausted,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AdvanceResult {
    pub simulated_ticks: u32,
    pub stop_reason: StopReason,
}
