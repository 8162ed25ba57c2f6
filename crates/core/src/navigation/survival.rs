//! Last-resort move selection when no verified path to the target exists.

use tracing::trace;

use super::mobility::{MobilityScope, free_neighbors};
use crate::body::Body;
use crate::config::SurvivalWeights;
use crate::types::{Cell, Direction};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurvivalChoice {
    pub cell: Cell,
    pub score: u32,
}

/// Scores every free neighbour of the head by immediate free neighbours and
/// `depth`-step future mobility, and picks the best. Ties go to the direction
/// evaluated first. `None` means the head has no free neighbour at all.
///
/// The scope's grid must be the move grid for `body`.
pub fn choose_survival_move(
    body: &Body,
    scope: &mut MobilityScope<'_>,
    weights: SurvivalWeights,
    depth: u32,
) -> Option<SurvivalChoice> {
    let grid = scope.grid();
    let head = body.head();
    let mut best: Option<SurvivalChoice> = None;
    for dir in Direction::EVALUATION_ORDER {
        let Some(candidate) = grid.step(head, dir) else {
            continue;
        };
        if grid.is_blocked(candidate) {
            continue;
        }
        let immediate = free_neighbors(grid, candidate);
        let future = scope.future_mobility(candidate, depth);
        let score = immediate
            .saturating_mul(weights.free_space)
            .saturating_add(future.saturating_mul(weights.mobility));
        trace!(?dir, %candidate, immediate, future, score, "survival candidate");
        if best.is_none_or(|current| score > current.score) {
            best = Some(SurvivalChoice { cell: candidate, score });
        }
    }
    best
}
