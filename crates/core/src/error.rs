//! Contract violations reported at the grid boundary and by configuration checks.

use thiserror::Error;

use crate::grid::GridConfig;
use crate::types::Cell;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("grid dimensions must be non-zero, got {width}x{height}")]
    ZeroSize { width: u32, height: u32 },
    #[error("grid dimensions {width}x{height} exceed the addressable cell range")]
    TooLarge { width: u32, height: u32 },
    #[error("cell {cell} lies outside the {width}x{height} grid")]
    OutOfBounds { cell: Cell, width: u32, height: u32 },
    #[error("pixel ({px}, {py}) lies outside the rendered grid")]
    PixelOutOfBounds { px: u32, py: u32 },
    #[error("cell size in pixels must be non-zero")]
    ZeroCellSize,
    #[error("body must hold at least one cell")]
    EmptyBody,
    #[error("body repeats cell {0}")]
    DuplicateBodyCell(Cell),
    #[error("cells {from} and {to} are not 4-adjacent")]
    NotAdjacent { from: Cell, to: Cell },
    #[error("target length {target_len} is shorter than the {occupied} occupied cells")]
    TargetLengthTooShort { target_len: usize, occupied: usize },
    #[error("moving onto {0} would intersect the body")]
    SelfIntersection(Cell),
    #[error("target {0} overlaps the body")]
    TargetOnBody(Cell),
    #[error("body lives on {found:?} but the navigator is configured for {expected:?}")]
    GridMismatch { expected: GridConfig, found: GridConfig },
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Grid(#[from] GridError),
    #[error("initial length must be at least 1")]
    ZeroInitialLength,
    #[error("lookahead max_depth {0} exceeds the supported cap")]
    LookaheadTooDeep(u32),
    #[error("lookahead min_depth {min} exceeds max_depth {max}")]
    LookaheadInverted { min: u32, max: u32 },
    #[error("lookahead shrink_every must be non-zero")]
    ZeroShrinkInterval,
    #[error("invalid TOML configuration: {0}")]
    Parse(String),
}
