pub mod body;
pub mod config;
pub mod error;
pub mod grid;
pub mod navigation;
pub mod session;
pub mod types;

pub use body::Body;
pub use config::{EngineConfig, LookaheadConfig, SurvivalWeights};
pub use error::{ConfigError, GridError};
pub use grid::{GridConfig, OccupancyGrid, OccupancySnapshot};
pub use navigation::{ClosedTour, Navigator, SafetyOracle, TourCoverage};
pub use session::Session;
pub use types::*;
