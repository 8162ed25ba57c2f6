//! Engine tuning values and their validation.
//! Every core operation receives these explicitly; nothing here is process-wide.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::GridConfig;
use crate::types::Routing;

/// Lookahead depth is exponential in cost; deeper requests are rejected.
pub const MAX_LOOKAHEAD_DEPTH: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LookaheadConfig {
    pub max_depth: u32,
    pub min_depth: u32,
    /// Depth drops by one for every `shrink_every` body cells.
    pub shrink_every: u32,
}

impl Default for LookaheadConfig {
    fn default() -> Self {
        Self { max_depth: 8, min_depth: 3, shrink_every: 16 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurvivalWeights {
    pub free_space: u32,
    pub mobility: u32,
}

impl Default for SurvivalWeights {
    fn default() -> Self {
        Self { free_space: 10, mobility: 2 }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridConfig,
    pub initial_length: usize,
    pub safety_floor: usize,
    pub routing: Routing,
    /// Extra cost per missing lookahead option, in units where one step costs
    /// `search::STEP_COST`.
    pub mobility_penalty: u32,
    pub lookahead: LookaheadConfig,
    pub survival: SurvivalWeights,
    pub tour_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            grid: GridConfig::default(),
            initial_length: 3,
            safety_floor: 5,
            routing: Routing::Shortest,
            mobility_penalty: 1,
            lookahead: LookaheadConfig::default(),
            survival: SurvivalWeights::default(),
            tour_fallback: true,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        if self.initial_length == 0 {
            return Err(ConfigError::ZeroInitialLength);
        }
        let lookahead = self.lookahead;
        if lookahead.max_depth > MAX_LOOKAHEAD_DEPTH {
            return Err(ConfigError::LookaheadTooDeep(lookahead.max_depth));
        }
        if lookahead.min_depth > lookahead.max_depth {
            return Err(ConfigError::LookaheadInverted {
                min: lookahead.min_depth,
                max: lookahead.max_depth,
            });
        }
        if lookahead.shrink_every == 0 {
            return Err(ConfigError::ZeroShrinkInterval);
        }
        Ok(())
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
