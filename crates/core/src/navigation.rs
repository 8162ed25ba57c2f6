//! Decision core: picks the next head cell each tick.
//! This module exists to compose search, safety, tour and survival providers behind one
//! state machine. It does not own the body, the target, or the tick loop.

use std::collections::VecDeque;
use std::mem;

use crate::body::Body;
use crate::config::EngineConfig;
use crate::error::{ConfigError, GridError};
use crate::grid::OccupancyGrid;
use crate::types::*;

mod engine;
pub mod mobility;
pub mod safety;
pub mod search;
pub mod survival;
pub mod tour;

#[cfg(test)]
mod test_support;

pub use mobility::{MobilityCache, future_mobility, lookahead_depth, open_space};
pub use safety::SafetyOracle;
pub use search::{find_path, find_weighted_path};
pub use survival::{SurvivalChoice, choose_survival_move};
pub use tour::{ClosedTour, TourCoverage, build_tour};

pub struct Navigator {
    config: EngineConfig,
    oracle: SafetyOracle,
    mode: NavMode,
    /// Remaining cells of the verified path, next step first.
    path: VecDeque<Cell>,
    /// Target the queued path was planned for.
    goal: Option<Cell>,
    tour: Option<ClosedTour>,
    cache: MobilityCache,
    // Used as the tour heading until the body has a neck to derive one from.
    heading_hint: Direction,
    log: Vec<LogEvent>,
}

impl Navigator {
    pub fn new(config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            oracle: SafetyOracle::new(config.safety_floor),
            mode: NavMode::default(),
            path: VecDeque::new(),
            goal: None,
            tour: None,
            cache: MobilityCache::new(),
            heading_hint: Direction::Right,
            log: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn planned_path(&self) -> impl Iterator<Item = Cell> + '_ {
        self.path.iter().copied()
    }

    pub fn tour(&self) -> Option<&ClosedTour> {
        self.tour.as_ref()
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Hands the recorded events to the caller and starts a fresh log.
    pub fn take_log(&mut self) -> Vec<LogEvent> {
        mem::take(&mut self.log)
    }

    pub fn set_heading_hint(&mut self, heading: Direction) {
        self.heading_hint = heading;
    }

    /// Drops every piece of per-episode state, the event log included.
    pub fn reset(&mut self) {
        self.clear_path();
        self.tour = None;
        self.cache.clear();
        self.mode = NavMode::Replan;
        self.log.clear();
    }

    /// Called after the body grew: the queued path is stale and the tour is
    /// rebuilt from the new head.
    pub fn notify_growth(&mut self, body: &Body) -> Result<(), GridError> {
        self.check_grid(body)?;
        self.clear_path();
        if matches!(self.mode, NavMode::SeekTarget | NavMode::Following) {
            self.set_mode(NavMode::Replan);
        }
        if self.config.tour_fallback {
            let grid = OccupancyGrid::for_move(body)?;
            self.rebuild_tour(body, &grid)?;
        } else {
            self.tour = None;
        }
        Ok(())
    }
}
