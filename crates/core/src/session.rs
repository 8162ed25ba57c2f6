//! Headless reference controller around the navigator.
//! This module exists to own body, target and scoring the way a game loop would,
//! so the decision core can be driven and verified deterministically.
//! It does not own rendering, input, or frame pacing.

use std::mem;

use rand_chacha::ChaCha8Rng;
use rand_chacha::rand_core::{Rng, SeedableRng};
use tracing::{debug, info};

use crate::body::Body;
use crate::config::EngineConfig;
use crate::error::{ConfigError, GridError};
use crate::grid::OccupancyGrid;
use crate::navigation::Navigator;
use crate::types::*;

mod hash;

pub struct Session {
    seed: u64,
    config: EngineConfig,
    rng: ChaCha8Rng,
    navigator: Navigator,
    body: Body,
    /// `None` once no free cell is left to place a target on.
    target: Option<Cell>,
    heading: Direction,
    score: u32,
    steps: u64,
    resets: u32,
    log: Vec<LogEvent>,
}

impl Session {
    pub fn new(seed: u64, config: EngineConfig) -> Result<Self, ConfigError> {
        let navigator = Navigator::new(config)?;
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let body = start_body(&config)?;
        let heading = random_heading(&mut rng);
        let target = place_target(&mut rng, &body)?;
        let mut session = Self {
            seed,
            config,
            rng,
            navigator,
            body,
            target,
            heading,
            score: 0,
            steps: 0,
            resets: 0,
            log: Vec::new(),
        };
        session.navigator.set_heading_hint(heading);
        Ok(session)
    }

    /// Runs up to `max_ticks` decisions, applying each move and handling growth.
    pub fn advance(&mut self, max_ticks: u32) -> Result<AdvanceResult, GridError> {
        let mut ticks = 0;
        while ticks < max_ticks {
            let Some(target) = self.target else {
                return Ok(AdvanceResult { simulated_ticks: ticks, stop_reason: StopReason::BoardFilled });
            };
            let next = match self.navigator.decide(&self.body, target)? {
                Decision::Move { next, .. } => next,
                Decision::Trapped => {
                    return Ok(AdvanceResult { simulated_ticks: ticks, stop_reason: StopReason::Trapped });
                }
            };
            self.body.advance(next)?;
            self.steps += 1;
            ticks += 1;
            if next == target {
                self.eat(target)?;
            }
        }
        let stop_reason =
            if self.target.is_none() { StopReason::BoardFilled } else { StopReason::BudgetExhausted };
        Ok(AdvanceResult { simulated_ticks: ticks, stop_reason })
    }

    /// Restores the start layout and starts a fresh event log. The rng keeps
    /// its position, so a reset session does not replay the previous episode.
    pub fn reset(&mut self) -> Result<(), GridError> {
        self.body = start_body(&self.config)?;
        self.heading = random_heading(&mut self.rng);
        self.target = place_target(&mut self.rng, &self.body)?;
        self.score = 0;
        self.steps = 0;
        self.resets += 1;
        self.navigator.reset();
        self.navigator.set_heading_hint(self.heading);
        self.log.clear();
        self.log.push(LogEvent::Reset { resets: self.resets });
        info!(resets = self.resets, "session reset");
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn target(&self) -> Option<Cell> {
        self.target
    }

    pub fn heading(&self) -> Direction {
        self.body.heading().unwrap_or(self.heading)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn resets(&self) -> u32 {
        self.resets
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    /// Drains the session's events followed by the navigator's.
    pub fn take_log(&mut self) -> Vec<LogEvent> {
        let mut events = mem::take(&mut self.log);
        events.extend(self.navigator.take_log());
        events
    }

    fn eat(&mut self, cell: Cell) -> Result<(), GridError> {
        self.score += 1;
        self.body.grow();
        self.log.push(LogEvent::TargetEaten { cell, score: self.score });
        self.target = place_target(&mut self.rng, &self.body)?;
        debug!(%cell, score = self.score, next = ?self.target, "target eaten");
        self.navigator.notify_growth(&self.body)
    }
}

fn start_body(config: &EngineConfig) -> Result<Body, GridError> {
    Body::single(config.grid, config.grid.center(), config.initial_length)
}

fn random_heading(rng: &mut ChaCha8Rng) -> Direction {
    let order = Direction::EVALUATION_ORDER;
    order[rng.next_u64() as usize % order.len()]
}

/// Uniform pick over the cells the body does not hold, or `None` when the board is full.
fn place_target(rng: &mut ChaCha8Rng, body: &Body) -> Result<Option<Cell>, GridError> {
    let grid = OccupancyGrid::from_cells(body.config(), body.cells())?;
    let free = grid.free_count();
    if free == 0 {
        return Ok(None);
    }
    let pick = rng.next_u64() as usize % free;
    Ok(grid.free_cells().nth(pick))
}
