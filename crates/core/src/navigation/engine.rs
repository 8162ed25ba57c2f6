//! Per-tick provider selection and mode transitions for the navigator.

use tracing::{debug, warn};

use super::*;

impl Navigator {
    /// Chooses the next head cell for `body` on its way to `target`.
    ///
    /// Providers are tried in order: the queued path, a freshly verified path,
    /// the closed tour, then the survival heuristic. When none has a move the
    /// navigator reports `Trapped` on every call until `reset`.
    pub fn decide(&mut self, body: &Body, target: Cell) -> Result<Decision, GridError> {
        self.check_grid(body)?;
        if self.mode == NavMode::Trapped {
            return Ok(Decision::Trapped);
        }
        body.config().check(target)?;
        if body.contains(target) {
            return Err(GridError::TargetOnBody(target));
        }
        let grid = OccupancyGrid::for_move(body)?;

        if let Some(next) = self.follow_queued(body, &grid, target) {
            return Ok(self.path_move(next));
        }
        if let Some(next) = self.plan_to(body, &grid, target) {
            return Ok(self.path_move(next));
        }

        self.clear_path();
        self.set_mode(NavMode::Survival);
        if self.config.tour_fallback
            && let Some(next) = self.tour_step(body, &grid)?
        {
            let planned: Vec<Cell> = self
                .tour
                .as_ref()
                .map(|tour| tour.cells().iter().skip_while(|cell| **cell != next).skip(1).copied().collect())
                .unwrap_or_default();
            return Ok(Decision::Move { next, provider: Provider::ClosedTour, planned });
        }
        if let Some(choice) = self.survival_step(body, &grid) {
            return Ok(Decision::Move {
                next: choice.cell,
                provider: Provider::Survival,
                planned: Vec::new(),
            });
        }

        let head = body.head();
        self.set_mode(NavMode::Trapped);
        self.log.push(LogEvent::Trapped { head });
        warn!(%head, body_len = body.len(), "no legal move left");
        Ok(Decision::Trapped)
    }

    pub(super) fn check_grid(&self, body: &Body) -> Result<(), GridError> {
        let found = body.config();
        if found != self.config.grid {
            return Err(GridError::GridMismatch { expected: self.config.grid, found });
        }
        Ok(())
    }

    pub(super) fn set_mode(&mut self, to: NavMode) {
        if self.mode == to {
            return;
        }
        debug!(from = ?self.mode, to = ?to, "navigation mode changed");
        self.log.push(LogEvent::ModeChanged { from: self.mode, to });
        self.mode = to;
    }

    pub(super) fn clear_path(&mut self) {
        self.path.clear();
        self.goal = None;
    }

    pub(super) fn rebuild_tour(&mut self, body: &Body, grid: &OccupancyGrid) -> Result<(), GridError> {
        let anchor = body.head();
        let heading = body.heading().unwrap_or(self.heading_hint);
        let tour = build_tour(grid, anchor, heading)?;
        let coverage = tour.coverage();
        debug!(
            %anchor,
            visited = coverage.visited,
            free_cells = coverage.free_cells,
            closes_cycle = coverage.closes_cycle,
            "closed tour rebuilt"
        );
        self.log.push(LogEvent::TourRebuilt {
            anchor,
            visited: coverage.visited as u32,
            closes_cycle: coverage.closes_cycle,
        });
        self.tour = Some(tour);
        Ok(())
    }

    fn path_move(&self, next: Cell) -> Decision {
        Decision::Move {
            next,
            provider: Provider::ShortestPath,
            planned: self.path.iter().copied().collect(),
        }
    }

    /// Pops the next queued step while it is still adjacent, free and safe.
    fn follow_queued(&mut self, body: &Body, grid: &OccupancyGrid, target: Cell) -> Option<Cell> {
        if !matches!(self.mode, NavMode::SeekTarget | NavMode::Following) {
            return None;
        }
        let usable = self.goal == Some(target)
            && self.path.front().is_some_and(|next| {
                grid.config().are_adjacent(body.head(), *next)
                    && self.oracle.is_safe(grid, *next, body.len())
            });
        if !usable {
            self.clear_path();
            self.set_mode(NavMode::Replan);
            return None;
        }
        self.set_mode(NavMode::Following);
        self.path.pop_front()
    }

    fn plan_to(&mut self, body: &Body, grid: &OccupancyGrid, target: Cell) -> Option<Cell> {
        let head = body.head();
        let routing = self.config.routing;
        let path = match routing {
            Routing::Shortest => find_path(grid, head, target),
            Routing::MobilityWeighted => {
                let mut scope = self.cache.bind(grid);
                find_weighted_path(&mut scope, head, target, self.config.mobility_penalty)
            }
        };
        if path.is_empty() {
            debug!(%head, %target, "target unreachable");
            return None;
        }

        let path_len = path.len() as u32;
        if !self.oracle.verify_path(body, &path) {
            debug!(%target, path_len, "path rejected by safety check");
            self.log.push(LogEvent::PathRejected { goal: target, path_len });
            return None;
        }
        self.log.push(LogEvent::PathPlanned { goal: target, path_len, routing });
        self.set_mode(NavMode::SeekTarget);
        self.goal = Some(target);
        self.path = path.into();
        self.path.pop_front()
    }

    /// Next tour cell from the head, rebuilding the tour once if the current
    /// one has no usable successor.
    fn tour_step(&mut self, body: &Body, grid: &OccupancyGrid) -> Result<Option<Cell>, GridError> {
        if let Some(next) = self.next_tour_cell(body, grid) {
            return Ok(Some(next));
        }
        self.rebuild_tour(body, grid)?;
        Ok(self.next_tour_cell(body, grid))
    }

    fn next_tour_cell(&self, body: &Body, grid: &OccupancyGrid) -> Option<Cell> {
        let head = body.head();
        let next = self.tour.as_ref()?.next_after(head)?;
        (grid.config().are_adjacent(head, next) && self.oracle.is_safe(grid, next, body.len()))
            .then_some(next)
    }

    fn survival_step(&mut self, body: &Body, grid: &OccupancyGrid) -> Option<SurvivalChoice> {
        let depth = lookahead_depth(body.len(), self.config.lookahead);
        let weights = self.config.survival;
        let mut scope = self.cache.bind(grid);
        let choice = choose_survival_move(body, &mut scope, weights, depth)?;
        debug!(cell = %choice.cell, score = choice.score, depth, "survival move");
        self.log.push(LogEvent::SurvivalMove { cell: choice.cell, score: choice.score });
        Some(choice)
    }
}
