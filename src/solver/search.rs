//! Guided local search driver.

use std::time::{Duration, Instant};

use tracing::{debug, info, warn};

use super::construction;
use super::moves::{exchange, relocate, two_opt};
use super::state::{Context, Guide, Working};
use super::{RouteSolution, RoutingProblem};
use crate::traits::RoutingSolver;

#[derive(Debug, Clone)]
pub struct SearchOptions {
    /// Wall-clock budget for one solve.
    pub time_limit: Duration,
    /// Optional cap on guided-search iterations.
    pub max_iterations: Option<usize>,
    /// Scales the arc penalty weight from the first local optimum.
    pub lambda_coefficient: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            time_limit: Duration::from_secs(5),
            max_iterations: None,
            lambda_coefficient: 0.1,
        }
    }
}

impl SearchOptions {
    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn with_max_iterations(mut self, iterations: usize) -> Self {
        self.max_iterations = Some(iterations);
        self
    }
}

/// Savings construction followed by guided local search.
#[derive(Debug, Clone, Default)]
pub struct GuidedLocalSearch {
    options: SearchOptions,
}

impl GuidedLocalSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }
}

struct Deadline(Option<Instant>);

impl Deadline {
    fn after(limit: Duration) -> Self {
        Self(Instant::now().checked_add(limit))
    }

    fn expired(&self) -> bool {
        self.0.is_some_and(|at| Instant::now() >= at)
    }
}

/// Apply improving moves until none is left or time runs out.
fn descend(ctx: &Context<'_>, guide: &Guide, working: &mut Working, deadline: &Deadline) {
    while !deadline.expired() {
        if relocate(ctx, guide, working) || two_opt(ctx, guide, working) || exchange(ctx, guide, working) {
            continue;
        }
        break;
    }
}

impl RoutingSolver for GuidedLocalSearch {
    fn solve(&self, problem: &RoutingProblem) -> Option<RouteSolution> {
        if !problem.is_well_formed() {
            warn!(
                vehicles = problem.vehicle_count(),
                nodes = problem.matrix.size(),
                "routing problem is malformed"
            );
            return None;
        }

        let started = Instant::now();
        let deadline = Deadline::after(self.options.time_limit);
        let ctx = Context::new(problem);
        let mut guide = Guide::new(problem.matrix.size());

        let mut working = construction::savings(&ctx, &guide);
        debug!(
            cost = ctx.objective(&working),
            dropped = working.unassigned.len(),
            "savings solution built"
        );

        descend(&ctx, &guide, &mut working, &deadline);
        let mut best = working.clone();
        let mut best_cost = ctx.objective(&best);

        let arcs = working.arc_count();
        guide.lambda = if arcs == 0 {
            1
        } else {
            let per_arc = working.travel() as f64 / arcs as f64;
            ((self.options.lambda_coefficient * per_arc).round() as i64).max(1)
        };

        let mut iterations = 0usize;
        while !deadline.expired() && self.options.max_iterations.is_none_or(|max| iterations < max) {
            if !guide.penalize(&ctx, &working) {
                break;
            }
            working.refresh(&ctx, &guide);
            descend(&ctx, &guide, &mut working, &deadline);
            iterations += 1;

            let cost = ctx.objective(&working);
            if cost < best_cost {
                debug!(iteration = iterations, cost, "improved best solution");
                best = working.clone();
                best_cost = cost;
            }
        }

        info!(
            cost = best_cost,
            iterations,
            dropped = best.unassigned.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "routing solve finished"
        );
        Some(best.into_solution(&ctx, best_cost))
    }
}
