//! Working solution and objective evaluation.

use super::{RouteSolution, RoutingProblem};

/// Cost components of one vehicle's route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct RouteCost {
    pub(crate) travel: i64,
    /// Sum of guided-search arc penalties along the route.
    pub(crate) guided: i64,
    pub(crate) empty: bool,
}

/// Read-only view of the problem with per-visit eligibility precomputed.
pub(crate) struct Context<'a> {
    pub(crate) problem: &'a RoutingProblem,
    /// `eligible[visit][vehicle]`; false everywhere for oversized visits.
    eligible: Vec<Vec<bool>>,
}

impl<'a> Context<'a> {
    pub(crate) fn new(problem: &'a RoutingProblem) -> Self {
        let vehicles = problem.starts.len();
        let eligible = problem
            .visits
            .iter()
            .map(|visit| {
                let mut row = match &visit.allowed_vehicles {
                    None => vec![true; vehicles],
                    Some(allowed) => {
                        let mut row = vec![false; vehicles];
                        for &vehicle in allowed {
                            row[vehicle] = true;
                        }
                        row
                    }
                };
                if visit.demand > problem.capacity {
                    row.fill(false);
                }
                row
            })
            .collect();

        Self { problem, eligible }
    }

    pub(crate) fn vehicles(&self) -> usize {
        self.problem.starts.len()
    }

    pub(crate) fn visits(&self) -> usize {
        self.problem.visits.len()
    }

    pub(crate) fn node(&self, visit: usize) -> usize {
        self.problem.visits[visit].node
    }

    pub(crate) fn demand(&self, visit: usize) -> u32 {
        self.problem.visits[visit].demand
    }

    pub(crate) fn capacity(&self) -> u32 {
        self.problem.capacity
    }

    pub(crate) fn eligible(&self, visit: usize) -> &[bool] {
        &self.eligible[visit]
    }

    pub(crate) fn can_serve(&self, vehicle: usize, visit: usize) -> bool {
        self.eligible[visit][vehicle]
    }

    pub(crate) fn arc(&self, from: usize, to: usize) -> i64 {
        self.problem.matrix.cost(from, to)
    }

    /// Travel cost of `route` driven by `vehicle`; zero when it stays home.
    pub(crate) fn travel(&self, vehicle: usize, route: &[usize]) -> i64 {
        let Some((&first, rest)) = route.split_first() else {
            return 0;
        };
        let mut prev = self.node(first);
        let mut cost =
            self.problem.penalties.first_leg_multiplier * self.arc(self.problem.starts[vehicle], prev);
        for &visit in rest {
            let node = self.node(visit);
            cost += self.arc(prev, node);
            prev = node;
        }
        cost + self.arc(prev, self.problem.destination)
    }

    /// Node pairs driven by `vehicle` over `route`, first leg first.
    pub(crate) fn route_arcs(&self, vehicle: usize, route: &[usize]) -> Vec<(usize, usize)> {
        if route.is_empty() {
            return Vec::new();
        }
        let mut arcs = Vec::with_capacity(route.len() + 1);
        let mut prev = self.problem.starts[vehicle];
        for &visit in route {
            let node = self.node(visit);
            arcs.push((prev, node));
            prev = node;
        }
        arcs.push((prev, self.problem.destination));
        arcs
    }

    pub(crate) fn route_cost(&self, guide: &Guide, vehicle: usize, route: &[usize]) -> RouteCost {
        RouteCost {
            travel: self.travel(vehicle, route),
            guided: self
                .route_arcs(vehicle, route)
                .into_iter()
                .map(|(from, to)| guide.penalty(from, to))
                .sum(),
            empty: route.is_empty(),
        }
    }

    /// Objective and guided-penalty total of `costs` with some routes
    /// replaced by `overrides`.
    fn evaluate(&self, costs: &[RouteCost], overrides: &[(usize, RouteCost)], unassigned: usize) -> (i64, i64) {
        let penalties = &self.problem.penalties;
        let mut travel = 0;
        let mut guided = 0;
        let mut used = 0;
        let mut longest: Option<i64> = None;
        let mut shortest: Option<i64> = None;

        for (vehicle, base) in costs.iter().enumerate() {
            let cost = overrides
                .iter()
                .find(|(v, _)| *v == vehicle)
                .map_or(base, |(_, cost)| cost);
            if cost.empty {
                continue;
            }
            used += 1;
            travel += cost.travel;
            guided += cost.guided;
            longest = Some(longest.map_or(cost.travel, |l| l.max(cost.travel)));
            shortest = Some(shortest.map_or(cost.travel, |s| s.min(cost.travel)));
        }

        let span = match (longest, shortest) {
            (Some(longest), Some(shortest)) => longest - shortest,
            _ => 0,
        };
        let objective = travel
            + penalties.vehicle_fixed_cost * used
            + penalties.drop_visit * unassigned as i64
            + penalties.span_coefficient * span;
        (objective, guided)
    }

    pub(crate) fn objective(&self, working: &Working) -> i64 {
        self.evaluate(&working.costs, &[], working.unassigned.len()).0
    }

    /// Objective plus weighted arc penalties, used to accept moves.
    pub(crate) fn augmented(
        &self,
        guide: &Guide,
        working: &Working,
        overrides: &[(usize, RouteCost)],
        unassigned: usize,
    ) -> i64 {
        let (objective, guided) = self.evaluate(&working.costs, overrides, unassigned);
        objective + guide.lambda * guided
    }
}

/// Arc penalty counts for guided local search.
#[derive(Debug, Clone)]
pub(crate) struct Guide {
    size: usize,
    counts: Vec<u32>,
    pub(crate) lambda: i64,
}

impl Guide {
    pub(crate) fn new(size: usize) -> Self {
        Self {
            size,
            counts: vec![0; size * size],
            lambda: 0,
        }
    }

    pub(crate) fn penalty(&self, from: usize, to: usize) -> i64 {
        i64::from(self.counts[from * self.size + to])
    }

    /// Penalise the arcs of `working` with the highest utility
    /// `cost / (1 + penalty)`. Returns false when the solution drives no arc.
    pub(crate) fn penalize(&mut self, ctx: &Context<'_>, working: &Working) -> bool {
        const EPS: f64 = 1e-9;
        let multiplier = ctx.problem.penalties.first_leg_multiplier as f64;
        let mut best = f64::NEG_INFINITY;
        let mut chosen = Vec::new();

        for (vehicle, route) in working.routes.iter().enumerate() {
            for (i, (from, to)) in ctx.route_arcs(vehicle, route).into_iter().enumerate() {
                let mut cost = ctx.arc(from, to) as f64;
                if i == 0 {
                    cost *= multiplier;
                }
                let utility = cost / (1.0 + self.penalty(from, to) as f64);
                if utility > best + EPS {
                    best = utility;
                    chosen.clear();
                    chosen.push((from, to));
                } else if (utility - best).abs() <= EPS {
                    chosen.push((from, to));
                }
            }
        }

        if chosen.is_empty() {
            return false;
        }
        for (from, to) in chosen {
            self.counts[from * self.size + to] += 1;
        }
        true
    }
}

/// Mutable solution: visit indices per vehicle plus cached loads and costs.
#[derive(Debug, Clone)]
pub(crate) struct Working {
    pub(crate) routes: Vec<Vec<usize>>,
    pub(crate) loads: Vec<u32>,
    pub(crate) costs: Vec<RouteCost>,
    pub(crate) unassigned: Vec<usize>,
}

impl Working {
    pub(crate) fn new(ctx: &Context<'_>, guide: &Guide, routes: Vec<Vec<usize>>, unassigned: Vec<usize>) -> Self {
        let loads = routes
            .iter()
            .map(|route| route.iter().map(|&visit| ctx.demand(visit)).sum())
            .collect();
        let costs = routes
            .iter()
            .enumerate()
            .map(|(vehicle, route)| ctx.route_cost(guide, vehicle, route))
            .collect();
        Self {
            routes,
            loads,
            costs,
            unassigned,
        }
    }

    pub(crate) fn fits(&self, ctx: &Context<'_>, vehicle: usize, visit: usize) -> bool {
        ctx.can_serve(vehicle, visit) && self.loads[vehicle] + ctx.demand(visit) <= ctx.capacity()
    }

    pub(crate) fn set_route(&mut self, ctx: &Context<'_>, guide: &Guide, vehicle: usize, route: Vec<usize>) {
        self.loads[vehicle] = route.iter().map(|&visit| ctx.demand(visit)).sum();
        self.costs[vehicle] = ctx.route_cost(guide, vehicle, &route);
        self.routes[vehicle] = route;
    }

    /// Recompute route costs after the guide changed.
    pub(crate) fn refresh(&mut self, ctx: &Context<'_>, guide: &Guide) {
        for (vehicle, route) in self.routes.iter().enumerate() {
            self.costs[vehicle] = ctx.route_cost(guide, vehicle, route);
        }
    }

    pub(crate) fn travel(&self) -> i64 {
        self.costs.iter().map(|cost| cost.travel).sum()
    }

    pub(crate) fn arc_count(&self) -> usize {
        self.routes
            .iter()
            .filter(|route| !route.is_empty())
            .map(|route| route.len() + 1)
            .sum()
    }

    pub(crate) fn into_solution(self, ctx: &Context<'_>, cost: i64) -> RouteSolution {
        let problem = ctx.problem;
        let routes = self
            .routes
            .iter()
            .enumerate()
            .map(|(vehicle, route)| {
                let mut nodes = Vec::with_capacity(route.len() + 2);
                nodes.push(problem.starts[vehicle]);
                nodes.extend(route.iter().map(|&visit| ctx.node(visit)));
                nodes.push(problem.destination);
                nodes
            })
            .collect();
        let dropped = self.unassigned.iter().map(|&visit| ctx.node(visit)).collect();

        RouteSolution {
            routes,
            dropped,
            cost,
        }
    }
}
