//! Capacitated multi-vehicle routing with optional visits.
//!
//! Every vehicle starts at its own start node and ends at one shared
//! destination. Visits carry a seat demand and may be limited to a subset of
//! vehicles. Leaving a visit out is allowed at a fixed penalty and vehicles
//! may stay idle, so a solution always exists for a well-formed problem.
//!
//! [`GuidedLocalSearch`] builds a savings solution and improves it with
//! relocate, 2-opt and exchange moves under guided local search.

mod construction;
mod moves;
mod search;
mod state;

use crate::matrix::DistanceMatrix;

pub use search::{GuidedLocalSearch, SearchOptions};

/// Objective weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Penalties {
    /// Cost of leaving a visit out of every route. Must dominate any travel
    /// saving so that visits are only dropped when they cannot be served.
    pub drop_visit: i64,
    /// Fixed cost of every vehicle that serves at least one visit. An idle
    /// vehicle costs nothing.
    pub vehicle_fixed_cost: i64,
    /// Weight applied to the first leg out of each start node.
    pub first_leg_multiplier: i64,
    /// Weight on the spread between the costliest and cheapest used route.
    pub span_coefficient: i64,
}

impl Default for Penalties {
    fn default() -> Self {
        Self {
            drop_visit: 10_000_000,
            vehicle_fixed_cost: 0,
            first_leg_multiplier: 5,
            span_coefficient: 1,
        }
    }
}

/// A node that may be visited by at most one vehicle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitNode {
    pub node: usize,
    pub demand: u32,
    /// Vehicles allowed to serve this visit; `None` means any.
    pub allowed_vehicles: Option<Vec<usize>>,
}

impl VisitNode {
    pub fn new(node: usize, demand: u32) -> Self {
        Self {
            node,
            demand,
            allowed_vehicles: None,
        }
    }

    pub fn allowed(mut self, vehicles: Vec<usize>) -> Self {
        self.allowed_vehicles = Some(vehicles);
        self
    }
}

#[derive(Debug, Clone)]
pub struct RoutingProblem {
    pub matrix: DistanceMatrix,
    /// Start node of each vehicle.
    pub starts: Vec<usize>,
    /// Shared end node.
    pub destination: usize,
    pub visits: Vec<VisitNode>,
    /// Seat capacity of every vehicle.
    pub capacity: u32,
    pub penalties: Penalties,
}

impl RoutingProblem {
    pub fn vehicle_count(&self) -> usize {
        self.starts.len()
    }

    /// Checks every node index and vehicle reference against the matrix.
    pub fn is_well_formed(&self) -> bool {
        let size = self.matrix.size();
        let vehicles = self.starts.len();
        vehicles > 0
            && self.destination < size
            && self.starts.iter().all(|&node| node < size)
            && self.visits.iter().all(|visit| {
                visit.node < size
                    && visit
                        .allowed_vehicles
                        .as_ref()
                        .is_none_or(|allowed| allowed.iter().all(|&v| v < vehicles))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RouteSolution {
    /// Per vehicle: start node, visited nodes in order, destination node.
    pub routes: Vec<Vec<usize>>,
    /// Visit nodes left out of every route.
    pub dropped: Vec<usize>,
    /// Objective value, penalties included.
    pub cost: i64,
}

impl RouteSolution {
    /// Visited nodes of `vehicle`, without its start and end.
    pub fn interior(&self, vehicle: usize) -> &[usize] {
        match self.routes.get(vehicle) {
            Some(route) if route.len() > 2 => &route[1..route.len() - 1],
            _ => &[],
        }
    }

    pub fn used_vehicles(&self) -> usize {
        self.routes.iter().filter(|route| route.len() > 2).count()
    }
}
