//! Seams between the planner and its collaborators.
//!
//! These are intentionally narrow. Storage, geocoding and directions live
//! outside the engine; hosts implement them for their own backends.

use serde::{Deserialize, Serialize};

use crate::error::{DirectionsError, GeocodeError};
use crate::model::{Coordinate, PlanQuery, Reservation};
use crate::solver::{RouteSolution, RoutingProblem};

/// Supplies the reservations a plan is computed from.
pub trait ReservationSource {
    /// Reservations dated on or after `query.cutoff`, matching the optional
    /// category, ordered by date then time.
    fn snapshot(&self, query: &PlanQuery) -> Vec<Reservation>;
}

/// Resolves an address to a coordinate.
///
/// Implementations must be idempotent: resolving the same address twice
/// yields the same coordinate.
pub trait Geocoder {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError>;
}

/// A labelled point handed to the directions provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Waypoint {
    pub label: String,
    pub location: Coordinate,
}

impl Waypoint {
    pub fn new(label: impl Into<String>, location: Coordinate) -> Self {
        Self {
            label: label.into(),
            location,
        }
    }
}

/// One leg of a driven route, ending at `stop`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leg {
    pub stop: String,
    pub duration_secs: u64,
}

/// Provides per-leg driving durations for a fixed waypoint order.
pub trait DirectionsProvider {
    /// Returns `waypoints.len() + 1` legs in driving order. Waypoints must not
    /// be reordered.
    fn route_legs(
        &self,
        origin: &Waypoint,
        waypoints: &[Waypoint],
        destination: &Waypoint,
    ) -> Result<Vec<Leg>, DirectionsError>;
}

/// Provides a cost matrix for a set of locations.
///
/// The matrix is indexed by the provided location order.
pub trait DistanceMatrixProvider {
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<i64>>;
}

/// Solves a capacitated routing problem.
///
/// `None` means no solution could be produced; it is a normal outcome, not
/// an error.
pub trait RoutingSolver {
    fn solve(&self, problem: &RoutingProblem) -> Option<RouteSolution>;
}
