//! The route planner: reservations in, routes, links and schedules out.

use std::collections::BTreeMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;

use rayon::ThreadPoolBuildError;
use tracing::{info, warn};

use crate::aggregate::{aggregate, Aggregation};
use crate::cache::{CacheKey, PlanCache};
use crate::config::EngineConfig;
use crate::error::PlanError;
use crate::fleet::build_fleet;
use crate::haversine::HaversineMatrix;
use crate::links::{navigation_links, NavigationLinks};
use crate::matrix::{build_matrix, DistanceMatrix, NodeLayout};
use crate::model::{PlanQuery, Reservation, Vehicle};
use crate::pool::SolvePool;
use crate::postprocess::{self, PlannedRoute, RoutePlan, VehicleLabel};
use crate::schedule::{estimate, StopTime};
use crate::solver::{GuidedLocalSearch, Penalties, RoutingProblem, VisitNode};
use crate::traits::{DirectionsProvider, Geocoder, ReservationSource, RoutingSolver, Waypoint};

/// Plans pickups for a fleet converging on one destination.
///
/// Plans are cached per query and reservation snapshot for
/// `EngineConfig::cache_ttl`; solves run on a dedicated pool.
pub struct RoutePlanner<S, G, D, R = GuidedLocalSearch> {
    config: EngineConfig,
    source: S,
    geocoder: G,
    directions: D,
    solver: R,
    matrix: HaversineMatrix,
    cache: PlanCache<RoutePlan>,
    pool: SolvePool,
}

impl<S, G, D> RoutePlanner<S, G, D> {
    pub fn new(config: EngineConfig, source: S, geocoder: G, directions: D) -> Result<Self, ThreadPoolBuildError> {
        let solver = GuidedLocalSearch::new(config.search.clone());
        let pool = SolvePool::new(config.solve_threads)?;
        info!(
            hubs = config.hubs.len(),
            destination = %config.destination.name,
            threads = pool.threads(),
            "route planner ready"
        );

        Ok(Self {
            cache: PlanCache::new(config.cache_ttl),
            config,
            source,
            geocoder,
            directions,
            solver,
            matrix: HaversineMatrix::default(),
            pool,
        })
    }
}

impl<S, G, D, R> RoutePlanner<S, G, D, R> {
    /// Swap in another routing solver.
    pub fn with_solver<R2: RoutingSolver>(self, solver: R2) -> RoutePlanner<S, G, D, R2> {
        RoutePlanner {
            config: self.config,
            source: self.source,
            geocoder: self.geocoder,
            directions: self.directions,
            solver,
            matrix: self.matrix,
            cache: self.cache,
            pool: self.pool,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Drop every cached plan, e.g. after bulk reservation changes.
    pub fn invalidate(&self) {
        self.cache.invalidate();
    }
}

impl<S, G, D, R> RoutePlanner<S, G, D, R>
where
    S: ReservationSource + Sync,
    G: Geocoder + Sync,
    D: DirectionsProvider + Sync,
    R: RoutingSolver + Sync,
{
    /// Full plan for `query`, from the cache when the reservations have not
    /// changed since it was computed.
    pub fn plan(&self, query: &PlanQuery) -> Arc<RoutePlan> {
        let reservations = self.source.snapshot(query);
        let key = CacheKey::new(query, &reservations);
        self.cache
            .get_or_compute(key, || self.pool.install(|| self.compute_plan(reservations)))
    }

    /// Plan without blocking the caller. The receiver yields the plan once;
    /// callers pick their own timeout with `recv_timeout`.
    ///
    /// The request runs on its own thread. Pool workers must never wait on
    /// a cache entry.
    pub fn plan_in_background(self: &Arc<Self>, query: PlanQuery) -> io::Result<mpsc::Receiver<Arc<RoutePlan>>>
    where
        Self: Send + 'static,
    {
        let planner = Arc::clone(self);
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("plan-background".to_string())
            .spawn(move || {
                // The caller may have stopped waiting.
                let _ = tx.send(planner.plan(&query));
            })?;
        Ok(rx)
    }

    /// Pickup addresses per vehicle, in driving order.
    pub fn compute_routes(&self, query: &PlanQuery) -> BTreeMap<VehicleLabel, Vec<String>> {
        self.plan(query).addresses()
    }

    pub fn compute_navigation_links(&self, query: &PlanQuery) -> BTreeMap<VehicleLabel, NavigationLinks> {
        let destination = self.config.destination.location.to_string();
        self.plan(query)
            .routes
            .iter()
            .map(|route| (route.label, navigation_links(route, &destination)))
            .collect()
    }

    /// Arrival and departure times at every stop and at the destination.
    pub fn compute_schedules(&self, query: &PlanQuery) -> Result<BTreeMap<VehicleLabel, Vec<StopTime>>, PlanError> {
        let plan = self.plan(query);
        let mut schedules = BTreeMap::new();
        for route in &plan.routes {
            schedules.insert(route.label, self.schedule(route)?);
        }
        Ok(schedules)
    }

    fn schedule(&self, route: &PlannedRoute) -> Result<Vec<StopTime>, PlanError> {
        let origin = Waypoint::new(route.hub.address.clone(), route.hub.location);
        let stops: Vec<Waypoint> = route
            .stops
            .iter()
            .map(|stop| Waypoint::new(stop.address.clone(), stop.location))
            .collect();
        let destination = Waypoint::new(self.config.destination.name.clone(), self.config.destination.location);

        let legs = self
            .directions
            .route_legs(&origin, &stops, &destination)
            .map_err(|source| PlanError::Directions {
                vehicle: route.label.to_string(),
                source,
            })?;
        let schedule = &self.config.schedule;
        Ok(estimate(&legs, schedule.day_start, schedule.dwell))
    }

    fn compute_plan(&self, reservations: Vec<Reservation>) -> RoutePlan {
        let aggregation = aggregate(
            reservations,
            &self.geocoder,
            &self.config.districts,
            &self.config.regions,
        );
        if aggregation.is_empty() {
            info!("no routable pickups");
            return RoutePlan::default();
        }

        let fleet = &self.config.fleet;
        let vehicles = build_fleet(
            &self.config.hubs,
            aggregation.total_seats(),
            fleet.capacity,
            fleet.min_fleet,
            fleet.policy,
        );
        let (layout, matrix) = build_matrix(
            &self.matrix,
            &vehicles,
            &aggregation.pickups,
            self.config.destination.location,
        );
        let Some(matrix) = matrix else {
            warn!(nodes = layout.node_count(), "distance matrix has the wrong shape");
            return unplanned(&aggregation);
        };

        let problem = routing_problem(matrix, &layout, &vehicles, &aggregation, fleet.capacity, self.config.penalties);
        let Some(solution) = self.solver.solve(&problem) else {
            warn!(
                vehicles = vehicles.len(),
                pickups = aggregation.pickups.len(),
                "no routing solution"
            );
            return unplanned(&aggregation);
        };

        let plan = postprocess::build_plan(&solution, &layout, &vehicles, &self.config.hubs, &aggregation);
        if !plan.dropped.is_empty() {
            warn!(dropped = ?plan.dropped, "pickups left unserved");
        }
        info!(
            vehicles = plan.routes.len(),
            pickups = aggregation.pickups.len(),
            cost = solution.cost,
            "plan computed"
        );
        plan
    }
}

fn unplanned(aggregation: &Aggregation) -> RoutePlan {
    RoutePlan {
        routes: Vec::new(),
        dropped: aggregation.pickups.iter().map(|pickup| pickup.id.clone()).collect(),
    }
}

/// Solver input for `aggregation`. Pickups outside [`Region::Other`] may
/// only ride the vehicles their region admits.
///
/// [`Region::Other`]: crate::region::Region::Other
pub(crate) fn routing_problem(
    matrix: DistanceMatrix,
    layout: &NodeLayout,
    vehicles: &[Vehicle],
    aggregation: &Aggregation,
    capacity: u32,
    penalties: Penalties,
) -> RoutingProblem {
    let visits = aggregation
        .pickups
        .iter()
        .enumerate()
        .map(|(i, pickup)| {
            let visit = VisitNode::new(layout.pickup_node(i), pickup.seats);
            if vehicles.iter().all(|vehicle| pickup.region.admits(vehicle.restricted)) {
                return visit;
            }
            visit.allowed(
                vehicles
                    .iter()
                    .enumerate()
                    .filter(|(_, vehicle)| pickup.region.admits(vehicle.restricted))
                    .map(|(v, _)| v)
                    .collect(),
            )
        })
        .collect();

    RoutingProblem {
        matrix,
        starts: (0..vehicles.len()).map(|v| layout.vehicle_node(v)).collect(),
        destination: layout.destination(),
        visits,
        capacity,
        penalties,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, PickupRequest};
    use crate::region::Region;

    fn pickup(id: &str, region: Region) -> PickupRequest {
        PickupRequest {
            id: id.to_string(),
            location: Coordinate::new(36.8, 30.7),
            seats: 1,
            region,
            source: 0,
        }
    }

    #[test]
    fn region_limits_allowed_vehicles() {
        let vehicles = [false, true, false].map(|restricted| Vehicle {
            hub: 0,
            location: Coordinate::new(36.9, 30.7),
            restricted,
        });
        let aggregation = Aggregation {
            pickups: vec![
                pickup("a", Region::AreaA),
                pickup("b", Region::AreaB),
                pickup("c", Region::Other),
            ],
            reservations: Vec::new(),
        };
        let layout = NodeLayout::new(3, 3);
        let matrix = DistanceMatrix::from_rows(vec![vec![0; 7]; 7]).expect("square");

        let problem = routing_problem(matrix, &layout, &vehicles, &aggregation, 16, Penalties::default());
        assert_eq!(problem.visits[0].allowed_vehicles, Some(vec![1]));
        assert_eq!(problem.visits[1].allowed_vehicles, Some(vec![0, 2]));
        assert_eq!(problem.visits[2].allowed_vehicles, None);
        assert_eq!(problem.visits[2].node, 5);
        assert_eq!(problem.destination, 6);
        assert!(problem.is_well_formed());
    }
}
