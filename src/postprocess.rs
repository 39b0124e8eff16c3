//! Maps solver routes back to hubs and pickup addresses.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Serialize, Serializer};

use crate::aggregate::Aggregation;
use crate::matrix::NodeLayout;
use crate::model::{Coordinate, Hub, Vehicle};
use crate::solver::RouteSolution;

/// Output label of a used vehicle: `vehicle-1`, `vehicle-2`, ...
///
/// Orders numerically so `vehicle-10` sorts after `vehicle-9`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VehicleLabel(pub usize);

impl fmt::Display for VehicleLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "vehicle-{}", self.0)
    }
}

impl Serialize for VehicleLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A distinct pickup address and everyone boarding there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedStop {
    pub address: String,
    pub location: Coordinate,
    pub seats: u32,
    pub references: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlannedRoute {
    pub label: VehicleLabel,
    /// Index of the vehicle in the solved fleet.
    pub vehicle: usize,
    pub hub: Hub,
    pub stops: Vec<PlannedStop>,
}

impl PlannedRoute {
    pub fn addresses(&self) -> Vec<String> {
        self.stops.iter().map(|stop| stop.address.clone()).collect()
    }

    pub fn seats(&self) -> u32 {
        self.stops.iter().fold(0u32, |total, stop| total.saturating_add(stop.seats))
    }
}

/// Used vehicles in label order, plus pickups no vehicle took.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RoutePlan {
    pub routes: Vec<PlannedRoute>,
    /// References of dropped pickups.
    pub dropped: Vec<String>,
}

impl RoutePlan {
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn addresses(&self) -> BTreeMap<VehicleLabel, Vec<String>> {
        self.routes
            .iter()
            .map(|route| (route.label, route.addresses()))
            .collect()
    }
}

/// Build the plan for `solution`. Empty vehicles are left out and the rest
/// are labelled in vehicle order. Repeated addresses on one vehicle collapse
/// into the first stop at that address.
pub fn build_plan(
    solution: &RouteSolution,
    layout: &NodeLayout,
    vehicles: &[Vehicle],
    hubs: &[Hub],
    aggregation: &Aggregation,
) -> RoutePlan {
    let mut plan = RoutePlan::default();

    for (vehicle, slot) in vehicles.iter().enumerate() {
        let mut stops: Vec<PlannedStop> = Vec::new();
        for &node in solution.interior(vehicle) {
            let Some(pickup) = layout.pickup_index(node).and_then(|i| aggregation.pickups.get(i)) else {
                continue;
            };
            let reservation = &aggregation.reservations[pickup.source];

            match stops.iter_mut().find(|stop| stop.address == reservation.pickup) {
                Some(stop) => {
                    stop.seats = stop.seats.saturating_add(pickup.seats);
                    stop.references.push(pickup.id.clone());
                }
                None => stops.push(PlannedStop {
                    address: reservation.pickup.clone(),
                    location: pickup.location,
                    seats: pickup.seats,
                    references: vec![pickup.id.clone()],
                }),
            }
        }

        if stops.is_empty() {
            continue;
        }
        let Some(hub) = hubs.get(slot.hub) else {
            continue;
        };
        plan.routes.push(PlannedRoute {
            label: VehicleLabel(plan.routes.len() + 1),
            vehicle,
            hub: hub.clone(),
            stops,
        });
    }

    plan.dropped = solution
        .dropped
        .iter()
        .filter_map(|&node| layout.pickup_index(node))
        .filter_map(|i| aggregation.pickups.get(i))
        .map(|pickup| pickup.id.clone())
        .collect();
    plan
}
