//! Fleet sizing and hub assignment.

use tracing::debug;

use crate::model::{Hub, Vehicle};

/// How the fleet grows when demand exceeds one vehicle per hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FleetPolicy {
    /// Add vehicles past the hub count, reusing hubs cyclically.
    #[default]
    Replicate,
    /// Never run more vehicles than there are hubs.
    CapAtHubs,
}

/// Vehicles needed for `total_seats`: enough to seat everyone, never fewer
/// than `min_fleet`, and at least one.
pub fn min_vehicles(total_seats: u32, capacity: u32, min_fleet: usize) -> usize {
    let needed = total_seats.div_ceil(capacity.max(1)) as usize;
    needed.max(min_fleet).max(1)
}

/// Build vehicle slots for `total_seats`, vehicle `i` departing from hub
/// `i % hubs.len()`. No hubs means no fleet.
pub fn build_fleet(hubs: &[Hub], total_seats: u32, capacity: u32, min_fleet: usize, policy: FleetPolicy) -> Vec<Vehicle> {
    if hubs.is_empty() {
        return Vec::new();
    }

    let mut count = min_vehicles(total_seats, capacity, min_fleet);
    if policy == FleetPolicy::CapAtHubs {
        count = count.min(hubs.len());
    }
    debug!(total_seats, vehicles = count, hubs = hubs.len(), "fleet sized");

    (0..count)
        .map(|i| {
            let hub = i % hubs.len();
            Vehicle {
                hub,
                location: hubs[hub].location,
                restricted: hubs[hub].restricted,
            }
        })
        .collect()
}
