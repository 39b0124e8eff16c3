//! Node layout and the integer cost matrix the solver runs on.

use crate::model::{Coordinate, PickupRequest, Vehicle};
use crate::traits::DistanceMatrixProvider;

/// Node numbering: vehicle starts first, then pickups, then the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeLayout {
    vehicles: usize,
    pickups: usize,
}

impl NodeLayout {
    pub fn new(vehicles: usize, pickups: usize) -> Self {
        Self { vehicles, pickups }
    }

    pub fn vehicle_node(&self, vehicle: usize) -> usize {
        vehicle
    }

    pub fn pickup_node(&self, pickup: usize) -> usize {
        self.vehicles + pickup
    }

    pub fn destination(&self) -> usize {
        self.vehicles + self.pickups
    }

    pub fn node_count(&self) -> usize {
        self.vehicles + self.pickups + 1
    }

    /// Pickup offset of `node`, if it is a pickup node.
    pub fn pickup_index(&self, node: usize) -> Option<usize> {
        (self.vehicles..self.vehicles + self.pickups)
            .contains(&node)
            .then(|| node - self.vehicles)
    }
}

/// Square integer cost matrix stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistanceMatrix {
    size: usize,
    costs: Vec<i64>,
}

impl DistanceMatrix {
    /// Returns `None` unless `rows` is square.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Option<Self> {
        let size = rows.len();
        if rows.iter().any(|row| row.len() != size) {
            return None;
        }
        Some(Self {
            size,
            costs: rows.into_iter().flatten().collect(),
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cost(&self, from: usize, to: usize) -> i64 {
        self.costs[from * self.size + to]
    }
}

/// Lay out vehicles, pickups and the destination and price every pair.
pub fn build_matrix<M: DistanceMatrixProvider>(
    provider: &M,
    vehicles: &[Vehicle],
    pickups: &[PickupRequest],
    destination: Coordinate,
) -> (NodeLayout, Option<DistanceMatrix>) {
    let layout = NodeLayout::new(vehicles.len(), pickups.len());

    let mut locations = Vec::with_capacity(layout.node_count());
    locations.extend(vehicles.iter().map(|vehicle| vehicle.location));
    locations.extend(pickups.iter().map(|pickup| pickup.location));
    locations.push(destination);

    let matrix = DistanceMatrix::from_rows(provider.matrix_for(&locations))
        .filter(|matrix| matrix.size() == layout.node_count());
    (layout, matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::haversine::HaversineMatrix;
    use crate::region::Region;

    fn pickup(lat: f64) -> PickupRequest {
        PickupRequest {
            id: format!("p{lat}"),
            location: Coordinate::new(lat, 30.0),
            seats: 1,
            region: Region::Other,
            source: 0,
        }
    }

    #[test]
    fn layout_offsets() {
        let layout = NodeLayout::new(3, 2);
        assert_eq!(layout.pickup_node(0), 3);
        assert_eq!(layout.destination(), 5);
        assert_eq!(layout.node_count(), 6);
        assert_eq!(layout.pickup_index(4), Some(1));
        assert_eq!(layout.pickup_index(2), None);
        assert_eq!(layout.pickup_index(5), None);
    }

    #[test]
    fn rejects_ragged_rows() {
        assert!(DistanceMatrix::from_rows(vec![vec![0, 1], vec![1]]).is_none());
    }

    #[test]
    fn builds_matrix_over_all_nodes() {
        let vehicles = [Vehicle {
            hub: 0,
            location: Coordinate::new(36.0, 30.0),
            restricted: false,
        }];
        let pickups = [pickup(36.1), pickup(36.2)];
        let (layout, matrix) = build_matrix(
            &HaversineMatrix::default(),
            &vehicles,
            &pickups,
            Coordinate::new(36.3, 30.0),
        );
        let matrix = matrix.expect("square matrix");
        assert_eq!(matrix.size(), layout.node_count());
        assert_eq!(matrix.cost(0, 0), 0);
        assert!(matrix.cost(0, layout.destination()) > matrix.cost(0, 1));
    }
}
