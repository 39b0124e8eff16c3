//! Great-circle distance matrix provider.
//!
//! Costs are straight-line distances scaled to integers (meters by default).
//! Rows are computed in parallel.

use rayon::prelude::*;

use crate::model::Coordinate;
use crate::traits::DistanceMatrixProvider;

/// Cost units per kilometer.
const DEFAULT_UNITS_PER_KM: f64 = 1000.0;

/// Earth radius in kilometers.
const EARTH_RADIUS_KM: f64 = 6371.0;

/// Calculate haversine distance between two points in kilometers.
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.lat.to_radians();
    let lat2_rad = to.lat.to_radians();
    let delta_lat = (to.lat - from.lat).to_radians();
    let delta_lng = (to.lng - from.lng).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lng / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().asin();

    EARTH_RADIUS_KM * c
}

/// Haversine-based distance matrix provider.
#[derive(Debug, Clone)]
pub struct HaversineMatrix {
    /// Integer cost units per kilometer.
    pub units_per_km: f64,
}

impl Default for HaversineMatrix {
    fn default() -> Self {
        Self {
            units_per_km: DEFAULT_UNITS_PER_KM,
        }
    }
}

impl HaversineMatrix {
    pub fn new(units_per_km: f64) -> Self {
        Self { units_per_km }
    }

    fn cost(&self, from: Coordinate, to: Coordinate) -> i64 {
        (haversine_km(from, to) * self.units_per_km).round() as i64
    }
}

impl DistanceMatrixProvider for HaversineMatrix {
    fn matrix_for(&self, locations: &[Coordinate]) -> Vec<Vec<i64>> {
        locations
            .par_iter()
            .enumerate()
            .map(|(i, from)| {
                locations
                    .iter()
                    .enumerate()
                    .map(|(j, to)| if i == j { 0 } else { self.cost(*from, *to) })
                    .collect()
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(36.87, 31.08);
        assert!(haversine_km(p, p) < 0.001, "Same point should have ~0 distance");
    }

    #[test]
    fn test_haversine_known_distance() {
        // Antalya old town to Alanya castle is roughly 115 km as the crow flies.
        let antalya = Coordinate::new(36.8841, 30.7056);
        let alanya = Coordinate::new(36.5370, 31.9930);
        let dist = haversine_km(antalya, alanya);
        assert!(dist > 110.0 && dist < 125.0, "expected ~120km, got {}", dist);
    }

    #[test]
    fn test_matrix_diagonal_is_zero() {
        let provider = HaversineMatrix::default();
        let locations = vec![
            Coordinate::new(36.1, 30.1),
            Coordinate::new(36.2, 30.2),
            Coordinate::new(36.3, 30.3),
        ];
        let matrix = provider.matrix_for(&locations);

        for i in 0..locations.len() {
            assert_eq!(matrix[i][i], 0, "Diagonal should be zero");
        }
    }

    #[test]
    fn test_matrix_symmetric() {
        let provider = HaversineMatrix::default();
        let locations = vec![Coordinate::new(36.1, 30.1), Coordinate::new(36.2, 30.2)];
        let matrix = provider.matrix_for(&locations);

        assert_eq!(matrix[0][1], matrix[1][0], "Matrix should be symmetric");
    }

    #[test]
    fn test_cost_is_rounded_meters() {
        let provider = HaversineMatrix::default();
        let from = Coordinate::new(36.0, 30.0);
        let to = Coordinate::new(36.01, 30.0);
        let expected = (haversine_km(from, to) * 1000.0).round() as i64;
        assert_eq!(provider.matrix_for(&[from, to])[0][1], expected);
        // 0.01 degree of latitude is ~1.11 km.
        assert!((1100..1125).contains(&expected));
    }

    #[test]
    fn test_empty_locations() {
        assert!(HaversineMatrix::default().matrix_for(&[]).is_empty());
    }
}
