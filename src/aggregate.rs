//! Turns reservations into routable pickups.

use tracing::{debug, warn};

use crate::model::{PickupRequest, Reservation};
use crate::region::{DistrictExtractor, RegionTable};
use crate::traits::Geocoder;

/// Pickups ready for routing, plus the reservations they came from.
///
/// `pickups[i].source` indexes `reservations`.
#[derive(Debug, Clone, Default)]
pub struct Aggregation {
    pub pickups: Vec<PickupRequest>,
    pub reservations: Vec<Reservation>,
}

impl Aggregation {
    pub fn is_empty(&self) -> bool {
        self.pickups.is_empty()
    }

    /// Saturates at `u32::MAX`.
    pub fn total_seats(&self) -> u32 {
        self.pickups
            .iter()
            .fold(0u32, |total, pickup| total.saturating_add(pickup.seats))
    }
}

/// Filter, geocode and classify `reservations`.
///
/// Inactive reservations and blank pickups are skipped. A reservation whose
/// address cannot be geocoded is logged and left out; the rest of the batch
/// carries on.
pub fn aggregate<G: Geocoder>(
    reservations: Vec<Reservation>,
    geocoder: &G,
    districts: &DistrictExtractor,
    regions: &RegionTable,
) -> Aggregation {
    let mut aggregation = Aggregation::default();

    for mut reservation in reservations {
        if !reservation.status.is_active() || reservation.pickup.trim().is_empty() {
            debug!(reference = %reservation.reference, "skipping reservation");
            continue;
        }

        let Some(seats) = reservation.seats() else {
            warn!(
                reference = %reservation.reference,
                adults = reservation.adults,
                children = reservation.children,
                "seat count overflows, pickup skipped"
            );
            continue;
        };

        let location = match geocoder.resolve(&reservation.pickup) {
            Ok(location) => location,
            Err(err) => {
                warn!(
                    reference = %reservation.reference,
                    pickup = %reservation.pickup,
                    error = %err,
                    "geocoding failed, pickup skipped"
                );
                continue;
            }
        };

        if reservation.district.trim().is_empty() {
            reservation.district = districts.extract(&reservation.pickup).to_string();
        }

        aggregation.pickups.push(PickupRequest {
            id: reservation.reference.clone(),
            location,
            seats,
            region: regions.classify(&reservation.district),
            source: aggregation.reservations.len(),
        });
        aggregation.reservations.push(reservation);
    }

    debug!(
        pickups = aggregation.pickups.len(),
        seats = aggregation.total_seats(),
        "pickups aggregated"
    );
    aggregation
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;
    use crate::error::GeocodeError;
    use crate::model::{Coordinate, ReservationStatus};
    use crate::region::{Region, UNKNOWN_DISTRICT};

    struct FixedGeocoder;

    impl Geocoder for FixedGeocoder {
        fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
            if address.contains("nowhere") {
                Err(GeocodeError::NotFound(address.to_string()))
            } else {
                Ok(Coordinate::new(36.8, 30.6))
            }
        }
    }

    fn regions() -> RegionTable {
        RegionTable::new(["Kemer"], ["Side"])
    }

    #[test]
    fn skips_inactive_and_blank_pickups() {
        let day = date!(2026 - 07 - 01);
        let reservations = vec![
            Reservation::new("r1", day, "Hotel A, Kemer"),
            Reservation::new("r2", day, "   "),
            Reservation::new("r3", day, "Hotel C, Side").with_status(ReservationStatus::Cancelled),
            Reservation::new("r4", day, "Hotel D, Side").with_status(ReservationStatus::Changed),
        ];
        let result = aggregate(reservations, &FixedGeocoder, &DistrictExtractor::default(), &regions());

        let ids: Vec<&str> = result.pickups.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["r1", "r4"]);
        assert_eq!(result.reservations.len(), 2);
        assert_eq!(result.pickups[1].source, 1);
    }

    #[test]
    fn geocode_failure_drops_only_that_pickup() {
        let day = date!(2026 - 07 - 01);
        let reservations = vec![
            Reservation::new("r1", day, "Hotel, nowhere"),
            Reservation::new("r2", day, "Hotel B, Kemer").with_seats(2, 1),
        ];
        let result = aggregate(reservations, &FixedGeocoder, &DistrictExtractor::default(), &regions());

        assert_eq!(result.pickups.len(), 1);
        assert_eq!(result.pickups[0].id, "r2");
        assert_eq!(result.total_seats(), 3);
    }

    #[test]
    fn classifies_by_district_or_extracted_district() {
        let day = date!(2026 - 07 - 01);
        let reservations = vec![
            Reservation::new("r1", day, "Hotel A, Kemer"),
            Reservation::new("r2", day, "Hotel B, Antalya").with_district("Side"),
            Reservation::new("r3", day, "Hotel C, Somewhere"),
        ];
        let result = aggregate(reservations, &FixedGeocoder, &DistrictExtractor::default(), &regions());

        let regions: Vec<Region> = result.pickups.iter().map(|p| p.region).collect();
        assert_eq!(regions, vec![Region::AreaA, Region::AreaB, Region::Other]);
        assert_eq!(result.reservations[0].district, "Kemer");
        assert_eq!(result.reservations[2].district, UNKNOWN_DISTRICT);
    }

    #[test]
    fn overflowing_seat_count_skips_only_that_pickup() {
        let day = date!(2026 - 07 - 01);
        let reservations = vec![
            Reservation::new("r1", day, "Hotel A, Kemer").with_seats(u32::MAX, 1),
            Reservation::new("r2", day, "Hotel B, Kemer").with_seats(u32::MAX, 0),
            Reservation::new("r3", day, "Hotel C, Kemer").with_seats(2, 0),
        ];
        let result = aggregate(reservations, &FixedGeocoder, &DistrictExtractor::default(), &regions());

        let ids: Vec<&str> = result.pickups.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["r2", "r3"]);
        assert_eq!(result.total_seats(), u32::MAX);
    }

    #[test]
    fn empty_input_is_empty() {
        let result = aggregate(Vec::new(), &FixedGeocoder, &DistrictExtractor::default(), &regions());
        assert!(result.is_empty());
        assert_eq!(result.total_seats(), 0);
    }
}
