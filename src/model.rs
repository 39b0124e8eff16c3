//! Records flowing through the planning pipeline.
//!
//! Reservations come from the booking side, hubs and the destination are
//! configuration, and pickups/vehicles are rebuilt for every solve.

use std::fmt;

use serde::{Deserialize, Serialize};
use time::{Date, Time};

use crate::region::Region;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng)
    }
}

/// Formats as `lat,lng`, the form map services accept in place of an address.
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6},{:.6}", self.lat, self.lng)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReservationStatus {
    Confirmed,
    Changed,
    Cancelled,
}

impl ReservationStatus {
    /// Only active reservations are routed.
    pub fn is_active(self) -> bool {
        !matches!(self, ReservationStatus::Cancelled)
    }
}

/// A booked seat group waiting to be picked up.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Reservation {
    pub reference: String,
    pub status: ReservationStatus,
    pub date: Date,
    pub time: Option<Time>,
    pub adults: u32,
    pub children: u32,
    pub customer: String,
    pub phone: String,
    pub pickup: String,
    pub district: String,
    /// Tour/product the booking belongs to, used as an optional filter.
    pub category: Option<String>,
}

impl Reservation {
    /// A confirmed single-adult reservation with no district or category.
    pub fn new(reference: impl Into<String>, date: Date, pickup: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            status: ReservationStatus::Confirmed,
            date,
            time: None,
            adults: 1,
            children: 0,
            customer: String::new(),
            phone: String::new(),
            pickup: pickup.into(),
            district: String::new(),
            category: None,
        }
    }

    pub fn with_seats(mut self, adults: u32, children: u32) -> Self {
        self.adults = adults;
        self.children = children;
        self
    }

    pub fn with_district(mut self, district: impl Into<String>) -> Self {
        self.district = district.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_time(mut self, time: Time) -> Self {
        self.time = Some(time);
        self
    }

    /// Adults plus children; `None` when the sum does not fit a `u32`.
    pub fn seats(&self) -> Option<u32> {
        self.adults.checked_add(self.children)
    }
}

/// Reservation filter shared by every planner operation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlanQuery {
    /// Reservations dated on or after this day are planned.
    pub cutoff: Date,
    pub category: Option<String>,
}

impl PlanQuery {
    pub fn new(cutoff: Date) -> Self {
        Self {
            cutoff,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

/// Fixed vehicle start location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hub {
    pub name: String,
    /// Human-readable address, used as the origin of navigation links.
    pub address: String,
    pub location: Coordinate,
    /// Vehicles from this hub serve the restricted area exclusively.
    #[serde(default)]
    pub restricted: bool,
}

impl Hub {
    pub fn new(name: impl Into<String>, address: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            location,
            restricted: false,
        }
    }

    pub fn restricted(mut self) -> Self {
        self.restricted = true;
        self
    }
}

/// The shared end point of every route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Destination {
    pub name: String,
    pub location: Coordinate,
}

impl Destination {
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}

/// One routable pickup, built from a single reservation.
#[derive(Debug, Clone, PartialEq)]
pub struct PickupRequest {
    /// Reservation reference.
    pub id: String,
    pub location: Coordinate,
    pub seats: u32,
    pub region: Region,
    /// Index into the aggregation's reservation list.
    pub source: usize,
}

/// A routing slot bound to a hub.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vehicle {
    /// Index into the configured hub list.
    pub hub: usize,
    pub location: Coordinate,
    pub restricted: bool,
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use super::*;

    #[test]
    fn seats_add_adults_and_children() {
        let reservation = Reservation::new("R1", date!(2026 - 07 - 01), "Hotel, Kemer").with_seats(2, 3);
        assert_eq!(reservation.seats(), Some(5));
    }

    #[test]
    fn seats_overflow_is_none() {
        let reservation = Reservation::new("R1", date!(2026 - 07 - 01), "Hotel, Kemer").with_seats(u32::MAX, 1);
        assert_eq!(reservation.seats(), None);
    }

    #[test]
    fn coordinate_displays_as_lat_lng() {
        assert_eq!(Coordinate::new(36.876074, 31.086317).to_string(), "36.876074,31.086317");
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
    }
}
