//! Booking events and an in-memory reservation book.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use time::{Date, Time};
use tracing::{debug, info};

use crate::model::{PlanQuery, Reservation, ReservationStatus};
use crate::region::DistrictExtractor;
use crate::traits::ReservationSource;

/// New values carried by a change notice. Blank text fields leave the stored
/// value untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservationChange {
    pub reference: String,
    pub date: Date,
    pub time: Option<Time>,
    pub adults: u32,
    pub children: u32,
    pub customer: String,
    pub phone: String,
    pub pickup: String,
    pub category: Option<String>,
}

impl ReservationChange {
    fn into_reservation(self, districts: &DistrictExtractor) -> Reservation {
        let district = districts.extract(&self.pickup).to_string();
        Reservation {
            reference: self.reference,
            status: ReservationStatus::Changed,
            date: self.date,
            time: self.time,
            adults: self.adults,
            children: self.children,
            customer: self.customer,
            phone: self.phone,
            pickup: self.pickup,
            district,
            category: self.category,
        }
    }
}

/// A parsed booking message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingEvent {
    Confirmed(Reservation),
    Changed(ReservationChange),
    Cancelled { reference: String },
}

impl BookingEvent {
    pub fn reference(&self) -> &str {
        match self {
            BookingEvent::Confirmed(reservation) => &reservation.reference,
            BookingEvent::Changed(change) => &change.reference,
            BookingEvent::Cancelled { reference } => reference,
        }
    }
}

/// What applying an event did to the book.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    Inserted,
    Updated,
    Removed,
    Ignored,
}

/// Reservations keyed by reference.
#[derive(Debug, Default)]
pub struct ReservationBook {
    reservations: RwLock<HashMap<String, Reservation>>,
    districts: DistrictExtractor,
}

impl ReservationBook {
    pub fn new(districts: DistrictExtractor) -> Self {
        Self {
            reservations: RwLock::new(HashMap::new()),
            districts,
        }
    }

    pub fn apply(&self, event: BookingEvent) -> EventOutcome {
        let mut reservations = self.reservations.write().unwrap_or_else(PoisonError::into_inner);
        let reference = event.reference().to_string();

        let outcome = match event {
            BookingEvent::Confirmed(mut reservation) => {
                if reservation.district.trim().is_empty() {
                    reservation.district = self.districts.extract(&reservation.pickup).to_string();
                }
                match reservations.insert(reference.clone(), reservation) {
                    Some(_) => EventOutcome::Updated,
                    None => EventOutcome::Inserted,
                }
            }
            BookingEvent::Changed(change) => match reservations.get_mut(&reference) {
                Some(existing) => {
                    update(existing, change, &self.districts);
                    EventOutcome::Updated
                }
                None => {
                    reservations.insert(reference.clone(), change.into_reservation(&self.districts));
                    EventOutcome::Inserted
                }
            },
            BookingEvent::Cancelled { .. } => match reservations.remove(&reference) {
                Some(_) => EventOutcome::Removed,
                None => EventOutcome::Ignored,
            },
        };

        info!(%reference, ?outcome, "booking event applied");
        outcome
    }

    pub fn get(&self, reference: &str) -> Option<Reservation> {
        let reservations = self.reservations.read().unwrap_or_else(PoisonError::into_inner);
        reservations.get(reference).cloned()
    }

    pub fn len(&self) -> usize {
        self.reservations.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn update(existing: &mut Reservation, change: ReservationChange, districts: &DistrictExtractor) {
    existing.date = change.date;
    existing.time = change.time;
    existing.adults = change.adults;
    existing.children = change.children;
    if !change.pickup.trim().is_empty() {
        existing.district = districts.extract(&change.pickup).to_string();
        existing.pickup = change.pickup;
    }
    if !change.customer.trim().is_empty() {
        existing.customer = change.customer;
    }
    if !change.phone.trim().is_empty() {
        existing.phone = change.phone;
    }
    if change.category.is_some() {
        existing.category = change.category;
    }
    existing.status = ReservationStatus::Changed;
}

impl ReservationSource for ReservationBook {
    fn snapshot(&self, query: &PlanQuery) -> Vec<Reservation> {
        let reservations = self.reservations.read().unwrap_or_else(PoisonError::into_inner);
        let mut selected: Vec<Reservation> = reservations
            .values()
            .filter(|r| r.date >= query.cutoff)
            .filter(|r| query.category.is_none() || r.category == query.category)
            .cloned()
            .collect();
        drop(reservations);

        // Reference breaks ties so snapshots are stable across calls.
        selected.sort_by(|a, b| (a.date, a.time, &a.reference).cmp(&(b.date, b.time, &b.reference)));
        debug!(cutoff = %query.cutoff, count = selected.len(), "reservation snapshot");
        selected
    }
}
