//! Arrival and departure estimates along a route.

use serde::{ser, Serialize, Serializer};
use time::error::Format;
use time::macros::format_description;
use time::{Duration, Time};

use crate::traits::Leg;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopTime {
    pub stop: String,
    #[serde(serialize_with = "serialize_hh_mm")]
    pub arrival: Time,
    #[serde(serialize_with = "serialize_hh_mm")]
    pub departure: Time,
}

impl StopTime {
    pub fn arrival_hh_mm(&self) -> Result<String, Format> {
        hh_mm(self.arrival)
    }

    pub fn departure_hh_mm(&self) -> Result<String, Format> {
        hh_mm(self.departure)
    }
}

/// 24-hour `HH:MM`.
pub fn hh_mm(time: Time) -> Result<String, Format> {
    time.format(format_description!("[hour]:[minute]"))
}

fn serialize_hh_mm<S: Serializer>(time: &Time, serializer: S) -> Result<S::Ok, S::Error> {
    let text = hh_mm(*time).map_err(<S::Error as ser::Error>::custom)?;
    serializer.serialize_str(&text)
}

/// Walk `legs` from `day_start`, dwelling at every stop. Clock times wrap at
/// midnight.
pub fn estimate(legs: &[Leg], day_start: Time, dwell: Duration) -> Vec<StopTime> {
    let mut cursor = day_start;
    legs.iter()
        .map(|leg| {
            let arrival = cursor + Duration::seconds(i64::try_from(leg.duration_secs).unwrap_or(i64::MAX));
            let departure = arrival + dwell;
            cursor = departure;
            StopTime {
                stop: leg.stop.clone(),
                arrival,
                departure,
            }
        })
        .collect()
}
