//! Turn-by-turn navigation links for planned routes.

use serde::Serialize;
use url::form_urlencoded::byte_serialize;

use crate::postprocess::PlannedRoute;

const MAPS_DIR_URL: &str = "https://www.google.com/maps/dir/?api=1";

/// Outbound and return links for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationLinks {
    pub outbound: String,
    #[serde(rename = "return")]
    pub return_trip: String,
}

fn encode(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

/// A driving directions link through `waypoints` in the given order.
pub fn maps_url<S: AsRef<str>>(origin: &str, destination: &str, waypoints: &[S]) -> String {
    let mut url = format!(
        "{MAPS_DIR_URL}&origin={}&destination={}&travelmode=driving",
        encode(origin),
        encode(destination)
    );
    if !waypoints.is_empty() {
        let joined = waypoints
            .iter()
            .map(|waypoint| encode(waypoint.as_ref()))
            .collect::<Vec<_>>()
            .join("%7C");
        url.push_str("&waypoints=");
        url.push_str(&joined);
    }
    url
}

/// Hub to `destination` through the stops, and back through them reversed.
pub fn navigation_links(route: &PlannedRoute, destination: &str) -> NavigationLinks {
    let mut stops = route.addresses();
    let outbound = maps_url(&route.hub.address, destination, &stops);
    stops.reverse();
    let return_trip = maps_url(destination, &route.hub.address, &stops);

    NavigationLinks { outbound, return_trip }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Coordinate, Hub};
    use crate::postprocess::{PlannedStop, VehicleLabel};

    fn stop(address: &str) -> PlannedStop {
        PlannedStop {
            address: address.to_string(),
            location: Coordinate::new(36.7, 30.6),
            seats: 1,
            references: vec![],
        }
    }

    #[test]
    fn encodes_parameters_and_joins_waypoints() {
        let url = maps_url("Depot, Kemer", "Park", &["A & B, Side", "C"]);
        assert_eq!(
            url,
            "https://www.google.com/maps/dir/?api=1&origin=Depot%2C+Kemer&destination=Park\
             &travelmode=driving&waypoints=A+%26+B%2C+Side%7CC"
        );
    }

    #[test]
    fn omits_empty_waypoints() {
        let url = maps_url::<&str>("a", "b", &[]);
        assert!(!url.contains("waypoints"));
        assert!(url.ends_with("&travelmode=driving"));
    }

    #[test]
    fn return_link_reverses_stops() {
        let route = PlannedRoute {
            label: VehicleLabel(1),
            vehicle: 0,
            hub: Hub::new("depot", "Depot", Coordinate::new(36.9, 30.7)),
            stops: vec![stop("First"), stop("Second")],
        };
        let links = navigation_links(&route, "Park");

        assert!(links.outbound.contains("origin=Depot&destination=Park"));
        assert!(links.outbound.ends_with("waypoints=First%7CSecond"));
        assert!(links.return_trip.contains("origin=Park&destination=Depot"));
        assert!(links.return_trip.ends_with("waypoints=Second%7CFirst"));
    }
}
