//! OSRM HTTP adapter for per-leg driving durations.

use serde::Deserialize;
use tracing::debug;

use crate::error::DirectionsError;
use crate::traits::{DirectionsProvider, Leg, Waypoint};

#[derive(Debug, Clone)]
pub struct OsrmConfig {
    pub base_url: String,
    pub profile: String,
    pub timeout_secs: u64,
}

impl Default for OsrmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            profile: "car".to_string(),
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct OsrmClient {
    config: OsrmConfig,
    client: reqwest::blocking::Client,
}

impl OsrmClient {
    pub fn new(config: OsrmConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { config, client })
    }

    fn route_url(&self, points: &[&Waypoint]) -> String {
        // OSRM expects lng,lat.
        let coords = points
            .iter()
            .map(|point| format!("{:.6},{:.6}", point.location.lng, point.location.lat))
            .collect::<Vec<_>>()
            .join(";");

        format!(
            "{}/route/v1/{}/{}?overview=false&steps=false",
            self.config.base_url.trim_end_matches('/'),
            self.config.profile,
            coords
        )
    }
}

impl DirectionsProvider for OsrmClient {
    fn route_legs(
        &self,
        origin: &Waypoint,
        waypoints: &[Waypoint],
        destination: &Waypoint,
    ) -> Result<Vec<Leg>, DirectionsError> {
        let mut points = Vec::with_capacity(waypoints.len() + 2);
        points.push(origin);
        points.extend(waypoints);
        points.push(destination);

        let url = self.route_url(&points);
        debug!(%url, legs = points.len() - 1, "requesting osrm route");

        let body = self
            .client
            .get(url)
            .send()?
            .json::<OsrmRouteResponse>()?;
        body.into_legs(&points[1..])
    }
}

#[derive(Debug, Deserialize)]
struct OsrmRouteResponse {
    code: String,
    message: Option<String>,
    #[serde(default)]
    routes: Vec<OsrmRoute>,
}

#[derive(Debug, Deserialize)]
struct OsrmRoute {
    legs: Vec<OsrmLeg>,
}

#[derive(Debug, Deserialize)]
struct OsrmLeg {
    duration: f64,
}

impl OsrmRouteResponse {
    /// Pair each leg with the waypoint it ends at.
    fn into_legs(self, stops: &[&Waypoint]) -> Result<Vec<Leg>, DirectionsError> {
        if self.code != "Ok" {
            return Err(DirectionsError::Service {
                code: self.code,
                message: self.message,
            });
        }
        let route = self.routes.into_iter().next().ok_or(DirectionsError::NoRoute)?;
        if route.legs.len() != stops.len() {
            return Err(DirectionsError::LegCountMismatch {
                expected: stops.len(),
                actual: route.legs.len(),
            });
        }

        Ok(route
            .legs
            .into_iter()
            .zip(stops)
            .map(|(leg, stop)| Leg {
                stop: stop.label.clone(),
                duration_secs: leg.duration.max(0.0).round() as u64,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Coordinate;

    fn stops() -> Vec<Waypoint> {
        vec![
            Waypoint::new("Hotel A, Kemer", Coordinate::new(36.60, 30.56)),
            Waypoint::new("Land of Legends", Coordinate::new(36.876074, 31.086317)),
        ]
    }

    #[test]
    fn builds_route_url_in_lng_lat_order() {
        let client = OsrmClient::new(OsrmConfig {
            base_url: "http://osrm.local/".to_string(),
            ..OsrmConfig::default()
        })
        .expect("client");
        let origin = Waypoint::new("hub", Coordinate::new(36.5, 30.5));
        let stops = stops();
        let points: Vec<&Waypoint> = std::iter::once(&origin).chain(&stops).collect();

        assert_eq!(
            client.route_url(&points),
            "http://osrm.local/route/v1/car/30.500000,36.500000;30.560000,36.600000;31.086317,36.876074?overview=false&steps=false"
        );
    }

    #[test]
    fn parses_legs_labelled_by_end_stop() {
        let body: OsrmRouteResponse = serde_json::from_str(
            r#"{"code":"Ok","routes":[{"legs":[{"duration":612.4},{"duration":1800.0}],"distance":1}]}"#,
        )
        .expect("json");
        let stops = stops();
        let refs: Vec<&Waypoint> = stops.iter().collect();
        let legs = body.into_legs(&refs).expect("legs");

        assert_eq!(legs.len(), 2);
        assert_eq!(legs[0].stop, "Hotel A, Kemer");
        assert_eq!(legs[0].duration_secs, 612);
        assert_eq!(legs[1].stop, "Land of Legends");
    }

    #[test]
    fn service_error_is_reported() {
        let body: OsrmRouteResponse =
            serde_json::from_str(r#"{"code":"NoSegment","message":"Could not find a matching segment"}"#)
                .expect("json");
        let stops = stops();
        let refs: Vec<&Waypoint> = stops.iter().collect();
        let err = body.into_legs(&refs).expect_err("service error");

        assert!(matches!(err, DirectionsError::Service { ref code, .. } if code == "NoSegment"));
    }

    #[test]
    fn leg_count_mismatch_is_reported() {
        let body: OsrmRouteResponse =
            serde_json::from_str(r#"{"code":"Ok","routes":[{"legs":[{"duration":5.0}]}]}"#).expect("json");
        let stops = stops();
        let refs: Vec<&Waypoint> = stops.iter().collect();

        assert!(matches!(
            body.into_legs(&refs),
            Err(DirectionsError::LegCountMismatch { expected: 2, actual: 1 })
        ));
    }
}
