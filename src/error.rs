use thiserror::Error;

/// Failure to turn one address into a coordinate.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("address is not geocodable: {0:?}")]
    InvalidAddress(String),
    #[error("no geocoding result for {0:?}")]
    NotFound(String),
    #[error("malformed geocoder response: {0}")]
    MalformedResponse(String),
    #[error("geocoder request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Failure to obtain leg durations from the directions provider.
#[derive(Debug, Error)]
pub enum DirectionsError {
    #[error("directions service returned {code}: {}", message.as_deref().unwrap_or("no message"))]
    Service {
        code: String,
        message: Option<String>,
    },
    #[error("directions service found no route")]
    NoRoute,
    #[error("expected {expected} legs, got {actual}")]
    LegCountMismatch { expected: usize, actual: usize },
    #[error("directions request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Errors surfaced by the route planner's derived-artifact requests.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("could not build schedule for {vehicle}")]
    Directions {
        vehicle: String,
        #[source]
        source: DirectionsError,
    },
}
