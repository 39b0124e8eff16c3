//! Address resolution: normalisation, an in-process cache and a Nominatim
//! HTTP adapter.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use serde::Deserialize;
use tracing::{debug, info};

use crate::error::GeocodeError;
use crate::model::Coordinate;
use crate::traits::Geocoder;

/// Tidy whitespace around commas and collapse runs of whitespace.
pub fn normalize_address(raw: &str) -> String {
    raw.split(',')
        .map(|part| part.split_whitespace().collect::<Vec<_>>().join(" "))
        .collect::<Vec<_>>()
        .join(", ")
        .trim()
        .to_string()
}

/// An address is worth geocoding when text sits on both sides of a comma
/// (street and city at minimum).
pub fn is_valid_address(address: &str) -> bool {
    let first = address.find(|c: char| c.is_ascii_alphabetic());
    let last = address.rfind(|c: char| c.is_ascii_alphabetic());
    match (first, last) {
        (Some(first), Some(last)) if first < last => address[first..last].contains(','),
        _ => false,
    }
}

/// Parse a literal `lat,lng` pair.
pub fn parse_lat_lng(text: &str) -> Option<Coordinate> {
    let (lat, lng) = text.split_once(',')?;
    if lng.contains(',') {
        return None;
    }
    let coordinate = Coordinate::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
    coordinate.is_valid().then_some(coordinate)
}

/// Caching front for any [`Geocoder`].
///
/// Lookups are keyed by the normalised address. Concurrent misses on the same
/// address may both reach the inner geocoder; the first stored coordinate wins.
#[derive(Debug)]
pub struct CachedGeocoder<G> {
    inner: G,
    cache: RwLock<HashMap<String, Coordinate>>,
}

impl<G> CachedGeocoder<G> {
    pub fn new(inner: G) -> Self {
        Self {
            inner,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Seed the cache, e.g. from a persisted table. Existing entries win.
    pub fn preload<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, Coordinate)>,
    {
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        for (address, coordinate) in entries {
            cache.entry(normalize_address(&address)).or_insert(coordinate);
        }
    }

    pub fn cached(&self, address: &str) -> Option<Coordinate> {
        let cache = self.cache.read().unwrap_or_else(PoisonError::into_inner);
        cache.get(&normalize_address(address)).copied()
    }

    pub fn len(&self) -> usize {
        self.cache.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<G: Geocoder> Geocoder for CachedGeocoder<G> {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let key = normalize_address(address);
        if let Some(coordinate) = parse_lat_lng(&key) {
            return Ok(coordinate);
        }
        if let Some(coordinate) = self.cached(&key) {
            return Ok(coordinate);
        }
        if !is_valid_address(&key) {
            return Err(GeocodeError::InvalidAddress(key));
        }

        let coordinate = self.inner.resolve(&key)?;
        let mut cache = self.cache.write().unwrap_or_else(PoisonError::into_inner);
        let stored = *cache.entry(key).or_insert(coordinate);
        debug!(address, lat = stored.lat, lng = stored.lng, "geocoded address");
        Ok(stored)
    }
}

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Nominatim rejects requests without an identifying user agent.
    pub user_agent: String,
    /// Comma-separated ISO country codes narrowing the search.
    pub country_codes: Option<String>,
}

impl Default for GeocoderConfig {
    fn default() -> Self {
        Self {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            timeout_secs: 10,
            user_agent: concat!("fleet-router/", env!("CARGO_PKG_VERSION")).to_string(),
            country_codes: None,
        }
    }
}

/// Blocking geocoder for the Nominatim `search` API.
#[derive(Debug, Clone)]
pub struct NominatimGeocoder {
    config: GeocoderConfig,
    client: reqwest::blocking::Client,
}

impl NominatimGeocoder {
    pub fn new(config: GeocoderConfig) -> Result<Self, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        info!(base_url = %config.base_url, "nominatim geocoder ready");
        Ok(Self { config, client })
    }
}

impl Geocoder for NominatimGeocoder {
    fn resolve(&self, address: &str) -> Result<Coordinate, GeocodeError> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));
        let mut params = vec![("q", address), ("format", "json"), ("limit", "1")];
        if let Some(codes) = &self.config.country_codes {
            params.push(("countrycodes", codes.as_str()));
        }

        let places = self
            .client
            .get(url)
            .query(&params)
            .send()?
            .error_for_status()?
            .json::<Vec<NominatimPlace>>()?;

        let place = places
            .into_iter()
            .next()
            .ok_or_else(|| GeocodeError::NotFound(address.to_string()))?;
        place.coordinate()
    }
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

impl NominatimPlace {
    fn coordinate(&self) -> Result<Coordinate, GeocodeError> {
        let parse = |value: &str| {
            value
                .parse::<f64>()
                .map_err(|_| GeocodeError::MalformedResponse(format!("bad coordinate {value:?}")))
        };
        let coordinate = Coordinate::new(parse(&self.lat)?, parse(&self.lon)?);
        if coordinate.is_valid() {
            Ok(coordinate)
        } else {
            Err(GeocodeError::MalformedResponse(format!(
                "coordinate out of range: {coordinate}"
            )))
        }
    }
}
