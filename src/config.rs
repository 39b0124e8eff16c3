//! Engine configuration with the production defaults.

use std::time::Duration as StdDuration;

use time::macros::time;
use time::{Duration, Time};

use crate::fleet::FleetPolicy;
use crate::model::{Coordinate, Destination, Hub};
use crate::region::{DistrictExtractor, RegionTable};
use crate::solver::{Penalties, SearchOptions};

#[derive(Debug, Clone)]
pub struct FleetConfig {
    /// Seats per vehicle.
    pub capacity: u32,
    /// Vehicles planned even when demand is light.
    pub min_fleet: usize,
    pub policy: FleetPolicy,
}

impl Default for FleetConfig {
    fn default() -> Self {
        Self {
            capacity: 16,
            min_fleet: 4,
            policy: FleetPolicy::Replicate,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Departure time from the hub.
    pub day_start: Time,
    /// Time spent at every stop.
    pub dwell: Duration,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            day_start: time!(9:00),
            dwell: Duration::minutes(10),
        }
    }
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Vehicle start points, in fleet order.
    pub hubs: Vec<Hub>,
    pub destination: Destination,
    pub fleet: FleetConfig,
    pub penalties: Penalties,
    pub search: SearchOptions,
    pub schedule: ScheduleConfig,
    pub regions: RegionTable,
    pub districts: DistrictExtractor,
    /// How long a computed plan is reused for the same query and snapshot.
    pub cache_ttl: StdDuration,
    /// Threads in the solve pool; 0 lets rayon decide.
    pub solve_threads: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hubs: default_hubs(),
            destination: Destination::new("Land of Legends", Coordinate::new(36.876074, 31.086317)),
            fleet: FleetConfig::default(),
            penalties: Penalties::default(),
            search: SearchOptions::default(),
            schedule: ScheduleConfig::default(),
            regions: RegionTable::default(),
            districts: DistrictExtractor::default(),
            cache_ttl: StdDuration::from_secs(5 * 60),
            solve_threads: 2,
        }
    }
}

impl EngineConfig {
    pub fn with_hubs(mut self, hubs: Vec<Hub>) -> Self {
        self.hubs = hubs;
        self
    }

    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    pub fn with_search(mut self, search: SearchOptions) -> Self {
        self.search = search;
        self
    }

    pub fn with_fleet(mut self, fleet: FleetConfig) -> Self {
        self.fleet = fleet;
        self
    }

    pub fn with_regions(mut self, regions: RegionTable) -> Self {
        self.regions = regions;
        self
    }

    pub fn with_cache_ttl(mut self, ttl: StdDuration) -> Self {
        self.cache_ttl = ttl;
        self
    }
}

/// Driver hubs around Antalya. The Kemer hubs serve the Kemer coast only.
///
/// Ordered so the smallest fleet already mixes both kinds of vehicle.
fn default_hubs() -> Vec<Hub> {
    let mahmutlar = Hub::new(
        "Mahmutlar",
        "Mahmutlar, Sarıhasanlı Cd. no:86, 07450 Alanya/Antalya, Türkiye",
        Coordinate::new(36.492500, 32.093600),
    );
    let kemer_kiris = Hub::new(
        "Kemer Kiriş",
        "Kiriş, Sahil Cd. No:15, 07980 Kemer/Antalya, Türkiye",
        Coordinate::new(36.631000, 30.556000),
    )
    .restricted();

    vec![
        mahmutlar.clone(),
        kemer_kiris.clone(),
        Hub::new(
            "Konyaaltı",
            "Bahtılı, 3351 Sokak No:4, 07070 Konyaaltı/Antalya, Türkiye",
            Coordinate::new(36.870000, 30.640000),
        ),
        Hub::new(
            "Kundu",
            "Kundu, Tesisler Caddesi No:454, 07112 Aksu/Antalya, Türkiye",
            Coordinate::new(36.859000, 30.894000),
        ),
        Hub::new(
            "Muratpaşa",
            "1620 sokak no 25 daire 1 Muratpaşa Antalya",
            Coordinate::new(36.887000, 30.718000),
        ),
        mahmutlar,
        kemer_kiris,
        Hub::new(
            "Kemer",
            "Şehit Er Hasan Yılmaz Cad. No:20, 07000 Kemer/Antalya, Türkiye",
            Coordinate::new(36.599000, 30.559000),
        )
        .restricted(),
    ]
}
