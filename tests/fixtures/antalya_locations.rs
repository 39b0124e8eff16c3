//! Hotel locations along the Antalya coast for realistic test fixtures.
//!
//! Coordinates are approximate resort positions; addresses carry the district
//! name the way booking messages do.

use fleet_router::model::Coordinate;

/// A named pickup location with its booking-style address.
#[derive(Debug, Clone)]
pub struct Location {
    pub name: &'static str,
    pub address: &'static str,
    pub lat: f64,
    pub lng: f64,
}

impl Location {
    pub const fn new(name: &'static str, address: &'static str, lat: f64, lng: f64) -> Self {
        Self {
            name,
            address,
            lat,
            lng,
        }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }
}

/// The shared destination of every route.
pub const LAND_OF_LEGENDS: Location = Location::new(
    "Land of Legends",
    "Kadriye, Land of Legends, Serik/Antalya",
    36.876074,
    31.086317,
);

// ============================================================================
// Kemer coast (restricted area)
// ============================================================================

pub const KEMER_HOTELS: &[Location] = &[
    Location::new("Rixos Sungate", "Rixos Sungate, Beldibi, Kemer/Antalya", 36.7142, 30.5702),
    Location::new("Akka Antedon", "Akka Antedon, Beldibi, Kemer/Antalya", 36.7001, 30.5650),
    Location::new("Kemer Marina Hotel", "Marina Hotel, Kemer/Antalya", 36.6010, 30.5620),
    Location::new("Amara Dolce Vita", "Amara Dolce Vita, Tekirova, Kemer/Antalya", 36.5050, 30.5290),
    Location::new("Club Göynük", "Club Hotel, Göynük, Kemer/Antalya", 36.6620, 30.5490),
    Location::new("Çamyuva Beach", "Beach Resort, Çamyuva, Kemer/Antalya", 36.5560, 30.5580),
];

// ============================================================================
// Side / Manavgat coast (area B)
// ============================================================================

pub const SIDE_HOTELS: &[Location] = &[
    Location::new("Side Crown", "Crown Hotel, Side, Manavgat/Antalya", 36.7670, 31.3890),
    Location::new("Sorgun Resort", "Resort Hotel, Sorgun, Manavgat/Antalya", 36.7530, 31.4180),
    Location::new("Kumköy Palace", "Palace Hotel, Kumköy, Manavgat/Antalya", 36.7730, 31.3740),
    Location::new("Çolaklı Beach", "Beach Club, Çolaklı, Manavgat/Antalya", 36.7920, 31.3390),
    Location::new("Kızılot Resort", "Resort, Kızılot, Manavgat/Antalya", 36.7110, 31.5340),
];

// ============================================================================
// Antalya city and Belek (unrestricted)
// ============================================================================

pub const CITY_HOTELS: &[Location] = &[
    Location::new("Lara Barut", "Barut Hotel, Lara, Muratpaşa/Antalya", 36.8580, 30.8180),
    Location::new("Konyaaltı Beach Hotel", "Beach Hotel, Konyaaltı/Antalya", 36.8640, 30.6380),
    Location::new("Kaleiçi Boutique", "Boutique Hotel, Kaleiçi, Muratpaşa/Antalya", 36.8840, 30.7050),
    Location::new("Belek Regnum", "Regnum Carya, Belek, Serik/Antalya", 36.8470, 31.0220),
    Location::new("Kadriye Gloria", "Gloria Serenity, Kadriye, Serik/Antalya", 36.8560, 31.0480),
    Location::new("Kundu Titanic", "Titanic Beach, Kundu, Aksu/Antalya", 36.8550, 30.8850),
];

/// All fixture locations, useful for geocoder stubs.
pub fn all_locations() -> impl Iterator<Item = &'static Location> {
    KEMER_HOTELS.iter().chain(SIDE_HOTELS).chain(CITY_HOTELS)
}
