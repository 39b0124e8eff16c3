//! fleet-router core
//!
//! Assigns geocoded pickups to a fleet of hub-based vehicles that all drive
//! to one destination, and derives navigation links and stop schedules from
//! the resulting routes.

pub mod aggregate;
pub mod booking;
pub mod cache;
pub mod config;
pub mod error;
pub mod fleet;
pub mod geocode;
pub mod haversine;
pub mod links;
pub mod matrix;
pub mod model;
pub mod osrm;
pub mod planner;
pub mod pool;
pub mod postprocess;
pub mod region;
pub mod schedule;
pub mod solver;
pub mod traits;

pub use config::EngineConfig;
pub use error::{DirectionsError, GeocodeError, PlanError};
pub use planner::RoutePlanner;
