//! Test fixtures for fleet-router.
//!
//! Hotel locations along the Antalya coast and the shared destination.

#![allow(dead_code)]

pub mod antalya_locations;

pub use antalya_locations::*;
