// Shared math: angle conventions and geographic mapping

pub mod geo;
pub mod math;

pub use geo::{GeoOrigin, GeoPoint};
