// Mapping between pool-local metres and geographic coordinates

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Metres per degree of latitude (and of longitude at the equator)
pub const METERS_PER_DEGREE: f64 = 111_320.0;

/// A latitude/longitude pair in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

/// Geographic position of the world origin (the pool's lower-left corner)
///
/// Uses an equirectangular projection, which is plenty for a pool a few tens
/// of metres across: north is +y, east is +x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoOrigin {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for GeoOrigin {
    fn default() -> Self {
        Self {
            latitude: 47.3769,
            longitude: 8.5417,
        }
    }
}

impl GeoOrigin {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Metres per degree of longitude at the origin's latitude
    fn meters_per_degree_lon(&self) -> f64 {
        METERS_PER_DEGREE * self.latitude.to_radians().cos()
    }

    /// Convert a world position (metres) to geographic coordinates
    pub fn to_geo(&self, world: Vec2) -> GeoPoint {
        GeoPoint {
            latitude: self.latitude + world.y as f64 / METERS_PER_DEGREE,
            longitude: self.longitude + world.x as f64 / self.meters_per_degree_lon(),
        }
    }

    /// Convert geographic coordinates back to a world position (metres)
    pub fn to_world(&self, geo: GeoPoint) -> Vec2 {
        let x = (geo.longitude - self.longitude) * self.meters_per_degree_lon();
        let y = (geo.latitude - self.latitude) * METERS_PER_DEGREE;
        Vec2::new(x as f32, y as f32)
    }

    /// Whether the projection is usable (longitude degrees must not collapse)
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && self.latitude.abs() < 89.0
            && self.longitude.abs() <= 180.0
    }
}
