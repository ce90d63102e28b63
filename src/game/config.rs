// Simulation configuration
//
// Every tunable of the pool scenario lives here. The defaults describe the
// standard scenario; a JSON document can override any subset of fields.

use serde::{Deserialize, Serialize};
use std::path::Path;

use super::SimError;
use crate::core::geo::GeoOrigin;

/// How the propellers are arranged on the hull
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropulsionLayout {
    /// One stern propeller steered by a rudder
    Rudder,
    /// Two fixed propellers, steering by thrust difference
    Differential,
}

/// Pool dimensions (metres)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolConfig {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
}

pub const BASE_POOL: PoolConfig = PoolConfig {
    width: 20.0,
    height: 10.0,
    wall_thickness: 0.5,
};

impl Default for PoolConfig {
    fn default() -> Self {
        BASE_POOL
    }
}

/// Boat properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoatStats {
    /// Start position in pool metres
    pub start_x: f32,
    pub start_y: f32,
    /// Start compass heading in degrees (0 = north, 90 = east)
    pub start_heading: f32,
    /// Hull mass (kg)
    pub mass: f32,
    /// Propeller thrust at full power (N): force = k * control
    pub thrust_coefficient: f32,
    /// Maximum rudder deflection (degrees)
    pub max_rudder: f32,
    /// Water drag on translation
    pub linear_damping: f32,
    /// Water drag on rotation
    pub angular_damping: f32,
    pub propulsion: PropulsionLayout,
}

pub const BASE_BOAT: BoatStats = BoatStats {
    start_x: 2.0,
    start_y: 5.0,
    start_heading: 90.0,
    mass: 5.0,
    thrust_coefficient: 20.0,
    max_rudder: 35.0,
    linear_damping: 1.0,
    angular_damping: 2.0,
    propulsion: PropulsionLayout::Rudder,
};

impl Default for BoatStats {
    fn default() -> Self {
        BASE_BOAT
    }
}

/// Bottle field properties
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BottleStats {
    pub count: usize,
    /// Weight of a single bottle (kg), also its physical mass
    pub weight: f32,
    pub linear_damping: f32,
    pub angular_damping: f32,
    /// Minimum distance between a bottle and any wall
    pub wall_clearance: f32,
    /// Minimum distance between a bottle and the boat's start position
    pub boat_clearance: f32,
    /// Minimum distance between two bottles
    pub spacing: f32,
    /// Attempts per bottle before placement gives up
    pub max_attempts: u32,
}

pub const BASE_BOTTLES: BottleStats = BottleStats {
    count: 8,
    weight: 0.5,
    linear_damping: 2.0,
    angular_damping: 2.0,
    wall_clearance: 1.0,
    boat_clearance: 2.5,
    spacing: 0.6,
    max_attempts: 1000,
};

impl Default for BottleStats {
    fn default() -> Self {
        BASE_BOTTLES
    }
}

/// Forward-looking bottle detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Detection range (metres, exclusive)
    pub range: f32,
    /// Half-aperture either side of the bow (degrees, exclusive)
    pub angle: f32,
}

pub const BASE_DETECTOR: DetectorConfig = DetectorConfig {
    range: 6.0,
    angle: 45.0,
};

impl Default for DetectorConfig {
    fn default() -> Self {
        BASE_DETECTOR
    }
}

/// Complete scenario configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub pool: PoolConfig,
    pub boat: BoatStats,
    pub bottles: BottleStats,
    pub detector: DetectorConfig,
    pub geo_origin: GeoOrigin,
    /// Seed for bottle placement
    pub seed: u64,
    /// Tick limit for `Simulation::run`
    pub max_ticks: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            boat: BoatStats::default(),
            bottles: BottleStats::default(),
            detector: DetectorConfig::default(),
            geo_origin: GeoOrigin::default(),
            seed: 42,
            max_ticks: 3600,
        }
    }
}

fn require_positive(name: &str, value: f32) -> Result<(), SimError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{name} must be positive, got {value}"
        )))
    }
}

fn require_non_negative(name: &str, value: f32) -> Result<(), SimError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidConfig(format!(
            "{name} must not be negative, got {value}"
        )))
    }
}

impl SimConfig {
    /// Parse a configuration from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, SimError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON configuration file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, SimError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        log::info!("Loading configuration from {}", path.as_ref().display());
        Self::from_json(&json)
    }

    /// Check that the scenario can be built
    pub fn validate(&self) -> Result<(), SimError> {
        require_positive("pool.width", self.pool.width)?;
        require_positive("pool.height", self.pool.height)?;
        require_positive("pool.wall_thickness", self.pool.wall_thickness)?;

        require_positive("boat.mass", self.boat.mass)?;
        require_positive("boat.thrust_coefficient", self.boat.thrust_coefficient)?;
        require_non_negative("boat.max_rudder", self.boat.max_rudder)?;
        require_non_negative("boat.linear_damping", self.boat.linear_damping)?;
        require_non_negative("boat.angular_damping", self.boat.angular_damping)?;
        if self.boat.max_rudder >= 90.0 {
            return Err(SimError::InvalidConfig(format!(
                "boat.max_rudder must be below 90 degrees, got {}",
                self.boat.max_rudder
            )));
        }
        if !self.boat.start_heading.is_finite() {
            return Err(SimError::InvalidConfig(
                "boat.start_heading must be finite".to_string(),
            ));
        }

        // The hull may spawn at any heading, so keep its whole swept circle on the water
        let margin = super::silhouette::hull_radius();
        if self.pool.width <= 2.0 * margin || self.pool.height <= 2.0 * margin {
            return Err(SimError::InvalidConfig(format!(
                "pool {}x{} is too small for the boat",
                self.pool.width, self.pool.height
            )));
        }
        let start_inside = self.boat.start_x >= margin
            && self.boat.start_x <= self.pool.width - margin
            && self.boat.start_y >= margin
            && self.boat.start_y <= self.pool.height - margin;
        if !start_inside {
            return Err(SimError::InvalidConfig(format!(
                "boat start ({}, {}) is outside the pool",
                self.boat.start_x, self.boat.start_y
            )));
        }

        require_positive("bottles.weight", self.bottles.weight)?;
        require_non_negative("bottles.linear_damping", self.bottles.linear_damping)?;
        require_non_negative("bottles.angular_damping", self.bottles.angular_damping)?;
        require_non_negative("bottles.wall_clearance", self.bottles.wall_clearance)?;
        require_non_negative("bottles.boat_clearance", self.bottles.boat_clearance)?;
        require_non_negative("bottles.spacing", self.bottles.spacing)?;
        if self.bottles.count > 0 && self.bottles.max_attempts == 0 {
            return Err(SimError::InvalidConfig(
                "bottles.max_attempts must be at least 1".to_string(),
            ));
        }

        require_positive("detector.range", self.detector.range)?;
        if !(self.detector.angle > 0.0 && self.detector.angle <= 180.0) {
            return Err(SimError::InvalidConfig(format!(
                "detector.angle must be in (0, 180], got {}",
                self.detector.angle
            )));
        }

        if !self.geo_origin.is_valid() {
            return Err(SimError::InvalidConfig(format!(
                "geo origin {:?} is not usable",
                self.geo_origin
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_defaults_match_base_stats() {
        let config = SimConfig::default();
        assert_eq!(config.boat, BASE_BOAT);
        assert_eq!(config.bottles.count, 8);
        assert_eq!(config.detector.range, 6.0);
        assert_eq!(config.pool.width, 20.0);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = SimConfig::from_json(
            r#"{ "seed": 7, "boat": { "propulsion": "differential" }, "bottles": { "count": 3 } }"#,
        )
        .expect("valid json");

        assert_eq!(config.seed, 7);
        assert_eq!(config.boat.propulsion, PropulsionLayout::Differential);
        assert_eq!(config.boat.mass, BASE_BOAT.mass);
        assert_eq!(config.bottles.count, 3);
        assert_eq!(config.bottles.weight, BASE_BOTTLES.weight);
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimError::Config(_)));
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        let mut config = SimConfig::default();
        config.detector.angle = 0.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));

        let mut config = SimConfig::default();
        config.boat.mass = -1.0;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.pool.width = 0.5;
        assert!(config.validate().is_err());

        let mut config = SimConfig::default();
        config.boat.start_x = 50.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_must_clear_the_hull_corners() {
        // 0.5 m clears the bow and the beam but not the stern corners
        let mut config = SimConfig::default();
        config.boat.start_x = 0.5;
        config.boat.start_y = 0.5;
        config.boat.start_heading = 45.0;
        assert!(matches!(
            config.validate(),
            Err(SimError::InvalidConfig(_))
        ));

        config.boat.start_x = 0.6;
        config.boat.start_y = 0.6;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_circle_detector_is_allowed() {
        let mut config = SimConfig::default();
        config.detector.angle = 180.0;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = SimConfig::load("/nonexistent/drone-boat.json").unwrap_err();
        assert!(matches!(err, SimError::Io(_)));
    }
}
