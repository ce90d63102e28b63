// Pool scenario
//
// This module contains everything built on top of the physics engine:
// - Configuration and hard-coded silhouettes
// - Pool walls, the boat and the bottle field
// - Sensors and the control API handed to the control loop
// - The simulation harness and a reference autopilot

pub mod autopilot;
pub mod boat;
pub mod bottles;
pub mod config;
pub mod controls;
pub mod pool;
pub mod sensors;
pub mod silhouette;
pub mod simulation;

// Re-export commonly used types
pub use autopilot::Autopilot;
pub use boat::{Actuation, Boat};
pub use bottles::{Bottle, BottleField, BottleId};
pub use config::{BoatStats, BottleStats, DetectorConfig, PoolConfig, PropulsionLayout, SimConfig};
pub use controls::{Controls, Telemetry};
pub use pool::Pool;
pub use sensors::{Compass, Detection, Detector, Gps};
pub use simulation::{ControlLoop, Outcome, Simulation};

/// Simulation errors
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Could not place bottle {index} after {attempts} attempts")]
    Placement { index: usize, attempts: u32 },

    #[error("Invalid silhouette: {0}")]
    Silhouette(&'static str),

    #[error("Rigid body missing from physics world: {0}")]
    MissingBody(&'static str),

    #[error("Failed to parse configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
