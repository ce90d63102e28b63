// Drone boat pool simulation
//
// A small surface drone collects floating bottles in a rectangular pool.
// Physics is delegated to rapier2d; this crate builds the bodies, turns
// control inputs into propeller forces, models the sensors and hands a
// control/telemetry API to a user-supplied loop once per tick.

pub mod core;
pub mod engine;
pub mod game;

pub use crate::game::{
    Autopilot, ControlLoop, Controls, Detection, Outcome, SimConfig, SimError, Simulation,
    Telemetry,
};
