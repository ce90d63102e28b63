// Control/telemetry API handed to the control loop once per tick

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::boat::{Actuation, Boat};
use super::bottles::BottleField;
use super::config::PropulsionLayout;
use super::sensors::{Detection, Detector, Gps};
use super::SimError;
use crate::core::geo::GeoPoint;
use crate::engine::physics::PhysicsWorld;

/// Snapshot of everything the boat can sense at one tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Telemetry {
    /// Ticks completed so far
    pub tick: u64,
    /// Simulated seconds elapsed
    pub time: f32,
    /// Hull centre in pool metres
    pub position: Vec2,
    /// GPS fix
    pub geo: GeoPoint,
    /// Compass heading (degrees, clockwise from north)
    pub heading: f32,
    /// Speed over ground (m/s)
    pub speed: f32,
    /// Rate of turn (degrees per second, positive = clockwise)
    pub turn_rate: f32,
    /// Bottles currently inside the detector cone, nearest first
    pub detections: Vec<Detection>,
    /// Weight of bottles picked up so far (kg)
    pub collected_weight: f32,
    pub collected_count: usize,
    pub bottles_remaining: usize,
}

/// Sensor suite and bookkeeping shared by `Telemetry::capture`
pub(crate) struct SensorContext<'a> {
    pub physics: &'a PhysicsWorld,
    pub bottles: &'a BottleField,
    pub detector: &'a Detector,
    pub gps: &'a Gps,
    pub tick: u64,
    pub time: f32,
}

impl Telemetry {
    pub(crate) fn capture(boat: &Boat, sensors: &SensorContext<'_>) -> Result<Self, SimError> {
        let physics = sensors.physics;
        let position = boat.position(physics)?;
        let heading = boat.heading(physics)?;

        Ok(Self {
            tick: sensors.tick,
            time: sensors.time,
            position,
            geo: sensors.gps.read(position),
            heading,
            speed: boat.speed(physics)?,
            turn_rate: boat.turn_rate(physics)?,
            detections: sensors
                .detector
                .detect(position, heading, sensors.bottles, physics),
            collected_weight: boat.collected_weight(),
            collected_count: boat.collected_count(),
            bottles_remaining: sensors.bottles.remaining(),
        })
    }
}

/// What the control loop sees and steers through
///
/// Readings are taken once when the tick starts. Commands persist until
/// changed, so a loop that only sets the power once keeps the boat moving.
pub struct Controls<'a> {
    boat: &'a mut Boat,
    telemetry: Telemetry,
}

impl<'a> Controls<'a> {
    pub(crate) fn new(boat: &'a mut Boat, telemetry: Telemetry) -> Self {
        Self { boat, telemetry }
    }

    /// Hull centre in pool metres
    pub fn position(&self) -> Vec2 {
        self.telemetry.position
    }

    /// GPS fix
    pub fn geo(&self) -> GeoPoint {
        self.telemetry.geo
    }

    /// Compass heading in degrees
    pub fn heading(&self) -> f32 {
        self.telemetry.heading
    }

    pub fn speed(&self) -> f32 {
        self.telemetry.speed
    }

    pub fn turn_rate(&self) -> f32 {
        self.telemetry.turn_rate
    }

    /// Bottles in the detector cone, nearest first
    pub fn detect(&self) -> &[Detection] {
        &self.telemetry.detections
    }

    pub fn collected_weight(&self) -> f32 {
        self.telemetry.collected_weight
    }

    pub fn bottles_remaining(&self) -> usize {
        self.telemetry.bottles_remaining
    }

    pub fn tick(&self) -> u64 {
        self.telemetry.tick
    }

    /// Simulated seconds elapsed
    pub fn time(&self) -> f32 {
        self.telemetry.time
    }

    pub fn telemetry(&self) -> &Telemetry {
        &self.telemetry
    }

    pub fn layout(&self) -> PropulsionLayout {
        self.boat.stats.propulsion
    }

    /// Current propeller command
    pub fn actuation(&self) -> Actuation {
        self.boat.actuation()
    }

    /// Stern propeller power in [-1, 1] (rudder layout)
    pub fn set_power(&mut self, power: f32) {
        let rudder = match self.boat.actuation() {
            Actuation::Rudder { rudder, .. } => rudder,
            Actuation::Differential { .. } => 0.0,
        };
        self.boat.set_actuation(Actuation::Rudder { power, rudder });
    }

    /// Rudder angle in degrees, positive to starboard (rudder layout)
    pub fn set_rudder(&mut self, rudder: f32) {
        let power = match self.boat.actuation() {
            Actuation::Rudder { power, .. } => power,
            Actuation::Differential { .. } => 0.0,
        };
        self.boat.set_actuation(Actuation::Rudder { power, rudder });
    }

    /// Port and starboard propeller power in [-1, 1] (differential layout)
    pub fn set_thrusters(&mut self, left: f32, right: f32) {
        self.boat
            .set_actuation(Actuation::Differential { left, right });
    }

    /// Stop all propellers
    pub fn stop(&mut self) {
        self.boat.stop();
    }
}
