// Drone boat entity: hull body, propellers and collected cargo

use glam::Vec2;

use super::config::{BoatStats, PropulsionLayout};
use super::silhouette;
use super::SimError;
use crate::core::math::{clamp, compass_heading, heading_to_angle};
use crate::engine::physics::{
    nalgebra, point, presets, vector, ColliderHandle, PhysicsWorld, RigidBody, RigidBodyHandle,
};

/// Control inputs for the propellers
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Actuation {
    /// Single stern propeller: power in [-1, 1], rudder in degrees
    /// (positive = starboard)
    Rudder { power: f32, rudder: f32 },
    /// Twin propellers: each power in [-1, 1]
    Differential { left: f32, right: f32 },
}

impl Actuation {
    /// All propellers stopped for the given layout
    pub fn idle(layout: PropulsionLayout) -> Self {
        match layout {
            PropulsionLayout::Rudder => Actuation::Rudder {
                power: 0.0,
                rudder: 0.0,
            },
            PropulsionLayout::Differential => Actuation::Differential {
                left: 0.0,
                right: 0.0,
            },
        }
    }

    pub fn layout(&self) -> PropulsionLayout {
        match self {
            Actuation::Rudder { .. } => PropulsionLayout::Rudder,
            Actuation::Differential { .. } => PropulsionLayout::Differential,
        }
    }

    /// Clamp every input into its allowed range; NaN reads as zero
    pub fn clamped(self, max_rudder: f32) -> Self {
        let unit = |v: f32| if v.is_nan() { 0.0 } else { clamp(v, -1.0, 1.0) };
        match self {
            Actuation::Rudder { power, rudder } => Actuation::Rudder {
                power: unit(power),
                rudder: if rudder.is_nan() {
                    0.0
                } else {
                    clamp(rudder, -max_rudder, max_rudder)
                },
            },
            Actuation::Differential { left, right } => Actuation::Differential {
                left: unit(left),
                right: unit(right),
            },
        }
    }
}

/// One propeller's thrust for the current tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PropellerForce {
    /// Force in world coordinates (N)
    pub force: Vec2,
    /// Application point in body-local coordinates
    pub mount: Vec2,
}

/// Translate an actuation into propeller forces for a hull at `angle`
///
/// Every propeller pushes with `k * control`. The rudder swings the stern
/// propeller's thrust by `rudder` degrees off the keel line.
pub fn propeller_forces(
    actuation: Actuation,
    thrust_coefficient: f32,
    angle: f32,
) -> Vec<PropellerForce> {
    let mount = |m: [f32; 2]| Vec2::new(m[0], m[1]);

    match actuation {
        Actuation::Rudder { power, rudder } => {
            let magnitude = thrust_coefficient * power;
            let direction = angle + rudder.to_radians();
            vec![PropellerForce {
                force: Vec2::new(magnitude * direction.cos(), magnitude * direction.sin()),
                mount: mount(silhouette::STERN),
            }]
        }
        Actuation::Differential { left, right } => {
            let forward = Vec2::new(angle.cos(), angle.sin());
            vec![
                PropellerForce {
                    force: forward * (thrust_coefficient * left),
                    mount: mount(silhouette::PORT_MOUNT),
                },
                PropellerForce {
                    force: forward * (thrust_coefficient * right),
                    mount: mount(silhouette::STARBOARD_MOUNT),
                },
            ]
        }
    }
}

/// The drone boat
#[derive(Debug)]
pub struct Boat {
    /// Handle to the hull's rigid body in the physics world
    pub body_handle: RigidBodyHandle,
    /// Handle to the hull collider
    pub collider_handle: ColliderHandle,

    /// Boat properties
    pub stats: BoatStats,

    /// Current propeller command (persists across ticks)
    actuation: Actuation,

    /// Total weight of bottles picked up (kg)
    collected_weight: f32,
    /// Number of bottles picked up
    collected_count: usize,
}

impl Boat {
    /// Create the boat and add it to the physics world
    pub fn new(stats: BoatStats, physics: &mut PhysicsWorld) -> Result<Self, SimError> {
        let angle = heading_to_angle(stats.start_heading);
        let body = presets::boat_body(
            stats.start_x,
            stats.start_y,
            angle,
            stats.linear_damping,
            stats.angular_damping,
        );
        let body_handle = physics.add_rigid_body(body);

        let collider = presets::boat_collider(&silhouette::HULL, stats.mass)
            .ok_or(SimError::Silhouette("hull outline is degenerate"))?;
        let collider_handle = physics.add_collider(collider, body_handle);

        log::debug!(
            "Boat launched at ({}, {}) heading {} with {:?} propulsion",
            stats.start_x,
            stats.start_y,
            stats.start_heading,
            stats.propulsion
        );

        Ok(Self {
            body_handle,
            collider_handle,
            actuation: Actuation::idle(stats.propulsion),
            collected_weight: 0.0,
            collected_count: 0,
            stats,
        })
    }

    /// Current (clamped) propeller command
    pub fn actuation(&self) -> Actuation {
        self.actuation
    }

    /// Replace the propeller command
    ///
    /// A command for the other propulsion layout is ignored.
    pub fn set_actuation(&mut self, actuation: Actuation) {
        if actuation.layout() != self.stats.propulsion {
            log::warn!(
                "Ignoring {:?} command on a boat with {:?} propulsion",
                actuation.layout(),
                self.stats.propulsion
            );
            return;
        }
        self.actuation = actuation.clamped(self.stats.max_rudder);
    }

    /// Stop all propellers
    pub fn stop(&mut self) {
        self.actuation = Actuation::idle(self.stats.propulsion);
    }

    fn body<'a>(&self, physics: &'a PhysicsWorld) -> Result<&'a RigidBody, SimError> {
        physics
            .get_rigid_body(self.body_handle)
            .ok_or(SimError::MissingBody("boat"))
    }

    /// Push the current command into the physics world for the next step
    ///
    /// Forces in rapier persist until reset, so last tick's thrust is cleared first.
    pub fn apply_forces(&self, physics: &mut PhysicsWorld) -> Result<(), SimError> {
        let body = physics
            .get_rigid_body_mut(self.body_handle)
            .ok_or(SimError::MissingBody("boat"))?;

        let angle = body.rotation().angle();
        body.reset_forces(true);
        body.reset_torques(true);

        for propeller in propeller_forces(self.actuation, self.stats.thrust_coefficient, angle) {
            let world_point = body.position() * point![propeller.mount.x, propeller.mount.y];
            body.add_force_at_point(
                vector![propeller.force.x, propeller.force.y],
                world_point,
                true,
            );
        }

        Ok(())
    }

    /// Hull centre in pool coordinates
    pub fn position(&self, physics: &PhysicsWorld) -> Result<Vec2, SimError> {
        let t = self.body(physics)?.translation();
        Ok(Vec2::new(t.x, t.y))
    }

    /// Body rotation (radians, counter-clockwise from +x)
    pub fn angle(&self, physics: &PhysicsWorld) -> Result<f32, SimError> {
        Ok(self.body(physics)?.rotation().angle())
    }

    /// Compass heading (degrees, clockwise from north)
    pub fn heading(&self, physics: &PhysicsWorld) -> Result<f32, SimError> {
        Ok(compass_heading(self.angle(physics)?))
    }

    /// Velocity over ground (m/s)
    pub fn velocity(&self, physics: &PhysicsWorld) -> Result<Vec2, SimError> {
        let v = self.body(physics)?.linvel();
        Ok(Vec2::new(v.x, v.y))
    }

    /// Speed over ground (m/s)
    pub fn speed(&self, physics: &PhysicsWorld) -> Result<f32, SimError> {
        Ok(self.velocity(physics)?.length())
    }

    /// Rate of turn (degrees per second, positive = clockwise)
    pub fn turn_rate(&self, physics: &PhysicsWorld) -> Result<f32, SimError> {
        Ok(-self.body(physics)?.angvel().to_degrees())
    }

    /// Add a picked-up bottle's weight to the cargo
    pub fn collect(&mut self, weight: f32) {
        self.collected_weight += weight;
        self.collected_count += 1;
    }

    pub fn collected_weight(&self) -> f32 {
        self.collected_weight
    }

    pub fn collected_count(&self) -> usize {
        self.collected_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::signed_angle_diff;
    use crate::game::config::BASE_BOAT;
    use approx::assert_relative_eq;

    fn torque(forces: &[PropellerForce], angle: f32) -> f32 {
        // z component of r x F with r rotated into world frame
        forces
            .iter()
            .map(|p| {
                let r = Vec2::from_angle(angle).rotate(p.mount);
                r.perp_dot(p.force)
            })
            .sum()
    }

    #[test]
    fn test_force_is_thrust_coefficient_times_control() {
        let forces = propeller_forces(
            Actuation::Rudder {
                power: 0.5,
                rudder: 0.0,
            },
            20.0,
            0.0,
        );
        assert_eq!(forces.len(), 1);
        assert_relative_eq!(forces[0].force.x, 10.0, epsilon = 1e-5);
        assert_relative_eq!(forces[0].force.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_force_follows_hull_angle() {
        let forces = propeller_forces(
            Actuation::Rudder {
                power: 1.0,
                rudder: 0.0,
            },
            10.0,
            std::f32::consts::FRAC_PI_2,
        );
        assert_relative_eq!(forces[0].force.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(forces[0].force.y, 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_starboard_rudder_turns_clockwise() {
        let forces = propeller_forces(
            Actuation::Rudder {
                power: 1.0,
                rudder: 20.0,
            },
            10.0,
            0.3,
        );
        assert!(torque(&forces, 0.3) < 0.0);
    }

    #[test]
    fn test_differential_thrust_turns_away_from_stronger_side() {
        let forces = propeller_forces(
            Actuation::Differential {
                left: 1.0,
                right: 0.2,
            },
            10.0,
            0.0,
        );
        assert_eq!(forces.len(), 2);
        assert!(torque(&forces, 0.0) < 0.0);

        let balanced = propeller_forces(
            Actuation::Differential {
                left: 0.7,
                right: 0.7,
            },
            10.0,
            1.0,
        );
        assert_relative_eq!(torque(&balanced, 1.0), 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_actuation_is_clamped() {
        let clamped = Actuation::Rudder {
            power: 3.0,
            rudder: -80.0,
        }
        .clamped(35.0);
        assert_eq!(
            clamped,
            Actuation::Rudder {
                power: 1.0,
                rudder: -35.0
            }
        );

        let clamped = Actuation::Differential {
            left: f32::NAN,
            right: -2.0,
        }
        .clamped(35.0);
        assert_eq!(
            clamped,
            Actuation::Differential {
                left: 0.0,
                right: -1.0
            }
        );
    }

    #[test]
    fn test_boat_spawns_at_start_pose() {
        let mut physics = PhysicsWorld::new();
        let boat = Boat::new(BASE_BOAT, &mut physics).expect("boat");

        let position = boat.position(&physics).expect("position");
        assert_relative_eq!(position.x, BASE_BOAT.start_x, epsilon = 1e-5);
        assert_relative_eq!(position.y, BASE_BOAT.start_y, epsilon = 1e-5);
        let heading = boat.heading(&physics).expect("heading");
        assert!(signed_angle_diff(heading, BASE_BOAT.start_heading).abs() < 1e-3);
        assert_eq!(boat.collected_weight(), 0.0);
    }

    #[test]
    fn test_wrong_layout_command_is_ignored() {
        let mut physics = PhysicsWorld::new();
        let mut boat = Boat::new(BASE_BOAT, &mut physics).expect("boat");

        boat.set_actuation(Actuation::Differential {
            left: 1.0,
            right: 1.0,
        });
        assert_eq!(boat.actuation(), Actuation::idle(PropulsionLayout::Rudder));
    }

    #[test]
    fn test_full_power_drives_boat_forward() {
        let mut physics = PhysicsWorld::new();
        let mut boat = Boat::new(BASE_BOAT, &mut physics).expect("boat");
        boat.set_actuation(Actuation::Rudder {
            power: 1.0,
            rudder: 0.0,
        });

        for _ in 0..60 {
            boat.apply_forces(&mut physics).expect("forces");
            physics.step();
        }

        // Start heading is east (+x)
        let position = boat.position(&physics).expect("position");
        assert!(position.x > BASE_BOAT.start_x + 0.5);
        assert!((position.y - BASE_BOAT.start_y).abs() < 0.05);
        assert!(boat.speed(&physics).expect("speed") > 0.5);
    }

    #[test]
    fn test_starboard_rudder_increases_heading() {
        let mut physics = PhysicsWorld::new();
        let mut boat = Boat::new(BASE_BOAT, &mut physics).expect("boat");
        boat.set_actuation(Actuation::Rudder {
            power: 1.0,
            rudder: 30.0,
        });

        for _ in 0..30 {
            boat.apply_forces(&mut physics).expect("forces");
            physics.step();
        }

        let heading = boat.heading(&physics).expect("heading");
        assert!(signed_angle_diff(BASE_BOAT.start_heading, heading) > 1.0);
        assert!(boat.turn_rate(&physics).expect("turn rate") > 0.0);
    }

    #[test]
    fn test_stronger_port_thruster_increases_heading() {
        let mut physics = PhysicsWorld::new();
        let mut stats = BASE_BOAT;
        stats.propulsion = PropulsionLayout::Differential;
        let mut boat = Boat::new(stats, &mut physics).expect("boat");
        boat.set_actuation(Actuation::Differential {
            left: 1.0,
            right: 0.2,
        });

        for _ in 0..30 {
            boat.apply_forces(&mut physics).expect("forces");
            physics.step();
        }

        let heading = boat.heading(&physics).expect("heading");
        assert!(signed_angle_diff(BASE_BOAT.start_heading, heading) > 1.0);
        assert!(boat.turn_rate(&physics).expect("turn rate") > 0.0);
        assert!(boat.position(&physics).expect("position").x > BASE_BOAT.start_x);
    }

    #[test]
    fn test_collect_accumulates_weight() {
        let mut physics = PhysicsWorld::new();
        let mut boat = Boat::new(BASE_BOAT, &mut physics).expect("boat");
        boat.collect(0.5);
        boat.collect(0.25);
        assert_relative_eq!(boat.collected_weight(), 0.75);
        assert_eq!(boat.collected_count(), 2);
    }
}
