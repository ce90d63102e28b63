// Reference control loop: chase the nearest bottle in view, sweep the pool otherwise

use glam::Vec2;

use super::config::{PropulsionLayout, SimConfig};
use super::controls::Controls;
use super::simulation::ControlLoop;
use crate::core::math::{bearing_of, clamp, signed_angle_diff};

/// Proportional gain from bearing error (degrees) to rudder (degrees)
const RUDDER_GAIN: f32 = 1.5;

/// Proportional gain from bearing error (degrees) to thrust difference
const DIFFERENTIAL_GAIN: f32 = 0.02;

/// Distance kept between the search lanes and the walls
const SEARCH_MARGIN: f32 = 1.5;

/// Widest gap between neighbouring search lanes
const LANE_SPACING: f32 = 3.0;

/// A waypoint counts as reached inside this radius
const WAYPOINT_RADIUS: f32 = 1.5;

/// What the autopilot is doing this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Mode {
    /// Steering toward a detected bottle
    Chasing { bearing: f32 },
    /// Following the search lanes toward a waypoint
    Searching { waypoint: Vec2 },
}

/// Seek-and-collect autopilot
///
/// With nothing in view the boat runs back and forth along lanes parallel
/// to the long side of the pool, so the detector cone passes over all of
/// the water once per lap.
#[derive(Debug, Clone)]
pub struct Autopilot {
    waypoints: Vec<Vec2>,
    next: usize,
    max_rudder: f32,
    mode: Mode,
}

/// Serpentine lanes covering `[0, width] x [0, height]`
fn search_lanes(width: f32, height: f32) -> Vec<Vec2> {
    let margin_x = SEARCH_MARGIN.min(width / 2.0);
    let margin_y = SEARCH_MARGIN.min(height / 2.0);
    let span = height - 2.0 * margin_y;
    let lanes = ((span / LANE_SPACING).ceil() as usize + 1).max(2);
    let gap = span / (lanes - 1) as f32;

    let mut waypoints = Vec::with_capacity(lanes * 2);
    for lane in 0..lanes {
        let y = margin_y + lane as f32 * gap;
        let (west, east) = (Vec2::new(margin_x, y), Vec2::new(width - margin_x, y));
        if lane % 2 == 0 {
            waypoints.extend([west, east]);
        } else {
            waypoints.extend([east, west]);
        }
    }
    waypoints
}

impl Autopilot {
    pub fn new(config: &SimConfig) -> Self {
        let waypoints = search_lanes(config.pool.width, config.pool.height);
        let start = Vec2::new(config.boat.start_x, config.boat.start_y);

        // Join the lap at the waypoint closest to the start
        let next = waypoints
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.distance(start).total_cmp(&b.distance(start)))
            .map_or(0, |(index, _)| index);

        Self {
            mode: Mode::Searching {
                waypoint: waypoints[next],
            },
            waypoints,
            next,
            max_rudder: config.boat.max_rudder,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Skip past every waypoint already within reach
    fn advance(&mut self, position: Vec2) -> Vec2 {
        for _ in 0..self.waypoints.len() {
            if self.waypoints[self.next].distance(position) > WAYPOINT_RADIUS {
                break;
            }
            self.next = (self.next + 1) % self.waypoints.len();
        }
        self.waypoints[self.next]
    }

    /// Steer toward a heading error (degrees, positive = target to starboard)
    fn steer(&self, controls: &mut Controls<'_>, error: f32) {
        // Ease off when the target is far off the bow so the turn stays tight
        let power = if error.abs() > 60.0 { 0.4 } else { 1.0 };

        match controls.layout() {
            PropulsionLayout::Rudder => {
                controls.set_power(power);
                controls.set_rudder(clamp(
                    RUDDER_GAIN * error,
                    -self.max_rudder,
                    self.max_rudder,
                ));
            }
            PropulsionLayout::Differential => {
                let turn = clamp(DIFFERENTIAL_GAIN * error, -1.0, 1.0);
                let base = power * (1.0 - turn.abs()).max(0.3);
                controls.set_thrusters(base + turn, base - turn);
            }
        }
    }
}

impl ControlLoop for Autopilot {
    fn tick(&mut self, controls: &mut Controls<'_>) {
        if let Some(nearest) = controls.detect().first().copied() {
            self.mode = Mode::Chasing {
                bearing: nearest.bearing,
            };
            self.steer(controls, nearest.bearing);
            return;
        }

        let position = controls.position();
        let waypoint = self.advance(position);
        if self.mode != (Mode::Searching { waypoint }) {
            log::debug!(
                "Autopilot searching toward ({:.1}, {:.1})",
                waypoint.x,
                waypoint.y
            );
        }
        self.mode = Mode::Searching { waypoint };

        let to_waypoint = waypoint - position;
        let error = signed_angle_diff(
            controls.heading(),
            bearing_of(to_waypoint.x, to_waypoint.y),
        );
        self.steer(controls, error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::boat::Actuation;
    use crate::game::simulation::{Outcome, Simulation};

    #[test]
    fn test_chases_bottle_ahead() {
        let mut config = SimConfig::default();
        config.bottles.count = 0;
        let mut sim = Simulation::new(config.clone()).expect("sim");
        {
            let (bottles, physics) = sim.bottles_mut();
            // Ahead and a little to port (north of an east-bound boat)
            bottles
                .add(Vec2::new(6.0, 6.0), 0.0, 0.5, physics)
                .expect("bottle");
        }

        let mut autopilot = Autopilot::new(&config);
        sim.step(&mut autopilot).expect("step");

        match autopilot.mode() {
            Mode::Chasing { bearing } => assert!(bearing < 0.0),
            other => panic!("expected to chase, got {:?}", other),
        }
        match sim.boat().actuation() {
            Actuation::Rudder { power, rudder } => {
                assert_eq!(power, 1.0);
                assert!(rudder < 0.0);
            }
            other => panic!("unexpected actuation {:?}", other),
        }
    }

    #[test]
    fn test_search_lanes_cover_the_pool() {
        let waypoints = search_lanes(20.0, 10.0);

        assert_eq!(waypoints.len(), 8);
        for pair in waypoints.chunks(2) {
            // Each lane runs the full length at a constant y
            assert_eq!(pair[0].y, pair[1].y);
            assert_eq!((pair[0].x - pair[1].x).abs(), 20.0 - 2.0 * SEARCH_MARGIN);
        }
        for lanes in waypoints.windows(3).step_by(2) {
            assert!(lanes[2].y - lanes[0].y <= LANE_SPACING);
        }
        assert_eq!(waypoints[0], Vec2::new(SEARCH_MARGIN, SEARCH_MARGIN));
        assert!((waypoints[7].y - (10.0 - SEARCH_MARGIN)).abs() < 1e-5);
    }

    #[test]
    fn test_search_lanes_fit_a_tiny_pool() {
        let waypoints = search_lanes(2.0, 1.0);
        assert!(waypoints.len() >= 4);
        for w in &waypoints {
            assert!(w.x >= 0.0 && w.x <= 2.0);
            assert!(w.y >= 0.0 && w.y <= 1.0);
        }
    }

    #[test]
    fn test_searches_when_nothing_in_view() {
        let mut config = SimConfig::default();
        config.bottles.count = 0;
        let mut sim = Simulation::new(config.clone()).expect("sim");
        {
            let (bottles, physics) = sim.bottles_mut();
            // Far beyond the detector range
            bottles
                .add(Vec2::new(18.0, 9.0), 0.0, 0.5, physics)
                .expect("bottle");
        }

        let mut autopilot = Autopilot::new(&config);
        sim.step(&mut autopilot).expect("step");

        // The two lane ends next to the start are already within reach
        match autopilot.mode() {
            Mode::Searching { waypoint } => {
                assert_eq!(waypoint.x, 20.0 - SEARCH_MARGIN);
                assert!((waypoint.y - (SEARCH_MARGIN + 7.0 * 2.0 / 3.0)).abs() < 1e-4);
            }
            other => panic!("expected to search, got {:?}", other),
        }
    }

    #[test]
    fn test_differential_boat_steers_with_thrust_split() {
        let mut config = SimConfig::default();
        config.bottles.count = 0;
        config.boat.propulsion = PropulsionLayout::Differential;
        let mut sim = Simulation::new(config.clone()).expect("sim");
        {
            let (bottles, physics) = sim.bottles_mut();
            bottles
                .add(Vec2::new(18.0, 9.0), 0.0, 0.5, physics)
                .expect("bottle");
        }

        let mut autopilot = Autopilot::new(&config);
        sim.step(&mut autopilot).expect("step");

        // The next waypoint lies slightly to port of an east-bound boat
        match sim.boat().actuation() {
            Actuation::Differential { left, right } => {
                assert!(left > 0.0);
                assert!(left < right);
            }
            other => panic!("unexpected actuation {:?}", other),
        }
    }

    #[test]
    fn test_clears_default_scenario() {
        let config = SimConfig::default();
        let mut sim = Simulation::new(config.clone()).expect("sim");

        let outcome = sim.run(&mut Autopilot::new(&config)).expect("run");

        assert!(
            matches!(outcome, Outcome::Cleared { .. }),
            "{:?} with {} bottles left",
            outcome,
            sim.bottles().remaining()
        );
        assert_eq!(sim.boat().collected_count(), config.bottles.count);
    }

    #[test]
    fn test_collects_bottle_in_front() {
        let mut config = SimConfig::default();
        config.bottles.count = 0;
        config.max_ticks = 600;
        let mut sim = Simulation::new(config.clone()).expect("sim");
        {
            let (bottles, physics) = sim.bottles_mut();
            bottles
                .add(Vec2::new(6.0, 5.5), 0.0, 0.5, physics)
                .expect("bottle");
        }

        let outcome = sim.run(&mut Autopilot::new(&config)).expect("run");
        assert!(matches!(outcome, Outcome::Cleared { .. }));
        assert!((sim.boat().collected_weight() - 0.5).abs() < 1e-6);
    }
}
