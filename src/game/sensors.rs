// Sensor models: compass, GPS and the forward bottle detector

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::bottles::{BottleField, BottleId};
use super::config::DetectorConfig;
use crate::core::geo::{GeoOrigin, GeoPoint};
use crate::core::math::{bearing_of, compass_heading, signed_angle_diff};
use crate::engine::physics::PhysicsWorld;

/// Heading sensor
#[derive(Debug, Clone, Copy, Default)]
pub struct Compass;

impl Compass {
    /// Heading in degrees for a body rotation in radians
    pub fn read(&self, angle: f32) -> f32 {
        compass_heading(angle)
    }
}

/// Position sensor reporting geographic coordinates
#[derive(Debug, Clone, Copy)]
pub struct Gps {
    origin: GeoOrigin,
}

impl Gps {
    pub fn new(origin: GeoOrigin) -> Self {
        Self { origin }
    }

    pub fn read(&self, position: Vec2) -> GeoPoint {
        self.origin.to_geo(position)
    }
}

/// A bottle seen by the detector
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Detection {
    pub bottle: BottleId,
    /// Centre-to-centre distance (metres)
    pub distance: f32,
    /// Angle off the bow in degrees, positive to starboard
    pub bearing: f32,
    /// Bottle centre in pool coordinates
    pub position: Vec2,
}

/// Range and bearing detector looking out over the bow
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detector {
    /// Detection range (metres, exclusive)
    pub range: f32,
    /// Half-aperture either side of the bow (degrees, exclusive)
    pub angle: f32,
}

impl From<&DetectorConfig> for Detector {
    fn from(config: &DetectorConfig) -> Self {
        Self {
            range: config.range,
            angle: config.angle,
        }
    }
}

impl Detector {
    pub fn new(range: f32, angle: f32) -> Self {
        Self { range, angle }
    }

    /// Range and bearing of a target from an observer with the given heading
    pub fn measure(observer: Vec2, heading: f32, target: Vec2) -> (f32, f32) {
        let offset = target - observer;
        let distance = offset.length();
        let bearing = signed_angle_diff(heading, bearing_of(offset.x, offset.y));
        (distance, bearing)
    }

    /// Whether a measurement falls inside the detection cone
    pub fn accepts(&self, distance: f32, bearing: f32) -> bool {
        distance < self.range && bearing.abs() < self.angle
    }

    /// Scan a set of targets, nearest first
    pub fn scan<I>(&self, observer: Vec2, heading: f32, targets: I) -> Vec<Detection>
    where
        I: IntoIterator<Item = (BottleId, Vec2)>,
    {
        let mut detections: Vec<Detection> = targets
            .into_iter()
            .filter_map(|(bottle, position)| {
                let (distance, bearing) = Self::measure(observer, heading, position);
                self.accepts(distance, bearing).then_some(Detection {
                    bottle,
                    distance,
                    bearing,
                    position,
                })
            })
            .collect();

        detections.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        detections
    }

    /// Scan every bottle still floating in the pool
    pub fn detect(
        &self,
        observer: Vec2,
        heading: f32,
        bottles: &BottleField,
        physics: &PhysicsWorld,
    ) -> Vec<Detection> {
        self.scan(
            observer,
            heading,
            bottles
                .all()
                .iter()
                .filter_map(|b| b.position(physics).map(|p| (b.id, p))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_measure_dead_ahead() {
        // Heading east, target 3m east
        let (distance, bearing) = Detector::measure(Vec2::ZERO, 90.0, Vec2::new(3.0, 0.0));
        assert_relative_eq!(distance, 3.0, epsilon = 1e-5);
        assert!(bearing.abs() < 1e-3);
    }

    #[test]
    fn test_bearing_sign_is_positive_to_starboard() {
        // Heading north, target to the east is on the starboard side
        let (_, bearing) = Detector::measure(Vec2::ZERO, 0.0, Vec2::new(1.0, 1.0));
        assert_relative_eq!(bearing, 45.0, epsilon = 1e-3);

        let (_, bearing) = Detector::measure(Vec2::ZERO, 0.0, Vec2::new(-1.0, 1.0));
        assert_relative_eq!(bearing, -45.0, epsilon = 1e-3);
    }

    #[test]
    fn test_range_and_angle_are_exclusive() {
        let detector = Detector::new(5.0, 30.0);
        assert!(detector.accepts(4.99, 29.9));
        assert!(!detector.accepts(5.0, 0.0));
        assert!(!detector.accepts(1.0, 30.0));
        assert!(!detector.accepts(1.0, -30.0));
        assert!(detector.accepts(1.0, -29.9));
    }

    #[test]
    fn test_scan_filters_and_sorts() {
        let detector = Detector::new(6.0, 45.0);
        let observer = Vec2::new(5.0, 5.0);
        let targets = vec![
            (0, Vec2::new(9.0, 5.0)),  // 4m ahead
            (1, Vec2::new(7.0, 5.5)),  // ~2m ahead, slightly north
            (2, Vec2::new(2.0, 5.0)),  // behind
            (3, Vec2::new(5.0, 8.0)),  // abeam to port
            (4, Vec2::new(12.0, 5.0)), // out of range
        ];

        let detections = detector.scan(observer, 90.0, targets);
        let ids: Vec<BottleId> = detections.iter().map(|d| d.bottle).collect();
        assert_eq!(ids, vec![1, 0]);
        assert!(detections[0].bearing < 0.0);
        assert_eq!(detections[1].position, Vec2::new(9.0, 5.0));
    }

    #[test]
    fn test_full_aperture_sees_behind() {
        let detector = Detector::new(10.0, 180.0);
        let detections = detector.scan(
            Vec2::ZERO,
            0.0,
            vec![(0, Vec2::new(0.5, -3.0)), (1, Vec2::new(-0.5, -3.0))],
        );
        assert_eq!(detections.len(), 2);
        assert!(detections[0].bearing.abs() > 170.0);
    }

    #[test]
    fn test_compass_and_gps() {
        assert_relative_eq!(Compass.read(0.0), 90.0, epsilon = 1e-3);

        let gps = Gps::new(GeoOrigin::new(0.0, 0.0));
        let fix = gps.read(Vec2::new(0.0, 111_320.0));
        assert_relative_eq!(fix.latitude, 1.0, epsilon = 1e-9);
    }
}
