// Rectangular pool bounded by four fixed walls

use glam::Vec2;

use super::config::PoolConfig;
use crate::engine::physics::{presets, PhysicsWorld};

/// The water area `[0, width] x [0, height]` and the walls around it
#[derive(Debug)]
pub struct Pool {
    width: f32,
    height: f32,
}

impl Pool {
    /// Build the walls just outside the water area
    pub fn new(config: &PoolConfig, physics: &mut PhysicsWorld) -> Self {
        let (w, h, t) = (config.width, config.height, config.wall_thickness);

        // (centre x, centre y, width, height); the long walls cover the corners
        let specs = [
            (w / 2.0, -t / 2.0, w + 2.0 * t, t),
            (w / 2.0, h + t / 2.0, w + 2.0 * t, t),
            (-t / 2.0, h / 2.0, t, h),
            (w + t / 2.0, h / 2.0, t, h),
        ];

        for &(x, y, width, height) in &specs {
            let handle = physics.add_rigid_body(presets::wall_body(x, y));
            physics.add_collider(presets::wall_collider(width, height), handle);
        }

        log::debug!("Pool built: {}m x {}m", w, h);

        Self {
            width: w,
            height: h,
        }
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    /// Whether a point lies on the water
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= 0.0 && point.x <= self.width && point.y >= 0.0 && point.y <= self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::config::BASE_POOL;

    #[test]
    fn test_pool_builds_four_walls() {
        let mut physics = PhysicsWorld::new();
        let pool = Pool::new(&BASE_POOL, &mut physics);

        assert_eq!(physics.body_count(), 4);
        assert_eq!(physics.collider_count(), 4);
        assert_eq!((pool.width(), pool.height()), (20.0, 10.0));
    }

    #[test]
    fn test_contains() {
        let mut physics = PhysicsWorld::new();
        let pool = Pool::new(&BASE_POOL, &mut physics);

        assert!(pool.contains(Vec2::new(10.0, 5.0)));
        assert!(!pool.contains(Vec2::new(-0.1, 5.0)));
        assert!(!pool.contains(Vec2::new(10.0, 10.5)));
        assert!(pool.contains(Vec2::new(0.0, 0.0)));
        assert!(pool.contains(Vec2::new(20.0, 10.0)));
    }
}
