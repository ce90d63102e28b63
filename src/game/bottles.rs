// Floating bottles: placement, lookup and consumption

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::config::SimConfig;
use super::silhouette;
use super::SimError;
use crate::engine::physics::{
    presets, ColliderHandle, CollisionEvent, PhysicsWorld, RigidBodyHandle,
};

/// Unique identifier for a bottle
pub type BottleId = u32;

/// A bottle still floating in the pool
#[derive(Debug, Clone)]
pub struct Bottle {
    pub id: BottleId,
    /// Weight added to the boat's cargo when picked up (kg)
    pub weight: f32,
    pub body_handle: RigidBodyHandle,
    pub collider_handle: ColliderHandle,
}

impl Bottle {
    /// Current centre of the bottle, if it is still in the world
    pub fn position(&self, physics: &PhysicsWorld) -> Option<Vec2> {
        physics.get_rigid_body(self.body_handle).map(|body| {
            let t = body.translation();
            Vec2::new(t.x, t.y)
        })
    }
}

/// All bottles still floating in the pool
#[derive(Debug, Default)]
pub struct BottleField {
    bottles: Vec<Bottle>,
    next_id: BottleId,
    damping: (f32, f32),
}

impl BottleField {
    pub fn new(linear_damping: f32, angular_damping: f32) -> Self {
        Self {
            bottles: Vec::new(),
            next_id: 0,
            damping: (linear_damping, angular_damping),
        }
    }

    /// Scatter the configured number of bottles over the pool
    ///
    /// Placement is reproducible for a given seed. Each candidate keeps its
    /// distance from the walls, the boat's start and the bottles placed so far.
    pub fn scatter(config: &SimConfig, physics: &mut PhysicsWorld) -> Result<Self, SimError> {
        let stats = &config.bottles;
        let mut field = Self::new(stats.linear_damping, stats.angular_damping);
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);

        let margin = stats.wall_clearance + silhouette::bottle_radius();
        let (min_x, max_x) = (margin, config.pool.width - margin);
        let (min_y, max_y) = (margin, config.pool.height - margin);
        if stats.count > 0 && (min_x > max_x || min_y > max_y) {
            return Err(SimError::InvalidConfig(format!(
                "wall clearance {} leaves no room for bottles",
                stats.wall_clearance
            )));
        }

        let boat_start = Vec2::new(config.boat.start_x, config.boat.start_y);
        let mut placed: Vec<Vec2> = Vec::with_capacity(stats.count);

        for index in 0..stats.count {
            let mut spot = None;
            for _ in 0..stats.max_attempts {
                let candidate = Vec2::new(rng.gen_range(min_x..=max_x), rng.gen_range(min_y..=max_y));

                let clear_of_boat = candidate.distance(boat_start) >= stats.boat_clearance;
                let clear_of_bottles = placed
                    .iter()
                    .all(|other| candidate.distance(*other) >= stats.spacing);

                if clear_of_boat && clear_of_bottles {
                    spot = Some(candidate);
                    break;
                }
            }

            let Some(position) = spot else {
                return Err(SimError::Placement {
                    index,
                    attempts: stats.max_attempts,
                });
            };

            let angle = rng.gen_range(-std::f32::consts::PI..std::f32::consts::PI);
            field.add(position, angle, stats.weight, physics)?;
            placed.push(position);
        }

        log::info!(
            "Scattered {} bottles (seed {})",
            field.remaining(),
            config.seed
        );

        Ok(field)
    }

    /// Put a single bottle into the pool
    pub fn add(
        &mut self,
        position: Vec2,
        angle: f32,
        weight: f32,
        physics: &mut PhysicsWorld,
    ) -> Result<BottleId, SimError> {
        let collider = presets::bottle_collider(&silhouette::BOTTLE, weight)
            .ok_or(SimError::Silhouette("bottle outline is degenerate"))?;
        let body = presets::bottle_body(
            position.x,
            position.y,
            angle,
            self.damping.0,
            self.damping.1,
        );

        let id = self.next_id;
        self.next_id += 1;

        let body_handle = physics.add_rigid_body(body);
        let collider_handle = physics.add_collider(collider, body_handle);
        physics.set_entity_mapping(body_handle, id as u64);

        self.bottles.push(Bottle {
            id,
            weight,
            body_handle,
            collider_handle,
        });

        log::trace!("Bottle {} placed at ({:.2}, {:.2})", id, position.x, position.y);
        Ok(id)
    }

    /// Get a bottle by ID
    pub fn get(&self, id: BottleId) -> Option<&Bottle> {
        self.bottles.iter().find(|b| b.id == id)
    }

    /// All bottles still floating
    pub fn all(&self) -> &[Bottle] {
        &self.bottles
    }

    /// Number of bottles still floating
    pub fn remaining(&self) -> usize {
        self.bottles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bottles.is_empty()
    }

    /// Remove a bottle from the pool and the physics world
    pub fn remove(&mut self, id: BottleId, physics: &mut PhysicsWorld) -> Option<Bottle> {
        let pos = self.bottles.iter().position(|b| b.id == id)?;
        let bottle = self.bottles.remove(pos);
        physics.remove_rigid_body(bottle.body_handle);
        Some(bottle)
    }

    /// Remove every bottle the boat started touching during the last step
    ///
    /// A bottle named by several events in one step is consumed once.
    pub fn consume_touched(
        &mut self,
        events: &[CollisionEvent],
        boat_collider: ColliderHandle,
        physics: &mut PhysicsWorld,
    ) -> Vec<Bottle> {
        let touched: Vec<BottleId> = events
            .iter()
            .filter(|event| event.is_started())
            .filter_map(|event| event.other(boat_collider))
            .filter_map(|collider| physics.get_collider(collider)?.parent())
            .filter_map(|body| physics.get_entity_id(body))
            .map(|entity| entity as BottleId)
            .collect();

        touched
            .into_iter()
            .filter_map(|id| self.remove(id, physics))
            .collect()
    }
}
