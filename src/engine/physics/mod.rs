// Physics system using rapier2d

pub mod body;
mod collision;
mod world;

pub use body::{presets, BodyBuilder, ColliderBuilder2D};
pub use collision::{CollisionEvent, CollisionEventQueue, CollisionGroups};
pub use world::{ColliderHandle, PhysicsWorld, RigidBodyHandle, FIXED_TIMESTEP};

// Re-export commonly used rapier types for convenience
pub use rapier2d::prelude::{nalgebra, point, vector, Real, RigidBody};
