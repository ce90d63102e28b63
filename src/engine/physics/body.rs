use super::collision::CollisionGroups;
use rapier2d::prelude::*;

pub use rapier2d::prelude::{ColliderHandle, RigidBodyHandle};

/// Builder for creating rigid bodies with common configurations
pub struct BodyBuilder {
    body_type: RigidBodyType,
    position: Isometry<Real>,
    linear_damping: Real,
    angular_damping: Real,
    can_sleep: bool,
    ccd: bool,
}

impl BodyBuilder {
    /// Create a new dynamic body (affected by forces and collisions)
    pub fn new_dynamic() -> Self {
        Self {
            body_type: RigidBodyType::Dynamic,
            position: Isometry::identity(),
            linear_damping: 0.5,
            angular_damping: 1.0,
            can_sleep: true,
            ccd: false,
        }
    }

    /// Create a new fixed (static) body (completely immovable)
    pub fn new_fixed() -> Self {
        Self {
            body_type: RigidBodyType::Fixed,
            position: Isometry::identity(),
            linear_damping: 0.0,
            angular_damping: 0.0,
            can_sleep: false,
            ccd: false,
        }
    }

    /// Set the initial position of the body
    pub fn position(mut self, x: Real, y: Real) -> Self {
        self.position = Isometry::translation(x, y);
        self
    }

    /// Set the initial position and rotation
    pub fn position_rotation(mut self, x: Real, y: Real, angle: Real) -> Self {
        self.position = Isometry::new(vector![x, y], angle);
        self
    }

    /// Water drag on translation
    pub fn linear_damping(mut self, damping: Real) -> Self {
        self.linear_damping = damping;
        self
    }

    /// Water drag on rotation
    pub fn angular_damping(mut self, damping: Real) -> Self {
        self.angular_damping = damping;
        self
    }

    /// Set whether the body can sleep when inactive
    pub fn can_sleep(mut self, can_sleep: bool) -> Self {
        self.can_sleep = can_sleep;
        self
    }

    /// Enable continuous collision detection (keeps fast bodies out of walls)
    pub fn ccd(mut self, enabled: bool) -> Self {
        self.ccd = enabled;
        self
    }

    /// Build the rigid body
    pub fn build(self) -> RigidBody {
        // The pool is seen from above, nothing is pulled by gravity
        RigidBodyBuilder::new(self.body_type)
            .position(self.position)
            .gravity_scale(0.0)
            .linear_damping(self.linear_damping)
            .angular_damping(self.angular_damping)
            .can_sleep(self.can_sleep)
            .ccd_enabled(self.ccd)
            .build()
    }
}

/// Builder for creating colliders with common configurations
pub struct ColliderBuilder2D {
    shape: SharedShape,
    collision_groups: CollisionGroups,
    friction: Real,
    restitution: Real,
    density: Option<Real>,
    mass: Option<Real>,
    active_events: ActiveEvents,
}

impl ColliderBuilder2D {
    fn with_shape(shape: SharedShape) -> Self {
        Self {
            shape,
            collision_groups: CollisionGroups::Default,
            friction: 0.5,
            restitution: 0.0,
            density: Some(1.0),
            mass: None,
            active_events: ActiveEvents::empty(),
        }
    }

    /// Create a box-shaped collider
    pub fn box_shape(half_width: Real, half_height: Real) -> Self {
        Self::with_shape(SharedShape::cuboid(half_width, half_height))
    }

    /// Create a collider from a convex polygon
    pub fn convex_hull(points: &[[Real; 2]]) -> Option<Self> {
        let points: Vec<_> = points.iter().map(|p| point![p[0], p[1]]).collect();

        SharedShape::convex_hull(&points).map(Self::with_shape)
    }

    /// Create a collider from a closed, possibly concave outline
    ///
    /// The outline is split into convex pieces by the engine. Returns `None`
    /// when the outline has fewer than three points.
    pub fn outline(points: &[[Real; 2]]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }

        let vertices: Vec<_> = points.iter().map(|p| point![p[0], p[1]]).collect();
        let n = vertices.len() as u32;
        let indices: Vec<[u32; 2]> = (0..n).map(|i| [i, (i + 1) % n]).collect();

        Some(Self::with_shape(SharedShape::convex_decomposition(
            &vertices, &indices,
        )))
    }

    /// Set the collision groups for filtering
    pub fn collision_groups(mut self, groups: CollisionGroups) -> Self {
        self.collision_groups = groups;
        self
    }

    /// Set friction coefficient (0.0 = no friction, 1.0 = high friction)
    pub fn friction(mut self, friction: Real) -> Self {
        self.friction = friction;
        self
    }

    /// Set restitution/bounciness (0.0 = no bounce, 1.0 = perfect bounce)
    pub fn restitution(mut self, restitution: Real) -> Self {
        self.restitution = restitution;
        self
    }

    /// Set mass directly (overrides density)
    pub fn mass(mut self, mass: Real) -> Self {
        self.mass = Some(mass);
        self.density = None;
        self
    }

    /// Report collision start/stop events for this collider
    pub fn collision_events(mut self) -> Self {
        self.active_events |= ActiveEvents::COLLISION_EVENTS;
        self
    }

    /// Build the collider
    pub fn build(self) -> Collider {
        let mut builder = rapier2d::prelude::ColliderBuilder::new(self.shape)
            .collision_groups(self.collision_groups.to_interaction_groups())
            .friction(self.friction)
            .restitution(self.restitution)
            .active_events(self.active_events);

        // Set mass or density
        if let Some(mass) = self.mass {
            builder = builder.mass(mass);
        } else if let Some(density) = self.density {
            builder = builder.density(density);
        }

        builder.build()
    }
}

/// Common rigid body configurations for the pool
pub mod presets {
    use super::*;

    /// Boat body: dynamic, never sleeps, CCD so full power can't tunnel a wall
    pub fn boat_body(
        x: Real,
        y: Real,
        angle: Real,
        linear_damping: Real,
        angular_damping: Real,
    ) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position_rotation(x, y, angle)
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .can_sleep(false)
            .ccd(true)
            .build()
    }

    /// Boat hull collider from a convex silhouette
    pub fn boat_collider(hull: &[[Real; 2]], mass: Real) -> Option<Collider> {
        ColliderBuilder2D::convex_hull(hull).map(|builder| {
            builder
                .collision_groups(CollisionGroups::Boat)
                .friction(0.2)
                .restitution(0.1)
                .mass(mass)
                .collision_events()
                .build()
        })
    }

    /// Bottle body: dynamic, drifts and settles
    pub fn bottle_body(
        x: Real,
        y: Real,
        angle: Real,
        linear_damping: Real,
        angular_damping: Real,
    ) -> RigidBody {
        BodyBuilder::new_dynamic()
            .position_rotation(x, y, angle)
            .linear_damping(linear_damping)
            .angular_damping(angular_damping)
            .build()
    }

    /// Bottle collider from a (concave) silhouette
    pub fn bottle_collider(outline: &[[Real; 2]], mass: Real) -> Option<Collider> {
        ColliderBuilder2D::outline(outline).map(|builder| {
            builder
                .collision_groups(CollisionGroups::Bottle)
                .friction(0.3)
                .restitution(0.2)
                .mass(mass)
                .collision_events()
                .build()
        })
    }

    /// Wall body (fixed/static)
    pub fn wall_body(x: Real, y: Real) -> RigidBody {
        BodyBuilder::new_fixed().position(x, y).build()
    }

    /// Wall collider (box shape)
    pub fn wall_collider(width: Real, height: Real) -> Collider {
        ColliderBuilder2D::box_shape(width / 2.0, height / 2.0)
            .collision_groups(CollisionGroups::Wall)
            .friction(0.1)
            .restitution(0.3)
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE: [[Real; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

    #[test]
    fn test_body_builder_dynamic() {
        let body = BodyBuilder::new_dynamic()
            .position(10.0, 20.0)
            .build();

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert_eq!(body.translation().x, 10.0);
        assert_eq!(body.translation().y, 20.0);
        assert_eq!(body.gravity_scale(), 0.0);
    }

    #[test]
    fn test_body_builder_damping() {
        let body = BodyBuilder::new_dynamic()
            .linear_damping(2.0)
            .angular_damping(3.0)
            .build();

        assert_eq!(body.linear_damping(), 2.0);
        assert_eq!(body.angular_damping(), 3.0);
    }

    #[test]
    fn test_collider_builder_box() {
        let collider = ColliderBuilder2D::box_shape(1.0, 2.0).friction(0.3).build();

        assert!(!collider.is_sensor());
        assert_eq!(collider.friction(), 0.3);
    }

    #[test]
    fn test_convex_hull_rejects_degenerate_points() {
        assert!(ColliderBuilder2D::convex_hull(&SQUARE).is_some());
        assert!(ColliderBuilder2D::convex_hull(&[[0.0, 0.0], [1.0, 0.0]]).is_none());
    }

    #[test]
    fn test_outline_needs_three_points() {
        assert!(ColliderBuilder2D::outline(&SQUARE).is_some());
        assert!(ColliderBuilder2D::outline(&[[0.0, 0.0], [1.0, 0.0]]).is_none());
    }

    #[test]
    fn test_boat_preset() {
        let body = presets::boat_body(1.0, 2.0, 0.0, 1.0, 2.0);
        let collider = presets::boat_collider(&SQUARE, 5.0).expect("square is convex");

        assert_eq!(body.body_type(), RigidBodyType::Dynamic);
        assert!(body.is_ccd_enabled());
        assert!(!collider.is_sensor());
        assert!((collider.mass() - 5.0).abs() < 1e-4);
        assert!(collider
            .active_events()
            .contains(ActiveEvents::COLLISION_EVENTS));
    }

    #[test]
    fn test_wall_preset() {
        let body = presets::wall_body(0.0, 0.0);
        let collider = presets::wall_collider(10.0, 1.0);

        assert_eq!(body.body_type(), RigidBodyType::Fixed);
        assert_eq!(
            collider.collision_groups(),
            CollisionGroups::Wall.to_interaction_groups()
        );
    }
}
