// Hard-coded body outlines, in body-local metres with +x pointing forward

use crate::engine::physics::Real;

/// Drone boat hull: flat stern, pointed bow (convex)
pub const HULL: [[Real; 2]; 5] = [
    [-0.5, -0.25],
    [0.25, -0.25],
    [0.5, 0.0],
    [0.25, 0.25],
    [-0.5, 0.25],
];

/// Where the single propeller (and its rudder) sits
pub const STERN: [Real; 2] = [-0.5, 0.0];

/// Twin propeller mounts for differential thrust
pub const PORT_MOUNT: [Real; 2] = [-0.5, 0.15];
pub const STARBOARD_MOUNT: [Real; 2] = [-0.5, -0.15];

/// Plastic bottle seen from above: body plus a narrow neck (concave)
pub const BOTTLE: [[Real; 2]; 8] = [
    [-0.15, -0.04],
    [0.07, -0.04],
    [0.09, -0.015],
    [0.15, -0.015],
    [0.15, 0.015],
    [0.09, 0.015],
    [0.07, 0.04],
    [-0.15, 0.04],
];

fn bounding_radius(outline: &[[Real; 2]]) -> Real {
    outline
        .iter()
        .map(|p| (p[0] * p[0] + p[1] * p[1]).sqrt())
        .fold(0.0, Real::max)
}

/// Radius of the smallest origin-centred circle containing the hull
pub fn hull_radius() -> Real {
    bounding_radius(&HULL)
}

/// Radius of the smallest origin-centred circle containing a bottle
pub fn bottle_radius() -> Real {
    bounding_radius(&BOTTLE)
}
