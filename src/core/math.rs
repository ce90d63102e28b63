// Math utilities and helper functions

/// Clamp a value between min and max
pub fn clamp<T: PartialOrd>(value: T, min: T, max: T) -> T {
    if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    }
}

/// Wrap an angle in degrees into `[0, 360)`
pub fn normalize_degrees(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Convert a body rotation (radians, counter-clockwise from +x) into a
/// compass heading (degrees, clockwise from north = +y)
///
/// heading = (450 - normalize(angle * 180 / pi)) mod 360
pub fn compass_heading(angle: f32) -> f32 {
    normalize_degrees(450.0 - normalize_degrees(angle.to_degrees()))
}

/// Inverse of [`compass_heading`]: body rotation in radians for a heading
pub fn heading_to_angle(heading: f32) -> f32 {
    normalize_degrees(450.0 - heading).to_radians()
}

/// Signed difference `to - from` between two headings, in `(-180, 180]`
///
/// Positive values are clockwise (to starboard).
pub fn signed_angle_diff(from: f32, to: f32) -> f32 {
    let diff = normalize_degrees(to - from);
    if diff > 180.0 {
        diff - 360.0
    } else {
        diff
    }
}

/// Compass bearing of the vector `(dx, dy)` in degrees
pub fn bearing_of(dx: f32, dy: f32) -> f32 {
    compass_heading(dy.atan2(dx))
}
