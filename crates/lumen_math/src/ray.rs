use crate::Vec3;

/// A world-space ray with origin, direction, and time.
///
/// `time` carries the frame number the ray is cast at, so that animated
/// primitives can be evaluated at the correct position.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    pub time: f32,
}

impl Ray {
    /// Create a new ray.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
        }
    }
}
