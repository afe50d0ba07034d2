//! Rays with a cached model-space copy.

use lumen_math::{Mat4, Vec3};

/// A world-space ray plus its image in the model space of the node being tested.
///
/// Traversal calls [`Ray::transform`] with the accumulated inverse transform
/// before each node's local intersection test; the model-space fields are only
/// meaningful for that node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
    /// Frame number the ray samples
    pub time: f32,
    model_origin: Vec3,
    model_direction: Vec3,
}

impl Ray {
    /// Create a ray whose model space is world space.
    pub fn new(origin: Vec3, direction: Vec3, time: f32) -> Self {
        Self {
            origin,
            direction,
            time,
            model_origin: origin,
            model_direction: direction,
        }
    }

    /// Map the world-space ray through `inverse` into model space.
    pub fn transform(&mut self, inverse: &Mat4) {
        self.model_origin = inverse.transform_point3(self.origin);
        self.model_direction = inverse.transform_vector3(self.direction);
    }

    pub fn model_origin(&self) -> Vec3 {
        self.model_origin
    }

    pub fn model_direction(&self) -> Vec3 {
        self.model_direction
    }

    /// Point along the model-space ray at parameter `t`.
    pub fn model_at(&self, t: f32) -> Vec3 {
        self.model_origin + t * self.model_direction
    }

    /// The model-space ray as a plain math ray (for bounding volume tests).
    pub fn model_ray(&self) -> lumen_math::Ray {
        lumen_math::Ray::new(self.model_origin, self.model_direction, self.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_model_matches_world() {
        let ray = Ray::new(Vec3::ONE, Vec3::Z, 3.0);
        assert_eq!(ray.model_origin(), Vec3::ONE);
        assert_eq!(ray.model_direction(), Vec3::Z);
        assert_eq!(ray.time, 3.0);
    }

    #[test]
    fn test_transform_keeps_world() {
        let mut ray = Ray::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(0.0, 0.0, -2.0), 0.0);
        let inverse = Mat4::from_translation(Vec3::new(-1.0, 0.0, 0.0)) * Mat4::from_scale(Vec3::splat(0.5));
        ray.transform(&inverse);

        assert!((ray.model_origin() - Vec3::new(-0.5, 1.0, 1.5)).length() < 1e-5);
        // Directions ignore translation
        assert!((ray.model_direction() - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
        assert_eq!(ray.origin, Vec3::new(1.0, 2.0, 3.0));
        assert!((ray.model_at(1.0) - Vec3::new(-0.5, 1.0, 0.5)).length() < 1e-5);
    }
}
