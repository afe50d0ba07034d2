// Transform utilities for Mat4
//
// Extends glam::Mat4 with the normal transforms the tracer needs when moving
// hits between a node's model space and world space.

use glam::{Mat3, Mat4, Vec3};

/// Extension trait for Mat4 to provide additional transform utilities
pub trait Mat4Ext {
    /// Transform a surface normal by this local-to-world matrix.
    ///
    /// Normals transform by the inverse transpose so they stay perpendicular
    /// under non-uniform scale. The result is normalized.
    fn transform_normal3(&self, normal: Vec3) -> Vec3;

    /// Transform a surface normal when `self` is already the world-to-local
    /// inverse, avoiding a second inversion.
    fn transform_normal3_by_inverse(&self, normal: Vec3) -> Vec3;
}

impl Mat4Ext for Mat4 {
    fn transform_normal3(&self, normal: Vec3) -> Vec3 {
        self.inverse().transform_normal3_by_inverse(normal)
    }

    fn transform_normal3_by_inverse(&self, normal: Vec3) -> Vec3 {
        (Mat3::from_mat4(self.transpose()) * normal).normalize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_point3_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let transformed = mat.transform_point3(Vec3::new(1.0, 2.0, 3.0));

        assert_eq!(transformed, Vec3::new(11.0, 22.0, 33.0));
    }

    #[test]
    fn test_normal_ignores_translation() {
        let mat = Mat4::from_translation(Vec3::new(10.0, 20.0, 30.0));
        let n = mat.transform_normal3(Vec3::Y);

        assert!((n - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_normal_rotation() {
        use std::f32::consts::PI;

        // 90 degree rotation around Z axis
        let mat = Mat4::from_rotation_z(PI / 2.0);
        let n = mat.transform_normal3(Vec3::X);

        assert!((n - Vec3::Y).length() < 0.001);
    }

    #[test]
    fn test_normal_non_uniform_scale() {
        // Squash a 45 degree surface along Y; the normal tilts towards Y
        let mat = Mat4::from_scale(Vec3::new(1.0, 0.5, 1.0));
        let n = mat.transform_normal3(Vec3::new(1.0, 1.0, 0.0).normalize());

        assert!(n.y > n.x);
        assert!((n.length() - 1.0).abs() < 0.001);
    }

    #[test]
    fn test_normal_by_inverse_matches() {
        let mat = Mat4::from_scale(Vec3::new(2.0, 1.0, 3.0)) * Mat4::from_rotation_y(0.7);
        let n = Vec3::new(0.2, 0.9, -0.4).normalize();

        let a = mat.transform_normal3(n);
        let b = mat.inverse().transform_normal3_by_inverse(n);
        assert!((a - b).length() < 0.001);
    }

    #[test]
    fn test_mat4_rotation_inverse() {
        use std::f32::consts::PI;

        let mat = Mat4::from_rotation_y(PI / 4.0);
        let inv = mat.inverse();

        let point = Vec3::new(5.0, 3.0, 2.0);
        let back = inv.transform_point3(mat.transform_point3(point));

        assert!((back - point).length() < 0.001);
    }
}
