//! Per-frame viewing transform.

use lumen_core::Camera;
use lumen_math::{Mat3, Mat4, Vec2, Vec3, Vec4};

use crate::Ray;

/// Distance from the eye to the image plane.
const IMAGE_PLANE_DISTANCE: f32 = 1.0;

/// Camera resolved for one frame: eye position and the matrix that maps pixel
/// coordinates onto the image plane in world space.
#[derive(Clone, Copy, Debug)]
pub struct FrameCamera {
    pub eye: Vec3,
    pub view: Vec3,
    screen_to_world: Mat4,
}

impl FrameCamera {
    /// Resolve `camera` at frame `t` for a `width` x `height` image.
    pub fn new(camera: &Camera, t: f32, width: u32, height: u32) -> Self {
        let eye = camera.eye_at(t);
        let view = camera.view_at(t);
        Self {
            eye,
            view,
            screen_to_world: screen_to_world(eye, view, camera.up, camera.fovy, width, height),
        }
    }

    pub fn screen_to_world(&self) -> &Mat4 {
        &self.screen_to_world
    }

    /// World-space point on the image plane for pixel coordinates `p`.
    pub fn pixel_to_world(&self, p: Vec2) -> Vec3 {
        (self.screen_to_world * Vec4::new(p.x, p.y, 0.0, 1.0)).truncate()
    }

    /// Primary ray through column `i`, row `j`, offset by `jitter` pixels.
    pub fn primary_ray(&self, i: u32, j: u32, jitter: Vec2, time: f32) -> Ray {
        let p = self.pixel_to_world(Vec2::new(i as f32, j as f32) + jitter);
        Ray::new(self.eye, p - self.eye, time)
    }
}

/// Screen-to-world matrix: center the pixel grid at the image plane
/// distance, scale pixels to the field of view (flipping both axes), rotate
/// into the camera basis and move to the eye.
pub fn screen_to_world(eye: Vec3, view: Vec3, up: Vec3, fovy: f32, width: u32, height: u32) -> Mat4 {
    let nx = width as f32;
    let ny = height as f32;
    let d = IMAGE_PLANE_DISTANCE;

    let t1 = Mat4::from_translation(Vec3::new(-nx / 2.0, -ny / 2.0, d));

    let plane_height = 2.0 * d * (fovy.to_radians() / 2.0).tan();
    let plane_width = (nx / ny) * plane_height;
    let s2 = Mat4::from_scale(Vec3::new(-plane_width / nx, -plane_height / ny, 1.0));

    let w = (view - eye).normalize();
    let u = up.cross(w).normalize();
    let v = w.cross(u);
    let r3 = Mat4::from_mat3(Mat3::from_cols(u, v, w));

    let t4 = Mat4::from_translation(eye);

    t4 * r3 * s2 * t1
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::Animation;

    fn looking_down_z() -> FrameCamera {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 90.0);
        FrameCamera::new(&camera, 0.0, 100, 50)
    }

    #[test]
    fn test_center_pixel_looks_at_view() {
        let cam = looking_down_z();
        let ray = cam.primary_ray(50, 25, Vec2::ZERO, 0.0);
        assert!((ray.direction.normalize() - Vec3::NEG_Z).length() < 1e-5);
        assert_eq!(ray.origin, cam.eye);
    }

    #[test]
    fn test_image_plane_extent() {
        let cam = looking_down_z();

        // 90 degree fov: top edge at height d, width doubled by the 2:1 aspect
        let top_left = cam.pixel_to_world(Vec2::new(0.0, 0.0));
        assert!((top_left - Vec3::new(-2.0, 1.0, 9.0)).length() < 1e-4);

        let bottom_right = cam.pixel_to_world(Vec2::new(100.0, 50.0));
        assert!((bottom_right - Vec3::new(2.0, -1.0, 9.0)).length() < 1e-4);
    }

    #[test]
    fn test_columns_go_right_rows_go_down() {
        let cam = looking_down_z();
        let a = cam.pixel_to_world(Vec2::new(10.0, 10.0));
        let b = cam.pixel_to_world(Vec2::new(20.0, 30.0));
        assert!(b.x > a.x);
        assert!(b.y < a.y);
    }

    #[test]
    fn test_animated_eye() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 50.0)
            .with_eye_animation(Animation::new(0.0, 10.0, 't', "right"));
        let cam = FrameCamera::new(&camera, 5.0, 10, 10);
        assert!((cam.eye - Vec3::new(0.6, 0.0, 10.0)).length() < 1e-5);
    }
}
