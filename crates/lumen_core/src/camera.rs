//! Pinhole camera parameters.

use lumen_math::Vec3;

use crate::animation::{animated_position, Animation};

/// Camera description: where it sits, what it looks at, and its vertical field of view.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub view: Vec3,
    pub up: Vec3,
    /// Vertical field of view in degrees
    pub fovy: f32,
    /// Optional translate animation of the eye
    pub eye_animation: Option<Animation>,
    /// Optional translate animation of the look-at target
    pub view_animation: Option<Animation>,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::new(0.0, 0.0, 10.0),
            view: Vec3::ZERO,
            up: Vec3::Y,
            fovy: 50.0,
            eye_animation: None,
            view_animation: None,
        }
    }
}

impl Camera {
    pub fn new(eye: Vec3, view: Vec3, up: Vec3, fovy: f32) -> Self {
        Self {
            eye,
            view,
            up,
            fovy,
            ..Default::default()
        }
    }

    pub fn with_eye_animation(mut self, animation: Animation) -> Self {
        self.eye_animation = Some(animation);
        self
    }

    pub fn with_view_animation(mut self, animation: Animation) -> Self {
        self.view_animation = Some(animation);
        self
    }

    /// Eye position at frame `t`.
    pub fn eye_at(&self, t: f32) -> Vec3 {
        animated_position(self.eye, self.eye_animation.as_ref(), t)
    }

    /// Look-at target at frame `t`.
    pub fn view_at(&self, t: f32) -> Vec3 {
        animated_position(self.view, self.view_animation.as_ref(), t)
    }
}
