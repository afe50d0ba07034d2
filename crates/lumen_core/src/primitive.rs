//! Geometric primitives and their per-instance motion.
//!
//! Intersection lives in the renderer; this module only describes shapes and
//! where they are at a given frame.

use std::sync::Arc;

use lumen_math::Vec3;

use crate::animation::{Animation, AnimationKind};
use crate::mesh::Mesh;

/// Shape variants a primitive can take.
#[derive(Clone, Debug)]
pub enum Shape {
    /// Unit sphere centered at the origin
    Sphere,
    /// Unit cube spanning [0, 1] on every axis
    Cube,
    /// Sphere with explicit center and radius
    NonhierSphere { center: Vec3, radius: f32 },
    /// Axis-aligned box with explicit minimum corner and size
    NonhierBox { corner: Vec3, size: Vec3 },
    /// Triangle mesh, shared between primitives
    Mesh(Arc<Mesh>),
}

impl Shape {
    /// Position that motion offsets are applied to.
    pub fn base_position(&self) -> Vec3 {
        match self {
            Shape::NonhierSphere { center, .. } => *center,
            Shape::NonhierBox { corner, .. } => *corner,
            Shape::Sphere | Shape::Cube | Shape::Mesh(_) => Vec3::ZERO,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Shape::Sphere => "Sphere",
            Shape::Cube => "Cube",
            Shape::NonhierSphere { .. } => "NonhierSphere",
            Shape::NonhierBox { .. } => "NonhierBox",
            Shape::Mesh(_) => "Mesh",
        }
    }
}

/// Linear translation over a frame interval.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LinearMotion {
    pub start_frame: i32,
    pub end_frame: i32,
    pub translation: Vec3,
}

impl Default for LinearMotion {
    fn default() -> Self {
        Self {
            start_frame: -1,
            end_frame: -1,
            translation: Vec3::ZERO,
        }
    }
}

impl LinearMotion {
    pub fn new(start_frame: i32, end_frame: i32, translation: Vec3) -> Self {
        Self {
            start_frame,
            end_frame,
            translation,
        }
    }

    /// Position of `base` at frame `t`.
    ///
    /// `base` before the start frame, `base + translation` after the end
    /// frame, linearly interpolated in between.
    pub fn position_at(&self, t: f32, base: Vec3) -> Vec3 {
        let start = self.start_frame as f32;
        let end = self.end_frame as f32;

        if t < start {
            base
        } else if t > end || end <= start {
            base + self.translation
        } else {
            base + (t - start) * self.translation / (end - start)
        }
    }
}

/// A shape with optional motion and vertex displacement.
#[derive(Clone, Debug)]
pub struct Primitive {
    pub shape: Shape,
    pub motion: LinearMotion,
    /// Per-vertex displacement; only meshes honor it
    pub displacement: Option<Animation>,
}

impl Primitive {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            motion: LinearMotion::default(),
            displacement: None,
        }
    }

    pub fn sphere() -> Self {
        Self::new(Shape::Sphere)
    }

    pub fn cube() -> Self {
        Self::new(Shape::Cube)
    }

    pub fn nonhier_sphere(center: Vec3, radius: f32) -> Self {
        Self::new(Shape::NonhierSphere { center, radius })
    }

    pub fn nonhier_box(corner: Vec3, size: Vec3) -> Self {
        Self::new(Shape::NonhierBox { corner, size })
    }

    pub fn mesh(mesh: Arc<Mesh>) -> Self {
        Self::new(Shape::Mesh(mesh))
    }

    pub fn with_motion(mut self, motion: LinearMotion) -> Self {
        self.motion = motion;
        self
    }

    /// Attach a vertex displacement. Other animation kinds are ignored.
    pub fn with_displacement(mut self, animation: Animation) -> Self {
        if animation.kind() == AnimationKind::VertexDisplacement {
            self.displacement = Some(animation);
        } else {
            log::debug!(
                "Ignoring non-displacement animation '{}' on {}",
                animation.name,
                self.shape.name()
            );
        }
        self
    }

    /// Shape position at frame `t`.
    pub fn frame_position(&self, t: f32) -> Vec3 {
        self.motion.position_at(t, self.shape.base_position())
    }

    /// Vertex `p` after displacement at frame `t`.
    pub fn displace(&self, p: Vec3, t: f32) -> Vec3 {
        match &self.displacement {
            Some(animation) => animation.displace(p, t),
            None => p,
        }
    }
}
