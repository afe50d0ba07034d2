//! Scene graph types.
//!
//! A scene is a tree of [`SceneNode`]s. Each node owns its children and
//! carries a local transform whose inverse is kept in sync. Rays are mapped
//! into a node's model space by composing the inverses from the root down.

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use lumen_math::{Mat4, Vec3};
use rand::RngCore;

use crate::animation::{Animation, AnimationKind};
use crate::camera::Camera;
use crate::light::Light;
use crate::material::Material;
use crate::particles::ParticleSystem;
use crate::primitive::Primitive;
use crate::Color;

static NEXT_NODE_ID: AtomicU32 = AtomicU32::new(0);

fn next_node_id() -> u32 {
    NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed)
}

/// Payload that distinguishes node variants.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Grouping node with only a transform
    Transform,
    /// A primitive with its material
    Geometry {
        primitive: Arc<Primitive>,
        material: Arc<Material>,
    },
    /// A particle emitter
    Particles(ParticleSystem),
    /// Articulation point; contributes no geometry itself
    Joint,
}

impl NodeKind {
    pub fn label(&self) -> &'static str {
        match self {
            NodeKind::Transform => "SceneNode",
            NodeKind::Geometry { .. } => "GeometryNode",
            NodeKind::Particles(_) => "ParticleNode",
            NodeKind::Joint => "JointNode",
        }
    }
}

/// A node of the scene tree.
#[derive(Clone, Debug)]
pub struct SceneNode {
    id: u32,
    pub name: String,
    pub kind: NodeKind,
    transform: Mat4,
    inverse: Mat4,
    children: Vec<SceneNode>,
    animations: Vec<Animation>,
    rest_transform: Option<Mat4>,
}

/// Compose the node animations active at frame `t` onto `base`.
///
/// Animations are applied in list order, each on the left of the running
/// transform. The first translate or rotate animation whose interval has not
/// started ends the walk, so lists must be ordered by start frame. Rotations
/// are about the Y axis, in degrees.
pub fn apply_animation(base: Mat4, animations: &[Animation], t: f32) -> Mat4 {
    let mut m = base;

    for animation in animations {
        match animation.kind() {
            AnimationKind::Translate => {
                if animation.clamped_elapsed(t).is_none() {
                    break;
                }
                m = Mat4::from_translation(animation.translation_at(t)) * m;
            }
            AnimationKind::Rotate => {
                if animation.clamped_elapsed(t).is_none() {
                    break;
                }
                m = Mat4::from_rotation_y(animation.rotation_at(t).to_radians()) * m;
            }
            AnimationKind::VertexDisplacement | AnimationKind::None => {}
        }
    }

    m
}

impl SceneNode {
    pub fn with_kind(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            id: next_node_id(),
            name: name.into(),
            kind,
            transform: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            children: Vec::new(),
            animations: Vec::new(),
            rest_transform: None,
        }
    }

    /// A transform-only node.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Transform)
    }

    pub fn geometry(
        name: impl Into<String>,
        primitive: impl Into<Arc<Primitive>>,
        material: impl Into<Arc<Material>>,
    ) -> Self {
        Self::with_kind(
            name,
            NodeKind::Geometry {
                primitive: primitive.into(),
                material: material.into(),
            },
        )
    }

    pub fn particles(name: impl Into<String>, system: ParticleSystem) -> Self {
        Self::with_kind(name, NodeKind::Particles(system))
    }

    pub fn joint(name: impl Into<String>) -> Self {
        Self::with_kind(name, NodeKind::Joint)
    }

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn transform(&self) -> &Mat4 {
        &self.transform
    }

    pub fn inverse(&self) -> &Mat4 {
        &self.inverse
    }

    /// Replace the local transform; the inverse is recomputed with it.
    pub fn set_transform(&mut self, m: Mat4) {
        self.transform = m;
        self.inverse = m.inverse();
    }

    /// Rotate about a local axis (`'x'`, `'y'` or `'z'`) by `degrees`.
    pub fn rotate(&mut self, axis: char, degrees: f32) {
        let axis = match axis {
            'x' => Vec3::X,
            'y' => Vec3::Y,
            'z' => Vec3::Z,
            other => {
                log::warn!("Ignoring rotation of '{}' about unknown axis '{}'", self.name, other);
                return;
            }
        };
        self.set_transform(Mat4::from_axis_angle(axis, degrees.to_radians()) * self.transform);
    }

    pub fn scale(&mut self, amount: Vec3) {
        self.set_transform(Mat4::from_scale(amount) * self.transform);
    }

    pub fn translate(&mut self, amount: Vec3) {
        self.set_transform(Mat4::from_translation(amount) * self.transform);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut [SceneNode] {
        &mut self.children
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    /// Builder form of [`add_child`](Self::add_child).
    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.add_child(child);
        self
    }

    /// Detach the direct child with `id`, handing ownership back to the caller.
    pub fn remove_child(&mut self, id: u32) -> Option<SceneNode> {
        let index = self.children.iter().position(|c| c.id == id)?;
        Some(self.children.remove(index))
    }

    pub fn animations(&self) -> &[Animation] {
        &self.animations
    }

    /// Append an animation; animations are evaluated in insertion order.
    pub fn add_animation(&mut self, animation: Animation) {
        self.animations.push(animation);
    }

    /// Local transform at frame `t`, leaving the node untouched.
    pub fn animated_transform(&self, t: f32) -> Mat4 {
        apply_animation(self.transform, &self.animations, t)
    }

    /// Deep copy of the subtree with every node's animations applied at frame `t`.
    pub fn posed(&self, t: f32) -> SceneNode {
        let mut node = SceneNode {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind.clone(),
            transform: Mat4::IDENTITY,
            inverse: Mat4::IDENTITY,
            children: self.children.iter().map(|c| c.posed(t)).collect(),
            animations: self.animations.clone(),
            rest_transform: None,
        };
        node.set_transform(self.animated_transform(t));
        node
    }

    /// Apply this node's animations in place, remembering the rest transform.
    pub fn animate_node(&mut self, t: f32) {
        self.rest_transform = Some(self.transform);
        let m = self.animated_transform(t);
        self.set_transform(m);
    }

    /// Restore the transform saved by the last [`animate_node`](Self::animate_node).
    pub fn reset_animation(&mut self) {
        if let Some(rest) = self.rest_transform.take() {
            self.set_transform(rest);
        }
    }

    /// [`animate_node`](Self::animate_node) over the whole subtree.
    pub fn animate_tree(&mut self, t: f32) {
        self.animate_node(t);
        for child in &mut self.children {
            child.animate_tree(t);
        }
    }

    /// [`reset_animation`](Self::reset_animation) over the whole subtree.
    pub fn reset_tree(&mut self) {
        self.reset_animation();
        for child in &mut self.children {
            child.reset_tree();
        }
    }

    pub fn find(&self, id: u32) -> Option<&SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: u32) -> Option<&mut SceneNode> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Number of nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(SceneNode::node_count).sum::<usize>()
    }

    /// Visit every particle system in the subtree.
    pub fn for_each_particle_system_mut(&mut self, f: &mut dyn FnMut(&mut ParticleSystem)) {
        if let NodeKind::Particles(system) = &mut self.kind {
            f(system);
        }
        for child in &mut self.children {
            child.for_each_particle_system_mut(f);
        }
    }
}

impl fmt::Display for SceneNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:[name:{}, id:{}]", self.kind.label(), self.name, self.id)
    }
}

/// Everything needed to render: the node tree, lights and camera.
#[derive(Clone, Debug)]
pub struct Scene {
    pub root: SceneNode,
    pub lights: Vec<Light>,
    pub ambient: Color,
    pub camera: Camera,
}

impl Scene {
    pub fn new(root: SceneNode, camera: Camera) -> Self {
        Self {
            root,
            lights: Vec::new(),
            ambient: Color::ZERO,
            camera,
        }
    }

    pub fn with_light(mut self, light: Light) -> Self {
        self.lights.push(light);
        self
    }

    pub fn with_ambient(mut self, ambient: Color) -> Self {
        self.ambient = ambient;
        self
    }

    /// Advance every particle emitter to `frame`.
    pub fn advance_particles(&mut self, frame: i32, rng: &mut dyn RngCore) {
        self.root
            .for_each_particle_system_mut(&mut |system| system.preprocess(frame, &mut *rng));
    }

    /// Snapshot of the scene with node and light animations applied at frame `t`.
    pub fn posed(&self, t: f32) -> Scene {
        Scene {
            root: self.root.posed(t),
            lights: self.lights.iter().map(|l| l.posed(t)).collect(),
            ambient: self.ambient,
            camera: self.camera.clone(),
        }
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::PhongMaterial;

    fn mat4_close(a: &Mat4, b: &Mat4) -> bool {
        a.abs_diff_eq(*b, 1e-5)
    }

    fn sphere_node(name: &str) -> SceneNode {
        SceneNode::geometry(
            name,
            Primitive::sphere(),
            Material::from(PhongMaterial::matte(Color::ONE)),
        )
    }

    #[test]
    fn test_ids_are_unique() {
        let a = SceneNode::new("a");
        let b = SceneNode::new("b");
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_inverse_tracks_transform() {
        let mut node = SceneNode::new("n");
        node.scale(Vec3::new(2.0, 3.0, 4.0));
        node.rotate('z', 30.0);
        node.translate(Vec3::new(1.0, -2.0, 5.0));

        assert!(mat4_close(&(*node.transform() * *node.inverse()), &Mat4::IDENTITY));
    }

    #[test]
    fn test_transforms_compose_on_left() {
        let mut node = SceneNode::new("n");
        node.scale(Vec3::splat(2.0));
        node.translate(Vec3::new(1.0, 0.0, 0.0));

        // Scale first, then translate
        let p = node.transform().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert!((p - Vec3::new(3.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotate_unknown_axis_is_ignored() {
        let mut node = SceneNode::new("n");
        node.rotate('w', 45.0);
        assert_eq!(*node.transform(), Mat4::IDENTITY);
    }

    #[test]
    fn test_add_remove_child() {
        let mut root = SceneNode::new("root");
        let child = sphere_node("child");
        let id = child.id();
        root.add_child(child);
        root.add_child(SceneNode::joint("joint"));

        assert_eq!(root.node_count(), 3);
        assert_eq!(root.find(id).map(|n| n.name.as_str()), Some("child"));

        let removed = root.remove_child(id).unwrap();
        assert_eq!(removed.name, "child");
        assert_eq!(root.node_count(), 2);
        assert!(root.remove_child(id).is_none());
    }

    #[test]
    fn test_animation_stops_at_unstarted_entry() {
        let animations = vec![
            Animation::new(0.0, 10.0, 't', "right"),
            Animation::new(20.0, 30.0, 't', "up"),
            Animation::new(0.0, 10.0, 't', "down"),
        ];

        let m = apply_animation(Mat4::IDENTITY, &animations, 5.0);
        let p = m.transform_point3(Vec3::ZERO);

        // Only the first entry applies; "down" comes after an unstarted entry
        assert!((p - Vec3::new(0.6, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn test_rotation_is_about_y() {
        let animations = vec![Animation::new(0.0, 100.0, 'r', "spin")];
        let m = apply_animation(Mat4::IDENTITY, &animations, 60.0);

        let p = m.transform_point3(Vec3::X);
        assert!((p - Vec3::new(0.0, 0.0, -1.0)).length() < 1e-5);
    }

    #[test]
    fn test_animate_reset_round_trip() {
        let mut node = SceneNode::new("n");
        node.rotate('x', 17.0);
        node.translate(Vec3::new(0.5, 1.5, -2.0));
        node.add_animation(Animation::new(0.0, 50.0, 't', "camera"));
        node.add_animation(Animation::new(0.0, 50.0, 'r', "spin"));

        let before = *node.transform();
        let before_inv = *node.inverse();

        node.animate_node(25.0);
        assert!(!mat4_close(node.transform(), &before));

        node.reset_animation();
        assert_eq!(*node.transform(), before);
        assert_eq!(*node.inverse(), before_inv);
    }

    #[test]
    fn test_posed_leaves_original_untouched() {
        let mut child = sphere_node("ball");
        child.add_animation(Animation::new(0.0, 10.0, 't', "up"));
        let root = SceneNode::new("root").with_child(child);

        let posed = root.posed(10.0);
        let p = posed.children()[0].transform().transform_point3(Vec3::ZERO);
        assert!((p.y - 7.2).abs() < 1e-4);
        assert_eq!(*root.children()[0].transform(), Mat4::IDENTITY);
        assert_eq!(posed.children()[0].id(), root.children()[0].id());
    }

    #[test]
    fn test_animate_tree_matches_posed() {
        let mut child = sphere_node("ball");
        child.add_animation(Animation::new(0.0, 10.0, 't', "leftFall"));
        let mut root = SceneNode::new("root").with_child(child);
        root.add_animation(Animation::new(0.0, 10.0, 'r', "spin"));

        let posed = root.posed(7.0);
        root.animate_tree(7.0);
        assert!(mat4_close(root.transform(), posed.transform()));
        assert!(mat4_close(
            root.children()[0].transform(),
            posed.children()[0].transform()
        ));

        root.reset_tree();
        assert_eq!(*root.transform(), Mat4::IDENTITY);
        assert_eq!(*root.children()[0].transform(), Mat4::IDENTITY);
    }

    #[test]
    fn test_display() {
        let node = SceneNode::joint("elbow");
        assert_eq!(node.to_string(), format!("JointNode:[name:elbow, id:{}]", node.id()));
    }
}
