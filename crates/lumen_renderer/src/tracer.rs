//! Scene traversal and recursive Phong shading.

use lumen_core::{Color, Light, Material, NodeKind, Scene, SceneNode};
use lumen_math::{Mat4, Vec3};

use crate::hittable::{Hittable, Intersection, LocalHit};
use crate::Ray;

const BACKGROUND_BOTTOM: Color = Color::new(1.0, 0.235, 0.976);
const BACKGROUND_TOP: Color = Color::new(0.224, 0.996, 1.0);

/// Vertical gradient seen by rays that hit nothing.
pub fn background(ray: &Ray) -> Color {
    let blend = 0.5 * (ray.direction.normalize().y + 1.0);
    (1.0 - blend) * BACKGROUND_BOTTOM + blend * BACKGROUND_TOP
}

/// Local hit of a single node's own payload, with the material to shade it.
fn node_intersect<'a>(node: &'a SceneNode, ray: &Ray) -> Option<(LocalHit, &'a Material)> {
    match &node.kind {
        NodeKind::Geometry {
            primitive,
            material,
        } => primitive.intersect(ray).map(|hit| (hit, material.as_ref())),
        NodeKind::Particles(system) => system.intersect(ray).map(|hit| (hit, system.material().as_ref())),
        NodeKind::Transform | NodeKind::Joint => None,
    }
}

/// Walk `node` and its subtree, keeping the closest world-space hit in `best`.
///
/// `transform` and `inverse` are the accumulated parent matrices; this node's
/// local transform is composed on the right of `transform` and its inverse on
/// the left of `inverse`. Hits are pushed `fudge` units along their normal.
pub fn traverse_scene_graph<'a>(
    node: &'a SceneNode,
    ray: &Ray,
    best: &mut Intersection<'a>,
    transform: Mat4,
    inverse: Mat4,
    fudge: f32,
) {
    let transform = transform * *node.transform();
    let inverse = *node.inverse() * inverse;

    let mut local = *ray;
    local.transform(&inverse);

    if let Some((hit, material)) = node_intersect(node, &local) {
        let mut candidate = Intersection::from_local(&hit, &transform, &inverse, material);
        candidate.point += fudge * candidate.normal;

        if best.is_point_closer(candidate.point, ray) {
            best.replace_with(candidate);
        }
    }

    for child in node.children() {
        traverse_scene_graph(child, ray, best, transform, inverse, fudge);
    }
}

/// Shades rays against one posed frame of a scene.
pub struct Tracer<'a> {
    scene: &'a Scene,
    eye: Vec3,
    max_depth: u32,
    fudge: f32,
}

impl<'a> Tracer<'a> {
    /// `scene` must already be posed for the frame; `eye` is the camera
    /// position used for specular highlights.
    pub fn new(scene: &'a Scene, eye: Vec3, max_depth: u32, fudge: f32) -> Self {
        Self {
            scene,
            eye,
            max_depth,
            fudge,
        }
    }

    /// Closest hit of `ray` against the whole scene.
    pub fn closest_hit(&self, ray: &Ray) -> Intersection<'a> {
        let mut best = Intersection::default();
        traverse_scene_graph(
            &self.scene.root,
            ray,
            &mut best,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            self.fudge,
        );
        best
    }

    /// Whether nothing lies between `point` and `light`.
    pub fn is_unblocked(&self, point: Vec3, light: &Light, time: f32) -> bool {
        let shadow = Ray::new(point, light.position - point, time);
        let mut probe = Intersection::occlusion_probe(light.position);
        traverse_scene_graph(
            &self.scene.root,
            &shadow,
            &mut probe,
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            self.fudge,
        );
        !probe.found
    }

    /// Color seen along `ray`, recursing into reflections until `max_depth`.
    pub fn raytrace(&self, ray: &Ray, depth: u32) -> Color {
        let hit = self.closest_hit(ray);
        let material = match hit.material {
            Some(material) if hit.found => material,
            _ => return background(ray),
        };

        let kd = material.kd(hit.uv);
        let ks = material.ks(hit.uv);
        let kr = material.kr(hit.uv);
        let n = hit.normal;
        let v = (self.eye - hit.point).normalize();

        let mut diffuse = Color::ZERO;
        let mut specular = Color::ZERO;

        for light in &self.scene.lights {
            if !self.is_unblocked(hit.point, light, ray.time) {
                continue;
            }

            let l = light.position - hit.point;
            let r = l.length();
            let l = l / r;
            let h = (l + v).normalize();

            let intensity = light.color / light.attenuation(r);
            diffuse += l.dot(n).max(0.0) * intensity;
            specular += h.dot(n).max(0.0).powf(material.shininess()) * intensity;
        }

        let mut reflected = Color::ZERO;
        if depth < self.max_depth && kr != Color::ZERO {
            let d = ray.direction.normalize();
            let mirror = Ray::new(hit.point, d - 2.0 * n * d.dot(n), ray.time);
            reflected = self.raytrace(&mirror, depth + 1);
        }

        kd * self.scene.ambient + kd * diffuse + ks * specular + kr * reflected
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::{Camera, PhongMaterial, Primitive};

    fn matte(color: Color) -> Material {
        PhongMaterial::matte(color).into()
    }

    fn scene_with(root: SceneNode) -> Scene {
        Scene::new(root, Camera::default())
    }

    #[test]
    fn test_background_gradient() {
        let up = background(&Ray::new(Vec3::ZERO, Vec3::Y, 0.0));
        let down = background(&Ray::new(Vec3::ZERO, Vec3::NEG_Y, 0.0));
        let level = background(&Ray::new(Vec3::ZERO, Vec3::new(0.0, 0.0, -3.0), 0.0));

        assert!((up - BACKGROUND_TOP).length() < 1e-6);
        assert!((down - BACKGROUND_BOTTOM).length() < 1e-6);
        assert!((level - 0.5 * (BACKGROUND_TOP + BACKGROUND_BOTTOM)).length() < 1e-6);
    }

    #[test]
    fn test_transforms_stack_down_the_tree() {
        let mut parent = SceneNode::new("parent");
        parent.translate(Vec3::new(0.0, 0.0, -5.0));
        let mut child = SceneNode::geometry("ball", Primitive::sphere(), matte(Color::ONE));
        child.scale(Vec3::splat(2.0));
        parent.add_child(child);

        let scene = scene_with(SceneNode::new("root").with_child(parent));
        let tracer = Tracer::new(&scene, Vec3::ZERO, 5, 0.0);

        let hit = tracer.closest_hit(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0));
        assert!(hit.found);
        assert!((hit.point - Vec3::new(0.0, 0.0, -3.0)).length() < 1e-4);
        assert!((hit.normal - Vec3::Z).length() < 1e-4);
    }

    #[test]
    fn test_fudge_pushes_along_normal() {
        let root = SceneNode::new("root").with_child(SceneNode::geometry(
            "ball",
            Primitive::sphere(),
            matte(Color::ONE),
        ));
        let scene = scene_with(root);
        let tracer = Tracer::new(&scene, Vec3::ZERO, 5, 0.25);

        let hit = tracer.closest_hit(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0));
        assert!((hit.point.z - 1.25).abs() < 1e-4);
    }

    #[test]
    fn test_nearest_of_siblings_wins() {
        let mut near = SceneNode::geometry("near", Primitive::sphere(), matte(Color::X));
        near.translate(Vec3::new(0.0, 0.0, 2.0));
        let far = SceneNode::geometry("far", Primitive::sphere(), matte(Color::Y));

        // Far listed last so order alone would pick it
        let root = SceneNode::new("root").with_child(near).with_child(far);
        let scene = scene_with(root);
        let tracer = Tracer::new(&scene, Vec3::ZERO, 5, 0.0);

        let hit = tracer.closest_hit(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0));
        assert_eq!(hit.material.map(|m| m.kd(hit.uv)), Some(Color::X));
    }

    #[test]
    fn test_lit_point_has_diffuse() {
        let root = SceneNode::new("root").with_child(SceneNode::geometry(
            "ball",
            Primitive::sphere(),
            matte(Color::ONE),
        ));
        let scene = scene_with(root)
            .with_ambient(Color::splat(0.1))
            .with_light(Light::new(Color::ONE, Vec3::new(0.0, 0.0, 10.0)));
        let tracer = Tracer::new(&scene, Vec3::new(0.0, 0.0, 10.0), 5, 0.25);

        let color = tracer.raytrace(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0), 0);
        // Ambient plus a head-on diffuse term
        assert!((color - Color::splat(1.1)).length() < 1e-3);
    }

    #[test]
    fn test_light_behind_surface_adds_nothing() {
        let root = SceneNode::new("root").with_child(SceneNode::geometry(
            "ball",
            Primitive::sphere(),
            matte(Color::ONE),
        ));
        let scene = scene_with(root)
            .with_ambient(Color::splat(0.1))
            .with_light(Light::new(Color::ONE, Vec3::new(0.0, 0.0, -10.0)));
        let tracer = Tracer::new(&scene, Vec3::new(0.0, 0.0, 10.0), 5, 0.25);

        let color = tracer.raytrace(&Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0), 0);
        assert!((color - Color::splat(0.1)).length() < 1e-4);
    }

    #[test]
    fn test_mirror_reflects_background() {
        let mirror = PhongMaterial::new(Color::ZERO, Color::ZERO, Color::ONE, 1.0);
        let root = SceneNode::new("root").with_child(SceneNode::geometry(
            "mirror",
            Primitive::sphere(),
            Material::from(mirror),
        ));
        let scene = scene_with(root);
        let tracer = Tracer::new(&scene, Vec3::new(0.0, 0.0, 10.0), 5, 0.25);

        let ray = Ray::new(Vec3::new(0.0, 0.0, 10.0), Vec3::NEG_Z, 0.0);
        let color = tracer.raytrace(&ray, 0);
        let bounced = background(&Ray::new(Vec3::ZERO, Vec3::Z, 0.0));
        assert!((color - bounced).length() < 1e-4);

        // At the depth limit no reflection is traced
        assert_eq!(tracer.raytrace(&ray, 5), Color::ZERO);
    }
}
