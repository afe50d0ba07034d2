//! Intersection for scene primitives.

use lumen_core::{Mesh, Primitive, Shape};
use lumen_math::{Interval, Vec2, Vec3};

use crate::geometry::{box_intersect, box_surface, sphere_intersect, sphere_normal, sphere_uv, triangle_intersect};
use crate::hittable::{Hittable, LocalHit};
use crate::Ray;

fn sphere_hit(ray: &Ray, center: Vec3, radius: f32) -> Option<LocalHit> {
    sphere_intersect(ray, center, radius).map(|point| LocalHit {
        point,
        normal: sphere_normal(point, center),
        uv: sphere_uv(point, center),
    })
}

/// Nearest triangle of `mesh` hit by the model-space ray.
///
/// Undisplaced meshes first test the ray against their bounding cube moved
/// to the frame position. A displacement animation can push vertices outside
/// that cube, so displaced meshes test every face, moving its vertices first.
fn mesh_hit(primitive: &Primitive, mesh: &Mesh, ray: &Ray) -> Option<LocalHit> {
    let position = primitive.frame_position(ray.time);

    if primitive.displacement.is_none()
        && !mesh
            .bounding_cube()
            .translate(position)
            .hit(&ray.model_ray(), Interval::FORWARD)
    {
        return None;
    }

    let mut best: Option<LocalHit> = None;
    let mut best_distance = f32::INFINITY;

    for [v1, v2, v3] in mesh.triangle_vertices() {
        let v1 = primitive.displace(v1, ray.time);
        let v2 = primitive.displace(v2, ray.time);
        let v3 = primitive.displace(v3, ray.time);

        if let Some(tri) = triangle_intersect(ray, v1, v2, v3, position) {
            let distance = tri.hit.point.distance(ray.model_origin());
            if best.is_none() || distance < best_distance {
                best_distance = distance;
                best = Some(tri.hit);
            }
        }
    }

    best
}

impl Hittable for Primitive {
    fn intersect(&self, ray: &Ray) -> Option<LocalHit> {
        let position = self.frame_position(ray.time);
        match &self.shape {
            Shape::Sphere => sphere_hit(ray, position, 1.0),
            Shape::NonhierSphere { radius, .. } => sphere_hit(ray, position, *radius),
            Shape::Cube => box_intersect(ray, position, Vec3::ONE),
            Shape::NonhierBox { size, .. } => box_intersect(ray, position, *size),
            Shape::Mesh(mesh) => mesh_hit(self, mesh, ray),
        }
    }

    fn normal(&self, p: Vec3, time: f32) -> Option<Vec3> {
        let position = self.frame_position(time);
        match &self.shape {
            Shape::Sphere | Shape::NonhierSphere { .. } => Some(sphere_normal(p, position)),
            Shape::Cube => Some(box_surface(p, position, Vec3::ONE).0),
            Shape::NonhierBox { size, .. } => Some(box_surface(p, position, *size).0),
            Shape::Mesh(_) => None,
        }
    }

    fn uv(&self, p: Vec3, time: f32) -> Option<Vec2> {
        let position = self.frame_position(time);
        match &self.shape {
            Shape::Sphere | Shape::NonhierSphere { .. } => Some(sphere_uv(p, position)),
            Shape::Cube => Some(box_surface(p, position, Vec3::ONE).1),
            Shape::NonhierBox { size, .. } => Some(box_surface(p, position, *size).1),
            Shape::Mesh(_) => None,
        }
    }
}
