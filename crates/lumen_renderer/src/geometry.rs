//! Ray intersection routines for spheres, axis-aligned boxes and triangles.
//!
//! Every routine works on the ray's model-space origin and direction, so
//! `t` and the returned points are in model units.

use std::f32::consts::PI;

use lumen_math::{quadratic_roots, Mat3, Vec2, Vec3};

use crate::hittable::LocalHit;
use crate::Ray;

/// Tolerance for a box hit to count as inside a face.
pub const BOX_EPSILON: f32 = 1e-2;

/// Rays this close to parallel with a box face skip that face.
const PARALLEL_EPSILON: f32 = 1e-8;

/// Distance within which a box hit point is taken to lie on a face axis.
const FACE_EPSILON: f32 = 1e-1;

/// Nearest point where the model-space ray meets a sphere.
pub fn sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<Vec3> {
    let o = ray.model_origin();
    let d = ray.model_direction();
    let ca = o - center;

    let a = d.dot(d);
    let b = 2.0 * d.dot(ca);
    let c = ca.dot(ca) - radius * radius;

    let roots = quadratic_roots(a as f64, b as f64, c as f64);
    let t = match roots.as_slice() {
        [] => return None,
        [t] => {
            if *t < 0.0 {
                return None;
            }
            *t
        }
        [t0, t1, ..] => {
            if *t0 < 0.0 && *t1 < 0.0 {
                return None;
            }
            let near = t0.min(*t1);
            if near >= 0.0 {
                near
            } else {
                t0.max(*t1)
            }
        }
    };

    Some(ray.model_at(t as f32))
}

/// Outward unit normal of a sphere at `p`.
pub fn sphere_normal(p: Vec3, center: Vec3) -> Vec3 {
    (p - center).normalize()
}

/// Longitude/latitude texture coordinates with u mirrored.
pub fn sphere_uv(p: Vec3, center: Vec3) -> Vec2 {
    let d = (center - p).normalize();
    let u = 0.5 + d.z.atan2(d.x) / (2.0 * PI);
    let v = 0.5 + d.y.asin() / PI;
    Vec2::new(1.0 - u, v)
}

/// Planar texture coordinates of `p` on the box face through `plane_point`.
///
/// The face is recognized by whichever axis of `p - plane_point` is near zero.
pub fn box_uv(p: Vec3, plane_point: Vec3, size: Vec3) -> Vec2 {
    let f = p - plane_point;
    let uv = if f.x.abs() < FACE_EPSILON {
        Vec2::new(f.y / size.y, f.z / size.z)
    } else if f.y.abs() < FACE_EPSILON {
        Vec2::new(f.x / size.x, f.z / size.z)
    } else {
        Vec2::new(f.x / size.x, f.y / size.y)
    };
    uv.abs()
}

/// The six box planes: a point on each and its inward-facing normal.
fn box_planes(corner: Vec3, size: Vec3) -> [(Vec3, Vec3); 6] {
    let far = corner + size;
    [
        (corner, Vec3::X),
        (corner, Vec3::Y),
        (corner, Vec3::Z),
        (far, Vec3::NEG_X),
        (far, Vec3::NEG_Y),
        (far, Vec3::NEG_Z),
    ]
}

fn inside_box(p: Vec3, corner: Vec3, size: Vec3) -> bool {
    let lo = corner - Vec3::splat(BOX_EPSILON);
    let hi = corner + size + Vec3::splat(BOX_EPSILON);
    p.cmpge(lo).all() && p.cmple(hi).all()
}

/// Intersect an axis-aligned box given by its minimum corner and size.
///
/// A later face replaces the current best only when it is both closer to the
/// ray origin and more front-facing; nearest-only selection picks interior
/// back faces near the edges.
pub fn box_intersect(ray: &Ray, corner: Vec3, size: Vec3) -> Option<LocalHit> {
    let o = ray.model_origin();
    let d = ray.model_direction();
    let planes = box_planes(corner, size);

    let mut best: Option<(usize, Vec3)> = None;

    for (i, &(plane_point, n)) in planes.iter().enumerate() {
        let denom = d.dot(n);
        if denom.abs() < PARALLEL_EPSILON {
            continue;
        }

        let t = (plane_point - o).dot(n) / denom;
        let p = o + t * d;
        if t <= 0.0 || !inside_box(p, corner, size) {
            continue;
        }

        let replace = match best {
            None => true,
            Some((j, q)) => p.distance(o) < q.distance(o) && denom > d.dot(planes[j].1),
        };
        if replace {
            best = Some((i, p));
        }
    }

    best.map(|(i, p)| {
        let (plane_point, n) = planes[i];
        LocalHit {
            point: p,
            normal: -n,
            uv: box_uv(p, plane_point, size),
        }
    })
}

/// Outward normal and uv of the box face nearest to `p`.
pub fn box_surface(p: Vec3, corner: Vec3, size: Vec3) -> (Vec3, Vec2) {
    let planes = box_planes(corner, size);
    let (plane_point, n) = planes
        .iter()
        .copied()
        .min_by(|(a, na), (b, nb)| {
            let da = (p - *a).dot(*na).abs();
            let db = (p - *b).dot(*nb).abs();
            da.total_cmp(&db)
        })
        .unwrap_or((corner, Vec3::X));
    (-n, box_uv(p, plane_point, size))
}

/// Triangle hit with its ray parameter.
#[derive(Clone, Copy, Debug)]
pub struct TriangleHit {
    pub t: f32,
    pub hit: LocalHit,
}

/// Intersect the triangle `v1 v2 v3` shifted by `offset`.
///
/// Solves `o + t d = v1 + offset + beta (v2 - v1) + gamma (v3 - v1)` by
/// Cramer's rule. The normal is the flat face normal and the uv is
/// `(beta + gamma, beta)`.
pub fn triangle_intersect(ray: &Ray, v1: Vec3, v2: Vec3, v3: Vec3, offset: Vec3) -> Option<TriangleHit> {
    let r = ray.model_origin() - v1 - offset;
    let x = v2 - v1;
    let y = v3 - v1;
    let z = -ray.model_direction();

    let det = Mat3::from_cols(x, y, z).determinant();
    if det == 0.0 {
        return None;
    }

    let beta = Mat3::from_cols(r, y, z).determinant() / det;
    let gamma = Mat3::from_cols(x, r, z).determinant() / det;
    let t = Mat3::from_cols(x, y, r).determinant() / det;

    if beta < 0.0 || gamma < 0.0 || beta + gamma > 1.0 || t < 0.0 {
        return None;
    }

    Some(TriangleHit {
        t,
        hit: LocalHit {
            point: ray.model_at(t),
            normal: x.cross(y).normalize(),
            uv: Vec2::new(beta + gamma, beta),
        },
    })
}
