//! Intersection records and the Hittable capability.

use lumen_core::Material;
use lumen_math::{Mat4, Mat4Ext, Vec2, Vec3};

use crate::Ray;

/// Hit in the model space of the object that was tested.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LocalHit {
    pub point: Vec3,
    pub normal: Vec3,
    pub uv: Vec2,
}

/// Something a model-space ray can hit.
pub trait Hittable {
    /// Nearest hit in front of the ray, in model space.
    fn intersect(&self, ray: &Ray) -> Option<LocalHit>;

    /// Surface normal at model-space point `p` on frame `time`, for shapes
    /// that define one pointwise.
    fn normal(&self, _p: Vec3, _time: f32) -> Option<Vec3> {
        None
    }

    /// Texture coordinates at model-space point `p` on frame `time`.
    fn uv(&self, _p: Vec3, _time: f32) -> Option<Vec2> {
        None
    }
}

/// Best world-space hit found so far while walking the scene.
#[derive(Clone, Copy, Debug)]
pub struct Intersection<'a> {
    pub found: bool,
    /// Set for shadow queries; the reference point is then the light position
    pub occlusion_probe: bool,
    pub point: Vec3,
    pub uv: Vec2,
    pub normal: Vec3,
    pub material: Option<&'a Material>,
}

impl<'a> Default for Intersection<'a> {
    fn default() -> Self {
        Self {
            found: false,
            occlusion_probe: false,
            point: Vec3::ZERO,
            uv: Vec2::ZERO,
            normal: Vec3::ZERO,
            material: None,
        }
    }
}

impl<'a> Intersection<'a> {
    /// Shadow query toward a light at `light_position`.
    ///
    /// Only hits strictly closer to the ray origin than the light are accepted.
    pub fn occlusion_probe(light_position: Vec3) -> Self {
        Self {
            occlusion_probe: true,
            point: light_position,
            ..Default::default()
        }
    }

    /// Whether `p` should replace the current best for `ray`.
    pub fn is_point_closer(&self, p: Vec3, ray: &Ray) -> bool {
        if !self.found && !self.occlusion_probe {
            return true;
        }
        p.distance(ray.origin) < self.point.distance(ray.origin)
    }

    /// Build a world-space hit from a model-space one.
    pub fn from_local(hit: &LocalHit, transform: &Mat4, inverse: &Mat4, material: &'a Material) -> Self {
        Self {
            found: true,
            occlusion_probe: false,
            point: transform.transform_point3(hit.point),
            uv: hit.uv,
            normal: inverse.transform_normal3_by_inverse(hit.normal),
            material: Some(material),
        }
    }

    /// Adopt `other` as the new best, keeping this record's probe flag.
    pub fn replace_with(&mut self, other: Intersection<'a>) {
        *self = Intersection {
            occlusion_probe: self.occlusion_probe,
            ..other
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lumen_core::PhongMaterial;

    #[test]
    fn test_empty_accepts_anything() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        assert!(Intersection::default().is_point_closer(Vec3::splat(1e6), &ray));
    }

    #[test]
    fn test_probe_accepts_only_before_light() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let probe = Intersection::occlusion_probe(Vec3::new(0.0, 0.0, 10.0));

        assert!(probe.is_point_closer(Vec3::new(0.0, 0.0, 5.0), &ray));
        assert!(!probe.is_point_closer(Vec3::new(0.0, 0.0, 12.0), &ray));
    }

    #[test]
    fn test_closer_uses_world_origin() {
        let ray = Ray::new(Vec3::ZERO, Vec3::Z, 0.0);
        let best = Intersection {
            found: true,
            point: Vec3::new(0.0, 0.0, 4.0),
            ..Default::default()
        };

        assert!(best.is_point_closer(Vec3::new(0.0, 0.0, 3.0), &ray));
        assert!(!best.is_point_closer(Vec3::new(0.0, 0.0, 4.0), &ray));
    }

    #[test]
    fn test_from_local_maps_to_world() {
        let material = Material::from(PhongMaterial::matte(Vec3::ONE));
        let transform = Mat4::from_translation(Vec3::new(0.0, 5.0, 0.0)) * Mat4::from_scale(Vec3::new(1.0, 2.0, 1.0));
        let inverse = transform.inverse();
        let local = LocalHit {
            point: Vec3::new(1.0, 1.0, 0.0),
            normal: Vec3::new(1.0, 1.0, 0.0).normalize(),
            uv: Vec2::new(0.25, 0.5),
        };

        let hit = Intersection::from_local(&local, &transform, &inverse, &material);
        assert!(hit.found);
        assert!((hit.point - Vec3::new(1.0, 7.0, 0.0)).length() < 1e-5);
        // Normals shrink along the stretched axis
        assert!((hit.normal - Vec3::new(2.0, 1.0, 0.0).normalize()).length() < 1e-5);
        assert_eq!(hit.uv, Vec2::new(0.25, 0.5));
    }

    #[test]
    fn test_replace_keeps_probe_flag() {
        let mut probe = Intersection::occlusion_probe(Vec3::Z);
        probe.replace_with(Intersection {
            found: true,
            ..Default::default()
        });
        assert!(probe.found);
        assert!(probe.occlusion_probe);
    }
}
