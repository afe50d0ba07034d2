//! Intersection for particle systems.

use lumen_core::ParticleSystem;

use crate::hittable::{Hittable, LocalHit};
use crate::Ray;

impl Hittable for ParticleSystem {
    /// Nearest live particle, skipped entirely when the ray misses the
    /// system's travel volume.
    fn intersect(&self, ray: &Ray) -> Option<LocalHit> {
        self.bounds().intersect(ray)?;

        let origin = ray.model_origin();
        self.particles()
            .iter()
            .filter_map(|p| p.intersect(ray))
            .min_by(|a, b| a.point.distance(origin).total_cmp(&b.point.distance(origin)))
    }
}
