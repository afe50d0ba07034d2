//! Particle emitters that feed short-lived spheres into the scene.
//!
//! Particles spawn on a square plane, travel along one axis at constant speed
//! and expire after their lifespan. Every particle is an ordinary
//! `NonhierSphere` primitive with linear motion, so the renderer intersects
//! them with the same code as any other sphere.

use std::sync::Arc;

use lumen_math::Vec3;
use rand::{Rng, RngCore};

use crate::material::Material;
use crate::primitive::{LinearMotion, Primitive};

/// Axis particles travel along.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParticleAxis {
    X,
    Y,
    Z,
}

impl ParticleAxis {
    /// Parse a scene-script direction character (`'x'`, `'y'` or `'z'`).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'x' => Some(Self::X),
            'y' => Some(Self::Y),
            'z' => Some(Self::Z),
            _ => None,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::X => 0,
            Self::Y => 1,
            Self::Z => 2,
        }
    }
}

/// Emitter parameters.
#[derive(Clone, Debug)]
pub struct ParticleSettings {
    /// Corner of the spawn plane
    pub position: Vec3,
    /// Side length of the square spawn plane
    pub area: f32,
    /// Particles spawned per frame
    pub spawn_rate: u32,
    pub radius: f32,
    /// Lifespan in frames, truncated to whole frames at spawn
    pub lifespan: f32,
    pub axis: ParticleAxis,
    /// Signed speed along `axis` in units per frame
    pub speed: f32,
}

/// A particle emitter and its live particles.
#[derive(Clone, Debug)]
pub struct ParticleSystem {
    settings: ParticleSettings,
    material: Arc<Material>,
    displacement: Vec3,
    bounds: Primitive,
    particles: Vec<Primitive>,
}

impl ParticleSystem {
    pub fn new(settings: ParticleSettings, material: Arc<Material>) -> Self {
        let axis = settings.axis.index();
        let distance = settings.speed * settings.lifespan;

        let mut displacement = Vec3::ZERO;
        displacement[axis] = distance;

        // Static volume holding every particle from spawn to expiry.
        let start = spawn_coordinate(&settings, distance);
        let mut corner = settings.position;
        corner[axis] = start.min(start + distance) - settings.radius;
        let mut size = Vec3::splat(settings.area);
        size[axis] = distance.abs() + 2.0 * settings.radius;

        Self {
            settings,
            material,
            displacement,
            bounds: Primitive::nonhier_box(corner, size),
            particles: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ParticleSettings {
        &self.settings
    }

    pub fn material(&self) -> &Arc<Material> {
        &self.material
    }

    /// Total travel of a particle over its lifespan.
    pub fn displacement(&self) -> Vec3 {
        self.displacement
    }

    /// Box primitive enclosing every possible particle position.
    pub fn bounds(&self) -> &Primitive {
        &self.bounds
    }

    pub fn particles(&self) -> &[Primitive] {
        &self.particles
    }

    pub fn particle_count(&self) -> usize {
        self.particles.len()
    }

    /// Spawn one particle at a random point of the spawn plane.
    pub fn spawn(&mut self, frame: i32, rng: &mut dyn RngCore) {
        let s = &self.settings;
        let axis = s.axis.index();

        let span = s.area - 2.0 * s.radius;
        let i = rng.gen::<f32>() * span + s.radius;
        let j = rng.gen::<f32>() * span + s.radius;

        let start = spawn_coordinate(s, self.displacement[axis]);

        let center = match s.axis {
            ParticleAxis::X => Vec3::new(start, s.position.y + i, s.position.z + j),
            ParticleAxis::Y => Vec3::new(s.position.x + i, start, s.position.z + j),
            ParticleAxis::Z => Vec3::new(s.position.x + i, s.position.y + j, start),
        };

        let motion = LinearMotion::new(frame, s.lifespan as i32 + frame, self.displacement);
        self.particles
            .push(Primitive::nonhier_sphere(center, s.radius).with_motion(motion));
    }

    /// Advance the emitter to `frame`: spawn this frame's particles, then drop
    /// those that expire exactly at `frame`.
    pub fn preprocess(&mut self, frame: i32, rng: &mut dyn RngCore) {
        for _ in 0..self.settings.spawn_rate {
            self.spawn(frame, rng);
        }

        let before = self.particles.len();
        self.particles.retain(|p| p.motion.end_frame != frame);

        log::debug!(
            "Frame {}: {} particles live ({} expired)",
            frame,
            self.particles.len(),
            before - self.particles.len()
        );
    }
}

/// Spawn plane coordinate on the travel axis, one radius past the emitter
/// position in the direction of travel.
fn spawn_coordinate(settings: &ParticleSettings, distance: f32) -> f32 {
    let base = settings.position[settings.axis.index()];
    if distance > 0.0 {
        base + settings.radius
    } else {
        base - settings.radius
    }
}
