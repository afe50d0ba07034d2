//! Time-parameterized animations keyed by name.
//!
//! Scene scripts declare an animation as `(start, end, kind, name)`, where
//! `kind` is `'t'` (translate), `'r'` (rotate) or `'d'` (vertex displacement)
//! and `name` selects one of the built-in functions below. Unknown kinds or
//! names produce a no-op animation instead of an error.

use std::fmt;

use lumen_math::Vec3;

/// Vector-valued function of elapsed frames.
pub type TranslateFn = fn(f32) -> Vec3;

/// Rotation in degrees as a function of elapsed frames.
pub type RotateFn = fn(f32) -> f32;

/// Displaced vertex position as a function of the rest position and frame.
pub type DisplaceFn = fn(Vec3, f32) -> Vec3;

/// The evaluator an animation carries. The variant is its kind.
#[derive(Clone, Copy)]
pub enum Evaluator {
    None,
    Translate(TranslateFn),
    Rotate(RotateFn),
    VertexDisplacement(DisplaceFn),
}

/// Animation kind without its evaluator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnimationKind {
    None,
    Translate,
    Rotate,
    VertexDisplacement,
}

impl AnimationKind {
    /// Parse a scene-script kind character.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            't' => Some(Self::Translate),
            'r' => Some(Self::Rotate),
            'd' => Some(Self::VertexDisplacement),
            _ => None,
        }
    }
}

static TRANSLATIONS: &[(&str, TranslateFn)] = &[
    ("right", right),
    ("left", left),
    ("left2", left2),
    ("up", up),
    ("sunTrans", sun_trans),
    ("down", down),
    ("rightFall", right_fall),
    ("leftFall", left_fall),
    ("camera", camera),
    ("view", view),
];

static ROTATIONS: &[(&str, RotateFn)] = &[("spin", spin)];

static DISPLACEMENTS: &[(&str, DisplaceFn)] = &[("waves", waves)];

fn lookup<F: Copy>(table: &[(&str, F)], name: &str) -> Option<F> {
    table.iter().find(|(n, _)| *n == name).map(|(_, f)| *f)
}

/// An animation over the frame interval `[start, end]`.
#[derive(Clone)]
pub struct Animation {
    pub start: f32,
    pub end: f32,
    pub name: String,
    evaluator: Evaluator,
}

impl Animation {
    /// Build an animation from its script declaration.
    ///
    /// Falls back to a no-op animation when `kind` or `name` is not recognized.
    pub fn new(start: f32, end: f32, kind: char, name: &str) -> Self {
        let evaluator = match AnimationKind::from_char(kind) {
            Some(AnimationKind::Translate) => lookup(TRANSLATIONS, name).map(Evaluator::Translate),
            Some(AnimationKind::Rotate) => lookup(ROTATIONS, name).map(Evaluator::Rotate),
            Some(AnimationKind::VertexDisplacement) => {
                lookup(DISPLACEMENTS, name).map(Evaluator::VertexDisplacement)
            }
            _ => None,
        };

        let evaluator = evaluator.unwrap_or_else(|| {
            log::debug!(
                "Unknown animation '{}' of kind '{}', using no-op animation",
                name,
                kind
            );
            Evaluator::None
        });

        Self {
            start,
            end,
            name: name.to_string(),
            evaluator,
        }
    }

    pub fn kind(&self) -> AnimationKind {
        match self.evaluator {
            Evaluator::None => AnimationKind::None,
            Evaluator::Translate(_) => AnimationKind::Translate,
            Evaluator::Rotate(_) => AnimationKind::Rotate,
            Evaluator::VertexDisplacement(_) => AnimationKind::VertexDisplacement,
        }
    }

    pub fn evaluator(&self) -> Evaluator {
        self.evaluator
    }

    /// Elapsed frames to feed the evaluator at frame `t`.
    ///
    /// `None` before the interval starts; saturates at `end - start` afterwards.
    pub fn clamped_elapsed(&self, t: f32) -> Option<f32> {
        if t < self.start {
            None
        } else {
            Some(t.min(self.end) - self.start)
        }
    }

    /// Translation at frame `t`, zero before the interval or for other kinds.
    pub fn translation_at(&self, t: f32) -> Vec3 {
        match (self.evaluator, self.clamped_elapsed(t)) {
            (Evaluator::Translate(f), Some(dt)) => f(dt),
            _ => Vec3::ZERO,
        }
    }

    /// Rotation in degrees at frame `t`, zero before the interval or for other kinds.
    pub fn rotation_at(&self, t: f32) -> f32 {
        match (self.evaluator, self.clamped_elapsed(t)) {
            (Evaluator::Rotate(f), Some(dt)) => f(dt),
            _ => 0.0,
        }
    }

    /// Displace a vertex at frame `t`; identity for non-displacement kinds.
    ///
    /// Displacement functions see the absolute frame, not the elapsed time.
    pub fn displace(&self, p: Vec3, t: f32) -> Vec3 {
        match self.evaluator {
            Evaluator::VertexDisplacement(f) => f(p, t),
            _ => p,
        }
    }
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("start", &self.start)
            .field("end", &self.end)
            .field("name", &self.name)
            .field("kind", &self.kind())
            .finish()
    }
}

/// Clamped evaluation of an optional translate animation added to `base`.
pub fn animated_position(base: Vec3, animation: Option<&Animation>, t: f32) -> Vec3 {
    base + animation.map_or(Vec3::ZERO, |a| a.translation_at(t))
}

fn right(t: f32) -> Vec3 {
    Vec3::new(0.12 * t, 0.0, 0.0)
}

fn left(t: f32) -> Vec3 {
    Vec3::new(-0.14 * t, 0.0, 0.0)
}

fn left2(t: f32) -> Vec3 {
    Vec3::new(-0.12 * t, 0.0, 0.0)
}

fn up(t: f32) -> Vec3 {
    Vec3::new(0.0, 0.72 * t, 0.0)
}

fn sun_trans(_t: f32) -> Vec3 {
    Vec3::new(0.0, -25.0, -40.0)
}

fn down(t: f32) -> Vec3 {
    Vec3::new(0.0, -0.65 * t, 0.0)
}

fn right_fall(t: f32) -> Vec3 {
    let dt = 0.1 * t;
    Vec3::new(dt, -dt * dt, 0.0)
}

fn left_fall(t: f32) -> Vec3 {
    let dt = 0.1 * t;
    Vec3::new(-dt, -dt * dt, 0.0)
}

fn camera(t: f32) -> Vec3 {
    Vec3::new(0.0, -((0.131 * t).sin() + 0.209 * t), -0.8 * t)
}

fn view(t: f32) -> Vec3 {
    Vec3::new(0.0, 0.104 * t, 0.0)
}

fn spin(t: f32) -> f32 {
    1.5 * t
}

/// Sine ripple along z, fading out between frames 200 and 248.
fn waves(p: Vec3, t: f32) -> Vec3 {
    let scale = if t > 248.0 {
        0.0
    } else if t > 200.0 {
        1.0 - (t - 200.0) / 48.0
    } else {
        1.0
    };
    let dt = 0.003 * t;
    Vec3::new(p.x, p.y + scale * 0.5 * ((p.z + dt) * 15.0).sin(), p.z)
}
