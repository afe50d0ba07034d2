//! Point lights with distance falloff.

use std::fmt;

use lumen_math::Vec3;

use crate::animation::{animated_position, Animation};
use crate::Color;

/// A point light.
#[derive(Clone, Debug)]
pub struct Light {
    pub color: Color,
    pub position: Vec3,
    /// Constant, linear and quadratic attenuation coefficients
    pub falloff: [f32; 3],
    /// Optional translate animation
    pub animation: Option<Animation>,
    rest_position: Option<Vec3>,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            color: Color::ZERO,
            position: Vec3::ZERO,
            falloff: [1.0, 0.0, 0.0],
            animation: None,
            rest_position: None,
        }
    }
}

impl Light {
    pub fn new(color: Color, position: Vec3) -> Self {
        Self {
            color,
            position,
            ..Default::default()
        }
    }

    pub fn with_falloff(mut self, falloff: [f32; 3]) -> Self {
        self.falloff = falloff;
        self
    }

    pub fn with_animation(mut self, animation: Animation) -> Self {
        self.animation = Some(animation);
        self
    }

    /// Position at frame `t` without touching the light.
    pub fn position_at(&self, t: f32) -> Vec3 {
        animated_position(self.position, self.animation.as_ref(), t)
    }

    /// Copy of this light moved to its position at frame `t`.
    pub fn posed(&self, t: f32) -> Light {
        Light {
            position: self.position_at(t),
            rest_position: None,
            ..self.clone()
        }
    }

    /// Move the light in place to its position at frame `t`.
    pub fn animate(&mut self, t: f32) {
        self.rest_position = Some(self.position);
        self.position = self.position_at(t);
    }

    /// Undo the last `animate`.
    pub fn reset_animation(&mut self) {
        if let Some(rest) = self.rest_position.take() {
            self.position = rest;
        }
    }

    /// Attenuation divisor at distance `r`.
    pub fn attenuation(&self, r: f32) -> f32 {
        self.falloff[0] + self.falloff[1] * r + self.falloff[2] * r * r
    }
}

impl fmt::Display for Light {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "L[{}, {}, {}, {}, {}]",
            self.color, self.position, self.falloff[0], self.falloff[1], self.falloff[2]
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_falloff() {
        let light = Light::new(Color::ONE, Vec3::Y);
        assert_eq!(light.falloff, [1.0, 0.0, 0.0]);
        assert_eq!(light.attenuation(100.0), 1.0);
    }

    #[test]
    fn test_attenuation() {
        let light = Light::new(Color::ONE, Vec3::ZERO).with_falloff([1.0, 0.5, 0.25]);
        assert!((light.attenuation(2.0) - 3.0).abs() < 1e-6);
    }

    #[test]
    fn test_animated_position() {
        let light = Light::new(Color::ONE, Vec3::new(0.0, 10.0, 0.0))
            .with_animation(Animation::new(10.0, 20.0, 't', "down"));

        assert_eq!(light.position_at(0.0), Vec3::new(0.0, 10.0, 0.0));
        assert!((light.position_at(20.0).y - 3.5).abs() < 1e-4);
        assert_eq!(light.position_at(20.0), light.position_at(30.0));
        assert_eq!(light.posed(15.0).position, light.position_at(15.0));
    }

    #[test]
    fn test_animate_and_reset() {
        let mut light = Light::new(Color::ONE, Vec3::ZERO)
            .with_animation(Animation::new(0.0, 10.0, 't', "right"));

        light.animate(5.0);
        assert!((light.position.x - 0.6).abs() < 1e-4);
        light.reset_animation();
        assert_eq!(light.position, Vec3::ZERO);
    }

    #[test]
    fn test_display() {
        let light = Light::new(Color::ONE, Vec3::ZERO);
        let text = light.to_string();
        assert!(text.starts_with("L["));
        assert!(text.ends_with(", 1, 0, 0]"));
    }
}
