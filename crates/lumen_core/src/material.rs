//! Phong surface materials.

use std::sync::Arc;

use lumen_math::Vec2;

use crate::texture::Texture;

/// Color type alias (RGB values typically 0-1)
pub type Color = lumen_math::Vec3;

/// Constant Phong reflectance.
#[derive(Clone, Debug, PartialEq)]
pub struct PhongMaterial {
    /// Diffuse reflectance
    pub kd: Color,
    /// Specular reflectance
    pub ks: Color,
    /// Mirror reflectance; zero disables reflection rays
    pub kr: Color,
    /// Specular exponent
    pub shininess: f32,
}

impl PhongMaterial {
    pub fn new(kd: Color, ks: Color, kr: Color, shininess: f32) -> Self {
        Self {
            kd,
            ks,
            kr,
            shininess,
        }
    }

    /// A diffuse-only material.
    pub fn matte(kd: Color) -> Self {
        Self::new(kd, Color::ZERO, Color::ZERO, 1.0)
    }
}

/// Phong reflectance modulated by a texture lookup.
#[derive(Clone, Debug)]
pub struct PhongTexture {
    pub base: PhongMaterial,
    pub texture: Arc<Texture>,
}

impl PhongTexture {
    pub fn new(base: PhongMaterial, texture: Arc<Texture>) -> Self {
        Self { base, texture }
    }
}

/// Surface material, immutable once the scene is built.
#[derive(Clone, Debug)]
pub enum Material {
    Phong(PhongMaterial),
    Textured(PhongTexture),
}

impl Material {
    fn modulate(&self, coefficient: Color, uv: Vec2) -> Color {
        match self {
            Material::Phong(_) => coefficient,
            Material::Textured(t) => coefficient * t.texture.sample(uv),
        }
    }

    fn base(&self) -> &PhongMaterial {
        match self {
            Material::Phong(m) => m,
            Material::Textured(t) => &t.base,
        }
    }

    /// Diffuse reflectance at `uv`.
    pub fn kd(&self, uv: Vec2) -> Color {
        self.modulate(self.base().kd, uv)
    }

    /// Specular reflectance at `uv`.
    pub fn ks(&self, uv: Vec2) -> Color {
        self.modulate(self.base().ks, uv)
    }

    /// Mirror reflectance at `uv`.
    pub fn kr(&self, uv: Vec2) -> Color {
        self.modulate(self.base().kr, uv)
    }

    pub fn shininess(&self) -> f32 {
        self.base().shininess
    }
}

impl From<PhongMaterial> for Material {
    fn from(m: PhongMaterial) -> Self {
        Material::Phong(m)
    }
}

impl From<PhongTexture> for Material {
    fn from(t: PhongTexture) -> Self {
        Material::Textured(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phong_is_constant() {
        let m: Material = PhongMaterial::new(Color::X, Color::Y, Color::Z, 20.0).into();
        assert_eq!(m.kd(Vec2::new(0.3, 0.7)), Color::X);
        assert_eq!(m.ks(Vec2::ZERO), Color::Y);
        assert_eq!(m.kr(Vec2::ONE), Color::Z);
        assert_eq!(m.shininess(), 20.0);
    }

    #[test]
    fn test_textured_modulates_every_coefficient() {
        let texture = Arc::new(Texture::solid_color(Color::new(0.5, 1.0, 0.0)));
        let base = PhongMaterial::new(Color::ONE, Color::splat(0.5), Color::splat(0.2), 10.0);
        let m: Material = PhongTexture::new(base, texture).into();

        let uv = Vec2::new(0.5, 0.5);
        assert!((m.kd(uv) - Color::new(0.5, 1.0, 0.0)).length() < 1e-4);
        assert!((m.ks(uv) - Color::new(0.25, 0.5, 0.0)).length() < 1e-4);
        assert!((m.kr(uv) - Color::new(0.1, 0.2, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_matte_has_no_reflection() {
        let m = Material::from(PhongMaterial::matte(Color::ONE));
        assert_eq!(m.kr(Vec2::ZERO), Color::ZERO);
    }
}
