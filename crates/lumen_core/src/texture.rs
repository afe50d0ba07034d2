//! Texture maps for textured Phong materials.

use std::path::Path;

use lumen_math::Vec2;

use crate::framebuffer::{ImageBuffer, ImageResult};
use crate::Color;

/// A loaded texture sampled by UV coordinates.
#[derive(Clone, Debug)]
pub struct Texture {
    image: ImageBuffer,

    /// Original file path (for debugging)
    pub path: String,
}

impl Texture {
    /// Create a texture from an image already in memory.
    pub fn new(image: ImageBuffer, path: impl Into<String>) -> Self {
        Self {
            image,
            path: path.into(),
        }
    }

    /// Create a solid color texture (1x1).
    pub fn solid_color(color: Color) -> Self {
        let mut image = ImageBuffer::new(1, 1);
        image.set(0, 0, color);
        Self::new(image, "<solid>")
    }

    /// Load a texture from a PNG file.
    pub fn load(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let image = ImageBuffer::load_png(path)?;

        log::debug!(
            "Loaded texture: {} ({}x{})",
            path.display(),
            image.width(),
            image.height()
        );

        Ok(Self::new(image, path.to_string_lossy()))
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Sample the texture at UV coordinates with bilinear filtering.
    ///
    /// `u` runs along image columns and `v` along image rows, both in [0, 1];
    /// values outside that range are clamped to the edge.
    pub fn sample(&self, uv: Vec2) -> Color {
        let max_x = self.width().saturating_sub(1);
        let max_y = self.height().saturating_sub(1);

        let x = max_x as f32 * uv.x.clamp(0.0, 1.0);
        let y = max_y as f32 * uv.y.clamp(0.0, 1.0);

        let x0 = x as u32;
        let y0 = y as u32;
        let x1 = (x0 + 1).min(max_x);
        let y1 = (y0 + 1).min(max_y);

        let fx = x - x0 as f32;
        let fy = y - y0 as f32;

        let c00 = self.image.get(x0, y0);
        let c01 = self.image.get(x0, y1);
        let c10 = self.image.get(x1, y0);
        let c11 = self.image.get(x1, y1);

        c00 * (1.0 - fx) * (1.0 - fy) + c01 * (1.0 - fx) * fy + c10 * fx * (1.0 - fy) + c11 * fx * fy
    }
}
