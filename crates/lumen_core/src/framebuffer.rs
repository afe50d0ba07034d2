//! Floating-point RGB image buffer.
//!
//! The renderer writes linear colors here; PNG persistence clamps each
//! channel to [0, 1] and maps it to [0, 255].

use std::path::Path;

use thiserror::Error;

use crate::Color;

/// Errors that can occur while loading or saving images.
#[derive(Error, Debug)]
pub enum ImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image codec error: {0}")]
    Codec(#[from] image::ImageError),

    #[error("Pixel data of length {len} does not fit a {width}x{height} RGB image")]
    Dimensions { width: u32, height: u32, len: usize },
}

pub type ImageResult<T> = Result<T, ImageError>;

/// Color components per pixel (red, green, blue).
pub const CHANNELS: usize = 3;

/// A rectangle of RGB pixels stored as contiguous `f32` components, row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl ImageBuffer {
    /// Create a black image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0.0; width as usize * height as usize * CHANNELS],
        }
    }

    /// Wrap existing component data (`width * height * 3` floats).
    pub fn from_raw(width: u32, height: u32, data: Vec<f32>) -> ImageResult<Self> {
        if data.len() != width as usize * height as usize * CHANNELS {
            return Err(ImageError::Dimensions {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        CHANNELS * (y as usize * self.width as usize + x as usize)
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        let i = self.index(x, y);
        Color::new(self.data[i], self.data[i + 1], self.data[i + 2])
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.data[i..i + CHANNELS].copy_from_slice(&color.to_array());
    }

    /// Get one component (0 = red, 1 = green, 2 = blue) of the pixel at (x, y).
    pub fn channel(&self, x: u32, y: u32, channel: usize) -> f32 {
        debug_assert!(channel < CHANNELS);
        self.data[self.index(x, y) + channel]
    }

    /// Set one component of the pixel at (x, y).
    pub fn set_channel(&mut self, x: u32, y: u32, channel: usize, value: f32) {
        debug_assert!(channel < CHANNELS);
        let i = self.index(x, y) + channel;
        self.data[i] = value;
    }

    /// Raw component storage.
    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Convert to 8-bit RGB, clamping every component to [0, 1].
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.data
            .iter()
            .map(|c| (255.0 * c.clamp(0.0, 1.0)) as u8)
            .collect()
    }

    /// Read a PNG (or any format the codec recognizes) into a new buffer.
    pub fn load_png(path: impl AsRef<Path>) -> ImageResult<Self> {
        let path = path.as_ref();
        let rgb = image::open(path)?.to_rgb8();
        let (width, height) = rgb.dimensions();

        let data = rgb
            .into_raw()
            .into_iter()
            .map(|c| c as f32 / 255.0)
            .collect();

        log::debug!("Loaded image {} ({}x{})", path.display(), width, height);
        Self::from_raw(width, height, data)
    }

    /// Save as an 8-bit RGB PNG, overwriting any existing file.
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        image::save_buffer_with_format(
            path.as_ref(),
            &self.to_rgb8(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )?;
        Ok(())
    }
}
