//! Column-span partitioning for parallel frame rendering.
//!
//! The image is split into contiguous, non-overlapping ranges of columns.
//! Each worker renders one span into its own buffer; the spans are copied
//! into the frame after every worker has finished.

use std::ops::Range;

use lumen_core::{Color, ImageBuffer};
use lumen_math::Vec2;
use rand::{Rng, RngCore};

use crate::camera::FrameCamera;
use crate::tracer::Tracer;

/// A contiguous range of image columns, spanning every row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSpan {
    pub columns: Range<u32>,
    /// Index of this span in the partition
    pub index: usize,
}

impl ColumnSpan {
    pub fn new(columns: Range<u32>, index: usize) -> Self {
        Self { columns, index }
    }

    pub fn width(&self) -> u32 {
        self.columns.end - self.columns.start
    }
}

/// Split `width` columns into at most `parts` disjoint spans covering every column.
///
/// Spans are equal except the last, which takes the remainder.
pub fn partition_columns(width: u32, parts: usize) -> Vec<ColumnSpan> {
    let parts = (parts.max(1) as u32).min(width.max(1));
    let span_width = width / parts;

    (0..parts)
        .map(|i| {
            let start = i * span_width;
            let end = if i == parts - 1 { width } else { start + span_width };
            ColumnSpan::new(start..end, i as usize)
        })
        .collect()
}

/// Rendered colors of one span.
#[derive(Debug, Clone)]
pub struct SpanResult {
    pub span: ColumnSpan,
    /// Pixel colors, column-major: all rows of the first column, then the next
    pub pixels: Vec<Color>,
}

impl SpanResult {
    /// Copy this span's pixels into `image`.
    pub fn write_to(&self, image: &mut ImageBuffer) {
        let height = image.height();
        for (k, i) in self.span.columns.clone().enumerate() {
            for j in 0..height {
                image.set(i, j, self.pixels[k * height as usize + j as usize]);
            }
        }
    }
}

/// Average of `samples` jittered primary rays through pixel (i, j).
///
/// A single sample goes through the pixel coordinate without jitter.
pub fn render_pixel(
    tracer: &Tracer,
    camera: &FrameCamera,
    i: u32,
    j: u32,
    samples: u32,
    time: f32,
    rng: &mut dyn RngCore,
) -> Color {
    if samples <= 1 {
        return tracer.raytrace(&camera.primary_ray(i, j, Vec2::ZERO, time), 0);
    }

    let mut color = Color::ZERO;
    for _ in 0..samples {
        let jitter = Vec2::new(rng.gen::<f32>() - 0.5, rng.gen::<f32>() - 0.5);
        color += tracer.raytrace(&camera.primary_ray(i, j, jitter, time), 0);
    }
    color / samples as f32
}

/// Render every pixel of `span` for an image `height` rows tall.
pub fn render_span(
    span: &ColumnSpan,
    height: u32,
    tracer: &Tracer,
    camera: &FrameCamera,
    samples: u32,
    time: f32,
    rng: &mut dyn RngCore,
) -> SpanResult {
    let mut pixels = Vec::with_capacity((span.width() * height) as usize);

    for i in span.columns.clone() {
        for j in 0..height {
            pixels.push(render_pixel(tracer, camera, i, j, samples, time, rng));
        }
    }

    SpanResult {
        span: span.clone(),
        pixels,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_covers(spans: &[ColumnSpan], width: u32) {
        let mut next = 0;
        for span in spans {
            assert_eq!(span.columns.start, next, "gap or overlap before span {}", span.index);
            next = span.columns.end;
        }
        assert_eq!(next, width);
    }

    #[test]
    fn test_partition_exact() {
        let spans = partition_columns(64, 4);
        assert_eq!(spans.len(), 4);
        assert!(spans.iter().all(|s| s.width() == 16));
        assert_covers(&spans, 64);
    }

    #[test]
    fn test_partition_remainder_goes_last() {
        let spans = partition_columns(100, 16);
        assert_eq!(spans.len(), 16);
        assert_eq!(spans[15].width(), 100 - 15 * 6);
        assert_covers(&spans, 100);
    }

    #[test]
    fn test_partition_more_parts_than_columns() {
        let spans = partition_columns(3, 16);
        assert_eq!(spans.len(), 3);
        assert_covers(&spans, 3);
    }

    #[test]
    fn test_partition_wide_not_tall() {
        // Last span must end at the width even when height differs
        let spans = partition_columns(37, 5);
        assert_covers(&spans, 37);
    }

    #[test]
    fn test_span_result_write() {
        let mut image = ImageBuffer::new(4, 2);
        let result = SpanResult {
            span: ColumnSpan::new(1..3, 0),
            pixels: vec![Color::X, Color::Y, Color::Z, Color::ONE],
        };
        result.write_to(&mut image);

        assert_eq!(image.get(1, 0), Color::X);
        assert_eq!(image.get(1, 1), Color::Y);
        assert_eq!(image.get(2, 0), Color::Z);
        assert_eq!(image.get(2, 1), Color::ONE);
        assert_eq!(image.get(0, 0), Color::ZERO);
        assert_eq!(image.get(3, 1), Color::ZERO);
    }
}
