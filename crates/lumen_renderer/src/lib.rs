//! Lumen Renderer - CPU Phong ray tracing for animated scene graphs.
//!
//! Rays are cast from the camera through every pixel, intersected against the
//! scene tree with per-node transform stacking, and shaded with ambient,
//! diffuse and specular terms, hard shadows and recursive mirror reflection.
//! Frames are split into column spans rendered on a bounded rayon pool.

mod camera;
mod geometry;
mod hittable;
mod particles;
mod primitive;
mod ray;
mod renderer;
mod span;
mod tracer;

pub use camera::{screen_to_world, FrameCamera};
pub use geometry::{
    box_intersect, box_surface, box_uv, sphere_intersect, sphere_normal, sphere_uv, triangle_intersect,
    TriangleHit, BOX_EPSILON,
};
pub use hittable::{Hittable, Intersection, LocalHit};
pub use ray::Ray;
pub use renderer::{
    frame_file_name, FrameReport, RenderConfig, RenderError, RenderResult, RenderSummary, Renderer,
};
pub use span::{partition_columns, render_pixel, render_span, ColumnSpan, SpanResult};
pub use tracer::{background, traverse_scene_graph, Tracer};

/// Re-export common types from lumen_core and lumen_math
pub use lumen_core::Color;
pub use lumen_math::{Vec2, Vec3};
