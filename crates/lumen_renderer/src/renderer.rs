//! Frame and animation rendering.
//!
//! A frame is rendered from a posed snapshot of the scene: particle systems
//! are advanced on the live scene, then node and light animations are
//! applied to a copy that the workers read. The live scene's transforms are
//! never modified, so there is nothing to revert after a frame.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use lumen_core::{ImageBuffer, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::FrameCamera;
use crate::span::{partition_columns, render_span, SpanResult};
use crate::tracer::Tracer;

/// Errors that can occur while setting up a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse render config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid render config: {0}")]
    InvalidConfig(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Render configuration.
///
/// Every field has a default, so a config file only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Jittered samples averaged per pixel
    pub samples_per_pixel: u32,
    /// Maximum reflection recursion depth
    pub max_depth: u32,
    /// Upper bound on worker threads, further capped by available cores
    pub max_threads: usize,
    /// Offset along the normal applied to every hit point
    pub fudge_factor: f32,
    /// First frame to render
    pub start_frame: i32,
    /// Number of frames to render
    pub num_frames: u32,
    /// Output path without the frame suffix and extension
    pub output: String,
    /// Seed for pixel jitter and particle spawning; random when absent
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 256,
            height: 256,
            samples_per_pixel: 8,
            max_depth: 5,
            max_threads: 16,
            fudge_factor: 0.25,
            start_frame: 0,
            num_frames: 1,
            output: "render".to_string(),
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Load a (possibly partial) config from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> RenderResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Reject configurations that cannot produce an image.
    pub fn validate(&self) -> RenderResult<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.samples_per_pixel == 0 {
            return Err(RenderError::InvalidConfig(
                "samples_per_pixel must be at least 1".to_string(),
            ));
        }
        if self.max_threads == 0 {
            return Err(RenderError::InvalidConfig(
                "max_threads must be at least 1".to_string(),
            ));
        }
        if self.end_frame().is_none() {
            return Err(RenderError::InvalidConfig(format!(
                "{} frames from frame {} run past the last representable frame",
                self.num_frames, self.start_frame
            )));
        }
        Ok(())
    }

    /// One past the last frame, if it fits in an `i32`.
    fn end_frame(&self) -> Option<i32> {
        i32::try_from(self.num_frames)
            .ok()
            .and_then(|n| self.start_frame.checked_add(n))
    }

    /// Worker count: `max_threads` capped by the available cores.
    pub fn thread_count(&self) -> usize {
        let available = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        self.max_threads.min(available).max(1)
    }

    /// Frames this config renders, in order.
    ///
    /// Ranges that overflow are cut at `i32::MAX`; `validate` rejects them.
    pub fn frames(&self) -> std::ops::Range<i32> {
        self.start_frame..self.end_frame().unwrap_or(i32::MAX)
    }

    /// Output path for `frame`.
    pub fn frame_path(&self, frame: i32) -> PathBuf {
        PathBuf::from(frame_file_name(
            &self.output,
            frame,
            self.start_frame,
            self.num_frames,
        ))
    }
}

/// Output file name for `frame`.
///
/// A zero-padded four digit frame suffix is added whenever more than one frame
/// is rendered or the range does not start at frame 0.
pub fn frame_file_name(base: &str, frame: i32, start_frame: i32, num_frames: u32) -> String {
    if num_frames > 1 || start_frame != 0 {
        format!("{}_{:04}.png", base, frame)
    } else {
        format!("{}.png", base)
    }
}

/// Outcome of one frame of an animation render.
#[derive(Debug, Clone)]
pub struct FrameReport {
    pub frame: i32,
    pub path: PathBuf,
    /// Wall time spent rendering (excluding the save)
    pub render_time: Duration,
    pub saved: bool,
}

/// Outcome of [`Renderer::render_animation`].
#[derive(Debug, Clone, Default)]
pub struct RenderSummary {
    pub frames: Vec<FrameReport>,
}

impl RenderSummary {
    /// Paths of frames written successfully.
    pub fn written(&self) -> impl Iterator<Item = &Path> {
        self.frames.iter().filter(|f| f.saved).map(|f| f.path.as_path())
    }

    /// Frames whose image could not be saved.
    pub fn failed(&self) -> impl Iterator<Item = i32> + '_ {
        self.frames.iter().filter(|f| !f.saved).map(|f| f.frame)
    }

    pub fn total_render_time(&self) -> Duration {
        self.frames.iter().map(|f| f.render_time).sum()
    }
}

/// Multi-threaded frame renderer with a bounded worker pool.
pub struct Renderer {
    config: RenderConfig,
    pool: rayon::ThreadPool,
    threads: usize,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> RenderResult<Self> {
        config.validate()?;
        let threads = config.thread_count();
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("lumen-render-{}", i))
            .build()?;

        Ok(Self {
            config,
            pool,
            threads,
        })
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn thread_count(&self) -> usize {
        self.threads
    }

    fn rng(&self, stream: u64) -> StdRng {
        match self.config.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(stream)),
            None => StdRng::from_entropy(),
        }
    }

    /// Render `scene` as it appears at `frame`.
    ///
    /// Particle systems are not advanced here; the animation loop does that
    /// before each frame.
    pub fn render_frame(&self, scene: &Scene, frame: i32) -> ImageBuffer {
        let t = frame as f32;
        let width = self.config.width;
        let height = self.config.height;

        let posed = scene.posed(t);
        let camera = FrameCamera::new(&posed.camera, t, width, height);
        let tracer = Tracer::new(&posed, camera.eye, self.config.max_depth, self.config.fudge_factor);
        let spans = partition_columns(width, self.threads);
        let samples = self.config.samples_per_pixel;

        let results: Vec<SpanResult> = self.pool.install(|| {
            spans
                .par_iter()
                .map(|span| {
                    let mut rng = self.rng(((frame as u64) << 32) | span.index as u64);
                    let result = render_span(span, height, &tracer, &camera, samples, t, &mut rng);
                    log::debug!(
                        "Frame {}: columns {}..{} done",
                        frame,
                        span.columns.start,
                        span.columns.end
                    );
                    result
                })
                .collect()
        });

        let mut image = ImageBuffer::new(width, height);
        for result in &results {
            result.write_to(&mut image);
        }
        image
    }

    /// Render every configured frame, saving each one as it completes.
    ///
    /// A frame that fails to save is logged and recorded in the summary; the
    /// remaining frames still render.
    pub fn render_animation(&self, scene: &mut Scene) -> RenderSummary {
        let mut summary = RenderSummary::default();
        let mut particle_rng = self.rng(u64::MAX);

        for frame in self.config.frames() {
            log::info!(
                "Rendering frame {} ({}x{}, {} threads)",
                frame,
                self.config.width,
                self.config.height,
                self.threads
            );
            let start = Instant::now();

            scene.advance_particles(frame, &mut particle_rng);
            let image = self.render_frame(scene, frame);
            let render_time = start.elapsed();

            let path = self.config.frame_path(frame);
            let saved = match image.save_png(&path) {
                Ok(()) => {
                    log::info!(
                        "Frame {} done in {:.2?}, saved {}",
                        frame,
                        render_time,
                        path.display()
                    );
                    true
                }
                Err(e) => {
                    log::error!("Failed to save frame {} to {}: {}", frame, path.display(), e);
                    false
                }
            };

            summary.frames.push(FrameReport {
                frame,
                path,
                render_time,
                saved,
            });
        }

        summary
    }
}
