use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

mod cli;
mod logger;
mod scenes;

use cli::Args;
use logger::init_logger;
use lumen_renderer::{RenderConfig, Renderer};
use scenes::SceneOptions;

/// Config file values with command line overrides applied.
fn resolve_config(args: &Args) -> Result<RenderConfig> {
    let mut config = match &args.config {
        Some(path) => RenderConfig::from_json_file(path)
            .with_context(|| format!("failed to read render config {}", path.display()))?,
        None => RenderConfig::default(),
    };

    if let Some(width) = args.width {
        config.width = width;
    }
    if let Some(height) = args.height {
        config.height = height;
    }
    if let Some(samples) = args.samples {
        config.samples_per_pixel = samples;
    }
    if let Some(start) = args.start_frame {
        config.start_frame = start;
    }
    if let Some(frames) = args.frames {
        config.num_frames = frames;
    }
    if let Some(output) = &args.output {
        config.output = output.clone();
    }
    if let Some(threads) = args.threads {
        config.max_threads = threads;
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(args.log_level.clone().into());

    let config = resolve_config(&args)?;
    let renderer = Renderer::new(config).context("invalid render settings")?;

    let options = SceneOptions {
        mesh: args.mesh.as_deref(),
        waves: args.waves,
        texture: args.texture.as_deref(),
    };
    let mut scene = scenes::build(args.scene, &options)?;

    info!(
        "Scene {:?}: {} nodes, {} lights, root {}",
        args.scene,
        scene.node_count(),
        scene.lights.len(),
        scene.root
    );
    for light in &scene.lights {
        info!("  {}", light);
    }

    let start = Instant::now();
    let summary = renderer.render_animation(&mut scene);

    info!(
        "Rendered {} frames in {:.2?} (render time {:.2?})",
        summary.frames.len(),
        start.elapsed(),
        summary.total_render_time()
    );

    let failed: Vec<i32> = summary.failed().collect();
    if !failed.is_empty() {
        anyhow::bail!("failed to save frames {:?}", failed);
    }
    Ok(())
}
