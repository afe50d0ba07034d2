use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::LevelFilter;

/// Log levels selectable from the command line
#[derive(Debug, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Built-in demo scenes
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SceneKind {
    /// A single lit sphere
    Sphere,
    /// Two spheres, one shadowing the other
    Shadows,
    /// Facing mirror spheres over a box floor
    Mirrors,
    /// Falling particles with animated lights
    Particles,
    /// An OBJ mesh given by --mesh
    Mesh,
}

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "lumen")]
#[command(about = "An offline Phong ray tracer for animated scenes")]
pub struct Args {
    /// Built-in scene to render
    #[arg(long, value_enum, default_value = "mirrors")]
    pub scene: SceneKind,

    /// JSON render config; flags below override its values
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Image width in pixels
    #[arg(long)]
    pub width: Option<u32>,

    /// Image height in pixels
    #[arg(long)]
    pub height: Option<u32>,

    /// Jittered samples per pixel
    #[arg(long, short = 's')]
    pub samples: Option<u32>,

    /// First frame to render
    #[arg(long)]
    pub start_frame: Option<i32>,

    /// Number of frames to render
    #[arg(long, short = 'n')]
    pub frames: Option<u32>,

    /// Output path without frame suffix or extension
    #[arg(short, long)]
    pub output: Option<String>,

    /// Worker thread limit
    #[arg(long)]
    pub threads: Option<usize>,

    /// Seed for jitter and particle spawning
    #[arg(long)]
    pub seed: Option<u64>,

    /// OBJ file for the mesh scene
    #[arg(long)]
    pub mesh: Option<PathBuf>,

    /// Ripple the mesh with the "waves" displacement
    #[arg(long)]
    pub waves: bool,

    /// PNG texture for the floor of the mirrors scene
    #[arg(long)]
    pub texture: Option<PathBuf>,

    /// Set the logging level
    #[arg(long, value_enum, default_value = "info")]
    pub log_level: LogLevel,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["lumen"]);
        assert_eq!(args.scene, SceneKind::Mirrors);
        assert!(args.width.is_none());
        assert!(!args.waves);
    }

    #[test]
    fn test_overrides() {
        let args = Args::parse_from([
            "lumen", "--scene", "particles", "--width", "64", "-n", "10", "--log-level", "debug",
        ]);
        assert_eq!(args.scene, SceneKind::Particles);
        assert_eq!(args.width, Some(64));
        assert_eq!(args.frames, Some(10));
        assert_eq!(LevelFilter::from(args.log_level), LevelFilter::Debug);
    }
}
