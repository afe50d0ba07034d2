//! Simple render example.
//!
//! Renders one frame of a small scene (a mirror sphere and a matte sphere
//! over a box floor) and saves it as PNG.

use lumen_core::{Camera, Light, Material, PhongMaterial, Primitive, Scene, SceneNode};
use lumen_renderer::{Color, RenderConfig, Renderer, Vec3};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("Lumen Ray Tracer - Simple Example");
    println!("=================================");

    let start = std::time::Instant::now();
    let scene = build_scene();
    println!("Scene built in {:?} ({} nodes)", start.elapsed(), scene.node_count());

    let config = RenderConfig {
        width: 320,
        height: 240,
        samples_per_pixel: 4,
        output: "simple_render".to_string(),
        ..Default::default()
    };

    let renderer = match Renderer::new(config) {
        Ok(renderer) => renderer,
        Err(e) => {
            eprintln!("Failed to set up renderer: {}", e);
            std::process::exit(1);
        }
    };

    println!(
        "Rendering {}x{} @ {} spp on {} threads...",
        renderer.config().width,
        renderer.config().height,
        renderer.config().samples_per_pixel,
        renderer.thread_count()
    );

    let start = std::time::Instant::now();
    let image = renderer.render_frame(&scene, 0);
    println!("Rendered in {:?}", start.elapsed());

    let path = renderer.config().frame_path(0);
    match image.save_png(&path) {
        Ok(()) => println!("Saved to {}", path.display()),
        Err(e) => eprintln!("Failed to save {}: {}", path.display(), e),
    }
}

fn build_scene() -> Scene {
    let mut root = SceneNode::new("root");

    let floor = Material::from(PhongMaterial::new(
        Color::new(0.4, 0.4, 0.45),
        Color::splat(0.1),
        Color::ZERO,
        10.0,
    ));
    root.add_child(SceneNode::geometry(
        "floor",
        Primitive::nonhier_box(Vec3::new(-6.0, -2.0, -6.0), Vec3::new(12.0, 1.0, 12.0)),
        floor,
    ));

    let chrome = Material::from(PhongMaterial::new(
        Color::splat(0.1),
        Color::splat(0.8),
        Color::splat(0.7),
        80.0,
    ));
    let mut mirror = SceneNode::geometry("mirror", Primitive::sphere(), chrome);
    mirror.translate(Vec3::new(-1.2, 0.0, 0.0));
    root.add_child(mirror);

    let clay = Material::from(PhongMaterial::new(
        Color::new(0.8, 0.3, 0.2),
        Color::splat(0.3),
        Color::ZERO,
        25.0,
    ));
    let mut ball = SceneNode::geometry("ball", Primitive::sphere(), clay);
    ball.scale(Vec3::splat(0.6));
    ball.translate(Vec3::new(1.3, -0.4, 0.5));
    root.add_child(ball);

    let camera = Camera::new(Vec3::new(0.0, 1.5, 8.0), Vec3::new(0.0, -0.3, 0.0), Vec3::Y, 40.0);

    Scene::new(root, camera)
        .with_ambient(Color::splat(0.15))
        .with_light(Light::new(Color::splat(0.9), Vec3::new(-4.0, 6.0, 6.0)))
        .with_light(Light::new(Color::new(0.3, 0.3, 0.4), Vec3::new(5.0, 3.0, 2.0)))
}
