//! Built-in demo scenes.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use lumen_core::{
    Animation, Camera, Color, Light, LinearMotion, Material, Mesh, ParticleAxis, ParticleSettings,
    ParticleSystem, PhongMaterial, PhongTexture, Primitive, Scene, SceneNode, Texture,
};
use lumen_math::Vec3;

use crate::cli::SceneKind;

/// Options some scenes read from the command line.
#[derive(Debug, Default)]
pub struct SceneOptions<'a> {
    pub mesh: Option<&'a Path>,
    pub waves: bool,
    pub texture: Option<&'a Path>,
}

pub fn build(kind: SceneKind, options: &SceneOptions) -> Result<Scene> {
    match kind {
        SceneKind::Sphere => Ok(sphere()),
        SceneKind::Shadows => Ok(shadows()),
        SceneKind::Mirrors => mirrors(options.texture),
        SceneKind::Particles => Ok(particles()),
        SceneKind::Mesh => {
            let path = options
                .mesh
                .context("the mesh scene needs an OBJ file (--mesh <path>)")?;
            mesh(path, options.waves)
        }
    }
}

fn phong(kd: Color, ks: Color, kr: Color, shininess: f32) -> Material {
    PhongMaterial::new(kd, ks, kr, shininess).into()
}

fn front_camera() -> Camera {
    Camera::new(Vec3::new(0.0, 0.0, 10.0), Vec3::ZERO, Vec3::Y, 40.0)
}

fn sphere() -> Scene {
    let ball = SceneNode::geometry(
        "ball",
        Primitive::sphere(),
        phong(Color::new(0.7, 0.2, 0.2), Color::splat(0.5), Color::ZERO, 25.0),
    );

    Scene::new(SceneNode::new("root").with_child(ball), front_camera())
        .with_ambient(Color::splat(0.2))
        .with_light(Light::new(Color::splat(0.9), Vec3::new(4.0, 4.0, 8.0)))
}

fn shadows() -> Scene {
    let matte = Arc::new(phong(Color::new(0.3, 0.6, 0.8), Color::splat(0.2), Color::ZERO, 10.0));

    let mut low = SceneNode::geometry("low", Primitive::sphere(), matte.clone());
    low.translate(Vec3::new(0.0, -1.5, 0.0));

    let mut high = SceneNode::geometry("high", Primitive::sphere(), matte);
    high.scale(Vec3::splat(0.6));
    high.translate(Vec3::new(1.0, 1.0, 1.0));

    let root = SceneNode::new("root").with_child(low).with_child(high);
    Scene::new(root, front_camera())
        .with_ambient(Color::splat(0.15))
        .with_light(Light::new(Color::ONE, Vec3::new(4.0, 8.0, 4.0)))
}

fn mirrors(texture: Option<&Path>) -> Result<Scene> {
    let floor_base = PhongMaterial::new(Color::new(0.5, 0.5, 0.55), Color::splat(0.1), Color::ZERO, 10.0);
    let floor: Material = match texture {
        Some(path) => {
            let texture = Texture::load(path)
                .with_context(|| format!("failed to load texture {}", path.display()))?;
            PhongTexture::new(PhongMaterial { kd: Color::ONE, ..floor_base }, Arc::new(texture)).into()
        }
        None => floor_base.into(),
    };

    let chrome = Arc::new(phong(Color::splat(0.05), Color::splat(0.8), Color::splat(0.85), 100.0));

    let mut root = SceneNode::new("root");
    root.add_child(SceneNode::geometry(
        "floor",
        Primitive::nonhier_box(Vec3::new(-8.0, -3.0, -8.0), Vec3::new(16.0, 1.0, 16.0)),
        floor,
    ));

    let mut left = SceneNode::geometry("left", Primitive::sphere(), chrome.clone());
    left.scale(Vec3::splat(1.5));
    left.translate(Vec3::new(-2.2, -0.5, 0.0));
    root.add_child(left);

    let mut right = SceneNode::geometry("right", Primitive::sphere(), chrome);
    right.scale(Vec3::splat(1.5));
    right.translate(Vec3::new(2.2, -0.5, 0.0));
    root.add_child(right);

    let mut spinner = SceneNode::new("spinner");
    spinner.add_animation(Animation::new(0.0, 240.0, 'r', "spin"));
    let mut cube = SceneNode::geometry(
        "cube",
        Primitive::cube(),
        phong(Color::new(0.9, 0.7, 0.1), Color::splat(0.4), Color::ZERO, 30.0),
    );
    cube.translate(Vec3::new(-0.5, -2.0, -0.5));
    cube.scale(Vec3::splat(0.8));
    spinner.add_child(cube);
    root.add_child(spinner);

    let camera = Camera::new(Vec3::new(0.0, 1.0, 12.0), Vec3::new(0.0, -0.5, 0.0), Vec3::Y, 45.0);
    Ok(Scene::new(root, camera)
        .with_ambient(Color::splat(0.15))
        .with_light(Light::new(Color::splat(0.9), Vec3::new(-5.0, 8.0, 8.0)))
        .with_light(Light::new(Color::new(0.3, 0.3, 0.5), Vec3::new(6.0, 2.0, 4.0))))
}

fn particles() -> Scene {
    let water = Arc::new(phong(Color::new(0.2, 0.4, 0.9), Color::splat(0.6), Color::splat(0.2), 50.0));
    let rain = ParticleSystem::new(
        ParticleSettings {
            position: Vec3::new(-4.0, 5.0, -4.0),
            area: 8.0,
            spawn_rate: 4,
            radius: 0.15,
            lifespan: 30.0,
            axis: ParticleAxis::Y,
            speed: -0.3,
        },
        water,
    );

    let mut root = SceneNode::new("root");
    root.add_child(SceneNode::particles("rain", rain));
    root.add_child(SceneNode::geometry(
        "ground",
        Primitive::nonhier_box(Vec3::new(-6.0, -5.0, -6.0), Vec3::new(12.0, 1.0, 12.0)),
        phong(Color::new(0.4, 0.5, 0.3), Color::ZERO, Color::ZERO, 1.0),
    ));

    let puck = Primitive::nonhier_sphere(Vec3::new(-3.0, -3.5, 0.0), 0.5)
        .with_motion(LinearMotion::new(0, 60, Vec3::new(6.0, 0.0, 0.0)));
    root.add_child(SceneNode::geometry(
        "puck",
        puck,
        phong(Color::new(0.8, 0.1, 0.1), Color::splat(0.5), Color::ZERO, 40.0),
    ));

    let camera = Camera::new(Vec3::new(0.0, 0.0, 14.0), Vec3::new(0.0, -1.0, 0.0), Vec3::Y, 50.0)
        .with_eye_animation(Animation::new(30.0, 60.0, 't', "left2"));

    Scene::new(root, camera)
        .with_ambient(Color::splat(0.2))
        .with_light(
            Light::new(Color::splat(0.8), Vec3::new(-4.0, 10.0, 6.0))
                .with_animation(Animation::new(0.0, 60.0, 't', "down")),
        )
        .with_light(
            Light::new(Color::splat(0.4), Vec3::new(4.0, -10.0, 6.0))
                .with_animation(Animation::new(0.0, 60.0, 't', "up")),
        )
}

fn mesh(path: &Path, waves: bool) -> Result<Scene> {
    let mesh = Mesh::load_obj(path).with_context(|| format!("failed to load mesh {}", path.display()))?;

    let bounds = *mesh.bounds();
    let center = bounds.centroid();
    let radius = (bounds.extent().length() * 0.5).max(1e-3);

    let mut primitive = Primitive::mesh(Arc::new(mesh));
    if waves {
        primitive = primitive.with_displacement(Animation::new(0.0, 300.0, 'd', "waves"));
    }

    let mut node = SceneNode::geometry(
        "mesh",
        primitive,
        phong(Color::new(0.6, 0.6, 0.7), Color::splat(0.4), Color::ZERO, 30.0),
    );
    node.translate(-center);
    node.scale(Vec3::splat(3.0 / radius));

    let camera = Camera::new(Vec3::new(0.0, 2.0, 12.0), Vec3::ZERO, Vec3::Y, 40.0);
    Ok(Scene::new(SceneNode::new("root").with_child(node), camera)
        .with_ambient(Color::splat(0.2))
        .with_light(Light::new(Color::splat(0.9), Vec3::new(5.0, 10.0, 10.0))))
}
