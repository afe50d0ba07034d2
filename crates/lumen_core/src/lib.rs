//! Lumen Core - scene description for the Lumen ray tracer.
//!
//! This crate provides the renderer-agnostic data a frame is built from:
//!
//! - **Scene graph**: `SceneNode` tree with local transforms and animations
//! - **Geometry**: `Primitive` shapes, OBJ-loaded `Mesh`es, `ParticleSystem`s
//! - **Shading inputs**: Phong `Material`s, `Texture`s, point `Light`s, `Camera`
//! - **Images**: `ImageBuffer` float RGB storage with PNG load/save
//!
//! # Example
//!
//! ```ignore
//! use lumen_core::{Camera, Material, PhongMaterial, Primitive, Scene, SceneNode};
//!
//! let mut root = SceneNode::new("root");
//! root.add_child(SceneNode::geometry(
//!     "ball",
//!     Primitive::sphere(),
//!     Material::from(PhongMaterial::matte(Vec3::new(0.8, 0.2, 0.2))),
//! ));
//! let scene = Scene::new(root, Camera::default());
//! ```

pub mod animation;
pub mod camera;
pub mod framebuffer;
pub mod light;
pub mod material;
pub mod mesh;
pub mod particles;
pub mod primitive;
pub mod scene;
pub mod texture;

// Re-export commonly used types
pub use animation::{Animation, AnimationKind, Evaluator};
pub use camera::Camera;
pub use framebuffer::{ImageBuffer, ImageError, ImageResult};
pub use light::Light;
pub use material::{Color, Material, PhongMaterial, PhongTexture};
pub use mesh::{Mesh, MeshError, MeshResult};
pub use particles::{ParticleAxis, ParticleSettings, ParticleSystem};
pub use primitive::{LinearMotion, Primitive, Shape};
pub use scene::{apply_animation, NodeKind, Scene, SceneNode};
pub use texture::Texture;
