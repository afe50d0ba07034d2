//! Triangle mesh geometry.
//!
//! A mesh is a shared vertex list plus triangles indexing into it. Meshes are
//! loaded once at scene-build time and shared between primitives through `Arc`.

use std::path::{Path, PathBuf};

use lumen_math::{Aabb, Vec3};
use thiserror::Error;

/// Errors that can occur while building or loading a mesh.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ file {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("Face {face} references vertex {index}, but the mesh has {count} vertices")]
    IndexOutOfRange { face: usize, index: u32, count: usize },

    #[error("Mesh has no triangles")]
    Empty,
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions and triangle indices.
#[derive(Clone, Debug)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    positions: Vec<Vec3>,

    /// Triangles as triples of vertex indices
    triangles: Vec<[u32; 3]>,

    /// Axis-aligned bounding box of all vertices
    bounds: Aabb,
}

impl Mesh {
    /// Create a mesh, checking that every face index refers to a vertex.
    pub fn new(positions: Vec<Vec3>, triangles: Vec<[u32; 3]>) -> MeshResult<Self> {
        if triangles.is_empty() {
            return Err(MeshError::Empty);
        }

        for (face, tri) in triangles.iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= positions.len()) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    count: positions.len(),
                });
            }
        }

        let bounds = Aabb::enclosing(&positions);
        Ok(Self {
            positions,
            triangles,
            bounds,
        })
    }

    /// Load every model of an OBJ file into one mesh.
    ///
    /// Polygons are triangulated; normals, texture coordinates and materials
    /// in the file are ignored.
    pub fn load_obj(path: impl AsRef<Path>) -> MeshResult<Self> {
        let path = path.as_ref();
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|source| MeshError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let mut positions = Vec::new();
        let mut triangles = Vec::new();

        for model in &models {
            let offset = positions.len() as u32;
            positions.extend(
                model
                    .mesh
                    .positions
                    .chunks_exact(3)
                    .map(|p| Vec3::new(p[0], p[1], p[2])),
            );
            triangles.extend(
                model
                    .mesh
                    .indices
                    .chunks_exact(3)
                    .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
            );
        }

        let mesh = Self::new(positions, triangles)?;
        log::info!(
            "Loaded mesh {} ({} models, {} vertices, {} triangles)",
            path.display(),
            models.len(),
            mesh.vertex_count(),
            mesh.triangle_count()
        );
        Ok(mesh)
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    /// The three vertices of triangle `i`.
    pub fn triangle(&self, i: usize) -> [Vec3; 3] {
        let [a, b, c] = self.triangles[i];
        [
            self.positions[a as usize],
            self.positions[b as usize],
            self.positions[c as usize],
        ]
    }

    /// Iterate over triangle vertex triples.
    pub fn triangle_vertices(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        (0..self.triangles.len()).map(|i| self.triangle(i))
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn bounds(&self) -> &Aabb {
        &self.bounds
    }

    /// Cube anchored at the minimum corner whose side is the largest extent.
    ///
    /// Used as the pruning volume for undisplaced meshes.
    pub fn bounding_cube(&self) -> Aabb {
        let min = self.bounds.min();
        let side = self.bounds.extent().max_element();
        Aabb::from_points(min, min + Vec3::splat(side))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> Mesh {
        Mesh::new(
            vec![
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 0.0),
                Vec3::new(2.0, 0.0, 2.0),
                Vec3::new(0.0, 0.0, 2.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
        .unwrap()
    }

    #[test]
    fn test_mesh_counts_and_bounds() {
        let mesh = quad();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        assert_eq!(mesh.bounds().min(), Vec3::ZERO);
        assert_eq!(mesh.bounds().max(), Vec3::new(2.0, 0.0, 2.0));
    }

    #[test]
    fn test_triangle_lookup() {
        let mesh = quad();
        let [a, b, c] = mesh.triangle(1);
        assert_eq!(a, Vec3::ZERO);
        assert_eq!(b, Vec3::new(2.0, 0.0, 2.0));
        assert_eq!(c, Vec3::new(0.0, 0.0, 2.0));
        assert_eq!(mesh.triangle_vertices().count(), 2);
    }

    #[test]
    fn test_bounding_cube_covers_flat_mesh() {
        let cube = quad().bounding_cube();
        assert_eq!(cube.min(), Vec3::ZERO);
        assert_eq!(cube.max(), Vec3::splat(2.0));
    }

    #[test]
    fn test_out_of_range_index_rejected() {
        let result = Mesh::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], vec![[0, 1, 3]]);
        assert!(matches!(
            result,
            Err(MeshError::IndexOutOfRange {
                face: 0,
                index: 3,
                count: 3
            })
        ));
    }

    #[test]
    fn test_empty_mesh_rejected() {
        assert!(matches!(
            Mesh::new(vec![Vec3::ZERO], Vec::new()),
            Err(MeshError::Empty)
        ));
    }

    #[test]
    fn test_load_obj() {
        let dir = std::env::temp_dir().join(format!("lumen_mesh_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("quad.obj");
        std::fs::write(
            &path,
            "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n",
        )
        .unwrap();

        let mesh = Mesh::load_obj(&path).unwrap();
        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_obj_fails() {
        assert!(matches!(
            Mesh::load_obj("/no/such/mesh.obj"),
            Err(MeshError::Obj { .. })
        ));
    }
}
