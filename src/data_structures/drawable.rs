//! Mesh plus material, the unit a renderer draws.

use cgmath::Vector3;

use crate::data_structures::mesh::Mesh;
use crate::error::MeshError;

/// Surface description handed to the renderer next to the geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct Material {
    /// Texture asset path, relative to the asset root.
    pub texture: Option<String>,
    pub color: Vector3<f32>,
    /// Name of a custom shader, the renderer's default shader when absent.
    pub shader: Option<String>,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            texture: None,
            color: Vector3::new(1.0, 1.0, 1.0),
            shader: None,
        }
    }
}

impl Material {
    pub fn textured(texture: impl Into<String>) -> Self {
        Self {
            texture: Some(texture.into()),
            ..Self::default()
        }
    }

    pub fn with_color(mut self, color: Vector3<f32>) -> Self {
        self.color = color;
        self
    }

    pub fn with_shader(mut self, shader: impl Into<String>) -> Self {
        self.shader = Some(shader.into());
        self
    }
}

/**
 * A finished mesh ready for upload.
 *
 * Construction validates the mesh and fills the per vertex normals in one
 * step, so a drawable never carries partially derived data.
 */
#[derive(Clone, Debug, PartialEq)]
pub struct Drawable {
    label: String,
    mesh: Mesh,
    normals: Vec<Vector3<f32>>,
    pub material: Material,
}

impl Drawable {
    pub fn new(label: impl Into<String>, mesh: Mesh, material: Material) -> Result<Self, MeshError> {
        mesh.validate()?;
        let normals = mesh.normals();
        Ok(Self {
            label: label.into(),
            mesh,
            normals,
            material,
        })
    }

    /// Drawable without geometry, used for grouping nodes.
    pub fn empty(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            mesh: Mesh::new(),
            normals: Vec::new(),
            material: Material::default(),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn colors(&self) -> Vec<Vector3<f32>> {
        self.mesh.colors(self.material.color)
    }

    pub fn is_empty(&self) -> bool {
        self.mesh.is_empty()
    }
}
