//! CPU side triangle mesh.
//!
//! Builders in [`primitives`](super::primitives) and
//! [`composite`](super::composite) produce a `Mesh`, edit it in place and
//! concatenate meshes with [`Mesh::push_back`]. Normals are derived from the
//! connectivity when needed so they never fall out of sync with the positions.

use cgmath::{InnerSpace, Matrix4, Vector2, Vector3, Zero};

use crate::data_structures::transform;
use crate::error::MeshError;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vector3<f32>>,
    pub uvs: Vec<Vector2<f32>>,
    pub triangles: Vec<[u32; 3]>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a mesh and checks it with [`Mesh::validate`].
    pub fn from_parts(
        positions: Vec<Vector3<f32>>,
        uvs: Vec<Vector2<f32>>,
        triangles: Vec<[u32; 3]>,
    ) -> Result<Self, MeshError> {
        let mesh = Self {
            positions,
            uvs,
            triangles,
        };
        mesh.validate()?;
        Ok(mesh)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn validate(&self) -> Result<(), MeshError> {
        if self.positions.len() != self.uvs.len() {
            return Err(MeshError::UvMismatch {
                positions: self.positions.len(),
                uvs: self.uvs.len(),
            });
        }
        let count = self.positions.len();
        for (triangle, indices) in self.triangles.iter().enumerate() {
            if let Some(index) = indices.iter().find(|i| **i as usize >= count) {
                return Err(MeshError::IndexOutOfRange {
                    triangle,
                    index: *index,
                    count,
                });
            }
        }
        Ok(())
    }

    /// Appends `other`, shifting its indices past the current positions.
    ///
    /// Fails without touching `self` when a shifted index leaves the `u32` range.
    pub fn push_back(&mut self, other: &Mesh) -> Result<&mut Self, MeshError> {
        let total = self.positions.len() + other.positions.len();
        index_count(total)?;
        let offset = index_count(self.positions.len())?;
        let shifted = other
            .triangles
            .iter()
            .map(|t| {
                let [a, b, c] = t.map(|i| i.checked_add(offset));
                Some([a?, b?, c?])
            })
            .collect::<Option<Vec<_>>>()
            .ok_or(MeshError::TooManyVertices { count: total })?;

        self.positions.extend_from_slice(&other.positions);
        self.uvs.extend_from_slice(&other.uvs);
        self.triangles.extend(shifted);
        Ok(self)
    }

    pub fn translate(&mut self, offset: Vector3<f32>) -> &mut Self {
        for p in &mut self.positions {
            *p += offset;
        }
        self
    }

    /// Per axis scaling about the origin.
    pub fn scale(&mut self, factors: Vector3<f32>) -> &mut Self {
        for p in &mut self.positions {
            p.x *= factors.x;
            p.y *= factors.y;
            p.z *= factors.z;
        }
        self
    }

    pub fn rotate(&mut self, axis: Vector3<f32>, angle: f32) -> &mut Self {
        let rotation = transform::rotation(axis, angle);
        for p in &mut self.positions {
            *p = rotation * *p;
        }
        self
    }

    /// Maps every position through an affine matrix.
    pub fn apply_transform(&mut self, matrix: Matrix4<f32>) -> &mut Self {
        for p in &mut self.positions {
            *p = (matrix * p.extend(1.0)).truncate();
        }
        self
    }

    /// Area weighted vertex normals.
    ///
    /// Vertices that only touch degenerate triangles, or no triangle at all,
    /// get `+z`.
    pub fn normals(&self) -> Vec<Vector3<f32>> {
        let mut normals = vec![Vector3::zero(); self.positions.len()];
        for [a, b, c] in &self.triangles {
            let (a, b, c) = (*a as usize, *b as usize, *c as usize);
            let (Some(p0), Some(p1), Some(p2)) = (
                self.positions.get(a),
                self.positions.get(b),
                self.positions.get(c),
            ) else {
                continue;
            };
            let face = (p1 - p0).cross(p2 - p0);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        normals
            .into_iter()
            .map(|n| {
                if n.magnitude2() > f32::EPSILON * f32::EPSILON {
                    n.normalize()
                } else {
                    Vector3::unit_z()
                }
            })
            .collect()
    }

    /// One flat color per vertex.
    pub fn colors(&self, color: Vector3<f32>) -> Vec<Vector3<f32>> {
        vec![color; self.positions.len()]
    }
}

/// `count` as a 32 bit index, if every vertex below it is addressable.
pub(crate) fn index_count(count: usize) -> Result<u32, MeshError> {
    u32::try_from(count).map_err(|_| MeshError::TooManyVertices { count })
}
