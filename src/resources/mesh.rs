//! OBJ loading and GPU packing of meshes.

use std::path::Path;

use anyhow::Context as _;
use cgmath::{Vector2, Vector3};
use wgpu::util::DeviceExt;

use crate::data_structures::{drawable::Drawable, mesh::Mesh, transform::InstanceRaw};

/// Types with a fixed vertex buffer layout.
pub trait Vertex {
    fn desc() -> wgpu::VertexBufferLayout<'static>;
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelVertex {
    pub position: [f32; 3],
    pub tex_coords: [f32; 2],
    pub normal: [f32; 3],
    pub tangent: [f32; 3],
    pub bitangent: [f32; 3],
}

impl ModelVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
        0 => Float32x3,
        1 => Float32x2,
        2 => Float32x3,
        3 => Float32x3,
        4 => Float32x3
    ];
}

impl Vertex for ModelVertex {
    fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ModelVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

/**
 * Procedural meshes don't come with tangents and bitangents so they have to be
 * calculated for normal maps to work correctly.
 *
 * Texture coordinates are flipped vertically for the wgpu texture space.
 */
pub fn model_vertices(drawable: &Drawable) -> Vec<ModelVertex> {
    let mesh = drawable.mesh();
    let mut vertices = mesh
        .positions
        .iter()
        .zip(&mesh.uvs)
        .zip(drawable.normals())
        .map(|((p, uv), n)| ModelVertex {
            position: (*p).into(),
            tex_coords: [uv.x, 1.0 - uv.y],
            normal: (*n).into(),
            // We'll calculate these later
            tangent: [0.0; 3],
            bitangent: [0.0; 3],
        })
        .collect::<Vec<_>>();

    let mut triangles_included = vec![0u32; vertices.len()];

    for [a, b, c] in &mesh.triangles {
        let (a, b, c) = (*a as usize, *b as usize, *c as usize);
        let pos0: Vector3<f32> = vertices[a].position.into();
        let pos1: Vector3<f32> = vertices[b].position.into();
        let pos2: Vector3<f32> = vertices[c].position.into();

        let uv0: Vector2<f32> = vertices[a].tex_coords.into();
        let uv1: Vector2<f32> = vertices[b].tex_coords.into();
        let uv2: Vector2<f32> = vertices[c].tex_coords.into();

        let delta_pos1 = pos1 - pos0;
        let delta_pos2 = pos2 - pos0;
        let delta_uv1 = uv1 - uv0;
        let delta_uv2 = uv2 - uv0;

        // Solving
        //     delta_pos1 = delta_uv1.x * T + delta_uv1.y * B
        //     delta_pos2 = delta_uv2.x * T + delta_uv2.y * B
        let det = delta_uv1.x * delta_uv2.y - delta_uv1.y * delta_uv2.x;
        if det.abs() <= f32::EPSILON {
            // collapsed texture mapping, no usable tangent frame
            continue;
        }
        let r = 1.0 / det;
        let tangent = (delta_pos1 * delta_uv2.y - delta_pos2 * delta_uv1.y) * r;
        // We flip the bitangent to enable right-handed normal
        // maps with wgpu texture coordinate system
        let bitangent = (delta_pos2 * delta_uv1.x - delta_pos1 * delta_uv2.x) * -r;

        for i in [a, b, c] {
            vertices[i].tangent = (tangent + Vector3::from(vertices[i].tangent)).into();
            vertices[i].bitangent = (bitangent + Vector3::from(vertices[i].bitangent)).into();
            triangles_included[i] += 1;
        }
    }

    // Average the tangents/bitangents
    for (v, n) in vertices.iter_mut().zip(triangles_included) {
        if n == 0 {
            continue;
        }
        let denom = 1.0 / n as f32;
        v.tangent = (Vector3::from(v.tangent) * denom).into();
        v.bitangent = (Vector3::from(v.bitangent) * denom).into();
    }

    vertices
}

/// Buffer layouts of an instanced draw: per vertex data in slot 0, instances in slot 1.
pub fn instanced_layouts() -> [wgpu::VertexBufferLayout<'static>; 2] {
    [ModelVertex::desc(), InstanceRaw::desc()]
}

/// Flattened triangle indices, three per triangle.
pub fn indices(mesh: &Mesh) -> Vec<u32> {
    mesh.triangles.iter().flatten().copied().collect()
}

pub struct GpuMesh {
    pub name: String,
    pub vertex_buffer: wgpu::Buffer,
    pub index_buffer: wgpu::Buffer,
    pub num_elements: u32,
}

impl GpuMesh {
    pub fn new(device: &wgpu::Device, drawable: &Drawable) -> Self {
        let vertices = model_vertices(drawable);
        let indices = indices(drawable.mesh());

        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Vertex Buffer", drawable.label())),
            contents: bytemuck::cast_slice(&vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });

        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{:?} Index Buffer", drawable.label())),
            contents: bytemuck::cast_slice(&indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        Self {
            name: drawable.label().to_string(),
            vertex_buffer,
            index_buffer,
            num_elements: indices.len() as u32,
        }
    }
}

/// Loads every model of an OBJ file into one triangulated mesh.
pub fn load_obj_mesh(path: &Path) -> anyhow::Result<Mesh> {
    let (models, _materials) = tobj::load_obj(
        path,
        &tobj::LoadOptions {
            triangulate: true,
            single_index: true,
            ..Default::default()
        },
    )
    .with_context(|| format!("Could not load OBJ file {}", path.display()))?;

    let mut mesh = Mesh::new();
    for m in &models {
        let count = m.mesh.positions.len() / 3;
        let positions = m
            .mesh
            .positions
            .chunks_exact(3)
            .map(|p| Vector3::new(p[0], p[1], p[2]))
            .collect();
        let uvs = (0..count)
            .map(|i| {
                Vector2::new(
                    m.mesh.texcoords.get(i * 2).map_or(0.0, |f| *f),
                    m.mesh.texcoords.get(i * 2 + 1).map_or(0.0, |f| *f),
                )
            })
            .collect();
        let triangles = m
            .mesh
            .indices
            .chunks_exact(3)
            .map(|t| [t[0], t[1], t[2]])
            .collect();
        let part = Mesh::from_parts(positions, uvs, triangles)
            .with_context(|| format!("Model {} in {} is malformed", m.name, path.display()))?;
        mesh.push_back(&part)
            .with_context(|| format!("Model {} in {} is too large", m.name, path.display()))?;
    }

    if mesh.triangles.is_empty() {
        anyhow::bail!("OBJ file {} contains no triangles", path.display());
    }
    Ok(mesh)
}
