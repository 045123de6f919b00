//! Parametric primitive meshes.
//!
//! Cylinders and cones grow along `+z` from the origin; composite builders
//! turn them onto other axes with the frame changes in
//! [`transform`](super::transform).

use std::f32::consts::{PI, TAU};

use cgmath::{Vector2, Vector3};

use crate::data_structures::mesh::Mesh;
use crate::error::{MeshError, finite, positive};

/// Angular samples of cylinders and cones.
pub const RING_SAMPLES: usize = 20;
/// Default stacks and slices of a sphere.
pub const SPHERE_SAMPLES: usize = 10;
/// Perimeter samples of an ellipse disc, without the closing duplicate.
pub const ELLIPSE_SAMPLES: usize = 36;

const CYLINDER_UV_TILING: f32 = 4.0;
const SPHERE_UV_TILING: f32 = 5.0;

fn finite_vector(name: &'static str, v: Vector3<f32>) -> Result<Vector3<f32>, MeshError> {
    finite(name, v.x)?;
    finite(name, v.y)?;
    finite(name, v.z)?;
    Ok(v)
}

/// Open tube of `radius` from `z = 0` to `z = height`.
///
/// Base and top rings are interleaved, so vertex `2k` is the base sample `k`
/// and `2k + 1` the top sample above it. The last sample lands on the first
/// one and the seam is closed by one extra pair of triangles.
pub fn cylinder(radius: f32, height: f32) -> Result<Mesh, MeshError> {
    let radius = positive("radius", radius)?;
    let height = positive("height", height)?;
    let n = RING_SAMPLES;

    let mut mesh = Mesh::new();
    for k in 0..n {
        let u = k as f32 / (n - 1) as f32;
        let theta = TAU * u;
        let (x, y) = (radius * theta.cos(), radius * theta.sin());
        mesh.positions.push(Vector3::new(x, y, 0.0));
        mesh.positions.push(Vector3::new(x, y, height));
        mesh.uvs.push(Vector2::new(CYLINDER_UV_TILING * u, 0.0));
        mesh.uvs.push(Vector2::new(CYLINDER_UV_TILING * u, CYLINDER_UV_TILING));
    }

    for k in 0..(n - 1) as u32 {
        let u00 = 2 * k;
        let u01 = 2 * k + 1;
        let u10 = 2 * (k + 1);
        let u11 = 2 * (k + 1) + 1;
        mesh.triangles.push([u00, u10, u11]);
        mesh.triangles.push([u00, u11, u01]);
    }
    let last = 2 * (n as u32 - 1);
    mesh.triangles.push([last, 0, 1]);
    mesh.triangles.push([last, 1, last + 1]);

    Ok(mesh)
}

/// Cone with its base ring at `z = z_offset` and apex `height` above it.
///
/// The bottom is closed by a second ring of its own so the side and the cap
/// keep separate texture mappings.
pub fn cone(radius: f32, height: f32, z_offset: f32) -> Result<Mesh, MeshError> {
    let radius = positive("radius", radius)?;
    let height = positive("height", height)?;
    let z_offset = finite("z_offset", z_offset)?;
    let n = RING_SAMPLES;
    let n32 = n as u32;

    let mut mesh = Mesh::new();
    let ring = |k: usize| {
        let u = k as f32 / n as f32;
        let theta = TAU * u;
        (u, theta, Vector3::new(radius * theta.cos(), radius * theta.sin(), z_offset))
    };

    for k in 0..n {
        let (u, _, p) = ring(k);
        mesh.positions.push(p);
        mesh.uvs.push(Vector2::new(u, 0.0));
    }
    mesh.positions.push(Vector3::new(0.0, 0.0, z_offset + height));
    mesh.uvs.push(Vector2::new(0.5, 1.0));
    for k in 0..n32 {
        mesh.triangles.push([k, (k + 1) % n32, n32]);
    }

    for k in 0..n {
        let (_, theta, p) = ring(k);
        mesh.positions.push(p);
        mesh.uvs.push(Vector2::new(theta.cos(), theta.sin()));
    }
    mesh.positions.push(Vector3::new(0.0, 0.0, z_offset));
    mesh.uvs.push(Vector2::new(0.0, 0.0));
    let first = n32 + 1;
    let center = 2 * n32 + 1;
    for k in 0..n32 {
        mesh.triangles.push([first + k, first + (k + 1) % n32, center]);
    }

    Ok(mesh)
}

pub fn sphere(radius: f32, translation: Vector3<f32>) -> Result<Mesh, MeshError> {
    sphere_with_samples(radius, translation, SPHERE_SAMPLES)
}

/// Latitude/longitude sphere with `samples` stacks and slices.
///
/// Stacks run from the `+y` pole (`phi = 0`) to the `-y` pole.
pub fn sphere_with_samples(
    radius: f32,
    translation: Vector3<f32>,
    samples: usize,
) -> Result<Mesh, MeshError> {
    let radius = positive("radius", radius)?;
    let translation = finite_vector("translation", translation)?;
    if samples < 2 {
        return Err(MeshError::TooFewSamples { samples, min: 2 });
    }
    let n = samples;
    let row = (n + 1) as u32;

    let mut mesh = Mesh::new();
    for stack in 0..=n {
        let phi = stack as f32 * PI / n as f32;
        for slice in 0..=n {
            let theta = slice as f32 * TAU / n as f32;
            mesh.positions.push(
                Vector3::new(
                    radius * phi.sin() * theta.cos(),
                    radius * phi.cos(),
                    radius * phi.sin() * theta.sin(),
                ) + translation,
            );
            mesh.uvs.push(Vector2::new(
                SPHERE_UV_TILING * (1.0 - stack as f32 / n as f32),
                SPHERE_UV_TILING * (1.0 - slice as f32 / n as f32),
            ));
        }
    }

    for stack in 0..n as u32 {
        for slice in 0..n as u32 {
            let idx = slice + row * stack;
            mesh.triangles.push([idx, idx + 1, idx + row]);
            mesh.triangles.push([idx + 1, idx + row + 1, idx + row]);
        }
    }

    Ok(mesh)
}

/// Flat ellipse with half axes `a` (x) and `b` (y), fanned from its center.
pub fn ellipse(a: f32, b: f32) -> Result<Mesh, MeshError> {
    let a = positive("a", a)?;
    let b = positive("b", b)?;
    let n = ELLIPSE_SAMPLES;

    let mut mesh = Mesh::new();
    mesh.positions.push(Vector3::new(0.0, 0.0, 0.0));
    mesh.uvs.push(Vector2::new(0.5, 0.5));
    for k in 0..=n {
        let theta = TAU * k as f32 / n as f32;
        let (c, s) = (theta.cos(), theta.sin());
        mesh.positions.push(Vector3::new(a * c, b * s, 0.0));
        mesh.uvs.push(Vector2::new(0.5 + 0.5 * c, 0.5 + 0.5 * s));
    }
    for i in 1..=n as u32 {
        mesh.triangles.push([0, i, i % n as u32 + 1]);
    }

    Ok(mesh)
}

/// Four sided pyramid hanging below the xy plane, apex at `z = -height`.
///
/// The square base is left open.
pub fn quadrilateral_pyramid(base: f32, height: f32) -> Result<Mesh, MeshError> {
    let base = positive("base", base)?;
    let height = positive("height", height)?;
    let h = base / 2.0;

    Mesh::from_parts(
        vec![
            Vector3::new(-h, -h, 0.0),
            Vector3::new(h, -h, 0.0),
            Vector3::new(h, h, 0.0),
            Vector3::new(-h, h, 0.0),
            Vector3::new(0.0, 0.0, -height),
        ],
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
            Vector2::new(0.5, 0.5),
        ],
        vec![[0, 1, 4], [1, 2, 4], [2, 3, 4], [3, 0, 4]],
    )
}

/// Two triangle quad through four corners given counter clockwise.
pub fn quadrangle(
    p00: Vector3<f32>,
    p10: Vector3<f32>,
    p11: Vector3<f32>,
    p01: Vector3<f32>,
) -> Result<Mesh, MeshError> {
    Mesh::from_parts(
        vec![
            finite_vector("p00", p00)?,
            finite_vector("p10", p10)?,
            finite_vector("p11", p11)?,
            finite_vector("p01", p01)?,
        ],
        vec![
            Vector2::new(0.0, 0.0),
            Vector2::new(1.0, 0.0),
            Vector2::new(1.0, 1.0),
            Vector2::new(0.0, 1.0),
        ],
        vec![[0, 1, 2], [0, 2, 3]],
    )
}

/// Axis aligned cube with one quad per face, wound outwards.
pub fn cube(center: Vector3<f32>, edge: f32) -> Result<Mesh, MeshError> {
    let center = finite_vector("center", center)?;
    let h = positive("edge", edge)? / 2.0;
    let faces = [
        [(h, -h, -h), (h, h, -h), (h, h, h), (h, -h, h)],
        [(-h, h, -h), (-h, -h, -h), (-h, -h, h), (-h, h, h)],
        [(h, h, -h), (-h, h, -h), (-h, h, h), (h, h, h)],
        [(-h, -h, -h), (h, -h, -h), (h, -h, h), (-h, -h, h)],
        [(-h, -h, h), (h, -h, h), (h, h, h), (-h, h, h)],
        [(-h, h, -h), (h, h, -h), (h, -h, -h), (-h, -h, -h)],
    ];

    let mut mesh = Mesh::new();
    for corners in faces {
        let [p00, p10, p11, p01] = corners.map(|(x, y, z)| center + Vector3::new(x, y, z));
        mesh.push_back(&quadrangle(p00, p10, p11, p01)?)?;
    }
    Ok(mesh)
}
