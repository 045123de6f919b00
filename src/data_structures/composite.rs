//! Organisms assembled from primitives.
//!
//! Each builder is a pure function: it creates its own primitives, moves them
//! into place and concatenates them with [`Mesh::push_back`].

use cgmath::Vector3;

use crate::data_structures::mesh::Mesh;
use crate::data_structures::primitives::{cone, cylinder, ellipse, sphere};
use crate::data_structures::transform::{
    Side, axis_swap_z_to_neg_y, axis_swap_z_to_y, head_tilt, mirrored_wing_frame,
};
use crate::error::{MeshError, positive};

pub const DEFAULT_FOLIAGE_RADIUS: f32 = 1.2;

pub const SNAKE_SEGMENTS: usize = 4;
pub const SNAKE_SEGMENT_LENGTH: f32 = 0.6;
pub const SNAKE_RADIUS: f32 = 0.1;

const WING_SEMI_MINOR: f32 = 0.154;
const WING_SEMI_MAJOR: f32 = 0.25;

/// Rounded canopy of six spheres in three sizes.
pub fn foliage_cluster(base_radius: f32) -> Result<Mesh, MeshError> {
    let r1 = positive("base_radius", base_radius)?;
    let r2 = 0.7 * r1;
    let r3 = 0.3 * r2;

    let spheres = [
        (r1, Vector3::new(0.0, 0.0, r1 / 1.2)),
        (r1, Vector3::new(0.0, 0.0, r1 / 1.2 + r1)),
        (r2, Vector3::new(r2 / 1.5, r2 / 1.2, r1 / 1.2 + r1)),
        (r2, Vector3::new(-r1 / 2.0, -r1 / 1.2, r1 / 1.2 + r2 / 1.2)),
        (
            r3,
            Vector3::new(r2 / 1.5 - r3 / 1.5, r2 / 1.2 - r3 / 1.3, r1 / 1.2 + r1 + r2),
        ),
        (r3, Vector3::new(0.6 * r1, 0.6 * r1, 0.3 * r1)),
    ];

    let mut mesh = Mesh::new();
    for (radius, offset) in spheres {
        mesh.push_back(&sphere(radius, offset)?)?;
    }
    Ok(mesh)
}

/// Amanite stem: a thin trunk with a skirt halfway up.
pub fn amanite_stem(stem_height: f32) -> Result<Mesh, MeshError> {
    let stem_height = positive("stem_height", stem_height)?;
    let mut mesh = cylinder(0.07, stem_height)?;
    mesh.push_back(&cone(0.25, 0.3, stem_height / 2.0)?)?;
    Ok(mesh)
}

/// Mosquito head: a sphere with its proboscis and two eyes, tilted forward.
fn mosquito_head() -> Result<Mesh, MeshError> {
    let mut proboscis = cone(0.1 / 3.0, 0.4, 0.0)?;
    proboscis.apply_transform(axis_swap_z_to_neg_y());

    let mut head = sphere(0.1, Vector3::new(0.0, 0.0, 0.0))?;
    head.push_back(&proboscis)?
        .push_back(&sphere(0.07, Vector3::new(0.05, -0.04, 0.0))?)?
        .push_back(&sphere(0.07, Vector3::new(-0.05, -0.04, 0.0))?)?;
    head.translate(Vector3::new(0.0, -0.27, 0.0))
        .apply_transform(head_tilt());
    Ok(head)
}

/// Mosquito body facing `-y`: thorax, head, abdomen and a round tail.
pub fn mosquito_body() -> Result<Mesh, MeshError> {
    let mut abdomen = cylinder(0.14, 0.5)?;
    abdomen
        .apply_transform(axis_swap_z_to_neg_y())
        .translate(Vector3::new(0.0, 0.63, 0.0));

    let mut body = sphere(0.2, Vector3::new(0.0, 0.0, 0.0))?;
    body.push_back(&mosquito_head()?)?
        .push_back(&abdomen)?
        .push_back(&sphere(0.14, Vector3::new(0.0, 0.63, 0.0))?)?;
    Ok(body)
}

pub fn mosquito_wing(side: Side) -> Result<Mesh, MeshError> {
    let mut wing = ellipse(WING_SEMI_MINOR, WING_SEMI_MAJOR)?;
    wing.apply_transform(mirrored_wing_frame(side)).translate(Vector3::new(
        side.sign() * WING_SEMI_MAJOR,
        0.0,
        WING_SEMI_MINOR,
    ));
    Ok(wing)
}

/// Snake body laid out along `+y` from the origin, ending in a tail cone.
pub fn snake_body() -> Result<Mesh, MeshError> {
    let mut body = Mesh::new();
    for segment in 0..SNAKE_SEGMENTS {
        let mut part = cylinder(SNAKE_RADIUS, SNAKE_SEGMENT_LENGTH)?;
        part.apply_transform(axis_swap_z_to_y()).translate(Vector3::new(
            0.0,
            SNAKE_SEGMENT_LENGTH * segment as f32,
            0.0,
        ));
        body.push_back(&part)?;
    }

    let mut tail = cone(SNAKE_RADIUS, SNAKE_SEGMENT_LENGTH, 0.0)?;
    tail.apply_transform(axis_swap_z_to_y()).translate(Vector3::new(
        0.0,
        SNAKE_SEGMENT_LENGTH * SNAKE_SEGMENTS as f32,
        0.0,
    ));
    body.push_back(&tail)?;
    Ok(body)
}
