//! Skull props scattered on the ground, loaded from an OBJ model.

use std::f32::consts::PI;

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        mesh::Mesh,
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::Transform,
    },
    entities::{InstanceContext, Population, Spawn, Variant, population::single, sample, textured},
    error::HierarchyError,
};

pub const QUANTITY: usize = 10;
pub const EXTENT_RATIO: f32 = 0.9;
pub const SCALE: f32 = 0.1;
/// Forward tilt about `x`.
pub const TILT: f32 = -PI / 7.0;

fn rest(hierarchy: &mut Hierarchy, ctx: &InstanceContext) -> Result<(), HierarchyError> {
    hierarchy.local_mut("skull")?.translation = ctx.position;
    Ok(())
}

pub fn population<R: Rng + ?Sized>(
    terrain: &Terrain,
    mesh: Mesh,
    spawn: Spawn,
    rng: &mut R,
) -> anyhow::Result<Population> {
    let placement = Placement::new(spawn.quantity, terrain.length() * EXTENT_RATIO).spaced();
    let positions = sample("skulls", terrain, placement, spawn.budget, rng)?;

    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        textured("skull", mesh, "skull/skull.jpg")?,
        "skull",
        None,
        Transform::from_axis_angle(Vector3::unit_x(), TILT).with_uniform_scale(SCALE),
    )?;
    Ok(Population::new(
        "skulls",
        positions,
        vec![Variant::new(hierarchy, rest)],
        single,
    ))
}
