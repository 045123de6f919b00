//! Camera facing grass billboards, drawn in the transparent pass.

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        drawable::{Drawable, Material},
        primitives::quadrangle,
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::Transform,
    },
    entities::{InstanceContext, Population, Spawn, Variant, population::single, sample},
    error::HierarchyError,
    render::RenderPass,
};

pub const QUANTITY: usize = 1000;
pub const EXTENT_RATIO: f32 = 0.95;
pub const SCALES: [f32; 7] = [5.0, 4.7, 4.5, 2.5, 3.0, 3.5, 4.0];

/// Rotation about `z` turning the billboard's `+x` onto the camera right vector.
pub fn billboard_angle(camera_right: Vector3<f32>) -> f32 {
    camera_right.y.atan2(camera_right.x)
}

fn hierarchy() -> anyhow::Result<Hierarchy> {
    let blade = quadrangle(
        Vector3::new(-0.5, 0.0, 0.0),
        Vector3::new(0.5, 0.0, 0.0),
        Vector3::new(0.5, 0.0, 1.0),
        Vector3::new(-0.5, 0.0, 1.0),
    )?;
    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        Drawable::new(
            "grass",
            blade,
            Material::textured("grass.png").with_shader("grass"),
        )?,
        "grass",
        None,
        Transform::new(),
    )?;
    Ok(hierarchy)
}

fn face_camera(hierarchy: &mut Hierarchy, ctx: &InstanceContext) -> Result<(), HierarchyError> {
    let blade = hierarchy.local_mut("grass")?;
    blade.translation = ctx.position;
    blade.set_rotation(Vector3::unit_z(), billboard_angle(ctx.frame.camera_right));
    blade.set_uniform_scale(SCALES[ctx.index % SCALES.len()]);
    Ok(())
}

pub fn population<R: Rng + ?Sized>(
    terrain: &Terrain,
    spawn: Spawn,
    rng: &mut R,
) -> anyhow::Result<Population> {
    let placement = Placement::new(spawn.quantity, terrain.length() * EXTENT_RATIO);
    let positions = sample("grass blades", terrain, placement, spawn.budget, rng)?;
    Ok(
        Population::new("grass", positions, vec![Variant::new(hierarchy()?, face_camera)], single)
            .with_pass(RenderPass::Transparent),
    )
}
