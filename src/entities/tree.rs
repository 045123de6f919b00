//! Pine and birch trees.

use std::f32::consts::PI;

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        composite::{DEFAULT_FOLIAGE_RADIUS, foliage_cluster},
        drawable::{Drawable, Material},
        primitives::{cone, cylinder},
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::Transform,
    },
    entities::{
        InstanceContext, Population, Spawn, Variant, population::halves, rgb, sample, textured,
    },
    error::HierarchyError,
};

pub const QUANTITY: usize = 500;

pub const PINE_SCALES: [f32; 3] = [0.6, 1.3, 1.7];
pub const BIRCH_SCALES: [f32; 3] = [0.9, 1.5, 1.7];

const PINE_TRUNK_HEIGHT: f32 = 1.6;
const BIRCH_TRUNK_HEIGHT: f32 = 2.6;

fn pine() -> anyhow::Result<Hierarchy> {
    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        textured("pine_trunk", cylinder(0.3, PINE_TRUNK_HEIGHT)?, "trunk_pine.jpg")?,
        "trunk",
        None,
        Transform::new(),
    )?;

    // (radius, height, z offset, color) from the widest layer to the top
    let layers = [
        (2.0, 3.0, 0.0, rgb(47.0, 79.0, 79.0)),
        (1.5, 3.0, 1.0, rgb(48.0, 186.0, 143.0)),
        (1.0, 3.0, 2.0, Vector3::new(1.0, 1.0, 1.0)),
    ];
    for (i, (radius, height, z_offset, color)) in layers.into_iter().enumerate() {
        let mut mesh = cone(radius, height, z_offset)?;
        mesh.translate(Vector3::new(0.0, 0.0, PINE_TRUNK_HEIGHT / 2.0));
        let label = format!("pine_foliage_{}", i + 1);
        let material = Material::textured("sapin.jpg")
            .with_color(color)
            .with_shader("snake_y");
        hierarchy.add(
            Drawable::new(label.as_str(), mesh, material)?,
            &format!("foliage_{}", i + 1),
            Some("trunk"),
            Transform::new(),
        )?;
    }
    Ok(hierarchy)
}

fn birch() -> anyhow::Result<Hierarchy> {
    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        textured("birch_trunk", cylinder(0.2, BIRCH_TRUNK_HEIGHT)?, "trunk_birch.jpg")?,
        "trunk",
        None,
        Transform::new(),
    )?;

    let mut foliage = foliage_cluster(DEFAULT_FOLIAGE_RADIUS)?;
    foliage.translate(Vector3::new(0.0, 0.0, BIRCH_TRUNK_HEIGHT / 1.2));
    let material = Material::textured("foliage_birch.jpg").with_shader("birch");
    hierarchy.add(
        Drawable::new("birch_foliage", foliage, material)?,
        "foliage",
        Some("trunk"),
        Transform::new(),
    )?;
    Ok(hierarchy)
}

/// Heading of pine number `index` standing at `p`.
pub fn pine_heading(index: usize, p: Vector3<f32>) -> f32 {
    match index % 4 {
        0 => p.z * PI / 100.0,
        1 => 40.0 * p.y + p.x,
        2 => p.z + 3.0 * p.x,
        _ => p.z - 2.0 * p.y + p.x,
    }
}

pub fn birch_heading(index: usize, p: Vector3<f32>) -> f32 {
    match index % 4 {
        0 => p.z,
        1 => 4.0 * p.y + p.x,
        2 => p.z + 3.0 * p.x,
        _ => p.z - 2.0 * p.y + p.x,
    }
}

fn stand(
    hierarchy: &mut Hierarchy,
    ctx: &InstanceContext,
    scale: f32,
    heading: f32,
) -> Result<(), HierarchyError> {
    let trunk = hierarchy.local_mut("trunk")?;
    trunk.translation = ctx.position;
    trunk.set_uniform_scale(scale);
    trunk.set_rotation(Vector3::unit_z(), heading);
    Ok(())
}

pub fn population<R: Rng + ?Sized>(
    terrain: &Terrain,
    spawn: Spawn,
    rng: &mut R,
) -> anyhow::Result<Population> {
    let placement = Placement::new(spawn.quantity, terrain.length()).spaced();
    let positions = sample("trees", terrain, placement, spawn.budget, rng)?;
    Ok(Population::new(
        "trees",
        positions,
        vec![
            Variant::new(pine()?, |h: &mut Hierarchy, ctx: &InstanceContext| {
                let scale = PINE_SCALES[ctx.index % PINE_SCALES.len()];
                stand(h, ctx, scale, pine_heading(ctx.index, ctx.position))
            }),
            Variant::new(birch()?, |h: &mut Hierarchy, ctx: &InstanceContext| {
                let scale = BIRCH_SCALES[ctx.index % BIRCH_SCALES.len()];
                stand(h, ctx, scale, birch_heading(ctx.index, ctx.position))
            }),
        ],
        halves,
    ))
}
