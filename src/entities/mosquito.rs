//! Mosquito swarm.
//!
//! Mosquitoes hover above the terrain, spin around themselves and follow one
//! of four trajectories picked by `index % 4`. Wing flaps and trajectory noise
//! come from [`jitter`], a hash of time and instance index, so a frame can be
//! replayed exactly.

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        composite::{mosquito_body, mosquito_wing},
        drawable::{Drawable, Material},
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::{Side, Transform},
    },
    entities::{InstanceContext, Population, Spawn, Variant, population::single, rgb, sample},
    error::HierarchyError,
};

pub const QUANTITY: usize = 300;
pub const EXTENT_RATIO: f32 = 0.9;
pub const SCALES: [f32; 4] = [1.6, 0.9, 1.1, 1.2];

/// Pseudo random value in `[0, 1)` for instance `index` at `time`.
pub fn jitter(time: f32, index: usize, salt: u32) -> f32 {
    let seed = time * 12.9898 + index as f32 * 78.233 + salt as f32 * 37.719;
    (seed.sin() * 43_758.547).fract().abs()
}

/// Where mosquito `index` spawned at `p` flies at `time`.
pub fn trajectory(index: usize, p: Vector3<f32>, time: f32) -> Vector3<f32> {
    let bob = 0.5 * (2.0 * time + p.x + p.y + p.z).sin();
    let spread = p.x + p.y;
    let z = p.z + bob;
    match index % 4 {
        0 => Vector3::new(time.cos() + p.x, time.sin() + p.y, z),
        1 => {
            let noise = jitter(time, index, 1);
            Vector3::new(
                spread * time.cos() + p.x + noise,
                spread * (time + p.x).sin() * spread.cos() + p.y + noise,
                z,
            )
        }
        2 => {
            let noise = 2.0 * jitter(time, index, 2);
            Vector3::new(
                spread * spread.cos() + p.x + noise,
                spread * time.cos() + p.y + noise,
                z,
            )
        }
        _ => Vector3::new(p.x, p.y, z),
    }
}

fn hierarchy() -> anyhow::Result<Hierarchy> {
    let body_color = rgb(117.0, 92.0, 72.0);
    let wing_color = rgb(250.0, 238.0, 221.0);

    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        Drawable::new(
            "mosquito_body",
            mosquito_body()?,
            Material::default().with_color(body_color),
        )?,
        "mosquito",
        None,
        Transform::new(),
    )?;
    for (name, side) in [("wing_1", Side::Left), ("wing_2", Side::Right)] {
        hierarchy.add(
            Drawable::new(
                format!("mosquito_{}", name),
                mosquito_wing(side)?,
                Material::default().with_color(wing_color),
            )?,
            name,
            Some("mosquito"),
            Transform::new(),
        )?;
    }
    Ok(hierarchy)
}

fn fly(hierarchy: &mut Hierarchy, ctx: &InstanceContext) -> Result<(), HierarchyError> {
    let time = ctx.frame.time;
    let flap = jitter(time, ctx.index, 0);
    hierarchy
        .local_mut("wing_1")?
        .set_rotation(Vector3::unit_z(), flap);
    hierarchy
        .local_mut("wing_2")?
        .set_rotation(Vector3::unit_z(), -flap);

    let p = ctx.position;
    let body = hierarchy.local_mut("mosquito")?;
    body.set_uniform_scale(SCALES[ctx.index % SCALES.len()]);
    body.set_rotation(Vector3::unit_z(), time + p.x + p.y + p.z);
    body.translation = trajectory(ctx.index, p, time);
    Ok(())
}

pub fn population<R: Rng + ?Sized>(
    terrain: &Terrain,
    spawn: Spawn,
    rng: &mut R,
) -> anyhow::Result<Population> {
    let placement = Placement::new(spawn.quantity, terrain.length() * EXTENT_RATIO)
        .flying()
        .spaced();
    let positions = sample("mosquitoes", terrain, placement, spawn.budget, rng)?;
    Ok(Population::new(
        "mosquitoes",
        positions,
        vec![Variant::new(hierarchy()?, fly)],
        single,
    ))
}
