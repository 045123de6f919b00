//! Amanite and porcini mushrooms.
//!
//! The first half of the population are amanites, the second half porcini.
//! Both pulse in size with time.

use cgmath::Vector3;
use rand::Rng;

use crate::{
    data_structures::{
        composite::amanite_stem,
        primitives::{cone, sphere},
        scene_graph::Hierarchy,
        terrain::{Placement, Terrain},
        transform::Transform,
    },
    entities::{
        InstanceContext, Population, Spawn, Variant, population::halves, sample, textured,
    },
    error::HierarchyError,
};

pub const QUANTITY: usize = 600;

const STEM_HEIGHT: f32 = 0.5;
const STEM_TEXTURE: &str = "stem.jpg";

fn amanite() -> anyhow::Result<Hierarchy> {
    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        textured("amanite_stem", amanite_stem(STEM_HEIGHT)?, STEM_TEXTURE)?,
        "stem",
        None,
        Transform::new(),
    )?;
    hierarchy.add(
        textured("amanite_cap", cone(0.6, 0.4, STEM_HEIGHT)?, "cap_amanite.jpg")?,
        "cap",
        Some("stem"),
        Transform::new(),
    )?;
    Ok(hierarchy)
}

fn porcini() -> anyhow::Result<Hierarchy> {
    let mut hierarchy = Hierarchy::new();
    hierarchy.add(
        textured("porcini_stem", cone(0.12, STEM_HEIGHT, 0.0)?, STEM_TEXTURE)?,
        "stem",
        None,
        Transform::new(),
    )?;
    hierarchy.add(
        textured(
            "porcini_cap",
            sphere(0.3, Vector3::new(0.0, 0.0, STEM_HEIGHT / 1.2))?,
            "cap_porcini.jpg",
        )?,
        "cap",
        Some("stem"),
        Transform::new(),
    )?;
    Ok(hierarchy)
}

/// Scale factor of a mushroom standing at height `z`.
pub fn pulse_scale(time: f32, z: f32) -> f32 {
    1.0 + (time + z).sin().abs() / 2.0
}

fn pulse(hierarchy: &mut Hierarchy, ctx: &InstanceContext) -> Result<(), HierarchyError> {
    let stem = hierarchy.local_mut("stem")?;
    stem.translation = ctx.position;
    stem.set_uniform_scale(pulse_scale(ctx.frame.time, ctx.position.z));
    Ok(())
}

pub fn population<R: Rng + ?Sized>(
    terrain: &Terrain,
    spawn: Spawn,
    rng: &mut R,
) -> anyhow::Result<Population> {
    let placement = Placement::new(spawn.quantity, terrain.length()).spaced();
    let positions = sample("mushrooms", terrain, placement, spawn.budget, rng)?;
    Ok(Population::new(
        "mushrooms",
        positions,
        vec![Variant::new(amanite()?, pulse), Variant::new(porcini()?, pulse)],
        halves,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::FrameContext;
    use crate::render::{DrawRecorder, RenderPass};
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn pulse_stays_between_one_and_one_and_a_half() {
        for i in 0..100 {
            let s = pulse_scale(i as f32 * 0.37, 1.3);
            assert!((1.0..=1.5).contains(&s));
        }
        assert_eq!(pulse_scale(0.0, 0.0), 1.0);
    }

    #[test]
    fn amanites_then_porcini() {
        let mut rng = StdRng::seed_from_u64(2);
        let terrain = Terrain::flat(60.0).unwrap();
        let mut population = population(&terrain, Spawn::new(4), &mut rng).unwrap();
        let frame = FrameContext::looking_at(
            1.0,
            Vector3::new(15.0, 6.0, 6.0),
            Vector3::new(0.0, 0.0, 0.0),
        );
        let mut recorder = DrawRecorder::default();
        population.display(&frame, &mut recorder).unwrap();

        let labels: Vec<_> = recorder.calls().iter().map(|c| c.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "amanite_stem",
                "amanite_cap",
                "amanite_stem",
                "amanite_cap",
                "porcini_stem",
                "porcini_cap",
                "porcini_stem",
                "porcini_cap",
            ]
        );
        let cap = &recorder.calls()[1];
        assert_eq!(cap.pass, RenderPass::Opaque);
        assert_eq!(cap.world.translation, population.positions()[0]);
        assert!((cap.world.scale.x - pulse_scale(1.0, 0.0)).abs() < 1e-6);
    }
}
