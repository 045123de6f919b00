#![allow(dead_code)]

use glade_ngin::{
    Vector3,
    entities::FrameContext,
    scene::SceneConfig,
};
use rand::{SeedableRng, rngs::StdRng};

pub(crate) fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Camera of the default scene at `time`.
pub(crate) fn frame_at(time: f32) -> FrameContext {
    FrameContext::looking_at(time, Vector3::new(15.0, 6.0, 6.0), Vector3::new(0.0, 0.0, 0.0))
}

/// Full size terrain with only a handful of instances per species.
pub(crate) fn small_scene() -> SceneConfig {
    SceneConfig {
        terrain_samples: 10,
        trees: 4,
        mushrooms: 4,
        mosquitoes: 3,
        grass: 5,
        skulls: 2,
        snakes: 2,
        ..Default::default()
    }
}

pub(crate) fn assert_close(a: Vector3<f32>, b: Vector3<f32>) {
    assert!(
        (a.x - b.x).abs() < 1e-4 && (a.y - b.y).abs() < 1e-4 && (a.z - b.z).abs() < 1e-4,
        "{:?} != {:?}",
        a,
        b
    );
}

pub(crate) const SKULL_OBJ: &str = "\
v -1 -1 0
v 1 -1 0
v 0 1 0
v 0 0 1
vt 0 0
vt 1 0
vt 0.5 1
vt 0.5 0.5
f 1/1 2/2 3/3
f 1/1 2/2 4/4
f 2/2 3/3 4/4
f 3/3 1/1 4/4
";
