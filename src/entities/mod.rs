//! Scene entities: flora, fauna and environment props.
//!
//! Most species are a [`population::Population`] built by a module level
//! `population` function. Snakes keep per instance state and have their own
//! controller; the sky and the earth block are single hierarchies.

use anyhow::Context as _;
use cgmath::Vector3;
use rand::Rng;

use crate::data_structures::{
    drawable::{Drawable, Material},
    mesh::Mesh,
    terrain::{Placement, SamplingBudget, Terrain},
};

pub mod earth_block;
pub mod grass;
pub mod mosquito;
pub mod mushroom;
pub mod population;
pub mod skull;
pub mod sky;
pub mod snake;
pub mod tree;

pub use population::{FrameContext, InstanceContext, Population, Variant};

/// How many instances of a species are spawned and how hard the sampler may try.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Spawn {
    pub quantity: usize,
    pub budget: SamplingBudget,
}

impl Spawn {
    pub fn new(quantity: usize) -> Self {
        Self {
            quantity,
            budget: SamplingBudget::default(),
        }
    }
}

pub(crate) fn sample<R: Rng + ?Sized>(
    species: &str,
    terrain: &Terrain,
    placement: Placement,
    budget: SamplingBudget,
    rng: &mut R,
) -> anyhow::Result<Vec<Vector3<f32>>> {
    terrain
        .sample_positions(placement, budget, rng)
        .with_context(|| format!("Could not place {} {}", placement.quantity, species))
}

pub(crate) fn textured(label: &str, mesh: Mesh, texture: &str) -> anyhow::Result<Drawable> {
    Drawable::new(label, mesh, Material::textured(texture))
        .with_context(|| format!("Invalid mesh for {}", label))
}

pub(crate) fn rgb(r: f32, g: f32, b: f32) -> Vector3<f32> {
    Vector3::new(r, g, b) / 256.0
}
