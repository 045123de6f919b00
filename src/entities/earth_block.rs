//! The ground: terrain surface sitting on an inverted pyramid of earth.

use cgmath::Vector3;

use crate::{
    data_structures::{
        drawable::{Drawable, Material},
        primitives::quadrilateral_pyramid,
        scene_graph::Hierarchy,
        terrain::Terrain,
        transform::Transform,
    },
    entities::textured,
    error::HierarchyError,
    render::{RenderPass, Renderer},
};

pub const TERRAIN_SAMPLES: usize = 100;

pub struct EarthBlock {
    hierarchy: Hierarchy,
}

impl EarthBlock {
    pub fn new(terrain: &Terrain, samples: usize) -> anyhow::Result<Self> {
        let length = terrain.length();
        let mut hierarchy = Hierarchy::new();
        hierarchy.add(
            textured("earth_base", quadrilateral_pyramid(length, length)?, "earth.jpeg")?,
            "base",
            None,
            Transform::new(),
        )?;
        let material = Material::textured("grass.jpg").with_color(Vector3::new(0.6, 0.85, 0.5));
        hierarchy.add(
            Drawable::new("terrain", terrain.mesh(samples)?, material)?,
            "terrain",
            Some("base"),
            Transform::new(),
        )?;
        hierarchy.recompute_global_transforms();
        Ok(Self { hierarchy })
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn display<R: Renderer + ?Sized>(&self, renderer: &mut R) -> Result<(), HierarchyError> {
        self.hierarchy.draw_all(renderer, RenderPass::Opaque)
    }
}
