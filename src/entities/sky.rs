//! Two nested, slowly turning sky boxes.

use cgmath::Vector3;

use crate::{
    data_structures::{primitives::cube, scene_graph::Hierarchy, transform::Transform},
    entities::{FrameContext, textured},
    error::HierarchyError,
    render::{RenderPass, Renderer},
};

pub const OUTER_SCALE: f32 = 900.0;
pub const INNER_SCALE: f32 = 500.0;
pub const LIFT: f32 = 20.0;

pub struct Sky {
    hierarchy: Hierarchy,
}

impl Sky {
    pub fn new() -> anyhow::Result<Self> {
        let mut hierarchy = Hierarchy::new();
        for (name, parent, scale) in [
            ("layer_1", None, OUTER_SCALE),
            ("layer_2", Some("layer_1"), INNER_SCALE),
        ] {
            let mut mesh = cube(Vector3::new(0.0, 0.0, 0.0), 1.0)?;
            mesh.scale(Vector3::new(scale, scale, scale))
                .translate(Vector3::new(0.0, 0.0, LIFT));
            hierarchy.add(
                textured(&format!("sky_{}", name), mesh, "sky.png")?,
                name,
                parent,
                Transform::new(),
            )?;
        }
        Ok(Self { hierarchy })
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn display<R: Renderer + ?Sized>(
        &mut self,
        frame: &FrameContext,
        renderer: &mut R,
    ) -> Result<(), HierarchyError> {
        let t = frame.time;
        self.hierarchy
            .local_mut("layer_1")?
            .set_rotation(Vector3::unit_z(), t / 10.0);
        self.hierarchy
            .local_mut("layer_2")?
            .set_rotation(Vector3::unit_z(), t / 15.0);
        self.hierarchy.recompute_global_transforms();
        self.hierarchy.draw_all(renderer, RenderPass::Transparent)
    }
}
