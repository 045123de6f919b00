//! Generic population controller.
//!
//! A population owns spawn positions sampled once and one or more variants.
//! Every variant is a hierarchy template plus a variation function that poses
//! the template for one instance. Species differ only in what they build and
//! how they vary; the per frame loop is shared.

use cgmath::{InnerSpace, Vector3};

use crate::{
    data_structures::scene_graph::Hierarchy,
    error::HierarchyError,
    render::{RenderPass, Renderer},
};

/// Per frame inputs shared by every controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameContext {
    pub time: f32,
    pub camera_position: Vector3<f32>,
    pub camera_right: Vector3<f32>,
}

impl FrameContext {
    /// Frame seen from `eye` looking at `target`, with `+z` up.
    pub fn looking_at(time: f32, eye: Vector3<f32>, target: Vector3<f32>) -> Self {
        let forward = target - eye;
        let right = forward.cross(Vector3::unit_z());
        let camera_right = if right.magnitude2() > f32::EPSILON {
            right.normalize()
        } else {
            Vector3::unit_x()
        };
        Self {
            time,
            camera_position: eye,
            camera_right,
        }
    }
}

/// What a variation function knows about the instance it poses.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct InstanceContext<'a> {
    pub index: usize,
    pub count: usize,
    pub position: Vector3<f32>,
    pub frame: &'a FrameContext,
}

pub type Variation = Box<dyn Fn(&mut Hierarchy, &InstanceContext) -> Result<(), HierarchyError>>;

/// Picks the variant of instance `index` out of `count`.
pub type Selector = fn(usize, usize) -> usize;

pub struct Variant {
    pub hierarchy: Hierarchy,
    variation: Variation,
}

impl Variant {
    pub fn new<F>(hierarchy: Hierarchy, variation: F) -> Self
    where
        F: Fn(&mut Hierarchy, &InstanceContext) -> Result<(), HierarchyError> + 'static,
    {
        Self {
            hierarchy,
            variation: Box::new(variation),
        }
    }
}

/// First half of the population uses variant 0, the rest variant 1.
pub fn halves(index: usize, count: usize) -> usize {
    if index < count / 2 { 0 } else { 1 }
}

pub fn single(_index: usize, _count: usize) -> usize {
    0
}

pub struct Population {
    name: String,
    positions: Vec<Vector3<f32>>,
    variants: Vec<Variant>,
    selector: Selector,
    pass: RenderPass,
}

impl Population {
    pub fn new(
        name: impl Into<String>,
        positions: Vec<Vector3<f32>>,
        variants: Vec<Variant>,
        selector: Selector,
    ) -> Self {
        let name = name.into();
        if positions.is_empty() || variants.is_empty() {
            log::warn!(
                "population {} has {} positions and {} variants, nothing will be drawn",
                name,
                positions.len(),
                variants.len()
            );
        }
        Self {
            name,
            positions,
            variants,
            selector,
            pass: RenderPass::Opaque,
        }
    }

    pub fn with_pass(mut self, pass: RenderPass) -> Self {
        self.pass = pass;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn positions(&self) -> &[Vector3<f32>] {
        &self.positions
    }

    pub fn variants(&self) -> &[Variant] {
        &self.variants
    }

    pub fn pass(&self) -> RenderPass {
        self.pass
    }

    /// Poses, updates and draws every instance for this frame.
    pub fn display<R: Renderer + ?Sized>(
        &mut self,
        frame: &FrameContext,
        renderer: &mut R,
    ) -> Result<(), HierarchyError> {
        let Some(last) = self.variants.len().checked_sub(1) else {
            return Ok(());
        };
        let count = self.positions.len();
        for (index, position) in self.positions.iter().enumerate() {
            let variant = &mut self.variants[(self.selector)(index, count).min(last)];
            let ctx = InstanceContext {
                index,
                count,
                position: *position,
                frame,
            };
            (variant.variation)(&mut variant.hierarchy, &ctx)?;
            variant.hierarchy.recompute_global_transforms();
            variant.hierarchy.draw_all(renderer, self.pass)?;
        }
        Ok(())
    }
}
