//! Renderer seam and headless draw recording.
//!
//! Scene nodes are drawn through the [`Renderer`] trait. The GPU backend lives
//! outside this crate; [`DrawRecorder`] is the in-crate implementation used by
//! the headless runner and the tests. It batches world transforms per drawable
//! as [`InstanceRaw`] data, the layout an instancing renderer uploads.
//!
//! # Key types
//!
//! - [`RenderPass`] selects the opaque or the blended pass
//! - [`Environment`] carries per frame lighting state
//! - [`DrawCall`] and [`Batch`] are what the recorder keeps

use std::collections::HashMap;

use cgmath::Vector3;

use crate::data_structures::{
    drawable::Drawable,
    transform::{InstanceRaw, Transform},
};

/// Opaque geometry is drawn first, blended geometry (sky, grass) afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RenderPass {
    Opaque,
    Transparent,
}

/// Lighting and clear state for one frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Environment {
    pub light: Vector3<f32>,
    pub background: Vector3<f32>,
    pub time: f32,
}

pub trait Renderer {
    /// Called once per frame before any draw.
    fn begin_frame(&mut self, environment: &Environment);

    fn draw(&mut self, drawable: &Drawable, world: &Transform, pass: RenderPass);
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub label: String,
    pub pass: RenderPass,
    pub world: Transform,
}

/// All instances of one drawable in one pass.
#[derive(Clone, Debug, PartialEq)]
pub struct Batch {
    pub label: String,
    pub pass: RenderPass,
    pub vertices: usize,
    pub instances: Vec<InstanceRaw>,
}

/**
 * Records the draw calls of the current frame.
 *
 * Batches keep the order in which their drawable was first drawn.
 */
#[derive(Debug, Default)]
pub struct DrawRecorder {
    frames: usize,
    environment: Option<Environment>,
    calls: Vec<DrawCall>,
    batches: Vec<Batch>,
    batch_index: HashMap<(String, RenderPass), usize>,
}

impl DrawRecorder {
    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn environment(&self) -> Option<&Environment> {
        self.environment.as_ref()
    }

    pub fn calls(&self) -> &[DrawCall] {
        &self.calls
    }

    pub fn batches(&self) -> &[Batch] {
        &self.batches
    }

    pub fn batch(&self, label: &str, pass: RenderPass) -> Option<&Batch> {
        self.batch_index
            .get(&(label.to_string(), pass))
            .map(|idx| &self.batches[*idx])
    }

    pub fn instance_count(&self) -> usize {
        self.batches.iter().map(|b| b.instances.len()).sum()
    }

    /// Bytes an instancing renderer would upload for this frame.
    pub fn instance_bytes(&self) -> usize {
        self.batches
            .iter()
            .map(|b| bytemuck::cast_slice::<InstanceRaw, u8>(&b.instances).len())
            .sum()
    }
}

impl Renderer for DrawRecorder {
    fn begin_frame(&mut self, environment: &Environment) {
        self.frames += 1;
        self.environment = Some(*environment);
        self.calls.clear();
        self.batches.clear();
        self.batch_index.clear();
    }

    fn draw(&mut self, drawable: &Drawable, world: &Transform, pass: RenderPass) {
        self.calls.push(DrawCall {
            label: drawable.label().to_string(),
            pass,
            world: *world,
        });
        let key = (drawable.label().to_string(), pass);
        let idx = match self.batch_index.get(&key) {
            Some(idx) => *idx,
            None => {
                self.batches.push(Batch {
                    label: key.0.clone(),
                    pass,
                    vertices: drawable.mesh().vertex_count(),
                    instances: Vec::new(),
                });
                self.batch_index.insert(key, self.batches.len() - 1);
                self.batches.len() - 1
            }
        };
        self.batches[idx].instances.push(world.to_raw());
    }
}
