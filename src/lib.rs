//! glade-ngin
//!
//! Procedural meadow scene core. Meshes are built procedurally, placed on a
//! Gaussian bump terrain and posed through small scene-graph hierarchies. Every
//! frame the scene is handed to a [`render::Renderer`], which receives each
//! drawable with its world transform, ready for instanced drawing.
//!
//! High-level modules
//! - `data_structures`: meshes, primitive and composite builders, terrain,
//!   transforms and the scene graph
//! - `entities`: populations of trees, mushrooms, mosquitoes, snakes, skulls,
//!   grass, plus the sky and the earth block
//! - `error`: typed errors of the core
//! - `flow`: timer and the headless frame loop
//! - `render`: renderer seam and the recording renderer
//! - `resources`: OBJ and texture loading, GPU vertex packing
//! - `scene`: scene configuration and per frame orchestration
//!

pub mod data_structures;
pub mod entities;
pub mod error;
pub mod flow;
pub mod render;
pub mod resources;
pub mod scene;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;
