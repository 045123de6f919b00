//! Procedural data structures: meshes, transforms, terrain and scene graphs.
//!
//! - `mesh` is the CPU triangle mesh every builder produces
//! - `transform` holds per node transformation data and the fixed frame changes
//! - `primitives` builds parametric shapes (cylinder, cone, sphere, ...)
//! - `composite` assembles primitives into organisms
//! - `terrain` is the Gaussian bump height field and the spawn position sampler
//! - `drawable` pairs a mesh with its material
//! - `scene_graph` enables hierarchical scene organization

pub mod composite;
pub mod drawable;
pub mod mesh;
pub mod primitives;
pub mod scene_graph;
pub mod terrain;
pub mod transform;
