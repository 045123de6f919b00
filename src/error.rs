//! Error types of the procedural core.
//!
//! Mesh builders, the scene graph and the terrain engine report failures as
//! typed values so callers can tell a bad parameter from a broken hierarchy.
//! Loaders and the scene orchestrator wrap these in `anyhow` errors.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum MeshError {
    #[error("invalid mesh parameter `{name}`: {value} ({reason})")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },
    #[error("invalid sample count {samples}, at least {min} required")]
    TooFewSamples { samples: usize, min: usize },
    #[error("triangle {triangle} references vertex {index} but the mesh has {count} positions")]
    IndexOutOfRange {
        triangle: usize,
        index: u32,
        count: usize,
    },
    #[error("mesh has {positions} positions but {uvs} texture coordinates")]
    UvMismatch { positions: usize, uvs: usize },
    #[error("{count} vertices cannot be addressed by 32 bit indices")]
    TooManyVertices { count: usize },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HierarchyError {
    #[error("node `{0}` is already registered")]
    DuplicateNode(String),
    #[error("parent `{parent}` of node `{node}` is not registered")]
    UnknownParent { node: String, parent: String },
    #[error("node `{0}` is not registered")]
    UnknownNode(String),
    #[error("global transforms are stale, recompute them before reading or drawing")]
    StaleTransforms,
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TerrainError {
    #[error("terrain length must be positive and finite, got {0}")]
    InvalidLength(f32),
    #[error("sampling extent {0} leaves no room inside the one unit border")]
    InvalidExtent(f32),
    #[error(
        "placed {placed} of {requested} positions after {attempts} attempts, the constraints are likely infeasible for this extent"
    )]
    SamplingExhausted {
        requested: usize,
        placed: usize,
        attempts: usize,
    },
    #[error(transparent)]
    Mesh(#[from] MeshError),
}

pub(crate) fn positive(name: &'static str, value: f32) -> Result<f32, MeshError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(MeshError::InvalidParameter {
            name,
            value,
            reason: "must be positive and finite",
        })
    }
}

pub(crate) fn finite(name: &'static str, value: f32) -> Result<f32, MeshError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(MeshError::InvalidParameter {
            name,
            value,
            reason: "must be finite",
        })
    }
}
