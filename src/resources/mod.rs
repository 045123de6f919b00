/**
 * This module contains all logic for loading meshes and textures from external files
 * and packing them into GPU buffers.
 */
pub mod mesh;
pub mod texture;
