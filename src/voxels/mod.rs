//! # Voxels Module
//!
//! This module provides the voxel-level data model: world and chunk
//! dimensions, the shared cube geometry tables used by meshing, block type
//! descriptors, and the chunk storage itself.
//!
//! ## Coordinate Conventions
//!
//! World positions are `cgmath::Point3<f32>` in voxel units; a voxel occupies
//! the unit cube whose minimum corner is the floor of the position. Chunks are
//! columns of `CHUNK_WIDTH x CHUNK_HEIGHT x CHUNK_WIDTH` voxels identified by
//! a 2D [`chunk::ChunkCoord`]. Local coordinates index into a chunk and are
//! always in `[0, dimension)`; anything outside a chunk must go through the
//! world's boundary accessor rather than indexing a foreign chunk directly.

use cgmath::Point3;

pub mod block;
pub mod chunk;

/// The width and depth of a chunk in voxels.
pub const CHUNK_WIDTH: i32 = 16;
/// The height of a chunk in voxels. Chunks span the full world height.
pub const CHUNK_HEIGHT: i32 = 128;
/// The number of voxels in a single chunk.
pub const CHUNK_VOLUME: usize = (CHUNK_WIDTH * CHUNK_HEIGHT * CHUNK_WIDTH) as usize;

/// The fixed world size along each horizontal axis, in chunks.
pub const WORLD_SIZE_IN_CHUNKS: i32 = 64;
/// The fixed world size along each horizontal axis, in voxels.
pub const WORLD_SIZE_IN_VOXELS: i32 = WORLD_SIZE_IN_CHUNKS * CHUNK_WIDTH;

/// The texture atlas is a square grid of this many tiles per side.
pub const TEXTURE_ATLAS_SIZE_IN_TILES: u32 = 16;
/// The normalized UV extent of a single atlas tile.
pub const NORMALIZED_TILE_SIZE: f32 = 1.0 / TEXTURE_ATLAS_SIZE_IN_TILES as f32;

/// The eight corners of a unit voxel cube, indexed by the entries of
/// [`VOXEL_TRIANGLES`].
pub const VOXEL_VERTICES: [[f32; 3]; 8] = [
    [0.0, 0.0, 0.0],
    [1.0, 0.0, 0.0],
    [1.0, 1.0, 0.0],
    [0.0, 1.0, 0.0],
    [0.0, 0.0, 1.0],
    [1.0, 0.0, 1.0],
    [1.0, 1.0, 1.0],
    [0.0, 1.0, 1.0],
];

/// Offsets to the face-adjacent voxel for each face, in
/// [`block::BlockFace`] order. Doubles as the face normal.
pub const FACE_CHECKS: [[i32; 3]; 6] = [
    [0, 1, 0],  // Top
    [0, 0, 1],  // Front
    [1, 0, 0],  // Right
    [0, 0, -1], // Back
    [-1, 0, 0], // Left
    [0, -1, 0], // Bottom
];

/// Corner indices into [`VOXEL_VERTICES`] for the quad of each face, in
/// [`block::BlockFace`] order. The four corners are emitted in the order
/// (lower-left, upper-left, lower-right, upper-right) relative to the face's
/// UV rectangle, matching the index pattern `0,1,2,2,1,3`.
pub const VOXEL_TRIANGLES: [[usize; 4]; 6] = [
    [3, 7, 2, 6], // Top
    [5, 6, 4, 7], // Front
    [1, 2, 5, 6], // Right
    [0, 3, 1, 2], // Back
    [4, 7, 0, 3], // Left
    [1, 5, 0, 4], // Bottom
];

/// Returns whether a world position falls inside the world's voxel bounds.
pub fn is_voxel_in_world(position: Point3<f32>) -> bool {
    position.x >= 0.0
        && position.x < WORLD_SIZE_IN_VOXELS as f32
        && position.y >= 0.0
        && position.y < CHUNK_HEIGHT as f32
        && position.z >= 0.0
        && position.z < WORLD_SIZE_IN_VOXELS as f32
}

/// Read access to voxel state at arbitrary world positions.
///
/// This is the boundary between a single chunk and the rest of the world:
/// meshing consults it for every face-adjacent voxel that falls outside the
/// chunk being built. The world implements it by looking up the owning chunk
/// when one is populated and falling back to the deterministic terrain
/// function when it is not, so out-of-chunk queries never observe a
/// half-populated grid.
pub trait VoxelSampler {
    /// Returns the voxel state at a world position.
    ///
    /// Out-of-world positions yield air at full light; this is a defined
    /// default, not an error.
    fn voxel_at(&self, position: Point3<f32>) -> chunk::VoxelState;
}
