//! # Meshing Module
//!
//! Builds renderable geometry from a populated chunk. For every solid voxel,
//! each of the six faces is emitted only when the face-adjacent voxel does
//! not occlude it (face culling): hidden interior faces never reach the
//! buffers. Neighbor lookups inside the chunk read the grid directly;
//! lookups that cross the chunk boundary go through the world's
//! [`VoxelSampler`] so the builder never indexes a foreign chunk's array.
//!
//! ## Determinism
//!
//! Voxels are visited in the fixed `(y, x, z)` order and faces in the fixed
//! [`BlockFace`] order, so repeated builds from identical voxel data produce
//! byte-identical buffers. This is load-bearing: the draw stage compares
//! nothing, it simply replaces, and tests pin the property.

use cgmath::Point3;

use crate::voxels::block::{BlockFace, BlockRegistry};
use crate::voxels::chunk::{Chunk, VoxelState};
use crate::voxels::{
    VoxelSampler, CHUNK_HEIGHT, CHUNK_WIDTH, NORMALIZED_TILE_SIZE, TEXTURE_ATLAS_SIZE_IN_TILES,
    VOXEL_TRIANGLES, VOXEL_VERTICES,
};

pub mod mesh;

pub use mesh::{ChunkMesh, Vertex};

/// Walks a populated voxel grid and produces its mesh buffers.
pub struct MeshBuilder<'a> {
    registry: &'a BlockRegistry,
    sampler: &'a dyn VoxelSampler,
}

impl<'a> MeshBuilder<'a> {
    /// Creates a builder over the given block registry and world boundary
    /// accessor.
    pub fn new(registry: &'a BlockRegistry, sampler: &'a dyn VoxelSampler) -> Self {
        MeshBuilder { registry, sampler }
    }

    /// Builds the mesh for a populated chunk.
    ///
    /// The caller must guarantee the chunk is populated; the state machine
    /// enforces this upstream by only routing populated chunks to the mesh
    /// stage.
    pub fn build(&self, chunk: &Chunk) -> ChunkMesh {
        let origin = chunk.coord().origin();
        let mut out = ChunkMesh::default();

        for y in 0..CHUNK_HEIGHT {
            for x in 0..CHUNK_WIDTH {
                for z in 0..CHUNK_WIDTH {
                    if !chunk.is_solid_local(x as usize, y as usize, z as usize) {
                        continue;
                    }
                    self.add_voxel_faces(chunk, origin, x, y, z, &mut out);
                }
            }
        }

        out
    }

    /// Emits every visible face of one voxel.
    fn add_voxel_faces(
        &self,
        chunk: &Chunk,
        origin: Point3<f32>,
        x: i32,
        y: i32,
        z: i32,
        out: &mut ChunkMesh,
    ) {
        let voxel = chunk.voxel_local(x as usize, y as usize, z as usize);
        let descriptor = self.registry.get(voxel.id);
        let see_through = descriptor.transparency > 0.0;

        for face in BlockFace::all() {
            let offset = face.offset();
            let (nx, ny, nz) = (x + offset[0], y + offset[1], z + offset[2]);

            let neighbor = if Chunk::contains_local(nx, ny, nz) {
                chunk.voxel_local(nx as usize, ny as usize, nz as usize)
            } else {
                // Crossing the chunk boundary: defer to the world accessor.
                self.sampler.voxel_at(Point3::new(
                    origin.x + nx as f32,
                    ny as f32,
                    origin.z + nz as f32,
                ))
            };

            // If the neighbor occludes this face, don't draw it.
            if !self.registry.get(neighbor.id).render_neighbor_faces {
                continue;
            }

            self.add_face(x, y, z, face, descriptor.face_textures[face as usize], neighbor, see_through, out);
        }
    }

    /// Appends one quad (4 vertices, 2 triangles) to the buffers.
    #[allow(clippy::too_many_arguments)]
    fn add_face(
        &self,
        x: i32,
        y: i32,
        z: i32,
        face: BlockFace,
        tile: u32,
        neighbor: VoxelState,
        see_through: bool,
        out: &mut ChunkMesh,
    ) {
        let base = out.vertices.len() as u32;
        let offset = face.offset();
        let normal = [offset[0] as f32, offset[1] as f32, offset[2] as f32];
        let uvs = atlas_uvs(tile);
        // Faces are lit by the cell they are exposed to.
        let color = [0.0, 0.0, 0.0, neighbor.light];

        for corner in 0..4 {
            let vertex = VOXEL_VERTICES[VOXEL_TRIANGLES[face as usize][corner]];
            out.vertices.push(Vertex {
                position: [
                    x as f32 + vertex[0],
                    y as f32 + vertex[1],
                    z as f32 + vertex[2],
                ],
                normal,
                uv: uvs[corner],
                color,
            });
        }

        let indices = if see_through {
            &mut out.transparent_indices
        } else {
            &mut out.opaque_indices
        };
        indices.extend_from_slice(&[base, base + 1, base + 2, base + 2, base + 1, base + 3]);
    }
}

/// The four UV corners of an atlas tile, in quad-corner order
/// (lower-left, upper-left, lower-right, upper-right).
///
/// Tile 0 is the top-left of the atlas: the row index derived from the tile
/// id is flipped on the V axis because image rows grow downward while UV
/// space grows upward.
pub fn atlas_uvs(tile: u32) -> [[f32; 2]; 4] {
    let row = tile / TEXTURE_ATLAS_SIZE_IN_TILES;
    let column = tile % TEXTURE_ATLAS_SIZE_IN_TILES;

    let u = column as f32 * NORMALIZED_TILE_SIZE;
    let v = 1.0 - row as f32 * NORMALIZED_TILE_SIZE - NORMALIZED_TILE_SIZE;

    [
        [u, v],
        [u, v + NORMALIZED_TILE_SIZE],
        [u + NORMALIZED_TILE_SIZE, v],
        [u + NORMALIZED_TILE_SIZE, v + NORMALIZED_TILE_SIZE],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atlas_uvs_flip_rows_from_the_top() {
        let tile_size = NORMALIZED_TILE_SIZE;
        // Tile 0: top-left corner of the atlas.
        let uvs = atlas_uvs(0);
        assert_eq!(uvs[0], [0.0, 1.0 - tile_size]);
        assert_eq!(uvs[3], [tile_size, 1.0]);
        // First tile of the second row.
        let uvs = atlas_uvs(TEXTURE_ATLAS_SIZE_IN_TILES);
        assert_eq!(uvs[0], [0.0, 1.0 - 2.0 * tile_size]);
    }
}
