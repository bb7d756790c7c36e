//! # Meshing Tests
//!
//! Verifies face culling, opaque/transparent submesh separation, boundary
//! lookups through the world accessor, and byte-identical rebuilds.

use blockworld::generation::BiomeProfile;
use blockworld::meshing::MeshBuilder;
use blockworld::voxels::block::{BlockKind, BlockRegistry};
use blockworld::voxels::chunk::{Chunk, ChunkCoord, VoxelState};
use blockworld::voxels::VoxelSampler;
use blockworld::world::{Settings, WorldState};
use cgmath::Point3;

/// A sampler over an empty world: everything outside the chunk is air.
struct EmptySampler;

impl VoxelSampler for EmptySampler {
    fn voxel_at(&self, _position: Point3<f32>) -> VoxelState {
        VoxelState::AIR
    }
}

fn treeless_settings() -> (BiomeProfile, Settings) {
    (
        BiomeProfile {
            tree_zone_threshold: 2.0,
            ..BiomeProfile::grassland()
        },
        Settings {
            enable_threading: false,
            ..Settings::default()
        },
    )
}

/// Test: a 3x3x3 solid cube produces exactly its 54 outer faces; the fully
/// enclosed center voxel emits nothing.
#[test]
fn test_enclosed_voxel_emits_no_faces() {
    let registry = BlockRegistry::with_defaults();
    let mut chunk = Chunk::new(ChunkCoord::new(10, 10));
    for x in 4..7 {
        for y in 4..7 {
            for z in 4..7 {
                chunk.set_voxel_local(x, y, z, BlockKind::Stone as u8, &registry);
            }
        }
    }

    let mesh = MeshBuilder::new(&registry, &EmptySampler).build(&chunk);

    // 6 sides x 9 visible faces, 4 vertices and 6 indices per face.
    assert_eq!(mesh.vertices.len(), 54 * 4);
    assert_eq!(mesh.opaque_indices.len(), 54 * 6);
    assert!(mesh.transparent_indices.is_empty());
}

/// Test: a single isolated voxel emits all six faces.
#[test]
fn test_isolated_voxel_emits_six_faces() {
    let registry = BlockRegistry::with_defaults();
    let mut chunk = Chunk::new(ChunkCoord::new(10, 10));
    chunk.set_voxel_local(8, 8, 8, BlockKind::Dirt as u8, &registry);

    let mesh = MeshBuilder::new(&registry, &EmptySampler).build(&chunk);

    assert_eq!(mesh.vertices.len(), 6 * 4);
    assert_eq!(mesh.opaque_indices.len(), 6 * 6);
}

/// Test: see-through solids index into the transparent list, and faces
/// between a solid and a see-through block are still drawn.
#[test]
fn test_transparent_blocks_split_into_second_submesh() {
    let registry = BlockRegistry::with_defaults();
    let mut chunk = Chunk::new(ChunkCoord::new(10, 10));
    chunk.set_voxel_local(8, 8, 8, BlockKind::Stone as u8, &registry);
    chunk.set_voxel_local(8, 9, 8, BlockKind::Glass as u8, &registry);

    let mesh = MeshBuilder::new(&registry, &EmptySampler).build(&chunk);

    // The stone cube keeps all 6 faces: its top neighbor is glass, which
    // renders neighbor faces. The glass cube emits its own 6 faces into the
    // transparent list (stone below it does not render neighbor faces, so
    // glass loses its bottom face).
    assert_eq!(mesh.opaque_indices.len(), 6 * 6);
    assert_eq!(mesh.transparent_indices.len(), 5 * 6);
}

/// Test: rebuilding a mesh from unchanged voxel data is byte-identical.
#[test]
fn test_mesh_rebuild_is_byte_identical() {
    let (biome, settings) = treeless_settings();
    let state = WorldState::new(42, biome, BlockRegistry::with_defaults(), settings);
    let chunk = state.create_chunk_if_absent(ChunkCoord::new(20, 20));
    assert!(state.load_step());

    let first = {
        let chunk = chunk.read();
        MeshBuilder::new(state.registry(), &state).build(&chunk)
    };
    let second = {
        let chunk = chunk.read();
        MeshBuilder::new(state.registry(), &state).build(&chunk)
    };

    assert_eq!(first.vertex_bytes(), second.vertex_bytes());
    assert_eq!(first.opaque_indices, second.opaque_indices);
    assert_eq!(first.transparent_indices, second.transparent_indices);
    assert!(!first.is_empty());
}

/// Test: boundary faces consult the neighbor chunk through the world
/// accessor - carving a voxel out of the neighbor's shared wall exposes
/// exactly one extra face in this chunk's mesh.
#[test]
fn test_boundary_culling_reads_neighbor_chunk() {
    let (biome, settings) = treeless_settings();
    let state = WorldState::new(42, biome, BlockRegistry::with_defaults(), settings);
    let a = state.create_chunk_if_absent(ChunkCoord::new(20, 20));
    let b = state.create_chunk_if_absent(ChunkCoord::new(21, 20));
    assert!(state.load_step());
    assert!(state.load_step());

    let before = {
        let chunk = a.read();
        MeshBuilder::new(state.registry(), &state).build(&chunk)
    };

    // Carve an air pocket into the neighbor's wall, deep underground where
    // both sides are guaranteed solid.
    b.write()
        .set_voxel_local(0, 5, 8, BlockKind::Air as u8, state.registry());

    let after = {
        let chunk = a.read();
        MeshBuilder::new(state.registry(), &state).build(&chunk)
    };

    assert_eq!(after.vertices.len(), before.vertices.len() + 4);
    assert_eq!(after.opaque_indices.len(), before.opaque_indices.len() + 6);
}
