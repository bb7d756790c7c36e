//! # Chunk Module
//!
//! This module provides the per-chunk voxel grid and its lifecycle state.
//! A chunk owns a dense `CHUNK_WIDTH x CHUNK_HEIGHT x CHUNK_WIDTH` array of
//! [`VoxelState`] plus a solidity bitmask sidecar, and moves through the
//! pipeline stages `Inactive -> Populated -> Meshed -> Active` as the create,
//! load, update, and mesh stages hand it along.
//!
//! ## Publish-after-complete
//!
//! A chunk's grid is written in full before `populated` flips to true, and
//! every consumer (edit application, lighting, meshing, neighbor queries)
//! checks that flag before reading. No stage ever observes a half-written
//! grid; unpopulated chunks are answered from the deterministic terrain
//! function at the world boundary instead.

use std::collections::VecDeque;

use bitvec::prelude::BitVec;
use cgmath::Point3;
use log::warn;

use crate::generation::terrain::TerrainGenerator;
use crate::voxels::block::{BlockId, BlockRegistry};
use crate::voxels::{CHUNK_HEIGHT, CHUNK_VOLUME, CHUNK_WIDTH, WORLD_SIZE_IN_CHUNKS};

/// Identifies a chunk's cell in the 2D chunk grid.
///
/// A value type: equality and hashing are by component, which makes it the
/// key of the world's sparse chunk map and the payload of every pipeline
/// queue.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct ChunkCoord {
    /// Chunk grid X.
    pub x: i32,
    /// Chunk grid Z.
    pub z: i32,
}

impl ChunkCoord {
    /// Creates a coordinate from chunk-grid components.
    pub fn new(x: i32, z: i32) -> Self {
        ChunkCoord { x, z }
    }

    /// Returns the coordinate of the chunk containing a world position.
    pub fn from_world(position: Point3<f32>) -> Self {
        ChunkCoord {
            x: (position.x / CHUNK_WIDTH as f32).floor() as i32,
            z: (position.z / CHUNK_WIDTH as f32).floor() as i32,
        }
    }

    /// Returns the world position of this chunk's minimum corner.
    pub fn origin(&self) -> Point3<f32> {
        Point3::new(
            (self.x * CHUNK_WIDTH) as f32,
            0.0,
            (self.z * CHUNK_WIDTH) as f32,
        )
    }

    /// Returns whether this coordinate lies inside the fixed world.
    pub fn is_in_world(&self) -> bool {
        self.x >= 0 && self.x < WORLD_SIZE_IN_CHUNKS && self.z >= 0 && self.z < WORLD_SIZE_IN_CHUNKS
    }
}

/// The state of one voxel: a block id and its derived light level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VoxelState {
    /// Block type id; 0 is air.
    pub id: BlockId,
    /// Ambient light in `[0, 1]`, recomputed by the light pass.
    pub light: f32,
}

impl VoxelState {
    /// Air at full light; the defined default for out-of-world queries.
    pub const AIR: VoxelState = VoxelState { id: 0, light: 1.0 };
}

/// Lifecycle stage of a chunk within the streaming pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChunkStage {
    /// Allocated but not visible; also the dormant state after deactivation.
    Inactive,
    /// Voxel grid fully generated.
    Populated,
    /// Mesh built and queued for hand-off to the renderer.
    Meshed,
    /// Mesh handed to the render graph and shown.
    Active,
}

/// A single deferred voxel write, targeted by world position.
///
/// Produced by player edits and by structure generation; consumed exactly
/// once by the owning chunk's edit-application step.
#[derive(Clone, Debug, PartialEq)]
pub struct VoxelEdit {
    /// World position of the voxel to overwrite.
    pub position: Point3<f32>,
    /// The new block id.
    pub id: BlockId,
}

impl VoxelEdit {
    /// Creates an edit setting the voxel at `position` to `id`.
    pub fn new(position: Point3<f32>, id: BlockId) -> Self {
        VoxelEdit { position, id }
    }
}

/// A fixed-size column of voxels and its pipeline bookkeeping.
pub struct Chunk {
    coord: ChunkCoord,
    voxels: Vec<VoxelState>,
    solid: BitVec,
    pending_edits: VecDeque<VoxelEdit>,
    stage: ChunkStage,
    populated: bool,
}

impl Chunk {
    /// Allocates an empty, unpopulated chunk at the given coordinate.
    pub fn new(coord: ChunkCoord) -> Self {
        Chunk {
            coord,
            voxels: vec![VoxelState { id: 0, light: 0.0 }; CHUNK_VOLUME],
            solid: BitVec::repeat(false, CHUNK_VOLUME),
            pending_edits: VecDeque::new(),
            stage: ChunkStage::Inactive,
            populated: false,
        }
    }

    /// This chunk's grid coordinate.
    pub fn coord(&self) -> ChunkCoord {
        self.coord
    }

    /// The chunk's current pipeline stage.
    pub fn stage(&self) -> ChunkStage {
        self.stage
    }

    /// Moves the chunk to a new pipeline stage.
    pub fn set_stage(&mut self, stage: ChunkStage) {
        self.stage = stage;
    }

    /// Whether the voxel grid has been fully generated.
    ///
    /// Consumers must check this before reading voxels; it flips to true only
    /// after every cell of the grid has been written.
    pub fn is_populated(&self) -> bool {
        self.populated
    }

    /// Row-major index of a local coordinate, iteration order `(y, x, z)`.
    fn index(x: usize, y: usize, z: usize) -> usize {
        (y * CHUNK_WIDTH as usize + x) * CHUNK_WIDTH as usize + z
    }

    /// Returns whether a local coordinate lies inside this chunk.
    pub fn contains_local(x: i32, y: i32, z: i32) -> bool {
        x >= 0 && x < CHUNK_WIDTH && y >= 0 && y < CHUNK_HEIGHT && z >= 0 && z < CHUNK_WIDTH
    }

    /// Reads the voxel at a local coordinate.
    pub fn voxel_local(&self, x: usize, y: usize, z: usize) -> VoxelState {
        self.voxels[Self::index(x, y, z)]
    }

    /// Fast solidity check against the bitmask sidecar.
    pub fn is_solid_local(&self, x: usize, y: usize, z: usize) -> bool {
        self.solid[Self::index(x, y, z)]
    }

    /// Overwrites one voxel's block id, keeping its light value, and updates
    /// the solidity bitmask.
    pub fn set_voxel_local(
        &mut self,
        x: usize,
        y: usize,
        z: usize,
        id: BlockId,
        registry: &BlockRegistry,
    ) {
        let index = Self::index(x, y, z);
        self.voxels[index].id = id;
        self.solid.set(index, registry.is_solid(id));
    }

    pub(crate) fn light_local(&self, x: usize, y: usize, z: usize) -> f32 {
        self.voxels[Self::index(x, y, z)].light
    }

    pub(crate) fn set_light_local(&mut self, x: usize, y: usize, z: usize, light: f32) {
        self.voxels[Self::index(x, y, z)].light = light;
    }

    /// Converts a world position into this chunk's local coordinates.
    ///
    /// Returns `None` if the position is not inside this chunk.
    pub fn to_local(&self, position: Point3<f32>) -> Option<(usize, usize, usize)> {
        let origin = self.coord.origin();
        let x = position.x.floor() as i32 - origin.x as i32;
        let y = position.y.floor() as i32;
        let z = position.z.floor() as i32 - origin.z as i32;
        if Self::contains_local(x, y, z) {
            Some((x as usize, y as usize, z as usize))
        } else {
            None
        }
    }

    /// Reads the voxel at a world position that falls inside this chunk.
    ///
    /// Positions outside the chunk are normalized to air with a warning; they
    /// indicate a caller that should have gone through the world's boundary
    /// accessor instead.
    pub fn voxel_from_world(&self, position: Point3<f32>) -> VoxelState {
        match self.to_local(position) {
            Some((x, y, z)) => self.voxel_local(x, y, z),
            None => {
                warn!(
                    "world position {:?} queried against chunk {:?}, normalizing to air",
                    position, self.coord
                );
                VoxelState::AIR
            }
        }
    }

    /// Generates the full voxel grid from the terrain function.
    ///
    /// Every cell is written before `populated` flips to true, so readers that
    /// gate on [`Chunk::is_populated`] never observe a partial grid. Structure
    /// batches emitted by tree gating are returned for the caller to push into
    /// the world's deferred-modification queue; population itself never writes
    /// outside this chunk.
    pub fn populate(
        &mut self,
        terrain: &TerrainGenerator,
        registry: &BlockRegistry,
    ) -> Vec<Vec<VoxelEdit>> {
        let origin = self.coord.origin();
        let mut structures = Vec::new();

        for y in 0..CHUNK_HEIGHT as usize {
            for x in 0..CHUNK_WIDTH as usize {
                for z in 0..CHUNK_WIDTH as usize {
                    let position = Point3::new(
                        origin.x + x as f32,
                        y as f32,
                        origin.z + z as f32,
                    );
                    let (id, structure) = terrain.generate(position);
                    let index = Self::index(x, y, z);
                    self.voxels[index] = VoxelState { id, light: 0.0 };
                    self.solid.set(index, registry.is_solid(id));
                    if let Some(batch) = structure {
                        structures.push(batch);
                    }
                }
            }
        }

        self.populated = true;
        self.stage = ChunkStage::Populated;
        structures
    }

    /// Appends an edit to this chunk's FIFO edit queue.
    pub fn queue_edit(&mut self, edit: VoxelEdit) {
        self.pending_edits.push_back(edit);
    }

    /// Number of edits still waiting to be applied.
    pub fn pending_edit_count(&self) -> usize {
        self.pending_edits.len()
    }

    /// Applies up to `budget` queued edits in submission order.
    ///
    /// Each edit overwrites exactly one voxel's block id; light is recomputed
    /// by the caller once the queue drains, not per edit. Edits whose position
    /// does not fall inside this chunk are dropped with a warning, since the
    /// modification applier routes batches by chunk coordinate.
    ///
    /// # Returns
    /// The number of edits applied.
    pub fn apply_pending_edits(&mut self, registry: &BlockRegistry, budget: usize) -> usize {
        let mut applied = 0;
        while applied < budget {
            let Some(edit) = self.pending_edits.pop_front() else {
                break;
            };
            match self.to_local(edit.position) {
                Some((x, y, z)) => {
                    self.set_voxel_local(x, y, z, edit.id, registry);
                    applied += 1;
                }
                None => {
                    warn!(
                        "edit at {:?} routed to chunk {:?}, dropping",
                        edit.position, self.coord
                    );
                }
            }
        }
        applied
    }

    /// Applies a direct (player) edit immediately.
    ///
    /// Overwrites the voxel and returns the coordinates of every neighbor
    /// chunk sharing a boundary face with the edited voxel, since an edit on
    /// a chunk edge can change the visible face set of the adjacent chunk.
    /// The caller is responsible for marking this chunk and the returned
    /// neighbors for remesh.
    pub fn apply_direct_edit(
        &mut self,
        position: Point3<f32>,
        id: BlockId,
        registry: &BlockRegistry,
    ) -> Vec<ChunkCoord> {
        let Some((x, y, z)) = self.to_local(position) else {
            warn!(
                "direct edit at {:?} outside chunk {:?}, ignoring",
                position, self.coord
            );
            return Vec::new();
        };
        self.set_voxel_local(x, y, z, id, registry);

        let mut touched = Vec::new();
        for offset in crate::voxels::FACE_CHECKS {
            let nx = x as i32 + offset[0];
            let nz = z as i32 + offset[2];
            if Self::contains_local(nx, y as i32 + offset[1], nz) {
                continue;
            }
            let neighbor = ChunkCoord::new(
                self.coord.x + offset[0],
                self.coord.z + offset[2],
            );
            if neighbor != self.coord && neighbor.is_in_world() && !touched.contains(&neighbor) {
                touched.push(neighbor);
            }
        }
        touched
    }
}
