//! The boundary to the external renderer.

use crate::meshing::ChunkMesh;
use crate::voxels::chunk::ChunkCoord;

/// Receives mesh buffers and visibility changes from the world.
///
/// The engine does not draw; it hands each chunk's buffers across this trait
/// and tells the renderer when a chunk's visual representation should appear,
/// disappear, or be discarded. All calls arrive on the thread that pumps
/// [`crate::world::WorldService::tick`], the thread that owns rendering
/// resources, never from a background worker.
pub trait RenderSink {
    /// Delivers freshly built mesh buffers for a chunk, replacing any
    /// previous buffers for the same coordinate.
    fn upload(&mut self, coord: ChunkCoord, mesh: &ChunkMesh);

    /// Makes the chunk's visual representation visible.
    fn show(&mut self, coord: ChunkCoord);

    /// Hides the chunk's visual representation, keeping nothing visible but
    /// allowing the consumer to retain resources for a later [`RenderSink::show`].
    fn hide(&mut self, coord: ChunkCoord);

    /// Discards all renderer resources for the chunk; it left the load
    /// radius and will be regenerated from scratch if it ever returns.
    fn retire(&mut self, coord: ChunkCoord);
}

/// A sink that discards everything. Useful for headless runs and tests.
#[derive(Debug, Default)]
pub struct NullRenderSink;

impl RenderSink for NullRenderSink {
    fn upload(&mut self, _coord: ChunkCoord, _mesh: &ChunkMesh) {}

    fn show(&mut self, _coord: ChunkCoord) {}

    fn hide(&mut self, _coord: ChunkCoord) {}

    fn retire(&mut self, _coord: ChunkCoord) {}
}
