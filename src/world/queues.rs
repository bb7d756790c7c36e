//! # Pipeline Queues
//!
//! The pending-work queues the pipeline stages communicate through, with one
//! documented lock discipline:
//!
//! - `create`, `load`, `render`, and `draw` are independent [`WorkQueue`]s;
//!   their internal mutex is held only per push/pop.
//! - The update queue and the deferred-modification queue share a single
//!   world-scoped mutex, because the game loop, the population stage, and
//!   the update stage all insert into them concurrently and the modification
//!   applier moves entries from one to the other.
//!
//! No queue lock is ever held while acquiring a chunk lock or the chunk-map
//! lock; stages pop, release, and then work.

use std::collections::VecDeque;
use std::sync::Mutex;

use crate::core::WorkQueue;
use crate::meshing::ChunkMesh;
use crate::voxels::chunk::{ChunkCoord, VoxelEdit};

/// Update-stage state guarded by the world update lock: the chunks awaiting
/// edit application + relight, and the deferred cross-chunk edit batches.
struct UpdateState {
    queue: VecDeque<ChunkCoord>,
    modifications: VecDeque<Vec<VoxelEdit>>,
}

/// All pending-work queues of one world.
pub struct PendingQueues {
    /// Coordinates needing a chunk object allocated (lazy instantiation).
    pub create: WorkQueue<ChunkCoord>,
    /// Chunks awaiting voxel population.
    pub load: WorkQueue<ChunkCoord>,
    /// Populated chunks awaiting a mesh (re)build.
    pub render: WorkQueue<ChunkCoord>,
    /// Built meshes awaiting main-thread hand-off to the renderer.
    pub draw: WorkQueue<(ChunkCoord, ChunkMesh)>,
    update: Mutex<UpdateState>,
}

impl PendingQueues {
    /// Creates the empty queue set.
    pub fn new() -> Self {
        PendingQueues {
            create: WorkQueue::new(),
            load: WorkQueue::new(),
            render: WorkQueue::new(),
            draw: WorkQueue::new(),
            update: Mutex::new(UpdateState {
                queue: VecDeque::new(),
                modifications: VecDeque::new(),
            }),
        }
    }

    /// Marks a chunk as needing edit application + remesh, at the back of
    /// the update queue. Already-queued chunks are not duplicated.
    pub fn mark_for_update(&self, coord: ChunkCoord) {
        let mut update = self.update.lock().unwrap();
        if !update.queue.contains(&coord) {
            update.queue.push_back(coord);
        }
    }

    /// Marks a chunk for update ahead of all queued streaming work. Direct
    /// player edits use this so they remesh before the world catches up.
    pub fn mark_for_priority_update(&self, coord: ChunkCoord) {
        let mut update = self.update.lock().unwrap();
        update.queue.retain(|queued| *queued != coord);
        update.queue.push_front(coord);
    }

    /// Takes the next chunk awaiting update, if any.
    pub fn pop_update(&self) -> Option<ChunkCoord> {
        self.update.lock().unwrap().queue.pop_front()
    }

    /// Appends a deferred edit batch (e.g. a planned tree) for the
    /// modification applier.
    pub fn queue_modifications(&self, batch: Vec<VoxelEdit>) {
        if batch.is_empty() {
            return;
        }
        self.update.lock().unwrap().modifications.push_back(batch);
    }

    /// Takes the next deferred edit batch, if any.
    pub fn pop_modifications(&self) -> Option<Vec<VoxelEdit>> {
        self.update.lock().unwrap().modifications.pop_front()
    }

    /// Whether every queue, including the update and modification queues,
    /// is currently empty.
    pub fn is_idle(&self) -> bool {
        let update = self.update.lock().unwrap();
        update.queue.is_empty()
            && update.modifications.is_empty()
            && self.create.is_empty()
            && self.load.is_empty()
            && self.render.is_empty()
            && self.draw.is_empty()
    }
}

impl Default for PendingQueues {
    fn default() -> Self {
        Self::new()
    }
}
