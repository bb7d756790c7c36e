//! # World Module
//!
//! The top-level orchestrator of the engine. [`WorldState`] owns the sparse
//! chunk map, the pipeline queues, and the generation tables, and exposes the
//! per-stage step functions the workers (or the single-threaded fallback)
//! drive. [`WorldService`] wraps it with the observer-tracking loop, the
//! view-distance activation policy, worker lifecycle, and the main-thread
//! draw stage.
//!
//! ## Ownership Discipline
//!
//! Chunks are stored as [`Shared<Chunk>`]; responsibility for a chunk's
//! mutable state moves between the population, update, and mesh stages via
//! the queues in [`queues::PendingQueues`], never concurrently. Cross-chunk
//! reads (meshing's boundary lookups, solidity probes) go through
//! [`WorldState::voxel_at`], which answers from a populated chunk or falls
//! back to the deterministic terrain function; callers never index a chunk
//! they do not own.

use std::collections::HashMap;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use std::thread::{self, JoinHandle};

use cgmath::Point3;
use log::{debug, info, warn};
use lru::LruCache;

use crate::core::Shared;
use crate::generation::{BiomeProfile, TerrainGenerator};
use crate::lighting::LightPropagator;
use crate::meshing::MeshBuilder;
use crate::voxels::block::{BlockId, BlockRegistry};
use crate::voxels::chunk::{Chunk, ChunkCoord, ChunkStage, VoxelEdit, VoxelState};
use crate::voxels::{is_voxel_in_world, VoxelSampler, WORLD_SIZE_IN_VOXELS};

pub mod pipeline;
pub mod queues;
pub mod render_sink;
pub mod settings;

pub use render_sink::{NullRenderSink, RenderSink};
pub use settings::Settings;

use queues::PendingQueues;

/// Chunk objects allocated from the create queue per tick.
const CHUNKS_CREATED_PER_TICK: usize = 8;
/// Mesh hand-offs performed per tick on the draw stage.
const MESHES_DRAWN_PER_TICK: usize = 4;

/// Decrements the in-flight work counter when a stage finishes an item.
struct WorkGuard<'a> {
    counter: &'a AtomicUsize,
}

impl Drop for WorkGuard<'_> {
    fn drop(&mut self) {
        self.counter.fetch_sub(1, Ordering::SeqCst);
    }
}

/// The shared world: generation tables, chunk storage, and pipeline queues.
///
/// One `Arc<WorldState>` is shared between the game loop and the worker
/// threads; everything mutable inside is individually synchronized.
pub struct WorldState {
    terrain: TerrainGenerator,
    registry: BlockRegistry,
    settings: Settings,
    chunks: RwLock<HashMap<ChunkCoord, Shared<Chunk>>>,
    queues: PendingQueues,
    shutdown: AtomicBool,
    in_flight: AtomicUsize,
}

impl WorldState {
    /// Creates the world state for a seed, biome, block table, and settings.
    pub fn new(seed: u32, biome: BiomeProfile, registry: BlockRegistry, settings: Settings) -> Self {
        WorldState {
            terrain: TerrainGenerator::new(seed, biome),
            registry,
            settings,
            chunks: RwLock::new(HashMap::new()),
            queues: PendingQueues::new(),
            shutdown: AtomicBool::new(false),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// The block registry this world was loaded with.
    pub fn registry(&self) -> &BlockRegistry {
        &self.registry
    }

    /// The streaming settings this world was loaded with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The pending-work queues (mainly useful for instrumentation and tests).
    pub fn queues(&self) -> &PendingQueues {
        &self.queues
    }

    /// The terrain generator this world samples.
    pub fn terrain(&self) -> &TerrainGenerator {
        &self.terrain
    }

    /// Whether cooperative shutdown has been signalled.
    pub fn is_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::SeqCst)
    }

    /// Signals every worker loop to exit at its next iteration.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::SeqCst);
    }

    /// Whether no stage currently holds a popped work item and all queues are
    /// empty.
    pub fn is_idle(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst) == 0 && self.queues.is_idle()
    }

    fn begin_work(&self) -> WorkGuard<'_> {
        self.in_flight.fetch_add(1, Ordering::SeqCst);
        WorkGuard {
            counter: &self.in_flight,
        }
    }

    /// Returns the chunk at a coordinate, if one has been created.
    pub fn chunk_at(&self, coord: ChunkCoord) -> Option<Shared<Chunk>> {
        self.chunks.read().unwrap().get(&coord).cloned()
    }

    /// The current pipeline stage of a chunk, if it exists.
    pub fn chunk_stage(&self, coord: ChunkCoord) -> Option<ChunkStage> {
        self.chunk_at(coord).map(|chunk| chunk.read().stage())
    }

    /// Number of resident chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.read().unwrap().len()
    }

    /// Returns the chunk at a coordinate, allocating and scheduling it for
    /// population if absent.
    ///
    /// The coordinate map holds at most one entry per coordinate; concurrent
    /// callers race benignly on the same insert.
    pub fn create_chunk_if_absent(&self, coord: ChunkCoord) -> Shared<Chunk> {
        let mut inserted = false;
        let chunk = {
            let mut chunks = self.chunks.write().unwrap();
            chunks
                .entry(coord)
                .or_insert_with(|| {
                    inserted = true;
                    Shared::new(Chunk::new(coord))
                })
                .clone()
        };
        if inserted {
            debug!("chunk {coord:?} created");
            self.queues.load.push_back(coord);
        }
        chunk
    }

    /// Removes a chunk from the map entirely.
    fn remove_chunk(&self, coord: ChunkCoord) {
        self.chunks.write().unwrap().remove(&coord);
        debug!("chunk {coord:?} destroyed");
    }

    /// Surface height of the terrain height map at a world column.
    pub fn terrain_height(&self, x: f32, z: f32) -> i32 {
        self.terrain.terrain_height(x, z)
    }

    /// Reads the voxel state at any world position.
    ///
    /// Out-of-world positions are air. In-world positions are answered from
    /// the owning chunk when it is populated and from the deterministic
    /// terrain function otherwise, so the result never exposes a
    /// half-populated grid.
    pub fn voxel_at(&self, position: Point3<f32>) -> VoxelState {
        if !is_voxel_in_world(position) {
            return VoxelState::AIR;
        }
        let coord = ChunkCoord::from_world(position);
        if let Some(chunk) = self.chunk_at(coord) {
            let guard = chunk.read();
            if guard.is_populated() {
                return guard.voxel_from_world(position);
            }
        }
        VoxelState {
            id: self.terrain.compute_voxel(position),
            light: 1.0,
        }
    }

    /// Whether the voxel at a world position is solid. Out-of-world
    /// positions are not solid.
    pub fn is_voxel_solid(&self, position: Point3<f32>) -> bool {
        self.registry.is_solid(self.voxel_at(position).id)
    }

    /// Overwrites one voxel and schedules every affected chunk for remesh.
    ///
    /// Edits against chunks that are missing or still populating are routed
    /// through the deferred-modification queue instead of being dropped.
    /// Out-of-world positions are ignored with a warning.
    pub fn edit_voxel(&self, position: Point3<f32>, id: BlockId) {
        if !is_voxel_in_world(position) {
            warn!("edit at {position:?} outside world bounds, ignoring");
            return;
        }
        let coord = ChunkCoord::from_world(position);
        let Some(chunk) = self.chunk_at(coord) else {
            self.queues
                .queue_modifications(vec![VoxelEdit::new(position, id)]);
            return;
        };

        let mut guard = chunk.write();
        if !guard.is_populated() {
            guard.queue_edit(VoxelEdit::new(position, id));
            drop(guard);
            self.queues.mark_for_update(coord);
            return;
        }

        let touched = guard.apply_direct_edit(position, id, &self.registry);
        drop(guard);

        self.queues.mark_for_priority_update(coord);
        for neighbor in touched {
            if self.chunk_at(neighbor).is_some() {
                self.queues.mark_for_priority_update(neighbor);
            }
        }
    }

    /// Drains the deferred-modification queue, routing each edit to its
    /// owning chunk and creating chunks that do not exist yet.
    ///
    /// # Returns
    /// Whether any batch was processed.
    pub fn apply_modifications(&self) -> bool {
        let _work = self.begin_work();
        let Some(first) = self.queues.pop_modifications() else {
            return false;
        };

        let mut batch = first;
        loop {
            let mut touched: Vec<ChunkCoord> = Vec::new();
            for edit in batch {
                if !is_voxel_in_world(edit.position) {
                    // Structures may overhang the world edge; those writes
                    // are normalized away.
                    continue;
                }
                let coord = ChunkCoord::from_world(edit.position);
                let chunk = self.create_chunk_if_absent(coord);
                chunk.write().queue_edit(edit);
                if !touched.contains(&coord) {
                    touched.push(coord);
                }
            }
            for coord in touched {
                self.queues.mark_for_update(coord);
            }

            match self.queues.pop_modifications() {
                Some(next) => batch = next,
                None => break,
            }
        }
        true
    }

    /// Population stage: generates the voxel grid of the next queued chunk.
    ///
    /// # Returns
    /// Whether a queue entry was consumed.
    pub fn load_step(&self) -> bool {
        let _work = self.begin_work();
        let Some(coord) = self.queues.load.pop_front() else {
            return false;
        };
        let Some(chunk) = self.chunk_at(coord) else {
            warn!("chunk {coord:?} vanished before population");
            return true;
        };

        let structures = {
            let mut chunk = chunk.write();
            if chunk.is_populated() {
                Vec::new()
            } else {
                chunk.populate(&self.terrain, &self.registry)
            }
        };
        for batch in structures {
            self.queues.queue_modifications(batch);
        }
        self.queues.mark_for_update(coord);
        debug!("chunk {coord:?} populated");
        true
    }

    /// Update stage: applies queued edits to the next chunk, recomputes its
    /// light, and forwards it to the mesh stage.
    ///
    /// At most [`Settings::edit_budget`] edits are applied per call; a chunk
    /// with a deeper queue is requeued so one flood of edits cannot starve
    /// the rest of the world. The chunk only advances to meshing once its
    /// edit queue is fully drained, preserving FIFO-before-remesh.
    ///
    /// # Returns
    /// Whether a queue entry was consumed.
    pub fn update_step(&self) -> bool {
        let _work = self.begin_work();
        let Some(coord) = self.queues.pop_update() else {
            return false;
        };
        let Some(chunk) = self.chunk_at(coord) else {
            warn!("chunk {coord:?} vanished before update");
            return true;
        };

        let drained = {
            let mut chunk = chunk.write();
            if !chunk.is_populated() {
                // Not yet through the population stage; try again later.
                drop(chunk);
                self.queues.mark_for_update(coord);
                return true;
            }
            chunk.apply_pending_edits(&self.registry, self.settings.edit_budget);
            if chunk.pending_edit_count() == 0 {
                LightPropagator::recompute(&mut chunk, &self.registry);
                true
            } else {
                false
            }
        };

        if drained {
            self.queues.render.push_back_unique(coord);
        } else {
            self.queues.mark_for_update(coord);
        }
        true
    }

    /// Mesh stage: builds the buffers of the next queued chunk and hands
    /// them to the draw queue.
    ///
    /// # Returns
    /// Whether a queue entry was consumed.
    pub fn render_step(&self) -> bool {
        let _work = self.begin_work();
        let Some(coord) = self.queues.render.pop_front() else {
            return false;
        };
        let Some(chunk) = self.chunk_at(coord) else {
            warn!("chunk {coord:?} vanished before meshing");
            return true;
        };

        let mesh = {
            let chunk = chunk.read();
            // The state machine only routes populated chunks here.
            debug_assert!(chunk.is_populated());
            if !chunk.is_populated() {
                warn!("chunk {coord:?} reached the mesh stage unpopulated, requeueing");
                drop(chunk);
                self.queues.render.push_back_unique(coord);
                return true;
            }
            MeshBuilder::new(&self.registry, self).build(&chunk)
        };

        chunk.write().set_stage(ChunkStage::Meshed);
        self.queues.draw.push_back((coord, mesh));
        true
    }
}

impl VoxelSampler for WorldState {
    fn voxel_at(&self, position: Point3<f32>) -> VoxelState {
        WorldState::voxel_at(self, position)
    }
}

/// The engine's public orchestrator: observer tracking, view-distance
/// streaming, worker lifecycle, and the main-thread draw stage.
///
/// All methods must be called from the thread that owns rendering resources;
/// the background workers only ever touch the shared [`WorldState`].
pub struct WorldService {
    state: Arc<WorldState>,
    workers: Vec<JoinHandle<()>>,
    active: Vec<ChunkCoord>,
    dormant: LruCache<ChunkCoord, ()>,
    observer_coord: Option<ChunkCoord>,
}

impl WorldService {
    /// Creates a world and, when threading is enabled, starts its pipeline
    /// workers.
    pub fn new(seed: u32, biome: BiomeProfile, registry: BlockRegistry, settings: Settings) -> Self {
        let retained = settings.retained_chunk_cap.max(1);
        let threaded = settings.enable_threading;
        let state = Arc::new(WorldState::new(seed, biome, registry, settings));
        let workers = if threaded {
            pipeline::spawn_workers(&state)
        } else {
            info!("threading disabled, pipeline stages run on the game loop");
            Vec::new()
        };
        WorldService {
            state,
            workers,
            active: Vec::new(),
            dormant: LruCache::new(NonZeroUsize::new(retained).unwrap()),
            observer_coord: None,
        }
    }

    /// The shared world state.
    pub fn state(&self) -> &Arc<WorldState> {
        &self.state
    }

    /// A suitable observer spawn position: the world center column, just
    /// above the terrain surface.
    pub fn spawn_position(&self) -> Point3<f32> {
        let center = WORLD_SIZE_IN_VOXELS as f32 / 2.0;
        let height = self.state.terrain_height(center, center);
        Point3::new(center, height as f32 + 2.5, center)
    }

    /// Chunk coordinates currently in the active (shown) set.
    pub fn active_chunks(&self) -> &[ChunkCoord] {
        &self.active
    }

    /// Runs one frame of the world: observer tracking, chunk creation, the
    /// single-threaded pipeline fallback, and the draw stage.
    ///
    /// `observer` is the observer's world position this tick. All renderer
    /// hand-offs happen inside this call, on the caller's thread.
    pub fn tick(&mut self, observer: Point3<f32>, sink: &mut dyn RenderSink) {
        let coord = ChunkCoord::from_world(observer);
        if self.observer_coord != Some(coord) && coord.is_in_world() {
            self.observer_coord = Some(coord);
            self.check_view_distance(coord, sink);
        }

        self.pump_create(CHUNKS_CREATED_PER_TICK);

        if !self.state.settings().enable_threading {
            self.state.apply_modifications();
            self.state.load_step();
            self.state.update_step();
            self.state.render_step();
        }

        self.pump_draw(MESHES_DRAWN_PER_TICK, sink);
    }

    /// Submits a block placement at a world position.
    pub fn place_block(&self, position: Point3<f32>, id: BlockId) {
        self.state.edit_voxel(position, id);
    }

    /// Submits a block removal at a world position.
    pub fn remove_block(&self, position: Point3<f32>) {
        self.state.edit_voxel(position, 0);
    }

    /// Whether the voxel at a world position is solid.
    pub fn is_voxel_solid(&self, position: Point3<f32>) -> bool {
        self.state.is_voxel_solid(position)
    }

    /// Pumps the pipeline until it goes idle, then returns.
    ///
    /// In single-threaded mode this is exact: every queued stage runs to
    /// completion before returning. In threaded mode the workers drain their
    /// own queues and this call spins the create/draw stages until the world
    /// reports idle.
    pub fn settle(&mut self, sink: &mut dyn RenderSink) {
        loop {
            let mut progress = self.pump_create(usize::MAX);
            if !self.state.settings().enable_threading {
                progress |= self.state.apply_modifications();
                progress |= self.state.load_step();
                progress |= self.state.update_step();
                progress |= self.state.render_step();
            }
            progress |= self.pump_draw(usize::MAX, sink);

            if !progress && self.state.is_idle() {
                break;
            }
            if self.state.settings().enable_threading {
                thread::yield_now();
            }
        }
    }

    /// Signals the workers to stop and joins them.
    ///
    /// Idempotent; also run on drop. Workers observe the flag at their next
    /// loop iteration, so no chunk is ever abandoned mid-mutation.
    pub fn shutdown(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.state.signal_shutdown();
        for worker in self.workers.drain(..) {
            let name = worker.thread().name().unwrap_or("worker").to_string();
            if worker.join().is_err() {
                warn!("{name} panicked before shutdown");
            }
        }
        info!("world pipeline stopped");
    }

    /// Allocates up to `budget` chunks from the create queue.
    fn pump_create(&mut self, budget: usize) -> bool {
        let mut created = false;
        for _ in 0..budget {
            let Some(coord) = self.state.queues().create.pop_front() else {
                break;
            };
            self.state.create_chunk_if_absent(coord);
            created = true;
        }
        created
    }

    /// Hands up to `budget` built meshes to the renderer.
    ///
    /// Meshes for chunks that left the active set while queued are dropped;
    /// reactivation rebuilds them.
    fn pump_draw(&mut self, budget: usize, sink: &mut dyn RenderSink) -> bool {
        let mut drew = false;
        for _ in 0..budget {
            let Some((coord, mesh)) = self.state.queues().draw.pop_front() else {
                break;
            };
            drew = true;
            if !self.active.contains(&coord) {
                debug!("chunk {coord:?} no longer active, dropping mesh");
                continue;
            }
            sink.upload(coord, &mesh);
            sink.show(coord);
            if let Some(chunk) = self.state.chunk_at(coord) {
                chunk.write().set_stage(ChunkStage::Active);
            }
        }
        drew
    }

    /// Recomputes the active chunk set around a new observer coordinate.
    ///
    /// Every in-range, in-world coordinate is created or reactivated;
    /// chunks that dropped out of range are deactivated exactly once, and
    /// destroyed outright when they also left the load radius or overflow
    /// the dormant-retention cap.
    fn check_view_distance(&mut self, center: ChunkCoord, sink: &mut dyn RenderSink) {
        let view = self.state.settings().view_distance;
        let mut previously_active = std::mem::take(&mut self.active);

        for x in (center.x - view)..(center.x + view) {
            for z in (center.z - view)..(center.z + view) {
                let coord = ChunkCoord::new(x, z);
                if !coord.is_in_world() {
                    continue;
                }

                match self.state.chunk_at(coord) {
                    None => {
                        self.state.queues().create.push_back_unique(coord);
                    }
                    Some(chunk) => {
                        let mut chunk = chunk.write();
                        // Anything populated but not currently shown needs a
                        // fresh pass through update -> mesh -> draw. This
                        // covers dormant chunks and chunks whose mesh was
                        // dropped because they left view mid-pipeline.
                        if chunk.stage() != ChunkStage::Active && chunk.is_populated() {
                            chunk.set_stage(ChunkStage::Populated);
                            drop(chunk);
                            self.dormant.pop(&coord);
                            self.state.queues().mark_for_update(coord);
                        }
                    }
                }

                self.active.push(coord);
                previously_active.retain(|previous| *previous != coord);
            }
        }

        for dead in previously_active {
            self.deactivate(dead, center, sink);
        }
    }

    /// Deactivates one chunk that left the view window.
    fn deactivate(&mut self, coord: ChunkCoord, center: ChunkCoord, sink: &mut dyn RenderSink) {
        if let Some(chunk) = self.state.chunk_at(coord) {
            chunk.write().set_stage(ChunkStage::Inactive);
        }
        sink.hide(coord);
        debug!("chunk {coord:?} deactivated");

        let load = self.state.settings().load_distance;
        let outside_load_radius =
            (coord.x - center.x).abs() > load || (coord.z - center.z).abs() > load;
        if outside_load_radius {
            self.destroy(coord, sink);
            return;
        }

        if let Some((evicted, ())) = self.dormant.push(coord, ()) {
            if evicted != coord {
                self.destroy(evicted, sink);
            }
        }
    }

    /// Destroys a chunk outright, releasing engine and renderer resources.
    fn destroy(&mut self, coord: ChunkCoord, sink: &mut dyn RenderSink) {
        self.dormant.pop(&coord);
        self.state.remove_chunk(coord);
        sink.retire(coord);
    }
}

impl Drop for WorldService {
    fn drop(&mut self) {
        self.shutdown();
    }
}
