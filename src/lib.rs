#![warn(missing_docs)]
#![warn(rustdoc::invalid_rust_codeblocks)]

//! # Blockworld
//!
//! A voxel-world engine: generates, stores, lights, meshes, and streams a
//! chunked 3D block grid around a moving observer, with real-time edits.
//!
//! This crate is the simulation core only. It produces mesh buffers and
//! show/hide calls across the [`world::RenderSink`] boundary; input, camera,
//! UI, and the GPU pipeline are external collaborators.
//!
//! ## Key Modules
//!
//! * `core` - Shared concurrency primitives (resource container, work queue)
//! * `voxels` - Block descriptors, chunk storage, and the voxel data model
//! * `generation` - Noise sampling, biomes, terrain, and structure planning
//! * `lighting` - Per-voxel ambient light propagation
//! * `meshing` - Face-culled mesh construction with atlas UV mapping
//! * `world` - The chunk coordinator, worker pipeline, and streaming policy
//!
//! ## Architecture
//!
//! The engine is a staged pipeline. Chunks move through
//! `create -> populate -> update (edits + light) -> mesh -> draw`, each stage
//! feeding the next through explicit FIFO queues. The population, update, and
//! mesh stages run on dedicated worker threads (or inline on the game loop
//! when threading is disabled); the draw stage always runs on the caller's
//! thread, which is the one that owns rendering resources.
//!
//! ## Usage
//!
//! ```no_run
//! use blockworld::generation::BiomeProfile;
//! use blockworld::voxels::block::BlockRegistry;
//! use blockworld::world::{NullRenderSink, Settings, WorldService};
//!
//! let mut world = WorldService::new(
//!     1337,
//!     BiomeProfile::grassland(),
//!     BlockRegistry::with_defaults(),
//!     Settings::default(),
//! );
//! let mut sink = NullRenderSink;
//!
//! let mut observer = world.spawn_position();
//! loop {
//!     // Feed the observer position once per tick; the engine streams
//!     // chunks around it and hands finished meshes to the sink.
//!     world.tick(observer, &mut sink);
//!     observer.x += 0.1;
//! }
//! ```

pub mod core;
pub mod error;
pub mod generation;
pub mod lighting;
pub mod meshing;
pub mod voxels;
pub mod world;

pub use error::WorldError;
pub use world::{RenderSink, Settings, WorldService};
