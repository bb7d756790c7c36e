//! Error types for fallible load-time operations.
//!
//! Runtime voxel access never produces errors; anomalous queries are
//! normalized to safe defaults (air, not-solid) or made unrepresentable by
//! the chunk state machine. Errors exist only where external declarative data
//! enters the engine.

use thiserror::Error;

/// Errors surfaced while loading declarative configuration.
#[derive(Debug, Error)]
pub enum WorldError {
    /// A JSON document (block table, biome profile, settings) did not parse.
    #[error("malformed configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A block table held more entries than the id space allows.
    #[error("block registry overflow: {0} entries exceed the 256-id space")]
    RegistryOverflow(usize),

    /// A name did not resolve against the block registry.
    #[error("unknown block name `{0}`")]
    UnknownBlock(String),
}
