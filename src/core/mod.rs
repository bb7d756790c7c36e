//! # Core Module
//!
//! This module provides the concurrency primitives the rest of the engine is
//! built on: a thread-safe resource container that chunk and world state live
//! in, and the concurrent FIFO queue the pipeline stages communicate through.
//!
//! ## Key Components
//! - `Shared`: Thread-safe reference-counted resource with read-write locking
//! - `WorkQueue`: Mutex-guarded FIFO used for the chunk pipeline hand-offs
//!
//! ## Usage
//! ```rust
//! use blockworld::core::{Shared, WorkQueue};
//!
//! // Thread-safe resource
//! let counter = Shared::new(0);
//! *counter.write() += 1;
//! assert_eq!(*counter.read(), 1);
//!
//! // FIFO hand-off between stages
//! let queue: WorkQueue<u32> = WorkQueue::new();
//! queue.push_back(7);
//! assert_eq!(queue.pop_front(), Some(7));
//! ```

pub mod shared;
pub mod work_queue;

// Re-export types for easier access
pub use shared::Shared;
pub use work_queue::WorkQueue;
