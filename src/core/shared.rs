use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A thread-safe, reference-counted resource container with read-write locking.
///
/// `Shared` provides synchronized access to a value of type `T` that can be
/// handed to worker threads. It wraps an `Arc<RwLock<T>>`; cloning a `Shared`
/// clones the handle, not the value. Chunks in particular are stored as
/// `Shared<Chunk>` so the population, update, and mesh stages can each hold a
/// handle to the same chunk while ownership of its mutable state transfers
/// between them through the work queues.
///
/// # Examples
///
/// ```
/// use blockworld::core::Shared;
///
/// let counter = Shared::new(0);
/// *counter.write() += 1;
/// assert_eq!(*counter.read(), 1);
/// ```
///
/// # Performance Considerations
/// - Read guards (`read()`) can be held concurrently by any number of threads
/// - Write guards (`write()`) are exclusive and block all other access
/// - Prefer `read()` wherever possible to keep the pipeline stages concurrent
pub struct Shared<T: Send + Sync> {
    resource: Arc<RwLock<T>>,
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Creates a new `Shared` containing the given value.
    pub fn new(resource: T) -> Self {
        Self {
            resource: Arc::new(RwLock::new(resource)),
        }
    }

    /// Returns a read-only guard for the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned (a writer panicked while holding it).
    pub fn read(&self) -> RwLockReadGuard<'_, T> {
        self.resource.read().unwrap()
    }

    /// Returns an exclusive guard that allows modifying the contained value.
    ///
    /// # Panics
    /// Panics if the lock is poisoned (a writer panicked while holding it).
    pub fn write(&self) -> RwLockWriteGuard<'_, T> {
        self.resource.write().unwrap()
    }
}

impl<T: Send + Sync> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self {
            resource: self.resource.clone(),
        }
    }
}
