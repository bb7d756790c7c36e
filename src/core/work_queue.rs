use std::collections::VecDeque;
use std::sync::Mutex;

/// A mutex-guarded FIFO queue used for hand-offs between pipeline stages.
///
/// Each stage of the chunk pipeline (create, load, update, render, draw)
/// communicates with the next exclusively through one of these queues; no
/// stage touches another stage's in-progress chunk state directly. The lock
/// is held only for the duration of a single push or pop, so producers and
/// consumers on different threads interleave freely.
///
/// Entries preserve submission order. `push_front` exists so that direct
/// player edits can jump ahead of streaming work.
pub struct WorkQueue<T> {
    entries: Mutex<VecDeque<T>>,
}

impl<T: PartialEq> WorkQueue<T> {
    /// Creates a new, empty queue.
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(VecDeque::new()),
        }
    }

    /// Appends an entry at the back of the queue.
    pub fn push_back(&self, entry: T) {
        self.entries.lock().unwrap().push_back(entry);
    }

    /// Inserts an entry at the front of the queue, ahead of all queued work.
    pub fn push_front(&self, entry: T) {
        self.entries.lock().unwrap().push_front(entry);
    }

    /// Appends an entry at the back unless an equal entry is already queued.
    ///
    /// # Returns
    /// `true` if the entry was inserted, `false` if it was already present.
    pub fn push_back_unique(&self, entry: T) -> bool {
        let mut entries = self.entries.lock().unwrap();
        if entries.contains(&entry) {
            return false;
        }
        entries.push_back(entry);
        true
    }

    /// Removes and returns the oldest entry, or `None` if the queue is empty.
    pub fn pop_front(&self) -> Option<T> {
        self.entries.lock().unwrap().pop_front()
    }

    /// Returns the number of queued entries.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    /// Returns whether the queue is currently empty.
    pub fn is_empty(&self) -> bool {
        self.entries.lock().unwrap().is_empty()
    }
}

impl<T: PartialEq> Default for WorkQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
