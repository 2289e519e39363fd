//! A thread-safe priority queue layered on [`RedBlackTree`].

use std::sync::{Mutex, MutexGuard, PoisonError};

use alloc::vec::Vec;
use tracing::trace;

use crate::error::Result;
use crate::red_black_tree::RedBlackTree;

/// Priority given by [`RedBlackQueue::enqueue`] unless the queue was built with
/// [`RedBlackQueue::with_default_priority`].
pub const DEFAULT_PRIORITY: u8 = 100;

/// Ordering key of a queued item: lower priorities dequeue first, and items of
/// equal priority dequeue in the order they were enqueued.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
struct QueuePriority {
    priority: u8,
    sequence: u64,
}

struct QueueState<T> {
    tree: RedBlackTree<QueuePriority, T>,
    next_sequence: u64,
}

/// A priority queue backed by a [`RedBlackTree`].
///
/// Every method takes the queue's single lock for its whole duration, so
/// producers and consumers on different threads may share a `RedBlackQueue`
/// (for example through an `Arc`).
///
/// # Examples
///
/// ```
/// use redblack_tree::RedBlackQueue;
///
/// let queue = RedBlackQueue::new();
/// queue.enqueue("routine");
/// queue.enqueue_with_priority("urgent", 0);
/// queue.enqueue("also routine");
///
/// assert_eq!(queue.dequeue(), Ok("urgent"));
/// assert_eq!(queue.dequeue(), Ok("routine"));
/// assert_eq!(queue.dequeue(), Ok("also routine"));
/// assert!(queue.dequeue().is_err());
/// ```
pub struct RedBlackQueue<T> {
    state: Mutex<QueueState<T>>,
    default_priority: u8,
}

impl<T> RedBlackQueue<T> {
    /// Creates an empty queue using [`DEFAULT_PRIORITY`] for [`enqueue`](Self::enqueue).
    #[must_use]
    pub fn new() -> Self {
        Self::with_default_priority(DEFAULT_PRIORITY)
    }

    /// Creates an empty queue whose [`enqueue`](Self::enqueue) uses `priority`.
    #[must_use]
    pub fn with_default_priority(priority: u8) -> Self {
        Self {
            state: Mutex::new(QueueState {
                tree: RedBlackTree::new(),
                next_sequence: 0,
            }),
            default_priority: priority,
        }
    }

    /// Returns the priority used by [`enqueue`](Self::enqueue).
    #[must_use]
    pub fn default_priority(&self) -> u8 {
        self.default_priority
    }

    // A panic while the lock is held cannot leave the tree half-rebalanced: the
    // engine never calls out to user code mid-mutation. The state is usable as is.
    fn lock(&self) -> MutexGuard<'_, QueueState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds `item` with the default priority.
    pub fn enqueue(&self, item: T) {
        self.enqueue_with_priority(item, self.default_priority);
    }

    /// Adds `item` with `priority`; lower values are dequeued sooner.
    pub fn enqueue_with_priority(&self, item: T, priority: u8) {
        let mut state = self.lock();
        let key = QueuePriority {
            priority,
            sequence: state.next_sequence,
        };
        state.next_sequence += 1;

        let inserted = state.tree.insert(key, item);
        debug_assert!(inserted.is_ok(), "queue sequence numbers are unique");
        trace!(priority, sequence = key.sequence, "enqueued item");
    }

    /// Removes and returns the item with the lowest priority, oldest first.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`](crate::RedBlackError::EmptyTree) when the
    /// queue is empty.
    pub fn dequeue(&self) -> Result<T> {
        let mut state = self.lock();
        let (key, item) = state.tree.delete_min()?;
        trace!(priority = key.priority, sequence = key.sequence, "dequeued item");
        Ok(item)
    }

    /// Returns the number of queued items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().tree.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().tree.is_empty()
    }

    /// Drops every queued item.
    pub fn clear(&self) {
        self.lock().tree.clear();
    }
}

impl<T: Clone> RedBlackQueue<T> {
    /// Returns a copy of the item [`dequeue`](Self::dequeue) would return next.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`](crate::RedBlackError::EmptyTree) when the
    /// queue is empty.
    pub fn peek(&self) -> Result<T> {
        self.lock().tree.min_value().cloned()
    }

    /// Returns copies of all queued items in dequeue order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.lock().tree.values().cloned().collect()
    }
}

impl<T> Default for RedBlackQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for RedBlackQueue<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RedBlackQueue")
            .field("len", &self.len())
            .field("default_priority", &self.default_priority)
            .finish_non_exhaustive()
    }
}
