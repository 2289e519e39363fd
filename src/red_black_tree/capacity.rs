use alloc::vec::Vec;

use super::RedBlackTree;
use crate::raw::RawRedBlackTree;

impl<K, V> RedBlackTree<K, V> {
    /// Creates an empty map with room for at least `capacity` entries before the
    /// node arena reallocates.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32, i32> = RedBlackTree::with_capacity(32);
    /// assert!(tree.is_empty());
    /// ```
    ///
    /// # Complexity
    ///
    /// O(capacity) for memory allocation.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        RedBlackTree {
            raw: RawRedBlackTree::with_capacity(capacity),
            observers: Vec::new(),
        }
    }

    /// Returns the number of entries the node arena holds without reallocating.
    ///
    /// Slots freed by removals are reused, so a map that shrinks keeps its capacity.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let tree: RedBlackTree<i32, i32> = RedBlackTree::with_capacity(32);
    /// assert_eq!(tree.capacity(), 32);
    /// ```
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.raw.capacity()
    }
}
