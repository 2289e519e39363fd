use super::RedBlackTree;
use crate::error::{RedBlackError, Result};

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Returns the smallest key in the map.
    ///
    /// The node found becomes the last-found entry, so a following `get` of the
    /// same key is O(1).
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::{RedBlackError, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// assert_eq!(tree.min_key(), Err(RedBlackError::EmptyTree));
    /// tree.insert(2, "b").unwrap();
    /// tree.insert(1, "a").unwrap();
    /// assert_eq!(tree.min_key(), Ok(&1));
    /// ```
    pub fn min_key(&self) -> Result<&K> {
        self.first_key_value().map(|(key, _)| key)
    }

    /// Returns the largest key in the map.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    pub fn max_key(&self) -> Result<&K> {
        self.last_key_value().map(|(key, _)| key)
    }

    /// Returns the value stored under the smallest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    pub fn min_value(&self) -> Result<&V> {
        self.first_key_value().map(|(_, value)| value)
    }

    /// Returns the value stored under the largest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    pub fn max_value(&self) -> Result<&V> {
        self.last_key_value().map(|(_, value)| value)
    }

    /// Returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, "b").unwrap();
    /// tree.insert(2, "a").unwrap();
    /// assert_eq!(tree.first_key_value(), Ok((&1, &"b")));
    /// ```
    pub fn first_key_value(&self) -> Result<(&K, &V)> {
        let handle = self.raw.first().ok_or(RedBlackError::EmptyTree)?;
        let node = self.raw.node(handle);
        Ok((node.key(), node.value()))
    }

    /// Returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    pub fn last_key_value(&self) -> Result<(&K, &V)> {
        let handle = self.raw.last().ok_or(RedBlackError::EmptyTree)?;
        let node = self.raw.node(handle);
        Ok((node.key(), node.value()))
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    ///
    /// # Complexity
    ///
    /// O(log n)
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::{RedBlackError, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, "a").unwrap();
    /// tree.insert(2, "b").unwrap();
    /// assert_eq!(tree.delete_min(), Ok((1, "a")));
    /// assert_eq!(tree.delete_min(), Ok((2, "b")));
    /// assert_eq!(tree.delete_min(), Err(RedBlackError::EmptyTree));
    /// ```
    pub fn delete_min(&mut self) -> Result<(K, V)> {
        let handle = self.raw.first().ok_or(RedBlackError::EmptyTree)?;
        let entry = self.raw.remove_node(handle);
        self.notify_removed(&entry);
        Ok(entry)
    }

    /// Removes and returns the entry with the largest key.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::EmptyTree`] when the map is empty.
    pub fn delete_max(&mut self) -> Result<(K, V)> {
        let handle = self.raw.last().ok_or(RedBlackError::EmptyTree)?;
        let entry = self.raw.remove_node(handle);
        self.notify_removed(&entry);
        Ok(entry)
    }
}
