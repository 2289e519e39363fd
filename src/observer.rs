use alloc::sync::Arc;

use crate::error::ObserverError;

/// Receives notifications after a [`RedBlackTree`](crate::RedBlackTree) mutation succeeds.
///
/// Callbacks run synchronously, after the tree is rebalanced, in the order the
/// observers were registered. A returned error is logged and discarded; it does
/// not undo the mutation or surface to the caller. Every method defaults to doing
/// nothing, so an observer only implements the events it cares about.
///
/// # Examples
///
/// ```
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use redblack_tree::{ObserverError, RedBlackTree, TreeObserver};
///
/// #[derive(Default)]
/// struct CountAdds(AtomicUsize);
///
/// impl TreeObserver<i32, &'static str> for CountAdds {
///     fn on_add(&self, _key: &i32, _value: &&'static str) -> Result<(), ObserverError> {
///         self.0.fetch_add(1, Ordering::Relaxed);
///         Ok(())
///     }
/// }
///
/// let adds = Arc::new(CountAdds::default());
/// let mut tree: RedBlackTree<i32, &'static str> = RedBlackTree::new();
/// tree.add_observer(adds.clone());
/// tree.insert(1, "a").unwrap();
/// tree.insert(2, "b").unwrap();
/// assert_eq!(adds.0.load(Ordering::Relaxed), 2);
/// ```
pub trait TreeObserver<K, V> {
    /// Called after `key` was inserted with `value`.
    ///
    /// # Errors
    ///
    /// Any [`ObserverError`]; it is logged by the tree and otherwise ignored.
    fn on_add(&self, key: &K, value: &V) -> Result<(), ObserverError> {
        let _ = (key, value);
        Ok(())
    }

    /// Called after the entry for `key` was removed. `value` is the removed value.
    ///
    /// # Errors
    ///
    /// Any [`ObserverError`]; it is logged by the tree and otherwise ignored.
    fn on_remove(&self, key: &K, value: &V) -> Result<(), ObserverError> {
        let _ = (key, value);
        Ok(())
    }

    /// Called after the tree was cleared.
    ///
    /// # Errors
    ///
    /// Any [`ObserverError`]; it is logged by the tree and otherwise ignored.
    fn on_clear(&self) -> Result<(), ObserverError> {
        Ok(())
    }
}

/// An observer shared between the tree and whoever registered it.
pub type SharedObserver<K, V> = Arc<dyn TreeObserver<K, V> + Send + Sync>;
