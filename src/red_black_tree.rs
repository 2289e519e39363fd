use core::borrow::Borrow;
use core::fmt;
use core::ops::Index;

use alloc::vec::Vec;
use tracing::{debug, trace, warn};

use crate::error::{ObserverError, RedBlackError, Result};
use crate::observer::{SharedObserver, TreeObserver};
use crate::raw::RawRedBlackTree;

mod capacity;
mod extremes;
mod iter;

pub use iter::{IntoIter, Iter, Keys, Values};

/// An ordered map based on a [red-black tree].
///
/// Keys must implement [`Ord`]; entries are kept in ascending key order and every
/// lookup, insertion and removal costs O(log n). Unlike `BTreeMap`, the map
/// refuses to overwrite: inserting a key that is already present fails with
/// [`RedBlackError::DuplicateKey`] and leaves the existing entry alone. Lookups
/// that miss report [`RedBlackError::KeyNotFound`]; extremal queries on an empty
/// map report [`RedBlackError::EmptyTree`]. The boolean and `Option` flavours
/// ([`remove`], [`contains_key`], [`try_get`]) exist for set-like use.
///
/// The map remembers the node found by its most recent lookup, so a `get`
/// followed by a `get_mut` or `set` on the same key skips the second descent.
/// Because of this cache even `&self` lookups write to the map, which is why
/// `RedBlackTree` is `Send` but not `Sync`. Share it between threads behind a
/// mutex covering whole operations, as [`RedBlackQueue`] does.
///
/// Observers registered with [`add_observer`] are told about every successful
/// insert, removal and clear; see [`TreeObserver`].
///
/// It is a logic error for a key to be modified in such a way that the key's
/// ordering relative to any other key, as determined by the [`Ord`] trait,
/// changes while it is in the map.
///
/// # Examples
///
/// ```
/// use redblack_tree::{RedBlackError, RedBlackTree};
///
/// let mut tree = RedBlackTree::new();
/// tree.insert(5, "five").unwrap();
/// tree.insert(10, "ten").unwrap();
/// tree.insert(6, "six").unwrap();
///
/// assert_eq!(tree.insert(6, "again"), Err(RedBlackError::DuplicateKey));
/// assert_eq!(tree.min_key(), Ok(&5));
/// assert_eq!(tree.max_key(), Ok(&10));
///
/// tree.delete_min().unwrap();
/// assert_eq!(tree.min_key(), Ok(&6));
///
/// let keys: Vec<_> = tree.keys().copied().collect();
/// assert_eq!(keys, [6, 10]);
/// ```
///
/// [red-black tree]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
/// [`remove`]: RedBlackTree::remove
/// [`contains_key`]: RedBlackTree::contains_key
/// [`try_get`]: RedBlackTree::try_get
/// [`add_observer`]: RedBlackTree::add_observer
/// [`RedBlackQueue`]: crate::RedBlackQueue
pub struct RedBlackTree<K, V> {
    raw: RawRedBlackTree<K, V>,
    observers: Vec<SharedObserver<K, V>>,
}

impl<K, V> RedBlackTree<K, V> {
    /// Makes a new, empty `RedBlackTree`.
    ///
    /// Does not allocate anything on its own.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, "a").unwrap();
    /// ```
    #[must_use]
    pub const fn new() -> RedBlackTree<K, V> {
        RedBlackTree {
            raw: RawRedBlackTree::new(),
            observers: Vec::new(),
        }
    }

    /// Registers an observer. Observers are notified in registration order.
    pub fn add_observer(&mut self, observer: SharedObserver<K, V>) {
        self.observers.push(observer);
    }

    /// Removes every entry, then notifies observers with `on_clear`.
    ///
    /// # Complexity
    ///
    /// O(n)
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut a = RedBlackTree::new();
    /// a.insert(1, "a").unwrap();
    /// a.clear();
    /// assert!(a.is_empty());
    /// assert_eq!(a.iter().count(), 0);
    /// ```
    pub fn clear(&mut self) {
        self.raw.clear();
        trace!("cleared tree");
        self.notify("clear", |observer| observer.on_clear());
    }

    /// Returns the number of entries in the map.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut a = RedBlackTree::new();
    /// assert_eq!(a.len(), 0);
    /// a.insert(1, "a").unwrap();
    /// assert_eq!(a.len(), 1);
    /// ```
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns `true` if the map contains no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    fn notify<F>(&self, event: &'static str, call: F)
    where
        F: Fn(&(dyn TreeObserver<K, V> + Send + Sync)) -> core::result::Result<(), ObserverError>,
    {
        for observer in &self.observers {
            if let Err(error) = call(observer.as_ref()) {
                warn!(event, %error, "tree observer failed");
            }
        }
    }
}

impl<K: Ord, V> RedBlackTree<K, V> {
    /// Inserts a new entry. On success observers receive `on_add`.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::DuplicateKey`] if `key` is already present. The map is
    /// left unchanged and `value` is dropped.
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
    /// assert_eq!(tree.insert(37, "a"), Ok(()));
    /// assert_eq!(tree.insert(37, "b"), Err(RedBlackError::DuplicateKey));
    /// assert_eq!(tree[&37], "a");
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let handle = self.raw.insert(key, value).inspect_err(|_| debug!("rejected duplicate key"))?;
        trace!(len = self.raw.len(), "inserted entry");

        let node = self.raw.node(handle);
        self.notify("add", |observer| observer.on_add(node.key(), node.value()));
        Ok(())
    }

    /// Removes the entry for `key` and returns it. On success observers receive
    /// `on_remove` with the removed entry.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::KeyNotFound`] if the key is absent.
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
    /// assert_eq!(tree.delete(&1), Ok((1, "a")));
    /// assert_eq!(tree.delete(&1), Err(RedBlackError::KeyNotFound));
    /// ```
    pub fn delete<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let entry = self.raw.remove(key)?;
        self.notify_removed(&entry);
        Ok(entry)
    }

    /// Removes the entry for `key`, returning whether there was one.
    ///
    /// This is [`delete`](RedBlackTree::delete) with `KeyNotFound` turned into `false`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert("k", 1).unwrap();
    /// assert!(tree.remove("k"));
    /// assert!(!tree.remove("k"));
    /// ```
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.delete(key).is_ok()
    }

    fn notify_removed(&self, (key, value): &(K, V)) {
        trace!(len = self.raw.len(), "removed entry");
        self.notify("remove", |observer| observer.on_remove(key, value));
    }

    /// Returns a reference to the value stored for `key`.
    ///
    /// The key may be any borrowed form of the map's key type, but the ordering
    /// on the borrowed form *must* match the ordering on the key type.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::KeyNotFound`] if the key is absent.
    ///
    /// # Complexity
    ///
    /// O(log n), or O(1) when `key` was the last key looked up.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::{RedBlackError, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, "a").unwrap();
    /// assert_eq!(tree.get(&1), Ok(&"a"));
    /// assert_eq!(tree.get(&2), Err(RedBlackError::KeyNotFound));
    /// ```
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.try_get(key).ok_or(RedBlackError::KeyNotFound)
    }

    /// Returns a reference to the value stored for `key`, or `None`.
    pub fn try_get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(key)?;
        Some(self.raw.node(handle).value())
    }

    /// Returns a mutable reference to the value stored for `key`.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::KeyNotFound`] if the key is absent.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, 10).unwrap();
    /// *tree.get_mut(&1).unwrap() += 5;
    /// assert_eq!(tree[&1], 15);
    /// ```
    pub fn get_mut<Q>(&mut self, key: &Q) -> Result<&mut V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.raw.find(key).ok_or(RedBlackError::KeyNotFound)?;
        Ok(self.raw.node_mut(handle).value_mut())
    }

    /// Replaces the value stored for `key`, returning the previous one.
    ///
    /// Unlike [`insert`](RedBlackTree::insert) this requires the key to be present.
    /// The tree's shape is not touched and observers are not notified.
    ///
    /// # Errors
    ///
    /// [`RedBlackError::KeyNotFound`] if the key is absent; `value` is dropped.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::{RedBlackError, RedBlackTree};
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert("x", 1).unwrap();
    /// assert_eq!(tree.set("x", 2), Ok(1));
    /// assert_eq!(tree.set("y", 3), Err(RedBlackError::KeyNotFound));
    /// assert_eq!(tree["x"], 2);
    /// ```
    pub fn set<Q>(&mut self, key: &Q, value: V) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.get_mut(key).map(|slot| core::mem::replace(slot, value))
    }

    /// Returns `true` if the map contains an entry for `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use redblack_tree::RedBlackTree;
    ///
    /// let mut tree = RedBlackTree::new();
    /// tree.insert(1, "a").unwrap();
    /// assert!(tree.contains_key(&1));
    /// assert!(!tree.contains_key(&2));
    /// ```
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }

    /// Returns `true` if any entry holds `value`.
    ///
    /// # Complexity
    ///
    /// O(n)
    pub fn contains_value(&self, value: &V) -> bool
    where
        V: PartialEq,
    {
        self.values().any(|v| v == value)
    }
}

impl<K: Clone, V: Clone> Clone for RedBlackTree<K, V> {
    /// Clones the entries. The clone shares the registered observers.
    fn clone(&self) -> Self {
        RedBlackTree {
            raw: self.raw.clone(),
            observers: self.observers.clone(),
        }
    }
}

impl<K: PartialEq, V: PartialEq> PartialEq for RedBlackTree<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().zip(other.iter()).all(|(a, b)| a == b)
    }
}

impl<K: Eq, V: Eq> Eq for RedBlackTree<K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for RedBlackTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K, V> Default for RedBlackTree<K, V> {
    fn default() -> Self {
        RedBlackTree::new()
    }
}

impl<K, Q, V> Index<&Q> for RedBlackTree<K, V>
where
    K: Borrow<Q> + Ord,
    Q: ?Sized + Ord,
{
    type Output = V;

    /// # Panics
    ///
    /// Panics if the key is not present in the map.
    fn index(&self, key: &Q) -> &V {
        self.try_get(key).expect("no entry found for key")
    }
}

impl<K: Ord, V, const N: usize> TryFrom<[(K, V); N]> for RedBlackTree<K, V> {
    type Error = RedBlackError;

    /// Builds a map from an array of entries, failing on the first repeated key.
    ///
    /// ```
    /// use redblack_tree::{RedBlackError, RedBlackTree};
    ///
    /// let tree = RedBlackTree::try_from([(2, "b"), (1, "a")]).unwrap();
    /// assert_eq!(tree.len(), 2);
    /// assert_eq!(RedBlackTree::try_from([(1, "a"), (1, "b")]), Err(RedBlackError::DuplicateKey));
    /// ```
    fn try_from(entries: [(K, V); N]) -> Result<Self> {
        let mut tree = RedBlackTree::new();
        for (key, value) in entries {
            tree.insert(key, value)?;
        }
        Ok(tree)
    }
}
