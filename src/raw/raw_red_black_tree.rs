use core::borrow::Borrow;
use core::cell::Cell;
use core::cmp::Ordering;

use alloc::vec::Vec;
use smallvec::SmallVec;

use super::arena::Arena;
use super::handle::Handle;
use super::node::{Color, Node};
use crate::error::{RedBlackError, Result};

/// Stack used by the non-recursive in-order walks. A red-black tree of `n` nodes is
/// at most `2 * log2(n + 1)` high, so 64 entries cover every tree the arena can hold.
pub(crate) type WalkStack = SmallVec<[Handle; 64]>;

/// The red-black engine backing `RedBlackTree`.
///
/// All five invariants hold whenever a `&self` or `&mut self` method returns:
///
/// 1. the sentinel is black,
/// 2. the root is black,
/// 3. a red node has two black children,
/// 4. every path from a node down to the sentinel crosses the same number of black nodes,
/// 5. keys are strictly increasing in order.
#[derive(Clone)]
pub(crate) struct RawRedBlackTree<K, V> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K, V>>,
    /// Root node, or the sentinel when empty.
    root: Handle,
    /// Number of live entries.
    len: usize,
    /// Node located by the most recent lookup. Reset to the sentinel by every
    /// operation that frees or restructures nodes.
    last_found: Cell<Handle>,
}

impl<K, V> RawRedBlackTree<K, V> {
    /// Creates a new, empty tree.
    pub(crate) const fn new() -> Self {
        Self {
            nodes: Arena::new(),
            root: Handle::SENTINEL,
            len: 0,
            last_found: Cell::new(Handle::SENTINEL),
        }
    }

    /// Creates a new tree with room for `capacity` nodes.
    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Arena::with_capacity(capacity),
            root: Handle::SENTINEL,
            len: 0,
            last_found: Cell::new(Handle::SENTINEL),
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn capacity(&self) -> usize {
        self.nodes.capacity()
    }

    pub(crate) fn root(&self) -> Handle {
        self.root
    }

    /// Drops every entry and invalidates the last-found cache.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = Handle::SENTINEL;
        self.len = 0;
        self.last_found.set(Handle::SENTINEL);
    }

    pub(crate) fn node(&self, handle: Handle) -> &Node<K, V> {
        self.nodes.get(handle)
    }

    pub(crate) fn node_mut(&mut self, handle: Handle) -> &mut Node<K, V> {
        self.nodes.get_mut(handle)
    }

    // ─── Sentinel-aware link accessors ───────────────────────────────────────

    #[inline]
    fn color(&self, handle: Handle) -> Color {
        if handle.is_sentinel() {
            Color::Black
        } else {
            self.nodes.get(handle).color()
        }
    }

    /// Recolors a real node. The sentinel stays black, so painting it is a no-op.
    #[inline]
    fn paint(&mut self, handle: Handle, color: Color) {
        if !handle.is_sentinel() {
            self.nodes.get_mut(handle).set_color(color);
        }
    }

    #[inline]
    fn left(&self, handle: Handle) -> Handle {
        self.nodes.get(handle).left()
    }

    #[inline]
    fn right(&self, handle: Handle) -> Handle {
        self.nodes.get(handle).right()
    }

    #[inline]
    fn parent(&self, handle: Handle) -> Option<Handle> {
        self.nodes.get(handle).parent()
    }

    /// Points `handle` at a new parent. The sentinel is shared and carries no parent,
    /// so the write is dropped for it; callers that need the sentinel's would-be
    /// parent keep it in a local.
    #[inline]
    fn set_parent(&mut self, handle: Handle, parent: Option<Handle>) {
        if !handle.is_sentinel() {
            self.nodes.get_mut(handle).set_parent(parent);
        }
    }

    /// Makes `new` take the place of `old` under `parent`, or as root.
    fn replace_child(&mut self, parent: Option<Handle>, old: Handle, new: Handle) {
        match parent {
            None => self.root = new,
            Some(parent) => {
                let node = self.nodes.get_mut(parent);
                if node.left() == old {
                    node.set_left(new);
                } else {
                    node.set_right(new);
                }
            }
        }
    }

    pub(crate) fn leftmost(&self, mut handle: Handle) -> Handle {
        while !self.left(handle).is_sentinel() {
            handle = self.left(handle);
        }
        handle
    }

    pub(crate) fn rightmost(&self, mut handle: Handle) -> Handle {
        while !self.right(handle).is_sentinel() {
            handle = self.right(handle);
        }
        handle
    }

    // ─── Rotations ───────────────────────────────────────────────────────────

    /// Lifts the right child of `pivot` into its place. Colors are untouched.
    fn rotate_left(&mut self, pivot: Handle) {
        let child = self.right(pivot);
        let inner = self.left(child);

        self.nodes.get_mut(pivot).set_right(inner);
        self.set_parent(inner, Some(pivot));

        let parent = self.parent(pivot);
        self.set_parent(child, parent);
        self.replace_child(parent, pivot, child);

        self.nodes.get_mut(child).set_left(pivot);
        self.set_parent(pivot, Some(child));
    }

    /// Lifts the left child of `pivot` into its place. Colors are untouched.
    fn rotate_right(&mut self, pivot: Handle) {
        let child = self.left(pivot);
        let inner = self.right(child);

        self.nodes.get_mut(pivot).set_left(inner);
        self.set_parent(inner, Some(pivot));

        let parent = self.parent(pivot);
        self.set_parent(child, parent);
        self.replace_child(parent, pivot, child);

        self.nodes.get_mut(child).set_right(pivot);
        self.set_parent(pivot, Some(child));
    }

    // ─── Extremes and traversal ──────────────────────────────────────────────

    /// Returns the node holding the smallest key and caches it.
    pub(crate) fn first(&self) -> Option<Handle> {
        if self.root.is_sentinel() {
            return None;
        }
        let handle = self.leftmost(self.root);
        self.last_found.set(handle);
        Some(handle)
    }

    /// Returns the node holding the largest key and caches it.
    pub(crate) fn last(&self) -> Option<Handle> {
        if self.root.is_sentinel() {
            return None;
        }
        let handle = self.rightmost(self.root);
        self.last_found.set(handle);
        Some(handle)
    }

    /// Pushes `handle` and its chain of left descendants onto `stack`.
    pub(crate) fn push_left_spine(&self, stack: &mut WalkStack, mut handle: Handle) {
        while !handle.is_sentinel() {
            stack.push(handle);
            handle = self.left(handle);
        }
    }

    /// Removes every entry in ascending key order without rebalancing.
    pub(crate) fn drain_to_vec(&mut self) -> Vec<(K, V)> {
        let mut result = Vec::with_capacity(self.len);
        let mut stack = WalkStack::new();
        self.push_left_spine(&mut stack, self.root);

        while let Some(handle) = stack.pop() {
            let node = self.nodes.take(handle);
            self.push_left_spine(&mut stack, node.right());
            result.push(node.into_entry());
        }

        debug_assert_eq!(self.nodes.len(), 0, "drain left nodes behind");
        self.clear();
        result
    }
}

impl<K: Ord, V> RawRedBlackTree<K, V> {
    // ─── Search ──────────────────────────────────────────────────────────────

    /// Locates the node holding `key`, consulting the last-found cache first.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<Handle>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let cached = self.last_found.get();
        if !cached.is_sentinel() && key.cmp(self.nodes.get(cached).key().borrow()) == Ordering::Equal {
            return Some(cached);
        }

        let mut current = self.root;
        while !current.is_sentinel() {
            let node = self.nodes.get(current);
            match key.cmp(node.key().borrow()) {
                Ordering::Less => current = node.left(),
                Ordering::Greater => current = node.right(),
                Ordering::Equal => {
                    self.last_found.set(current);
                    return Some(current);
                }
            }
        }
        None
    }

    // ─── Insertion ───────────────────────────────────────────────────────────

    /// Links a new red node for `key` and rebalances.
    ///
    /// Fails with [`RedBlackError::DuplicateKey`] without modifying the tree when
    /// the key is already present.
    pub(crate) fn insert(&mut self, key: K, value: V) -> Result<Handle> {
        let mut parent = None;
        let mut ordering = Ordering::Equal;
        let mut current = self.root;

        while !current.is_sentinel() {
            let node = self.nodes.get(current);
            ordering = key.cmp(node.key());
            parent = Some(current);
            current = match ordering {
                Ordering::Less => node.left(),
                Ordering::Greater => node.right(),
                Ordering::Equal => return Err(RedBlackError::DuplicateKey),
            };
        }

        let handle = self.nodes.alloc(Node::new(key, value, parent));
        match parent {
            None => self.root = handle,
            Some(parent) if ordering == Ordering::Less => self.nodes.get_mut(parent).set_left(handle),
            Some(parent) => self.nodes.get_mut(parent).set_right(handle),
        }

        self.insert_fixup(handle);
        self.last_found.set(handle);
        self.len += 1;
        Ok(handle)
    }

    /// Restores the invariants after `node` was linked in red.
    fn insert_fixup(&mut self, mut node: Handle) {
        while let Some(mut parent) = self.parent(node)
            && self.color(parent) == Color::Red
        {
            // A red parent is never the root, so it always has a parent.
            let Some(grandparent) = self.parent(parent) else {
                break;
            };

            if parent == self.left(grandparent) {
                let uncle = self.right(grandparent);
                if self.color(uncle) == Color::Red {
                    self.paint(parent, Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.right(parent) {
                        self.rotate_left(parent);
                        core::mem::swap(&mut node, &mut parent);
                    }
                    self.paint(parent, Color::Black);
                    self.paint(grandparent, Color::Red);
                    self.rotate_right(grandparent);
                }
            } else {
                let uncle = self.left(grandparent);
                if self.color(uncle) == Color::Red {
                    self.paint(parent, Color::Black);
                    self.paint(uncle, Color::Black);
                    self.paint(grandparent, Color::Red);
                    node = grandparent;
                } else {
                    if node == self.left(parent) {
                        self.rotate_right(parent);
                        core::mem::swap(&mut node, &mut parent);
                    }
                    self.paint(parent, Color::Black);
                    self.paint(grandparent, Color::Red);
                    self.rotate_left(grandparent);
                }
            }
        }

        self.paint(self.root, Color::Black);
    }

    // ─── Deletion ────────────────────────────────────────────────────────────

    /// Removes the entry held by `target` and returns it.
    ///
    /// When `target` has two children its in-order successor is unlinked instead
    /// and the two entries are exchanged first, so only the successor's slot is
    /// freed. Any handle other than `target` and the successor stays valid.
    pub(crate) fn remove_node(&mut self, target: Handle) -> (K, V) {
        let target_node = self.nodes.get(target);
        let spliced = if target_node.left().is_sentinel() || target_node.right().is_sentinel() {
            target
        } else {
            self.leftmost(target_node.right())
        };

        let spliced_node = self.nodes.get(spliced);
        let child = if spliced_node.left().is_sentinel() {
            spliced_node.right()
        } else {
            spliced_node.left()
        };
        let child_parent = spliced_node.parent();
        let spliced_color = spliced_node.color();

        self.set_parent(child, child_parent);
        self.replace_child(child_parent, spliced, child);

        let mut removed = self.nodes.take(spliced);
        if spliced != target {
            self.nodes.get_mut(target).swap_entry(&mut removed);
        }

        if spliced_color == Color::Black {
            self.delete_fixup(child, child_parent);
        }

        self.last_found.set(Handle::SENTINEL);
        self.len -= 1;
        removed.into_entry()
    }

    /// Looks up `key` and removes its entry.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> Result<(K, V)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let handle = self.find(key).ok_or(RedBlackError::KeyNotFound)?;
        Ok(self.remove_node(handle))
    }

    /// Restores the black-height after a black node was spliced out above `node`.
    ///
    /// `node` may be the sentinel. Its parent is then only known through `parent`,
    /// since the shared sentinel never records one.
    fn delete_fixup(&mut self, mut node: Handle, mut parent: Option<Handle>) {
        while node != self.root && self.color(node) == Color::Black {
            let Some(p) = parent else {
                break;
            };

            if node == self.left(p) {
                let mut sibling = self.right(p);
                if self.color(sibling) == Color::Red {
                    self.paint(sibling, Color::Black);
                    self.paint(p, Color::Red);
                    self.rotate_left(p);
                    sibling = self.right(p);
                }

                if self.color(self.left(sibling)) == Color::Black && self.color(self.right(sibling)) == Color::Black {
                    self.paint(sibling, Color::Red);
                    node = p;
                    parent = self.parent(p);
                } else {
                    if self.color(self.right(sibling)) == Color::Black {
                        let near = self.left(sibling);
                        self.paint(near, Color::Black);
                        self.paint(sibling, Color::Red);
                        self.rotate_right(sibling);
                        sibling = self.right(p);
                    }
                    self.paint(sibling, self.color(p));
                    self.paint(p, Color::Black);
                    let far = self.right(sibling);
                    self.paint(far, Color::Black);
                    self.rotate_left(p);
                    node = self.root;
                    parent = None;
                }
            } else {
                let mut sibling = self.left(p);
                if self.color(sibling) == Color::Red {
                    self.paint(sibling, Color::Black);
                    self.paint(p, Color::Red);
                    self.rotate_right(p);
                    sibling = self.left(p);
                }

                if self.color(self.right(sibling)) == Color::Black && self.color(self.left(sibling)) == Color::Black {
                    self.paint(sibling, Color::Red);
                    node = p;
                    parent = self.parent(p);
                } else {
                    if self.color(self.left(sibling)) == Color::Black {
                        let near = self.right(sibling);
                        self.paint(near, Color::Black);
                        self.paint(sibling, Color::Red);
                        self.rotate_left(sibling);
                        sibling = self.left(p);
                    }
                    self.paint(sibling, self.color(p));
                    self.paint(p, Color::Black);
                    let far = self.left(sibling);
                    self.paint(far, Color::Black);
                    self.rotate_right(p);
                    node = self.root;
                    parent = None;
                }
            }
        }

        self.paint(node, Color::Black);
    }
}
