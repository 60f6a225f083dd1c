//! A size-augmented BST. Every node remembers how many nodes live in the subtree rooted at it,
//! which is what lets the tree answer order-statistic questions ("which key has rank 3?", "how
//! many keys are smaller than `k`?") by walking a single root-to-leaf path.
//!
//! The tree does not rebalance itself. Inserting keys in sorted order produces a tree that is
//! really a linked list and every operation becomes `O(N)`.
//!
//! # Examples
//!
//! ```
//! use rank_bst::{Error, Key, Tree};
//!
//! let mut tree = Tree::new();
//! tree.put(1, "a");
//! tree.put(2, "b");
//! tree.put(3, "c");
//!
//! assert_eq!(tree.get(&Key::new(2)), Ok(&"b"));
//! assert_eq!(tree.select(0).map(Key::get), Ok(&1));
//! assert_eq!(tree.floor(&Key::new(5)).map(Key::get), Ok(&3));
//! assert_eq!(tree.floor(&Key::new(0)), Err(Error::NoFloor));
//!
//! let keys: Vec<_> = tree.keys(&Key::new(1), &Key::new(3)).into_iter().map(Key::get).collect();
//! assert_eq!(keys, [&1, &2, &3]);
//!
//! // Deleting a key that isn't there is fine.
//! assert_eq!(tree.delete(&Key::new(42)), None);
//! assert_eq!(tree.delete(&Key::new(2)), Some("b"));
//! assert_eq!(tree.size(), 2);
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::key::Key;

/// An exclusively owned, possibly empty, subtree.
type Link<K, V> = Option<Box<Node<K, V>>>;

/// Number of nodes in the subtree behind `link`.
fn size<K, V>(link: &Link<K, V>) -> usize {
    link.as_ref().map_or(0, |n| n.size)
}

fn empty_tree(operation: &'static str) -> Error {
    debug!(operation, "operation requires a non-empty tree");
    Error::EmptyTree
}

/// An ordered map from [`Key`]s to values with rank/select support.
///
/// Keys are unique: [`put`][Tree::put]ting an existing key replaces its value.
#[derive(Clone)]
pub struct Tree<K, V> {
    root: Link<K, V>,
}

/// A single entry in a [`Tree`]. Only ever handed out by shared reference so the tree's
/// invariants can't be broken from outside.
#[derive(Clone)]
pub struct Node<K, V> {
    key: Key<K>,
    value: V,
    left: Link<K, V>,
    right: Link<K, V>,

    /// How many nodes are in the subtree rooted at this node, including itself.
    size: usize,
}

impl<K, V> Default for Tree<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for Tree<K, V> {
    // The derived drop recurses once per level which overflows the stack on a degenerate tree.
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node<K, V>>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl<K, V> fmt::Debug for Tree<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(k, v)| (k.get(), v)))
            .finish()
    }
}

impl<K, V> Tree<K, V> {
    /// Generates a new, empty `Tree`.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// The number of entries in the tree. This is `O(1)`.
    pub fn size(&self) -> usize {
        size(&self.root)
    }

    /// Whether the tree has no entries.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// How many nodes are on the longest path from the root to a leaf. An empty tree has a
    /// height of 0 and a single node has a height of 1.
    pub fn height(&self) -> usize {
        Node::height(&self.root)
    }

    /// Returns the key at rank `index`, i.e. the key with exactly `index` smaller keys in the
    /// tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_bst::{Error, Tree};
    ///
    /// let tree: Tree<_, _> = [(30, ()), (10, ()), (20, ())].into_iter().collect();
    ///
    /// assert_eq!(tree.select(1).map(|k| *k.get()), Ok(20));
    /// assert_eq!(tree.select(3), Err(Error::IndexOutOfRange { index: 3, size: 3 }));
    /// ```
    pub fn select(&self, index: usize) -> Result<&Key<K>> {
        Node::select(&self.root, index)
            .map(|n| &n.key)
            .ok_or_else(|| {
                let size = self.size();
                debug!(index, size, "select index out of range");
                Error::IndexOutOfRange { index, size }
            })
    }

    /// Iterates over the entries in ascending key order.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }
}

impl<K, V> Tree<K, V>
where
    K: Ord,
{
    /// Finds the node holding `key`, if there is one.
    pub fn find_node(&self, key: &Key<K>) -> Option<&Node<K, V>> {
        Node::find(&self.root, key)
    }

    /// Returns the value stored at `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has the key.
    pub fn get(&self, key: &Key<K>) -> Result<&V> {
        match self.find_node(key) {
            Some(node) => Ok(&node.value),
            None => {
                debug!("get missed");
                Err(Error::KeyNotFound)
            }
        }
    }

    /// Returns a mutable reference to the value stored at `key`.
    ///
    /// # Errors
    ///
    /// [`Error::KeyNotFound`] if no node has the key.
    pub fn get_mut(&mut self, key: &Key<K>) -> Result<&mut V> {
        match Node::find_mut(&mut self.root, key) {
            Some(node) => Ok(&mut node.value),
            None => {
                debug!("get_mut missed");
                Err(Error::KeyNotFound)
            }
        }
    }

    /// Whether some node has `key`.
    pub fn contains(&self, key: &Key<K>) -> bool {
        self.find_node(key).is_some()
    }

    /// Inserts `value` at `key`. Inserting a new value for an existing key overwrites the old
    /// value and leaves the size unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use rank_bst::{Key, Tree};
    ///
    /// let mut tree = Tree::new();
    ///
    /// tree.put(1, 2);
    /// tree.put(1, 3);
    ///
    /// assert_eq!(tree.get(&Key::new(1)), Ok(&3));
    /// assert_eq!(tree.size(), 1);
    /// ```
    pub fn put(&mut self, key: impl Into<Key<K>>, value: V) {
        let before = self.size();
        self.root = Some(Node::put(self.root.take(), key.into(), value));

        let size = self.size();
        if size > before {
            trace!(size, "inserted new node");
        } else {
            trace!(size, "overwrote existing value");
        }
    }

    /// The smallest key in the tree.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if there are no entries.
    pub fn min(&self) -> Result<&Key<K>> {
        match self.root.as_deref() {
            Some(root) => Ok(&root.min().key),
            None => Err(empty_tree("min")),
        }
    }

    /// The largest key in the tree.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if there are no entries.
    pub fn max(&self) -> Result<&Key<K>> {
        match self.root.as_deref() {
            Some(root) => Ok(&root.max().key),
            None => Err(empty_tree("max")),
        }
    }

    /// The greatest key less than or equal to `key`.
    ///
    /// # Errors
    ///
    /// [`Error::NoFloor`] if every key in the tree is greater than `key`.
    pub fn floor(&self, key: &Key<K>) -> Result<&Key<K>> {
        Node::floor(&self.root, key)
            .map(|n| &n.key)
            .ok_or_else(|| {
                debug!("no floor for key");
                Error::NoFloor
            })
    }

    /// The smallest key greater than or equal to `key`.
    ///
    /// # Errors
    ///
    /// [`Error::NoCeiling`] if every key in the tree is less than `key`.
    pub fn ceiling(&self, key: &Key<K>) -> Result<&Key<K>> {
        Node::ceiling(&self.root, key)
            .map(|n| &n.key)
            .ok_or_else(|| {
                debug!("no ceiling for key");
                Error::NoCeiling
            })
    }

    /// The number of keys strictly less than `key`. `key` doesn't have to be in the tree.
    pub fn rank(&self, key: &Key<K>) -> usize {
        Node::rank(&self.root, key)
    }

    /// Removes the entry with the smallest key and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if there are no entries. The tree is left untouched.
    pub fn delete_min(&mut self) -> Result<(Key<K>, V)> {
        let root = self.root.take().ok_or_else(|| empty_tree("delete_min"))?;
        let (rest, min) = Node::take_min(root);
        self.root = rest;

        trace!(size = self.size(), "deleted minimum");
        Ok(min.into_entry())
    }

    /// Removes the entry with the largest key and returns it.
    ///
    /// # Errors
    ///
    /// [`Error::EmptyTree`] if there are no entries. The tree is left untouched.
    pub fn delete_max(&mut self) -> Result<(Key<K>, V)> {
        let root = self.root.take().ok_or_else(|| empty_tree("delete_max"))?;
        let (rest, max) = Node::take_max(root);
        self.root = rest;

        trace!(size = self.size(), "deleted maximum");
        Ok(max.into_entry())
    }

    /// Deletes the node holding `key` and returns its value. If the tree does not contain the
    /// key nothing happens and `None` is returned.
    ///
    /// A node with two children is replaced by its successor (the smallest node in its right
    /// subtree).
    pub fn delete(&mut self, key: &Key<K>) -> Option<V> {
        let root = self.root.take()?;
        let (root, deleted) = Node::delete(root, key);
        self.root = root;

        match deleted {
            Some(_) => trace!(size = self.size(), "deleted key"),
            None => trace!(size = self.size(), "delete missed, tree unchanged"),
        }
        deleted
    }

    /// All keys `k` with `lo <= k <= hi`, in ascending order. Empty when `lo > hi`.
    pub fn keys(&self, lo: &Key<K>, hi: &Key<K>) -> Vec<&Key<K>> {
        let mut keys = Vec::new();
        Node::collect_keys(&self.root, lo, hi, &mut keys);
        keys
    }

    /// The number of keys `k` with `lo <= k <= hi`. Computed from ranks, so this doesn't visit
    /// the keys.
    pub fn size_between(&self, lo: &Key<K>, hi: &Key<K>) -> usize {
        if lo > hi {
            return 0;
        }
        let below_hi = self.rank(hi) + usize::from(self.contains(hi));
        below_hi - self.rank(lo)
    }

    /// Checks the whole tree for the BST ordering, the subtree-size bookkeeping, and that `rank`
    /// and `select` are inverses of one another. This visits every node (several times) so it's
    /// meant for tests and debugging.
    pub fn is_consistent(&self) -> bool {
        Node::is_ordered(&self.root, None, None)
            && Node::is_size_consistent(&self.root)
            && self.is_rank_consistent()
    }

    fn is_rank_consistent(&self) -> bool {
        let selects_invert_ranks =
            (0..self.size()).all(|i| self.select(i).is_ok_and(|key| self.rank(key) == i));
        let ranks_invert_selects = self
            .iter()
            .all(|(key, _)| self.select(self.rank(key)).is_ok_and(|selected| selected == key));

        selects_invert_ranks && ranks_invert_selects
    }
}

impl<K, V> FromIterator<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<K, V> Extend<(K, V)> for Tree<K, V>
where
    K: Ord,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.put(key, value);
        }
    }
}

impl<'a, K, V> IntoIterator for &'a Tree<K, V> {
    type Item = (&'a Key<K>, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<K, V> Node<K, V> {
    fn new(key: Key<K>, value: V) -> Self {
        Self {
            key,
            value,
            left: None,
            right: None,
            size: 1,
        }
    }

    /// The key stored in this node.
    pub fn key(&self) -> &Key<K> {
        &self.key
    }

    /// The value stored in this node.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// How many nodes are in the subtree rooted at this node, including itself.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Splits a node that has already been detached from its children into its entry.
    fn into_entry(self: Box<Self>) -> (Key<K>, V) {
        debug_assert!(self.left.is_none() && self.right.is_none());
        let Node { key, value, .. } = *self;
        (key, value)
    }

    fn height(link: &Link<K, V>) -> usize {
        link.as_deref().map_or(0, |n| {
            Self::height(&n.left).max(Self::height(&n.right)) + 1
        })
    }

    fn min(&self) -> &Self {
        match self.left.as_deref() {
            Some(left) => left.min(),
            None => self,
        }
    }

    fn max(&self) -> &Self {
        match self.right.as_deref() {
            Some(right) => right.max(),
            None => self,
        }
    }

    fn select(link: &Link<K, V>, index: usize) -> Option<&Self> {
        let node = link.as_deref()?;
        let left_size = size(&node.left);
        match left_size.cmp(&index) {
            Ordering::Equal => Some(node),
            // Skip the whole left subtree and this node.
            Ordering::Less => Self::select(&node.right, index - left_size - 1),
            Ordering::Greater => Self::select(&node.left, index),
        }
    }

    fn is_size_consistent(link: &Link<K, V>) -> bool {
        match link.as_deref() {
            None => true,
            Some(n) => {
                n.size == size(&n.left) + size(&n.right) + 1
                    && Self::is_size_consistent(&n.left)
                    && Self::is_size_consistent(&n.right)
            }
        }
    }
}

impl<K, V> Node<K, V>
where
    K: Ord,
{
    /// Recomputes `size` from the (already updated) children.
    fn update_size(&mut self) {
        self.size = size(&self.left) + size(&self.right) + 1;

        if cfg!(debug_assertions) {
            if let Some(left) = self.left.as_deref() {
                assert!(left.key < self.key);
            }
            if let Some(right) = self.right.as_deref() {
                assert!(right.key > self.key);
            }
        }
    }

    fn find<'a>(link: &'a Link<K, V>, key: &Key<K>) -> Option<&'a Self> {
        let node = link.as_deref()?;
        match key.compare(&node.key) {
            Ordering::Less => Self::find(&node.left, key),
            Ordering::Equal => Some(node),
            Ordering::Greater => Self::find(&node.right, key),
        }
    }

    fn find_mut<'a>(link: &'a mut Link<K, V>, key: &Key<K>) -> Option<&'a mut Self> {
        let node = link.as_deref_mut()?;
        match key.compare(&node.key) {
            Ordering::Less => Self::find_mut(&mut node.left, key),
            Ordering::Equal => Some(node),
            Ordering::Greater => Self::find_mut(&mut node.right, key),
        }
    }

    /// Returns the subtree `link` with `key` inserted, fixing sizes on the way back up.
    fn put(link: Link<K, V>, key: Key<K>, value: V) -> Box<Self> {
        let Some(mut node) = link else {
            return Box::new(Self::new(key, value));
        };

        match key.compare(&node.key) {
            Ordering::Less => node.left = Some(Self::put(node.left.take(), key, value)),
            Ordering::Equal => node.value = value,
            Ordering::Greater => node.right = Some(Self::put(node.right.take(), key, value)),
        }
        node.update_size();
        node
    }

    fn floor<'a>(link: &'a Link<K, V>, key: &Key<K>) -> Option<&'a Self> {
        let node = link.as_deref()?;
        match key.compare(&node.key) {
            Ordering::Equal => Some(node),
            Ordering::Less => Self::floor(&node.left, key),
            // Nothing on the right is small enough so this node is the best we've got.
            Ordering::Greater => Self::floor(&node.right, key).or(Some(node)),
        }
    }

    fn ceiling<'a>(link: &'a Link<K, V>, key: &Key<K>) -> Option<&'a Self> {
        let node = link.as_deref()?;
        match key.compare(&node.key) {
            Ordering::Equal => Some(node),
            Ordering::Less => Self::ceiling(&node.left, key).or(Some(node)),
            Ordering::Greater => Self::ceiling(&node.right, key),
        }
    }

    fn rank(link: &Link<K, V>, key: &Key<K>) -> usize {
        let Some(node) = link.as_deref() else {
            return 0;
        };
        match key.compare(&node.key) {
            Ordering::Less => Self::rank(&node.left, key),
            Ordering::Equal => size(&node.left),
            Ordering::Greater => size(&node.left) + 1 + Self::rank(&node.right, key),
        }
    }

    /// Detaches the smallest node of the subtree rooted at `node`. Returns what's left of the
    /// subtree and the detached node (with no children).
    fn take_min(mut node: Box<Self>) -> (Link<K, V>, Box<Self>) {
        match node.left.take() {
            None => {
                let rest = node.right.take();
                node.size = 1;
                (rest, node)
            }
            Some(left) => {
                let (rest, min) = Self::take_min(left);
                node.left = rest;
                node.update_size();
                (Some(node), min)
            }
        }
    }

    /// Mirror of [`Node::take_min`].
    fn take_max(mut node: Box<Self>) -> (Link<K, V>, Box<Self>) {
        match node.right.take() {
            None => {
                let rest = node.left.take();
                node.size = 1;
                (rest, node)
            }
            Some(right) => {
                let (rest, max) = Self::take_max(right);
                node.right = rest;
                node.update_size();
                (Some(node), max)
            }
        }
    }

    /// Returns the subtree rooted at `node` without `key` and the value that was removed, if any.
    fn delete(mut node: Box<Self>, key: &Key<K>) -> (Link<K, V>, Option<V>) {
        match key.compare(&node.key) {
            Ordering::Less => {
                let Some(left) = node.left.take() else {
                    return (Some(node), None);
                };
                let (left, deleted) = Self::delete(left, key);
                node.left = left;
                node.update_size();
                (Some(node), deleted)
            }
            Ordering::Greater => {
                let Some(right) = node.right.take() else {
                    return (Some(node), None);
                };
                let (right, deleted) = Self::delete(right, key);
                node.right = right;
                node.update_size();
                (Some(node), deleted)
            }
            Ordering::Equal => {
                let Node {
                    value, left, right, ..
                } = *node;
                let replacement = match (left, right) {
                    (None, right) => right,
                    (left, None) => left,
                    // Promote the successor: the smallest node in the right subtree.
                    (Some(left), Some(right)) => {
                        let (rest, mut successor) = Self::take_min(right);
                        successor.left = Some(left);
                        successor.right = rest;
                        successor.update_size();
                        Some(successor)
                    }
                };
                (replacement, Some(value))
            }
        }
    }

    fn collect_keys<'a>(
        link: &'a Link<K, V>,
        lo: &Key<K>,
        hi: &Key<K>,
        keys: &mut Vec<&'a Key<K>>,
    ) {
        let Some(node) = link.as_deref() else {
            return;
        };
        let cmp_lo = lo.compare(&node.key);
        let cmp_hi = hi.compare(&node.key);

        if cmp_lo == Ordering::Less {
            Self::collect_keys(&node.left, lo, hi, keys);
        }
        if cmp_lo != Ordering::Greater && cmp_hi != Ordering::Less {
            keys.push(&node.key);
        }
        if cmp_hi == Ordering::Greater {
            Self::collect_keys(&node.right, lo, hi, keys);
        }
    }

    /// Whether every key in the subtree is strictly between `lo` and `hi` (where `None` is
    /// unbounded) and the subtree is itself ordered.
    fn is_ordered(link: &Link<K, V>, lo: Option<&Key<K>>, hi: Option<&Key<K>>) -> bool {
        let Some(node) = link.as_deref() else {
            return true;
        };
        if lo.is_some_and(|lo| node.key.compare(lo) != Ordering::Greater) {
            return false;
        }
        if hi.is_some_and(|hi| node.key.compare(hi) != Ordering::Less) {
            return false;
        }
        Self::is_ordered(&node.left, lo, Some(&node.key))
            && Self::is_ordered(&node.right, Some(&node.key), hi)
    }
}

/// An in-order iterator over a [`Tree`]'s entries, created by [`Tree::iter`].
///
/// This walks the tree with an explicit stack so it never recurses.
pub struct Iter<'a, K, V> {
    stack: Vec<&'a Node<K, V>>,
    remaining: usize,
}

impl<K, V> Clone for Iter<'_, K, V> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a Link<K, V>) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: size(root),
        };
        iter.push_left_spine(root.as_deref());
        iter
    }

    fn push_left_spine(&mut self, mut node: Option<&'a Node<K, V>>) {
        while let Some(n) = node {
            self.stack.push(n);
            node = n.left.as_deref();
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a Key<K>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left_spine(node.right.as_deref());
        self.remaining -= 1;
        Some((&node.key, &node.value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
