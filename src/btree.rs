//! The public B-tree interface.

use core::borrow::Borrow;
use core::fmt;

use crate::error::Result;
use crate::order::Order;
use crate::raw::{NodeId, RawBTree};

pub mod topology;

/// A balanced multiway search tree of unique keys with a runtime-configurable
/// order.
///
/// Every node holds up to `order - 1` keys; every non-root node holds at least
/// `ceil(order / 2) - 1`. All leaves sit at the same depth, so every operation
/// is `O(log n)`.
///
/// # Examples
///
/// ```
/// use mway_tree::BTree;
///
/// let mut tree = BTree::new(4)?;
/// tree.extend([30, 10, 20]);
///
/// assert_eq!(tree.len(), 3);
/// assert!(tree.contains(&20));
/// assert!(tree.remove(&20));
/// assert!(!tree.contains(&20));
/// # Ok::<(), mway_tree::Error>(())
/// ```
pub struct BTree<K> {
    raw: RawBTree<K>,
}

impl<K> BTree<K> {
    /// Creates an empty tree of the given order (maximum children per node).
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidOrder`](crate::Error::InvalidOrder) if
    /// `order < 3`; smaller orders cannot satisfy B-tree occupancy rules.
    pub fn new(order: usize) -> Result<Self> {
        Ok(Self {
            raw: RawBTree::new(Order::new(order)?),
        })
    }

    /// Returns the number of keys in the tree.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.len()
    }

    /// Returns true if the tree contains no keys.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw.len() == 0
    }

    /// Returns the order the tree was constructed with.
    #[must_use]
    pub const fn order(&self) -> usize {
        self.raw.order().get()
    }

    /// Returns the number of levels from the root to the leaves. An empty
    /// tree has depth 1 (the root is an empty leaf).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.raw.depth()
    }

    /// Returns the number of nodes currently in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.raw.node_count()
    }

    /// Removes all keys, resetting the tree to a single empty root.
    pub fn clear(&mut self) {
        self.raw.clear();
    }

    /// Returns an iterator over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, K> {
        Iter::new(&self.raw)
    }
}

impl<K: Ord> BTree<K> {
    /// Inserts a key, returning true if it was not already present.
    ///
    /// Duplicates are rejected: inserting a key the tree already holds leaves
    /// the tree untouched and returns false.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut tree = BTree::new(3)?;
    /// assert!(tree.insert(7));
    /// assert!(!tree.insert(7));
    /// assert_eq!(tree.len(), 1);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    pub fn insert(&mut self, key: K) -> bool {
        self.raw.insert(key)
    }

    /// Removes a key, returning true if it was present.
    ///
    /// The key may be any borrowed form of the tree's key type, as with the
    /// standard library's ordered collections.
    pub fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.remove(key)
    }

    /// Returns true if the tree contains the key.
    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        self.raw.find(key).is_some()
    }
}

impl<K: fmt::Debug> fmt::Debug for BTree<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<K: Ord> Extend<K> for BTree<K> {
    fn extend<I: IntoIterator<Item = K>>(&mut self, iter: I) {
        for key in iter {
            self.insert(key);
        }
    }
}

impl<'a, K> IntoIterator for &'a BTree<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// In-order iterator over a tree's keys, created by [`BTree::iter`].
///
/// Holds a stack of `(node, keys yielded)` frames along the path to the
/// current key; advancing is amortized `O(1)`.
pub struct Iter<'a, K> {
    tree: &'a RawBTree<K>,
    stack: Vec<(NodeId, usize)>,
    remaining: usize,
}

impl<'a, K> Iter<'a, K> {
    fn new(tree: &'a RawBTree<K>) -> Self {
        let mut iter = Self {
            tree,
            stack: Vec::with_capacity(tree.depth()),
            remaining: tree.len(),
        };
        if tree.len() > 0 {
            iter.descend(tree.root());
        }
        iter
    }

    /// Pushes the path from `id` down to its subtree's leftmost leaf.
    fn descend(&mut self, mut id: NodeId) {
        loop {
            self.stack.push((id, 0));
            let node = self.tree.node(id);
            if node.is_leaf() {
                return;
            }
            id = node.child(0);
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<&'a K> {
        let tree = self.tree;
        loop {
            let (id, yielded) = self.stack.last_mut()?;
            let node = tree.node(*id);
            if *yielded < node.key_count() {
                let key_index = *yielded;
                *yielded += 1;
                if !node.is_leaf() {
                    // The key's right subtree comes next.
                    self.descend(node.child(key_index + 1));
                }
                self.remaining -= 1;
                return Some(&node.keys()[key_index]);
            }
            self.stack.pop();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K> ExactSizeIterator for Iter<'_, K> {}
impl<K> core::iter::FusedIterator for Iter<'_, K> {}
