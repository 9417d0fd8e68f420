use core::borrow::Borrow;

use smallvec::SmallVec;

use super::node_id::NodeId;

/// Inline capacity for node key/child sequences. Trees of small order never
/// touch the heap for individual nodes; larger orders spill transparently.
const INLINE: usize = 8;

pub(crate) type KeyVec<K> = SmallVec<[K; INLINE]>;
pub(crate) type ChildVec = SmallVec<[NodeId; INLINE]>;

/// Result of searching for a key within a single node.
pub(crate) enum SearchResult {
    /// Key was found at the given index.
    Found(usize),
    /// Key was not found; index is where it would be inserted. For an
    /// internal node this is also the index of the child to descend into.
    NotFound(usize),
}

/// Returns the index of `key` in `keys` if present; otherwise the index at
/// which it would be inserted to preserve ascending order.
///
/// Precondition: `keys` is strictly ascending (no duplicates).
#[inline]
pub(crate) fn lower_bound<K, Q>(keys: &[K], key: &Q) -> usize
where
    K: Borrow<Q>,
    Q: ?Sized + Ord,
{
    match keys.binary_search_by(|k| k.borrow().cmp(key)) {
        Ok(index) | Err(index) => index,
    }
}

/// A B-tree node: an ordered key sequence, an ordered child sequence (empty
/// iff the node is a leaf), and a non-owning parent back-reference.
///
/// The parent link exists purely for upward traversal during splits and
/// rebalancing. It is `None` only for the root and must be rewritten whenever
/// a child moves between nodes.
pub(crate) struct Node<K> {
    parent: Option<NodeId>,
    keys: KeyVec<K>,
    children: ChildVec,
}

impl<K> Node<K> {
    /// Creates an empty leaf with no parent, i.e. the root of an empty tree.
    pub(crate) fn empty_root() -> Self {
        Self {
            parent: None,
            keys: KeyVec::new(),
            children: ChildVec::new(),
        }
    }

    pub(crate) fn with_contents(parent: NodeId, keys: KeyVec<K>, children: ChildVec) -> Self {
        Self {
            parent: Some(parent),
            keys,
            children,
        }
    }

    #[inline]
    pub(crate) fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub(crate) fn set_parent(&mut self, parent: Option<NodeId>) {
        self.parent = parent;
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    pub(crate) fn key_count(&self) -> usize {
        self.keys.len()
    }

    pub(crate) fn keys(&self) -> &[K] {
        &self.keys
    }

    #[inline]
    pub(crate) fn child(&self, index: usize) -> NodeId {
        self.children[index]
    }

    #[inline]
    pub(crate) fn child_count(&self) -> usize {
        self.children.len()
    }

    pub(crate) fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Index of `child` within this node's child sequence.
    pub(crate) fn child_position(&self, child: NodeId) -> Option<usize> {
        self.children.iter().position(|&c| c == child)
    }

    /// Returns true once this node must be split before descending into it.
    pub(crate) fn is_full(&self, capacity: usize) -> bool {
        self.keys.len() >= capacity
    }

    /// Returns true if this node can lend a key to a sibling.
    pub(crate) fn can_lend(&self, min_keys: usize) -> bool {
        self.keys.len() > min_keys
    }

    /// Searches for a key in this node.
    #[inline]
    pub(crate) fn search<Q>(&self, key: &Q) -> SearchResult
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        match self.keys.binary_search_by(|k| k.borrow().cmp(key)) {
            Ok(index) => SearchResult::Found(index),
            Err(index) => SearchResult::NotFound(index),
        }
    }

    // ─── Key splicing ────────────────────────────────────────────────────────

    pub(crate) fn insert_key(&mut self, index: usize, key: K) {
        self.keys.insert(index, key);
    }

    pub(crate) fn remove_key(&mut self, index: usize) -> K {
        self.keys.remove(index)
    }

    /// Overwrites the key at `index`, returning the previous key.
    pub(crate) fn replace_key(&mut self, index: usize, key: K) -> K {
        core::mem::replace(&mut self.keys[index], key)
    }

    pub(crate) fn push_key(&mut self, key: K) {
        self.keys.push(key);
    }

    pub(crate) fn push_key_front(&mut self, key: K) {
        self.keys.insert(0, key);
    }

    pub(crate) fn pop_key(&mut self) -> Option<K> {
        self.keys.pop()
    }

    pub(crate) fn pop_key_front(&mut self) -> Option<K> {
        if self.keys.is_empty() {
            None
        } else {
            Some(self.keys.remove(0))
        }
    }

    // ─── Child splicing ──────────────────────────────────────────────────────

    pub(crate) fn insert_child(&mut self, index: usize, child: NodeId) {
        self.children.insert(index, child);
    }

    pub(crate) fn remove_child(&mut self, index: usize) -> NodeId {
        self.children.remove(index)
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn push_child_front(&mut self, child: NodeId) {
        self.children.insert(0, child);
    }

    pub(crate) fn pop_child(&mut self) -> Option<NodeId> {
        self.children.pop()
    }

    pub(crate) fn pop_child_front(&mut self) -> Option<NodeId> {
        if self.children.is_empty() {
            None
        } else {
            Some(self.children.remove(0))
        }
    }

    // ─── Split/merge support ─────────────────────────────────────────────────

    /// Splits off the upper half of this node around the median key.
    ///
    /// Afterwards this node keeps `keys[0..mid]` and `children[0..=mid]`; the
    /// returned sequences hold `keys[mid+1..]` and `children[mid+1..]`, so
    /// `children == keys + 1` holds on both halves. The median key is returned
    /// for promotion into the parent.
    pub(crate) fn split_off_upper(&mut self) -> (K, KeyVec<K>, ChildVec) {
        let mid = self.keys.len() / 2;
        let upper_keys: KeyVec<K> = self.keys.drain(mid + 1..).collect();
        let median = self.keys.pop().expect("`Node::split_off_upper()` - node has no keys!");
        let upper_children: ChildVec = if self.children.is_empty() {
            ChildVec::new()
        } else {
            self.children.drain(mid + 1..).collect()
        };
        (median, upper_keys, upper_children)
    }

    /// Takes ownership of all keys and children, leaving the node empty.
    pub(crate) fn take_contents(&mut self) -> (KeyVec<K>, ChildVec) {
        (core::mem::take(&mut self.keys), core::mem::take(&mut self.children))
    }

    /// Appends a merged-away sibling's keys and children onto this node.
    /// The caller is responsible for reparenting the absorbed children.
    pub(crate) fn absorb(&mut self, mut keys: KeyVec<K>, mut children: ChildVec) {
        self.keys.append(&mut keys);
        self.children.append(&mut children);
    }
}

impl<K: Ord> Node<K> {
    /// Selects the child to descend into while searching for `key`.
    ///
    /// Returns `(child_index, child_id)`. Must not be called on a leaf;
    /// callers check leaf-ness first and treat a leaf as traversal-terminal.
    pub(crate) fn select_child<Q>(&self, key: &Q) -> (usize, NodeId)
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        debug_assert!(!self.is_leaf(), "`Node::select_child()` called on a leaf!");
        let index = lower_bound(&self.keys, key);
        (index, self.children[index])
    }
}
