use core::borrow::Borrow;

use super::arena::Arena;
use super::node::{ChildVec, Node, SearchResult};
use super::node_id::NodeId;
use crate::order::Order;

/// The core B-tree implementation backing [`BTree`](crate::BTree).
///
/// All nodes live in an arena and refer to each other by [`NodeId`]. The root
/// always exists; an empty root leaf represents the empty tree.
pub(crate) struct RawBTree<K> {
    /// Arena storing all tree nodes.
    nodes: Arena<Node<K>>,
    /// Handle to the root node. The root's parent link is always `None`.
    root: NodeId,
    /// Validated order with its derived capacity and minimum occupancy.
    order: Order,
    /// Total number of keys in the tree.
    len: usize,
}

/// Index of the parent separator key between the child at `child_index` and
/// its borrow/merge partner: the separator to its left when the partner is
/// the left sibling, the one to its right when the partner is the right
/// sibling.
const fn separator_index(child_index: usize, toward_right: bool) -> usize {
    if child_index == 0 || toward_right {
        child_index
    } else {
        child_index - 1
    }
}

impl<K> RawBTree<K> {
    pub(crate) fn new(order: Order) -> Self {
        let mut nodes = Arena::new();
        let root = nodes.alloc(Node::empty_root());
        Self {
            nodes,
            root,
            order,
            len: 0,
        }
    }

    pub(crate) const fn len(&self) -> usize {
        self.len
    }

    pub(crate) const fn order(&self) -> Order {
        self.order
    }

    pub(crate) fn root(&self) -> NodeId {
        self.root
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node<K> {
        self.nodes.get(id)
    }

    /// Number of live nodes, recomputed from the arena rather than tracked.
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of levels from the root to the leaves. All leaves sit at the
    /// same depth, so the leftmost spine measures the whole tree.
    pub(crate) fn depth(&self) -> usize {
        let mut depth = 1;
        let mut current = self.root;
        while !self.nodes.get(current).is_leaf() {
            current = self.nodes.get(current).child(0);
            depth += 1;
        }
        depth
    }

    /// Resets the tree to a single empty root leaf.
    pub(crate) fn clear(&mut self) {
        self.nodes.clear();
        self.root = self.nodes.alloc(Node::empty_root());
        self.len = 0;
    }

    /// Rewrites the parent link of every child of `parent`. Called after a
    /// split or merge moves a block of children into a different node.
    fn reparent_children(&mut self, parent: NodeId) {
        let children: ChildVec = self.nodes.get(parent).children().iter().copied().collect();
        for child in children {
            self.nodes.get_mut(child).set_parent(Some(parent));
        }
    }

    /// Replaces an empty internal root with its sole remaining child.
    /// Tree depth shrinks by one.
    fn collapse_root(&mut self) {
        let old_root = self.root;
        debug_assert_eq!(self.nodes.get(old_root).key_count(), 0);
        debug_assert_eq!(self.nodes.get(old_root).child_count(), 1);

        let new_root = self.nodes.get(old_root).child(0);
        self.nodes.get_mut(new_root).set_parent(None);
        self.nodes.free(old_root);
        self.root = new_root;
    }

    /// Absorbs `right_id`'s keys and children into `left_id`, reparenting the
    /// moved children, and detaches the absorbed node from the parent.
    fn merge_into_left(&mut self, parent_id: NodeId, left_id: NodeId, right_id: NodeId, right_child_index: usize) {
        let mut right = self.nodes.take(right_id);
        let (keys, children) = right.take_contents();
        for &child in &children {
            self.nodes.get_mut(child).set_parent(Some(left_id));
        }
        self.nodes.get_mut(left_id).absorb(keys, children);
        self.nodes.get_mut(parent_id).remove_child(right_child_index);
    }
}

impl<K: Ord> RawBTree<K> {
    /// Searches for a key, returning its node and key index if present.
    pub(crate) fn find<Q>(&self, key: &Q) -> Option<(NodeId, usize)>
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let mut current = self.root;
        loop {
            let node = self.nodes.get(current);
            if let SearchResult::Found(index) = node.search(key) {
                return Some((current, index));
            }
            if node.is_leaf() {
                return None;
            }
            let (_, child) = node.select_child(key);
            current = child;
        }
    }

    /// Inserts a key. Returns false (leaving the tree untouched) if the key
    /// is already present.
    ///
    /// Descends from the root, splitting any node found at capacity before
    /// inspecting its children, so the target leaf always has spare room and
    /// no split ever needs to backtrack.
    pub(crate) fn insert(&mut self, key: K) -> bool {
        let mut current = self.root;
        loop {
            let index = match self.nodes.get(current).search(&key) {
                SearchResult::Found(_) => return false,
                SearchResult::NotFound(index) => index,
            };

            if self.nodes.get(current).is_full(self.order.capacity()) {
                // Resume from the node the split promoted into; its key set
                // changed and must be re-evaluated.
                current = self.split(current);
                continue;
            }

            let node = self.nodes.get(current);
            if node.is_leaf() {
                self.nodes.get_mut(current).insert_key(index, key);
                self.len += 1;
                return true;
            }
            current = node.child(index);
        }
    }

    /// Splits a full node around its median key.
    ///
    /// For the root, the node is reshaped in place into a one-key root over
    /// two new children (the root's identity is preserved; depth grows by
    /// one). Otherwise the upper half moves into a new right sibling and the
    /// median is promoted into the parent. Returns the node from which the
    /// caller should resume its descent.
    fn split(&mut self, node_id: NodeId) -> NodeId {
        let Some(parent_id) = self.nodes.get(node_id).parent() else {
            self.split_root();
            return node_id;
        };

        let (median, upper_keys, upper_children) = self.nodes.get_mut(node_id).split_off_upper();
        let sibling = self.nodes.alloc(Node::with_contents(parent_id, upper_keys, upper_children));
        self.reparent_children(sibling);

        let parent = self.nodes.get_mut(parent_id);
        let position = parent
            .child_position(node_id)
            .expect("`RawBTree::split()` - node is not a child of its parent!");
        parent.insert_key(position, median);
        parent.insert_child(position + 1, sibling);
        parent_id
    }

    fn split_root(&mut self) {
        let root_id = self.root;
        let (median, upper_keys, upper_children) = self.nodes.get_mut(root_id).split_off_upper();
        let (lower_keys, lower_children) = self.nodes.get_mut(root_id).take_contents();

        let left = self.nodes.alloc(Node::with_contents(root_id, lower_keys, lower_children));
        let right = self.nodes.alloc(Node::with_contents(root_id, upper_keys, upper_children));
        self.reparent_children(left);
        self.reparent_children(right);

        let root = self.nodes.get_mut(root_id);
        root.push_key(median);
        root.push_child(left);
        root.push_child(right);
    }

    /// Removes a key. Returns false if the key was not present.
    pub(crate) fn remove<Q>(&mut self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Ord,
    {
        let Some((node_id, key_index)) = self.find(key) else {
            return false;
        };

        if self.nodes.get(node_id).is_leaf() {
            // Leaf target: delete in place, then repair any underflow.
            // (A root leaf is exempt from minimum occupancy; `rebalance`
            // leaves it alone.)
            self.nodes.get_mut(node_id).remove_key(key_index);
            self.len -= 1;
            self.rebalance(node_id);
            return true;
        }

        let left_id = self.nodes.get(node_id).child(key_index);
        let right_id = self.nodes.get(node_id).child(key_index + 1);

        if self.nodes.get(left_id).is_leaf() {
            // Internal target over leaves: replace the deleted key with an
            // adjacent leaf's extreme key, or merge the two leaves around it.
            let min_keys = self.order.min_keys();
            self.len -= 1;
            if self.nodes.get(left_id).can_lend(min_keys) {
                let predecessor = self.pop_last_key(left_id);
                self.nodes.get_mut(node_id).replace_key(key_index, predecessor);
            } else if self.nodes.get(right_id).can_lend(min_keys) {
                let successor = self.pop_first_key(right_id);
                self.nodes.get_mut(node_id).replace_key(key_index, successor);
            } else {
                // The separator being merged around is the deleted key
                // itself, so the leaves concatenate directly.
                self.nodes.get_mut(node_id).remove_key(key_index);
                self.merge_into_left(node_id, left_id, right_id, key_index + 1);
                self.rebalance(node_id);
            }
            return true;
        }

        // Internal target over internal children: promote the predecessor
        // from the rightmost leaf of the left subtree, then repair that leaf.
        let leaf_id = self.rightmost_leaf(left_id);
        if self.nodes.get(leaf_id).key_count() == 0 {
            // An odd-order split can strand an empty leaf on the right
            // spine. Repair it first, then retry against the restructured
            // tree; the target key is still present, possibly relocated.
            self.rebalance(leaf_id);
            return self.remove(key);
        }
        self.len -= 1;
        let predecessor = self.pop_last_key(leaf_id);
        self.nodes.get_mut(node_id).replace_key(key_index, predecessor);
        self.rebalance(leaf_id);
        true
    }

    /// Restores minimum occupancy from `node_id` up to the root.
    ///
    /// Each underfull node either borrows a key from a lendable sibling
    /// (left first) through the shared parent separator, or merges with a
    /// sibling (left preferred), pulling the separator down. A merge shrinks
    /// the parent, so the loop climbs the parent chain; reaching the root
    /// ends the climb, collapsing it if it ran out of keys.
    fn rebalance(&mut self, mut node_id: NodeId) {
        loop {
            let Some(parent_id) = self.nodes.get(node_id).parent() else {
                let root = self.nodes.get(node_id);
                if root.key_count() == 0 && !root.is_leaf() {
                    self.collapse_root();
                }
                return;
            };

            let min_keys = self.order.min_keys();
            if self.nodes.get(node_id).key_count() >= min_keys {
                return;
            }

            let child_index = self
                .nodes
                .get(parent_id)
                .child_position(node_id)
                .expect("`RawBTree::rebalance()` - node is not a child of its parent!");

            if self.nodes.get(parent_id).child_count() < 2 {
                // An only child (odd-order trees can produce key-less
                // parents): nothing to borrow or merge with at this level,
                // so repair the parent instead.
                node_id = parent_id;
                continue;
            }

            if child_index > 0 {
                let left_id = self.nodes.get(parent_id).child(child_index - 1);
                if self.nodes.get(left_id).can_lend(min_keys) {
                    self.borrow_from_left(parent_id, node_id, left_id, child_index);
                    return;
                }
            }

            if child_index + 1 < self.nodes.get(parent_id).child_count() {
                let right_id = self.nodes.get(parent_id).child(child_index + 1);
                if self.nodes.get(right_id).can_lend(min_keys) {
                    self.borrow_from_right(parent_id, node_id, right_id, child_index);
                    return;
                }
            }

            if child_index > 0 {
                let left_id = self.nodes.get(parent_id).child(child_index - 1);
                let separator = self
                    .nodes
                    .get_mut(parent_id)
                    .remove_key(separator_index(child_index, false));
                self.nodes.get_mut(left_id).push_key(separator);
                self.merge_into_left(parent_id, left_id, node_id, child_index);
            } else {
                let right_id = self.nodes.get(parent_id).child(child_index + 1);
                let separator = self
                    .nodes
                    .get_mut(parent_id)
                    .remove_key(separator_index(child_index, true));
                self.nodes.get_mut(node_id).push_key(separator);
                self.merge_into_left(parent_id, node_id, right_id, child_index + 1);
            }

            node_id = parent_id;
        }
    }

    /// Rotates one key from the left sibling through the parent separator
    /// into `node_id`, moving the sibling's last child along if internal.
    fn borrow_from_left(&mut self, parent_id: NodeId, node_id: NodeId, left_id: NodeId, child_index: usize) {
        let borrowed = self.pop_last_key(left_id);
        let separator = self
            .nodes
            .get_mut(parent_id)
            .replace_key(separator_index(child_index, false), borrowed);
        self.nodes.get_mut(node_id).push_key_front(separator);

        if !self.nodes.get(node_id).is_leaf() {
            let child = self
                .nodes
                .get_mut(left_id)
                .pop_child()
                .expect("`RawBTree::borrow_from_left()` - internal sibling has no children!");
            self.nodes.get_mut(child).set_parent(Some(node_id));
            self.nodes.get_mut(node_id).push_child_front(child);
        }
    }

    /// Mirror of [`borrow_from_left`](Self::borrow_from_left) for the right
    /// sibling: its first key is promoted into the parent and the old
    /// separator lands at the back of `node_id`.
    fn borrow_from_right(&mut self, parent_id: NodeId, node_id: NodeId, right_id: NodeId, child_index: usize) {
        let borrowed = self.pop_first_key(right_id);
        let separator = self
            .nodes
            .get_mut(parent_id)
            .replace_key(separator_index(child_index, true), borrowed);
        self.nodes.get_mut(node_id).push_key(separator);

        if !self.nodes.get(node_id).is_leaf() {
            let child = self
                .nodes
                .get_mut(right_id)
                .pop_child_front()
                .expect("`RawBTree::borrow_from_right()` - internal sibling has no children!");
            self.nodes.get_mut(child).set_parent(Some(node_id));
            self.nodes.get_mut(node_id).push_child(child);
        }
    }

    /// Descends along last children to the rightmost leaf of a subtree, the
    /// home of the subtree's maximum (predecessor) key.
    fn rightmost_leaf(&self, start: NodeId) -> NodeId {
        let mut current = start;
        loop {
            let node = self.nodes.get(current);
            if node.is_leaf() {
                return current;
            }
            current = node.child(node.child_count() - 1);
        }
    }

    fn pop_last_key(&mut self, node_id: NodeId) -> K {
        self.nodes
            .get_mut(node_id)
            .pop_key()
            .expect("`RawBTree::pop_last_key()` - node has no keys!")
    }

    fn pop_first_key(&mut self, node_id: NodeId) -> K {
        self.nodes
            .get_mut(node_id)
            .pop_key_front()
            .expect("`RawBTree::pop_first_key()` - node has no keys!")
    }
}
