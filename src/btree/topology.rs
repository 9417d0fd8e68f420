//! Read-only structural export for rendering and inspection tooling.

use super::BTree;

/// One node in a [`Topology`] snapshot: a stable identity and a borrowed view
/// of the node's sorted key sequence.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TreeNode<'a, K> {
    /// Identity of this node, stable for as long as the node exists in the
    /// tree. Identities are not reused while their node is alive, but may be
    /// recycled after a merge frees the node.
    pub id: usize,
    /// The node's keys in ascending order. Empty only for the root of an
    /// empty tree.
    pub keys: &'a [K],
}

/// A parent-child relation in a [`Topology`] snapshot.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct TreeEdge {
    /// Identity of the parent node.
    pub from: usize,
    /// Identity of the child node.
    pub to: usize,
}

/// A point-in-time structural snapshot of a [`BTree`].
///
/// Nodes are listed in pre-order (parents before children, leftmost subtree
/// first); edges are listed per parent in left-to-right child order. The
/// snapshot borrows the tree, so the tree cannot be mutated while a
/// `Topology` is alive.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Topology<'a, K> {
    root: usize,
    nodes: Vec<TreeNode<'a, K>>,
    edges: Vec<TreeEdge>,
}

impl<'a, K> Topology<'a, K> {
    /// Identity of the root node.
    #[must_use]
    pub const fn root(&self) -> usize {
        self.root
    }

    /// Every node in the tree, in pre-order.
    #[must_use]
    pub fn nodes(&self) -> &[TreeNode<'a, K>] {
        &self.nodes
    }

    /// Every parent-child edge.
    #[must_use]
    pub fn edges(&self) -> &[TreeEdge] {
        &self.edges
    }
}

impl<K> BTree<K> {
    /// Exports the tree's structure as a list of nodes and edges.
    ///
    /// # Examples
    ///
    /// ```
    /// use mway_tree::BTree;
    ///
    /// let mut tree = BTree::new(3)?;
    /// tree.extend([1, 2, 3]);
    ///
    /// let topology = tree.topology();
    /// assert_eq!(topology.nodes().len(), 3);
    /// assert_eq!(topology.edges().len(), 2);
    ///
    /// // The first node is the root.
    /// assert_eq!(topology.nodes()[0].id, topology.root());
    /// assert_eq!(topology.nodes()[0].keys, &[2]);
    /// # Ok::<(), mway_tree::Error>(())
    /// ```
    #[must_use]
    pub fn topology(&self) -> Topology<'_, K> {
        let node_count = self.raw.node_count();
        let mut nodes = Vec::with_capacity(node_count);
        let mut edges = Vec::with_capacity(node_count - 1);

        let mut pending = vec![self.raw.root()];
        while let Some(id) = pending.pop() {
            let node = self.raw.node(id);
            nodes.push(TreeNode {
                id: id.to_index(),
                keys: node.keys(),
            });
            for &child in node.children() {
                edges.push(TreeEdge {
                    from: id.to_index(),
                    to: child.to_index(),
                });
            }
            // Reverse push order so the leftmost child is visited first.
            for &child in node.children().iter().rev() {
                pending.push(child);
            }
        }

        Topology {
            root: self.raw.root().to_index(),
            nodes,
            edges,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_tree_exports_a_single_keyless_node() {
        let tree: BTree<i32> = BTree::new(6).unwrap();
        let topology = tree.topology();

        assert_eq!(topology.nodes().len(), 1);
        assert_eq!(topology.nodes()[0].id, topology.root());
        assert!(topology.nodes()[0].keys.is_empty());
        assert!(topology.edges().is_empty());
    }

    #[test]
    fn three_node_tree_shape() {
        let mut tree = BTree::new(3).unwrap();
        tree.extend([1, 2, 3]);

        let topology = tree.topology();
        let nodes = topology.nodes();
        assert_eq!(nodes.len(), 3);
        assert_eq!(nodes[0].keys, &[2]);
        assert_eq!(nodes[1].keys, &[1]);
        assert_eq!(nodes[2].keys, &[3]);

        let root = topology.root();
        assert_eq!(
            topology.edges(),
            &[
                TreeEdge { from: root, to: nodes[1].id },
                TreeEdge { from: root, to: nodes[2].id },
            ]
        );
    }

    #[test]
    fn nodes_are_listed_in_pre_order() {
        let mut tree = BTree::new(4).unwrap();
        tree.extend(0..30);

        let topology = tree.topology();
        let nodes = topology.nodes();

        // Pre-order: the root first, then each subtree in full before its
        // right neighbor. The first key of each successive leaf ascends.
        assert_eq!(nodes[0].id, topology.root());
        let leaf_firsts: Vec<i32> = nodes
            .iter()
            .filter(|n| topology.edges().iter().all(|e| e.from != n.id))
            .map(|n| n.keys[0])
            .collect();
        let mut sorted = leaf_firsts.clone();
        sorted.sort_unstable();
        assert_eq!(leaf_firsts, sorted);
    }

    #[test]
    fn every_node_but_the_root_has_exactly_one_incoming_edge() {
        let mut tree = BTree::new(5).unwrap();
        tree.extend((0..80).map(|n| n * 13 % 101));

        let topology = tree.topology();
        assert_eq!(topology.edges().len(), topology.nodes().len() - 1);

        for node in topology.nodes() {
            let incoming = topology.edges().iter().filter(|e| e.to == node.id).count();
            let expected = usize::from(node.id != topology.root());
            assert_eq!(incoming, expected, "node {}", node.id);
        }
    }

    #[test]
    fn exported_keys_cover_the_tree() {
        let mut tree = BTree::new(6).unwrap();
        tree.extend(0..50);

        let topology = tree.topology();
        let mut exported: Vec<i32> = topology
            .nodes()
            .iter()
            .flat_map(|n| n.keys.iter().copied())
            .collect();
        exported.sort_unstable();
        assert_eq!(exported, (0..50).collect::<Vec<i32>>());
    }
}
