use std::collections::BTreeSet;

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use mway_tree::BTree;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 2_000;

/// Generates random keys in a range that ensures collisions.
fn key_strategy() -> impl Strategy<Value = i64> {
    -500i64..500i64
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum TreeOp {
    Insert(i64),
    Remove(i64),
    Contains(i64),
    Clear,
}

fn tree_op_strategy() -> impl Strategy<Value = TreeOp> {
    prop_oneof![
        5 => key_strategy().prop_map(TreeOp::Insert),
        3 => key_strategy().prop_map(TreeOp::Remove),
        2 => key_strategy().prop_map(TreeOp::Contains),
        1 => Just(TreeOp::Clear),
    ]
}

// ─── Randomized model tests ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of operations on both BTree and BTreeSet
    /// and asserts identical results at every step, across a range of orders.
    #[test]
    fn tree_ops_match_btreeset(
        order in 3usize..12,
        ops in proptest::collection::vec(tree_op_strategy(), TEST_SIZE),
    ) {
        let mut tree: BTree<i64> = BTree::new(order).unwrap();
        let mut set: BTreeSet<i64> = BTreeSet::new();

        for op in &ops {
            match op {
                TreeOp::Insert(k) => {
                    prop_assert_eq!(tree.insert(*k), set.insert(*k), "insert({})", k);
                }
                TreeOp::Remove(k) => {
                    prop_assert_eq!(tree.remove(k), set.remove(k), "remove({})", k);
                }
                TreeOp::Contains(k) => {
                    prop_assert_eq!(tree.contains(k), set.contains(k), "contains({})", k);
                }
                TreeOp::Clear => {
                    tree.clear();
                    set.clear();
                }
            }
            prop_assert_eq!(tree.len(), set.len());
        }

        let tree_keys: Vec<i64> = tree.iter().copied().collect();
        let set_keys: Vec<i64> = set.iter().copied().collect();
        prop_assert_eq!(tree_keys, set_keys);
    }

    /// The topology export always forms a tree over exactly the stored keys.
    #[test]
    fn topology_is_a_consistent_tree(
        order in 3usize..10,
        keys in proptest::collection::btree_set(key_strategy(), 0..400),
    ) {
        let mut tree: BTree<i64> = BTree::new(order).unwrap();
        tree.extend(keys.iter().copied());

        let topology = tree.topology();
        prop_assert_eq!(topology.nodes().len(), tree.node_count());
        prop_assert_eq!(topology.edges().len(), topology.nodes().len() - 1);

        // Every edge's endpoints are exported nodes, and every non-root node
        // has exactly one parent.
        let ids: BTreeSet<usize> = topology.nodes().iter().map(|n| n.id).collect();
        prop_assert_eq!(ids.len(), topology.nodes().len());
        for edge in topology.edges() {
            prop_assert!(ids.contains(&edge.from));
            prop_assert!(ids.contains(&edge.to));
        }
        for node in topology.nodes() {
            let incoming = topology.edges().iter().filter(|e| e.to == node.id).count();
            let expected = usize::from(node.id != topology.root());
            prop_assert_eq!(incoming, expected);
        }

        // The exported keys are exactly the stored keys.
        let mut exported: Vec<i64> = topology
            .nodes()
            .iter()
            .flat_map(|n| n.keys.iter().copied())
            .collect();
        exported.sort_unstable();
        let expected: Vec<i64> = keys.iter().copied().collect();
        prop_assert_eq!(exported, expected);
    }
}

// ─── Deterministic scenarios ─────────────────────────────────────────────────

#[test]
fn ascending_inserts_stay_balanced() {
    let mut tree = BTree::new(6).unwrap();
    for key in 0..52 {
        assert!(tree.insert(key));
    }

    for key in 0..52 {
        assert!(tree.contains(&key), "missing key {key}");
    }
    assert!(!tree.contains(&52));
    assert!(!tree.contains(&-1));
    assert_eq!(tree.len(), 52);
    assert!(tree.depth() > 1);

    // Logarithmic depth: an order-6 tree of 52 keys is at most 4 levels.
    assert!(tree.depth() <= 4, "depth {} too large", tree.depth());
}

#[test]
fn deletion_rebalances_down_to_a_single_leaf() {
    // Order 3 with ascending 1..=7 builds a full three-level tree. Deleting
    // in this order exercises sibling borrowing, cascading merges, and two
    // root collapses.
    let mut tree = BTree::new(3).unwrap();
    tree.extend(1..=7);
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.node_count(), 7);

    assert!(tree.remove(&1));
    assert_eq!(tree.depth(), 2);

    assert!(tree.remove(&5));
    assert!(tree.remove(&2));
    assert!(tree.remove(&3));
    assert!(tree.remove(&7));

    assert_eq!(tree.depth(), 1);
    assert_eq!(tree.node_count(), 1);
    let remaining: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(remaining, [4, 6]);
}

#[test]
fn removing_an_absent_key_returns_false() {
    let mut tree = BTree::new(5).unwrap();
    tree.extend([10, 20, 30]);

    assert!(!tree.remove(&15));
    assert!(!tree.remove(&999));
    assert_eq!(tree.len(), 3);

    let keys: Vec<i32> = tree.iter().copied().collect();
    assert_eq!(keys, [10, 20, 30]);
}

#[test]
fn duplicate_inserts_are_rejected() {
    let mut tree = BTree::new(4).unwrap();
    assert!(tree.insert(5));
    assert!(!tree.insert(5));
    assert_eq!(tree.len(), 1);
}

#[test]
fn drain_and_refill_across_orders() {
    for order in 3..=8 {
        let mut tree = BTree::new(order).unwrap();
        tree.extend(0..200);
        for key in (0..200).rev() {
            assert!(tree.remove(&key), "order {order}, key {key}");
        }
        assert!(tree.is_empty());
        assert_eq!(tree.node_count(), 1);

        tree.extend((0..200).rev());
        assert_eq!(tree.len(), 200);
        let keys: Vec<i32> = tree.iter().copied().collect();
        assert_eq!(keys, (0..200).collect::<Vec<i32>>());
    }
}
