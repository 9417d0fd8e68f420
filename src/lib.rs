//! An in-memory B-tree with runtime-configurable order.
//!
//! This crate provides [`BTree`], a balanced multiway search tree of unique keys.
//! Unlike the standard library's `BTreeSet`, whose branching factor is a fixed
//! implementation detail, the order (maximum number of children per node) is
//! chosen at construction time. The tree exposes its shape through
//! [`topology`](BTree::topology), a read-only export of every node's key
//! sequence and every parent-child edge, intended for rendering and inspection
//! tooling.
//!
//! # Example
//!
//! ```
//! use mway_tree::BTree;
//!
//! let mut tree = BTree::new(6)?;
//!
//! for key in [41, 7, 19, 3, 28] {
//!     tree.insert(key);
//! }
//!
//! assert!(tree.contains(&19));
//! assert!(tree.remove(&19));
//! assert!(!tree.contains(&19));
//!
//! // In-order iteration yields the ascending key sequence.
//! let keys: Vec<i32> = tree.iter().copied().collect();
//! assert_eq!(keys, [3, 7, 28, 41]);
//! # Ok::<(), mway_tree::Error>(())
//! ```
//!
//! # Features
//!
//! - **Runtime order** - any order `>= 3`; capacity and minimum occupancy are
//!   derived at construction and fixed for the tree's lifetime
//! - **O(log n) operations** - insert, remove, and membership tests all visit
//!   one node per level
//! - **Topology export** - a stable-identity snapshot of nodes and edges for
//!   external rendering collaborators
//! - **Cache-friendly storage** - nodes live in a contiguous arena and refer
//!   to each other by index, never by pointer
//!
//! # Implementation
//!
//! This is a classic B-tree: every node holds keys, and internal nodes hold
//! one more child than keys. Insertion splits any full node encountered on the
//! way down, so the target leaf always has spare capacity. Deletion repairs
//! underfull nodes by borrowing from a sibling or merging with one, climbing
//! the parent chain up to (and possibly collapsing) the root. Parent links are
//! arena indices used only for that upward climb; the arena owns every node.

#![forbid(keyword_idents)]
#![forbid(non_ascii_idents)]
#![forbid(unreachable_pub)]
#![warn(clippy::all)]
#![warn(clippy::cargo)]
#![warn(clippy::pedantic)]

mod error;
mod order;
mod raw;

pub mod btree;

pub use btree::topology::{Topology, TreeEdge, TreeNode};
pub use btree::{BTree, Iter};
pub use error::{Error, Result};
