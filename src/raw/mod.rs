mod arena;
mod node;
mod node_id;
mod raw_btree;

pub(crate) use node_id::NodeId;
pub(crate) use raw_btree::RawBTree;
