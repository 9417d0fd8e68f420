use crate::error::{Error, Result};

/// A validated B-tree order with its derived node parameters.
///
/// `capacity` is the maximum number of keys any node may hold and
/// `min_keys` the minimum any non-root node must hold. Both are fixed when
/// the tree is constructed.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Order {
    order: usize,
    capacity: usize,
    min_keys: usize,
}

impl Order {
    pub(crate) fn new(order: usize) -> Result<Self> {
        if order < 3 {
            return Err(Error::InvalidOrder(order));
        }
        Ok(Self {
            order,
            capacity: order - 1,
            min_keys: order.div_ceil(2) - 1,
        })
    }

    #[inline]
    pub(crate) const fn get(self) -> usize {
        self.order
    }

    #[inline]
    pub(crate) const fn capacity(self) -> usize {
        self.capacity
    }

    #[inline]
    pub(crate) const fn min_keys(self) -> usize {
        self.min_keys
    }
}
