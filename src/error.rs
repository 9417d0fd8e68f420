use thiserror::Error;

/// Convenient Result type alias for fallible `mway_tree` operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors reported by this crate.
///
/// Only construction can fail; lookups and removals report absence through
/// their `bool` return values rather than an error.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum Error {
    /// The requested order would yield a node capacity below 2 or a minimum
    /// occupancy below 1, violating B-tree degree requirements.
    #[error("B-tree order must be at least 3, got {0}")]
    InvalidOrder(usize),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_order_display() {
        let err = Error::InvalidOrder(2);
        assert_eq!(err.to_string(), "B-tree order must be at least 3, got 2");
    }
}
