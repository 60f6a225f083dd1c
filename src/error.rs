//! Errors returned by [`Tree`][crate::Tree] operations.

use thiserror::Error;

/// Everything that can go wrong when querying or shrinking a [`Tree`][crate::Tree].
///
/// None of these leave the tree modified: an operation either completes fully or fails before
/// touching any node.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// No node in the tree compares equal to the requested key.
    #[error("key not found")]
    KeyNotFound,
    /// The operation needs at least one node.
    #[error("tree is empty")]
    EmptyTree,
    /// `select` was asked for a rank outside `0..size`.
    #[error("index {index} is out of range for a tree of size {size}")]
    IndexOutOfRange {
        /// The requested rank.
        index: usize,
        /// The number of entries in the tree at the time of the call.
        size: usize,
    },
    /// No stored key is less than or equal to the query key.
    #[error("no key is less than or equal to the query key")]
    NoFloor,
    /// No stored key is greater than or equal to the query key.
    #[error("no key is greater than or equal to the query key")]
    NoCeiling,
}

/// Shorthand for results of tree operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
