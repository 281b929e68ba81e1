//! Error types.
//!
//! Query evaluation itself never fails: unknown cursors, empty logs and zero
//! limits all produce an empty window. Errors are limited to building a
//! [`QueryDescriptor`](crate::QueryDescriptor) from an ambiguous option set
//! and to assembling an index from foreign entries.

/// Errors raised while validating query options.
#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    /// Two bound options were set that select different windows.
    #[error("conflicting bounds: `{first}` and `{second}` cannot be combined")]
    ConflictingBounds {
        /// The first bound option set, in `gt, gte, lt, lte` order.
        first: &'static str,
        /// The next bound option set after `first`.
        second: &'static str,
    },

    /// The option bag could not be parsed.
    #[error("invalid query options: {0}")]
    Options(#[from] serde_json::Error),
}

/// Errors raised while building or appending to a [`LogIndex`](crate::LogIndex).
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    /// The same hash appears more than once in the supplied entries.
    #[error("duplicate entry hash {0}")]
    DuplicateHash(String),

    /// An entry's hash does not match its operation, payload and link.
    #[error("entry hash {0} does not match its content")]
    HashMismatch(String),

    /// An entry does not link to the entry before it.
    #[error("entry {0} does not link to the preceding entry")]
    BrokenChain(String),
}
