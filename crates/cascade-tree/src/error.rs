//! Error types for tree operations.

use thiserror::Error;

/// Result type alias for cascade-tree operations.
pub type Result<T> = std::result::Result<T, TreeError>;

/// Errors that can occur while operating on a node tree.
///
/// Index access is the only hard failure in the data model. Lookups by
/// name fail soft instead (empty sequence, count of zero), so probing for
/// optional keys stays cheap and error-free.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// Index access outside the valid range of a child or attribute list.
    #[error("index {index} out of range for {list} list of length {len}")]
    IndexOutOfBounds {
        /// Which list was accessed ("children" or "attributes")
        list: &'static str,
        /// The requested index
        index: usize,
        /// Length of the list at access time
        len: usize,
    },
}
