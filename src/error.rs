//! Errors returned while building a trie. Queries never fail.

use thiserror::Error;

/// Errors returned by [`HashedTrie::build`](crate::HashedTrie::build).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum BuildError {
    /// The configuration cannot produce a usable table layout
    #[error("invalid trie configuration: {reason}")]
    InvalidConfig {
        /// What is wrong with the configuration
        reason: String,
    },

    /// The same key was supplied more than once
    #[error("duplicate key at input position {position}")]
    DuplicateKey {
        /// Index of the second occurrence in the input
        position: usize,
    },

    /// No hash layout up to the configured width placed every node
    #[error(
        "could not place {nodes} nodes at depth {depth} with up to {max_hash_bits} hash bits"
    )]
    PlacementFailed {
        /// Depth of the level that kept colliding
        depth: usize,
        /// Number of nodes at that level
        nodes: usize,
        /// Largest hash width that was tried
        max_hash_bits: u32,
    },
}
