use thiserror::Error;

/// Errors from incremental Merkle tree operations.
///
/// All of them are usage errors: retrying the same call against the same
/// tree state fails the same way.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MerkleTreeError {
    /// The leaf index is not backed by an inserted leaf, or its cached
    /// authentication path is incomplete.
    #[error("invalid leaf index {index}: {reason}")]
    InvalidIndex {
        /// The requested leaf index.
        index: u64,
        /// What is missing.
        reason: String,
    },
    /// The supplied proof does not authenticate the current root.
    #[error("proof does not authenticate the current root")]
    RootMismatch,
    /// Insert attempted on a full tree.
    #[error("tree is full (capacity {capacity})")]
    CapacityExceeded {
        /// Number of leaves the tree holds when full.
        capacity: u64,
    },
    /// A leaf or path element is outside the hash engine's domain.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// Tree depth outside the supported range.
    #[error("depth must be between 1 and {max}, got {depth}")]
    InvalidDepth {
        /// The rejected depth.
        depth: u8,
        /// Largest supported depth.
        max: u8,
    },
    /// A proof has the wrong shape or could not be decoded.
    #[error("invalid proof: {0}")]
    InvalidProof(String),
}
