#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MerkleTreeError, hash::validate_depth};

/// Construction parameters of a tree.
///
/// Both values are fixed for the lifetime of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TreeConfig<N> {
    /// Number of levels between a leaf and the root. Capacity is
    /// `2^depth` leaves.
    pub depth: u8,
    /// The leaf value every unfilled position implicitly holds.
    pub zero_value: N,
}

impl<N> TreeConfig<N> {
    /// Create a validated config.
    pub fn new(depth: u8, zero_value: N) -> Result<Self, MerkleTreeError> {
        validate_depth(depth)?;
        Ok(Self { depth, zero_value })
    }

    /// Check the depth, e.g. after deserializing.
    pub fn validate(&self) -> Result<(), MerkleTreeError> {
        validate_depth(self.depth)
    }

    /// Maximum number of leaves.
    pub fn capacity(&self) -> u64 {
        1u64 << self.depth
    }
}
