//! Hash engines.
//!
//! The tree never hashes anything itself: every parent node is produced by
//! the [`MerkleHasher`] injected at construction time. Two engines ship with
//! the crate:
//!
//! - [`Blake3FieldHasher`]: a [`MultiHash`] over [`FieldElement`]s, used
//!   through [`MultiHashCompressor`] (`compress(a, b) = multi_hash([a, b])`).
//! - [`Blake3Hasher`]: plain 32-byte digests,
//!   `blake3(0x01 || left || right)`.

use std::fmt::Debug;

use crate::{FieldElement, MerkleTreeError};

/// Largest supported tree depth.
pub const MAX_DEPTH: u8 = 32;

/// Domain tag prepended to every compression input.
const INTERNAL_TAG: u8 = 0x01;

/// Validate that depth is in the allowed range [1, 32].
pub(crate) fn validate_depth(depth: u8) -> Result<(), MerkleTreeError> {
    if !(1..=MAX_DEPTH).contains(&depth) {
        return Err(MerkleTreeError::InvalidDepth {
            depth,
            max: MAX_DEPTH,
        });
    }
    Ok(())
}

/// A deterministic two-input compression function.
pub trait MerkleHasher {
    /// Node (and leaf) type.
    type Node: Clone + Eq + Debug;

    /// Combine two children into their parent.
    fn compress(&self, left: &Self::Node, right: &Self::Node) -> Self::Node;

    /// Reject values outside the engine's domain.
    fn validate(&self, node: &Self::Node) -> Result<(), MerkleTreeError> {
        let _ = node;
        Ok(())
    }
}

/// A deterministic multi-input hash, e.g. a sponge or MiMC-style permutation.
pub trait MultiHash {
    /// Element type.
    type Node: Clone + Eq + Debug;

    /// Hash an ordered sequence of elements.
    fn multi_hash(&self, inputs: &[Self::Node]) -> Self::Node;

    /// Reject values outside the hash's domain.
    fn validate(&self, node: &Self::Node) -> Result<(), MerkleTreeError> {
        let _ = node;
        Ok(())
    }
}

/// Adapts a [`MultiHash`] into a [`MerkleHasher`] by hashing the pair.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MultiHashCompressor<M>(pub M);

impl<M: MultiHash> MerkleHasher for MultiHashCompressor<M> {
    type Node = M::Node;

    fn compress(&self, left: &Self::Node, right: &Self::Node) -> Self::Node {
        self.0.multi_hash(&[left.clone(), right.clone()])
    }

    fn validate(&self, node: &Self::Node) -> Result<(), MerkleTreeError> {
        self.0.validate(node)
    }
}

/// Blake3 multi-hash over field elements.
///
/// `H(x_1..x_n) = reduce(blake3(0x01 || x_1 || .. || x_n))`, where `reduce`
/// clears the top three bits of the digest.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3FieldHasher;

impl MultiHash for Blake3FieldHasher {
    type Node = FieldElement;

    fn multi_hash(&self, inputs: &[FieldElement]) -> FieldElement {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[INTERNAL_TAG]);
        for input in inputs {
            hasher.update(input.as_bytes());
        }
        FieldElement::from_digest(*hasher.finalize().as_bytes())
    }

    fn validate(&self, node: &FieldElement) -> Result<(), MerkleTreeError> {
        if !node.is_canonical() {
            return Err(MerkleTreeError::InvalidInput(format!(
                "{} is not below the field modulus",
                node
            )));
        }
        Ok(())
    }
}

/// The engine used when no other is specified.
pub type DefaultHasher = MultiHashCompressor<Blake3FieldHasher>;

/// Blake3 compression over raw 32-byte digests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Blake3Hasher;

impl MerkleHasher for Blake3Hasher {
    type Node = [u8; 32];

    fn compress(&self, left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&[INTERNAL_TAG]);
        hasher.update(left);
        hasher.update(right);
        *hasher.finalize().as_bytes()
    }
}
