//! Field element node type.
//!
//! Nodes live in the BN254 scalar field, the field used by the common SNARK
//! toolchains, so that roots and paths produced here can be checked by a
//! circuit or an on-chain verifier. Elements are stored as 32 big-endian
//! bytes; only canonical encodings (strictly below the modulus) are valid.

use std::fmt;

use bincode::{Decode, Encode};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MerkleTreeError;

/// The BN254 scalar field modulus, big-endian.
pub const FIELD_MODULUS: [u8; 32] = [
    0x30, 0x64, 0x4e, 0x72, 0xe1, 0x31, 0xa0, 0x29, 0xb8, 0x50, 0x45, 0xb6, 0x81, 0x81, 0x58, 0x5d,
    0x28, 0x33, 0xe8, 0x48, 0x79, 0xb9, 0x70, 0x91, 0x43, 0xe1, 0xf5, 0x93, 0xf0, 0x00, 0x00, 0x01,
];

/// Mask applied to the most significant byte of a digest so that the result
/// is below `2^253`, which is below the modulus.
const TOP_BYTE_MASK: u8 = 0x1f;

/// An element of the BN254 scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldElement([u8; 32]);

impl FieldElement {
    /// The additive identity.
    pub const ZERO: FieldElement = FieldElement([0u8; 32]);

    /// Parse a canonical big-endian encoding.
    pub fn from_bytes(bytes: [u8; 32]) -> Result<Self, MerkleTreeError> {
        let element = FieldElement(bytes);
        if !element.is_canonical() {
            return Err(MerkleTreeError::InvalidInput(format!(
                "{} is not below the field modulus",
                element
            )));
        }
        Ok(element)
    }

    /// Parse a canonical big-endian encoding from a slice of exactly 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, MerkleTreeError> {
        let array: [u8; 32] = bytes.try_into().map_err(|_| {
            MerkleTreeError::InvalidInput(format!(
                "field element must be 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Self::from_bytes(array)
    }

    /// Embed a `u64` (always canonical).
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; 32];
        bytes[24..].copy_from_slice(&value.to_be_bytes());
        FieldElement(bytes)
    }

    /// Reduce a 32-byte digest into the field by clearing its top three bits.
    pub(crate) fn from_digest(mut digest: [u8; 32]) -> Self {
        digest[0] &= TOP_BYTE_MASK;
        FieldElement(digest)
    }

    /// Returns `true` if the encoding is strictly below the modulus.
    ///
    /// Big-endian byte order makes lexicographic comparison numeric.
    pub fn is_canonical(&self) -> bool {
        self.0 < FIELD_MODULUS
    }

    /// Big-endian bytes.
    pub fn to_bytes(self) -> [u8; 32] {
        self.0
    }

    /// Borrow the big-endian bytes.
    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<u64> for FieldElement {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}

impl TryFrom<[u8; 32]> for FieldElement {
    type Error = MerkleTreeError;

    fn try_from(bytes: [u8; 32]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for FieldElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FieldElement({})", self)
    }
}
