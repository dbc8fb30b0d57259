//! Authentication paths and their verification.
//!
//! A [`MerklePath`] is the pair `(path, direction_bits)`: `depth` sibling
//! hashes ordered leaf-to-root, and one bit per level telling on which side
//! the sibling sits (`0` = sibling is the right child, `1` = sibling is the
//! left child). Both halves have the same length and encode with bincode in a
//! fixed big-endian layout, so a verifier with no access to the tree can
//! consume them.
//!
//! Placement of a node against its sibling always goes through [`Side`], the
//! same rule insert and update use, so index-derived and bit-derived
//! recomputations cannot drift apart.

use bincode::{Decode, Encode};
use incremental_merkle_costs::{CostContext, CostResult, CostsExt, OperationCost};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{MerkleHasher, MerkleTreeError};

/// Upper bound for decoding proofs; a depth-32 path is well below it.
const MAX_PROOF_BYTES: usize = 64 * 1024;

/// Which child of its parent a node is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// Even index; the sibling is on the right.
    Left,
    /// Odd index; the sibling is on the left.
    Right,
}

impl Side {
    /// Side of the node at `index` within its level.
    pub fn of_index(index: u64) -> Self {
        if index % 2 == 0 { Side::Left } else { Side::Right }
    }

    /// Parse a direction bit.
    pub fn from_direction_bit(bit: u8) -> Result<Self, MerkleTreeError> {
        match bit {
            0 => Ok(Side::Left),
            1 => Ok(Side::Right),
            other => Err(MerkleTreeError::InvalidProof(format!(
                "direction bit must be 0 or 1, got {}",
                other
            ))),
        }
    }

    /// The direction bit recorded in a [`MerklePath`] for a node on this side.
    pub fn direction_bit(self) -> u8 {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Index of the sibling of the node at `index`.
    pub fn sibling_index(self, index: u64) -> u64 {
        match self {
            Side::Left => index + 1,
            Side::Right => index - 1,
        }
    }

    /// Order `(node, sibling)` as `(left, right)`.
    pub fn arrange<N>(self, node: N, sibling: N) -> (N, N) {
        match self {
            Side::Left => (node, sibling),
            Side::Right => (sibling, node),
        }
    }
}

/// Recompute a root from a leaf and its siblings, placing each node by the
/// parity of its index.
pub(crate) fn root_from_index<H: MerkleHasher>(
    hasher: &H,
    leaf_index: u64,
    leaf: &H::Node,
    siblings: &[H::Node],
) -> CostContext<H::Node> {
    let mut cost = OperationCost::default();
    let mut index = leaf_index;
    let mut current = leaf.clone();
    for sibling in siblings {
        let (left, right) = Side::of_index(index).arrange(&current, sibling);
        current = hasher.compress(left, right);
        cost.hash_node_calls += 1;
        index >>= 1;
    }
    current.wrap_with_cost(cost)
}

/// Membership proof for one leaf.
#[derive(Debug, Clone, PartialEq, Eq, Encode, Decode)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MerklePath<N> {
    /// Sibling hashes, leaf level first.
    pub path: Vec<N>,
    /// One bit per level: `0` if the sibling is the right child, `1` if it is
    /// the left child.
    pub direction_bits: Vec<u8>,
}

impl<N> MerklePath<N> {
    /// Number of levels the path covers.
    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Sibling hashes, leaf level first.
    pub fn siblings(&self) -> &[N] {
        &self.path
    }

    /// Split into `(path, direction_bits)`.
    pub fn into_parts(self) -> (Vec<N>, Vec<u8>) {
        (self.path, self.direction_bits)
    }

    /// Check that both halves have equal length and every bit is 0 or 1.
    pub fn check_shape(&self) -> Result<(), MerkleTreeError> {
        if self.path.len() != self.direction_bits.len() {
            return Err(MerkleTreeError::InvalidProof(format!(
                "path has {} siblings but {} direction bits",
                self.path.len(),
                self.direction_bits.len()
            )));
        }
        if self.path.len() > 64 {
            return Err(MerkleTreeError::InvalidProof(format!(
                "path of {} levels is too deep",
                self.path.len()
            )));
        }
        for bit in &self.direction_bits {
            Side::from_direction_bit(*bit)?;
        }
        Ok(())
    }

    /// Leaf index encoded by the direction bits (bit `i` is bit `i` of the
    /// index).
    pub fn leaf_index(&self) -> Result<u64, MerkleTreeError> {
        self.check_shape()?;
        Ok(self
            .direction_bits
            .iter()
            .enumerate()
            .fold(0u64, |index, (level, bit)| index | (u64::from(*bit) << level)))
    }

    /// Recompute the root for `leaf`, placing each node by the direction bits.
    pub fn compute_root<H>(&self, hasher: &H, leaf: &N) -> CostResult<N, MerkleTreeError>
    where
        H: MerkleHasher<Node = N>,
        N: Clone,
    {
        let mut cost = OperationCost::default();
        if let Err(e) = self.check_shape() {
            return Err(e).wrap_with_cost(cost);
        }
        let mut current = leaf.clone();
        for (sibling, bit) in self.path.iter().zip(&self.direction_bits) {
            let side = match Side::from_direction_bit(*bit) {
                Ok(side) => side,
                Err(e) => return Err(e).wrap_with_cost(cost),
            };
            let (left, right) = side.arrange(&current, sibling);
            current = hasher.compress(left, right);
            cost.hash_node_calls += 1;
        }
        Ok(current).wrap_with_cost(cost)
    }

    /// Verify that `leaf` is committed under `expected_root`, using the
    /// direction bits for placement.
    pub fn verify<H>(
        &self,
        hasher: &H,
        leaf: &N,
        expected_root: &N,
    ) -> CostResult<bool, MerkleTreeError>
    where
        H: MerkleHasher<Node = N>,
        N: Clone + Eq + std::fmt::Debug,
    {
        let cost = OperationCost::default();
        if let Err(e) = validate_all(hasher, leaf, &self.path) {
            return Err(e).wrap_with_cost(cost);
        }
        self.compute_root(hasher, leaf)
            .map_ok(|root| &root == expected_root)
    }

    /// Serialize this proof to bytes using bincode.
    pub fn encode_to_vec(&self) -> Result<Vec<u8>, MerkleTreeError>
    where
        N: Encode,
    {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_no_limit();
        bincode::encode_to_vec(self, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("failed to encode path: {}", e)))
    }

    /// Deserialize a proof from bytes and check its shape.
    ///
    /// Element values are not checked here; the hash engine validates them
    /// when the proof is used.
    pub fn decode_from_slice(bytes: &[u8]) -> Result<Self, MerkleTreeError>
    where
        N: Decode<()>,
    {
        let config = bincode::config::standard()
            .with_big_endian()
            .with_limit::<MAX_PROOF_BYTES>();
        let (proof, read): (Self, usize) = bincode::decode_from_slice(bytes, config)
            .map_err(|e| MerkleTreeError::InvalidProof(format!("failed to decode path: {}", e)))?;
        if read != bytes.len() {
            return Err(MerkleTreeError::InvalidProof(format!(
                "{} trailing bytes after path",
                bytes.len() - read
            )));
        }
        proof.check_shape()?;
        Ok(proof)
    }
}

impl<N> AsRef<[N]> for MerklePath<N> {
    fn as_ref(&self) -> &[N] {
        &self.path
    }
}

/// Run the engine's domain check over a leaf and a sibling list.
pub(crate) fn validate_all<H: MerkleHasher>(
    hasher: &H,
    leaf: &H::Node,
    siblings: &[H::Node],
) -> Result<(), MerkleTreeError> {
    hasher.validate(leaf)?;
    siblings.iter().try_for_each(|sibling| hasher.validate(sibling))
}

/// Verify membership without access to the tree.
///
/// Places nodes by the parity of `leaf_index`, exactly as the tree does. The
/// path length is taken as the tree depth; `leaf_index` must fit in it.
pub fn verify_membership<H: MerkleHasher>(
    hasher: &H,
    leaf_index: u64,
    leaf: &H::Node,
    siblings: &[H::Node],
    expected_root: &H::Node,
) -> CostResult<bool, MerkleTreeError> {
    let mut cost = OperationCost::default();
    let depth = siblings.len();
    if depth == 0 || depth > 64 {
        return Err(MerkleTreeError::InvalidProof(format!(
            "path must cover between 1 and 64 levels, got {}",
            depth
        )))
        .wrap_with_cost(cost);
    }
    if depth < 64 && leaf_index >> depth != 0 {
        return Err(MerkleTreeError::InvalidIndex {
            index: leaf_index,
            reason: format!("does not fit a tree of depth {}", depth),
        })
        .wrap_with_cost(cost);
    }
    if let Err(e) = validate_all(hasher, leaf, siblings) {
        return Err(e).wrap_with_cost(cost);
    }
    let root = root_from_index(hasher, leaf_index, leaf, siblings).unwrap_add_cost(&mut cost);
    Ok(&root == expected_root).wrap_with_cost(cost)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Blake3Hasher, DefaultHasher, FieldElement};

    fn sample_path() -> MerklePath<FieldElement> {
        MerklePath {
            path: vec![
                FieldElement::from_u64(10),
                FieldElement::from_u64(11),
                FieldElement::from_u64(12),
            ],
            direction_bits: vec![1, 0, 1],
        }
    }

    #[test]
    fn test_side_rule() {
        assert_eq!(Side::of_index(0), Side::Left);
        assert_eq!(Side::of_index(7), Side::Right);
        assert_eq!(Side::Left.sibling_index(6), 7);
        assert_eq!(Side::Right.sibling_index(7), 6);
        assert_eq!(Side::Left.arrange(1, 2), (1, 2));
        assert_eq!(Side::Right.arrange(1, 2), (2, 1));
        for bit in [0u8, 1] {
            assert_eq!(
                Side::from_direction_bit(bit).expect("valid bit").direction_bit(),
                bit
            );
        }
        assert!(Side::from_direction_bit(2).is_err());
    }

    #[test]
    fn test_leaf_index_from_bits() {
        assert_eq!(sample_path().leaf_index(), Ok(0b101));
    }

    #[test]
    fn test_bits_and_parity_agree() {
        let hasher = DefaultHasher::default();
        let path = sample_path();
        let leaf = FieldElement::from_u64(99);
        let by_bits = path.compute_root(&hasher, &leaf).unwrap().expect("root");
        let by_index = root_from_index(&hasher, 0b101, &leaf, &path.path).value;
        assert_eq!(by_bits, by_index);
    }

    #[test]
    fn test_verify_membership_standalone() {
        let hasher = Blake3Hasher;
        let leaf = [5u8; 32];
        let siblings = vec![[1u8; 32], [2u8; 32]];
        let root = hasher.compress(&hasher.compress(&siblings[0], &leaf), &siblings[1]);

        let ctx = verify_membership(&hasher, 1, &leaf, &siblings, &root);
        assert_eq!(ctx.cost.hash_node_calls, 2);
        assert_eq!(ctx.value, Ok(true));

        assert_eq!(
            verify_membership(&hasher, 0, &leaf, &siblings, &root).unwrap(),
            Ok(false)
        );
        assert!(verify_membership(&hasher, 4, &leaf, &siblings, &root)
            .unwrap()
            .is_err());
        assert!(verify_membership(&hasher, 0, &leaf, &[], &root)
            .unwrap()
            .is_err());
    }

    #[test]
    fn test_shape_errors() {
        let mut path = sample_path();
        path.direction_bits.pop();
        assert!(path.check_shape().is_err());

        let mut path = sample_path();
        path.direction_bits[0] = 3;
        assert!(path.leaf_index().is_err());
        assert!(path
            .compute_root(&DefaultHasher::default(), &FieldElement::ZERO)
            .unwrap()
            .is_err());
    }

    #[test]
    fn test_encoding_is_fixed_width() {
        let path = sample_path();
        let bytes = path.encode_to_vec().expect("encode");
        // varint length + 3 * 32 bytes, varint length + 3 bits
        assert_eq!(bytes.len(), 1 + 96 + 1 + 3);
        assert_eq!(&bytes[1..33], FieldElement::from_u64(10).as_bytes());

        let decoded = MerklePath::<FieldElement>::decode_from_slice(&bytes).expect("decode");
        assert_eq!(decoded, path);
    }

    #[test]
    fn test_decode_rejects_garbage() {
        let path = sample_path();
        let mut bytes = path.encode_to_vec().expect("encode");
        bytes.push(0);
        assert!(MerklePath::<FieldElement>::decode_from_slice(&bytes).is_err());

        let bytes = path.encode_to_vec().expect("encode");
        assert!(MerklePath::<FieldElement>::decode_from_slice(&bytes[..40]).is_err());

        let mut bad_bit = path.clone();
        bad_bit.direction_bits[2] = 9;
        let bytes = bad_bit.encode_to_vec().expect("encode");
        assert!(MerklePath::<FieldElement>::decode_from_slice(&bytes).is_err());
    }
}
