//! Fixed-depth, append-only, incrementally updatable Merkle tree.
//!
//! A tree of depth `D` commits to up to `2^D` leaves. Leaves are appended in
//! order; positions not yet filled implicitly hold a zero value. An insert
//! costs exactly `D` compressions and an update `2D` (verify, then apply):
//! the tree never recomputes more than the path between the touched leaf and
//! the root.
//!
//! # Core types
//!
//! - [`IncrementalMerkleTree`]: the tree (insert, update, get_path_update,
//!   leaf_exists).
//! - [`MerklePath`]: the `(path, direction_bits)` proof object, encodable
//!   with bincode for verifiers that have no access to the tree.
//! - [`verify_membership`]: standalone verifier.
//! - [`TreeSnapshot`]: immutable read-only view.
//! - [`SharedMerkleTree`]: reader/writer-locked handle for multi-threaded
//!   use.
//!
//! # Hash engines
//!
//! The compression function is injected through [`MerkleHasher`]. The crate
//! ships [`DefaultHasher`] (Blake3 into the BN254 scalar field, via
//! [`MultiHashCompressor`]) and [`Blake3Hasher`] (raw 32-byte digests).
//!
//! Every fallible operation returns a [`CostResult`] whose
//! [`OperationCost`] reports compression calls and path-cache traffic.

#![warn(missing_docs)]

mod cache;
mod config;
mod error;
mod field;
mod hash;
mod proof;
mod shared;
mod snapshot;
mod tree;
mod zeros;

#[cfg(test)]
pub(crate) mod test_utils;

pub use cache::PathCache;
pub use config::TreeConfig;
pub use error::MerkleTreeError;
pub use field::{FIELD_MODULUS, FieldElement};
pub use hash::{
    Blake3FieldHasher, Blake3Hasher, DefaultHasher, MAX_DEPTH, MerkleHasher, MultiHash,
    MultiHashCompressor,
};
pub use incremental_merkle_costs::{CostResult, CostsExt, OperationCost};
pub use proof::{MerklePath, Side, verify_membership};
pub use shared::SharedMerkleTree;
pub use snapshot::TreeSnapshot;
pub use tree::{IncrementalMerkleTree, TreeState, create_merkle_tree};
pub use zeros::ZeroTable;
