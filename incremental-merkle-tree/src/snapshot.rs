use incremental_merkle_costs::CostResult;

use crate::{
    IncrementalMerkleTree, MerkleHasher, MerkleTreeError, TreeState, proof::MerklePath,
};

/// A frozen, read-only copy of a tree.
///
/// Taken with [`IncrementalMerkleTree::snapshot`] or
/// [`SharedMerkleTree::snapshot`](crate::SharedMerkleTree::snapshot). It owns
/// its own caches, so later mutations of the live tree never show through and
/// proofs read from it always match its root.
#[derive(Debug, Clone)]
pub struct TreeSnapshot<H: MerkleHasher> {
    tree: IncrementalMerkleTree<H>,
}

impl<H: MerkleHasher> TreeSnapshot<H> {
    pub(crate) fn new(tree: IncrementalMerkleTree<H>) -> Self {
        Self { tree }
    }

    /// Number of levels between a leaf and the root.
    pub fn depth(&self) -> u8 {
        self.tree.depth()
    }

    /// Maximum number of leaves.
    pub fn capacity(&self) -> u64 {
        self.tree.capacity()
    }

    /// Number of leaves at the time of the snapshot.
    pub fn next_index(&self) -> u64 {
        self.tree.next_index()
    }

    /// Root at the time of the snapshot.
    pub fn root(&self) -> &H::Node {
        self.tree.root()
    }

    /// Leaves at the time of the snapshot.
    pub fn leaves(&self) -> &[H::Node] {
        self.tree.leaves()
    }

    /// Leaf at `index`.
    pub fn leaf(&self, index: u64) -> Option<&H::Node> {
        self.tree.leaf(index)
    }

    /// The value unfilled positions hold.
    pub fn zero_value(&self) -> &H::Node {
        self.tree.zero_value()
    }

    /// Cached left siblings of the insertion frontier.
    pub fn filled_subtrees(&self) -> &[H::Node] {
        self.tree.filled_subtrees()
    }

    /// Cached node hash at `(level, index)`.
    pub fn path_node(&self, level: usize, index: u64) -> Option<&H::Node> {
        self.tree.path_node(level, index)
    }

    /// Fill state.
    pub fn state(&self) -> TreeState {
        self.tree.state()
    }

    /// See [`IncrementalMerkleTree::get_path_update`].
    pub fn get_path_update(
        &self,
        leaf_index: u64,
    ) -> CostResult<MerklePath<H::Node>, MerkleTreeError> {
        self.tree.get_path_update(leaf_index)
    }

    /// See [`IncrementalMerkleTree::leaf_exists`].
    pub fn leaf_exists(
        &self,
        leaf_index: u64,
        leaf: &H::Node,
        path: impl AsRef<[H::Node]>,
    ) -> CostResult<bool, MerkleTreeError> {
        self.tree.leaf_exists(leaf_index, leaf, path)
    }
}
