use std::sync::Arc;

use incremental_merkle_costs::CostResult;
use parking_lot::RwLock;

use crate::{
    IncrementalMerkleTree, MerkleHasher, MerkleTreeError, TreeSnapshot, TreeState,
    proof::MerklePath,
};

/// A tree shared between threads.
///
/// Each mutation holds the write lock for its whole duration; reads hold the
/// read lock, so no reader sees a new root next to stale path-cache entries.
/// Clones share the same tree.
#[derive(Debug)]
pub struct SharedMerkleTree<H: MerkleHasher> {
    inner: Arc<RwLock<IncrementalMerkleTree<H>>>,
}

impl<H: MerkleHasher> Clone for SharedMerkleTree<H> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<H: MerkleHasher> From<IncrementalMerkleTree<H>> for SharedMerkleTree<H> {
    fn from(tree: IncrementalMerkleTree<H>) -> Self {
        Self::new(tree)
    }
}

impl<H: MerkleHasher> SharedMerkleTree<H> {
    /// Wrap a tree.
    pub fn new(tree: IncrementalMerkleTree<H>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(tree)),
        }
    }

    /// See [`IncrementalMerkleTree::insert`].
    pub fn insert(&self, leaf: H::Node) -> CostResult<u64, MerkleTreeError> {
        self.inner.write().insert(leaf)
    }

    /// See [`IncrementalMerkleTree::update`].
    pub fn update(
        &self,
        leaf_index: u64,
        new_leaf: H::Node,
        old_leaf_proof: impl AsRef<[H::Node]>,
    ) -> CostResult<H::Node, MerkleTreeError> {
        self.inner
            .write()
            .update(leaf_index, new_leaf, old_leaf_proof)
    }

    /// See [`IncrementalMerkleTree::get_path_update`].
    pub fn get_path_update(
        &self,
        leaf_index: u64,
    ) -> CostResult<MerklePath<H::Node>, MerkleTreeError> {
        self.inner.read().get_path_update(leaf_index)
    }

    /// See [`IncrementalMerkleTree::leaf_exists`].
    pub fn leaf_exists(
        &self,
        leaf_index: u64,
        leaf: &H::Node,
        path: impl AsRef<[H::Node]>,
    ) -> CostResult<bool, MerkleTreeError> {
        self.inner.read().leaf_exists(leaf_index, leaf, path)
    }

    /// Current root.
    pub fn root(&self) -> H::Node {
        self.inner.read().root().clone()
    }

    /// Number of leaves.
    pub fn next_index(&self) -> u64 {
        self.inner.read().next_index()
    }

    /// Fill state.
    pub fn state(&self) -> TreeState {
        self.inner.read().state()
    }

    /// Leaf at `index` together with its path, read under one lock.
    pub fn leaf_with_path(
        &self,
        leaf_index: u64,
    ) -> CostResult<(H::Node, MerklePath<H::Node>), MerkleTreeError> {
        let tree = self.inner.read();
        tree.get_path_update(leaf_index).map_ok(|path| {
            // get_path_update only succeeds for inserted leaves
            let leaf = tree.leaves()[leaf_index as usize].clone();
            (leaf, path)
        })
    }

    /// Consistent read-only copy of the current state.
    pub fn snapshot(&self) -> TreeSnapshot<H>
    where
        H: Clone,
    {
        self.inner.read().snapshot()
    }

    /// Run `f` against the tree under the read lock.
    pub fn with_read<R>(&self, f: impl FnOnce(&IncrementalMerkleTree<H>) -> R) -> R {
        f(&*self.inner.read())
    }
}
