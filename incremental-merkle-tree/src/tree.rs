use incremental_merkle_costs::{
    CostResult, CostsExt, OperationCost, cost_return_on_error, cost_return_on_error_no_add,
};
use log::{debug, trace, warn};

use crate::{
    MerkleHasher, MerkleTreeError, TreeConfig, TreeSnapshot,
    cache::PathCache,
    proof::{MerklePath, Side, root_from_index, validate_all},
    zeros::ZeroTable,
};

/// Fill state of a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeState {
    /// No leaves yet.
    Empty,
    /// Some leaves, room for more.
    PartiallyFilled,
    /// Every position holds a leaf; further inserts are rejected.
    Full,
}

/// A fixed-depth, append-only Merkle tree with O(depth) insert and update.
///
/// Leaves are appended left to right. Positions at or beyond
/// [`next_index`](Self::next_index) implicitly hold the zero value and are
/// never materialized. Three caches keep every operation at `depth`
/// compressions:
///
/// - the zero table (empty-subtree hash per level),
/// - the filled subtrees (per level, the latest even-indexed node on the
///   insertion frontier, used as the left sibling of the next odd fill),
/// - the path cache (every node hash ever computed, the source of proofs).
///
/// Mutators take `&mut self`, so a tree is single-writer by construction. Use
/// [`SharedMerkleTree`](crate::SharedMerkleTree) to share one across threads
/// and [`snapshot`](Self::snapshot) to hand out a read-only copy.
#[derive(Debug, Clone)]
pub struct IncrementalMerkleTree<H: MerkleHasher> {
    hasher: H,
    config: TreeConfig<H::Node>,
    zeros: ZeroTable<H::Node>,
    filled_subtrees: Vec<H::Node>,
    filled_paths: PathCache<H::Node>,
    leaves: Vec<H::Node>,
    next_index: u64,
    root: H::Node,
}

/// Create a tree of `depth` levels whose empty leaves hold `zero_value`.
pub fn create_merkle_tree<H: MerkleHasher>(
    depth: u8,
    zero_value: H::Node,
    hasher: H,
) -> Result<IncrementalMerkleTree<H>, MerkleTreeError> {
    IncrementalMerkleTree::new(TreeConfig::new(depth, zero_value)?, hasher)
}

impl<H: MerkleHasher> IncrementalMerkleTree<H> {
    /// Create an empty tree.
    ///
    /// Builds the zero table with `depth` compressions; the initial root is
    /// the root of an all-zero tree.
    pub fn new(config: TreeConfig<H::Node>, hasher: H) -> Result<Self, MerkleTreeError> {
        config.validate()?;
        hasher.validate(&config.zero_value)?;

        let zeros = ZeroTable::build(&hasher, config.depth, config.zero_value.clone()).value;
        let filled_subtrees = zeros.as_slice().to_vec();
        let root = zeros.empty_root().clone();
        debug!(
            "created incremental merkle tree: depth={}, capacity={}",
            config.depth,
            config.capacity()
        );

        Ok(Self {
            filled_paths: PathCache::new(config.depth),
            hasher,
            config,
            zeros,
            filled_subtrees,
            leaves: Vec::new(),
            next_index: 0,
            root,
        })
    }

    /// Number of levels between a leaf and the root.
    pub fn depth(&self) -> u8 {
        self.config.depth
    }

    /// Maximum number of leaves, `2^depth`.
    pub fn capacity(&self) -> u64 {
        self.config.capacity()
    }

    /// Index the next inserted leaf will get; equals the number of leaves.
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    /// Current root.
    pub fn root(&self) -> &H::Node {
        &self.root
    }

    /// Inserted leaves, in insertion order.
    pub fn leaves(&self) -> &[H::Node] {
        &self.leaves
    }

    /// Leaf at `index`, or `None` if nothing was inserted there.
    pub fn leaf(&self, index: u64) -> Option<&H::Node> {
        usize::try_from(index)
            .ok()
            .and_then(|index| self.leaves.get(index))
    }

    /// The value unfilled positions hold.
    pub fn zero_value(&self) -> &H::Node {
        &self.config.zero_value
    }

    /// Empty-subtree hashes per level.
    pub fn zeros(&self) -> &ZeroTable<H::Node> {
        &self.zeros
    }

    /// Cached left siblings of the insertion frontier, per level.
    pub fn filled_subtrees(&self) -> &[H::Node] {
        &self.filled_subtrees
    }

    /// Cached node hash at `(level, index)`.
    pub fn path_node(&self, level: usize, index: u64) -> Option<&H::Node> {
        self.filled_paths.get(level, index)
    }

    /// The whole path cache.
    pub fn path_cache(&self) -> &PathCache<H::Node> {
        &self.filled_paths
    }

    /// The injected hash engine.
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Fill state.
    pub fn state(&self) -> TreeState {
        if self.next_index == 0 {
            TreeState::Empty
        } else if self.next_index < self.capacity() {
            TreeState::PartiallyFilled
        } else {
            TreeState::Full
        }
    }

    /// Compress two nodes with the tree's engine.
    pub fn hash_left_right(&self, left: &H::Node, right: &H::Node) -> H::Node {
        self.hasher.compress(left, right)
    }

    /// Take an immutable copy of the current state for read-only consumers.
    pub fn snapshot(&self) -> TreeSnapshot<H>
    where
        H: Clone,
    {
        TreeSnapshot::new(self.clone())
    }

    /// Append a leaf and return its index.
    ///
    /// Fails with [`MerkleTreeError::CapacityExceeded`] when the tree is full
    /// and with [`MerkleTreeError::InvalidInput`] when the engine rejects the
    /// leaf; the tree is untouched in both cases.
    pub fn insert(&mut self, leaf: H::Node) -> CostResult<u64, MerkleTreeError> {
        let mut cost = OperationCost::default();
        if self.next_index >= self.capacity() {
            return Err(MerkleTreeError::CapacityExceeded {
                capacity: self.capacity(),
            })
            .wrap_with_cost(cost);
        }
        cost_return_on_error_no_add!(cost, self.hasher.validate(&leaf));

        let leaf_index = self.next_index;
        let mut index = leaf_index;
        let mut current = leaf.clone();
        for level in 0..self.depth() as usize {
            let (left, right) = match Side::of_index(index) {
                Side::Left => {
                    self.filled_subtrees[level] = current.clone();
                    (current, self.zeros.at(level).clone())
                }
                Side::Right => (self.filled_subtrees[level].clone(), current),
            };
            current = self.hasher.compress(&left, &right);
            cost.hash_node_calls += 1;
            self.filled_paths.put_pair(level, index, left, right);
            cost.path_nodes_written += 2;
            index >>= 1;
        }

        self.root = current;
        self.leaves.push(leaf);
        self.next_index += 1;
        trace!(
            "inserted leaf {} (next_index={}, root={:?})",
            leaf_index, self.next_index, self.root
        );
        Ok(leaf_index).wrap_with_cost(cost)
    }

    /// Append several leaves, stopping at the first failure.
    ///
    /// Leaves inserted before the failure stay inserted.
    pub fn insert_many<I>(&mut self, leaves: I) -> CostResult<Vec<u64>, MerkleTreeError>
    where
        I: IntoIterator<Item = H::Node>,
    {
        let mut cost = OperationCost::default();
        let mut indices = Vec::new();
        for leaf in leaves {
            let index = cost_return_on_error!(&mut cost, self.insert(leaf));
            indices.push(index);
        }
        Ok(indices).wrap_with_cost(cost)
    }

    /// Authentication path of the leaf at `leaf_index`, read from the path
    /// cache.
    pub fn get_path_update(
        &self,
        leaf_index: u64,
    ) -> CostResult<MerklePath<H::Node>, MerkleTreeError> {
        let mut cost = OperationCost::default();
        cost_return_on_error_no_add!(cost, self.check_index(leaf_index));

        let depth = self.depth() as usize;
        let mut path = Vec::with_capacity(depth);
        let mut direction_bits = Vec::with_capacity(depth);
        let mut index = leaf_index;
        for level in 0..depth {
            let side = Side::of_index(index);
            let sibling_index = side.sibling_index(index);
            let Some(sibling) = self.filled_paths.get(level, sibling_index) else {
                return Err(MerkleTreeError::InvalidIndex {
                    index: leaf_index,
                    reason: format!(
                        "path cache has no node at level {} index {}",
                        level, sibling_index
                    ),
                })
                .wrap_with_cost(cost);
            };
            cost.path_nodes_loaded += 1;
            path.push(sibling.clone());
            direction_bits.push(side.direction_bit());
            index >>= 1;
        }

        Ok(MerklePath {
            path,
            direction_bits,
        })
        .wrap_with_cost(cost)
    }

    /// Check whether `leaf` sits at `leaf_index` under the current root.
    ///
    /// `path` is a sibling slice or a whole [`MerklePath`]. Node placement
    /// follows the parity of `leaf_index`; direction bits are not consulted.
    pub fn leaf_exists(
        &self,
        leaf_index: u64,
        leaf: &H::Node,
        path: impl AsRef<[H::Node]>,
    ) -> CostResult<bool, MerkleTreeError> {
        let mut cost = OperationCost::default();
        let path = path.as_ref();
        cost_return_on_error_no_add!(cost, self.check_index(leaf_index));
        cost_return_on_error_no_add!(cost, self.check_path(leaf, path));

        let candidate =
            root_from_index(&self.hasher, leaf_index, leaf, path).unwrap_add_cost(&mut cost);
        Ok(candidate == self.root).wrap_with_cost(cost)
    }

    /// Replace the leaf at `leaf_index` and return the new root.
    ///
    /// `old_leaf_proof` must authenticate the leaf currently stored at
    /// `leaf_index` against the current root; otherwise the call fails with
    /// [`MerkleTreeError::RootMismatch`] and nothing changes. The verified
    /// siblings are then reused to walk `new_leaf` up to a new root.
    pub fn update(
        &mut self,
        leaf_index: u64,
        new_leaf: H::Node,
        old_leaf_proof: impl AsRef<[H::Node]>,
    ) -> CostResult<H::Node, MerkleTreeError> {
        let mut cost = OperationCost::default();
        let old_leaf_proof = old_leaf_proof.as_ref();
        cost_return_on_error_no_add!(cost, self.check_index(leaf_index));
        cost_return_on_error_no_add!(cost, self.check_path(&new_leaf, old_leaf_proof));

        let old_leaf = &self.leaves[leaf_index as usize];
        let verified_root = root_from_index(&self.hasher, leaf_index, old_leaf, old_leaf_proof)
            .unwrap_add_cost(&mut cost);
        if verified_root != self.root {
            warn!("rejected update of leaf {}: proof does not match root", leaf_index);
            return Err(MerkleTreeError::RootMismatch).wrap_with_cost(cost);
        }

        // Frontier node per level whose hash the filled-subtree cache holds.
        let frontier = self.next_index - 1;
        let mut index = leaf_index;
        let mut current = new_leaf.clone();
        for (level, sibling) in old_leaf_proof.iter().enumerate() {
            if index == (frontier >> level) & !1 {
                self.filled_subtrees[level] = current.clone();
            }
            let (left, right) = Side::of_index(index).arrange(current, sibling.clone());
            current = self.hasher.compress(&left, &right);
            cost.hash_node_calls += 1;
            self.filled_paths.put_pair(level, index, left, right);
            cost.path_nodes_written += 2;
            index >>= 1;
        }

        self.root = current.clone();
        self.leaves[leaf_index as usize] = new_leaf;
        trace!("updated leaf {} (root={:?})", leaf_index, self.root);
        Ok(current).wrap_with_cost(cost)
    }

    fn check_index(&self, leaf_index: u64) -> Result<(), MerkleTreeError> {
        if leaf_index >= self.next_index {
            return Err(MerkleTreeError::InvalidIndex {
                index: leaf_index,
                reason: format!("only {} leaves inserted", self.next_index),
            });
        }
        Ok(())
    }

    fn check_path(&self, leaf: &H::Node, path: &[H::Node]) -> Result<(), MerkleTreeError> {
        if path.len() != self.depth() as usize {
            return Err(MerkleTreeError::InvalidProof(format!(
                "expected {} siblings, got {}",
                self.depth(),
                path.len()
            )));
        }
        validate_all(&self.hasher, leaf, path)
    }
}
