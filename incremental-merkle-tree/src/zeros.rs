//! Hashes of empty subtrees, one per level.

use incremental_merkle_costs::{CostContext, CostsExt, OperationCost};

use crate::MerkleHasher;

/// Precomputed empty-subtree hashes.
///
/// `at(0)` is the zero leaf and `at(i) = H(at(i - 1), at(i - 1))`; the root of
/// an empty tree is `H(at(depth - 1), at(depth - 1))`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZeroTable<N> {
    zeros: Vec<N>,
    empty_root: N,
}

impl<N: Clone> ZeroTable<N> {
    /// Build the table with `depth` compression calls.
    pub fn build<H>(hasher: &H, depth: u8, zero_value: N) -> CostContext<Self>
    where
        H: MerkleHasher<Node = N>,
    {
        let mut cost = OperationCost::default();
        let mut zeros = Vec::with_capacity(depth as usize);
        let mut current = zero_value;
        for _ in 1..depth {
            let next = hasher.compress(&current, &current);
            cost.hash_node_calls += 1;
            zeros.push(std::mem::replace(&mut current, next));
        }
        let empty_root = hasher.compress(&current, &current);
        cost.hash_node_calls += 1;
        zeros.push(current);

        ZeroTable { zeros, empty_root }.wrap_with_cost(cost)
    }

    /// Empty-subtree hash at `level`.
    ///
    /// Panics if `level >= depth`; the tree only asks for levels it walks.
    pub fn at(&self, level: usize) -> &N {
        &self.zeros[level]
    }

    /// Root of a tree holding no leaves.
    pub fn empty_root(&self) -> &N {
        &self.empty_root
    }

    /// All levels, leaf level first.
    pub fn as_slice(&self) -> &[N] {
        &self.zeros
    }

    /// Number of levels (the tree depth).
    pub fn len(&self) -> usize {
        self.zeros.len()
    }

    /// Always `false`: depth is at least one.
    pub fn is_empty(&self) -> bool {
        self.zeros.is_empty()
    }
}
