//! Shared helpers for the tree tests.

use std::cell::Cell;

use crate::{
    DefaultHasher, FieldElement, IncrementalMerkleTree, MerkleHasher, MerkleTreeError,
    PathCache, TreeConfig,
};

/// Field element from an integer (for test convenience).
pub(crate) fn fe(value: u64) -> FieldElement {
    FieldElement::from_u64(value)
}

/// Empty tree over field elements with a zero leaf of `0`.
pub(crate) fn new_tree(depth: u8) -> IncrementalMerkleTree<DefaultHasher> {
    IncrementalMerkleTree::new(
        TreeConfig::new(depth, FieldElement::ZERO).expect("valid depth"),
        DefaultHasher::default(),
    )
    .expect("create tree")
}

/// Tree of `depth` holding leaves `1..=count`.
pub(crate) fn filled_tree(depth: u8, count: u64) -> IncrementalMerkleTree<DefaultHasher> {
    let mut tree = new_tree(depth);
    for i in 1..=count {
        tree.insert(fe(i)).unwrap().expect("insert");
    }
    tree
}

/// Root computed from scratch by hashing every level of the padded tree.
pub(crate) fn naive_root<H: MerkleHasher>(
    hasher: &H,
    depth: u8,
    zero_value: &H::Node,
    leaves: &[H::Node],
) -> H::Node {
    let mut level: Vec<H::Node> = leaves.to_vec();
    level.resize(1usize << depth, zero_value.clone());
    for _ in 0..depth {
        level = level
            .chunks(2)
            .map(|pair| hasher.compress(&pair[0], &pair[1]))
            .collect();
    }
    level.remove(0)
}

/// Flip the lowest bit of an element; stays canonical for hashed values.
pub(crate) fn flip_low_bit(element: &FieldElement) -> FieldElement {
    let mut bytes = element.to_bytes();
    bytes[31] ^= 1;
    FieldElement::from_bytes(bytes).expect("low bit flip stays below modulus")
}

/// A non-canonical element, built the way a hostile decoder would.
pub(crate) fn non_canonical() -> FieldElement {
    let (element, _): (FieldElement, usize) =
        bincode::decode_from_slice(&[0xff; 32], bincode::config::standard())
            .expect("decode raw bytes");
    element
}

/// Everything a mutation may touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StateCapture<N> {
    pub leaves: Vec<N>,
    pub root: N,
    pub next_index: u64,
    pub filled_subtrees: Vec<N>,
    pub path_cache: PathCache<N>,
}

pub(crate) fn capture<H: MerkleHasher>(tree: &IncrementalMerkleTree<H>) -> StateCapture<H::Node> {
    StateCapture {
        leaves: tree.leaves().to_vec(),
        root: tree.root().clone(),
        next_index: tree.next_index(),
        filled_subtrees: tree.filled_subtrees().to_vec(),
        path_cache: tree.path_cache().clone(),
    }
}

/// Hasher that counts compressions.
#[derive(Debug, Default)]
pub(crate) struct CountingHasher {
    inner: DefaultHasher,
    calls: Cell<u64>,
}

impl CountingHasher {
    pub(crate) fn calls(&self) -> u64 {
        self.calls.get()
    }

    pub(crate) fn reset(&self) {
        self.calls.set(0);
    }
}

impl MerkleHasher for CountingHasher {
    type Node = FieldElement;

    fn compress(&self, left: &FieldElement, right: &FieldElement) -> FieldElement {
        self.calls.set(self.calls.get() + 1);
        self.inner.compress(left, right)
    }

    fn validate(&self, node: &FieldElement) -> Result<(), MerkleTreeError> {
        self.inner.validate(node)
    }
}
