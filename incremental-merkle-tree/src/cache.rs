use std::collections::HashMap;

/// Sparse record of every node hash the tree has computed, keyed by
/// `(level, index)`.
///
/// Only coordinates touched by an insert or update are populated; everything
/// else is implied by the zero table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathCache<N> {
    levels: Vec<HashMap<u64, N>>,
}

impl<N> PathCache<N> {
    pub(crate) fn new(depth: u8) -> Self {
        Self {
            levels: (0..depth).map(|_| HashMap::new()).collect(),
        }
    }

    /// Node hash at `(level, index)`, if it was ever written.
    pub fn get(&self, level: usize, index: u64) -> Option<&N> {
        self.levels.get(level).and_then(|nodes| nodes.get(&index))
    }

    /// Write the two children of one parent: `left` at the even index of the
    /// pair containing `index`, `right` at the odd one.
    pub(crate) fn put_pair(&mut self, level: usize, index: u64, left: N, right: N) {
        let nodes = &mut self.levels[level];
        nodes.insert(index & !1, left);
        nodes.insert(index | 1, right);
    }

    /// Number of populated coordinates at `level`.
    pub fn level_len(&self, level: usize) -> usize {
        self.levels.get(level).map_or(0, HashMap::len)
    }

    /// Number of populated coordinates over all levels.
    pub fn len(&self) -> usize {
        self.levels.iter().map(HashMap::len).sum()
    }

    /// Returns `true` before the first insert.
    pub fn is_empty(&self) -> bool {
        self.levels.iter().all(HashMap::is_empty)
    }
}
