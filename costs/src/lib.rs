#![deny(missing_docs)]
//! Interface crate to unify how Merkle tree operations report their costs.
//!
//! Every operation on the incremental Merkle tree returns a [`CostResult`]:
//! the operation's `Result` together with the [`OperationCost`] it incurred,
//! so callers can check that inserts and updates stay O(depth) even when the
//! operation fails half way.

pub mod context;

use std::ops::AddAssign;

pub use context::{CostContext, CostResult, CostsExt};

/// Piece of data representing the work an operation performed.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct OperationCost {
    /// How many times the two-input compression function was called.
    pub hash_node_calls: u32,
    /// How many node hashes were read from the path cache.
    pub path_nodes_loaded: u32,
    /// How many node hashes were written into the path cache.
    pub path_nodes_written: u32,
}

impl AddAssign for OperationCost {
    fn add_assign(&mut self, rhs: Self) {
        self.hash_node_calls += rhs.hash_node_calls;
        self.path_nodes_loaded += rhs.path_nodes_loaded;
        self.path_nodes_written += rhs.path_nodes_written;
    }
}

/// `?` for a `CostResult`: adds the step's cost to `$cost`, then yields the
/// `Ok` value or returns the error wrapped with everything accumulated so far.
#[macro_export]
macro_rules! cost_return_on_error {
    ( &mut $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result_with_cost = { $($body)+ };
            let result = result_with_cost.unwrap_add_cost(&mut $cost);
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

/// `?` for a plain `Result` inside a costed operation: on error, returns it
/// wrapped with the cost accumulated in `$cost`.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( $cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}
