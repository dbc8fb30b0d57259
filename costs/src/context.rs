//! Value-plus-cost wrapper returned by tree operations.

use crate::OperationCost;

/// A value together with the work spent producing it.
#[must_use]
#[derive(Debug, Eq, PartialEq)]
pub struct CostContext<T> {
    /// What the operation returned.
    pub value: T,
    /// Work the operation performed, including on failure.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Move the cost into `acc` and return the value.
    pub fn unwrap_add_cost(self, acc: &mut OperationCost) -> T {
        *acc += self.cost;
        self.value
    }

    /// Return the value, discarding the cost.
    pub fn unwrap(self) -> T {
        self.value
    }

    /// Transform the value; the cost carries over unchanged.
    pub fn map<B>(self, f: impl FnOnce(T) -> B) -> CostContext<B> {
        CostContext {
            value: f(self.value),
            cost: self.cost,
        }
    }
}

/// Fallible operation result with its cost.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

impl<T, E> CostResult<T, E> {
    /// Transform the `Ok` value; errors and cost pass through.
    pub fn map_ok<B>(self, f: impl FnOnce(T) -> B) -> CostResult<B, E> {
        self.map(|result| result.map(f))
    }
}

/// Attach a cost to any value.
pub trait CostsExt: Sized {
    /// Wrap `self` with `cost`.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self> {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}
