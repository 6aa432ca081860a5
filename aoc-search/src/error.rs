//! Error types shared by both search engines.

use std::convert::Infallible;

use thiserror::Error;

/// A bounded container refused to grow past its configured limit.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{what} reached its limit of {limit} entries")]
pub struct CapacityExceeded {
    /// Which container overflowed (`"visited registry"`, `"memo table"`, ...)
    pub what: &'static str,
    /// The configured limit
    pub limit: usize,
}

/// Error returned by [`GraphSearch`](crate::GraphSearch) and
/// [`BranchAndBound`](crate::BranchAndBound).
///
/// `E` is the error type of the caller-supplied neighbor or decision function.
/// Caller failures are carried through [`SearchError::Caller`] untouched.
///
/// "No path" is not an error: searches report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SearchError<E = Infallible> {
    /// A weighted transition carried a negative cost
    #[error("negative transition cost {cost} out of {from}")]
    NegativeCost { from: String, cost: String },

    /// A unit-cost search was handed a transition whose cost is not one
    #[error("unit-cost search received transition cost {cost} out of {from}")]
    NonUnitCost { from: String, cost: String },

    /// A branch-and-bound step consumed no budget
    #[error("decision out of {from} consumed no budget")]
    ZeroCostStep { from: String },

    /// Accumulated cost no longer fits the cost type
    #[error("accumulated cost overflowed")]
    CostOverflow,

    /// Two different states produced the same memo key
    #[error("memo key {key} is shared by {first} and {second}")]
    KeyCollision {
        key: String,
        first: String,
        second: String,
    },

    /// Expansion budget exhausted before the search finished
    #[error("search aborted after {expanded} expansions (limit {limit})")]
    ExpansionLimit { expanded: usize, limit: usize },

    /// Wall-clock budget exhausted before the search finished
    #[error("search aborted by deadline after {expanded} expansions")]
    DeadlineExceeded { expanded: usize },

    #[error(transparent)]
    Capacity(#[from] CapacityExceeded),

    /// The caller's neighbor or decision function failed
    #[error(transparent)]
    Caller(E),
}

impl<E> SearchError<E> {
    /// True when the search gave up on a step or time budget.
    pub fn is_aborted(&self) -> bool {
        matches!(
            self,
            SearchError::ExpansionLimit { .. } | SearchError::DeadlineExceeded { .. }
        )
    }
}
