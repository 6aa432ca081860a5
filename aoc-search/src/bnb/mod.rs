//! Bounded depth-first maximization over combinatorial states.
//!
//! A [`BranchProblem`] describes states, the decisions available in each
//! state and what a decision costs and earns. [`BranchAndBound`] explores
//! every decision sequence that fits in the budget, memoizing the exact
//! optimum of each `(remaining budget, key)` pair:
//!
//! 1. look the key up in the memo and return on a hit
//! 2. seed the running maximum with the baseline (take no further action)
//! 3. for every decision, skip it if dominated (pruning), apply it, drop it
//!    if it does not fit the budget, otherwise recurse and update the maximum
//! 4. store the maximum before returning
//!
//! Memoization is exact, so the key must identify every field that can change
//! the optimal continuation. An under-specified key silently returns wrong
//! answers; enable [`BranchAndBoundBuilder::verify_keys`] while developing a
//! new problem to turn those into [`SearchError::KeyCollision`].
//!
//! Two cooperating agents that share one-shot decisions are handled with
//! [`BranchAndBound::record_decision_sets`] and
//! [`best_disjoint_pair`](crate::best_disjoint_pair).
//!
//! [`SearchError::KeyCollision`]: crate::SearchError::KeyCollision
//!
//! # Example
//!
//! ```rust
//! use aoc_search::{BranchAndBound, BranchProblem, Budget, Step};
//! use std::convert::Infallible;
//!
//! /// Buy one machine at a time; each earns 1 per remaining turn.
//! struct Machines {
//!     price: u32,
//! }
//!
//! impl BranchProblem for Machines {
//!     type State = u32; // machines owned
//!     type Key = u32;
//!     type Decision = ();
//!     type Value = u32;
//!     type Error = Infallible;
//!
//!     fn key(&self, owned: &u32) -> u32 {
//!         *owned
//!     }
//!
//!     fn baseline(&self, _owned: &u32, _remaining: Budget) -> u32 {
//!         0
//!     }
//!
//!     fn decisions(&self, _owned: &u32, _remaining: Budget) -> Result<Vec<()>, Infallible> {
//!         Ok(vec![()])
//!     }
//!
//!     fn apply(&self, owned: &u32, _: &(), remaining: Budget) -> Option<Step<u32, u32>> {
//!         Some(Step {
//!             state: owned + 1,
//!             cost: self.price,
//!             gain: remaining.saturating_sub(self.price),
//!         })
//!     }
//! }
//!
//! // Buying at turn 0 and turn 2 of a 5-turn budget earns 3 + 1
//! let outcome = BranchAndBound::new()
//!     .maximize(&Machines { price: 2 }, &0, 5)
//!     .unwrap();
//! assert_eq!(outcome.value, 4);
//! ```

mod bounds;
mod engine;

pub use bounds::{is_saturated, turns_to_afford};
pub use engine::{
    BnbMemo, BnbStats, BranchAndBound, BranchAndBoundBuilder, BranchProblem, Budget,
    DecisionSetRecords, DecisionSets, MemoKey, Outcome, Step,
};

#[cfg(test)]
mod tests;
