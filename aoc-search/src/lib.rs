//! Search engines shared by the puzzle solvers.
//!
//! Two families of search live here:
//!
//! - [`GraphSearch`]: breadth-first and Dijkstra shortest paths over implicit
//!   graphs, with multi-start seeding, path reconstruction and optional
//!   expansion, state and time budgets.
//! - [`BranchAndBound`]: depth-first maximization over combinatorial states
//!   with exact memoization, dominance pruning and admissible upper bounds,
//!   plus disjoint-set pairing for two cooperating agents.
//!
//! [`DriftField`] answers "is this cell blocked at tick `t`" for obstacles that
//! wrap around a grid, which turns time-dependent navigation into an ordinary
//! graph search over `(position, t % cycle)` states.
//!
//! Each search call is single-threaded and owns its frontier, visited
//! registry and memo table. Reuse across calls happens only through data the
//! caller passes in explicitly, such as [`BranchAndBound::maximize_with`].

pub mod bnb;
pub mod cost;
pub mod error;
pub mod frontier;
pub mod graph;
pub mod memo;
pub mod pairing;
pub mod periodic;
pub mod visited;

pub use bnb::{
    BnbMemo, BnbStats, BranchAndBound, BranchAndBoundBuilder, BranchProblem, Budget,
    DecisionSetRecords, DecisionSets, Outcome, Step, is_saturated, turns_to_afford,
};
pub use cost::Cost;
pub use error::{CapacityExceeded, SearchError};
pub use frontier::{FifoFrontier, Frontier, MinCostFrontier};
pub use graph::{Found, GraphSearch, SearchLimits, SearchMode, SearchStats, bfs, dijkstra};
pub use memo::{HashMapBackend, MemoBackend, MemoStats, MemoTable, NoCacheBackend};
pub use pairing::{BitSet, DecisionSet, best_disjoint_pair};
pub use periodic::{DriftField, Heading};
pub use visited::{Discovery, StateId, VisitedRegistry};
