//! Shortest paths over implicit graphs.
//!
//! The graph is never materialized. A search is driven by three caller
//! supplied pieces:
//!
//! - the start state(s), all seeded at cost zero
//! - a goal predicate
//! - a neighbor function `state -> Result<impl IntoIterator<Item = (state, cost)>, E>`
//!
//! Two modes are available:
//!
//! - [`SearchMode::UnitCost`]: breadth-first with a FIFO frontier. Every
//!   transition must cost exactly one.
//! - [`SearchMode::Weighted`]: Dijkstra with a min-cost frontier. Transition
//!   costs must be non-negative; a negative cost is rejected with
//!   [`SearchError::NegativeCost`](crate::SearchError::NegativeCost).
//!
//! A state is finalized the first time it is popped from the frontier, so the
//! first goal popped carries the optimal cost. An unreachable goal yields
//! `Ok(None)`. Errors from the neighbor function surface unchanged as
//! [`SearchError::Caller`](crate::SearchError::Caller).
//!
//! # Example: grid with a wall
//!
//! ```rust
//! use aoc_search::bfs;
//!
//! // 3x3 grid, (1, 1) is a wall
//! fn open((r, c): (i32, i32)) -> bool {
//!     (0..3).contains(&r) && (0..3).contains(&c) && (r, c) != (1, 1)
//! }
//!
//! let distance = bfs(
//!     [(0, 0)],
//!     |&pos| pos == (2, 2),
//!     |&(r, c)| {
//!         [(r - 1, c), (r + 1, c), (r, c - 1), (r, c + 1)]
//!             .into_iter()
//!             .filter(|&pos| open(pos))
//!     },
//! )
//! .unwrap();
//! assert_eq!(distance, Some(4));
//! ```
//!
//! # Example: weighted search with path reconstruction
//!
//! ```rust
//! use aoc_search::GraphSearch;
//! use std::convert::Infallible;
//!
//! let edges = |node: &char| -> Result<Vec<(char, u32)>, Infallible> {
//!     Ok(match node {
//!         'a' => vec![('b', 1), ('c', 5)],
//!         'b' => vec![('c', 1)],
//!         _ => vec![],
//!     })
//! };
//!
//! let found = GraphSearch::weighted()
//!     .track_paths(true)
//!     .search(['a'], |n| *n == 'c', edges)
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(found.cost, 2);
//! assert_eq!(found.path, Some(vec!['a', 'b', 'c']));
//! ```

mod engine;

pub use engine::{Found, GraphSearch, SearchLimits, SearchMode, SearchStats, bfs, dijkstra};
