//! Framework for Advent of Code solvers
//!
//! A solver parses its input once into shared data, then answers each part
//! from that data. Solvers register themselves in a global plugin list so a
//! runner can discover every linked solver and select them by year, day or
//! tag.
//!
//! # Pieces
//!
//! - [`AocParser`]: input to `SharedData<'a>`, which may borrow from the input
//! - [`PartSolver<N>`]: the answer to part `N`
//! - [`Solver`]: runtime dispatch from a part number to a `PartSolver`,
//!   normally generated by `#[derive(AocSolver)]`
//! - [`SolverInstance`] / [`DynSolver`]: parsed input plus parse and solve
//!   timings behind an object-safe interface
//! - [`SolverRegistryBuilder`] / [`SolverRegistry`]: a flat year/day table of
//!   factories, filled by hand or from [`SolverPlugin`]s
//!
//! # Example
//!
//! ```
//! use aoc_solver::{AocParser, AocSolver, ParseError, PartSolver, SolveError, SolverRegistryBuilder};
//!
//! #[derive(AocSolver)]
//! #[aoc_solver(max_parts = 2)]
//! struct Exposed;
//!
//! impl AocParser for Exposed {
//!     type SharedData<'a> = Vec<i32>;
//!
//!     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
//!         input
//!             .split_whitespace()
//!             .map(|n| n.parse().map_err(|_| ParseError::InvalidFormat(n.to_string())))
//!             .collect()
//!     }
//! }
//!
//! impl PartSolver<1> for Exposed {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         Ok(shared.iter().sum::<i32>().to_string())
//!     }
//! }
//!
//! impl PartSolver<2> for Exposed {
//!     fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
//!         shared
//!             .iter()
//!             .max()
//!             .map(i32::to_string)
//!             .ok_or_else(|| SolveError::Unsolvable("no numbers".into()))
//!     }
//! }
//!
//! let registry = SolverRegistryBuilder::new()
//!     .register::<Exposed>(2022, 18)
//!     .unwrap()
//!     .build();
//! let mut solver = registry.create_solver(2022, 18, "3 9 4").unwrap();
//! assert_eq!(solver.solve(1).unwrap().answer, "16");
//! assert_eq!(solver.solve(2).unwrap().answer, "9");
//! ```

mod error;
mod instance;
mod registry;
mod solver;

pub use error::{ParseError, RegistrationError, SolveError, SolverError};
pub use instance::{DynSolver, SolveResult, SolverInstance};
pub use registry::{
    BASE_YEAR, DAYS_PER_YEAR, FactoryInfo, MAX_YEARS, RegisterableSolver, SolverFactory,
    SolverFactoryStorage, SolverPlugin, SolverRegistry, SolverRegistryBuilder,
};
pub use solver::{AocParser, PartSolver, Solver, SolverExt};

// Used by the derive macros
pub use inventory;

pub use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
