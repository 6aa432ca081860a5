//! Error types for the solver framework

use thiserror::Error;

/// Puzzle input could not be turned into shared data
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Input does not match the expected layout
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Something the puzzle needs is absent (start marker, blueprint, ...)
    #[error("Missing data: {0}")]
    MissingData(String),
    #[error("Parse error: {0}")]
    Other(String),
}

impl ParseError {
    /// `InvalidFormat` tagged with a 1-based line number
    pub fn at_line(line: usize, message: impl std::fmt::Display) -> Self {
        ParseError::InvalidFormat(format!("line {line}: {message}"))
    }
}

/// Solving a single part failed
#[derive(Debug, Error)]
pub enum SolveError {
    /// The solver has no implementation for this part
    #[error("Part {0} is not implemented")]
    PartNotImplemented(u8),
    /// Part number is 0 or larger than the solver's part count
    #[error("Part {0} is out of range")]
    PartOutOfRange(u8),
    /// The puzzle has no answer for this input, e.g. the goal is unreachable
    #[error("No solution: {0}")]
    Unsolvable(String),
    /// Any other failure while solving, typically a search error
    #[error("Solve failed: {0}")]
    SolveFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl SolveError {
    pub fn failed(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        SolveError::SolveFailed(err.into())
    }
}

/// Error returned by the registry and solver instances
#[derive(Debug, Error)]
pub enum SolverError {
    #[error("Solver not found for year {0} day {1}")]
    NotFound(u16, u8),
    /// Year or day outside the range the registry can index
    #[error("Invalid year/day: {0}/{1}")]
    InvalidYearDay(u16, u8),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
    #[error("Solve error: {0}")]
    SolveError(#[from] SolveError),
}

/// Registering a solver factory failed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// A solver for this year and day is already registered
    #[error("Duplicate solver registration for year {0} day {1}")]
    DuplicateSolver(u16, u8),
    #[error("Invalid year/day: {0}/{1}")]
    InvalidYearDay(u16, u8),
}
