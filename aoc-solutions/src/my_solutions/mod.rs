pub mod year_2022;

use aoc_solver::ParseError;

/// Parse failures carry their full context chain into the framework error.
pub(crate) fn parse_failure(err: anyhow::Error) -> ParseError {
    ParseError::InvalidFormat(format!("{err:#}"))
}
