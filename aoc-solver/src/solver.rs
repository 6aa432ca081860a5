//! Parser and part-solver traits

use crate::error::{ParseError, SolveError};

/// Turns raw puzzle input into the data shared by every part.
///
/// `SharedData` is generic over the input lifetime so a solver can keep
/// borrowing from the input (`&'a str` valve names, for instance) instead of
/// copying it.
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError};
///
/// struct Cubes;
///
/// impl AocParser for Cubes {
///     type SharedData<'a> = Vec<[i32; 3]>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         input
///             .lines()
///             .enumerate()
///             .map(|(i, line)| {
///                 let mut axes = line.split(',').map(str::parse::<i32>);
///                 match (axes.next(), axes.next(), axes.next()) {
///                     (Some(Ok(x)), Some(Ok(y)), Some(Ok(z))) => Ok([x, y, z]),
///                     _ => Err(ParseError::at_line(i + 1, "expected x,y,z")),
///                 }
///             })
///             .collect()
///     }
/// }
///
/// assert_eq!(Cubes::parse("1,2,3\n2,2,3").unwrap().len(), 2);
/// ```
pub trait AocParser {
    type SharedData<'a>;

    fn parse<'a>(input: &'a str) -> Result<Self::SharedData<'a>, ParseError>;
}

/// Solves part `N` of a puzzle.
///
/// Parts receive the shared data mutably, so an expensive precomputation
/// done by part 1 (a distance table, say) can be stored for part 2.
pub trait PartSolver<const N: u8>: AocParser {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError>;
}

/// Runtime dispatch from a part number to the matching [`PartSolver`].
///
/// Usually derived with `#[derive(AocSolver)]` and
/// `#[aoc_solver(max_parts = N)]`, which forwards part `n` to
/// `<Self as PartSolver<n>>::solve` and answers every other number with
/// [`SolveError::PartNotImplemented`].
///
/// # Example
///
/// ```
/// use aoc_solver::{AocParser, ParseError, SolveError, Solver};
///
/// struct Elevation;
///
/// impl AocParser for Elevation {
///     type SharedData<'a> = Vec<u8>;
///
///     fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
///         Ok(input.trim().bytes().collect())
///     }
/// }
///
/// impl Solver for Elevation {
///     const PARTS: u8 = 2;
///
///     fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError> {
///         match part {
///             1 => Ok(shared.iter().max().map(|&b| b as char).unwrap_or(' ').to_string()),
///             2 => Ok(shared.iter().filter(|&&b| b == b'a').count().to_string()),
///             _ => Err(SolveError::PartNotImplemented(part)),
///         }
///     }
/// }
///
/// let mut shared = Elevation::parse("abca").unwrap();
/// assert_eq!(Elevation::solve_part(&mut shared, 1).unwrap(), "c");
/// assert_eq!(Elevation::solve_part(&mut shared, 2).unwrap(), "2");
/// ```
pub trait Solver: AocParser {
    /// Number of parts this solver answers
    const PARTS: u8;

    fn solve_part(shared: &mut Self::SharedData<'_>, part: u8) -> Result<String, SolveError>;
}

/// Range-checked dispatch used by solver instances.
pub trait SolverExt: Solver {
    /// Like [`Solver::solve_part`] but rejects part numbers outside
    /// `1..=PARTS` with [`SolveError::PartOutOfRange`] before dispatching.
    fn solve_part_checked_range(
        shared: &mut Self::SharedData<'_>,
        part: u8,
    ) -> Result<String, SolveError> {
        if (1..=Self::PARTS).contains(&part) {
            Self::solve_part(shared, part)
        } else {
            Err(SolveError::PartOutOfRange(part))
        }
    }
}

impl<T: Solver + ?Sized> SolverExt for T {}
