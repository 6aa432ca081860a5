//! Hill Climbing Algorithm
//!
//! Fewest steps up a heightmap where each step may climb at most one level.

use anyhow::{Context, anyhow, bail};
use aoc_search::bfs;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};

use crate::my_solutions::parse_failure;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 12, tags = ["graph", "bfs"])]
pub struct Solver;

type Pos = (usize, usize);

#[derive(Debug)]
pub struct Heightmap {
    rows: usize,
    cols: usize,
    // Elevation 0..=25, row-major
    elevation: Vec<u8>,
    start: Pos,
    end: Pos,
}

impl Heightmap {
    fn elevation(&self, (row, col): Pos) -> u8 {
        self.elevation[row * self.cols + col]
    }

    fn climbable_from(&self, pos: Pos) -> impl Iterator<Item = Pos> + '_ {
        let (row, col) = pos;
        let limit = self.elevation(pos) + 1;
        [
            row.checked_sub(1).map(|r| (r, col)),
            (row + 1 < self.rows).then_some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            (col + 1 < self.cols).then_some((row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |&next| self.elevation(next) <= limit)
    }

    fn lowest_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.elevation
            .iter()
            .enumerate()
            .filter(|&(_, &h)| h == 0)
            .map(|(i, _)| (i / self.cols, i % self.cols))
    }

    fn steps_to_end(&self, starts: impl IntoIterator<Item = Pos>) -> Result<String, SolveError> {
        bfs(starts, |&pos| pos == self.end, |&pos| self.climbable_from(pos))
            .map_err(SolveError::failed)?
            .map(|steps| steps.to_string())
            .ok_or_else(|| SolveError::Unsolvable("the summit cannot be reached".into()))
    }
}

fn parse_heightmap(input: &str) -> anyhow::Result<Heightmap> {
    let lines: Vec<&[u8]> = input
        .lines()
        .map(str::as_bytes)
        .filter(|l| !l.is_empty())
        .collect();
    let cols = lines.first().map(|l| l.len()).context("empty heightmap")?;

    let mut start = None;
    let mut end = None;
    let mut elevation = Vec::with_capacity(lines.len() * cols);
    for (row, line) in lines.iter().enumerate() {
        if line.len() != cols {
            bail!("line {}: expected {cols} cells, found {}", row + 1, line.len());
        }
        for (col, &cell) in line.iter().enumerate() {
            let level = match cell {
                b'S' => {
                    start = Some((row, col));
                    b'a'
                }
                b'E' => {
                    end = Some((row, col));
                    b'z'
                }
                b'a'..=b'z' => cell,
                other => {
                    return Err(anyhow!(
                        "line {}: unexpected cell {:?}",
                        row + 1,
                        other as char
                    ));
                }
            };
            elevation.push(level - b'a');
        }
    }

    Ok(Heightmap {
        rows: lines.len(),
        cols,
        elevation,
        start: start.context("no start marker 'S'")?,
        end: end.context("no end marker 'E'")?,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Heightmap;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_heightmap(input).map_err(parse_failure)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared.steps_to_end([shared.start])
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared.steps_to_end(shared.lowest_cells())
    }
}
