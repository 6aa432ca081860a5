//! Blizzard Basin
//!
//! Cross a valley full of wrapping blizzards. Blizzard positions repeat every
//! `lcm(rows, cols)` minutes, so the search state is the expedition's cell
//! plus the minute modulo that cycle.

use std::convert::Infallible;

use anyhow::{Context, bail};
use aoc_search::{DriftField, Found, GraphSearch, Heading};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use tracing::debug;

use crate::my_solutions::parse_failure;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 24, tags = ["graph", "bfs", "periodic"])]
pub struct Solver;

type Cell = (usize, usize);

/// `(cell, minute % cycle)`
type Moment = (Cell, usize);

#[derive(Debug)]
pub struct Valley {
    // Full map size, walls included
    rows: usize,
    cols: usize,
    blizzards: DriftField,
    entrance: Cell,
    exit: Cell,
}

impl Valley {
    fn is_open(&self, (row, col): Cell, minute: usize) -> bool {
        if (row, col) == self.entrance || (row, col) == self.exit {
            return true;
        }
        let interior = (1..self.rows - 1).contains(&row) && (1..self.cols - 1).contains(&col);
        interior && !self.blizzards.is_occupied(row - 1, col - 1, minute)
    }

    fn moves(&self, (cell, phase): Moment) -> impl Iterator<Item = (Moment, usize)> + '_ {
        let (row, col) = cell;
        let next = (phase + 1) % self.blizzards.cycle_length();
        [
            Some(cell),
            row.checked_sub(1).map(|r| (r, col)),
            Some((row + 1, col)),
            col.checked_sub(1).map(|c| (row, c)),
            Some((row, col + 1)),
        ]
        .into_iter()
        .flatten()
        .filter(move |&to| self.is_open(to, next))
        .map(move |to| ((to, next), 1))
    }

    /// Minutes to walk from `from` to `to`, setting off at minute `depart`.
    fn crossing(&self, from: Cell, to: Cell, depart: usize) -> Result<usize, SolveError> {
        let cycle = self.blizzards.cycle_length();
        let found: Found<Moment, usize> = GraphSearch::unit_cost()
            .search(
                [(from, depart % cycle)],
                |&(cell, _)| cell == to,
                |&moment: &Moment| Ok::<_, Infallible>(self.moves(moment)),
            )
            .map_err(SolveError::failed)?
            .ok_or_else(|| SolveError::Unsolvable(format!("no way from {from:?} to {to:?}")))?;
        debug!(
            ?from,
            ?to,
            depart,
            minutes = found.cost,
            expanded = found.stats.expanded,
            "valley crossed"
        );
        Ok(found.cost)
    }
}

fn parse_valley(input: &str) -> anyhow::Result<Valley> {
    let lines: Vec<&[u8]> = input
        .lines()
        .map(|l| l.trim().as_bytes())
        .filter(|l| !l.is_empty())
        .collect();
    let rows = lines.len();
    let cols = lines.first().map_or(0, |l| l.len());
    if rows < 3 || cols < 3 {
        bail!("valley must be at least 3x3, found {rows}x{cols}");
    }

    let mut blizzards = DriftField::new(rows - 2, cols - 2).context("empty valley interior")?;
    for (row, line) in lines.iter().enumerate() {
        if line.len() != cols {
            bail!("line {}: expected {cols} cells, found {}", row + 1, line.len());
        }
        for (col, &cell) in line.iter().enumerate() {
            if let Some(heading) = Heading::from_glyph(cell) {
                if !blizzards.place(row.wrapping_sub(1), col.wrapping_sub(1), heading) {
                    bail!("line {}: blizzard inside a wall", row + 1);
                }
            } else if !matches!(cell, b'#' | b'.') {
                bail!("line {}: unexpected cell {:?}", row + 1, cell as char);
            }
        }
    }

    let entrance = (0, 1);
    let exit = (rows - 1, cols - 2);
    if lines[0][1] != b'.' || lines[rows - 1][cols - 2] != b'.' {
        bail!("entrance or exit is blocked");
    }
    Ok(Valley {
        rows,
        cols,
        blizzards,
        entrance,
        exit,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = Valley;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_valley(input).map_err(parse_failure)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared
            .crossing(shared.entrance, shared.exit, 0)
            .map(|minutes| minutes.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let legs = [
            (shared.entrance, shared.exit),
            (shared.exit, shared.entrance),
            (shared.entrance, shared.exit),
        ];
        let mut minute = 0;
        for (from, to) in legs {
            minute += shared.crossing(from, to, minute)?;
        }
        Ok(minute.to_string())
    }
}
