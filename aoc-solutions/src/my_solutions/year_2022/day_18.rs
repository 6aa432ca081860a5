//! Boiling Boulders
//!
//! Surface area of a droplet made of unit cubes, then only the part of it
//! that steam flowing around the outside can touch.

use std::collections::HashSet;
use std::convert::Infallible;

use anyhow::{Context, bail};
use aoc_search::GraphSearch;
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use tracing::debug;

use crate::my_solutions::parse_failure;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 18, tags = ["graph", "flood-fill"])]
pub struct Solver;

type Cube = [i32; 3];

const FACES: [Cube; 6] = [
    [1, 0, 0],
    [-1, 0, 0],
    [0, 1, 0],
    [0, -1, 0],
    [0, 0, 1],
    [0, 0, -1],
];

fn adjacent([x, y, z]: Cube) -> impl Iterator<Item = Cube> {
    FACES.into_iter().map(move |[dx, dy, dz]| [x + dx, y + dy, z + dz])
}

#[derive(Debug)]
pub struct Droplet {
    lava: HashSet<Cube>,
}

impl Droplet {
    fn surface_area(&self) -> usize {
        self.lava
            .iter()
            .flat_map(|&cube| adjacent(cube))
            .filter(|side| !self.lava.contains(side))
            .count()
    }

    /// Faces that touch air reachable from outside the bounding box.
    fn exterior_area(&self) -> Result<usize, SolveError> {
        let Some((lo, hi)) = self.bounds() else {
            return Ok(0);
        };
        let lava = &self.lava;
        let is_air = move |cube: &Cube| {
            (0..3).all(|axis| (lo[axis]..=hi[axis]).contains(&cube[axis])) && !lava.contains(cube)
        };

        let steam = GraphSearch::unit_cost()
            .reachable([lo], move |&cube: &Cube| {
                Ok::<_, Infallible>(
                    adjacent(cube)
                        .filter(move |next| is_air(next))
                        .map(|next| (next, 1u32)),
                )
            })
            .map_err(SolveError::failed)?;
        debug!(cubes = self.lava.len(), steam = steam.len(), "exterior flooded");

        Ok(self
            .lava
            .iter()
            .flat_map(|&cube| adjacent(cube))
            .filter(|side| steam.contains(side))
            .count())
    }

    /// Bounding box grown by one on every side, so steam can wrap around.
    fn bounds(&self) -> Option<(Cube, Cube)> {
        let mut cubes = self.lava.iter();
        let first = *cubes.next()?;
        let (lo, hi) = cubes.fold((first, first), |(mut lo, mut hi), cube| {
            for axis in 0..3 {
                lo[axis] = lo[axis].min(cube[axis]);
                hi[axis] = hi[axis].max(cube[axis]);
            }
            (lo, hi)
        });
        Some((lo.map(|v| v - 1), hi.map(|v| v + 1)))
    }
}

fn parse_droplet(input: &str) -> anyhow::Result<Droplet> {
    let lava: HashSet<Cube> = input
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| -> anyhow::Result<Cube> {
            let coords: Vec<i32> = line
                .trim()
                .split(',')
                .map(|v| v.parse::<i32>())
                .try_collect()
                .with_context(|| format!("line {}: bad coordinate", i + 1))?;
            match coords[..] {
                [x, y, z] => Ok([x, y, z]),
                _ => bail!("line {}: expected x,y,z", i + 1),
            }
        })
        .try_collect()?;
    Ok(Droplet { lava })
}

impl AocParser for Solver {
    type SharedData<'a> = Droplet;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_droplet(input).map_err(parse_failure)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        Ok(shared.surface_area().to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        shared.exterior_area().map(|area| area.to_string())
    }
}
