//! Not Enough Minerals
//!
//! Robot factories: pick which robot to build next, waiting for the
//! materials as needed, to crack as many geodes as possible.
//!
//! Decisions are "the next robot built" rather than "what to do this minute",
//! so every step skips straight to the minute that robot is finished. Three
//! cuts keep the tree small:
//!
//! - no more producers of a material than any robot can spend per minute
//! - no more producers once stock plus production covers every remaining spend
//! - stock above what could ever be spent is clipped, so more states share a key

use std::convert::Infallible;

use anyhow::{Context, bail};
use aoc_search::{BranchAndBound, BranchProblem, Budget, Step, is_saturated, turns_to_afford};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use regex::Regex;
use tracing::debug;

use crate::my_solutions::parse_failure;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 19, tags = ["bnb", "pruning"])]
pub struct Solver;

const ORE: usize = 0;
const CLAY: usize = 1;
const OBSIDIAN: usize = 2;
const GEODE: usize = 3;

const QUALITY_MINUTES: Budget = 24;
const LONG_MINUTES: Budget = 32;
const LONG_BLUEPRINTS: usize = 3;

/// Costs in ore, clay, obsidian for each of the four robots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blueprint {
    id: u32,
    costs: [[u32; 3]; 4],
    // Most of each material any single robot needs
    max_spend: [u32; 3],
}

impl Blueprint {
    fn new(id: u32, costs: [[u32; 3]; 4]) -> Self {
        let max_spend = [
            costs.iter().map(|c| c[ORE]).max().unwrap_or(0),
            costs[OBSIDIAN][CLAY],
            costs[GEODE][OBSIDIAN],
        ];
        Self {
            id,
            costs,
            max_spend,
        }
    }

    fn most_geodes(&self, minutes: Budget) -> Result<u32, SolveError> {
        let outcome = BranchAndBound::new()
            .maximize(self, &Factory::START, minutes)
            .map_err(SolveError::failed)?;
        debug!(
            blueprint = self.id,
            minutes,
            geodes = outcome.value,
            calls = outcome.stats.calls,
            pruned = outcome.stats.pruned,
            bounded = outcome.stats.bounded,
            "blueprint evaluated"
        );
        Ok(outcome.value)
    }
}

/// Robots and stock of ore, clay and obsidian. Geode robots are not tracked:
/// a geode robot's whole output is credited the moment it is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Factory {
    robots: [u32; 3],
    stock: [u32; 3],
}

impl Factory {
    const START: Factory = Factory {
        robots: [1, 0, 0],
        stock: [0, 0, 0],
    };
}

impl BranchProblem for Blueprint {
    type State = Factory;
    type Key = Factory;
    type Decision = usize;
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &Factory) -> Factory {
        state.clone()
    }

    fn baseline(&self, _state: &Factory, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, _state: &Factory, _remaining: Budget) -> Result<Vec<usize>, Infallible> {
        Ok(vec![GEODE, OBSIDIAN, CLAY, ORE])
    }

    fn is_dominated(&self, state: &Factory, &robot: &usize, remaining: Budget) -> bool {
        robot != GEODE
            && is_saturated(
                state.robots[robot],
                state.stock[robot],
                remaining,
                self.max_spend[robot],
            )
    }

    // A geode robot finished every remaining minute
    fn upper_bound(&self, _state: &Factory, remaining: Budget) -> Option<u32> {
        Some(remaining * remaining.saturating_sub(1) / 2)
    }

    fn apply(&self, state: &Factory, &robot: &usize, remaining: Budget) -> Option<Step<Factory, u32>> {
        let cost = &self.costs[robot];
        let mut wait = 0;
        for material in [ORE, CLAY, OBSIDIAN] {
            let turns = turns_to_afford(cost[material], state.stock[material], state.robots[material])?;
            wait = wait.max(turns);
        }
        let minutes = wait + 1;
        let left = remaining.checked_sub(minutes).filter(|&left| left > 0)?;

        let mut next = state.clone();
        for material in [ORE, CLAY, OBSIDIAN] {
            let produced = next.stock[material] + next.robots[material] * minutes;
            next.stock[material] = (produced - cost[material]).min(self.max_spend[material] * left);
        }
        let gain = if robot == GEODE {
            left
        } else {
            next.robots[robot] += 1;
            0
        };

        Some(Step {
            state: next,
            cost: minutes,
            gain,
        })
    }
}

fn parse_blueprints(input: &str) -> anyhow::Result<Vec<Blueprint>> {
    let number = Regex::new(r"\d+")?;
    let blueprints = input
        .split("Blueprint")
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .enumerate()
        .map(|(i, chunk)| -> anyhow::Result<Blueprint> {
            let numbers: Vec<u32> = number
                .find_iter(chunk)
                .map(|m| m.as_str().parse::<u32>())
                .collect::<Result<_, _>>()
                .with_context(|| format!("blueprint {}: number out of range", i + 1))?;
            let &[id, ore, clay, obsidian_ore, obsidian_clay, geode_ore, geode_obsidian] =
                numbers.as_slice()
            else {
                bail!(
                    "blueprint {}: expected 7 numbers, found {}",
                    i + 1,
                    numbers.len()
                );
            };
            Ok(Blueprint::new(
                id,
                [
                    [ore, 0, 0],
                    [clay, 0, 0],
                    [obsidian_ore, obsidian_clay, 0],
                    [geode_ore, 0, geode_obsidian],
                ],
            ))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;
    if blueprints.is_empty() {
        bail!("no blueprints");
    }
    Ok(blueprints)
}

impl AocParser for Solver {
    type SharedData<'a> = Vec<Blueprint>;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_blueprints(input).map_err(parse_failure)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut quality = 0;
        for blueprint in shared.iter() {
            quality += blueprint.id * blueprint.most_geodes(QUALITY_MINUTES)?;
        }
        Ok(quality.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let mut product = 1u64;
        for blueprint in shared.iter().take(LONG_BLUEPRINTS) {
            product *= u64::from(blueprint.most_geodes(LONG_MINUTES)?);
        }
        Ok(product.to_string())
    }
}
