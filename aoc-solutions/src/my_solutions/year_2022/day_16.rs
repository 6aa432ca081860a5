//! Proboscidea Volcanium
//!
//! Open pressure valves within a time limit, alone and then together with an
//! elephant. Tunnels are compressed to shortest distances between the valves
//! worth opening, then the schedule is a branch-and-bound over
//! `(position, opened set)`.

use std::collections::HashMap;
use std::convert::Infallible;

use anyhow::{Context, anyhow, bail};
use aoc_search::{BitSet, BranchAndBound, BranchProblem, Budget, DecisionSets, GraphSearch, Step};
use aoc_solver::{AocParser, ParseError, PartSolver, SolveError};
use aoc_solver_macros::{AocSolver, AutoRegisterSolver};
use itertools::Itertools;
use regex::Regex;
use tracing::debug;

use crate::my_solutions::parse_failure;

#[derive(AocSolver, AutoRegisterSolver)]
#[aoc_solver(max_parts = 2)]
#[aoc(year = 2022, day = 16, tags = ["bnb", "pairing"])]
pub struct Solver;

const START_VALVE: &str = "AA";
const SOLO_MINUTES: Budget = 30;
const PAIRED_MINUTES: Budget = 26;

const VALVE_LINE: &str = r"^Valve (\w+) has flow rate=(\d+); tunnels? leads? to valves? (.+)$";

/// Valves worth opening plus the start, with pairwise travel times.
#[derive(Debug)]
pub struct ValveTour {
    names: Vec<String>,
    flows: Vec<u32>,
    // minutes[from][to]; the start valve is the last row
    minutes: Vec<Vec<Option<u32>>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    at: usize,
    opened: BitSet,
}

impl ValveTour {
    fn start_index(&self) -> usize {
        self.flows.len()
    }

    fn start(&self) -> Position {
        Position {
            at: self.start_index(),
            opened: BitSet::EMPTY,
        }
    }

    /// Minutes to walk to `valve` and open it.
    fn open_cost(&self, from: usize, valve: usize) -> Option<u32> {
        self.minutes[from][valve].map(|walk| walk + 1)
    }
}

impl BranchProblem for ValveTour {
    type State = Position;
    type Key = Position;
    type Decision = usize;
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &Position) -> Position {
        *state
    }

    fn baseline(&self, _state: &Position, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, state: &Position, _remaining: Budget) -> Result<Vec<usize>, Infallible> {
        Ok((0..self.flows.len())
            .filter(|&valve| !state.opened.contains(valve))
            .collect())
    }

    // Every closed valve opened as soon as it can be reached from here
    fn upper_bound(&self, state: &Position, remaining: Budget) -> Option<u32> {
        (0..self.flows.len())
            .filter(|&valve| !state.opened.contains(valve))
            .filter_map(|valve| {
                let cost = self.open_cost(state.at, valve)?;
                Some(self.flows[valve] * remaining.saturating_sub(cost))
            })
            .try_fold(0u32, u32::checked_add)
    }

    fn apply(&self, state: &Position, &valve: &usize, remaining: Budget) -> Option<Step<Position, u32>> {
        let cost = self.open_cost(state.at, valve)?;
        Some(Step {
            state: Position {
                at: valve,
                opened: state.opened.with(valve)?,
            },
            cost,
            gain: self.flows[valve] * remaining.saturating_sub(cost),
        })
    }
}

impl DecisionSets for ValveTour {
    type Set = BitSet;

    fn decision_set(&self, state: &Position) -> BitSet {
        state.opened
    }
}

struct ValveLine<'a> {
    name: &'a str,
    flow: u32,
    tunnels: Vec<&'a str>,
}

fn parse_line<'a>(pattern: &Regex, line: &'a str) -> anyhow::Result<ValveLine<'a>> {
    let caps = pattern
        .captures(line)
        .ok_or_else(|| anyhow!("unrecognized valve description"))?;
    let (Some(name), Some(flow), Some(tunnels)) = (caps.get(1), caps.get(2), caps.get(3)) else {
        bail!("unrecognized valve description");
    };
    Ok(ValveLine {
        name: name.as_str(),
        flow: flow.as_str().parse().context("flow rate")?,
        tunnels: tunnels.as_str().split(", ").collect(),
    })
}

fn parse_tour(input: &str) -> anyhow::Result<ValveTour> {
    let pattern = Regex::new(VALVE_LINE)?;
    let valves: Vec<ValveLine> = input
        .lines()
        .filter(|l| !l.trim().is_empty())
        .enumerate()
        .map(|(i, line)| parse_line(&pattern, line.trim()).with_context(|| format!("line {}", i + 1)))
        .try_collect()?;

    let index: HashMap<&str, usize> = valves.iter().enumerate().map(|(i, v)| (v.name, i)).collect();
    let tunnels: Vec<Vec<usize>> = valves
        .iter()
        .map(|v| {
            v.tunnels
                .iter()
                .map(|t| index.get(t).copied().with_context(|| format!("unknown valve {t}")))
                .collect::<anyhow::Result<Vec<usize>>>()
        })
        .try_collect()?;
    let start = *index
        .get(START_VALVE)
        .with_context(|| format!("no valve named {START_VALVE}"))?;

    // Useful valves first, the start last
    let sources: Vec<usize> = valves
        .iter()
        .positions(|v| v.flow > 0)
        .chain(std::iter::once(start))
        .collect();
    if sources.len() - 1 > BitSet::CAPACITY {
        bail!("{} valves with flow, at most {} supported", sources.len() - 1, BitSet::CAPACITY);
    }

    let walker = GraphSearch::unit_cost();
    let minutes = sources
        .iter()
        .map(|&from| {
            let reached = walker.distances_from([from], |&valve: &usize| {
                Ok::<_, Infallible>(tunnels[valve].iter().map(|&next| (next, 1u32)))
            })?;
            Ok(sources[..sources.len() - 1]
                .iter()
                .map(|to| reached.get(to).copied())
                .collect())
        })
        .collect::<Result<Vec<Vec<Option<u32>>>, aoc_search::SearchError>>()?;

    let useful = &sources[..sources.len() - 1];
    debug!(valves = valves.len(), useful = useful.len(), "tunnel network compressed");
    Ok(ValveTour {
        names: useful.iter().map(|&i| valves[i].name.to_string()).collect(),
        flows: useful.iter().map(|&i| valves[i].flow).collect(),
        minutes,
    })
}

impl AocParser for Solver {
    type SharedData<'a> = ValveTour;

    fn parse(input: &str) -> Result<Self::SharedData<'_>, ParseError> {
        parse_tour(input).map_err(parse_failure)
    }
}

impl PartSolver<1> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let tour: &ValveTour = shared;
        let outcome = BranchAndBound::new()
            .maximize(tour, &tour.start(), SOLO_MINUTES)
            .map_err(SolveError::failed)?;
        debug!(calls = outcome.stats.calls, bounded = outcome.stats.bounded, "solo tour planned");
        Ok(outcome.value.to_string())
    }
}

impl PartSolver<2> for Solver {
    fn solve(shared: &mut Self::SharedData<'_>) -> Result<String, SolveError> {
        let tour: &ValveTour = shared;
        let records = BranchAndBound::new()
            .record_decision_sets(tour, &tour.start(), PAIRED_MINUTES)
            .map_err(SolveError::failed)?;
        if let Some((set, value)) = records.best.iter().max_by_key(|&(_, v)| *v) {
            let opened = set.iter().map(|i| tour.names[i].as_str()).join(",");
            debug!(sets = records.best.len(), %opened, value, "best single-agent set");
        }
        records
            .best_pair()
            .map_err(SolveError::failed)?
            .map(|value| value.to_string())
            .ok_or_else(|| SolveError::Unsolvable("no valve schedule recorded".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aoc_solver::Solver as _;

    const SAMPLE: &str = "\
Valve AA has flow rate=0; tunnels lead to valves DD, II, BB
Valve BB has flow rate=13; tunnels lead to valves CC, AA
Valve CC has flow rate=2; tunnels lead to valves DD, BB
Valve DD has flow rate=20; tunnels lead to valves CC, AA, EE
Valve EE has flow rate=3; tunnels lead to valves FF, DD
Valve FF has flow rate=0; tunnels lead to valves EE, GG
Valve GG has flow rate=0; tunnels lead to valves FF, HH
Valve HH has flow rate=22; tunnel leads to valve GG
Valve II has flow rate=0; tunnels lead to valves AA, JJ
Valve JJ has flow rate=21; tunnel leads to valve II
";

    #[test]
    fn test_sample() {
        let mut tour = Solver::parse(SAMPLE).unwrap();
        assert_eq!(Solver::solve_part(&mut tour, 1).unwrap(), "1651");
        assert_eq!(Solver::solve_part(&mut tour, 2).unwrap(), "1707");
    }

    #[test]
    fn test_compression_keeps_useful_valves() {
        let tour = Solver::parse(SAMPLE).unwrap();
        assert_eq!(tour.names, ["BB", "CC", "DD", "EE", "HH", "JJ"]);
        let start = tour.start_index();
        // AA -> DD is one tunnel, AA -> HH is five
        assert_eq!(tour.minutes[start][2], Some(1));
        assert_eq!(tour.minutes[start][4], Some(5));
        assert_eq!(tour.minutes[4][5], Some(7));
    }

    #[test]
    fn test_pruning_does_not_change_the_answer() {
        let tour = Solver::parse(SAMPLE).unwrap();
        let unpruned = BranchAndBound::builder()
            .pruning(false)
            .verify_keys(true)
            .build()
            .maximize(&tour, &tour.start(), SOLO_MINUTES)
            .unwrap();
        let pruned = BranchAndBound::new()
            .maximize(&tour, &tour.start(), SOLO_MINUTES)
            .unwrap();
        assert_eq!(pruned.value, unpruned.value);
        assert!(pruned.stats.calls <= unpruned.stats.calls);
    }

    #[test]
    fn test_unreachable_valve_is_skipped() {
        let input = "\
Valve AA has flow rate=0; tunnel leads to valve BB
Valve BB has flow rate=5; tunnel leads to valve AA
Valve CC has flow rate=50; tunnel leads to valve DD
Valve DD has flow rate=0; tunnel leads to valve CC
";
        let mut tour = Solver::parse(input).unwrap();
        // Open BB at minute 2, 28 minutes of flow
        assert_eq!(Solver::solve_part(&mut tour, 1).unwrap(), "140");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Solver::parse("Valve AA has flow rate=x; tunnel leads to valve AA").is_err());
        assert!(Solver::parse("Valve BB has flow rate=1; tunnel leads to valve BB").is_err());
        let err = Solver::parse("Valve AA has flow rate=0; tunnel leads to valve ZZ").unwrap_err();
        assert!(err.to_string().contains("ZZ"), "{err}");
    }
}
