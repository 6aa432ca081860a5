use std::collections::HashMap;
use std::convert::Infallible;

use proptest::prelude::*;
use thiserror::Error;

use super::*;
use crate::error::SearchError;
use crate::memo::{MemoTable, NoCacheBackend};
use crate::pairing::BitSet;

// ============================================================================
// Toy valve network
// ============================================================================

/// Valves on a complete graph with explicit travel times. Valve 0 is the
/// start and has no flow.
#[derive(Debug, Clone)]
struct ValveToy {
    flow: Vec<u32>,
    dist: Vec<Vec<u32>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ValveState {
    at: usize,
    opened: BitSet,
}

impl ValveToy {
    /// AA(0) - BB(13) - CC(2) - DD(20) - AA, a four-valve ring.
    fn ring() -> Self {
        Self {
            flow: vec![0, 13, 2, 20],
            dist: vec![
                vec![0, 1, 2, 1],
                vec![1, 0, 1, 2],
                vec![2, 1, 0, 1],
                vec![1, 2, 1, 0],
            ],
        }
    }

    fn start() -> ValveState {
        ValveState {
            at: 0,
            opened: BitSet::EMPTY,
        }
    }
}

impl BranchProblem for ValveToy {
    type State = ValveState;
    type Key = ValveState;
    type Decision = usize;
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &ValveState) -> ValveState {
        state.clone()
    }

    fn baseline(&self, _state: &ValveState, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, state: &ValveState, _remaining: Budget) -> Result<Vec<usize>, Infallible> {
        Ok((1..self.flow.len())
            .filter(|&v| self.flow[v] > 0 && !state.opened.contains(v))
            .collect())
    }

    fn upper_bound(&self, state: &ValveState, remaining: Budget) -> Option<u32> {
        let closed: u32 = (1..self.flow.len())
            .filter(|&v| !state.opened.contains(v))
            .map(|v| self.flow[v])
            .sum();
        Some(closed * remaining.saturating_sub(1))
    }

    fn apply(&self, state: &ValveState, &target: &usize, remaining: Budget) -> Option<Step<ValveState, u32>> {
        let cost = self.dist[state.at][target] + 1;
        Some(Step {
            state: ValveState {
                at: target,
                opened: state.opened.with(target)?,
            },
            cost,
            gain: self.flow[target] * remaining.saturating_sub(cost),
        })
    }
}

impl DecisionSets for ValveToy {
    type Set = BitSet;

    fn decision_set(&self, state: &ValveState) -> BitSet {
        state.opened
    }
}

fn permutations(items: &[usize]) -> Vec<Vec<usize>> {
    if items.is_empty() {
        return vec![vec![]];
    }
    let mut out = Vec::new();
    for (i, &first) in items.iter().enumerate() {
        let mut rest = items.to_vec();
        rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, first);
            out.push(tail);
        }
    }
    out
}

/// Best single-agent value per exact opened set, by trying every order.
fn brute_force_per_set(toy: &ValveToy, budget: u32) -> HashMap<u64, u32> {
    let useful: Vec<usize> = (1..toy.flow.len()).filter(|&v| toy.flow[v] > 0).collect();
    let mut best = HashMap::new();
    for mask in 0u64..(1 << useful.len()) {
        let members: Vec<usize> = useful
            .iter()
            .enumerate()
            .filter(|(i, _)| mask & (1 << i) != 0)
            .map(|(_, &v)| v)
            .collect();
        for order in permutations(&members) {
            let (mut at, mut left, mut total) = (0, budget, 0);
            let mut feasible = true;
            for &v in &order {
                let cost = toy.dist[at][v] + 1;
                if cost > left {
                    feasible = false;
                    break;
                }
                left -= cost;
                total += toy.flow[v] * left;
                at = v;
            }
            if feasible {
                let bits = members.iter().fold(0u64, |acc, &v| acc | 1 << v);
                let entry = best.entry(bits).or_insert(0);
                *entry = (*entry).max(total);
            }
        }
    }
    best
}

fn brute_force_pair(toy: &ValveToy, budget: u32) -> u32 {
    let per_set = brute_force_per_set(toy, budget);
    let mut best = 0;
    for (&a, &va) in &per_set {
        for (&b, &vb) in &per_set {
            if a & b == 0 {
                best = best.max(va + vb);
            }
        }
    }
    best
}

fn brute_force_single(toy: &ValveToy, budget: u32) -> u32 {
    brute_force_per_set(toy, budget).into_values().max().unwrap_or(0)
}

#[test]
fn test_single_agent_matches_brute_force() {
    let toy = ValveToy::ring();
    for budget in 0..=12 {
        let outcome = BranchAndBound::new()
            .maximize(&toy, &ValveToy::start(), budget)
            .unwrap();
        assert_eq!(outcome.value, brute_force_single(&toy, budget), "budget {budget}");
    }
}

#[test]
fn test_two_agent_pairing_matches_brute_force() {
    let toy = ValveToy::ring();
    for budget in 0..=10 {
        let records = BranchAndBound::new()
            .record_decision_sets(&toy, &ValveToy::start(), budget)
            .unwrap();
        assert_eq!(
            records.best_pair().unwrap(),
            Some(brute_force_pair(&toy, budget)),
            "budget {budget}"
        );
    }
}

#[test]
fn test_recorded_sets_match_brute_force_per_set() {
    let toy = ValveToy::ring();
    let records = BranchAndBound::new()
        .record_decision_sets(&toy, &ValveToy::start(), 8)
        .unwrap();
    let recorded: HashMap<u64, u32> = records
        .best
        .iter()
        .map(|(set, &value)| (set.bits(), value))
        .collect();
    assert_eq!(recorded, brute_force_per_set(&toy, 8));
    assert!(records.best.contains_key(&BitSet::EMPTY));
}

#[test]
fn test_budget_too_small_keeps_baseline() {
    let toy = ValveToy::ring();
    let outcome = BranchAndBound::new()
        .maximize(&toy, &ValveToy::start(), 1)
        .unwrap();
    assert_eq!(outcome.value, 0);
    assert_eq!(outcome.stats.over_budget, 3);
}

// ============================================================================
// Memoization
// ============================================================================

#[test]
fn test_repeated_calls_are_idempotent() {
    let toy = ValveToy::ring();
    let driver = BranchAndBound::new();
    let first = driver.maximize(&toy, &ValveToy::start(), 10).unwrap();
    let second = driver.maximize(&toy, &ValveToy::start(), 10).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_shared_memo_answers_from_cache() {
    let toy = ValveToy::ring();
    let driver = BranchAndBound::new();
    let mut memo = driver.memo::<ValveToy>();

    let first = driver
        .maximize_with(&toy, &ValveToy::start(), 10, &mut memo)
        .unwrap();
    let second = driver
        .maximize_with(&toy, &ValveToy::start(), 10, &mut memo)
        .unwrap();

    assert_eq!(first.value, second.value);
    assert_eq!(second.stats.calls, 1);
    assert_eq!(second.stats.cache_hits, 1);
    assert!(!memo.is_empty());
}

#[test]
fn test_memo_never_changes_the_answer() {
    let toy = ValveToy::ring();
    let driver = BranchAndBound::builder().pruning(false).build();
    for budget in 0..=10 {
        let mut uncached: BnbMemo<ValveToy, NoCacheBackend> = MemoTable::with_backend(NoCacheBackend);
        let without = driver
            .maximize_with(&toy, &ValveToy::start(), budget, &mut uncached)
            .unwrap();
        let with = driver.maximize(&toy, &ValveToy::start(), budget).unwrap();
        assert_eq!(without.value, with.value);
        assert_eq!(without.stats.cache_hits, 0);
    }
}

#[test]
fn test_memo_capacity_is_reported() {
    let toy = ValveToy::ring();
    let result = BranchAndBound::builder()
        .max_entries(2)
        .build()
        .maximize(&toy, &ValveToy::start(), 10);
    match result {
        Err(SearchError::Capacity(err)) => assert_eq!(err.limit, 2),
        other => panic!("expected capacity error, got {other:?}"),
    }
}

/// Root picks a bonus for the rest of the run; the bonus pays out every turn.
#[derive(Debug)]
struct BonusPick {
    key_includes_bonus: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Bonus {
    root: bool,
    bonus: u32,
}

impl BranchProblem for BonusPick {
    type State = Bonus;
    type Key = (bool, Option<u32>);
    type Decision = u32;
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &Bonus) -> (bool, Option<u32>) {
        (state.root, self.key_includes_bonus.then_some(state.bonus))
    }

    fn baseline(&self, state: &Bonus, remaining: Budget) -> u32 {
        state.bonus * remaining
    }

    fn decisions(&self, state: &Bonus, _remaining: Budget) -> Result<Vec<u32>, Infallible> {
        Ok(if state.root { vec![0, 5] } else { vec![] })
    }

    fn apply(&self, _state: &Bonus, &bonus: &u32, _remaining: Budget) -> Option<Step<Bonus, u32>> {
        Some(Step {
            state: Bonus { root: false, bonus },
            cost: 1,
            gain: 0,
        })
    }
}

fn bonus_root() -> Bonus {
    Bonus {
        root: true,
        bonus: 0,
    }
}

#[test]
fn test_complete_key_finds_optimum() {
    let problem = BonusPick {
        key_includes_bonus: true,
    };
    let outcome = BranchAndBound::new().maximize(&problem, &bonus_root(), 2).unwrap();
    assert_eq!(outcome.value, 5);
}

#[test]
fn test_underspecified_key_returns_wrong_answer() {
    // Both children share the key (1, (false, None)); the zero-bonus child
    // is explored first and its value is reused for the five-bonus child.
    let problem = BonusPick {
        key_includes_bonus: false,
    };
    let outcome = BranchAndBound::new().maximize(&problem, &bonus_root(), 2).unwrap();
    assert_eq!(outcome.value, 0);
    assert_eq!(outcome.stats.cache_hits, 1);
}

#[test]
fn test_key_verification_rejects_collision() {
    let problem = BonusPick {
        key_includes_bonus: false,
    };
    let result = BranchAndBound::builder()
        .verify_keys(true)
        .build()
        .maximize(&problem, &bonus_root(), 2);
    match result {
        Err(SearchError::KeyCollision { first, second, .. }) => {
            assert!(first.contains("bonus: 0"));
            assert!(second.contains("bonus: 5"));
        }
        other => panic!("expected key collision, got {other:?}"),
    }
}

// ============================================================================
// Step invariants and caller errors
// ============================================================================

#[derive(Debug)]
struct Stall;

impl BranchProblem for Stall {
    type State = u8;
    type Key = u8;
    type Decision = ();
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &u8) -> u8 {
        *state
    }

    fn baseline(&self, _state: &u8, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, _state: &u8, _remaining: Budget) -> Result<Vec<()>, Infallible> {
        Ok(vec![()])
    }

    fn apply(&self, state: &u8, _: &(), _remaining: Budget) -> Option<Step<u8, u32>> {
        Some(Step {
            state: *state,
            cost: 0,
            gain: 1,
        })
    }
}

#[test]
fn test_zero_cost_step_is_rejected() {
    let result = BranchAndBound::new().maximize(&Stall, &0, 3);
    assert!(matches!(result, Err(SearchError::ZeroCostStep { .. })));
}

#[derive(Debug, Error, PartialEq)]
#[error("no recipe for {0}")]
struct MissingRecipe(u8);

#[derive(Debug)]
struct Broken;

impl BranchProblem for Broken {
    type State = u8;
    type Key = u8;
    type Decision = ();
    type Value = u32;
    type Error = MissingRecipe;

    fn key(&self, state: &u8) -> u8 {
        *state
    }

    fn baseline(&self, _state: &u8, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, state: &u8, _remaining: Budget) -> Result<Vec<()>, MissingRecipe> {
        Err(MissingRecipe(*state))
    }

    fn apply(&self, _state: &u8, _: &(), _remaining: Budget) -> Option<Step<u8, u32>> {
        None
    }
}

#[test]
fn test_caller_error_propagates_unchanged() {
    let result = BranchAndBound::new().maximize(&Broken, &7, 3);
    match result {
        Err(SearchError::Caller(err)) => assert_eq!(err, MissingRecipe(7)),
        other => panic!("expected caller error, got {other:?}"),
    }
}

// ============================================================================
// Resource accumulation with saturation pruning
// ============================================================================

/// Miners dig ore; ore buys miners or drills, and each drill yields one gem
/// per remaining turn.
#[derive(Debug, Clone)]
struct Mine {
    miner_price: u32,
    drill_price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MineState {
    miners: u32,
    ore: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Build {
    Miner,
    Drill,
}

impl Mine {
    fn max_use(&self) -> u32 {
        self.miner_price.max(self.drill_price)
    }
}

impl BranchProblem for Mine {
    type State = MineState;
    type Key = MineState;
    type Decision = Build;
    type Value = u32;
    type Error = Infallible;

    fn key(&self, state: &MineState) -> MineState {
        *state
    }

    fn baseline(&self, _state: &MineState, _remaining: Budget) -> u32 {
        0
    }

    fn decisions(&self, _state: &MineState, _remaining: Budget) -> Result<Vec<Build>, Infallible> {
        Ok(vec![Build::Drill, Build::Miner])
    }

    fn is_dominated(&self, state: &MineState, decision: &Build, remaining: Budget) -> bool {
        *decision == Build::Miner && is_saturated(state.miners, state.ore, remaining, self.max_use())
    }

    fn apply(&self, state: &MineState, decision: &Build, remaining: Budget) -> Option<Step<MineState, u32>> {
        let price = match decision {
            Build::Miner => self.miner_price,
            Build::Drill => self.drill_price,
        };
        let cost = turns_to_afford(price, state.ore, state.miners)? + 1;
        let left = remaining.saturating_sub(cost);
        let ore = (state.ore + state.miners * cost).checked_sub(price)?;
        let (miners, gain) = match decision {
            Build::Miner => (state.miners + 1, 0),
            Build::Drill => (state.miners, left),
        };
        Some(Step {
            state: MineState { miners, ore },
            cost,
            gain,
        })
    }
}

fn mine_start() -> MineState {
    MineState { miners: 1, ore: 0 }
}

#[test]
fn test_pruning_does_not_change_fixed_optima() {
    let cases = [(2, 3, 10), (4, 2, 12), (1, 1, 8), (3, 5, 14)];
    for (miner_price, drill_price, budget) in cases {
        let mine = Mine {
            miner_price,
            drill_price,
        };
        let pruned = BranchAndBound::new().maximize(&mine, &mine_start(), budget).unwrap();
        let full = BranchAndBound::builder()
            .pruning(false)
            .build()
            .maximize(&mine, &mine_start(), budget)
            .unwrap();
        assert_eq!(pruned.value, full.value, "prices {miner_price}/{drill_price}, budget {budget}");
        assert!(pruned.stats.calls <= full.stats.calls);
    }
}

#[test]
fn test_single_drill_purchase() {
    // One miner, drill costs 2: afford it after two turns, build on the third,
    // leaving two turns of output. A second drill (turn 5) would earn nothing.
    let mine = Mine {
        miner_price: 100,
        drill_price: 2,
    };
    let outcome = BranchAndBound::new().maximize(&mine, &mine_start(), 5).unwrap();
    assert_eq!(outcome.value, 2);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    /// Dominance and bound pruning only ever save work.
    #[test]
    fn prop_pruning_is_sound_for_mines(
        miner_price in 1u32..5,
        drill_price in 1u32..6,
        budget in 0u32..14,
    ) {
        let mine = Mine { miner_price, drill_price };
        let pruned = BranchAndBound::new().maximize(&mine, &mine_start(), budget).unwrap();
        let full = BranchAndBound::builder()
            .pruning(false)
            .build()
            .maximize(&mine, &mine_start(), budget)
            .unwrap();
        prop_assert_eq!(pruned.value, full.value);
    }

    /// Random valve networks: bound pruning is sound and pairing matches
    /// exhaustive enumeration.
    #[test]
    fn prop_valves_match_brute_force(
        flow in prop::collection::vec(0u32..25, 3),
        dist in prop::collection::vec(1u32..4, 6),
        budget in 0u32..11,
    ) {
        let mut matrix = vec![vec![0; 4]; 4];
        let mut edges = dist.into_iter();
        for a in 0..4 {
            for b in a + 1..4 {
                let d = edges.next().unwrap();
                matrix[a][b] = d;
                matrix[b][a] = d;
            }
        }
        let toy = ValveToy {
            flow: std::iter::once(0).chain(flow).collect(),
            dist: matrix,
        };

        let pruned = BranchAndBound::new().maximize(&toy, &ValveToy::start(), budget).unwrap();
        let full = BranchAndBound::builder()
            .pruning(false)
            .build()
            .maximize(&toy, &ValveToy::start(), budget)
            .unwrap();
        prop_assert_eq!(pruned.value, full.value);
        prop_assert_eq!(pruned.value, brute_force_single(&toy, budget));

        let records = BranchAndBound::new()
            .record_decision_sets(&toy, &ValveToy::start(), budget)
            .unwrap();
        prop_assert_eq!(records.best_pair().unwrap(), Some(brute_force_pair(&toy, budget)));
    }
}
