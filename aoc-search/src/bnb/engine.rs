//! Depth-first branch-and-bound with exact memoization.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use tracing::{debug, trace};

use crate::cost::Cost;
use crate::error::SearchError;
use crate::memo::{HashMapBackend, MemoBackend, MemoEntry, MemoTable};
use crate::pairing::{DecisionSet, best_disjoint_pair};

/// Units of the budget a decision spends, usually minutes.
pub type Budget = u32;

/// Result of applying one decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step<S, V> {
    /// State after the decision is realized
    pub state: S,
    /// Budget consumed, including any waiting; must be at least one
    pub cost: Budget,
    /// Value credited for the decision itself
    pub gain: V,
}

/// A maximization problem explored decision by decision.
///
/// The value of a state with `remaining` budget is the larger of its
/// [`baseline`](Self::baseline) and, for every decision that fits in the
/// budget, `gain + value(next state, remaining - cost)`.
pub trait BranchProblem {
    type State: Clone + Eq + Debug;
    /// Canonical memo key. Must capture every field of the state that can
    /// change the optimal continuation; the remaining budget is added by the
    /// engine.
    type Key: Clone + Eq + Hash + Debug;
    type Decision;
    type Value: Cost;
    /// Error raised while generating decisions, passed through unchanged
    type Error;

    fn key(&self, state: &Self::State) -> Self::Key;

    /// Value collected from here on if no further decision is taken.
    fn baseline(&self, state: &Self::State, remaining: Budget) -> Self::Value;

    fn decisions(
        &self,
        state: &Self::State,
        remaining: Budget,
    ) -> Result<Vec<Self::Decision>, Self::Error>;

    /// Whether a decision can be skipped without losing the optimum.
    ///
    /// Only consulted when pruning is enabled. Returning `true` for a
    /// decision that could lead to the optimum makes results wrong.
    fn is_dominated(
        &self,
        _state: &Self::State,
        _decision: &Self::Decision,
        _remaining: Budget,
    ) -> bool {
        false
    }

    /// Admissible upper bound on the value still obtainable from `state`.
    ///
    /// Only consulted when pruning is enabled. A branch whose gain plus
    /// bound cannot beat the best value already found at the same node is
    /// skipped.
    fn upper_bound(&self, _state: &Self::State, _remaining: Budget) -> Option<Self::Value> {
        None
    }

    /// Realize `decision`, or `None` if it can never be taken from `state`.
    ///
    /// Steps that cost more than `remaining` are discarded by the engine.
    fn apply(
        &self,
        state: &Self::State,
        decision: &Self::Decision,
        remaining: Budget,
    ) -> Option<Step<Self::State, Self::Value>>;
}

/// Problems whose states carry the set of one-shot decisions taken so far.
pub trait DecisionSets: BranchProblem {
    type Set: DecisionSet;

    fn decision_set(&self, state: &Self::State) -> Self::Set;
}

/// Memo table used by [`BranchAndBound::maximize_with`].
pub type BnbMemo<
    P,
    B = HashMapBackend<
        MemoKey<P>,
        MemoEntry<<P as BranchProblem>::State, <P as BranchProblem>::Value>,
    >,
> = MemoTable<MemoKey<P>, <P as BranchProblem>::State, <P as BranchProblem>::Value, B>;

/// `(remaining budget, canonical key)`
pub type MemoKey<P> = (Budget, <P as BranchProblem>::Key);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BnbStats {
    /// Recursive calls, including the root
    pub calls: u64,
    pub cache_hits: u64,
    /// Decisions skipped by [`BranchProblem::is_dominated`]
    pub pruned: u64,
    /// Branches cut by [`BranchProblem::upper_bound`]
    pub bounded: u64,
    /// Decisions for which `apply` returned `None`
    pub infeasible: u64,
    /// Steps costing more than the remaining budget
    pub over_budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome<V> {
    pub value: V,
    pub stats: BnbStats,
}

/// Best value per decision set, from [`BranchAndBound::record_decision_sets`].
#[derive(Debug, Clone)]
pub struct DecisionSetRecords<S, V> {
    pub best: HashMap<S, V>,
    pub stats: BnbStats,
}

impl<S: DecisionSet, V: Cost> DecisionSetRecords<S, V> {
    /// Best value reached by any single set.
    pub fn best_single(&self) -> Option<V> {
        self.best.values().copied().max()
    }

    /// Best sum over two disjoint sets, falling back to the best single set
    /// when nothing pairs up.
    pub fn best_pair(&self) -> Result<Option<V>, SearchError> {
        Ok(best_disjoint_pair(&self.best)?.or_else(|| self.best_single()))
    }
}

/// Depth-first branch-and-bound driver.
///
/// Every call owns its memo table unless one is passed in explicitly with
/// [`maximize_with`](Self::maximize_with). Recursion depth is bounded by the
/// budget since every step costs at least one unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchAndBound {
    pruning: bool,
    verify_keys: bool,
    max_entries: Option<usize>,
}

impl Default for BranchAndBound {
    fn default() -> Self {
        Self {
            pruning: true,
            verify_keys: false,
            max_entries: None,
        }
    }
}

/// Builder for [`BranchAndBound`].
#[derive(Debug, Clone, Default)]
pub struct BranchAndBoundBuilder {
    inner: BranchAndBound,
}

impl BranchAndBoundBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult `is_dominated` and `upper_bound`. On by default.
    pub fn pruning(mut self, enabled: bool) -> Self {
        self.inner.pruning = enabled;
        self
    }

    /// Store full states in the memo and fail on key collisions.
    pub fn verify_keys(mut self, enabled: bool) -> Self {
        self.inner.verify_keys = enabled;
        self
    }

    /// Fail with a capacity error once the memo holds `limit` entries.
    pub fn max_entries(mut self, limit: usize) -> Self {
        self.inner.max_entries = Some(limit);
        self
    }

    pub fn build(self) -> BranchAndBound {
        self.inner
    }
}

impl BranchAndBound {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> BranchAndBoundBuilder {
        BranchAndBoundBuilder::new()
    }

    pub fn is_pruning(&self) -> bool {
        self.pruning
    }

    /// Empty memo table configured like this driver.
    pub fn memo<P: BranchProblem>(&self) -> BnbMemo<P> {
        self.configure(MemoTable::new())
    }

    fn configure<K, S, V, B>(&self, table: MemoTable<K, S, V, B>) -> MemoTable<K, S, V, B> {
        let table = table.verify_keys(self.verify_keys);
        match self.max_entries {
            Some(limit) => table.max_entries(limit),
            None => table,
        }
    }

    /// Best value reachable from `initial` within `budget`.
    pub fn maximize<P: BranchProblem>(
        &self,
        problem: &P,
        initial: &P::State,
        budget: Budget,
    ) -> Result<Outcome<P::Value>, SearchError<P::Error>> {
        let mut memo = self.memo::<P>();
        self.maximize_with(problem, initial, budget, &mut memo)
    }

    /// Like [`maximize`](Self::maximize) but reads and extends a caller-owned
    /// memo table, so sequential calls on the same problem share results.
    pub fn maximize_with<P, B>(
        &self,
        problem: &P,
        initial: &P::State,
        budget: Budget,
        memo: &mut BnbMemo<P, B>,
    ) -> Result<Outcome<P::Value>, SearchError<P::Error>>
    where
        P: BranchProblem,
        B: MemoBackend<MemoKey<P>, MemoEntry<P::State, P::Value>>,
    {
        let mut stats = BnbStats::default();
        let value = self.explore(problem, initial, budget, memo, &mut stats)?;
        let memo_stats = memo.stats();
        debug!(
            budget,
            value = ?value,
            calls = stats.calls,
            cache_hits = stats.cache_hits,
            pruned = stats.pruned,
            bounded = stats.bounded,
            memo_entries = memo_stats.entries,
            "branch-and-bound finished"
        );
        Ok(Outcome { value, stats })
    }

    fn explore<P, B>(
        &self,
        problem: &P,
        state: &P::State,
        remaining: Budget,
        memo: &mut BnbMemo<P, B>,
        stats: &mut BnbStats,
    ) -> Result<P::Value, SearchError<P::Error>>
    where
        P: BranchProblem,
        B: MemoBackend<MemoKey<P>, MemoEntry<P::State, P::Value>>,
    {
        stats.calls += 1;
        let key = (remaining, problem.key(state));
        if let Some(value) = memo.lookup::<P::Error>(&key, state)? {
            stats.cache_hits += 1;
            return Ok(value);
        }

        let mut best = problem.baseline(state, remaining);
        let decisions = problem
            .decisions(state, remaining)
            .map_err(SearchError::Caller)?;
        for decision in &decisions {
            if self.pruning && problem.is_dominated(state, decision, remaining) {
                stats.pruned += 1;
                continue;
            }
            let Some(step) = take_step(problem, state, decision, remaining, stats)? else {
                continue;
            };
            let left = remaining - step.cost;
            if self.pruning
                && let Some(bound) = problem.upper_bound(&step.state, left)
                && step.gain.checked_add(bound).is_some_and(|optimistic| optimistic <= best)
            {
                stats.bounded += 1;
                continue;
            }

            let rest = self.explore(problem, &step.state, left, memo, stats)?;
            let Some(value) = step.gain.checked_add(rest) else {
                return Err(SearchError::CostOverflow);
            };
            best = best.max(value);
        }

        memo.store(key, state, best)?;
        Ok(best)
    }

    /// Walk every reachable state and keep, per decision set, the best total
    /// value reached with exactly that set.
    ///
    /// No pruning applies here: a dominated decision can still produce the
    /// only record for some set. Repeated `(remaining, key, value so far)`
    /// triples are visited once.
    pub fn record_decision_sets<P: DecisionSets>(
        &self,
        problem: &P,
        initial: &P::State,
        budget: Budget,
    ) -> Result<DecisionSetRecords<P::Set, P::Value>, SearchError<P::Error>> {
        let mut seen = self.configure(MemoTable::new());
        let mut records = DecisionSetRecords {
            best: HashMap::new(),
            stats: BnbStats::default(),
        };
        self.record(problem, initial, budget, <P::Value as Cost>::ZERO, &mut seen, &mut records)?;
        debug!(
            budget,
            sets = records.best.len(),
            calls = records.stats.calls,
            cache_hits = records.stats.cache_hits,
            "decision sets recorded"
        );
        Ok(records)
    }

    #[allow(clippy::type_complexity)]
    fn record<P: DecisionSets>(
        &self,
        problem: &P,
        state: &P::State,
        remaining: Budget,
        collected: P::Value,
        seen: &mut MemoTable<(Budget, P::Key, P::Value), P::State, ()>,
        records: &mut DecisionSetRecords<P::Set, P::Value>,
    ) -> Result<(), SearchError<P::Error>> {
        records.stats.calls += 1;
        let key = (remaining, problem.key(state), collected);
        if seen.lookup::<P::Error>(&key, state)?.is_some() {
            records.stats.cache_hits += 1;
            return Ok(());
        }
        seen.store(key, state, ())?;

        let Some(total) = collected.checked_add(problem.baseline(state, remaining)) else {
            return Err(SearchError::CostOverflow);
        };
        let set = problem.decision_set(state);
        trace!(?set, total = ?total, remaining, "decision set reached");
        records
            .best
            .entry(set)
            .and_modify(|best| *best = (*best).max(total))
            .or_insert(total);

        let decisions = problem
            .decisions(state, remaining)
            .map_err(SearchError::Caller)?;
        for decision in &decisions {
            let Some(step) = take_step(problem, state, decision, remaining, &mut records.stats)?
            else {
                continue;
            };
            let Some(next) = collected.checked_add(step.gain) else {
                return Err(SearchError::CostOverflow);
            };
            self.record(problem, &step.state, remaining - step.cost, next, seen, records)?;
        }
        Ok(())
    }
}

/// Apply a decision and enforce the step invariants: a zero-cost step is an
/// error, a step over budget is dropped.
fn take_step<P: BranchProblem>(
    problem: &P,
    state: &P::State,
    decision: &P::Decision,
    remaining: Budget,
    stats: &mut BnbStats,
) -> Result<Option<Step<P::State, P::Value>>, SearchError<P::Error>> {
    let Some(step) = problem.apply(state, decision, remaining) else {
        stats.infeasible += 1;
        return Ok(None);
    };
    if step.cost == 0 {
        return Err(SearchError::ZeroCostStep {
            from: format!("{state:?}"),
        });
    }
    if step.cost > remaining {
        stats.over_budget += 1;
        return Ok(None);
    }
    Ok(Some(step))
}
