//! Breadth-first and Dijkstra search over an implicit graph.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::hash::Hash;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::cost::Cost;
use crate::error::SearchError;
use crate::frontier::{FifoFrontier, Frontier, MinCostFrontier};
use crate::visited::{StateId, VisitedRegistry};

/// How transition costs are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// Breadth-first search: FIFO frontier, every transition must cost one.
    UnitCost,
    /// Dijkstra: min-cost frontier, transition costs must be non-negative.
    Weighted,
}

/// Optional budgets for a single search call.
///
/// Exhausting the expansion or time budget aborts the search with
/// [`SearchError::ExpansionLimit`] or [`SearchError::DeadlineExceeded`];
/// exhausting the state budget yields [`SearchError::Capacity`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_expansions: Option<usize>,
    pub max_states: Option<usize>,
    pub deadline: Option<Duration>,
}

impl SearchLimits {
    pub fn unbounded() -> Self {
        Self::default()
    }

    pub fn max_expansions(mut self, limit: usize) -> Self {
        self.max_expansions = Some(limit);
        self
    }

    pub fn max_states(mut self, limit: usize) -> Self {
        self.max_states = Some(limit);
        self
    }

    pub fn deadline(mut self, budget: Duration) -> Self {
        self.deadline = Some(budget);
        self
    }
}

/// Counters collected while a search runs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    /// States whose neighbors were generated
    pub expanded: usize,
    /// Distinct states inserted into the visited registry
    pub discovered: usize,
    /// Largest frontier length observed
    pub frontier_peak: usize,
}

/// A successful search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Found<S, C> {
    /// Accumulated cost from the cheapest start to `goal`
    pub cost: C,
    /// The goal state that was reached first
    pub goal: S,
    /// Start-to-goal states, present when path tracking is enabled
    pub path: Option<Vec<S>>,
    pub stats: SearchStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Expand,
    Stop,
}

/// Configured graph search.
///
/// The graph is implicit: callers pass a neighbor function returning
/// `(next state, transition cost)` pairs. Each call of [`search`](Self::search),
/// [`distances_from`](Self::distances_from) or [`reachable`](Self::reachable)
/// owns a fresh frontier and visited registry.
#[derive(Debug, Clone)]
pub struct GraphSearch {
    mode: SearchMode,
    limits: SearchLimits,
    track_paths: bool,
}

impl GraphSearch {
    pub fn new(mode: SearchMode) -> Self {
        Self {
            mode,
            limits: SearchLimits::default(),
            track_paths: false,
        }
    }

    pub fn unit_cost() -> Self {
        Self::new(SearchMode::UnitCost)
    }

    pub fn weighted() -> Self {
        Self::new(SearchMode::Weighted)
    }

    pub fn limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Reconstruct the start-to-goal path on success.
    pub fn track_paths(mut self, enabled: bool) -> Self {
        self.track_paths = enabled;
        self
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    /// Find the cheapest path from any of `starts` to a state accepted by
    /// `is_goal`.
    ///
    /// All starts are seeded at cost zero. The answer is the cost of the first
    /// goal state taken off the frontier. Returns `Ok(None)` when the goal is
    /// unreachable.
    pub fn search<S, C, E, I, G, N, T>(
        &self,
        starts: I,
        mut is_goal: G,
        neighbors: N,
    ) -> Result<Option<Found<S, C>>, SearchError<E>>
    where
        S: Clone + Eq + Hash + Debug,
        C: Cost,
        I: IntoIterator<Item = S>,
        G: FnMut(&S) -> bool,
        N: FnMut(&S) -> Result<T, E>,
        T: IntoIterator<Item = (S, C)>,
    {
        let mut goal = None;
        let (registry, stats) = self.drive(starts, neighbors, |id, state| {
            if is_goal(state) {
                goal = Some(id);
                Visit::Stop
            } else {
                Visit::Expand
            }
        })?;

        let Some(goal) = goal else {
            debug!(
                mode = ?self.mode,
                expanded = stats.expanded,
                discovered = stats.discovered,
                "graph search exhausted without reaching a goal"
            );
            return Ok(None);
        };

        let cost = registry.cost(goal);
        debug!(
            mode = ?self.mode,
            cost = ?cost,
            expanded = stats.expanded,
            discovered = stats.discovered,
            frontier_peak = stats.frontier_peak,
            "graph search reached goal"
        );
        Ok(Some(Found {
            cost,
            goal: registry.state(goal).clone(),
            path: self.track_paths.then(|| registry.path_to(goal)),
            stats,
        }))
    }

    /// Final cost of every state reachable from `starts`.
    pub fn distances_from<S, C, E, I, N, T>(
        &self,
        starts: I,
        neighbors: N,
    ) -> Result<HashMap<S, C>, SearchError<E>>
    where
        S: Clone + Eq + Hash + Debug,
        C: Cost,
        I: IntoIterator<Item = S>,
        N: FnMut(&S) -> Result<T, E>,
        T: IntoIterator<Item = (S, C)>,
    {
        let (registry, stats) = self.drive(starts, neighbors, |_, _| Visit::Expand)?;
        debug!(
            mode = ?self.mode,
            settled = stats.expanded,
            "single-source distances computed"
        );
        Ok(registry
            .settled()
            .map(|(state, cost)| (state.clone(), cost))
            .collect())
    }

    /// Every state reachable from `starts` (flood fill).
    pub fn reachable<S, C, E, I, N, T>(
        &self,
        starts: I,
        neighbors: N,
    ) -> Result<HashSet<S>, SearchError<E>>
    where
        S: Clone + Eq + Hash + Debug,
        C: Cost,
        I: IntoIterator<Item = S>,
        N: FnMut(&S) -> Result<T, E>,
        T: IntoIterator<Item = (S, C)>,
    {
        Ok(self
            .distances_from(starts, neighbors)?
            .into_keys()
            .collect())
    }

    fn drive<S, C, E, I, N, T, V>(
        &self,
        starts: I,
        neighbors: N,
        on_settle: V,
    ) -> Result<(VisitedRegistry<S, C>, SearchStats), SearchError<E>>
    where
        S: Clone + Eq + Hash + Debug,
        C: Cost,
        I: IntoIterator<Item = S>,
        N: FnMut(&S) -> Result<T, E>,
        T: IntoIterator<Item = (S, C)>,
        V: FnMut(StateId, &S) -> Visit,
    {
        match self.mode {
            SearchMode::UnitCost => {
                self.drive_with(FifoFrontier::new(), starts, neighbors, on_settle)
            }
            SearchMode::Weighted => {
                self.drive_with(MinCostFrontier::new(), starts, neighbors, on_settle)
            }
        }
    }

    fn drive_with<S, C, E, F, I, N, T, V>(
        &self,
        mut frontier: F,
        starts: I,
        mut neighbors: N,
        mut on_settle: V,
    ) -> Result<(VisitedRegistry<S, C>, SearchStats), SearchError<E>>
    where
        S: Clone + Eq + Hash + Debug,
        C: Cost,
        F: Frontier<C, StateId>,
        I: IntoIterator<Item = S>,
        N: FnMut(&S) -> Result<T, E>,
        T: IntoIterator<Item = (S, C)>,
        V: FnMut(StateId, &S) -> Visit,
    {
        let deadline = self.limits.deadline.map(|budget| Instant::now() + budget);
        let mut registry = match self.limits.max_states {
            Some(limit) => VisitedRegistry::with_limit(limit),
            None => VisitedRegistry::new(),
        };
        let mut stats = SearchStats::default();

        for start in starts {
            let discovery = registry.discover(start, None, C::ZERO)?;
            if discovery.needs_visit() {
                frontier.push(C::ZERO, discovery.id());
            }
        }
        stats.frontier_peak = frontier.len();

        while let Some((cost, id)) = frontier.pop() {
            // Superseded entry: a cheaper copy of this state was expanded already
            if !registry.settle(id) {
                continue;
            }
            if on_settle(id, registry.state(id)) == Visit::Stop {
                break;
            }

            if let Some(limit) = self.limits.max_expansions
                && stats.expanded >= limit
            {
                return Err(SearchError::ExpansionLimit {
                    expanded: stats.expanded,
                    limit,
                });
            }
            if let Some(deadline) = deadline
                && Instant::now() >= deadline
            {
                return Err(SearchError::DeadlineExceeded {
                    expanded: stats.expanded,
                });
            }
            stats.expanded += 1;

            let transitions = neighbors(registry.state(id)).map_err(SearchError::Caller)?;
            for (next, step) in transitions {
                if let Err(err) = self.check_step(registry.state(id), step) {
                    return Err(err);
                }
                let Some(next_cost) = cost.checked_add(step) else {
                    return Err(SearchError::CostOverflow);
                };
                let discovery = registry.discover(next, Some(id), next_cost)?;
                if discovery.needs_visit() {
                    frontier.push(next_cost, discovery.id());
                }
            }
            stats.frontier_peak = stats.frontier_peak.max(frontier.len());
            trace!(expanded = stats.expanded, cost = ?cost, frontier = frontier.len(), "expanded state");
        }

        stats.discovered = registry.len();
        Ok((registry, stats))
    }

    fn check_step<S: Debug, C: Cost, E>(&self, from: &S, step: C) -> Result<(), SearchError<E>> {
        match self.mode {
            SearchMode::UnitCost if step != C::ONE => Err(SearchError::NonUnitCost {
                from: format!("{from:?}"),
                cost: format!("{step:?}"),
            }),
            SearchMode::Weighted if step.is_negative() => Err(SearchError::NegativeCost {
                from: format!("{from:?}"),
                cost: format!("{step:?}"),
            }),
            _ => Ok(()),
        }
    }
}

/// Breadth-first shortest distance over an unweighted graph.
///
/// `neighbors` yields bare successor states; each move counts as one step.
pub fn bfs<S, I, G, N, T>(
    starts: I,
    is_goal: G,
    mut neighbors: N,
) -> Result<Option<usize>, SearchError>
where
    S: Clone + Eq + Hash + Debug,
    I: IntoIterator<Item = S>,
    G: FnMut(&S) -> bool,
    N: FnMut(&S) -> T,
    T: IntoIterator<Item = S>,
{
    GraphSearch::unit_cost()
        .search(starts, is_goal, |state: &S| {
            Ok(neighbors(state).into_iter().map(|next| (next, 1usize)))
        })
        .map(|found| found.map(|found| found.cost))
}

/// Dijkstra shortest distance over a graph with non-negative weights.
pub fn dijkstra<S, C, I, G, N, T>(
    starts: I,
    is_goal: G,
    mut neighbors: N,
) -> Result<Option<C>, SearchError>
where
    S: Clone + Eq + Hash + Debug,
    C: Cost,
    I: IntoIterator<Item = S>,
    G: FnMut(&S) -> bool,
    N: FnMut(&S) -> T,
    T: IntoIterator<Item = (S, C)>,
{
    GraphSearch::weighted()
        .search(starts, is_goal, |state: &S| Ok(neighbors(state)))
        .map(|found| found.map(|found| found.cost))
}
