//! Visited-state registry backed by an arena.
//!
//! Every distinct state gets exactly one arena slot, addressed by a
//! [`StateId`]. Slots record the best known cost, the parent slot the state was
//! reached from, and whether the state has been settled (expanded with a final
//! cost). Paths are rebuilt by walking parent indices back to a start.

use std::collections::HashMap;
use std::hash::Hash;

use crate::error::CapacityExceeded;

/// Handle to a state stored in a [`VisitedRegistry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct StateId(u32);

impl StateId {
    /// Position of the state in the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Outcome of offering a state to the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discovery {
    /// First sighting; the state was inserted
    New(StateId),
    /// Seen before but not settled, and the new cost is strictly lower
    Improved(StateId),
    /// Already settled, or the known cost is at least as good
    Known(StateId),
}

impl Discovery {
    /// True when the state needs to be (re)queued.
    pub fn needs_visit(self) -> bool {
        !matches!(self, Discovery::Known(_))
    }

    pub fn id(self) -> StateId {
        match self {
            Discovery::New(id) | Discovery::Improved(id) | Discovery::Known(id) => id,
        }
    }
}

#[derive(Debug)]
struct Slot<S, C> {
    state: S,
    parent: Option<StateId>,
    cost: C,
    settled: bool,
}

/// Arena of discovered states plus a hash index from state to handle.
#[derive(Debug)]
pub struct VisitedRegistry<S, C> {
    slots: Vec<Slot<S, C>>,
    index: HashMap<S, StateId>,
    limit: Option<usize>,
}

impl<S, C> VisitedRegistry<S, C>
where
    S: Clone + Eq + Hash,
    C: Copy + Ord,
{
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
            limit: None,
        }
    }

    /// Registry that refuses to hold more than `limit` distinct states.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::new()
        }
    }

    /// Offer `state` reached at `cost` from `parent`.
    ///
    /// A state is inserted at most once. Later offers only lower the recorded
    /// cost of a state that has not been settled yet.
    pub fn discover(
        &mut self,
        state: S,
        parent: Option<StateId>,
        cost: C,
    ) -> Result<Discovery, CapacityExceeded> {
        if let Some(&id) = self.index.get(&state) {
            let slot = &mut self.slots[id.index()];
            if slot.settled || slot.cost <= cost {
                return Ok(Discovery::Known(id));
            }
            slot.cost = cost;
            slot.parent = parent;
            return Ok(Discovery::Improved(id));
        }

        if let Some(limit) = self.limit
            && self.slots.len() >= limit
        {
            return Err(CapacityExceeded {
                what: "visited registry",
                limit,
            });
        }
        let next = u32::try_from(self.slots.len()).map_err(|_| CapacityExceeded {
            what: "visited registry",
            limit: u32::MAX as usize,
        })?;
        let id = StateId(next);
        self.slots.push(Slot {
            state: state.clone(),
            parent,
            cost,
            settled: false,
        });
        self.index.insert(state, id);
        Ok(Discovery::New(id))
    }

    /// Mark a state as expanded. Returns `false` if it already was, which
    /// identifies stale frontier entries.
    pub fn settle(&mut self, id: StateId) -> bool {
        let slot = &mut self.slots[id.index()];
        !std::mem::replace(&mut slot.settled, true)
    }

    pub fn lookup(&self, state: &S) -> Option<StateId> {
        self.index.get(state).copied()
    }

    pub fn state(&self, id: StateId) -> &S {
        &self.slots[id.index()].state
    }

    pub fn cost(&self, id: StateId) -> C {
        self.slots[id.index()].cost
    }

    pub fn parent(&self, id: StateId) -> Option<StateId> {
        self.slots[id.index()].parent
    }

    pub fn is_settled(&self, id: StateId) -> bool {
        self.slots[id.index()].settled
    }

    /// States from a start up to and including `id`.
    pub fn path_to(&self, id: StateId) -> Vec<S> {
        let mut path = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            path.push(self.slots[current.index()].state.clone());
            cursor = self.slots[current.index()].parent;
        }
        path.reverse();
        path
    }

    /// Settled states and their final costs.
    pub fn settled(&self) -> impl Iterator<Item = (&S, C)> + '_ {
        self.slots
            .iter()
            .filter(|slot| slot.settled)
            .map(|slot| (&slot.state, slot.cost))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl<S, C> Default for VisitedRegistry<S, C>
where
    S: Clone + Eq + Hash,
    C: Copy + Ord,
{
    fn default() -> Self {
        Self::new()
    }
}
