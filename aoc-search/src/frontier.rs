//! Frontier containers: the states waiting to be expanded.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

/// A queue of `(accumulated cost, item)` pairs.
///
/// The graph engine only needs push and pop; the pop order is what separates
/// breadth-first search from Dijkstra.
pub trait Frontier<C, T> {
    fn push(&mut self, cost: C, item: T);

    /// Remove the next entry to expand, or `None` when the frontier is drained.
    fn pop(&mut self) -> Option<(C, T)>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// First-in first-out frontier for unit-cost search.
///
/// With every transition costing one, insertion order is already cost order.
#[derive(Debug)]
pub struct FifoFrontier<C, T> {
    queue: VecDeque<(C, T)>,
}

impl<C, T> FifoFrontier<C, T> {
    pub fn new() -> Self {
        Self {
            queue: VecDeque::new(),
        }
    }
}

impl<C, T> Default for FifoFrontier<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, T> Frontier<C, T> for FifoFrontier<C, T> {
    fn push(&mut self, cost: C, item: T) {
        self.queue.push_back((cost, item));
    }

    fn pop(&mut self) -> Option<(C, T)> {
        self.queue.pop_front()
    }

    fn len(&self) -> usize {
        self.queue.len()
    }
}

/// Heap entry ordered by `(cost, seq)` with the comparison inverted so that
/// `BinaryHeap` (a max-heap) yields the cheapest entry first.
#[derive(Debug)]
struct Queued<C, T> {
    cost: C,
    seq: u64,
    item: T,
}

impl<C: Ord, T> PartialEq for Queued<C, T> {
    fn eq(&self, other: &Self) -> bool {
        self.cost == other.cost && self.seq == other.seq
    }
}

impl<C: Ord, T> Eq for Queued<C, T> {}

impl<C: Ord, T> PartialOrd for Queued<C, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<C: Ord, T> Ord for Queued<C, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (&other.cost, other.seq).cmp(&(&self.cost, self.seq))
    }
}

/// Min-priority frontier for weighted search.
///
/// Entries with equal cost pop in insertion order, which keeps results and
/// reconstructed paths deterministic.
#[derive(Debug)]
pub struct MinCostFrontier<C, T> {
    heap: BinaryHeap<Queued<C, T>>,
    seq: u64,
}

impl<C: Ord, T> MinCostFrontier<C, T> {
    pub fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }
}

impl<C: Ord, T> Default for MinCostFrontier<C, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Ord, T> Frontier<C, T> for MinCostFrontier<C, T> {
    fn push(&mut self, cost: C, item: T) {
        let seq = self.seq;
        self.seq += 1;
        self.heap.push(Queued { cost, seq, item });
    }

    fn pop(&mut self) -> Option<(C, T)> {
        self.heap.pop().map(|q| (q.cost, q.item))
    }

    fn len(&self) -> usize {
        self.heap.len()
    }
}
