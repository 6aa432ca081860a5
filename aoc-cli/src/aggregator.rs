//! Reorders results that arrive from worker threads in completion order.
//!
//! The keys of every expected result are known up front. A result is released
//! once every key before it has been released, so output always follows
//! (year, day, part) order while still streaming.

use crate::executor::SolverResult;
use std::collections::{BTreeMap, VecDeque};

/// Ordering key of a result, ascending by year, then day, then part
#[derive(Debug, Ord, PartialOrd, Eq, PartialEq, Clone, Copy)]
pub struct ResultKey {
    pub year: u16,
    pub day: u8,
    pub part: u8,
}

impl From<&SolverResult> for ResultKey {
    fn from(r: &SolverResult) -> Self {
        Self {
            year: r.year,
            day: r.day,
            part: r.part,
        }
    }
}

pub struct ResultAggregator {
    /// Keys not released yet, smallest first
    expected: VecDeque<ResultKey>,
    /// Results that arrived ahead of their turn
    pending: BTreeMap<ResultKey, SolverResult>,
}

impl ResultAggregator {
    pub fn new(mut expected_keys: Vec<ResultKey>) -> Self {
        expected_keys.sort_unstable();
        expected_keys.dedup();
        Self {
            expected: expected_keys.into(),
            pending: BTreeMap::new(),
        }
    }

    /// Buffer `result` and release every result whose turn has come
    pub fn add(&mut self, result: SolverResult) -> Vec<SolverResult> {
        self.pending.insert(ResultKey::from(&result), result);

        let mut ready = Vec::new();
        while let Some(next) = self.expected.front() {
            let Some(result) = self.pending.remove(next) else {
                break;
            };
            self.expected.pop_front();
            ready.push(result);
        }
        ready
    }

    /// Everything still buffered, in key order
    pub fn drain(&mut self) -> Vec<SolverResult> {
        std::mem::take(&mut self.pending).into_values().collect()
    }

    /// True once every expected key has been released
    pub fn is_complete(&self) -> bool {
        self.expected.is_empty()
    }
}
