//! Pairing of disjoint decision sets for two cooperating agents.
//!
//! A single-agent branch-and-bound run can record, for every distinct set of
//! decisions it managed to take, the best value reached with exactly that
//! set (see [`BranchAndBound::record_decision_sets`]). Two agents that share a
//! pool of one-shot decisions are then solved by pairing two records whose
//! sets do not overlap.
//!
//! [`best_disjoint_pair`] compares every pair of records, so it is quadratic
//! in the number of recorded sets. That is fine while most states collapse
//! onto a few thousand sets (the valve puzzle), and becomes the bottleneck
//! long before the search itself does if a problem records far more.
//!
//! [`BranchAndBound::record_decision_sets`]: crate::BranchAndBound::record_decision_sets

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use crate::cost::Cost;
use crate::error::SearchError;

/// A set of one-shot decisions that can be tested for overlap.
pub trait DecisionSet: Clone + Eq + Hash + Debug {
    fn is_disjoint(&self, other: &Self) -> bool;
}

/// Up to 64 decisions packed in a `u64` mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BitSet(u64);

impl BitSet {
    pub const CAPACITY: usize = u64::BITS as usize;
    pub const EMPTY: BitSet = BitSet(0);

    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Copy of `self` with `index` added, `None` past [`Self::CAPACITY`].
    pub fn with(self, index: usize) -> Option<Self> {
        (index < Self::CAPACITY).then(|| Self(self.0 | 1 << index))
    }

    pub fn contains(self, index: usize) -> bool {
        index < Self::CAPACITY && self.0 & (1 << index) != 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Member indices in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut rest = self.0;
        std::iter::from_fn(move || {
            if rest == 0 {
                return None;
            }
            let index = rest.trailing_zeros() as usize;
            rest &= rest - 1;
            Some(index)
        })
    }
}

impl DecisionSet for BitSet {
    fn is_disjoint(&self, other: &Self) -> bool {
        self.0 & other.0 == 0
    }
}

impl<T> DecisionSet for BTreeSet<T>
where
    T: Ord + Hash + Clone + Debug,
{
    fn is_disjoint(&self, other: &Self) -> bool {
        BTreeSet::is_disjoint(self, other)
    }
}

/// Best sum of two records with disjoint sets.
///
/// Every pair of records is compared, so the cost grows with the square of
/// the record count. Only distinct records are paired; a set is never
/// combined with itself.
/// Returns `Ok(None)` when no disjoint pair exists, including when fewer
/// than two records were collected. Record the empty set (the agent that
/// does nothing) to let a single agent's best stand on its own.
pub fn best_disjoint_pair<S, V>(records: &HashMap<S, V>) -> Result<Option<V>, SearchError>
where
    S: DecisionSet,
    V: Cost,
{
    let entries: Vec<(&S, V)> = records.iter().map(|(set, &value)| (set, value)).collect();
    let mut best: Option<V> = None;

    for (i, &(left, left_value)) in entries.iter().enumerate() {
        for &(right, right_value) in &entries[i + 1..] {
            if !left.is_disjoint(right) {
                continue;
            }
            let Some(total) = left_value.checked_add(right_value) else {
                return Err(SearchError::CostOverflow);
            };
            if best.is_none_or(|current| total > current) {
                best = Some(total);
            }
        }
    }
    Ok(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(indices: &[usize]) -> BitSet {
        indices
            .iter()
            .fold(BitSet::EMPTY, |acc, &i| acc.with(i).unwrap())
    }

    #[test]
    fn test_bitset_membership() {
        let s = set(&[0, 3, 63]);
        assert!(s.contains(0));
        assert!(s.contains(63));
        assert!(!s.contains(1));
        assert!(!s.contains(64));
        assert_eq!(s.len(), 3);
        assert_eq!(s.iter().collect::<Vec<_>>(), vec![0, 3, 63]);
        assert!(BitSet::EMPTY.with(64).is_none());
    }

    #[test]
    fn test_bitset_disjointness() {
        assert!(set(&[0, 1]).is_disjoint(&set(&[2])));
        assert!(!set(&[0, 1]).is_disjoint(&set(&[1, 2])));
        assert!(BitSet::EMPTY.is_disjoint(&BitSet::EMPTY));
    }

    #[test]
    fn test_btreeset_disjointness() {
        let a: BTreeSet<&str> = ["AA", "BB"].into();
        let b: BTreeSet<&str> = ["CC"].into();
        let c: BTreeSet<&str> = ["BB", "DD"].into();
        assert!(DecisionSet::is_disjoint(&a, &b));
        assert!(!DecisionSet::is_disjoint(&a, &c));
    }

    #[test]
    fn test_best_pair_skips_overlapping_sets() {
        let records: HashMap<BitSet, u32> = [
            (set(&[0, 1]), 50),
            (set(&[1, 2]), 45),
            (set(&[2]), 20),
            (set(&[0]), 30),
        ]
        .into();
        // {0,1}+{2} = 70, {1,2}+{0} = 75, {0}+{2} = 50
        assert_eq!(best_disjoint_pair(&records).unwrap(), Some(75));
    }

    #[test]
    fn test_best_pair_needs_two_records() {
        let empty: HashMap<BitSet, u32> = HashMap::new();
        assert_eq!(best_disjoint_pair(&empty).unwrap(), None);

        let single: HashMap<BitSet, u32> = [(set(&[0]), 10)].into();
        assert_eq!(best_disjoint_pair(&single).unwrap(), None);
    }

    #[test]
    fn test_best_pair_with_empty_set_record() {
        let records: HashMap<BitSet, u32> = [(BitSet::EMPTY, 0), (set(&[0, 1]), 40)].into();
        assert_eq!(best_disjoint_pair(&records).unwrap(), Some(40));
    }

    #[test]
    fn test_best_pair_all_overlapping() {
        let records: HashMap<BitSet, u32> = [(set(&[0, 1]), 10), (set(&[1]), 7)].into();
        assert_eq!(best_disjoint_pair(&records).unwrap(), None);
    }

    #[test]
    fn test_best_pair_overflow_is_reported() {
        let records: HashMap<BitSet, u8> = [(set(&[0]), 200), (set(&[1]), 100)].into();
        assert!(matches!(
            best_disjoint_pair(&records),
            Err(SearchError::CostOverflow)
        ));
    }
}
