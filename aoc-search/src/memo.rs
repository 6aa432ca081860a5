//! Memo tables for branch-and-bound.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::error::{CapacityExceeded, SearchError};

/// Storage behind a [`MemoTable`].
pub trait MemoBackend<K, V> {
    fn get(&self, key: &K) -> Option<&V>;

    fn insert(&mut self, key: K, value: V);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn clear(&mut self);
}

/// Hash map storage; the default.
#[derive(Debug)]
pub struct HashMapBackend<K, V> {
    data: HashMap<K, V>,
}

impl<K, V> HashMapBackend<K, V> {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            data: HashMap::with_capacity(capacity),
        }
    }
}

impl<K, V> Default for HashMapBackend<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Hash + Eq, V> MemoBackend<K, V> for HashMapBackend<K, V> {
    fn get(&self, key: &K) -> Option<&V> {
        self.data.get(key)
    }

    fn insert(&mut self, key: K, value: V) {
        self.data.insert(key, value);
    }

    fn len(&self) -> usize {
        self.data.len()
    }

    fn clear(&mut self) {
        self.data.clear();
    }
}

/// Storage that remembers nothing.
///
/// Useful to measure how much work the memo saves, and as the reference
/// behaviour when checking that memoization never changes an answer.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoCacheBackend;

impl<K, V> MemoBackend<K, V> for NoCacheBackend {
    fn get(&self, _key: &K) -> Option<&V> {
        None
    }

    fn insert(&mut self, _key: K, _value: V) {}

    fn len(&self) -> usize {
        0
    }

    fn clear(&mut self) {}
}

/// A stored value plus, when key verification is on, the state it was
/// computed for.
#[derive(Debug, Clone)]
pub struct MemoEntry<S, V> {
    value: V,
    witness: Option<S>,
}

/// Hit and miss counters of a [`MemoTable`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Exact memoization keyed by a canonical key derived from a state.
///
/// Values stored here are final: a hit returns the stored value without
/// recomputation. That is only sound if the key captures every field of the
/// state that influences the result. With [`verify_keys`](Self::verify_keys)
/// enabled the table keeps the full state beside each key and reports
/// [`SearchError::KeyCollision`] when a lookup hits an entry written for a
/// different state.
#[derive(Debug)]
pub struct MemoTable<K, S, V, B = HashMapBackend<K, MemoEntry<S, V>>> {
    backend: B,
    limit: Option<usize>,
    verify: bool,
    stats: MemoStats,
    _marker: std::marker::PhantomData<(K, S, V)>,
}

impl<K, S, V> MemoTable<K, S, V> {
    /// Table with the default hash map backend.
    pub fn new() -> Self {
        Self::with_backend(HashMapBackend::new())
    }
}

impl<K, S, V> Default for MemoTable<K, S, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, S, V, B> MemoTable<K, S, V, B> {
    pub fn with_backend(backend: B) -> Self {
        Self {
            backend,
            limit: None,
            verify: false,
            stats: MemoStats::default(),
            _marker: std::marker::PhantomData,
        }
    }

    /// Refuse to store more than `limit` entries.
    pub fn max_entries(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Keep the full state next to each key and fail on key collisions.
    pub fn verify_keys(mut self, enabled: bool) -> Self {
        self.verify = enabled;
        self
    }
}

impl<K, S, V, B> MemoTable<K, S, V, B>
where
    K: Debug,
    S: Clone + Eq + Debug,
    V: Clone,
    B: MemoBackend<K, MemoEntry<S, V>>,
{
    /// Cached value for `key`, if any.
    ///
    /// `state` is only consulted when key verification is enabled.
    pub fn lookup<E>(&mut self, key: &K, state: &S) -> Result<Option<V>, SearchError<E>> {
        let Some(entry) = self.backend.get(key) else {
            self.stats.misses += 1;
            return Ok(None);
        };
        if let Some(witness) = &entry.witness
            && witness != state
        {
            return Err(SearchError::KeyCollision {
                key: format!("{key:?}"),
                first: format!("{witness:?}"),
                second: format!("{state:?}"),
            });
        }
        self.stats.hits += 1;
        Ok(Some(entry.value.clone()))
    }

    /// Record the final value computed for `state` under `key`.
    pub fn store(&mut self, key: K, state: &S, value: V) -> Result<(), CapacityExceeded> {
        if let Some(limit) = self.limit
            && self.backend.len() >= limit
        {
            return Err(CapacityExceeded {
                what: "memo table",
                limit,
            });
        }
        let witness = self.verify.then(|| state.clone());
        self.backend.insert(key, MemoEntry { value, witness });
        Ok(())
    }

    pub fn stats(&self) -> MemoStats {
        MemoStats {
            entries: self.backend.len(),
            ..self.stats
        }
    }

    pub fn len(&self) -> usize {
        self.backend.len()
    }

    pub fn is_empty(&self) -> bool {
        self.backend.is_empty()
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.backend.clear();
        self.stats = MemoStats::default();
    }
}
