//! In-memory result cache keyed by `(document, query, threshold)`.
//!
//! Backed by a `moka` sync cache. Concurrent lookups of the same missing key run the
//! computation once and share its value; failed computations are not stored.

#[cfg(test)]
mod tests;

use std::sync::Arc;

use moka::policy::EvictionPolicy;
use moka::sync::Cache;

use crate::hashing::{MatchKey, hash_match_key};

/// Capacity policy for [`ResultCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CachePolicy {
    /// Never evicts.
    #[default]
    Unbounded,
    /// Least-recently-used eviction beyond `capacity` entries.
    Lru { capacity: u64 },
}

impl CachePolicy {
    /// `0` means unbounded.
    pub fn from_capacity(capacity: u64) -> Self {
        if capacity == 0 {
            CachePolicy::Unbounded
        } else {
            CachePolicy::Lru { capacity }
        }
    }
}

/// A value served by [`ResultCache::get_or_compute`].
#[derive(Debug, Clone, PartialEq)]
pub struct CacheLookup<V> {
    pub value: V,
    /// `false` only for the caller whose closure produced the value.
    pub hit: bool,
}

/// Memoizes match results.
///
/// Cloning is cheap and clones share entries.
#[derive(Clone)]
pub struct ResultCache<V = Arc<str>> {
    entries: Cache<MatchKey, V>,
    policy: CachePolicy,
}

impl<V> ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    pub fn new(policy: CachePolicy) -> Self {
        let entries = match policy {
            CachePolicy::Unbounded => Cache::builder().build(),
            CachePolicy::Lru { capacity } => Cache::builder()
                .max_capacity(capacity)
                .eviction_policy(EvictionPolicy::lru())
                .build(),
        };
        Self { entries, policy }
    }

    pub fn unbounded() -> Self {
        Self::new(CachePolicy::Unbounded)
    }

    pub fn lru(capacity: u64) -> Self {
        Self::new(CachePolicy::Lru { capacity })
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    /// Returns the cached value or runs `compute` and stores its `Ok` value.
    ///
    /// Callers racing on the same missing key block until the first computation ends;
    /// only that one runs `compute`. An `Err` is handed to every waiter and nothing is
    /// stored, so the next call computes again.
    pub fn get_or_compute<E, F>(
        &self,
        document: &str,
        query: &str,
        threshold: f32,
        compute: F,
    ) -> Result<CacheLookup<V>, E>
    where
        E: Clone + Send + Sync + 'static,
        F: FnOnce() -> Result<V, E>,
    {
        let key = hash_match_key(document, query, threshold);
        if let Some(value) = self.entries.get(&key) {
            return Ok(CacheLookup { value, hit: true });
        }

        let mut computed = false;
        let value = self
            .entries
            .try_get_with(key, || {
                computed = true;
                compute()
            })
            .map_err(|e: Arc<E>| (*e).clone())?;

        Ok(CacheLookup {
            value,
            hit: !computed,
        })
    }

    pub fn get(&self, document: &str, query: &str, threshold: f32) -> Option<V> {
        self.entries.get(&hash_match_key(document, query, threshold))
    }

    pub fn insert(&self, document: &str, query: &str, threshold: f32, value: V) {
        self.entries
            .insert(hash_match_key(document, query, threshold), value);
    }

    pub fn contains(&self, document: &str, query: &str, threshold: f32) -> bool {
        self.entries
            .contains_key(&hash_match_key(document, query, threshold))
    }

    /// Entry count. May lag recent writes until [`Self::run_pending_tasks`].
    pub fn len(&self) -> u64 {
        self.entries.entry_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
    }

    /// Applies pending writes and evictions.
    pub fn run_pending_tasks(&self) {
        self.entries.run_pending_tasks();
    }
}

impl<V> Default for ResultCache<V>
where
    V: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::unbounded()
    }
}

impl<V> std::fmt::Debug for ResultCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultCache")
            .field("policy", &self.policy)
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
