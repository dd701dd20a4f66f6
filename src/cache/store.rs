//! Cache Store Module
//!
//! Main cache engine combining a key index with the recency list, batch
//! compaction and an optional lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;

use crate::cache::{
    CacheEntry, CacheEvent, CacheStats, ConditionalLock, EventSink, NoopSink, RecencyList, SlotId,
};
use crate::config::CacheConfig;
use crate::error::{CacheError, Result};

// == Cache State ==
/// Everything guarded by the cache lock.
///
/// Every key in `index` points at the entry with the same key in `list`,
/// and every entry in `list` is indexed.
#[derive(Debug)]
struct CacheState<K, V> {
    list: RecencyList<K, V>,
    index: HashMap<K, SlotId>,
    stats: CacheStats,
}

impl<K, V> CacheState<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn with_capacity(capacity: usize) -> Self {
        Self {
            list: RecencyList::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            stats: CacheStats::new(),
        }
    }

    /// Finds a key, promotes it and clones its value.
    fn lookup<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = match self.index.get(key) {
            Some(&id) => id,
            None => {
                self.stats.record_miss();
                return None;
            }
        };

        self.list.move_to_front(id);
        let value = self.list.get(id).map(|entry| entry.value.clone());
        if value.is_some() {
            self.stats.record_hit();
        }
        value
    }

    fn upsert(&mut self, key: K, value: V) {
        match self.index.get(&key).copied() {
            Some(id) => {
                self.list.move_to_front(id);
                if let Some(entry) = self.list.get_mut(id) {
                    entry.replace(value);
                }
            }
            None => {
                let id = self.list.push_front(CacheEntry::new(key.clone(), value));
                self.index.insert(key, id);
            }
        }
    }

    /// Trims the list down to its `cut_position` most recently used entries
    /// once it holds `capacity` or more.
    fn compact(&mut self, capacity: usize, cut_position: usize) -> Option<CacheEvent> {
        let size_before = self.list.len();
        if size_before < capacity {
            return None;
        }

        while self.list.len() > cut_position {
            match self.list.pop_back() {
                Some(entry) => {
                    self.index.remove(&entry.key);
                }
                None => break,
            }
        }

        let size_after = self.list.len();
        self.stats.record_compaction(size_before - size_after);
        Some(CacheEvent::Compaction {
            size_before,
            cut_position,
            size_after,
        })
    }
}

// == LRU Cache ==
/// Bounded LRU cache with batch compaction.
///
/// Once a put brings the entry count to `capacity`, the cache drops every
/// entry past the `cut_position` most recently used ones in a single pass.
/// Reads through [`LruCache::get`] and [`LruCache::try_get`] count as use;
/// [`LruCache::exists`] does not.
///
/// All methods take `&self`. When built with `thread_safe = true` every call
/// holds an exclusive lock, so the cache can be shared through an `Arc`.
/// Without it, calls must not overlap; an overlapping call panics.
pub struct LruCache<K, V> {
    state: ConditionalLock<CacheState<K, V>>,
    config: CacheConfig,
    cut_position: usize,
    sink: Arc<dyn EventSink>,
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    // == Constructor ==
    /// Creates a cache with the given capacity, compact factor and
    /// thread-safety mode. Events are discarded.
    ///
    /// # Arguments
    /// * `capacity` - Entry count that triggers a compaction
    /// * `compact_factor` - Fraction of `capacity` dropped per compaction, in (0, 1)
    /// * `thread_safe` - Whether every operation takes a blocking lock
    pub fn new(capacity: usize, compact_factor: f64, thread_safe: bool) -> Result<Self> {
        Self::from_config(&CacheConfig::new(capacity, compact_factor, thread_safe))
    }

    /// Creates a cache from a configuration. Events are discarded.
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        Self::with_sink(config, Arc::new(NoopSink))
    }

    /// Creates a cache that reports events to `sink`.
    pub fn with_sink(config: &CacheConfig, sink: Arc<dyn EventSink>) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            state: ConditionalLock::new(
                CacheState::with_capacity(config.capacity),
                config.thread_safe,
            ),
            config: *config,
            cut_position: config.cut_position(),
            sink,
        })
    }

    // == Exists ==
    /// Returns true if the key is present. Does not change recency.
    pub fn exists<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.acquire().index.contains_key(key)
    }

    // == Get ==
    /// Returns a copy of the value and marks the key as most recently used.
    ///
    /// Fails with [`CacheError::KeyNotFound`] if the key is absent.
    pub fn get<Q>(&self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.try_get(key).ok_or(CacheError::KeyNotFound)
    }

    /// Like [`LruCache::get`], returning `None` instead of an error.
    pub fn try_get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.state.acquire().lookup(key)
    }

    // == Put ==
    /// Stores a value and marks the key as most recently used.
    ///
    /// An existing key keeps its slot and has its value replaced. If the
    /// entry count reaches capacity afterwards, the cache is compacted
    /// before the call returns. The sink hears about the compaction after
    /// the lock is released.
    pub fn put(&self, key: K, value: V) {
        let event = {
            let mut state = self.state.acquire();
            state.upsert(key, value);
            state.compact(self.config.capacity, self.cut_position)
        };

        if let Some(event) = event {
            self.sink.record(&event);
        }
    }

    // == Introspection ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.state.acquire().list.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // == Keys ==
    /// Keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.state
            .acquire()
            .list
            .iter()
            .map(|entry| entry.key.clone())
            .collect()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let state = self.state.acquire();
        let mut stats = state.stats.clone();
        stats.set_total_entries(state.list.len());
        stats
    }

    // == Config ==
    /// Returns the validated configuration the cache was built from.
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    // == Capacity ==
    /// Returns the entry count that triggers a compaction.
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    // == Compact Factor ==
    /// Returns the fraction of capacity dropped by each compaction.
    pub fn compact_factor(&self) -> f64 {
        self.config.compact_factor
    }

    // == Is Thread Safe ==
    /// Returns true if every operation takes a blocking lock.
    pub fn is_thread_safe(&self) -> bool {
        self.state.is_blocking()
    }

    // == Cut Position ==
    /// Number of entries a compaction keeps.
    pub fn cut_position(&self) -> usize {
        self.cut_position
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self)
    where
        K: fmt::Debug,
    {
        let state = self.state.acquire();
        assert_eq!(state.index.len(), state.list.len(), "index and list sizes differ");
        assert_eq!(state.list.iter().count(), state.list.len(), "running count drifted");
        for entry in state.list.iter() {
            let id = state.index.get(&entry.key);
            assert!(id.is_some(), "key {:?} missing from index", entry.key);
            let indexed = id.and_then(|&id| state.list.get(id)).map(|e| &e.key);
            assert_eq!(indexed, Some(&entry.key), "index points at the wrong entry");
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("config", &self.config)
            .field("cut_position", &self.cut_position)
            .finish_non_exhaustive()
    }
}
