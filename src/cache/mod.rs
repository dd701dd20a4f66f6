//! Cache Module
//!
//! Provides a bounded in-memory LRU cache with batch compaction.

mod entry;
mod lock;
mod lru;
mod sink;
mod stats;
mod store;

#[cfg(test)]
mod property_tests;

// Re-export public types
pub use entry::CacheEntry;
pub use lock::ConditionalLock;
pub use lru::{Iter, RecencyList, SlotId};
pub use sink::{CacheEvent, EventSink, NoopSink, TracingSink};
pub use stats::CacheStats;
pub use store::LruCache;
