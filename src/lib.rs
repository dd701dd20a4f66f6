//! Compact LRU - A bounded in-memory cache
//!
//! Least-recently-used cache that evicts in batches: once a put brings it to
//! capacity, only the most recently used fraction of entries is kept.
//!
//! ```
//! use compact_lru::{CacheError, LruCache};
//!
//! let cache: LruCache<String, u32> = LruCache::new(20, 0.4, true)?;
//! cache.put("a".to_string(), 1);
//!
//! assert!(cache.exists("a"));
//! assert_eq!(cache.get("a")?, 1);
//! assert_eq!(cache.get("b"), Err(CacheError::KeyNotFound));
//! # Ok::<(), CacheError>(())
//! ```

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{CacheEvent, CacheStats, EventSink, LruCache, NoopSink, TracingSink};
pub use config::CacheConfig;
pub use error::{CacheError, Result};
