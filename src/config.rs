//! Configuration Module
//!
//! Holds the cache parameters, their validation rules and loading from
//! environment variables.

use std::env;

use serde::Serialize;

use crate::error::{CacheError, Result};

// == Defaults ==
/// Entry count at which a compaction is triggered
pub const DEFAULT_CAPACITY: usize = 50;
/// Fraction of capacity removed by a compaction
pub const DEFAULT_COMPACT_FACTOR: f64 = 0.4;

/// Smallest fractional entry count treated as real when computing the cut
const CUT_TOLERANCE: f64 = 1e-9;

/// Cache configuration parameters.
///
/// Immutable once a cache has been built from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CacheConfig {
    /// Entry count that triggers a compaction
    pub capacity: usize,
    /// Fraction of `capacity` dropped on each compaction, in (0, 1)
    pub compact_factor: f64,
    /// Whether operations take a blocking exclusive lock
    pub thread_safe: bool,
}

impl CacheConfig {
    // == Constructor ==
    /// Creates a configuration without validating it.
    ///
    /// Validation happens when a cache is built, see [`CacheConfig::validate`].
    pub fn new(capacity: usize, compact_factor: f64, thread_safe: bool) -> Self {
        Self {
            capacity,
            compact_factor,
            thread_safe,
        }
    }

    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `LRU_CAPACITY` - Compaction threshold (default: 50)
    /// - `LRU_COMPACT_FACTOR` - Fraction trimmed per compaction (default: 0.4)
    /// - `LRU_THREAD_SAFE` - `true` or `false` (default: true)
    pub fn from_env() -> Self {
        Self::from_env_or(Self::default())
    }

    /// Same as [`CacheConfig::from_env`], falling back to `base` for every
    /// variable that is unset or does not parse.
    pub fn from_env_or(base: Self) -> Self {
        Self {
            capacity: env::var("LRU_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.capacity),
            compact_factor: env::var("LRU_COMPACT_FACTOR")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.compact_factor),
            thread_safe: env::var("LRU_THREAD_SAFE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(base.thread_safe),
        }
    }

    // == Cut Position ==
    /// Number of entries kept by a compaction:
    /// `floor(capacity * (1 - compact_factor))`, clamped at zero.
    ///
    /// The product is nudged up by a tolerance before flooring so that
    /// factors without an exact binary form (0.9, 0.7, ...) still land on
    /// the whole number they denote.
    pub fn cut_position(&self) -> usize {
        let capacity = self.capacity as f64;
        let tolerance = CUT_TOLERANCE.max(capacity * f64::EPSILON * 4.0);
        let keep = (capacity * (1.0 - self.compact_factor) + tolerance).floor();
        if keep.is_nan() || keep <= 0.0 {
            0
        } else {
            keep as usize
        }
    }

    // == Validate ==
    /// Rejects configurations that cannot hold at least one entry across a
    /// compaction, or whose compaction would remove nothing.
    pub fn validate(&self) -> Result<()> {
        if self.capacity == 0 {
            return Err(CacheError::InvalidConfiguration(
                "capacity must be greater than 0".to_string(),
            ));
        }

        if !(self.compact_factor > 0.0 && self.compact_factor < 1.0) {
            return Err(CacheError::InvalidConfiguration(format!(
                "compact factor must lie in (0, 1), got {}",
                self.compact_factor
            )));
        }

        if self.cut_position() == 0 {
            return Err(CacheError::InvalidConfiguration(format!(
                "capacity {} with compact factor {} keeps no entries after compaction",
                self.capacity, self.compact_factor
            )));
        }

        if self.cut_position() >= self.capacity {
            return Err(CacheError::InvalidConfiguration(format!(
                "capacity {} with compact factor {} removes no entries on compaction",
                self.capacity, self.compact_factor
            )));
        }

        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
            compact_factor: DEFAULT_COMPACT_FACTOR,
            thread_safe: true,
        }
    }
}
