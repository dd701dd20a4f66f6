//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Capacity or compact factor rejected at construction
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Key not present in cache
    #[error("Key not found")]
    KeyNotFound,
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;
