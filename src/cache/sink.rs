//! Event Sink Module
//!
//! Diagnostic side channel for cache events. The cache never writes output
//! itself; it hands events to an injected [`EventSink`].

use serde::Serialize;
use tracing::info;

// == Cache Event ==
/// Something the cache reports to its sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum CacheEvent {
    /// A batch trim ran after a put reached capacity
    Compaction {
        /// Entry count that triggered the trim
        size_before: usize,
        /// Number of most recently used entries kept
        cut_position: usize,
        /// Entry count once the trim finished
        size_after: usize,
    },
}

impl CacheEvent {
    /// Number of entries removed by this event.
    pub fn evicted(&self) -> usize {
        match *self {
            CacheEvent::Compaction {
                size_before,
                size_after,
                ..
            } => size_before - size_after,
        }
    }
}

// == Event Sink ==
/// Receiver for cache events.
///
/// Called on the thread that ran the put, after the cache lock has been
/// released, so a sink may read the cache it is attached to.
pub trait EventSink: Send + Sync {
    fn record(&self, event: &CacheEvent);
}

/// Sink that drops every event. Used when no sink is supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn record(&self, _event: &CacheEvent) {}
}

/// Sink that forwards events to `tracing` at info level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn record(&self, event: &CacheEvent) {
        match *event {
            CacheEvent::Compaction {
                size_before,
                cut_position,
                size_after,
            } => {
                info!(
                    target: "compact_lru",
                    size_before,
                    cut_position,
                    size_after,
                    evicted = event.evicted(),
                    "Evicting cache at capacity, trimmed to {}",
                    size_after
                );
            }
        }
    }
}

impl<F> EventSink for F
where
    F: Fn(&CacheEvent) + Send + Sync,
{
    fn record(&self, event: &CacheEvent) {
        self(event)
    }
}
