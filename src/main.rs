//! Compact LRU demo
//!
//! Populates a cache, probes it, then inserts past capacity so the
//! compaction events show up in the log.

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use compact_lru::{CacheConfig, LruCache, TracingSink};

/// Value type stored by the demo.
#[derive(Debug, Clone)]
struct Sample {
    x: u32,
    y: String,
}

impl Sample {
    fn new(x: u32) -> Self {
        Self {
            x,
            y: x.to_string(),
        }
    }
}

/// Entry point for the demo.
///
/// # Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables (demo defaults: 20, 0.4)
/// 3. Insert keys "0".."9" and probe "0".."29"
/// 4. Insert keys "11".."29", crossing capacity twice
/// 5. Print final statistics as JSON
fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compact_lru=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CacheConfig::from_env_or(CacheConfig::new(20, 0.4, true));
    info!(
        "Configuration loaded: capacity={}, compact_factor={}, thread_safe={}",
        config.capacity, config.compact_factor, config.thread_safe
    );

    let cache: LruCache<String, Sample> = LruCache::with_sink(&config, Arc::new(TracingSink))
        .context("cache configuration rejected")?;

    for i in 0..10 {
        cache.put(i.to_string(), Sample::new(i));
    }

    for i in 0..30 {
        let key = i.to_string();
        let present = cache.exists(&key);
        println!("{} - {}", i, present);
        if present {
            let sample = cache.get(&key).context("entry vanished between probe and read")?;
            println!("\t=> {} ({})", sample.x, sample.y);
        }
    }

    for i in 11..30 {
        println!("Adding: {}", i);
        cache.put(i.to_string(), Sample::new(i));
    }

    println!("Remaining keys: {:?}", cache.keys());
    println!("{}", serde_json::to_string_pretty(&cache.stats())?);

    Ok(())
}
