//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check the index/list pairing, recency order and size
//! bounds against a simple model.

use proptest::prelude::*;
use std::collections::HashMap;

use crate::cache::LruCache;
use crate::error::CacheError;

// == Test Configuration ==
const TEST_CAPACITY: usize = 20;
const TEST_COMPACT_FACTOR: f64 = 0.4;

// == Strategies ==
/// Small key space so operations hit existing keys often
fn key_strategy() -> impl Strategy<Value = u8> {
    0u8..40
}

#[derive(Debug, Clone)]
enum CacheOp {
    Put { key: u8, value: u32 },
    Get { key: u8 },
    Exists { key: u8 },
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Put { key, value }),
        key_strategy().prop_map(|key| CacheOp::Get { key }),
        key_strategy().prop_map(|key| CacheOp::Exists { key }),
    ]
}

/// Reference model: keys most recent first, plus their values.
#[derive(Debug, Default)]
struct Model {
    order: Vec<u8>,
    values: HashMap<u8, u32>,
}

impl Model {
    fn touch(&mut self, key: u8) {
        self.order.retain(|k| *k != key);
        self.order.insert(0, key);
    }

    fn put(&mut self, key: u8, value: u32, capacity: usize, cut: usize) {
        self.values.insert(key, value);
        self.touch(key);
        if self.order.len() >= capacity {
            for evicted in self.order.split_off(cut) {
                self.values.remove(&evicted);
            }
        }
    }

    fn get(&mut self, key: u8) -> Option<u32> {
        let value = self.values.get(&key).copied()?;
        self.touch(key);
        Some(value)
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // For any operation sequence the cache matches the model: same keys in
    // the same recency order, same values, index and list in sync.
    #[test]
    fn prop_matches_model(ops in prop::collection::vec(cache_op_strategy(), 1..200)) {
        let cache = LruCache::new(TEST_CAPACITY, TEST_COMPACT_FACTOR, true).unwrap();
        let cut = cache.cut_position();
        let mut model = Model::default();

        for op in ops {
            match op {
                CacheOp::Put { key, value } => {
                    cache.put(key, value);
                    model.put(key, value, TEST_CAPACITY, cut);
                }
                CacheOp::Get { key } => {
                    prop_assert_eq!(cache.get(&key).ok(), model.get(key), "Get mismatch");
                }
                CacheOp::Exists { key } => {
                    prop_assert_eq!(cache.exists(&key), model.values.contains_key(&key));
                }
            }
            cache.assert_consistent();
            prop_assert_eq!(&cache.keys(), &model.order, "Recency order mismatch");
        }
    }

    // After any put returns, the count is below capacity; a put that
    // compacts leaves exactly cut_position entries. Tiny factors either get
    // rejected or still drop at least one entry.
    #[test]
    fn prop_bounded_size(
        capacity in 2usize..64,
        compact_factor in prop_oneof![0.05f64..0.95, 1e-18f64..1e-3],
        keys in prop::collection::vec(any::<u16>(), 1..300)
    ) {
        let cache = match LruCache::new(capacity, compact_factor, false) {
            Ok(cache) => cache,
            Err(CacheError::InvalidConfiguration(_)) => return Ok(()),
            Err(other) => panic!("unexpected error {:?}", other),
        };
        let cut = cache.cut_position();
        prop_assert!(cut >= 1 && cut < capacity);

        for key in keys {
            let before = cache.stats().compactions;
            cache.put(key, ());
            prop_assert!(cache.len() < capacity, "Size {} reached capacity {}", cache.len(), capacity);
            if cache.stats().compactions > before {
                prop_assert_eq!(cache.len(), cut);
            }
        }
        cache.assert_consistent();
    }

    // Put on an existing key replaces the value and keeps the count.
    #[test]
    fn prop_overwrite_semantics(
        key in key_strategy(),
        value1 in any::<u32>(),
        value2 in any::<u32>()
    ) {
        let cache = LruCache::new(TEST_CAPACITY, TEST_COMPACT_FACTOR, true).unwrap();

        cache.put(key, value1);
        let len = cache.len();
        cache.put(key, value2);

        prop_assert_eq!(cache.len(), len);
        prop_assert_eq!(cache.get(&key), Ok(value2));
    }

    // Exists changes nothing observable, however often it is called.
    #[test]
    fn prop_exists_is_idempotent(
        keys in prop::collection::vec(key_strategy(), 1..30),
        probe in key_strategy(),
        repeats in 1usize..10
    ) {
        let cache = LruCache::new(TEST_CAPACITY, TEST_COMPACT_FACTOR, true).unwrap();
        for key in keys {
            cache.put(key, u32::from(key));
        }

        let order = cache.keys();
        let stats = cache.stats();
        let first = cache.exists(&probe);
        for _ in 0..repeats {
            prop_assert_eq!(cache.exists(&probe), first);
        }
        prop_assert_eq!(cache.keys(), order);
        prop_assert_eq!(cache.stats(), stats);
    }

    // get(k) then get(k') leaves k directly behind k' at the front.
    #[test]
    fn prop_promotion_law(
        keys in prop::collection::hash_set(key_strategy(), 2..TEST_CAPACITY - 1)
    ) {
        let keys: Vec<u8> = keys.into_iter().collect();
        let cache = LruCache::new(TEST_CAPACITY, TEST_COMPACT_FACTOR, true).unwrap();
        for key in &keys {
            cache.put(*key, ());
        }

        let (first, second) = (keys[0], keys[1]);
        cache.get(&first).unwrap();
        cache.get(&second).unwrap();

        let order = cache.keys();
        prop_assert_eq!(&order[..2], &[second, first][..]);
    }
}

// == Additional Unit Tests for Edge Cases ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_compacts_like_cache() {
        let mut model = Model::default();
        for key in 0..5u8 {
            model.put(key, u32::from(key), 5, 3);
        }
        assert_eq!(model.order, vec![4, 3, 2]);
        assert_eq!(model.values.len(), 3);
    }

    #[test]
    fn test_repeated_compactions_stay_consistent() {
        let cache = LruCache::new(TEST_CAPACITY, TEST_COMPACT_FACTOR, true).unwrap();
        for key in 0..1000u32 {
            cache.put(key, key);
            if key % 7 == 0 {
                let _ = cache.try_get(&(key / 2));
            }
        }
        cache.assert_consistent();
        assert!(cache.stats().compactions > 0);
    }
}
