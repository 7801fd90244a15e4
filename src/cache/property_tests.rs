//! Property-Based Tests for Cache Module
//!
//! Uses proptest to check capacity, transparency and statistics invariants.

use proptest::prelude::*;
use std::collections::HashMap;
use std::time::Duration;

use crate::cache::CacheStore;

const TEST_TTL: Duration = Duration::from_secs(300);

// == Strategies ==
fn key_strategy() -> impl Strategy<Value = String> {
    "[a-e]{1,2}"
}

#[derive(Debug, Clone)]
enum CacheOp {
    Set { key: String, value: u32 },
    Get { key: String },
    Clear,
}

fn cache_op_strategy() -> impl Strategy<Value = CacheOp> {
    prop_oneof![
        4 => (key_strategy(), any::<u32>()).prop_map(|(key, value)| CacheOp::Set { key, value }),
        4 => key_strategy().prop_map(|key| CacheOp::Get { key }),
        1 => Just(CacheOp::Clear),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Capacity bound: the store never holds more than max_entries values.
    #[test]
    fn prop_capacity_never_exceeded(
        max_entries in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let mut store = CacheStore::new(max_entries, TEST_TTL);
        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value),
                CacheOp::Get { key } => { store.get(&key); }
                CacheOp::Clear => store.clear(),
            }
            prop_assert!(store.len() <= max_entries);
        }
    }

    // Transparency: a hit always returns the last value written for the key,
    // whatever was evicted or cleared in between.
    #[test]
    fn prop_hits_return_latest_value(
        max_entries in 1usize..8,
        ops in prop::collection::vec(cache_op_strategy(), 1..80),
    ) {
        let mut store = CacheStore::new(max_entries, TEST_TTL);
        let mut latest: HashMap<String, u32> = HashMap::new();

        for op in ops {
            match op {
                CacheOp::Set { key, value } => {
                    latest.insert(key.clone(), value);
                    store.set(key, value);
                }
                CacheOp::Get { key } => {
                    if let Some(value) = store.get(&key) {
                        prop_assert_eq!(Some(&value), latest.get(&key));
                    }
                }
                CacheOp::Clear => store.clear(),
            }
        }
    }

    // Statistics: every lookup is counted exactly once as a hit or a miss.
    #[test]
    fn prop_statistics_accuracy(ops in prop::collection::vec(cache_op_strategy(), 1..60)) {
        let mut store = CacheStore::new(4, TEST_TTL);
        let mut expected_hits = 0u64;
        let mut expected_misses = 0u64;

        for op in ops {
            match op {
                CacheOp::Set { key, value } => store.set(key, value),
                CacheOp::Get { key } => match store.get(&key) {
                    Some(_) => expected_hits += 1,
                    None => expected_misses += 1,
                },
                CacheOp::Clear => store.clear(),
            }
        }

        let stats = store.stats();
        prop_assert_eq!(stats.hits, expected_hits);
        prop_assert_eq!(stats.misses, expected_misses);
        prop_assert_eq!(stats.total_entries, store.len());
    }

    // The most recently written key survives any single insertion.
    #[test]
    fn prop_latest_write_is_retained(
        max_entries in 1usize..8,
        keys in prop::collection::vec(key_strategy(), 1..40),
    ) {
        let mut store = CacheStore::new(max_entries, TEST_TTL);
        for (index, key) in keys.iter().enumerate() {
            store.set(key.clone(), index as u32);
            prop_assert_eq!(store.get(key), Some(index as u32));
        }
    }
}
