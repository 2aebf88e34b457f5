use crate::{ByteCache, CacheError, MIN_CAPACITY, SEGMENT_COUNT};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[test]
fn should_return_stored_value() {
    let cache = ByteCache::new(MIN_CAPACITY);
    cache.set("key", b"value", 0).unwrap();

    assert_eq!(cache.get("key"), Some(b"value".to_vec()));
    assert_eq!(cache.entry_count(), 1);
}

#[test]
fn should_miss_unknown_key() {
    let cache = ByteCache::new(MIN_CAPACITY);
    assert_eq!(cache.get("missing"), None);
    assert!(!cache.delete("missing"));
}

#[test]
fn should_overwrite_existing_key() {
    let cache = ByteCache::new(MIN_CAPACITY);
    cache.set("key", b"first", 0).unwrap();
    cache.set("key", b"second", 0).unwrap();

    assert_eq!(cache.get("key"), Some(b"second".to_vec()));
    assert_eq!(cache.entry_count(), 1);
}

#[test]
fn should_report_whether_delete_removed_an_entry() {
    let cache = ByteCache::new(MIN_CAPACITY);
    cache.set("key", b"value", 0).unwrap();

    assert!(cache.delete("key"));
    assert!(!cache.delete("key"));
    assert_eq!(cache.get("key"), None);
    assert_eq!(cache.entry_count(), 0);
}

#[test]
fn should_reject_entries_above_the_size_limit() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let max = cache.max_entry_size();
    assert_eq!(max, MIN_CAPACITY / 1024);

    let value = vec![0u8; max];
    let err = cache.set("k", &value, 0).unwrap_err();
    assert_eq!(
        err,
        CacheError::TooLarge {
            size: max + 1,
            max
        }
    );

    let value = vec![0u8; max - 1];
    assert!(cache.set("k", &value, 0).is_ok());
}

#[test]
fn should_expire_entries_after_ttl() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let now = Instant::now();
    cache.set_at("key", b"value", 10, now).unwrap();

    assert!(cache.get_at("key", now + Duration::from_secs(9)).is_some());
    assert!(cache.get_at("key", now + Duration::from_secs(10)).is_none());
    // expired entries are dropped on access
    assert_eq!(cache.entry_count(), 0);
}

#[test]
fn should_keep_zero_ttl_entries_until_evicted() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let now = Instant::now();
    cache.set_at("key", b"value", 0, now).unwrap();

    let far_future = now + Duration::from_secs(60 * 60 * 24 * 365);
    assert!(cache.get_at("key", far_future).is_some());
}

#[test]
fn should_keep_entries_with_unrepresentable_ttl_until_evicted() {
    let cache = ByteCache::new(MIN_CAPACITY);
    cache.set("key", b"value", u64::MAX).unwrap();

    assert_eq!(cache.get("key"), Some(b"value".to_vec()));
    let far_future = Instant::now() + Duration::from_secs(60 * 60 * 24 * 365);
    assert!(cache.get_at("key", far_future).is_some());
}

#[test]
fn should_take_value_exactly_once() {
    let cache = ByteCache::new(MIN_CAPACITY);
    cache.set("key", b"value", 60).unwrap();

    assert_eq!(cache.take("key"), Some(b"value".to_vec()));
    assert_eq!(cache.take("key"), None);
    assert_eq!(cache.entry_count(), 0);
}

#[test]
fn should_not_take_expired_value() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let now = Instant::now();
    cache.set_at("key", b"value", 1, now).unwrap();

    assert_eq!(cache.take_at("key", now + Duration::from_secs(2)), None);
    assert_eq!(cache.entry_count(), 0);
}

#[test]
fn should_stay_within_capacity_under_pressure() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let value = vec![7u8; 400];
    let inserted = 10_000;
    for i in 0..inserted {
        cache.set(&format!("key-{i}"), &value, 0).unwrap();
    }

    let per_segment = MIN_CAPACITY / SEGMENT_COUNT;
    let max_per_segment = per_segment / (value.len() + "key-0000".len());
    assert!(cache.entry_count() <= max_per_segment * SEGMENT_COUNT);
    // the most recent write always survives
    assert!(cache.get(&format!("key-{}", inserted - 1)).is_some());
}

fn keys_in_segment_of(cache: &ByteCache, anchor: &str, count: usize) -> Vec<String> {
    let segment = cache.segment_index(anchor);
    (0..)
        .map(|i| format!("k{i}"))
        .filter(|key| cache.segment_index(key) == segment)
        .take(count)
        .collect()
}

#[test]
fn should_evict_expired_entries_before_live_ones() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let now = Instant::now();
    let value = vec![1u8; 400];
    let keys = keys_in_segment_of(&cache, "live", 8);

    // "live" is the oldest entry of a full segment
    cache.set_at("live", &value, 3600, now).unwrap();
    for key in keys[..4].iter() {
        cache.set_at(key, &value, 1, now).unwrap();
    }

    // once the short-lived entries have expired they make room first
    let later = now + Duration::from_secs(5);
    for key in keys[4..].iter() {
        cache.set_at(key, &value, 0, later).unwrap();
    }

    assert!(cache.get_at("live", later).is_some());
    for key in keys[4..].iter() {
        assert!(cache.get_at(key, later).is_some());
    }
}

#[test]
fn should_evict_least_recently_used_entry_in_a_segment() {
    let cache = ByteCache::new(MIN_CAPACITY);
    let now = Instant::now();
    let value = vec![0u8; 300];

    let same_segment = keys_in_segment_of(&cache, "anchor", 16);

    cache.set_at("anchor", &value, 0, now).unwrap();
    for key in same_segment.iter() {
        // touching the anchor keeps it the most recently used entry
        cache.get_at("anchor", now).unwrap();
        cache.set_at(key, &value, 0, now).unwrap();
    }

    assert!(cache.get_at("anchor", now).is_some());
    assert!(cache.get_at(&same_segment[0], now).is_none());
}

#[test]
fn should_be_safe_under_concurrent_callers() {
    let cache = Arc::new(ByteCache::new(4 * MIN_CAPACITY));
    let handles: Vec<_> = (0..8)
        .map(|t| {
            let cache = cache.clone();
            std::thread::spawn(move || {
                for i in 0..1_000 {
                    let key = format!("{t}-{i}");
                    cache.set(&key, key.as_bytes(), 60).unwrap();
                    assert_eq!(cache.take(&key), Some(key.as_bytes().to_vec()));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    assert_eq!(cache.entry_count(), 0);
}
