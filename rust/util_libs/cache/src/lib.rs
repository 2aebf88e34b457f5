//! In-process byte cache shared by the gateway (refresh tokens) and the
//! notification service (known-inbox markers).
//!
//! The cache is split into independently locked segments. Each segment keeps
//! its own LRU ordering and byte budget, so eviction is LRU within a segment and
//! LRU-approximate across the whole cache.
//!
//! ```rust
//! use cache_utils::ByteCache;
//!
//! let cache = ByteCache::new(1024 * 1024);
//! cache.set("token", b"payload", 60).unwrap();
//! assert_eq!(cache.get("token"), Some(b"payload".to_vec()));
//! assert!(cache.delete("token"));
//! ```
use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, HashMap};
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use thiserror::Error;

#[cfg(test)]
mod tests;

/// Smallest capacity the cache accepts; smaller requests are rounded up.
pub const MIN_CAPACITY: usize = 512 * 1024;
/// Number of independently locked segments.
pub const SEGMENT_COUNT: usize = 256;
/// An entry may not exceed `capacity / MAX_ENTRY_RATIO` bytes.
pub const MAX_ENTRY_RATIO: usize = 1024;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("entry of {size} bytes exceeds the maximum entry size of {max} bytes")]
    TooLarge { size: usize, max: usize },
}

#[derive(Debug)]
struct Entry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
    tick: u64,
}

impl Entry {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if at <= now)
    }
}

#[derive(Debug, Default)]
struct Segment {
    entries: HashMap<String, Entry>,
    // access tick -> key, oldest first
    order: BTreeMap<u64, String>,
    used: usize,
    capacity: usize,
    tick: u64,
}

impl Segment {
    fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Default::default()
        }
    }

    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }

    fn remove(&mut self, key: &str) -> Option<Entry> {
        let entry = self.entries.remove(key)?;
        self.order.remove(&entry.tick);
        self.used -= key.len() + entry.value.len();
        Some(entry)
    }

    fn get(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        let expired = self.entries.get(key)?.is_expired(now);
        if expired {
            self.remove(key);
            return None;
        }

        let tick = self.next_tick();
        let entry = self.entries.get_mut(key)?;
        self.order.remove(&entry.tick);
        entry.tick = tick;
        self.order.insert(tick, key.to_string());
        Some(entry.value.clone())
    }

    fn take(&mut self, key: &str, now: Instant) -> Option<Vec<u8>> {
        let entry = self.remove(key)?;
        if entry.is_expired(now) {
            return None;
        }
        Some(entry.value)
    }

    fn set(&mut self, key: &str, value: &[u8], expires_at: Option<Instant>, now: Instant) {
        self.remove(key);

        let size = key.len() + value.len();
        if self.used + size > self.capacity {
            self.purge_expired(now);
        }
        while self.used + size > self.capacity {
            let Some((_, oldest)) = self.order.pop_first() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&oldest) {
                self.used -= oldest.len() + entry.value.len();
                log::trace!("evicted cache entry: key={oldest}");
            }
        }

        let tick = self.next_tick();
        self.order.insert(tick, key.to_string());
        self.entries.insert(
            key.to_string(),
            Entry {
                value: value.to_vec(),
                expires_at,
                tick,
            },
        );
        self.used += size;
    }

    fn purge_expired(&mut self, now: Instant) {
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in expired {
            self.remove(&key);
        }
    }
}

/// Capacity-bounded key/value store with per-entry TTL.
///
/// All operations take `&self`; the cache synchronises internally and can be
/// shared across tasks behind an `Arc`.
#[derive(Debug)]
pub struct ByteCache {
    segments: Vec<Mutex<Segment>>,
    capacity: usize,
    max_entry_size: usize,
}

impl ByteCache {
    /// Creates a cache holding at most `capacity` bytes of keys and values.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(MIN_CAPACITY);
        let segment_capacity = capacity / SEGMENT_COUNT;
        let segments = (0..SEGMENT_COUNT)
            .map(|_| Mutex::new(Segment::new(segment_capacity)))
            .collect();

        log::debug!("Created byte cache with capacity={capacity}");
        Self {
            segments,
            capacity,
            max_entry_size: capacity / MAX_ENTRY_RATIO,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_entry_size(&self) -> usize {
        self.max_entry_size
    }

    /// Returns a copy of the value stored under `key`, or `None` on a miss or
    /// when the entry has expired.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.get_at(key, Instant::now())
    }

    /// Stores `value` under `key`. A `ttl_seconds` of zero keeps the entry
    /// until it is evicted.
    pub fn set(&self, key: &str, value: &[u8], ttl_seconds: u64) -> Result<(), CacheError> {
        self.set_at(key, value, ttl_seconds, Instant::now())
    }

    /// Removes `key`, returning whether an entry existed.
    pub fn delete(&self, key: &str) -> bool {
        self.segment(key).remove(key).is_some()
    }

    /// Removes `key` and returns its live value in one step.
    ///
    /// Two callers racing on the same key never both observe the value.
    pub fn take(&self, key: &str) -> Option<Vec<u8>> {
        self.take_at(key, Instant::now())
    }

    /// Number of entries currently held. Expired entries are dropped lazily,
    /// so this may include entries that a `get` would no longer return.
    pub fn entry_count(&self) -> usize {
        self.segments
            .iter()
            .map(|segment| lock(segment).entries.len())
            .sum()
    }

    pub(crate) fn get_at(&self, key: &str, now: Instant) -> Option<Vec<u8>> {
        self.segment(key).get(key, now)
    }

    pub(crate) fn take_at(&self, key: &str, now: Instant) -> Option<Vec<u8>> {
        self.segment(key).take(key, now)
    }

    pub(crate) fn set_at(
        &self,
        key: &str,
        value: &[u8],
        ttl_seconds: u64,
        now: Instant,
    ) -> Result<(), CacheError> {
        let size = key.len() + value.len();
        if size > self.max_entry_size {
            return Err(CacheError::TooLarge {
                size,
                max: self.max_entry_size,
            });
        }

        let expires_at = match ttl_seconds {
            0 => None,
            // past the clock's range the entry lives until evicted
            secs => now.checked_add(Duration::from_secs(secs)),
        };
        self.segment(key).set(key, value, expires_at, now);
        Ok(())
    }

    pub(crate) fn segment_index(&self, key: &str) -> usize {
        let mut hasher = DefaultHasher::new();
        key.hash(&mut hasher);
        (hasher.finish() as usize) % self.segments.len()
    }

    fn segment(&self, key: &str) -> MutexGuard<'_, Segment> {
        lock(&self.segments[self.segment_index(key)])
    }
}

// Segment state is consistent between statements; poisoning is ignored.
fn lock(segment: &Mutex<Segment>) -> MutexGuard<'_, Segment> {
    segment.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
