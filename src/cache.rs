//! Time-windowed memoization for RPC query results.
//!
//! A `TtlCache` is a flat string-keyed map of `(payload, fetched_at)` pairs.
//! A read younger than the freshness window returns the stored payload;
//! anything older reads as absent and is overwritten by the next store.
//! Expired entries are swept whenever a new one is stored, so the map stays
//! bounded by the set of keys used within one window. There is no
//! single-flight guard: two callers racing on the same expired key both go
//! to the network.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

struct Entry<T> {
    payload: T,
    fetched_at: Instant,
}

pub struct TtlCache<T> {
    entries: Mutex<HashMap<String, Entry<T>>>,
    ttl: Duration,
}

impl<T: Clone> TtlCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }

    /// Returns the payload stored under `key` if it is still fresh.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.lock().expect("cache mutex");
        entries
            .get(key)
            .filter(|e| e.fetched_at.elapsed() < self.ttl)
            .map(|e| e.payload.clone())
    }

    /// Stores `payload` under `key`, stamping it with the current instant.
    pub fn put(&self, key: &str, payload: T) {
        let mut entries = self.entries.lock().expect("cache mutex");
        let ttl = self.ttl;
        entries.retain(|_, e| e.fetched_at.elapsed() < ttl);
        entries.insert(
            key.to_string(),
            Entry {
                payload,
                fetched_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex").len()
    }
}
