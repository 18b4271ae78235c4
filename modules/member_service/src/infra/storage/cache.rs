//! Short-lived query result cache
//!
//! Entries are filled while the owning table's read lock is held and the
//! whole cache is cleared under the write lock by every mutation, so a cached
//! result never outlives the rows it was computed from.

use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

pub struct ResultCache<T> {
    entries: DashMap<String, Vec<T>>,
    capacity: usize,
    hits: AtomicU64,
}

impl<T: Clone> ResultCache<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: DashMap::new(),
            capacity,
            hits: AtomicU64::new(0),
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<T>> {
        let hit = self.entries.get(key).map(|e| e.value().clone());
        if hit.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        hit
    }

    pub fn put(&self, key: &str, rows: &[T]) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() >= self.capacity {
            self.entries.clear();
        }
        self.entries.insert(key.to_string(), rows.to_vec());
    }

    pub fn invalidate(&self) {
        self.entries.clear();
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }
}
