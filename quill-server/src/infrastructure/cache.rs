//! Short-lived full-page cache for the index route. An explicit
//! capability handed to the feed handler rather than hidden global
//! state, so tests can reach `clear` and a no-op TTL.
//!
//! Entries expire after a fixed TTL and on manual `clear`; no write
//! path invalidates them, so staleness within the TTL is accepted.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct Entry {
    stored_at: Instant,
    body: Vec<u8>,
}

#[derive(Debug)]
pub struct PageCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, Entry>>,
}

impl PageCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// The cached body for `key`, if present and not expired. Expired
    /// entries are dropped on the way out.
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if entry.stored_at.elapsed() < self.ttl => Some(entry.body.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: String, body: Vec<u8>) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            Entry {
                stored_at: Instant::now(),
                body,
            },
        );
    }

    /// Manual invalidation; the next request recomputes.
    pub fn clear(&self) {
        self.entries.lock().unwrap().clear();
    }
}
