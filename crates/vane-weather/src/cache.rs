//! In-memory TTL cache for serialized weather payloads.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::error::WeatherError;

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

impl CacheEntry {
    // Expired only strictly after the deadline; an entry read at its
    // exact expiry instant is still served.
    fn is_live(&self, now: Instant) -> bool {
        self.expires_at >= now
    }
}

/// Thread-safe key/value store with per-entry expiry.
///
/// Entries are evicted lazily: an expired entry is dropped on the next
/// read of its key. There is no background sweep and no capacity bound,
/// so the store only ever holds as many entries as there are distinct
/// keys written.
pub struct CacheStore {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl CacheStore {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Look up a live entry. Never returns a value past its expiry.
    pub fn get(&self, key: &str) -> Option<String> {
        {
            let entries = self.entries.read();
            match entries.get(key) {
                None => return None,
                Some(entry) if entry.is_live(Instant::now()) => return Some(entry.value.clone()),
                Some(_) => {}
            }
        }

        // The entry was expired at first sight. Re-check under the write
        // lock before evicting: a concurrent set may have replaced it with
        // a live one in the meantime.
        let mut entries = self.entries.write();
        match entries.get(key) {
            Some(entry) if entry.is_live(Instant::now()) => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    /// Store a value under `key` for `ttl`.
    ///
    /// Replaces any existing entry wholesale and restarts its expiry
    /// clock; readers observe either the old entry or the new one, never
    /// a mix. A zero or unrepresentable TTL is rejected.
    pub fn set(&self, key: &str, value: String, ttl: Duration) -> Result<(), WeatherError> {
        if ttl.is_zero() {
            return Err(WeatherError::InvalidTtl);
        }
        let expires_at = Instant::now()
            .checked_add(ttl)
            .ok_or(WeatherError::InvalidTtl)?;

        let entry = CacheEntry { value, expires_at };
        self.entries.write().insert(key.to_string(), entry);
        Ok(())
    }

    /// Number of entries currently held, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::new()
    }
}
