//! In-memory idempotency key store for checkout.
//!
//! Maps a client-supplied `Idempotency-Key` to the serialized first response.
//! A replay inside the TTL returns the stored response without touching the
//! upstream; a key whose first request is still running reports in-flight.
//! Expired entries are evicted by a periodic sweep.
//!
//! Single-process and best-effort. Multi-instance deployments should move
//! this to Redis; nothing here coordinates across processes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Outcome of registering an idempotency key before doing the work.
#[derive(Debug)]
pub enum Begin {
    /// Key unseen (or expired); caller proceeds and must `complete` or
    /// `abandon` the key.
    Started,
    /// The first request with this key is still running.
    InFlight,
    /// The work already finished; here is the stored response.
    Replay(serde_json::Value),
}

#[derive(Debug)]
enum Entry {
    InFlight { expires_at: Instant },
    Completed {
        body: serde_json::Value,
        expires_at: Instant,
    },
}

impl Entry {
    const fn expires_at(&self) -> Instant {
        match self {
            Self::InFlight { expires_at } | Self::Completed { expires_at, .. } => *expires_at,
        }
    }
}

/// TTL map from idempotency key to stored response.
#[derive(Clone)]
pub struct IdempotencyStore {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
    /// Retention for completed entries.
    ttl: Duration,
    /// Expiry for in-flight markers, so a crashed request cannot wedge a key.
    in_flight_ttl: Duration,
}

impl IdempotencyStore {
    /// Create a store. `in_flight_ttl` bounds how long a key stays reserved
    /// when its first request never completes.
    #[must_use]
    pub fn new(ttl: Duration, in_flight_ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
            in_flight_ttl,
        }
    }

    /// Register a key before starting the work.
    #[must_use]
    pub fn begin(&self, key: &str) -> Begin {
        let now = Instant::now();
        let mut entries = lock_unpoisoned(&self.entries);

        match entries.get(key) {
            Some(entry) if entry.expires_at() <= now => {
                // Expired entry: fall through and re-reserve below
            }
            Some(Entry::InFlight { .. }) => return Begin::InFlight,
            Some(Entry::Completed { body, .. }) => return Begin::Replay(body.clone()),
            None => {}
        }

        entries.insert(
            key.to_string(),
            Entry::InFlight {
                expires_at: now + self.in_flight_ttl,
            },
        );
        Begin::Started
    }

    /// Store the response for a key whose work succeeded.
    pub fn complete(&self, key: &str, body: serde_json::Value) {
        let mut entries = lock_unpoisoned(&self.entries);
        entries.insert(
            key.to_string(),
            Entry::Completed {
                body,
                expires_at: Instant::now() + self.ttl,
            },
        );
    }

    /// Drop the in-flight marker for a key whose work failed, so the client
    /// can retry with the same key.
    pub fn abandon(&self, key: &str) {
        let mut entries = lock_unpoisoned(&self.entries);
        if matches!(entries.get(key), Some(Entry::InFlight { .. })) {
            entries.remove(key);
        }
    }

    /// Evict expired entries. Called by the periodic sweeper.
    pub fn sweep(&self) {
        let now = Instant::now();
        let mut entries = lock_unpoisoned(&self.entries);
        entries.retain(|_, entry| entry.expires_at() > now);
    }

    /// Number of live entries (for the sweeper's log line).
    #[must_use]
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.entries).len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A poisoned mutex here means a panic mid-insert; the map stays usable.
fn lock_unpoisoned<'a, T>(mutex: &'a Arc<Mutex<T>>) -> std::sync::MutexGuard<'a, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_first_begin_starts() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_secs(30));
        assert!(matches!(store.begin("k1"), Begin::Started));
    }

    #[test]
    fn test_second_begin_is_in_flight() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_secs(30));
        let _ = store.begin("k1");
        assert!(matches!(store.begin("k1"), Begin::InFlight));
    }

    #[test]
    fn test_completed_key_replays() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_secs(30));
        let _ = store.begin("k1");
        store.complete("k1", serde_json::json!({"order_id": 5001}));

        match store.begin("k1") {
            Begin::Replay(body) => assert_eq!(body["order_id"], 5001),
            other => panic!("expected replay, got {other:?}"),
        }
    }

    #[test]
    fn test_abandoned_key_can_restart() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_secs(30));
        let _ = store.begin("k1");
        store.abandon("k1");
        assert!(matches!(store.begin("k1"), Begin::Started));
    }

    #[test]
    fn test_abandon_does_not_clobber_completed() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_secs(30));
        let _ = store.begin("k1");
        store.complete("k1", serde_json::json!({"ok": true}));
        store.abandon("k1");
        assert!(matches!(store.begin("k1"), Begin::Replay(_)));
    }

    #[test]
    fn test_expired_completed_entry_restarts() {
        let store = IdempotencyStore::new(Duration::from_millis(10), Duration::from_millis(10));
        let _ = store.begin("k1");
        store.complete("k1", serde_json::json!({"ok": true}));

        std::thread::sleep(Duration::from_millis(20));
        assert!(matches!(store.begin("k1"), Begin::Started));
    }

    #[test]
    fn test_stale_in_flight_marker_expires() {
        let store = IdempotencyStore::new(Duration::from_secs(60), Duration::from_millis(10));
        let _ = store.begin("k1");

        std::thread::sleep(Duration::from_millis(20));
        // The crashed first request's marker no longer wedges the key
        assert!(matches!(store.begin("k1"), Begin::Started));
    }

    #[test]
    fn test_sweep_evicts_expired() {
        let store = IdempotencyStore::new(Duration::from_millis(10), Duration::from_millis(10));
        let _ = store.begin("k1");
        store.complete("k1", serde_json::json!({}));
        let _ = store.begin("k2");
        assert_eq!(store.len(), 2);

        std::thread::sleep(Duration::from_millis(20));
        store.sweep();
        assert!(store.is_empty());
    }
}
