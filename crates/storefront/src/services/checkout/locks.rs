//! Per-session order submit locks.
//!
//! Prevents a double-clicked checkout button (or two tabs) from submitting
//! the same session's cart twice concurrently. Locks expire on a TTL so an
//! abandoned request cannot wedge a session, and a periodic sweep clears
//! whatever release missed.
//!
//! Single-process and best-effort, like the idempotency store. Multiple
//! server instances need a shared lock (Redis) instead.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// TTL map of held locks, keyed by session ID.
#[derive(Clone)]
pub struct OrderLocks {
    held: Arc<Mutex<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl OrderLocks {
    /// Create a lock table with the given hold TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            held: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Try to take the lock for a session. Returns `false` while another
    /// checkout for the same session holds it.
    #[must_use]
    pub fn try_acquire(&self, session_id: &str) -> bool {
        let now = Instant::now();
        let mut held = self.lock();

        match held.get(session_id) {
            Some(expires_at) if *expires_at > now => false,
            _ => {
                held.insert(session_id.to_string(), now + self.ttl);
                true
            }
        }
    }

    /// Release the lock for a session.
    pub fn release(&self, session_id: &str) {
        self.lock().remove(session_id);
    }

    /// Evict expired locks. Called by the periodic sweeper.
    pub fn sweep(&self) {
        let now = Instant::now();
        self.lock().retain(|_, expires_at| *expires_at > now);
    }

    /// Number of currently held locks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no locks are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, Instant>> {
        self.held.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
