//! Time-bounded plan cache with single-flight computation.

use std::collections::HashMap;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::{Duration, Instant};

use tracing::debug;

use crate::model::{PlanQuery, Reservation};

/// A plan request together with the data it was computed from.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub query: PlanQuery,
    pub snapshot: u64,
}

impl CacheKey {
    pub fn new(query: &PlanQuery, reservations: &[Reservation]) -> Self {
        Self {
            query: query.clone(),
            snapshot: fingerprint(reservations),
        }
    }
}

/// Order-sensitive hash of a reservation snapshot.
pub fn fingerprint(reservations: &[Reservation]) -> u64 {
    let mut hasher = DefaultHasher::new();
    reservations.hash(&mut hasher);
    hasher.finish()
}

#[derive(Debug)]
struct Entry<V> {
    created: Instant,
    value: Arc<OnceLock<Arc<V>>>,
}

/// Values live for `ttl` after the first request for their key. Concurrent
/// requests for a key share one computation.
#[derive(Debug)]
pub struct PlanCache<V> {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, Entry<V>>>,
}

impl<V> PlanCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the live value for `key`, computing it at most once.
    pub fn get_or_compute<F>(&self, key: CacheKey, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        let cell = {
            let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.created.elapsed() < ttl);
            let entry = entries.entry(key).or_insert_with(|| Entry {
                created: Instant::now(),
                value: Arc::new(OnceLock::new()),
            });
            Arc::clone(&entry.value)
        };

        if let Some(value) = cell.get() {
            debug!("plan cache hit");
            return Arc::clone(value);
        }
        Arc::clone(cell.get_or_init(|| Arc::new(compute())))
    }

    pub fn invalidate(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Number of entries, expired ones included until the next lookup.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
