//! Processed-corpus cache keyed by content fingerprint.
//!
//! Entries expire after a fixed TTL. Concurrent misses for the same
//! fingerprint are coalesced: one caller computes, the rest block on a
//! condition variable and share the result. A failed computation is not
//! cached; waiting callers wake up and retry.

use crate::corpus::RawRecord;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};
use tagnet_core::dictionary::TagDictionary;
use tagnet_core::error::Result;
use tracing::{debug, trace};

/// Default time-to-live for cached entries (one hour).
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

/// SHA-256 content fingerprint of a dictionary and its input records.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fingerprint([u8; 32]);

impl Fingerprint {
    /// Fingerprint of the dictionary (version and content) plus the raw
    /// records, in order.
    pub fn of(dictionary: &TagDictionary, raw: &[RawRecord]) -> Result<Self> {
        let mut hasher = Sha256::new();
        hasher.update(dictionary.version().as_bytes());
        hasher.update([0u8]);
        hasher.update(serde_json::to_vec(dictionary)?);
        hasher.update([0u8]);
        for record in raw {
            hasher.update(serde_json::to_vec(record)?);
            hasher.update([b'\n']);
        }
        Ok(Self(hasher.finalize().into()))
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(Sha256::digest(bytes).into())
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// First 12 hex digits, for logs.
    pub fn short(&self) -> String {
        let mut s = self.to_string();
        s.truncate(12);
        s
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Fingerprint({})", self.short())
    }
}

enum Slot<V> {
    Pending,
    Ready { value: Arc<V>, stored_at: Instant },
}

enum Lookup<V> {
    Hit(Arc<V>),
    InFlight,
    Miss,
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    /// Callers that blocked on another caller's computation.
    pub coalesced: u64,
}

/// TTL cache with single-flight computation.
pub struct CorpusCache<V> {
    ttl: Duration,
    slots: Mutex<HashMap<Fingerprint, Slot<V>>>,
    ready: Condvar,
    hits: AtomicU64,
    misses: AtomicU64,
    coalesced: AtomicU64,
}

impl<V> CorpusCache<V> {
    /// A zero `ttl` never serves a stored value to a later call, but
    /// callers that arrive while a computation is in flight still share
    /// its result.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
            ready: Condvar::new(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            coalesced: AtomicU64::new(0),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, computing it if absent or
    /// expired. Only one caller computes a given key at a time.
    pub fn get_or_compute<E, F>(&self, key: &Fingerprint, compute: F) -> std::result::Result<Arc<V>, E>
    where
        F: FnOnce() -> std::result::Result<V, E>,
    {
        let mut slots = self.lock();
        let mut waited = false;
        loop {
            // A value produced while we waited is taken regardless of age.
            let lookup = match slots.get(key) {
                Some(Slot::Ready { value, stored_at }) if waited || stored_at.elapsed() < self.ttl => {
                    Lookup::Hit(Arc::clone(value))
                }
                Some(Slot::Pending) => Lookup::InFlight,
                _ => Lookup::Miss,
            };
            match lookup {
                Lookup::Hit(value) => {
                    self.hits.fetch_add(1, Ordering::Relaxed);
                    trace!(key = %key.short(), "corpus cache hit");
                    return Ok(value);
                }
                Lookup::InFlight => {
                    waited = true;
                    self.coalesced.fetch_add(1, Ordering::Relaxed);
                    debug!(key = %key.short(), "waiting on in-flight corpus computation");
                    slots = self
                        .ready
                        .wait_while(slots, |s| matches!(s.get(key), Some(Slot::Pending)))
                        .unwrap_or_else(PoisonError::into_inner);
                }
                Lookup::Miss => break,
            }
        }

        slots.insert(*key, Slot::Pending);
        self.misses.fetch_add(1, Ordering::Relaxed);
        drop(slots);
        debug!(key = %key.short(), "corpus cache miss");

        let guard = PendingGuard { cache: self, key: *key };
        let outcome = compute();
        std::mem::forget(guard);

        let mut slots = self.lock();
        let result = match outcome {
            Ok(value) => {
                let value = Arc::new(value);
                slots.insert(
                    *key,
                    Slot::Ready {
                        value: Arc::clone(&value),
                        stored_at: Instant::now(),
                    },
                );
                Ok(value)
            }
            Err(err) => {
                slots.remove(key);
                debug!(key = %key.short(), "corpus computation failed, not cached");
                Err(err)
            }
        };
        drop(slots);
        self.ready.notify_all();
        result
    }

    /// Cached value if present and fresh.
    pub fn get(&self, key: &Fingerprint) -> Option<Arc<V>> {
        match self.lock().get(key) {
            Some(Slot::Ready { value, stored_at }) if stored_at.elapsed() < self.ttl => {
                Some(Arc::clone(value))
            }
            _ => None,
        }
    }

    pub fn invalidate(&self, key: &Fingerprint) -> bool {
        let mut slots = self.lock();
        matches!(slots.get(key), Some(Slot::Ready { .. })) && slots.remove(key).is_some()
    }

    /// Drop expired entries; returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let ttl = self.ttl;
        let mut slots = self.lock();
        let before = slots.len();
        slots.retain(|_, slot| match slot {
            Slot::Ready { stored_at, .. } => stored_at.elapsed() < ttl,
            Slot::Pending => true,
        });
        before - slots.len()
    }

    /// Number of ready entries, expired or not.
    pub fn len(&self) -> usize {
        self.lock()
            .values()
            .filter(|s| matches!(s, Slot::Ready { .. }))
            .count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            coalesced: self.coalesced.load(Ordering::Relaxed),
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<Fingerprint, Slot<V>>> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<V> Default for CorpusCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

/// Clears a pending slot if the computation panics, so waiters retry
/// instead of blocking forever.
struct PendingGuard<'a, V> {
    cache: &'a CorpusCache<V>,
    key: Fingerprint,
}

impl<V> Drop for PendingGuard<'_, V> {
    fn drop(&mut self) {
        self.cache.lock().remove(&self.key);
        self.cache.ready.notify_all();
    }
}
