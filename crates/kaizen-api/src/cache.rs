//! A small in-process cache whose entries expire after a fixed TTL.
//!
//! Expired entries are not evicted: they stay readable through
//! [`TtlCache::get_stale`] so a handler can serve the last good value when a
//! fresh computation fails.

use std::{
  collections::HashMap,
  hash::Hash,
  sync::{Mutex, MutexGuard, PoisonError},
  time::{Duration, Instant},
};

struct Entry<V> {
  value:      V,
  expires_at: Instant,
}

pub struct TtlCache<K, V> {
  ttl:     Duration,
  entries: Mutex<HashMap<K, Entry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
  K: Eq + Hash,
  V: Clone,
{
  pub fn new(ttl: Duration) -> Self {
    Self { ttl, entries: Mutex::new(HashMap::new()) }
  }

  pub fn ttl(&self) -> Duration { self.ttl }

  /// The cached value for `key`, if present and not yet expired.
  pub fn get(&self, key: &K) -> Option<V> {
    let now = Instant::now();
    self
      .lock()
      .get(key)
      .filter(|entry| now < entry.expires_at)
      .map(|entry| entry.value.clone())
  }

  /// The last value stored for `key`, expired or not.
  pub fn get_stale(&self, key: &K) -> Option<V> {
    self.lock().get(key).map(|entry| entry.value.clone())
  }

  /// Store `value`, replacing any previous entry and restarting its TTL.
  pub fn insert(&self, key: K, value: V) {
    let expires_at = Instant::now() + self.ttl;
    self.lock().insert(key, Entry { value, expires_at });
  }

  // A panic while holding the lock cannot leave a half-written entry, so a
  // poisoned map is still usable.
  fn lock(&self) -> MutexGuard<'_, HashMap<K, Entry<V>>> {
    self.entries.lock().unwrap_or_else(PoisonError::into_inner)
  }
}
