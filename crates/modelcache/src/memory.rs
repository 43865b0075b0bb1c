use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::config::CacheConfig;
use crate::error::CacheContents;
use crate::keyed_lock::KeyedLock;
use crate::source::Source;
use crate::time::Instant;

/// An entry in the in-memory store.
#[derive(Debug)]
struct Entry<T> {
    value: Arc<T>,
    /// When this entry stops being served. `None` means it never expires.
    expires_at: Option<Instant>,
}

impl<T> Entry<T> {
    /// Whether the entry is past its deadline at `now`.
    ///
    /// This sits on the hot path of every lookup: no allocations, no side
    /// effects.
    fn is_expired(&self, now: Instant) -> bool {
        match self.expires_at {
            Some(deadline) => now > deadline,
            None => false,
        }
    }
}

/// An in-memory cache for models loaded through a [`Source`].
///
/// Transparently performs cache lookups and source fetches, deduplicating
/// concurrent fetches of the same identifier so that for any identifier at
/// most one source fetch is in flight at a time, system-wide. Identifiers
/// are independent: a fetch for one key never waits on a fetch for another.
///
/// Successful fetches are cached; failures are returned to the caller as-is
/// and nothing is stored, so a later fetch of the same identifier consults
/// the source again.
///
/// A `ModelCache` is safe to share across tasks behind an `Arc`.
pub struct ModelCache<S: Source> {
    config: CacheConfig,
    source: S,
    /// The store. Only ever written under the per-key lock of the entry
    /// being replaced or removed.
    items: Mutex<HashMap<String, Entry<S::Item>>>,
    key_locks: KeyedLock,
}

impl<S: Source> fmt::Debug for ModelCache<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let items = self.items.try_lock().map(|i| i.len()).unwrap_or_default();
        f.debug_struct("ModelCache")
            .field("name", &self.config.name)
            .field("items", &items)
            .field("in-flight fetches", &self.key_locks.in_flight())
            .finish()
    }
}

impl<S: Source> ModelCache<S> {
    /// Creates a cache with the default configuration: entries never expire
    /// and live until explicitly invalidated.
    pub fn new(source: S) -> Self {
        Self::with_config(CacheConfig::default(), source)
    }

    /// Creates a cache with the given configuration.
    pub fn with_config(config: CacheConfig, source: S) -> Self {
        Self {
            config,
            source,
            items: Mutex::new(HashMap::new()),
            key_locks: KeyedLock::default(),
        }
    }

    /// Returns a reference to the wrapped source.
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Fetches the model for `id`, serving it from memory when possible.
    ///
    /// Concurrent calls for the same `id` are coalesced: the first caller
    /// invokes the source while the others wait on the per-key lock, find
    /// the freshly stored value, and return it without touching the source.
    /// Once an identifier has a live entry, fetching it invokes the source
    /// zero times.
    ///
    /// Source failures surface here verbatim and are not cached; the next
    /// call for the same `id` will try the source again.
    pub async fn fetch(&self, id: &str) -> CacheContents<Arc<S::Item>> {
        let _guard = self.key_locks.acquire(id).await;

        if let Some(value) = self.lookup(id) {
            tracing::trace!(key = id, "Serving {} from memory", self.config.name);
            return Ok(value);
        }

        tracing::trace!(key = id, "Fetching {} from the source", self.config.name);
        let value = Arc::new(self.source.fetch(id).await?);
        self.insert(id, Arc::clone(&value));

        Ok(value)
    }

    /// Removes the entry for `id`, if any.
    ///
    /// Takes the same per-key lock as [`fetch`](Self::fetch), so an
    /// invalidation is strictly ordered relative to an in-flight fetch of
    /// the same identifier and cannot race the write of a fresh entry.
    /// Invalidating an absent identifier is a no-op.
    pub async fn invalidate(&self, id: &str) {
        let _guard = self.key_locks.acquire(id).await;

        if self.items.lock().unwrap().remove(id).is_some() {
            tracing::trace!(key = id, "Invalidated {} entry", self.config.name);
        }
    }

    /// The number of live entries in the store.
    ///
    /// Entries that have expired but have not been overwritten yet are not
    /// counted.
    pub fn entry_count(&self) -> usize {
        let now = Instant::now();
        self.items
            .lock()
            .unwrap()
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether a live entry exists for `id`.
    pub fn contains(&self, id: &str) -> bool {
        self.lookup(id).is_some()
    }

    fn lookup(&self, id: &str) -> Option<Arc<S::Item>> {
        let items = self.items.lock().unwrap();
        let entry = items.get(id)?;
        if entry.is_expired(Instant::now()) {
            // Eviction is lazy: the entry stays in the store until the next
            // successful fetch overwrites it.
            return None;
        }
        Some(Arc::clone(&entry.value))
    }

    fn insert(&self, id: &str, value: Arc<S::Item>) {
        let expires_at = self.config.ttl.map(|ttl| Instant::now() + ttl);
        let entry = Entry { value, expires_at };
        self.items.lock().unwrap().insert(id.to_owned(), entry);
    }
}
