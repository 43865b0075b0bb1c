use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::OwnedMutexGuard;

/// A lock handle as registered in the table.
type Handle = Arc<tokio::sync::Mutex<()>>;

/// Scoped mutual exclusion keyed by identifier.
///
/// Acquisitions of the same key are strictly serialized while acquisitions
/// of different keys proceed independently. Handles are materialized lazily
/// on first acquisition and retired again when their holder releases, so the
/// table only ever contains keys that currently have a holder or waiters.
/// Its size is bounded by in-flight acquisitions, not by the key space.
#[derive(Debug, Default)]
pub struct KeyedLock {
    table: Mutex<HashMap<String, Handle>>,
}

impl KeyedLock {
    /// Acquires exclusive access to `key`, waiting for the current holder
    /// if there is one.
    ///
    /// The returned guard releases the key when dropped. Waiting on one key
    /// never blocks acquisition of a different key.
    ///
    /// This is cancel-safe: dropping the future while it waits leaves no
    /// residue. At worst an unlocked handle stays registered, and the next
    /// acquirer simply adopts it.
    pub async fn acquire<'a>(&'a self, key: &'a str) -> KeyGuard<'a> {
        loop {
            let handle = {
                let mut table = self.table.lock().unwrap();
                Arc::clone(table.entry(key.to_owned()).or_default())
            };

            let inner = Arc::clone(&handle).lock_owned().await;

            // A holder retires its handle on release. If the handle we just
            // locked is no longer the one registered for the key, we raced
            // that release and have to try again for a fresh handle.
            let registered = {
                let table = self.table.lock().unwrap();
                table
                    .get(key)
                    .is_some_and(|current| Arc::ptr_eq(current, &handle))
            };

            if registered {
                return KeyGuard {
                    owner: self,
                    key,
                    _inner: inner,
                };
            }
        }
    }

    /// The number of keys currently locked or waited on.
    pub fn in_flight(&self) -> usize {
        self.table.lock().unwrap().len()
    }
}

/// Exclusive access to a single key, released on drop.
#[must_use = "the key is released immediately if the guard is not held"]
#[derive(Debug)]
pub struct KeyGuard<'a> {
    owner: &'a KeyedLock,
    key: &'a str,
    _inner: OwnedMutexGuard<()>,
}

impl Drop for KeyGuard<'_> {
    fn drop(&mut self) {
        // Retire the handle *before* unlocking (`_inner` drops after this
        // body runs). Waiters still parked on it will find the table entry
        // gone and race for a fresh handle instead of reusing this one.
        self.owner.table.lock().unwrap().remove(self.key);
    }
}
