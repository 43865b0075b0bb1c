//! # Modelcache
//!
//! An in-memory, concurrency-safe cache that sits in front of a slow or
//! expensive model [`Source`]. This crate contains the coalescing cache
//! itself, the per-key locking that powers it, our central [`CacheError`]
//! type, and an explanation of how all this fits together and why it exists.
//!
//! ## What the cache guarantees
//!
//! Loading a model usually means a download or an expensive filesystem read,
//! so [`ModelCache`] makes two promises:
//!
//! - Once a fetch for an identifier has succeeded, every later fetch for the
//!   same identifier is served from memory, with zero calls to the source.
//! - Concurrent fetches for the same identifier that arrive before any
//!   cached value exists collapse into a single source invocation
//!   (request coalescing). Without this, a hot key that is not yet cached
//!   would trigger one expensive fetch per caller, the classic cache
//!   stampede.
//!
//! Fetches for *different* identifiers never wait on each other. The price
//! of coalescing is paid per key only: callers of one identifier queue up
//! behind the first fetch for that identifier, and nothing else.
//!
//! ## How a fetch proceeds
//!
//! A call to [`ModelCache::fetch`] goes through the following steps:
//! - Acquire the per-key lock for the identifier via [`KeyedLock`].
//! - Look the identifier up in the store. A live entry is returned as-is.
//! - On a miss, invoke the [`Source`] *while holding the per-key lock*.
//!   This suspension-under-lock is intentional: it is what keeps a second
//!   fetch for the same key from starting.
//! - A successful result is stored and returned; a failure is propagated to
//!   the caller verbatim and nothing is stored, so the next fetch retries
//!   the source. Errors are never cached.
//!
//! [`ModelCache::invalidate`] takes the same per-key lock, which strictly
//! orders it against any in-flight fetch of that key.
//!
//! ## [`CacheContents`] / [`CacheError`]
//!
//! The cache primarily deals with [`CacheContents`], which is just an alias
//! for a [`Result`] around a [`CacheError`].
//!
//! [`CacheError`] encodes opaque failures reported by a source, most
//! importantly [`CacheError::NotFound`]. The cache itself neither produces
//! nor inspects these; whatever the source returns surfaces at the `fetch`
//! caller unchanged.
//!
//! ## Expiration
//!
//! Entries carry an optional deadline. By default there is none and entries
//! live until explicitly invalidated; a deadline is only attached when a
//! [`CacheConfig`] sets a TTL. Expired entries are evicted lazily: a lookup
//! never returns one, and the next successful fetch overwrites it in place.
//! There is no background purging.

mod config;
mod error;
mod keyed_lock;
mod memory;
mod source;

pub use config::CacheConfig;
pub use error::{CacheContents, CacheError};
pub use keyed_lock::{KeyGuard, KeyedLock};
pub use memory::ModelCache;
pub use source::Source;



// Tests run on tokio's virtual clock so that expiration can be exercised
// without real sleeps.
#[cfg(any(test, feature = "test"))]
pub(crate) use tokio::time;

#[cfg(not(any(test, feature = "test")))]
pub(crate) use std::time;
