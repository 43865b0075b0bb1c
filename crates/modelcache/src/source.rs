use futures::future::BoxFuture;

use crate::CacheContents;

/// An abstraction over the process of fetching and loading a model.
///
/// Implementations retrieve models from wherever they actually live: a
/// directory on disk, an object store bucket, a registry behind HTTP. The
/// cache treats a source as an opaque capability: it invokes
/// [`fetch`](Self::fetch) at most once per cache miss and stores whatever
/// comes back, placing no constraints on the source's latency or
/// idempotence.
///
/// Cancellation follows the usual async contract: dropping the returned
/// future abandons the fetch. Callers that need a deadline wrap the call in
/// `tokio::time::timeout` themselves, the cache adds no timeout of its own.
pub trait Source: Send + Sync {
    /// The resource type this source produces.
    type Item: Send + Sync + 'static;

    /// Retrieves the model for the given identifier.
    fn fetch<'a>(&'a self, id: &'a str) -> BoxFuture<'a, CacheContents<Self::Item>>;
}
