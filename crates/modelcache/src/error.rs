use std::time::Duration;

use thiserror::Error;

/// An error that happens when fetching a model from a source.
///
/// Failures reported by a [`Source`](crate::Source) are surfaced through
/// [`ModelCache::fetch`](crate::ModelCache::fetch) verbatim: the cache does
/// not classify, retry, or store them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CacheError {
    /// The model was not found at the source.
    #[error("not found")]
    NotFound,
    /// The model could not be fetched from the source due to missing
    /// permissions.
    ///
    /// The attached string contains the source's response.
    #[error("permission denied: {0}")]
    PermissionDenied(String),
    /// The model could not be fetched from the source due to a timeout.
    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
    /// The model could not be fetched due to another problem on the source
    /// side, like connection loss, DNS resolution, or a 5xx server response.
    ///
    /// The attached string contains the source's response.
    #[error("fetch failed: {0}")]
    Source(String),
    /// The model was fetched successfully, but is invalid in some way.
    #[error("malformed: {0}")]
    Malformed(String),
    /// An unexpected error in the cache or a source implementation.
    #[error("internal error")]
    InternalError,
}

impl From<std::io::Error> for CacheError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::from_std_error(err)
    }
}

impl CacheError {
    /// Logs `e` and turns it into an opaque [`InternalError`](Self::InternalError).
    #[track_caller]
    pub fn from_std_error<E: std::error::Error + 'static>(e: E) -> Self {
        let dynerr: &dyn std::error::Error = &e; // tracing expects a `&dyn Error`
        tracing::error!(error = dynerr);
        Self::InternalError
    }
}

/// The result of fetching a model, containing either `Ok(T)` or an error
/// denoting the reason why the model could not be fetched.
pub type CacheContents<T = ()> = Result<T, CacheError>;
