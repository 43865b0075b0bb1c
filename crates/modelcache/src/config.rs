use std::time::Duration;

use serde::Deserialize;

/// Configuration for a [`ModelCache`](crate::ModelCache).
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache identifier used in log events.
    pub name: String,

    /// Time-to-live for cached entries, e.g. `15m` or `2h`.
    ///
    /// Entries older than this are skipped on lookup and replaced by the
    /// next successful fetch. When unset, entries never expire and live
    /// until explicitly invalidated. This is the default.
    #[serde(with = "humantime_serde")]
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        CacheConfig {
            name: "models".to_owned(),
            ttl: None,
        }
    }
}
