use std::time::Duration;

use duration_str::deserialize_duration;
use serde::Deserialize;

/// Lifetimes of the in-memory token and result caches.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CacheConfig {
    /// How long an access token is reused. Kept below the provider's one hour
    /// lifetime so the token is refreshed before it is rejected.
    #[serde(deserialize_with = "deserialize_duration")]
    pub token_ttl: Duration,

    /// How long the raw records of a window are reused before the provider is
    /// queried again.
    #[serde(deserialize_with = "deserialize_duration")]
    pub result_ttl: Duration,

    /// Maximum number of entries per cache.
    pub max_entries: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            token_ttl: Duration::from_secs(55 * 60),
            result_ttl: Duration::from_secs(90),
            max_entries: 64,
        }
    }
}
