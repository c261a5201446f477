//! Settings for paginated analytics retrieval.

use std::time::Duration;

use duration_str::deserialize_duration;
use serde::Deserialize;

/// Largest page size the analytics endpoint accepts.
pub const MAX_PAGE_SIZE: u32 = 300;

/// Pagination, timeouts and pacing of analytics requests.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FetchConfig {
    /// Records requested per page. Values above [`MAX_PAGE_SIZE`] are clamped.
    pub page_size: u32,

    /// Upper bound for the OAuth token exchange.
    #[serde(deserialize_with = "deserialize_duration")]
    pub token_timeout: Duration,

    /// Upper bound for each analytics page request.
    #[serde(deserialize_with = "deserialize_duration")]
    pub page_timeout: Duration,

    /// Fixed pause between two page requests.
    #[serde(deserialize_with = "deserialize_duration")]
    pub page_delay: Duration,

    /// Hard cap on the number of pages fetched for one window. Unbounded when unset.
    pub max_pages: Option<usize>,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            page_size: 100,
            token_timeout: Duration::from_secs(20),
            page_timeout: Duration::from_secs(30),
            page_delay: Duration::from_millis(200),
            max_pages: None,
        }
    }
}
