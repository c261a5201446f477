//! Configuration for the queue analytics client.

mod cache;
mod dynamic_string;
mod error;
mod fetch;
mod loader;
mod zoom;

use std::path::Path;

use serde::Deserialize;

pub use cache::CacheConfig;
pub use error::Error;
pub use fetch::{FetchConfig, MAX_PAGE_SIZE};
pub use zoom::ZoomConfig;

pub type Result<T> = std::result::Result<T, Error>;

/// Root of the TOML configuration file. Every section is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Provider endpoints and account credentials.
    #[serde(default)]
    pub zoom: ZoomConfig,
    /// Pagination, timeouts and pacing of analytics requests.
    #[serde(default)]
    pub fetch: FetchConfig,
    /// Lifetimes of the token and result caches.
    #[serde(default)]
    pub cache: CacheConfig,
}

impl Config {
    /// Reads, expands and validates the configuration at `path`.
    pub fn load<P: AsRef<Path>>(path: P) -> crate::Result<Config> {
        loader::load(path)
    }

    /// Parses configuration from a TOML string, with the same expansion and
    /// validation as [`Config::load`].
    pub fn from_toml(content: &str) -> crate::Result<Config> {
        loader::from_str(content)
    }
}
