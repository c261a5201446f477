use std::{sync::Arc, time::Duration};

use crate::{
    cache::ExpiringCache,
    clock::{Clock, SystemClock, deadline},
    credentials::Credentials,
    error::{Error, Result},
    metric::QueueMetric,
    normalize::normalize,
    pages::PageFetcher,
    record::RawRecord,
    token::{TokenCache, TokenIdentity},
    transport::{HttpTransport, ReqwestTransport},
    window::FetchWindow,
};

/// Outcome of one query: the raw records as fetched, and the rows that
/// survived normalization.
#[derive(Debug, Clone)]
pub struct QueryReport {
    pub records: Arc<Vec<RawRecord>>,
    pub metrics: Vec<QueueMetric>,
}

impl QueryReport {
    /// The first raw record, useful to inspect which field names a tenant uses.
    pub fn sample(&self) -> Option<&RawRecord> {
        self.records.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ResultKey {
    token: TokenIdentity,
    window: FetchWindow,
}

/// Fetches metrics for a window: token, then every page, then normalization.
///
/// Raw records are kept for a short while per token and window, so repeated
/// queries for the same window do not reach the provider again.
pub struct Orchestrator {
    tokens: TokenCache,
    pages: PageFetcher,
    results: ExpiringCache<ResultKey, Arc<Vec<RawRecord>>>,
    result_ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl Orchestrator {
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>, config: &config::Config) -> Self {
        Self {
            tokens: TokenCache::new(transport.clone(), clock.clone(), config),
            pages: PageFetcher::new(transport, config),
            results: ExpiringCache::new(config.cache.max_entries, clock.clone()),
            result_ttl: config.cache.result_ttl,
            clock,
        }
    }

    /// An orchestrator talking to the network over `reqwest`, on wall-clock time.
    pub fn from_config(config: &config::Config) -> Result<Self> {
        let transport = ReqwestTransport::new().map_err(|e| Error::Connection(e.to_string()))?;

        Ok(Self::new(Arc::new(transport), Arc::new(SystemClock), config))
    }

    pub fn tokens(&self) -> &TokenCache {
        &self.tokens
    }

    /// Metrics for `window`. Failures of any step are returned as they are.
    pub async fn run(&self, credentials: &Credentials, window: &FetchWindow) -> Result<Vec<QueueMetric>> {
        Ok(self.query(credentials, window).await?.metrics)
    }

    /// Like [`Orchestrator::run`], also returning the raw records.
    pub async fn query(&self, credentials: &Credentials, window: &FetchWindow) -> Result<QueryReport> {
        let token = self.tokens.get_token(credentials).await?;

        let key = ResultKey {
            token: token.identity(),
            window: *window,
        };

        let records = match self.results.get(&key) {
            Some(records) => {
                log::debug!("Reusing {} cached analytics records for {window}", records.len());
                records
            }
            None => {
                let records = Arc::new(self.pages.fetch_all_pages(&token, window).await?);

                self.results
                    .insert(key, records.clone(), deadline(self.clock.now(), self.result_ttl));

                records
            }
        };

        let metrics = normalize(&records);

        log::info!(
            "Retrieved {} analytics records for {window}, {} with an average handle time",
            records.len(),
            metrics.len()
        );

        Ok(QueryReport { records, metrics })
    }
}
