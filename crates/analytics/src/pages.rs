//! Cursor-paginated retrieval of call queue analytics.

use std::{sync::Arc, time::Duration};

use http::{Method, header::AUTHORIZATION};
use url::Url;

use crate::{
    error::{Error, Result},
    record::{NEXT_PAGE_TOKEN, Page, RawRecord},
    token::Token,
    transport::{HttpRequest, HttpTransport, TransportError},
    window::FetchWindow,
};

/// Fetches every page of call queue analytics for a window, strictly one page
/// after the other, pausing for a fixed delay between pages.
pub struct PageFetcher {
    transport: Arc<dyn HttpTransport>,
    url: Url,
    timeout: Duration,
    delay: Duration,
    max_pages: Option<usize>,
}

impl PageFetcher {
    pub fn new(transport: Arc<dyn HttpTransport>, config: &config::Config) -> Self {
        Self {
            transport,
            url: analytics_url(&config.zoom.api_url),
            timeout: config.fetch.page_timeout,
            delay: config.fetch.page_delay,
            max_pages: config.fetch.max_pages,
        }
    }

    /// Returns the records of all pages, in the order the provider sent them.
    ///
    /// Pagination ends when a page carries no next page token. Any failed page
    /// aborts the whole fetch; records of earlier pages are discarded.
    pub async fn fetch_all_pages(&self, token: &Token, window: &FetchWindow) -> Result<Vec<RawRecord>> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0;

        loop {
            let page = self.fetch_page(token, window, cursor.as_deref()).await?;
            pages += 1;

            log::debug!(
                "Fetched analytics page {pages} for {window} with {} records",
                page.records.len()
            );

            records.extend(page.records);

            let Some(next) = page.next_page_token else {
                break;
            };

            if let Some(max_pages) = self.max_pages.filter(|max| pages >= *max) {
                log::error!("Giving up on {window}: still receiving next page tokens after {max_pages} pages");
                return Err(Error::PageLimitExceeded { max_pages });
            }

            cursor = Some(next);
            tokio::time::sleep(self.delay).await;
        }

        log::debug!("Fetched {} analytics records in {pages} pages", records.len());

        Ok(records)
    }

    async fn fetch_page(&self, token: &Token, window: &FetchWindow, cursor: Option<&str>) -> Result<Page> {
        let mut request =
            HttpRequest::new(Method::GET, self.url.clone(), self.timeout).header(AUTHORIZATION, token.authorization());

        for (key, value) in window.query_pairs() {
            request = request.query(key, value);
        }

        if let Some(cursor) = cursor {
            request = request.query(NEXT_PAGE_TOKEN, cursor);
        }

        let response = self.transport.send(request).await.map_err(|e| match e {
            TransportError::Timeout => {
                log::error!("Analytics request timed out after {:?}", self.timeout);
                Error::Timeout {
                    url: self.url.to_string(),
                }
            }
            TransportError::Connection(message) => {
                log::error!("Failed to send analytics request: {message}");
                Error::Connection(message)
            }
        })?;

        if !response.is_success() {
            let body = response.text();
            log::error!("Zoom analytics API error ({}): {body}", response.status);

            return Err(Error::Api {
                status: response.status.as_u16(),
                body,
            });
        }

        Page::parse(&response.body).inspect_err(|e| log::error!("Failed to parse analytics page: {e}"))
    }
}

/// `<api_url>/phone/call_queue_analytics`, keeping any path prefix such as `/v2`.
fn analytics_url(api_url: &Url) -> Url {
    let mut url = api_url.clone();

    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().extend(["phone", "call_queue_analytics"]);
    }

    url
}
