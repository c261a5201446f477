//! Call queue analytics from the Zoom Phone API.
//!
//! [`Orchestrator::run`] is the entry point: it obtains an access token through
//! the [`TokenCache`], walks every page of `/phone/call_queue_analytics` with the
//! [`PageFetcher`], and maps the raw records onto [`QueueMetric`] rows with
//! [`normalize`]. The [`report`] module holds the filtering and ranking applied
//! to those rows before display.

mod cache;
mod clock;
mod credentials;
mod error;
mod metric;
pub mod normalize;
mod orchestrator;
mod pages;
pub mod record;
pub mod report;
mod token;
pub mod transport;
mod window;

#[cfg(test)]
mod testing;

pub use clock::{Clock, SystemClock};
pub use credentials::Credentials;
pub use error::{AuthError, Error, Result};
pub use metric::{QueueMetric, UNKNOWN_QUEUE};
pub use normalize::normalize;
pub use orchestrator::{Orchestrator, QueryReport};
pub use pages::PageFetcher;
pub use record::RawRecord;
pub use token::{Token, TokenCache};
pub use transport::{HttpTransport, ReqwestTransport};
pub use window::FetchWindow;
