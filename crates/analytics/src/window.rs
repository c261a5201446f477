use std::fmt;

use config::MAX_PAGE_SIZE;
use jiff::civil::Date;

/// Date range and page size of one analytics query. Both dates are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchWindow {
    pub from: Date,
    pub to: Date,
    pub page_size: u32,
}

impl FetchWindow {
    pub fn new(from: Date, to: Date, page_size: u32) -> Self {
        Self { from, to, page_size }
    }

    /// The page size sent to the provider, clamped into `1..=300`.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }

    pub(crate) fn query_pairs(&self) -> [(&'static str, String); 3] {
        [
            ("from", self.from.strftime("%Y-%m-%d").to_string()),
            ("to", self.to.strftime("%Y-%m-%d").to_string()),
            ("page_size", self.effective_page_size().to_string()),
        ]
    }
}

impl fmt::Display for FetchWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {} (page size {})", self.from, self.to, self.effective_page_size())
    }
}
