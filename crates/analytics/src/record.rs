//! Raw analytics records and the shape of one page of them.

use serde_json::{Map, Value};

use crate::error::{Error, Result};

/// An analytics record exactly as the provider returned it.
pub type RawRecord = Map<String, Value>;

/// Keys that have carried the record list, highest priority first.
pub const RECORD_LIST_KEYS: [&str; 4] = ["analytics", "queues", "list", "call_queues"];

/// Key of the pagination cursor.
pub const NEXT_PAGE_TOKEN: &str = "next_page_token";

#[derive(Debug)]
pub(crate) struct Page {
    pub records: Vec<RawRecord>,
    pub next_page_token: Option<String>,
}

impl Page {
    pub fn parse(body: &[u8]) -> Result<Page> {
        let value: Value = serde_json::from_slice(body).map_err(|e| Error::MalformedResponse(e.to_string()))?;

        let Value::Object(mut body) = value else {
            return Err(Error::MalformedResponse("expected a JSON object".to_string()));
        };

        let key = RECORD_LIST_KEYS
            .iter()
            .find(|key| body.get(**key).and_then(Value::as_array).is_some_and(|list| !list.is_empty()));

        let records = match key.and_then(|key| body.remove(*key)) {
            Some(Value::Array(items)) => {
                let total = items.len();

                let records: Vec<_> = items
                    .into_iter()
                    .filter_map(|item| match item {
                        Value::Object(record) => Some(record),
                        _ => None,
                    })
                    .collect();

                if records.len() < total {
                    log::debug!("Skipped {} analytics list entries that are not objects", total - records.len());
                }

                records
            }
            _ => Vec::new(),
        };

        let next_page_token = match body.remove(NEXT_PAGE_TOKEN) {
            None | Some(Value::Null) | Some(Value::Bool(false)) => None,
            Some(Value::String(token)) => Some(token).filter(|token| !token.is_empty()),
            Some(Value::Number(token)) => Some(token.to_string()),
            Some(other) => {
                return Err(Error::MalformedResponse(format!(
                    "{NEXT_PAGE_TOKEN} must be a string, got {other}"
                )));
            }
        };

        Ok(Page {
            records,
            next_page_token,
        })
    }
}
