//! Mapping of raw analytics records onto [`QueueMetric`] rows.
//!
//! Field names differ between accounts and API versions. Each logical field
//! has an ordered list of keys that have been seen for it; the first key that
//! is present with a non-null value wins. The order encodes which name is
//! preferred when several are present, so do not reorder these lists.

use serde_json::Value;

use crate::{
    metric::{QueueMetric, UNKNOWN_QUEUE},
    record::RawRecord,
};

pub const QUEUE_ID_KEYS: [&str; 3] = ["queue_id", "call_queue_id", "id"];

pub const QUEUE_NAME_KEYS: [&str; 2] = ["queue_name", "name"];

/// Consulted only when [`QUEUE_NAME_KEYS`] yield nothing or a blank name.
pub const QUEUE_NAME_FALLBACK_KEYS: [&str; 1] = ["call_queue_name"];

pub const HANDLE_TIME_KEYS: [&str; 3] = ["avg_handle_time", "average_handle_time", "avg_handle_time_seconds"];

/// Normalizes `records`, keeping their order. Records without a numeric
/// average handle time are left out; nothing else is ever rejected.
pub fn normalize(records: &[RawRecord]) -> Vec<QueueMetric> {
    let metrics: Vec<_> = records.iter().filter_map(normalize_record).collect();

    let dropped = records.len() - metrics.len();

    if dropped > 0 {
        log::debug!(
            "Dropped {dropped} of {} analytics records without a numeric average handle time",
            records.len()
        );
    }

    metrics
}

/// Normalizes one record, or returns `None` when its handle time cannot be
/// resolved to a number.
pub fn normalize_record(record: &RawRecord) -> Option<QueueMetric> {
    let avg_handle_time_seconds = pick_first(record, &HANDLE_TIME_KEYS).and_then(parse_seconds)?;

    Some(QueueMetric {
        queue_id: pick_first(record, &QUEUE_ID_KEYS).and_then(as_text),
        queue_name: queue_name(record),
        avg_handle_time_seconds,
    })
}

/// The value of the first key present in `record` with a non-null value.
pub fn pick_first<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter().find_map(|key| record.get(*key).filter(|value| !value.is_null()))
}

/// Coerces a handle time to seconds. Anything that does not read as a number
/// yields `None`, NaN and infinities included.
pub fn parse_seconds(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    };

    seconds.filter(|seconds| seconds.is_finite())
}

fn queue_name(record: &RawRecord) -> String {
    let non_blank = |value: &Value| as_text(value).filter(|name| !name.trim().is_empty());

    pick_first(record, &QUEUE_NAME_KEYS)
        .and_then(non_blank)
        .or_else(|| pick_first(record, &QUEUE_NAME_FALLBACK_KEYS).and_then(non_blank))
        .unwrap_or_else(|| UNKNOWN_QUEUE.to_string())
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::{normalize, parse_seconds};
    use crate::record::RawRecord;

    fn records(value: Value) -> Vec<RawRecord> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn string_handle_time_is_coerced() {
        let metrics = normalize(&records(json!([{ "queue_id": "9", "avg_handle_time": "125" }])));

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].avg_handle_time_seconds, 125.0);
    }

    #[test]
    fn mixed_tenant_shapes() {
        let metrics = normalize(&records(json!([
            { "queue_id": "1", "queue_name": "Sales", "avg_handle_time": 300 },
            { "id": "2", "name": "Support", "average_handle_time": 150 },
            { "queue_id": "3", "avg_handle_time": "bad" },
            { "call_queue_id": 4, "call_queue_name": "Billing", "avg_handle_time_seconds": 42.5 },
            { "queue_name": "No time" },
        ])));

        insta::assert_json_snapshot!(metrics, @r#"
        [
          {
            "queue_id": "1",
            "queue_name": "Sales",
            "avg_handle_time_seconds": 300.0
          },
          {
            "queue_id": "2",
            "queue_name": "Support",
            "avg_handle_time_seconds": 150.0
          },
          {
            "queue_id": "4",
            "queue_name": "Billing",
            "avg_handle_time_seconds": 42.5
          }
        ]
        "#);
    }

    #[test]
    fn alias_priority() {
        let metrics = normalize(&records(json!([{
            "id": "low",
            "call_queue_id": "mid",
            "queue_id": "high",
            "name": "second",
            "queue_name": "first",
            "avg_handle_time_seconds": 1,
            "average_handle_time": 2,
            "avg_handle_time": 3,
        }])));

        assert_eq!(metrics[0].queue_id.as_deref(), Some("high"));
        assert_eq!(metrics[0].queue_name, "first");
        assert_eq!(metrics[0].avg_handle_time_seconds, 3.0);
    }

    #[test]
    fn null_values_count_as_absent() {
        let metrics = normalize(&records(json!([{
            "queue_id": null,
            "id": "fallback-id",
            "avg_handle_time": null,
            "average_handle_time": 60,
        }])));

        assert_eq!(metrics[0].queue_id.as_deref(), Some("fallback-id"));
        assert_eq!(metrics[0].avg_handle_time_seconds, 60.0);
    }

    #[test]
    fn present_but_unparseable_handle_time_is_not_skipped_over() {
        let metrics = normalize(&records(json!([{ "avg_handle_time": "n/a", "average_handle_time": 60 }])));
        assert!(metrics.is_empty());
    }

    #[test]
    fn queue_name_fallbacks() {
        let metrics = normalize(&records(json!([
            { "queue_name": "", "name": "ignored", "call_queue_name": "From call queue", "avg_handle_time": 1 },
            { "name": "   ", "avg_handle_time": 1 },
            { "avg_handle_time": 1 },
            { "name": 1234, "avg_handle_time": 1 },
        ])));

        let names: Vec<_> = metrics.iter().map(|m| m.queue_name.as_str()).collect();
        assert_eq!(names, ["From call queue", "Unknown Queue", "Unknown Queue", "1234"]);
        assert!(metrics.iter().all(|m| m.queue_id.is_none()));
    }

    #[test]
    fn numeric_ids_become_text() {
        let metrics = normalize(&records(json!([{ "queue_id": 77, "avg_handle_time": 1 }])));
        assert_eq!(metrics[0].queue_id.as_deref(), Some("77"));
    }

    #[test]
    fn order_is_preserved() {
        let metrics = normalize(&records(json!([
            { "queue_name": "c", "avg_handle_time": 3 },
            { "queue_name": "a", "avg_handle_time": 1 },
            { "queue_name": "b", "avg_handle_time": 2 },
        ])));

        let names: Vec<_> = metrics.iter().map(|m| m.queue_name.as_str()).collect();
        assert_eq!(names, ["c", "a", "b"]);
    }

    #[test]
    fn normalizing_twice_is_stable() {
        let first = normalize(&records(json!([
            { "call_queue_id": "1", "name": "Sales", "average_handle_time": "300" },
            { "call_queue_name": "Anonymous", "avg_handle_time_seconds": 12.25 },
        ])));

        let reshaped = records(serde_json::to_value(&first).unwrap());
        let second = normalize(&reshaped);

        assert_eq!(first, second);
    }

    #[test]
    fn seconds_coercion() {
        assert_eq!(parse_seconds(&json!(12)), Some(12.0));
        assert_eq!(parse_seconds(&json!(" 12.5 ")), Some(12.5));
        assert_eq!(parse_seconds(&json!("1e3")), Some(1000.0));
        assert_eq!(parse_seconds(&json!(true)), Some(1.0));
        assert_eq!(parse_seconds(&json!("NaN")), None);
        assert_eq!(parse_seconds(&json!("inf")), None);
        assert_eq!(parse_seconds(&json!("-inf")), None);
        assert_eq!(parse_seconds(&json!("1e999")), None);
        assert_eq!(parse_seconds(&json!("")), None);
        assert_eq!(parse_seconds(&json!([1])), None);
        assert_eq!(parse_seconds(&json!({ "value": 1 })), None);
    }

    #[test]
    fn infinite_handle_times_are_dropped() {
        let metrics = normalize(&records(json!([
            { "queue_id": "1", "avg_handle_time": "inf" },
            { "queue_id": "2", "avg_handle_time": "1e999" },
            { "queue_id": "3", "avg_handle_time": 60 },
        ])));

        assert_eq!(metrics.len(), 1);
        assert_eq!(metrics[0].queue_id.as_deref(), Some("3"));

        let json = serde_json::to_string(&metrics).unwrap();
        assert!(!json.contains("null"));
    }
}
