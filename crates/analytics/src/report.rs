//! Queue selection and aggregation over normalized rows, as shown by the
//! front-end: a keyword-filtered queue list, per-queue averages ranked by
//! handle time, and the detail rows behind them.

use std::cmp::Ordering;

use serde::Serialize;

use crate::metric::{QueueMetric, round_to_hundredths};

/// Number of queues charted when the caller does not ask for another count.
pub const DEFAULT_TOP_N: usize = 10;

/// A selectable queue, identified by its id and name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueueChoice {
    pub queue_id: Option<String>,
    pub queue_name: String,
    /// `name (id)`, or just the name when the queue has no id.
    pub label: String,
}

impl QueueChoice {
    fn matches(&self, metric: &QueueMetric) -> bool {
        self.queue_id == metric.queue_id && self.queue_name == metric.queue_name
    }
}

/// Mean handle time of all rows sharing a queue id and name.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueAggregate {
    pub queue_id: Option<String>,
    pub queue_name: String,
    pub avg_handle_time_minutes: f64,
    pub rows: usize,
}

/// Distinct queues, sorted by name then id. Queues without an id sort last.
pub fn queue_choices(metrics: &[QueueMetric]) -> Vec<QueueChoice> {
    let mut pairs: Vec<(&str, Option<&str>)> = metrics
        .iter()
        .map(|m| (m.queue_name.as_str(), m.queue_id.as_deref()))
        .collect();

    pairs.sort_by(|a, b| a.0.cmp(b.0).then_with(|| compare_ids(a.1, b.1)));
    pairs.dedup();

    pairs
        .into_iter()
        .map(|(name, id)| QueueChoice {
            queue_id: id.map(str::to_string),
            queue_name: name.to_string(),
            label: match id {
                Some(id) => format!("{name} ({id})"),
                None => name.to_string(),
            },
        })
        .collect()
}

fn compare_ids(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Choices whose label contains every whitespace-separated keyword,
/// ignoring case. Blank keywords keep every choice.
pub fn filter_choices<'a>(choices: &'a [QueueChoice], keywords: &str) -> Vec<&'a QueueChoice> {
    let tokens: Vec<String> = keywords.split_whitespace().map(str::to_lowercase).collect();

    choices
        .iter()
        .filter(|choice| {
            let label = choice.label.to_lowercase();
            tokens.iter().all(|token| label.contains(token.as_str()))
        })
        .collect()
}

/// Rows belonging to one of the selected queues, in their original order.
pub fn select<'a>(metrics: &'a [QueueMetric], selected: &[&QueueChoice]) -> Vec<&'a QueueMetric> {
    metrics
        .iter()
        .filter(|metric| selected.iter().any(|choice| choice.matches(metric)))
        .collect()
}

/// Per-queue mean of the rounded minutes, highest first. Queues with equal
/// means keep the order in which they first appear.
pub fn aggregate(rows: &[&QueueMetric]) -> Vec<QueueAggregate> {
    let mut groups: Vec<(QueueAggregate, f64)> = Vec::new();

    for row in rows {
        let existing = groups
            .iter_mut()
            .find(|(group, _)| group.queue_id == row.queue_id && group.queue_name == row.queue_name);

        match existing {
            Some((group, sum)) => {
                group.rows += 1;
                *sum += row.minutes();
            }
            None => groups.push((
                QueueAggregate {
                    queue_id: row.queue_id.clone(),
                    queue_name: row.queue_name.clone(),
                    avg_handle_time_minutes: 0.0,
                    rows: 1,
                },
                row.minutes(),
            )),
        }
    }

    let mut aggregates: Vec<_> = groups
        .into_iter()
        .map(|(mut group, sum)| {
            group.avg_handle_time_minutes = sum / group.rows as f64;
            group
        })
        .collect();

    aggregates.sort_by(|a, b| b.avg_handle_time_minutes.total_cmp(&a.avg_handle_time_minutes));

    aggregates
}

/// The first `n` aggregates; at least one is kept when any exist.
pub fn top_n(aggregates: &[QueueAggregate], n: usize) -> &[QueueAggregate] {
    &aggregates[..n.max(1).min(aggregates.len())]
}

/// Rows ordered by handle time, longest first.
pub fn details<'a>(rows: &[&'a QueueMetric]) -> Vec<&'a QueueMetric> {
    let mut rows = rows.to_vec();
    rows.sort_by(|a, b| b.avg_handle_time_seconds.total_cmp(&a.avg_handle_time_seconds));
    rows
}

/// Mean minutes rounded for display.
pub fn display_minutes(aggregate: &QueueAggregate) -> f64 {
    round_to_hundredths(aggregate.avg_handle_time_minutes)
}
