//! Text and JSON output of a query.

use std::fmt;

use analytics::{
    FetchWindow, QueryReport, RawRecord,
    report::{self, QueueAggregate},
};
use serde::Serialize;

const BAR_WIDTH: f64 = 30.0;

pub struct Options<'a> {
    pub search: &'a str,
    pub top: usize,
    pub sample: bool,
}

/// Why a report has nothing to chart. Reported as a warning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoData {
    NoRecords,
    NoHandleTime,
    NothingSelected,
}

impl fmt::Display for NoData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoData::NoRecords => f.write_str("No call queue analytics returned for the selected window"),
            NoData::NoHandleTime => f.write_str(
                "No average handle time found in the analytics payload, check the app scopes or widen the date range",
            ),
            NoData::NothingSelected => f.write_str("No queues match the search keywords"),
        }
    }
}

#[derive(Debug, Serialize)]
struct Detail<'a> {
    queue_id: Option<&'a str>,
    queue_name: &'a str,
    avg_handle_time_minutes: f64,
    avg_handle_time_seconds: f64,
    avg_handle_time: Option<String>,
}

/// Everything shown for one query: the ranked queues, the rows behind them
/// and optionally the first raw record.
#[derive(Debug, Serialize)]
pub struct View<'a> {
    from: String,
    to: String,
    records: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    sample: Option<&'a RawRecord>,
    queue_count: usize,
    queues: Vec<QueueAggregate>,
    details: Vec<Detail<'a>>,
    #[serde(skip)]
    no_data: Option<NoData>,
}

impl<'a> View<'a> {
    pub fn new(query: &'a QueryReport, window: &FetchWindow, options: &Options<'_>) -> Self {
        let choices = report::queue_choices(&query.metrics);
        let selected = report::filter_choices(&choices, options.search);
        let rows = report::select(&query.metrics, &selected);

        let aggregates = report::aggregate(&rows);
        let queues = report::top_n(&aggregates, options.top).to_vec();

        let details = report::details(&rows)
            .into_iter()
            .map(|row| Detail {
                queue_id: row.queue_id.as_deref(),
                queue_name: &row.queue_name,
                avg_handle_time_minutes: row.minutes(),
                avg_handle_time_seconds: row.avg_handle_time_seconds,
                avg_handle_time: row.clock(),
            })
            .collect();

        let no_data = if query.records.is_empty() {
            Some(NoData::NoRecords)
        } else if query.metrics.is_empty() {
            Some(NoData::NoHandleTime)
        } else if rows.is_empty() {
            Some(NoData::NothingSelected)
        } else {
            None
        };

        Self {
            from: window.from.to_string(),
            to: window.to.to_string(),
            records: query.records.len(),
            sample: if options.sample { query.sample() } else { None },
            queue_count: aggregates.len(),
            queues,
            details,
            no_data,
        }
    }

    pub fn no_data(&self) -> Option<NoData> {
        self.no_data
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    fn write_sample(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Some(sample) = self.sample else {
            return Ok(());
        };

        let json = serde_json::to_string_pretty(sample).map_err(|_| fmt::Error)?;

        writeln!(f, "Sample record")?;
        writeln!(f)?;
        writeln!(f, "{json}")?;
        writeln!(f)
    }

    fn write_queues(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Average handle time by queue, {} to {} (top {} of {})",
            self.from,
            self.to,
            self.queues.len(),
            self.queue_count
        )?;
        writeln!(f)?;

        let labels: Vec<String> = self
            .queues
            .iter()
            .map(|queue| label(queue.queue_id.as_deref(), &queue.queue_name))
            .collect();

        let width = column_width("Queue", labels.iter().map(String::as_str));

        writeln!(f, "{:<width$}  {:>8}  {:>5}", "Queue", "Minutes", "Rows")?;

        for (label, queue) in labels.iter().zip(&self.queues) {
            writeln!(f, "{label:<width$}  {:>8.2}  {:>5}", report::display_minutes(queue), queue.rows)?;
        }

        writeln!(f)?;

        let max = self.queues.iter().map(report::display_minutes).fold(0.0, f64::max);

        for (label, queue) in labels.iter().zip(&self.queues) {
            let minutes = report::display_minutes(queue);
            let length = if max > 0.0 {
                (minutes / max * BAR_WIDTH).round() as usize
            } else {
                0
            };

            writeln!(f, "{label:<width$}  {} {minutes:.2}", "█".repeat(length))?;
        }

        writeln!(f)
    }

    fn write_details(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Details")?;
        writeln!(f)?;

        let name_width = column_width("Queue", self.details.iter().map(|d| d.queue_name));
        let id_width = column_width("Queue ID", self.details.iter().map(|d| d.queue_id.unwrap_or("-")));

        writeln!(
            f,
            "{:<name_width$}  {:<id_width$}  {:>8}  {:>8}  {:>8}",
            "Queue", "Queue ID", "Minutes", "Seconds", "HH:MM:SS"
        )?;

        for detail in &self.details {
            writeln!(
                f,
                "{:<name_width$}  {:<id_width$}  {:>8.2}  {:>8}  {:>8}",
                detail.queue_name,
                detail.queue_id.unwrap_or("-"),
                detail.avg_handle_time_minutes,
                detail.avg_handle_time_seconds,
                detail.avg_handle_time.as_deref().unwrap_or("-"),
            )?;
        }

        Ok(())
    }
}

impl fmt::Display for View<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_sample(f)?;

        if self.no_data.is_some() {
            return Ok(());
        }

        self.write_queues(f)?;
        self.write_details(f)
    }
}

fn label(queue_id: Option<&str>, queue_name: &str) -> String {
    match queue_id {
        Some(id) => format!("{queue_name} ({id})"),
        None => queue_name.to_string(),
    }
}

fn column_width<'a>(header: &str, values: impl Iterator<Item = &'a str>) -> usize {
    values.map(|v| v.chars().count()).fold(header.len(), usize::max)
}
