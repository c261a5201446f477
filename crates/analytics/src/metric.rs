use serde::Serialize;

/// Name given to queues whose records carry no usable name.
pub const UNKNOWN_QUEUE: &str = "Unknown Queue";

/// One queue's average handle time, independent of the provider's field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueueMetric {
    pub queue_id: Option<String>,
    /// Never empty.
    pub queue_name: String,
    pub avg_handle_time_seconds: f64,
}

impl QueueMetric {
    /// Average handle time in minutes, rounded to two decimals.
    pub fn minutes(&self) -> f64 {
        round_to_hundredths(self.avg_handle_time_seconds / 60.0)
    }

    /// Average handle time as `HH:MM:SS`, or `None` when it is not finite.
    pub fn clock(&self) -> Option<String> {
        format_clock(self.avg_handle_time_seconds)
    }
}

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn format_clock(seconds: f64) -> Option<String> {
    if !seconds.is_finite() {
        return None;
    }

    let total = seconds.round_ties_even() as i64;
    let hours = total.div_euclid(3600);
    let rest = total.rem_euclid(3600);

    Some(format!("{hours:02}:{:02}:{:02}", rest / 60, rest % 60))
}
