use std::sync::Arc;

use chrono::NaiveDate;

/// A flushed interval travelling from the sampler to the store writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsageEvent {
    pub app_name: Arc<str>,
    pub duration_seconds: i64,
    /// Local calendar day of the tick that closed the interval.
    pub date: NaiveDate,
}
