use std::collections::HashMap;

use chrono::{DateTime, Days, Local, NaiveDate};
use serde::Serialize;
use tracing::trace;

use crate::{
    daemon::storage::{entities::CategorizedUsage, error::StoreError, usage_store::UsageStore},
    utils::{
        percentage::Percentage,
        time::{days_between, seconds_to_hours},
    },
};

use super::suggestions::{suggest, Suggestion, SuggestionMetrics};

pub const WINDOW_DAYS: u64 = 28;

const BUCKET_DAYS: i64 = 7;
const HOUR_DECIMALS: i32 = 1;

/// A 7-day slice of the window by age relative to today, not by calendar week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum AgeBucket {
    ThreeBack,
    TwoBack,
    Previous,
    Current,
}

impl AgeBucket {
    /// Oldest first.
    pub const ALL: [AgeBucket; 4] = [
        AgeBucket::ThreeBack,
        AgeBucket::TwoBack,
        AgeBucket::Previous,
        AgeBucket::Current,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            AgeBucket::ThreeBack => "three weeks ago",
            AgeBucket::TwoBack => "two weeks ago",
            AgeBucket::Previous => "last week",
            AgeBucket::Current => "this week",
        }
    }
}

/// Maps an age in whole days to its bucket. Ages outside of the window have none.
pub fn bucket_for_age(days_ago: i64) -> Option<AgeBucket> {
    match days_ago {
        age if age < 0 => None,
        age if age < BUCKET_DAYS => Some(AgeBucket::Current),
        age if age < 2 * BUCKET_DAYS => Some(AgeBucket::Previous),
        age if age < 3 * BUCKET_DAYS => Some(AgeBucket::TwoBack),
        age if age < 4 * BUCKET_DAYS => Some(AgeBucket::ThreeBack),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BucketTotals {
    pub bucket: AgeBucket,
    pub study_hours: f64,
    pub non_study_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollupSummary {
    pub total_study_hours: f64,
    /// Mean over days with any study time, not over the whole window.
    pub average_study_hours: f64,
    pub longest_study_hours: f64,
    pub study_percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRollup {
    pub buckets: Vec<BucketTotals>,
    pub summary: RollupSummary,
    pub suggestions: Vec<Suggestion>,
}

#[derive(Default, Clone, Copy)]
struct Seconds {
    study: i64,
    non_study: i64,
}

pub fn rollup(usage: &[CategorizedUsage], today: NaiveDate) -> MonthlyRollup {
    let mut buckets = HashMap::<AgeBucket, Seconds>::new();
    let mut study_days = HashMap::<NaiveDate, i64>::new();

    for entry in usage {
        let Some(bucket) = bucket_for_age(days_between(entry.date, today)) else {
            trace!("Entry {} of {} is outside of the window", entry.id, entry.date);
            continue;
        };
        let totals = buckets.entry(bucket).or_default();
        if entry.is_study() {
            totals.study += entry.duration_seconds;
            *study_days.entry(entry.date).or_default() += entry.duration_seconds;
        } else {
            totals.non_study += entry.duration_seconds;
        }
    }

    let seconds_of = |bucket: AgeBucket| buckets.get(&bucket).copied().unwrap_or_default();

    let total_study = buckets.values().map(|v| v.study).sum::<i64>();
    let total = buckets.values().map(|v| v.study + v.non_study).sum::<i64>();
    // Any day with a study entry is a study day, even if its entries sum to zero.
    let daily_study = study_days.into_values().collect::<Vec<_>>();

    let average_study_hours = if daily_study.is_empty() {
        0.
    } else {
        seconds_to_hours(
            total_study as f64 / daily_study.len() as f64,
            HOUR_DECIMALS,
        )
    };
    let longest = daily_study.iter().copied().max().unwrap_or(0);

    let summary = RollupSummary {
        total_study_hours: seconds_to_hours(total_study as f64, HOUR_DECIMALS),
        average_study_hours,
        longest_study_hours: seconds_to_hours(longest as f64, HOUR_DECIMALS),
        study_percentage: Percentage::of(total_study, total).rounded(),
    };

    let suggestions = suggest(&SuggestionMetrics {
        study_percentage: summary.study_percentage,
        current_study_seconds: seconds_of(AgeBucket::Current).study,
        previous_study_seconds: seconds_of(AgeBucket::Previous).study,
    });

    MonthlyRollup {
        buckets: AgeBucket::ALL
            .into_iter()
            .map(|bucket| {
                let seconds = seconds_of(bucket);
                BucketTotals {
                    bucket,
                    study_hours: seconds_to_hours(seconds.study as f64, HOUR_DECIMALS),
                    non_study_hours: seconds_to_hours(seconds.non_study as f64, HOUR_DECIMALS),
                }
            })
            .collect(),
        summary,
        suggestions,
    }
}

/// The last 28 days relative to `now`, in four 7-day buckets.
pub async fn monthly_rollup(
    store: &impl UsageStore,
    now: DateTime<Local>,
) -> Result<MonthlyRollup, StoreError> {
    let today = now.date_naive();
    let from = today
        .checked_sub_days(Days::new(WINDOW_DAYS - 1))
        .unwrap_or(NaiveDate::MIN);
    let usage = store.usage_between(from, today).await?;
    Ok(rollup(&usage, today))
}
