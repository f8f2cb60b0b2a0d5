use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    daemon::storage::{entities::CategorizedUsage, error::StoreError, usage_store::UsageStore},
    utils::time::{seconds_to_hours, trailing_dates, weekday_label},
};

pub const DEFAULT_WINDOW_DAYS: u32 = 7;

const HOUR_DECIMALS: i32 = 2;

/// Study and non-study hours of a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DayPattern {
    pub date: NaiveDate,
    pub weekday: &'static str,
    pub study_hours: f64,
    pub non_study_hours: f64,
}

/// One bucket per day of the `window_days` days ending at `reference`, oldest first. Days without
/// usage are present with zero hours.
pub fn pattern_for(
    usage: &[CategorizedUsage],
    reference: NaiveDate,
    window_days: u32,
) -> Vec<DayPattern> {
    let mut totals = HashMap::<NaiveDate, (i64, i64)>::new();
    for entry in usage {
        let (study, non_study) = totals.entry(entry.date).or_default();
        if entry.is_study() {
            *study += entry.duration_seconds;
        } else {
            *non_study += entry.duration_seconds;
        }
    }

    trailing_dates(reference, window_days)
        .into_iter()
        .map(|date| {
            let (study, non_study) = totals.get(&date).copied().unwrap_or_default();
            DayPattern {
                date,
                weekday: weekday_label(date.weekday()),
                study_hours: seconds_to_hours(study as f64, HOUR_DECIMALS),
                non_study_hours: seconds_to_hours(non_study as f64, HOUR_DECIMALS),
            }
        })
        .collect()
}

pub async fn weekly_pattern(
    store: &impl UsageStore,
    reference: NaiveDate,
    window_days: u32,
) -> Result<Vec<DayPattern>, StoreError> {
    let Some(first) = trailing_dates(reference, window_days).first().copied() else {
        return Ok(vec![]);
    };
    let usage = store.usage_between(first, reference).await?;
    Ok(pattern_for(&usage, reference, window_days))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::{Days, NaiveDate};

    use crate::daemon::storage::{
        entities::CategorizedUsage,
        usage_store::{SqliteUsageStore, UsageStore},
    };

    use super::{pattern_for, weekly_pattern, DEFAULT_WINDOW_DAYS};

    // A Wednesday.
    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();

    fn usage(category: &str, seconds: i64, date: NaiveDate) -> CategorizedUsage {
        CategorizedUsage {
            id: 0,
            app_name: "app".into(),
            category: category.into(),
            duration_seconds: seconds,
            date,
        }
    }

    #[test]
    fn empty_log_still_yields_every_day() {
        for window_days in [1, 7, 30] {
            let pattern = pattern_for(&[], TEST_DATE, window_days);

            assert_eq!(pattern.len(), window_days as usize);
            assert_eq!(pattern.last().map(|v| v.date), Some(TEST_DATE));
            assert!(pattern.windows(2).all(|w| w[0].date < w[1].date));
            assert!(pattern
                .iter()
                .all(|v| v.study_hours == 0. && v.non_study_hours == 0.));
        }
    }

    #[test]
    fn days_are_split_into_study_and_non_study() {
        let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let rows = vec![
            usage("study", 3600, monday),
            usage("study", 1800, monday),
            usage("other", 900, monday),
            usage("games", 900, monday),
            usage("study", 1000, TEST_DATE),
        ];

        let pattern = pattern_for(&rows, TEST_DATE, DEFAULT_WINDOW_DAYS);

        let first = &pattern[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2023, 12, 28).unwrap());
        assert_eq!(first.weekday, "Thu");

        let monday_pattern = &pattern[4];
        assert_eq!(monday_pattern.date, monday);
        assert_eq!(monday_pattern.weekday, "Mon");
        assert_eq!(monday_pattern.study_hours, 1.5);
        assert_eq!(monday_pattern.non_study_hours, 0.5);

        let today = &pattern[6];
        assert_eq!(today.weekday, "Wed");
        assert_eq!(today.study_hours, 0.28);
        assert_eq!(today.non_study_hours, 0.);
    }

    #[test]
    fn zero_window_is_empty() {
        assert!(pattern_for(&[], TEST_DATE, 0).is_empty());
    }

    #[tokio::test]
    async fn recategorization_moves_time_between_totals() -> Result<()> {
        let store = SqliteUsageStore::open_in_memory()?;
        store.append_usage("anki", 3600, TEST_DATE).await?;
        store.append_usage("firefox", 1800, TEST_DATE).await?;
        // Outside of the window.
        store
            .append_usage("anki", 3600, TEST_DATE - Days::new(7))
            .await?;

        let before = weekly_pattern(&store, TEST_DATE, DEFAULT_WINDOW_DAYS).await?;
        assert_eq!(before[6].study_hours, 0.);
        assert_eq!(before[6].non_study_hours, 1.5);
        assert!(before[..6].iter().all(|v| v.non_study_hours == 0.));

        store.set_category_type("anki", "study").await?;

        let after = weekly_pattern(&store, TEST_DATE, DEFAULT_WINDOW_DAYS).await?;
        assert_eq!(after[6].study_hours, 1.);
        assert_eq!(after[6].non_study_hours, 0.5);
        Ok(())
    }
}
