use std::{collections::HashMap, sync::Arc};

use chrono::NaiveDate;
use serde::Serialize;

use crate::daemon::storage::{
    entities::CategorizedUsage, error::StoreError, usage_store::UsageStore,
};

/// Total time of one application on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppUsage {
    pub app_name: Arc<str>,
    #[serde(rename = "type")]
    pub category: Arc<str>,
    pub total_seconds: i64,
}

/// Per-app totals for `date`, longest first.
pub fn summarize_day(usage: &[CategorizedUsage], date: NaiveDate) -> Vec<AppUsage> {
    let mut map = HashMap::<(Arc<str>, Arc<str>), i64>::new();

    for entry in usage.iter().filter(|v| v.date == date) {
        *map.entry((entry.app_name.clone(), entry.category.clone()))
            .or_default() += entry.duration_seconds;
    }

    let mut apps = map
        .into_iter()
        .map(|((app_name, category), total_seconds)| AppUsage {
            app_name,
            category,
            total_seconds,
        })
        .collect::<Vec<_>>();
    apps.sort_by(|a, b| {
        b.total_seconds
            .cmp(&a.total_seconds)
            .then_with(|| a.app_name.cmp(&b.app_name))
    });
    apps
}

pub async fn daily_summary(
    store: &impl UsageStore,
    date: NaiveDate,
) -> Result<Vec<AppUsage>, StoreError> {
    let usage = store.usage_between(date, date).await?;
    Ok(summarize_day(&usage, date))
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use chrono::NaiveDate;

    use crate::daemon::storage::{
        entities::CategorizedUsage,
        usage_store::{SqliteUsageStore, UsageStore},
    };

    use super::{daily_summary, summarize_day, AppUsage};

    const TEST_DATE: NaiveDate = NaiveDate::from_ymd_opt(2024, 4, 5).unwrap();

    fn usage(app: &str, category: &str, seconds: i64, date: NaiveDate) -> CategorizedUsage {
        CategorizedUsage {
            id: 0,
            app_name: app.into(),
            category: category.into(),
            duration_seconds: seconds,
            date,
        }
    }

    #[test]
    fn totals_are_sums_sorted_longest_first() {
        let other_day = TEST_DATE.pred_opt().unwrap();
        let rows = vec![
            usage("firefox", "other", 5, TEST_DATE),
            usage("anki", "study", 30, TEST_DATE),
            usage("firefox", "other", 7, TEST_DATE),
            usage("anki", "study", 100, other_day),
            usage("zotero", "study", 0, TEST_DATE),
        ];

        let summary = summarize_day(&rows, TEST_DATE);

        assert_eq!(
            summary,
            vec![
                AppUsage {
                    app_name: "anki".into(),
                    category: "study".into(),
                    total_seconds: 30,
                },
                AppUsage {
                    app_name: "firefox".into(),
                    category: "other".into(),
                    total_seconds: 12,
                },
                AppUsage {
                    app_name: "zotero".into(),
                    category: "study".into(),
                    total_seconds: 0,
                },
            ]
        );
    }

    #[test]
    fn empty_day_has_no_rows() {
        assert!(summarize_day(&[], TEST_DATE).is_empty());
    }

    #[tokio::test]
    async fn appended_durations_add_up() -> Result<()> {
        let store = SqliteUsageStore::open_in_memory()?;
        let durations = [5, 5, 3, 0, 12];
        for duration in durations {
            store.append_usage("vim", duration, TEST_DATE).await?;
        }
        store.append_usage("slack", 9, TEST_DATE).await?;

        let summary = daily_summary(&store, TEST_DATE).await?;

        assert_eq!(summary[0].app_name.as_ref(), "vim");
        assert_eq!(summary[0].total_seconds, durations.iter().sum::<i64>());
        assert_eq!(summary[1].total_seconds, 9);
        Ok(())
    }

    #[tokio::test]
    async fn recategorization_changes_existing_rows() -> Result<()> {
        let store = SqliteUsageStore::open_in_memory()?;
        store.append_usage("vim", 60, TEST_DATE).await?;
        assert_eq!(&*daily_summary(&store, TEST_DATE).await?[0].category, "other");

        store.set_category_type("vim", "study").await?;

        let summary = daily_summary(&store, TEST_DATE).await?;
        assert_eq!(&*summary[0].category, "study");
        assert_eq!(summary[0].total_seconds, 60);
        Ok(())
    }
}
