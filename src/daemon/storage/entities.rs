use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;

/// Category assigned to every application the first time it is logged.
pub const OTHER_CATEGORY: &str = "other";

/// The category counted as study time in reports. Every other type is non-study.
pub const STUDY_CATEGORY: &str = "study";

/// A row of `usage_log`. Never updated once written.
#[derive(PartialEq, Eq, Debug, Serialize, Clone)]
pub struct UsageLogEntry {
    pub id: i64,
    pub app_name: Arc<str>,
    pub duration_seconds: i64,
    pub date: NaiveDate,
}

/// A row of `app_category`.
#[derive(PartialEq, Eq, PartialOrd, Ord, Debug, Serialize, Clone)]
pub struct CategoryRecord {
    pub app_name: Arc<str>,
    #[serde(rename = "type")]
    pub category: Arc<str>,
}

/// A usage entry joined with the category its application has right now.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct CategorizedUsage {
    pub id: i64,
    pub app_name: Arc<str>,
    pub category: Arc<str>,
    pub duration_seconds: i64,
    pub date: NaiveDate,
}

impl CategorizedUsage {
    pub fn is_study(&self) -> bool {
        &*self.category == STUDY_CATEGORY
    }
}
