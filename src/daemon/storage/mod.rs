//! Storage is organized through [usage_store::SqliteUsageStore].
//! The basic idea is:
//!  - `usage_log` is an append-only list of attributed durations, one row per flushed interval.
//!  - `app_category` maps every application ever logged to its category type.
//!  - Category is joined onto usage at read time and never copied into `usage_log`, so
//!    recategorizing an app changes all of its history.

pub mod entities;
pub mod error;
pub mod schema;
pub mod usage_event;
pub mod usage_store;

use std::path::Path;

use error::StoreError;
use usage_store::SqliteUsageStore;

/// File inside the application directory that holds both tables.
pub const DATABASE_FILE_NAME: &str = "usage.db";

/// Opens the database shared by the daemon and the report commands.
pub fn open_in_app_dir(app_dir: &Path) -> Result<SqliteUsageStore, StoreError> {
    SqliteUsageStore::open(&app_dir.join(DATABASE_FILE_NAME))
}
