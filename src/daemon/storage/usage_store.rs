use std::{
    future::Future,
    ops::Deref,
    path::Path,
    sync::{Arc, Mutex},
    time::Duration,
};

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, instrument};

use crate::utils::time::{format_date, parse_date};

use super::{
    entities::{CategorizedUsage, CategoryRecord, UsageLogEntry, OTHER_CATEGORY},
    error::StoreError,
    schema,
};

/// Readers wait this long for the writer to release the database.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Interface for abstracting the usage log and the category registry.
pub trait UsageStore {
    /// Logs attributed time. Registers the application as `other` if it has never been seen.
    /// Both happen in one transaction.
    fn append_usage(
        &self,
        app_name: &str,
        duration_seconds: i64,
        date: NaiveDate,
    ) -> impl Future<Output = Result<UsageLogEntry, StoreError>>;

    /// Category of an application, `other` when it has never been seen.
    fn get_category(&self, app_name: &str) -> impl Future<Output = Result<Arc<str>, StoreError>>;

    /// Recategorizes an application. Fails with [StoreError::UnknownApp] if it was never logged.
    fn set_category_type(
        &self,
        app_name: &str,
        new_type: &str,
    ) -> impl Future<Output = Result<(), StoreError>>;

    fn list_categories(&self) -> impl Future<Output = Result<Vec<CategoryRecord>, StoreError>>;

    /// Usage logged between `from` and `to` (both inclusive), each entry carrying the current
    /// category of its application.
    fn usage_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<CategorizedUsage>, StoreError>>;
}

impl<T: Deref> UsageStore for T
where
    T::Target: UsageStore,
{
    fn append_usage(
        &self,
        app_name: &str,
        duration_seconds: i64,
        date: NaiveDate,
    ) -> impl Future<Output = Result<UsageLogEntry, StoreError>> {
        self.deref().append_usage(app_name, duration_seconds, date)
    }

    fn get_category(&self, app_name: &str) -> impl Future<Output = Result<Arc<str>, StoreError>> {
        self.deref().get_category(app_name)
    }

    fn set_category_type(
        &self,
        app_name: &str,
        new_type: &str,
    ) -> impl Future<Output = Result<(), StoreError>> {
        self.deref().set_category_type(app_name, new_type)
    }

    fn list_categories(&self) -> impl Future<Output = Result<Vec<CategoryRecord>, StoreError>> {
        self.deref().list_categories()
    }

    fn usage_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> impl Future<Output = Result<Vec<CategorizedUsage>, StoreError>> {
        self.deref().usage_between(from, to)
    }
}

/// The main realization of [UsageStore], backed by a SQLite file.
#[derive(Clone)]
pub struct SqliteUsageStore {
    connection: Arc<Mutex<Connection>>,
}

impl SqliteUsageStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let connection = Connection::open(path)?;
        connection.busy_timeout(BUSY_TIMEOUT)?;
        // WAL lets report commands read while the daemon writes.
        let mode: String =
            connection.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!("Opened {path:?} in journal mode {mode}");
        Self::from_connection(connection)
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(connection: Connection) -> Result<Self, StoreError> {
        schema::migrate(&connection)?;
        Ok(Self {
            connection: Arc::new(Mutex::new(connection)),
        })
    }

    /// Runs `operation` on the blocking pool so SQLite never stalls the runtime.
    async fn with_connection<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T, StoreError> + Send + 'static,
    {
        let connection = self.connection.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = connection.lock().map_err(|_| StoreError::LockPoisoned)?;
            operation(&mut connection)
        })
        .await?
    }
}

fn validate_app_name(app_name: &str) -> Result<(), StoreError> {
    if app_name.trim().is_empty() {
        return Err(StoreError::validation("app name", "must not be empty"));
    }
    Ok(())
}

impl UsageStore for SqliteUsageStore {
    #[instrument(skip(self))]
    async fn append_usage(
        &self,
        app_name: &str,
        duration_seconds: i64,
        date: NaiveDate,
    ) -> Result<UsageLogEntry, StoreError> {
        validate_app_name(app_name)?;
        if duration_seconds < 0 {
            return Err(StoreError::validation(
                "duration",
                format!("{duration_seconds} is negative"),
            ));
        }

        let app_name: Arc<str> = app_name.into();
        let name = app_name.clone();
        let id = self
            .with_connection(move |conn| {
                let tx = conn.transaction()?;
                tx.execute(
                    "INSERT OR IGNORE INTO app_category (app_name, type) VALUES (?1, ?2)",
                    params![&*name, OTHER_CATEGORY],
                )?;
                tx.execute(
                    "INSERT INTO usage_log (app_name, duration_seconds, date) VALUES (?1, ?2, ?3)",
                    params![&*name, duration_seconds, format_date(date)],
                )?;
                let id = tx.last_insert_rowid();
                tx.commit()?;
                Ok(id)
            })
            .await?;

        Ok(UsageLogEntry {
            id,
            app_name,
            duration_seconds,
            date,
        })
    }

    async fn get_category(&self, app_name: &str) -> Result<Arc<str>, StoreError> {
        let name = app_name.to_string();
        self.with_connection(move |conn| {
            let category: Option<String> = conn
                .query_row(
                    "SELECT type FROM app_category WHERE app_name = ?1",
                    [&name],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(category.map_or_else(|| OTHER_CATEGORY.into(), Arc::from))
        })
        .await
    }

    #[instrument(skip(self))]
    async fn set_category_type(&self, app_name: &str, new_type: &str) -> Result<(), StoreError> {
        validate_app_name(app_name)?;
        let new_type = new_type.trim().to_string();
        if new_type.is_empty() {
            return Err(StoreError::validation("category type", "must not be empty"));
        }

        let name = app_name.to_string();
        self.with_connection(move |conn| {
            let changed = conn.execute(
                "UPDATE app_category SET type = ?1 WHERE app_name = ?2",
                params![new_type, name],
            )?;
            if changed == 0 {
                return Err(StoreError::UnknownApp { app_name: name });
            }
            Ok(())
        })
        .await
    }

    async fn list_categories(&self) -> Result<Vec<CategoryRecord>, StoreError> {
        self.with_connection(|conn| {
            let mut statement =
                conn.prepare("SELECT app_name, type FROM app_category ORDER BY app_name")?;
            let records = statement
                .query_map([], |row| {
                    Ok(CategoryRecord {
                        app_name: row.get::<_, String>(0)?.into(),
                        category: row.get::<_, String>(1)?.into(),
                    })
                })?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(records)
        })
        .await
    }

    async fn usage_between(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<CategorizedUsage>, StoreError> {
        self.with_connection(move |conn| {
            // LEFT JOIN so that an entry whose category row went missing still counts, as other.
            let mut statement = conn.prepare(
                "SELECT l.id, l.app_name, COALESCE(c.type, ?3), l.duration_seconds, l.date
                 FROM usage_log l
                 LEFT JOIN app_category c ON c.app_name = l.app_name
                 WHERE l.date >= ?1 AND l.date <= ?2
                 ORDER BY l.date, l.id",
            )?;
            let rows = statement
                .query_map(
                    params![format_date(from), format_date(to), OTHER_CATEGORY],
                    |row| {
                        Ok((
                            row.get::<_, i64>(0)?,
                            row.get::<_, String>(1)?,
                            row.get::<_, String>(2)?,
                            row.get::<_, i64>(3)?,
                            row.get::<_, String>(4)?,
                        ))
                    },
                )?
                .collect::<Result<Vec<_>, _>>()?;

            rows.into_iter()
                .map(|(id, app_name, category, duration_seconds, date)| {
                    let date = parse_date(&date).ok_or_else(|| {
                        StoreError::validation("stored date", format!("row {id} has '{date}'"))
                    })?;
                    Ok(CategorizedUsage {
                        id,
                        app_name: app_name.into(),
                        category: category.into(),
                        duration_seconds,
                        date,
                    })
                })
                .collect()
        })
        .await
    }
}
