//! SQLite-backed [`TranslationStore`].

use std::collections::HashSet;
use std::path::Path;
use std::sync::{
    Mutex,
    MutexGuard,
    PoisonError,
};
use std::time::Duration;

use rusqlite::{
    Connection,
    ErrorCode,
    OpenFlags,
    OptionalExtension,
    params,
    params_from_iter,
};

use super::{
    StoreError,
    TranslationEntry,
    TranslationStore,
};
use crate::config::DatabaseSettings;
use crate::types::normalize_locale;

/// Table holding one row per `(group, key)`.
const TABLE: &str = "translations";

/// Translation rows in a single SQLite table.
///
/// Every supported locale gets a nullable `value_<locale>` column. Columns for
/// locales added later are created when the store is opened.
#[derive(Debug)]
pub struct SqliteStore {
    connection: Mutex<Connection>,
    /// Normalized locales, in column order.
    locales: Vec<String>,
}

impl SqliteStore {
    /// Opens (or creates) a store file.
    ///
    /// # Errors
    /// Returns an error if a locale is not a valid column suffix, or if the
    /// database cannot be opened or migrated.
    pub fn open(path: &Path, locales: &[String], busy_timeout: Duration) -> Result<Self, StoreError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
        let connection = Connection::open_with_flags(path, flags).map_err(backend)?;
        connection.busy_timeout(busy_timeout).map_err(backend)?;
        tracing::debug!(path = %path.display(), "Opened translation store");
        Self::with_connection(connection, locales)
    }

    /// Opens a private in-memory store.
    pub fn open_in_memory(locales: &[String]) -> Result<Self, StoreError> {
        let connection = Connection::open_in_memory().map_err(backend)?;
        Self::with_connection(connection, locales)
    }

    /// Opens the store described by `database`.
    ///
    /// `:memory:` yields a private in-memory store.
    pub fn from_settings(database: &DatabaseSettings, locales: &[String]) -> Result<Self, StoreError> {
        if database.is_in_memory() {
            Self::open_in_memory(locales)
        } else {
            Self::open(&database.path, locales, Duration::from_millis(database.busy_timeout_ms))
        }
    }

    fn with_connection(connection: Connection, locales: &[String]) -> Result<Self, StoreError> {
        let mut normalized: Vec<String> = Vec::with_capacity(locales.len());
        for locale in locales {
            let column_locale = column_locale(locale)?;
            if !normalized.contains(&column_locale) {
                normalized.push(column_locale);
            }
        }

        initialize_schema(&connection, &normalized)?;
        Ok(Self { connection: Mutex::new(connection), locales: normalized })
    }

    /// Locales with a value column, normalized.
    #[must_use]
    pub fn locales(&self) -> &[String] {
        &self.locales
    }

    /// Recovers a poisoned lock.
    fn lock(&self) -> MutexGuard<'_, Connection> {
        self.connection.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// `value_en, value_nl, ...`
    fn value_columns(&self) -> String {
        self.locales.iter().map(|locale| value_column(locale)).collect::<Vec<_>>().join(", ")
    }

    fn select_sql(&self, filter: &str) -> String {
        let columns = self.value_columns();
        if columns.is_empty() {
            format!("SELECT \"group\", \"key\" FROM {TABLE} WHERE {filter}")
        } else {
            format!("SELECT \"group\", \"key\", {columns} FROM {TABLE} WHERE {filter}")
        }
    }

    fn read_entry(&self, row: &rusqlite::Row<'_>) -> rusqlite::Result<TranslationEntry> {
        let mut entry = TranslationEntry::placeholder(row.get::<_, String>(0)?, row.get::<_, String>(1)?);
        for (offset, locale) in self.locales.iter().enumerate() {
            let value: Option<String> = row.get(offset + 2)?;
            entry.values.insert(locale.clone(), value);
        }
        Ok(entry)
    }
}

impl TranslationStore for SqliteStore {
    fn group_entries(&self, group: &str) -> Result<Vec<TranslationEntry>, StoreError> {
        let connection = self.lock();
        let sql = self.select_sql("\"group\" = ?1 ORDER BY \"key\"");
        let mut stmt = connection.prepare_cached(&sql).map_err(backend)?;
        let rows = stmt.query_map(params![group], |row| self.read_entry(row)).map_err(backend)?;
        rows.collect::<Result<Vec<_>, _>>().map_err(backend)
    }

    fn find(&self, group: &str, key: &str) -> Result<Option<TranslationEntry>, StoreError> {
        let connection = self.lock();
        let sql = self.select_sql("\"group\" = ?1 AND \"key\" = ?2");
        let mut stmt = connection.prepare_cached(&sql).map_err(backend)?;
        stmt.query_row(params![group, key], |row| self.read_entry(row)).optional().map_err(backend)
    }

    fn insert(&self, entry: &TranslationEntry) -> Result<(), StoreError> {
        let mut columns = vec!["\"group\"".to_string(), "\"key\"".to_string()];
        let mut values = vec![Some(entry.group.clone()), Some(entry.key.clone())];
        for (locale, value) in &entry.values {
            if !self.locales.contains(locale) {
                return Err(StoreError::InvalidLocale(locale.clone()));
            }
            columns.push(value_column(locale));
            values.push(value.clone());
        }

        let placeholders =
            (1..=values.len()).map(|index| format!("?{index}")).collect::<Vec<_>>().join(", ");
        let sql = format!("INSERT INTO {TABLE} ({}) VALUES ({placeholders})", columns.join(", "));

        let connection = self.lock();
        match connection.execute(&sql, params_from_iter(values.iter())) {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => {
                Err(StoreError::Duplicate { group: entry.group.clone(), key: entry.key.clone() })
            }
            Err(err) => Err(backend(err)),
        }
    }

    fn upsert_value(
        &self,
        group: &str,
        key: &str,
        locale: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError> {
        let normalized = normalize_locale(locale);
        if !self.locales.contains(&normalized) {
            return Err(StoreError::InvalidLocale(locale.to_string()));
        }
        let column = value_column(&normalized);
        let sql = format!(
            "INSERT INTO {TABLE} (\"group\", \"key\", {column}) VALUES (?1, ?2, ?3)
             ON CONFLICT(\"group\", \"key\")
             DO UPDATE SET {column} = excluded.{column}, updated_at = CURRENT_TIMESTAMP"
        );

        let connection = self.lock();
        connection.execute(&sql, params![group, key, value]).map_err(backend)?;
        Ok(())
    }

    fn count(&self) -> Result<usize, StoreError> {
        let connection = self.lock();
        let count: i64 = connection
            .query_row(&format!("SELECT COUNT(*) FROM {TABLE}"), [], |row| row.get(0))
            .map_err(backend)?;
        usize::try_from(count).map_err(|err| StoreError::Backend(err.to_string()))
    }
}

/// Creates the table and adds missing locale columns.
fn initialize_schema(connection: &Connection, locales: &[String]) -> Result<(), StoreError> {
    connection
        .execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {TABLE} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                \"group\" TEXT NOT NULL DEFAULT '*',
                \"key\" TEXT NOT NULL,
                created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                updated_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP,
                UNIQUE (\"group\", \"key\")
            );"
        ))
        .map_err(backend)?;

    let existing = existing_columns(connection)?;
    for locale in locales {
        let column = value_column(locale);
        if !existing.contains(&column) {
            tracing::debug!(column = %column, "Adding locale column to translation store");
            connection
                .execute_batch(&format!("ALTER TABLE {TABLE} ADD COLUMN {column} TEXT;"))
                .map_err(backend)?;
        }
    }
    Ok(())
}

fn existing_columns(connection: &Connection) -> Result<HashSet<String>, StoreError> {
    let mut stmt = connection.prepare(&format!("PRAGMA table_info({TABLE})")).map_err(backend)?;
    let names = stmt.query_map([], |row| row.get::<_, String>(1)).map_err(backend)?;
    names.collect::<Result<HashSet<_>, _>>().map_err(backend)
}

/// Normalizes `locale` and checks it is safe to splice into a column name.
fn column_locale(locale: &str) -> Result<String, StoreError> {
    let normalized = normalize_locale(locale);
    if normalized.is_empty() || !normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(StoreError::InvalidLocale(locale.to_string()));
    }
    Ok(normalized)
}

fn value_column(normalized_locale: &str) -> String {
    format!("value_{normalized_locale}")
}

/// Only unique / primary key conflicts count as duplicates, not every
/// constraint failure (e.g. `NOT NULL`).
fn is_unique_violation(err: &rusqlite::Error) -> bool {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => {
            failure.code == ErrorCode::ConstraintViolation
                && (failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
                    || failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY)
        }
        _ => false,
    }
}

#[allow(clippy::needless_pass_by_value)]
fn backend(err: rusqlite::Error) -> StoreError {
    StoreError::Backend(err.to_string())
}
