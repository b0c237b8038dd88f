//! Persistent translation rows.
//!
//! A [`TranslationStore`] holds one row per `(group, key)` with an optional
//! value per locale. Duplicate inserts are reported as
//! [`StoreError::Duplicate`] so callers can treat them as a harmless race.

mod sqlite;

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::types::normalize_locale;

pub use sqlite::SqliteStore;

/// Errors raised by a translation store.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A row with the same `(group, key)` already exists.
    #[error("Translation '{key}' already exists in group '{group}'")]
    Duplicate { group: String, key: String },
    /// The locale has no value column in this store.
    #[error("Locale '{0}' is not supported by the translation store")]
    InvalidLocale(String),
    /// Any other backend failure (connection, SQL, lock).
    #[error("Translation store error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns true for a uniqueness conflict on `(group, key)`.
    #[must_use]
    pub const fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate { .. })
    }
}

/// One stored translation row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationEntry {
    pub group: String,
    pub key: String,
    /// Values keyed by normalized locale (`en_us`).
    pub values: BTreeMap<String, Option<String>>,
}

impl TranslationEntry {
    /// Creates a row without any value.
    #[must_use]
    pub fn placeholder(group: impl Into<String>, key: impl Into<String>) -> Self {
        Self { group: group.into(), key: key.into(), values: BTreeMap::new() }
    }

    /// Sets the value for `locale`.
    #[must_use]
    pub fn with_value(mut self, locale: &str, value: Option<&str>) -> Self {
        self.values.insert(normalize_locale(locale), value.map(ToString::to_string));
        self
    }

    /// Returns the value for `locale`; null and empty values count as absent.
    #[must_use]
    pub fn value(&self, locale: &str) -> Option<&str> {
        self.values
            .get(&normalize_locale(locale))
            .and_then(Option::as_deref)
            .filter(|value| !value.is_empty())
    }
}

/// Storage backend for translation rows.
pub trait TranslationStore: Send + Sync + fmt::Debug {
    /// All rows of `group`.
    fn group_entries(&self, group: &str) -> Result<Vec<TranslationEntry>, StoreError>;

    fn find(&self, group: &str, key: &str) -> Result<Option<TranslationEntry>, StoreError>;

    /// Inserts a new row.
    ///
    /// # Errors
    /// [`StoreError::Duplicate`] if `(group, key)` already exists.
    fn insert(&self, entry: &TranslationEntry) -> Result<(), StoreError>;

    /// Sets one locale value, creating the row when needed.
    fn upsert_value(
        &self,
        group: &str,
        key: &str,
        locale: &str,
        value: Option<&str>,
    ) -> Result<(), StoreError>;

    /// Number of stored rows.
    fn count(&self) -> Result<usize, StoreError>;

    /// Inserts an empty placeholder row.
    ///
    /// Returns `Ok(false)` if the row already existed.
    fn create_if_missing(&self, group: &str, key: &str) -> Result<bool, StoreError> {
        match self.insert(&TranslationEntry::placeholder(group, key)) {
            Ok(()) => Ok(true),
            Err(err) if err.is_duplicate() => Ok(false),
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    #[googletest::test]
    fn test_entry_value_treats_null_and_empty_as_absent() {
        let entry = TranslationEntry::placeholder("*", "key")
            .with_value("en", Some("Hello"))
            .with_value("nl", None)
            .with_value("de", Some(""));

        expect_that!(entry.value("en"), some(eq("Hello")));
        expect_that!(entry.value("nl"), none());
        expect_that!(entry.value("de"), none());
        expect_that!(entry.value("fr"), none());
    }

    #[googletest::test]
    fn test_entry_value_normalizes_locale() {
        let entry = TranslationEntry::placeholder("*", "key").with_value("en-US", Some("Color"));

        expect_that!(entry.value("en_us"), some(eq("Color")));
        expect_that!(entry.value("EN-us"), some(eq("Color")));
    }

    #[rstest]
    #[case(StoreError::Duplicate { group: "*".to_string(), key: "k".to_string() }, true)]
    #[case(StoreError::Backend("disk full".to_string()), false)]
    #[case(StoreError::InvalidLocale("xx".to_string()), false)]
    fn test_is_duplicate(#[case] error: StoreError, #[case] expected: bool) {
        assert_eq!(error.is_duplicate(), expected);
    }
}
