use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::types::normalize_locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "locales[0]")
    pub field_path: String,
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Order in which the built-in sources are merged.
///
/// Later sources override earlier ones for identical keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AggregateStrategy {
    /// Files first, then the database (database wins).
    #[default]
    FileThenDatabase,
    /// Database first, then files (files win).
    DatabaseThenFile,
    FileOnly,
    DatabaseOnly,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TranslatorSettings {
    /// Locale used when a lookup does not name one.
    pub locale: String,
    /// Locale consulted when the requested locale has no value.
    pub fallback_locale: Option<String>,
    /// Locales that get a `value_<locale>` column in the store.
    pub locales: Vec<String>,

    /// Directory holding `<locale>.json` and `<locale>/<group>.json`.
    pub lang_path: PathBuf,
    pub database: DatabaseSettings,

    pub aggregate_source: AggregateStrategy,

    pub create_missing_translations: bool,
    /// Keep placeholder rows pending until they are flushed explicitly.
    pub defer_missing_translations: bool,
    /// Key prefixes that never create placeholder rows.
    pub reserved_namespaces: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DatabaseSettings {
    /// SQLite database file, or `:memory:`.
    pub path: PathBuf,
    pub busy_timeout_ms: u64,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self { path: PathBuf::from("translations.sqlite3"), busy_timeout_ms: 5000 }
    }
}

impl DatabaseSettings {
    /// Returns true if the store should live in memory only.
    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == ":memory:"
    }
}

impl TranslatorSettings {
    /// # Errors
    /// - Empty or invalid locale identifier
    /// - No store locale configured
    /// - Empty reserved namespace
    /// - Invalid database settings
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if let Some(message) = locale_problem(&self.locale) {
            errors.push(ValidationError::new("locale", message));
        }

        if let Some(fallback) = &self.fallback_locale
            && let Some(message) = locale_problem(fallback)
        {
            errors.push(ValidationError::new(
                "fallbackLocale",
                format!("{message}, or remove this field"),
            ));
        }

        if self.locales.is_empty() {
            errors.push(ValidationError::new(
                "locales",
                "At least one locale is required. Example: [\"en\", \"nl\"]",
            ));
        }

        for (index, locale) in self.locales.iter().enumerate() {
            if let Some(message) = locale_problem(locale) {
                errors.push(ValidationError::new(format!("locales[{index}]"), message));
            }
        }

        for (index, namespace) in self.reserved_namespaces.iter().enumerate() {
            if namespace.trim().is_empty() {
                errors.push(ValidationError::new(
                    format!("reservedNamespaces[{index}]"),
                    "The namespace cannot be empty. Example: \"validation\"",
                ));
            }
        }

        if self.database.path.as_os_str().is_empty() {
            errors.push(ValidationError::new(
                "database.path",
                "The path cannot be empty. Use \":memory:\" for an in-memory database",
            ));
        }

        if self.database.busy_timeout_ms == 0 {
            errors.push(ValidationError::new(
                "database.busyTimeoutMs",
                "The timeout must be greater than zero",
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Describes why `locale` cannot be used as a locale identifier.
fn locale_problem(locale: &str) -> Option<String> {
    if locale.is_empty() {
        return Some("The locale cannot be empty. Example: \"en\"".to_string());
    }

    let normalized = normalize_locale(locale);
    if normalized.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        None
    } else {
        Some(format!(
            "Invalid locale '{locale}': only letters, digits, '-' and '_' are allowed"
        ))
    }
}

impl Default for TranslatorSettings {
    fn default() -> Self {
        Self {
            locale: "en".to_string(),
            fallback_locale: Some("en".to_string()),
            locales: vec!["en".to_string()],
            lang_path: PathBuf::from("lang"),
            database: DatabaseSettings::default(),
            aggregate_source: AggregateStrategy::default(),
            create_missing_translations: false,
            defer_missing_translations: false,
            reserved_namespaces: vec!["validation".to_string()],
        }
    }
}
