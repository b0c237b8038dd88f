//! Translator construction.

use std::sync::atomic::AtomicBool;
use std::sync::{
    Arc,
    Mutex,
    RwLock,
};

use super::{
    LoadedCache,
    MissingKeyQueue,
    ReservedNamespaces,
    Translator,
    TranslatorError,
};
use crate::config::{
    ConfigError,
    TranslatorSettings,
};
use crate::format::{
    MessageFormatter,
    PlaceholderFormatter,
};
use crate::source::{
    AggregateSource,
    DatabaseSource,
    FileSource,
    KeyValueSource,
};
use crate::store::{
    SqliteStore,
    TranslationStore,
};

/// Builder for [`Translator`].
///
/// Without a source the translator resolves nothing; without a store missing
/// keys are never persisted.
#[derive(Debug)]
pub struct TranslatorBuilder {
    locale: String,
    fallback_locale: Option<String>,
    source: Box<dyn KeyValueSource>,
    store: Option<Arc<dyn TranslationStore>>,
    formatter: Box<dyn MessageFormatter>,
    reserved: ReservedNamespaces,
    create_missing: bool,
    defer_missing: bool,
}

impl TranslatorBuilder {
    #[must_use]
    pub fn new(locale: impl Into<String>) -> Self {
        Self {
            locale: locale.into(),
            fallback_locale: None,
            source: Box::new(AggregateSource::default()),
            store: None,
            formatter: Box::new(PlaceholderFormatter),
            reserved: ReservedNamespaces::default(),
            create_missing: false,
            defer_missing: false,
        }
    }

    #[must_use]
    pub fn fallback_locale(mut self, locale: impl Into<String>) -> Self {
        self.fallback_locale = Some(locale.into());
        self
    }

    #[must_use]
    pub fn source(mut self, source: impl KeyValueSource + 'static) -> Self {
        self.source = Box::new(source);
        self
    }

    /// Store receiving placeholder rows.
    ///
    /// Independent of the source: reads go through the source only.
    #[must_use]
    pub fn store(mut self, store: Arc<dyn TranslationStore>) -> Self {
        self.store = Some(store);
        self
    }

    #[must_use]
    pub fn formatter(mut self, formatter: impl MessageFormatter + 'static) -> Self {
        self.formatter = Box::new(formatter);
        self
    }

    #[must_use]
    pub fn reserved_namespaces(mut self, reserved: ReservedNamespaces) -> Self {
        self.reserved = reserved;
        self
    }

    #[must_use]
    pub const fn create_missing_translations(mut self, enabled: bool) -> Self {
        self.create_missing = enabled;
        self
    }

    /// Queue placeholders until [`Translator::flush_missing_translations`].
    #[must_use]
    pub const fn defer_missing_translations(mut self, deferred: bool) -> Self {
        self.defer_missing = deferred;
        self
    }

    #[must_use]
    pub fn build(self) -> Translator {
        Translator {
            source: self.source,
            store: self.store,
            formatter: self.formatter,
            locale: RwLock::new(self.locale),
            fallback_locale: RwLock::new(self.fallback_locale),
            loaded: Mutex::new(LoadedCache::new()),
            missing_key_callback: RwLock::new(None),
            create_missing: AtomicBool::new(self.create_missing),
            defer_missing: self.defer_missing,
            missing: Mutex::new(MissingKeyQueue::new()),
            reserved: self.reserved,
        }
    }
}

impl Translator {
    /// 設定から Translator を構築する
    ///
    /// SQLite ストアを開き、`aggregateSource` に従ってファイルと DB を合成する。
    ///
    /// # Errors
    /// - 設定のバリデーションエラー
    /// - ストアを開けない場合
    pub fn from_settings(settings: &TranslatorSettings) -> Result<Self, TranslatorError> {
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        let store: Arc<dyn TranslationStore> =
            Arc::new(SqliteStore::from_settings(&settings.database, &settings.locales)?);

        let source = AggregateSource::from_strategy(
            settings.aggregate_source,
            FileSource::new(&settings.lang_path),
            DatabaseSource::new(Arc::clone(&store)),
        );

        tracing::debug!(
            locale = %settings.locale,
            lang_path = %settings.lang_path.display(),
            database = %settings.database.path.display(),
            strategy = ?settings.aggregate_source,
            "Building translator"
        );

        let mut builder = Self::builder(&settings.locale)
            .source(source)
            .store(store)
            .reserved_namespaces(ReservedNamespaces::new(settings.reserved_namespaces.iter().cloned()))
            .create_missing_translations(settings.create_missing_translations)
            .defer_missing_translations(settings.defer_missing_translations);
        if let Some(fallback) = &settings.fallback_locale {
            builder = builder.fallback_locale(fallback);
        }

        Ok(builder.build())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use googletest::prelude::*;
    use tempfile::TempDir;

    use super::*;
    use crate::config::DatabaseSettings;
    use crate::test_utils::write_lang_fixture;
    use crate::types::Replacements;

    fn settings(lang_dir: &TempDir) -> TranslatorSettings {
        TranslatorSettings {
            locales: vec!["en".to_string(), "nl".to_string()],
            lang_path: lang_dir.path().to_path_buf(),
            database: DatabaseSettings { path: ":memory:".into(), ..DatabaseSettings::default() },
            ..TranslatorSettings::default()
        }
    }

    #[googletest::test]
    fn test_builder_defaults() {
        let translator = TranslatorBuilder::new("nl").build();

        expect_that!(translator.locale(), eq("nl"));
        expect_that!(translator.fallback_locale(), none());
        expect_that!(translator.creates_missing_translations(), eq(false));
        expect_that!(translator.has("anything", None).unwrap(), eq(false));
    }

    #[googletest::test]
    fn test_from_settings_reads_files_and_database() {
        let lang_dir = TempDir::new().unwrap();
        write_lang_fixture(lang_dir.path());

        let translator = Translator::from_settings(&settings(&lang_dir)).unwrap();
        let line = translator.resolve("file.key", &Replacements::new(), Some("nl")).unwrap();

        expect_that!(line.as_text(), some(eq("nl value")));
    }

    #[googletest::test]
    fn test_from_settings_applies_toggles() {
        let lang_dir = TempDir::new().unwrap();
        let settings = TranslatorSettings {
            fallback_locale: Some("nl".to_string()),
            create_missing_translations: true,
            ..settings(&lang_dir)
        };

        let translator = Translator::from_settings(&settings).unwrap();

        expect_that!(translator.creates_missing_translations(), eq(true));
        expect_that!(translator.fallback_locale(), some(eq("nl")));
    }

    #[googletest::test]
    fn test_from_settings_rejects_invalid_settings() {
        let lang_dir = TempDir::new().unwrap();
        let settings = TranslatorSettings { locales: Vec::new(), ..settings(&lang_dir) };

        let result = Translator::from_settings(&settings);

        expect_that!(matches!(result, Err(TranslatorError::Config(_))), eq(true));
    }

    #[googletest::test]
    fn test_from_settings_opens_file_database() {
        let lang_dir = TempDir::new().unwrap();
        let db_dir = TempDir::new().unwrap();
        let settings = TranslatorSettings {
            database: DatabaseSettings {
                path: db_dir.path().join("translations.sqlite3"),
                ..DatabaseSettings::default()
            },
            create_missing_translations: true,
            ..settings(&lang_dir)
        };

        let translator = Translator::from_settings(&settings).unwrap();
        translator.resolve("missing.key", &Replacements::new(), None).unwrap();
        drop(translator);

        let store = SqliteStore::from_settings(&settings.database, &settings.locales).unwrap();
        expect_that!(store.find("*", "missing.key").unwrap(), some(anything()));
    }
}
