//! Resolving translator.
//!
//! Wraps a [`KeyValueSource`] with a cache of loaded `(group, locale)` buckets,
//! retries with the fallback locale and handles keys that resolve to nothing.
//!
//! # 解決順序
//! 1. グループなし (`*`) バケットをキー全体で検索
//! 2. 最初の `.` で `group` と `item` に分割し、グループのバケットを検索
//! 3. フォールバックロケールで 1, 2 を再試行
//! 4. 見つからない場合: プレースホルダー作成 → コールバック → キーをそのまま返す

mod builder;
mod cache;
mod error;
mod key;
mod missing;

use std::fmt;
use std::sync::atomic::{
    AtomicBool,
    Ordering,
};
use std::sync::{
    Arc,
    Mutex,
    MutexGuard,
    PoisonError,
    RwLock,
};

use serde::Serialize;

pub use builder::TranslatorBuilder;
pub use cache::LoadedCache;
pub use error::TranslatorError;
pub use key::{
    is_in_namespace,
    parse_key,
};
pub use missing::{
    MissingKeyQueue,
    ReservedNamespaces,
};

use crate::format::MessageFormatter;
use crate::source::KeyValueSource;
use crate::store::TranslationStore;
use crate::types::{
    Replacements,
    TranslationMap,
    TranslationValue,
    UNGROUPED,
    get_path,
};

/// Produces a value for a key that did not resolve: `(key, locale) -> line`.
pub type MissingKeyCallback = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// Result of a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Translated {
    /// A leaf line, with replacements applied.
    Text(String),
    /// A whole group or sub-tree, returned raw.
    Group(TranslationMap),
}

impl Translated {
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    #[must_use]
    pub fn into_text(self) -> Option<String> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }
}

impl From<TranslationValue> for Translated {
    fn from(value: TranslationValue) -> Self {
        match value {
            TranslationValue::Text(text) => Self::Text(text),
            TranslationValue::Group(group) => Self::Group(group),
        }
    }
}

/// Resolves translation keys against a source, caching loaded groups.
///
/// Build one with [`Translator::builder`] or [`Translator::from_settings`].
pub struct Translator {
    source: Box<dyn KeyValueSource>,
    /// Receives placeholder rows for missing keys.
    store: Option<Arc<dyn TranslationStore>>,
    formatter: Box<dyn MessageFormatter>,
    locale: RwLock<String>,
    fallback_locale: RwLock<Option<String>>,
    loaded: Mutex<LoadedCache>,
    missing_key_callback: RwLock<Option<MissingKeyCallback>>,
    create_missing: AtomicBool,
    defer_missing: bool,
    missing: Mutex<MissingKeyQueue>,
    reserved: ReservedNamespaces,
}

impl Translator {
    #[must_use]
    pub fn builder(locale: impl Into<String>) -> TranslatorBuilder {
        TranslatorBuilder::new(locale)
    }

    /// Resolve `key` for `locale` (or the current locale).
    ///
    /// A leaf is returned with `replace` applied, a group or sub-tree is
    /// returned raw. A key that does not resolve in the locale nor in the
    /// fallback locale yields the missing-key callback's value, or the key
    /// itself.
    ///
    /// # Errors
    /// Only when a source fails in a way that cannot be recovered (the store
    /// is unreachable). Placeholder persistence never fails the lookup.
    pub fn resolve(
        &self,
        key: &str,
        replace: &Replacements,
        locale: Option<&str>,
    ) -> Result<Translated, TranslatorError> {
        let locale = self.effective_locale(locale);

        match self.lookup_with_fallback(key, &locale)? {
            Some(Translated::Text(line)) => Ok(Translated::Text(self.formatter.replace(&line, replace))),
            Some(group) => Ok(group),
            None => Ok(self.handle_missing_key(key, replace, &locale)),
        }
    }

    /// Resolve `key` and select the plural variant for `count`.
    ///
    /// `:count` is available as a replacement unless `replace` sets it.
    pub fn choice(
        &self,
        key: &str,
        count: i64,
        replace: &Replacements,
        locale: Option<&str>,
    ) -> Result<Translated, TranslatorError> {
        let locale = self.effective_locale(locale);

        let raw = match self.lookup_with_fallback(key, &locale)? {
            Some(found) => found,
            None => self.handle_missing_key(key, &Replacements::new(), &locale),
        };
        let line = match raw {
            Translated::Text(line) => line,
            group @ Translated::Group(_) => return Ok(group),
        };

        let mut replace = replace.clone();
        replace.entry("count".to_string()).or_insert_with(|| count.to_string());
        let chosen = self.formatter.choose(&line, count, &locale);
        Ok(Translated::Text(self.formatter.replace(&chosen, &replace)))
    }

    /// Returns true if `key` resolves in `locale` or the fallback locale.
    ///
    /// Never creates placeholders nor calls the missing-key callback.
    pub fn has(&self, key: &str, locale: Option<&str>) -> Result<bool, TranslatorError> {
        let locale = self.effective_locale(locale);
        Ok(self.lookup_with_fallback(key, &locale)?.is_some())
    }

    /// Like [`Translator::has`], without the fallback locale.
    pub fn has_for_locale(&self, key: &str, locale: &str) -> Result<bool, TranslatorError> {
        Ok(self.lookup(key, locale)?.is_some())
    }

    /// Replace the loaded buckets wholesale.
    ///
    /// `set_loaded(LoadedCache::new())` forces every group to be loaded again.
    pub fn set_loaded(&self, loaded: LoadedCache) {
        *self.lock_loaded() = loaded;
    }

    /// Snapshot of the loaded buckets.
    #[must_use]
    pub fn loaded(&self) -> LoadedCache {
        self.lock_loaded().clone()
    }

    pub fn set_missing_key_callback<F>(&self, callback: F)
    where
        F: Fn(&str, &str) -> String + Send + Sync + 'static,
    {
        *self.missing_key_callback.write().unwrap_or_else(PoisonError::into_inner) =
            Some(Arc::new(callback));
    }

    pub fn clear_missing_key_callback(&self) {
        *self.missing_key_callback.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Toggle placeholder creation for keys that do not resolve.
    pub fn create_missing_translations(&self, enabled: bool) {
        self.create_missing.store(enabled, Ordering::Relaxed);
    }

    #[must_use]
    pub fn creates_missing_translations(&self) -> bool {
        self.create_missing.load(Ordering::Relaxed)
    }

    /// Persist placeholders queued in deferred mode.
    ///
    /// Returns the number of keys attempted.
    pub fn flush_missing_translations(&self) -> usize {
        let pending = self.lock_missing().drain();
        for (group, key) in &pending {
            self.persist_placeholder(group, key);
        }
        pending.len()
    }

    /// Number of placeholders waiting for [`Translator::flush_missing_translations`].
    #[must_use]
    pub fn pending_missing_translations(&self) -> usize {
        self.lock_missing().pending_len()
    }

    pub fn set_locale(&self, locale: impl Into<String>) {
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = locale.into();
    }

    #[must_use]
    pub fn locale(&self) -> String {
        self.locale.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    pub fn set_fallback_locale(&self, fallback_locale: Option<String>) {
        *self.fallback_locale.write().unwrap_or_else(PoisonError::into_inner) = fallback_locale;
    }

    #[must_use]
    pub fn fallback_locale(&self) -> Option<String> {
        self.fallback_locale.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn effective_locale(&self, locale: Option<&str>) -> String {
        locale.map_or_else(|| self.locale(), ToString::to_string)
    }

    fn lookup_with_fallback(
        &self,
        key: &str,
        locale: &str,
    ) -> Result<Option<Translated>, TranslatorError> {
        if let Some(found) = self.lookup(key, locale)? {
            return Ok(Some(found));
        }

        match self.fallback_locale() {
            Some(fallback) if fallback != locale => self.lookup(key, &fallback),
            _ => Ok(None),
        }
    }

    /// Looks `key` up in a single locale without any side effect.
    fn lookup(&self, key: &str, locale: &str) -> Result<Option<Translated>, TranslatorError> {
        let mut loaded = self.lock_loaded();

        let ungrouped = self.bucket(&mut loaded, UNGROUPED, locale)?;
        if let Some(TranslationValue::Text(line)) = ungrouped.get(key)
            && !line.is_empty()
        {
            return Ok(Some(Translated::Text(line.clone())));
        }

        let (group, item) = parse_key(key);
        let lines = self.bucket(&mut loaded, group, locale)?;
        let found = match item {
            None => (!lines.is_empty()).then(|| TranslationValue::Group(lines.clone())),
            Some(item) => get_path(lines, item).filter(|value| !value.is_blank()).cloned(),
        };

        Ok(found.map(Translated::from))
    }

    fn bucket<'c>(
        &self,
        loaded: &'c mut LoadedCache,
        group: &str,
        locale: &str,
    ) -> Result<&'c TranslationMap, TranslatorError> {
        loaded.get_or_try_load(group, locale, || {
            let lines = self.source.load(locale, group)?;
            tracing::trace!(group, locale, lines = lines.len(), "Loaded translation group");
            Ok(lines)
        })
    }

    fn handle_missing_key(&self, key: &str, replace: &Replacements, locale: &str) -> Translated {
        if self.creates_missing_translations() && !self.reserved.contains_key(key) {
            self.queue_placeholder(UNGROUPED, key);
        }

        let callback =
            self.missing_key_callback.read().unwrap_or_else(PoisonError::into_inner).clone();
        match callback {
            Some(callback) => Translated::Text(self.formatter.replace(&callback(key, locale), replace)),
            None => Translated::Text(key.to_string()),
        }
    }

    fn queue_placeholder(&self, group: &str, key: &str) {
        if !self.lock_missing().enqueue(group, key) {
            return;
        }

        if self.defer_missing {
            tracing::debug!(group, key, "Queued placeholder translation");
            return;
        }

        let pending = self.lock_missing().drain();
        for (group, key) in &pending {
            self.persist_placeholder(group, key);
        }
    }

    /// Best effort: duplicates are expected (another process or a stale
    /// cache) and other store errors are only logged.
    fn persist_placeholder(&self, group: &str, key: &str) {
        let Some(store) = &self.store else {
            tracing::debug!(group, key, "No translation store, placeholder skipped");
            return;
        };

        match store.create_if_missing(group, key) {
            Ok(true) => tracing::debug!(group, key, "Created placeholder translation"),
            Ok(false) => tracing::debug!(group, key, "Placeholder translation already exists"),
            Err(err) => {
                tracing::warn!(group, key, error = %err, "Failed to create placeholder translation");
            }
        }
    }

    fn lock_loaded(&self) -> MutexGuard<'_, LoadedCache> {
        self.loaded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_missing(&self) -> MutexGuard<'_, MissingKeyQueue> {
        self.missing.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Translator")
            .field("source", &self.source)
            .field("store", &self.store)
            .field("formatter", &self.formatter)
            .field("locale", &self.locale())
            .field("fallback_locale", &self.fallback_locale())
            .field("loaded", &"<LoadedCache>")
            .field("missing_key_callback", &"<MissingKeyCallback>")
            .field("create_missing", &self.creates_missing_translations())
            .field("defer_missing", &self.defer_missing)
            .field("reserved", &self.reserved)
            .finish_non_exhaustive()
    }
}
