//! テスト用ユーティリティ関数
//!
//! 複数のテストモジュールで使用される共通のヘルパー関数を提供します。
#![cfg(test)]
#![allow(clippy::unwrap_used)]

use std::fs;
use std::path::Path;
use std::sync::Mutex;

use crate::source::{
    KeyValueSource,
    SourceError,
};
use crate::store::{
    StoreError,
    TranslationEntry,
    TranslationStore,
};
use crate::types::{
    TranslationMap,
    TranslationValue,
};

/// テスト用の言語ファイルを作成する
///
/// - `en.json`, `nl.json`: グループなしのキー
/// - `en/file.json`, `nl/file.json`: ネストしたキー
/// - `en/validation.json`: バリデーションメッセージ
pub(crate) fn write_lang_fixture(root: &Path) {
    fs::create_dir_all(root.join("en")).unwrap();
    fs::create_dir_all(root.join("nl")).unwrap();

    fs::write(root.join("en.json"), r#"{"Hello world": "Hello world"}"#).unwrap();
    fs::write(root.join("nl.json"), r#"{"Hello world": "Hallo wereld"}"#).unwrap();
    fs::write(
        root.join("en/file.json"),
        r#"{
            "key": "en value",
            "nested-key": {
                "title": "nested key",
                "message": "this is a nested key"
            }
        }"#,
    )
    .unwrap();
    fs::write(
        root.join("nl/file.json"),
        r#"{
            "key": "nl value",
            "nested-key": {
                "title": "geneste key",
                "message": "dit is een geneste key"
            }
        }"#,
    )
    .unwrap();
    fs::write(
        root.join("en/validation.json"),
        r#"{"required": "The :attribute field is required."}"#,
    )
    .unwrap();
}

/// 固定の `(locale, group)` に対して固定の行を返すソース
#[derive(Debug)]
pub(crate) struct StaticSource {
    locale: String,
    group: String,
    lines: TranslationMap,
}

impl StaticSource {
    pub(crate) fn new(locale: &str, group: &str, lines: &[(&str, &str)]) -> Self {
        Self {
            locale: locale.to_string(),
            group: group.to_string(),
            lines: lines
                .iter()
                .map(|(key, value)| ((*key).to_string(), TranslationValue::text(*value)))
                .collect(),
        }
    }
}

impl KeyValueSource for StaticSource {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        if locale == self.locale && group == self.group {
            Ok(self.lines.clone())
        } else {
            Ok(TranslationMap::new())
        }
    }
}

/// 読み込み回数を記録するソース
#[derive(Debug)]
pub(crate) struct CountingSource<S> {
    inner: S,
    calls: Mutex<Vec<(String, String)>>,
}

impl<S: KeyValueSource> CountingSource<S> {
    pub(crate) const fn new(inner: S) -> Self {
        Self { inner, calls: Mutex::new(Vec::new()) }
    }

    /// `(group, locale)` の読み込み回数
    pub(crate) fn loads(&self, group: &str, locale: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(g, l)| g == group && l == locale).count()
    }

    pub(crate) fn total_loads(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl<S: KeyValueSource> KeyValueSource for CountingSource<S> {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        self.calls.lock().unwrap().push((group.to_string(), locale.to_string()));
        self.inner.load(locale, group)
    }
}

/// 常に接続エラーを返すストア
#[derive(Debug)]
pub(crate) struct OfflineStore;

impl OfflineStore {
    fn error() -> StoreError {
        StoreError::Backend("connection refused".to_string())
    }
}

impl TranslationStore for OfflineStore {
    fn group_entries(&self, _group: &str) -> Result<Vec<TranslationEntry>, StoreError> {
        Err(Self::error())
    }

    fn find(&self, _group: &str, _key: &str) -> Result<Option<TranslationEntry>, StoreError> {
        Err(Self::error())
    }

    fn insert(&self, _entry: &TranslationEntry) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn upsert_value(
        &self,
        _group: &str,
        _key: &str,
        _locale: &str,
        _value: Option<&str>,
    ) -> Result<(), StoreError> {
        Err(Self::error())
    }

    fn count(&self) -> Result<usize, StoreError> {
        Err(Self::error())
    }
}
