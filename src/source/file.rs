//! Language bundles on disk.

use std::io::ErrorKind;
use std::path::PathBuf;

use serde_json::Value;

use super::{
    KeyValueSource,
    SourceError,
};
use crate::types::{
    TranslationMap,
    UNGROUPED,
    translations_from_json,
};

/// Reads JSON language bundles from a directory.
///
/// # Layout
/// - `<root>/<locale>.json` → flat keys of the ungrouped (`*`) namespace
/// - `<root>/<locale>/<group>.json` → nested keys of `group`
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path of the bundle for `(locale, group)`, or `None` when the names
    /// cannot map to a file below the root.
    fn bundle_path(&self, locale: &str, group: &str) -> Option<PathBuf> {
        if !is_plain_name(locale) {
            return None;
        }
        if group == UNGROUPED {
            return Some(self.root.join(format!("{locale}.json")));
        }
        is_plain_name(group).then(|| self.root.join(locale).join(format!("{group}.json")))
    }
}

/// A single path component without separators or parent references.
fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && name != "." && name != ".." && !name.contains(['/', '\\'])
}

impl KeyValueSource for FileSource {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        let Some(path) = self.bundle_path(locale, group) else {
            return Ok(TranslationMap::new());
        };

        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            // 存在しないバンドルは空のグループとして扱う
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(TranslationMap::new()),
            Err(source) => return Err(SourceError::Io { path, source }),
        };

        let json: Value = match serde_json::from_str(&content) {
            Ok(json) => json,
            Err(source) => return Err(SourceError::Parse { path, source }),
        };

        let Value::Object(map) = json else {
            return Err(SourceError::NotAnObject { path });
        };

        Ok(translations_from_json(&map))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;
    use crate::types::{
        TranslationValue,
        get_path,
    };

    #[fixture]
    fn lang_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("en")).unwrap();
        fs::write(
            temp_dir.path().join("en/file.json"),
            r#"{"key": "en value", "nested-key": {"title": "nested key"}}"#,
        )
        .unwrap();
        fs::write(temp_dir.path().join("en.json"), r#"{"Hello world": "Hello world"}"#).unwrap();
        temp_dir
    }

    #[rstest]
    fn test_load_group_bundle(lang_dir: TempDir) {
        let source = FileSource::new(lang_dir.path());

        let lines = source.load("en", "file").unwrap();

        assert_that!(lines.get("key"), some(eq(&TranslationValue::text("en value"))));
        assert_that!(
            get_path(&lines, "nested-key.title"),
            some(eq(&TranslationValue::text("nested key")))
        );
    }

    #[rstest]
    fn test_load_ungrouped_bundle(lang_dir: TempDir) {
        let source = FileSource::new(lang_dir.path());

        let lines = source.load("en", UNGROUPED).unwrap();

        assert_that!(lines.get("Hello world"), some(eq(&TranslationValue::text("Hello world"))));
    }

    #[rstest]
    #[case("en", "missing")]
    #[case("nl", "file")]
    #[case("nl", UNGROUPED)]
    #[case("en", "../en/file")]
    #[case("en", "..")]
    #[case("../en", "file")]
    #[case("en", "")]
    fn test_load_unknown_bundle_is_empty(lang_dir: TempDir, #[case] locale: &str, #[case] group: &str) {
        let source = FileSource::new(lang_dir.path());

        let lines = source.load(locale, group).unwrap();

        assert!(lines.is_empty());
    }

    #[rstest]
    fn test_load_invalid_json_is_a_recoverable_error(lang_dir: TempDir) {
        fs::write(lang_dir.path().join("en/broken.json"), "{ not json").unwrap();
        let source = FileSource::new(lang_dir.path());

        let result = source.load("en", "broken");

        assert!(matches!(result, Err(SourceError::Parse { .. })));
        assert!(result.unwrap_err().is_recoverable());
    }

    #[rstest]
    fn test_load_non_object_is_an_error(lang_dir: TempDir) {
        fs::write(lang_dir.path().join("en/list.json"), r#"["a", "b"]"#).unwrap();
        let source = FileSource::new(lang_dir.path());

        let result = source.load("en", "list");

        assert!(matches!(result, Err(SourceError::NotAnObject { .. })));
    }
}
