//! Core types used throughout the project.

use std::collections::{
    BTreeMap,
    HashMap,
};

use serde::{
    Deserialize,
    Serialize,
};
use serde_json::Value;

/// Group name of the ungrouped (flat key) namespace.
pub const UNGROUPED: &str = "*";

/// Ordered mapping from key segment to value.
pub type TranslationMap = BTreeMap<String, TranslationValue>;

/// Placeholder replacements passed to a lookup (`:name` → value).
pub type Replacements = HashMap<String, String>;

/// A node of a translation tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TranslationValue {
    /// Leaf line.
    Text(String),
    /// Nested group of lines.
    Group(TranslationMap),
}

impl TranslationValue {
    /// Creates a leaf value.
    #[must_use]
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the leaf text, if this node is a leaf.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Group(_) => None,
        }
    }

    /// Empty leaves and empty groups count as absent.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Text(text) => text.is_empty(),
            Self::Group(group) => group.is_empty(),
        }
    }
}

/// Builds [`Replacements`] from string pairs.
///
/// # Examples
/// ```
/// use translation_loader::types::replacements;
///
/// let replace = replacements([("name", "Ada")]);
/// assert_eq!(replace.get("name").map(String::as_str), Some("Ada"));
/// ```
#[must_use]
pub fn replacements<const N: usize>(pairs: [(&str, &str); N]) -> Replacements {
    pairs.into_iter().map(|(key, value)| (key.to_string(), value.to_string())).collect()
}

/// Normalize a locale code (lowercase and replace `-` with `_`).
#[must_use]
pub fn normalize_locale(locale: &str) -> String {
    locale.to_lowercase().replace('-', "_")
}

/// Convert a parsed JSON object into a translation tree.
///
/// Strings become leaves, numbers and booleans are stringified, `null` is
/// dropped and arrays become groups keyed by their index.
#[must_use]
pub fn translations_from_json(map: &serde_json::Map<String, Value>) -> TranslationMap {
    map.iter()
        .filter_map(|(key, value)| value_from_json(value).map(|value| (key.clone(), value)))
        .collect()
}

fn value_from_json(json: &Value) -> Option<TranslationValue> {
    match json {
        Value::Null => None,
        Value::String(text) => Some(TranslationValue::Text(text.clone())),
        Value::Bool(_) | Value::Number(_) => Some(TranslationValue::Text(json.to_string())),
        Value::Object(map) => Some(TranslationValue::Group(translations_from_json(map))),
        Value::Array(items) => Some(TranslationValue::Group(
            items
                .iter()
                .enumerate()
                .filter_map(|(index, item)| {
                    value_from_json(item).map(|value| (index.to_string(), value))
                })
                .collect(),
        )),
    }
}

/// Look up a dotted path inside a translation tree.
///
/// At every level the remaining path is first tried as a literal key, so keys
/// containing dots are still reachable. Otherwise the path is split at the
/// first `.` and the lookup descends into the matching group.
///
/// # Examples
/// ```
/// use translation_loader::types::{TranslationMap, TranslationValue, get_path, insert_dotted};
///
/// let mut map = TranslationMap::new();
/// insert_dotted(&mut map, "nested.title", TranslationValue::text("Title"));
///
/// assert_eq!(get_path(&map, "nested.title"), Some(&TranslationValue::text("Title")));
/// ```
#[must_use]
pub fn get_path<'a>(map: &'a TranslationMap, path: &str) -> Option<&'a TranslationValue> {
    if let Some(value) = map.get(path) {
        return Some(value);
    }

    let (head, rest) = path.split_once('.')?;
    match map.get(head)? {
        TranslationValue::Group(group) => get_path(group, rest),
        TranslationValue::Text(_) => None,
    }
}

/// Insert a value under a dotted key, creating intermediate groups.
///
/// A leaf standing where a group is needed is replaced by the group.
pub fn insert_dotted(map: &mut TranslationMap, key: &str, value: TranslationValue) {
    let Some((head, rest)) = key.split_once('.') else {
        map.insert(key.to_string(), value);
        return;
    };

    let node = map
        .entry(head.to_string())
        .or_insert_with(|| TranslationValue::Group(TranslationMap::new()));
    if matches!(node, TranslationValue::Text(_)) {
        *node = TranslationValue::Group(TranslationMap::new());
    }
    if let TranslationValue::Group(group) = node {
        insert_dotted(group, rest, value);
    }
}

/// Recursively merge `overlay` into `base`.
///
/// Identical paths take the overlay value, paths only present in `base` are
/// kept and groups present on both sides are merged key by key.
pub fn merge_translations(base: &mut TranslationMap, overlay: TranslationMap) {
    for (key, value) in overlay {
        match (base.get_mut(&key), value) {
            (Some(TranslationValue::Group(existing)), TranslationValue::Group(incoming)) => {
                merge_translations(existing, incoming);
            }
            (_, value) => {
                base.insert(key, value);
            }
        }
    }
}
