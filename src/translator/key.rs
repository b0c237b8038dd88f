//! Translation key parsing.

/// Splits `key` into `(group, item)` at the first `.`.
///
/// A key without a dot names a whole group.
#[must_use]
pub fn parse_key(key: &str) -> (&str, Option<&str>) {
    match key.split_once('.') {
        Some((group, item)) => (group, Some(item)),
        None => (key, None),
    }
}

/// Checks if `key` equals `namespace` or lies below it.
#[must_use]
pub fn is_in_namespace(key: &str, namespace: &str) -> bool {
    let Some(remainder) = key.strip_prefix(namespace) else {
        return false;
    };

    remainder.is_empty() || remainder.starts_with('.')
}
