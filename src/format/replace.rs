//! `:name` placeholder replacement.

use crate::types::Replacements;

/// Replace `:name` placeholders in `line`.
///
/// For every replacement three spellings are recognised: `:name` (value as
/// is), `:Name` (first letter uppercased) and `:NAME` (uppercased). The
/// longest matching placeholder wins and inserted values are not scanned
/// again.
///
/// # Examples
/// ```
/// use translation_loader::format::replace_placeholders;
/// use translation_loader::types::replacements;
///
/// let line = replace_placeholders("Hello :Name", &replacements([("name", "ada")]));
/// assert_eq!(line, "Hello Ada");
/// ```
#[must_use]
#[allow(clippy::implicit_hasher)]
pub fn replace_placeholders(line: &str, replace: &Replacements) -> String {
    if replace.is_empty() || !line.contains(':') {
        return line.to_string();
    }

    let mut placeholders: Vec<(String, String)> = Vec::with_capacity(replace.len() * 3);
    for (name, value) in replace {
        placeholders.push((format!(":{name}"), value.clone()));
        placeholders.push((format!(":{}", upper_first(name)), upper_first(value)));
        placeholders.push((format!(":{}", name.to_uppercase()), value.to_uppercase()));
    }
    // 長いプレースホルダーを優先 (`:value` より `:values`)
    placeholders.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

    let mut result = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(position) = rest.find(':') {
        let (head, tail) = rest.split_at(position);
        result.push_str(head);

        let matched = placeholders
            .iter()
            .find_map(|(placeholder, value)| tail.strip_prefix(placeholder.as_str()).map(|r| (value, r)));

        if let Some((value, remainder)) = matched {
            result.push_str(value);
            rest = remainder;
        } else {
            result.push(':');
            rest = tail.strip_prefix(':').unwrap_or_default();
        }
    }
    result.push_str(rest);

    result
}

fn upper_first(value: &str) -> String {
    let mut chars = value.chars();
    chars.next().map_or_else(String::new, |first| first.to_uppercase().chain(chars).collect())
}
