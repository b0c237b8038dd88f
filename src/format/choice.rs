//! Plural variant selection (`apple|apples`, `{0} none|[1,*] some`).

use crate::types::normalize_locale;

/// Select the variant of a `|`-separated line for `count`.
///
/// Variants carrying an explicit condition are tried first:
/// - `{n}` / `[n]`: exactly `n`
/// - `[a,b]`: `a <= count <= b`
/// - `[a,*]` / `[*,b]`: open ranges
///
/// Otherwise the conditions are stripped and the plural rule of `locale`
/// picks the variant. An index past the last variant falls back to the first.
///
/// # Examples
/// ```
/// use translation_loader::format::choose;
///
/// assert_eq!(choose("apple|apples", 1, "en"), "apple");
/// assert_eq!(choose("apple|apples", 3, "en"), "apples");
/// assert_eq!(choose("{0} none|[1,*] some", 0, "en"), "none");
/// ```
#[must_use]
pub fn choose(line: &str, count: i64, locale: &str) -> String {
    let segments: Vec<&str> = line.split('|').collect();

    if let Some(value) = segments.iter().find_map(|segment| explicit_match(segment, count)) {
        return value.trim().to_string();
    }

    let stripped: Vec<&str> = segments.iter().map(|segment| strip_condition(segment)).collect();
    let index = plural_index(locale, count);

    stripped.get(index).or_else(|| stripped.first()).map_or_else(String::new, |s| s.trim().to_string())
}

/// Splits `{cond}rest` / `[cond]rest` into `(cond, rest)`.
fn split_condition(segment: &str) -> Option<(&str, &str)> {
    let segment = segment.trim_start();
    let body = segment.strip_prefix(['{', '['])?;
    let end = body.find(['}', ']'])?;
    let (condition, rest) = body.split_at(end);
    if condition.contains(['{', '[']) {
        return None;
    }
    Some((condition, rest.get(1..).unwrap_or_default()))
}

fn strip_condition(segment: &str) -> &str {
    split_condition(segment).map_or(segment, |(_, rest)| rest)
}

fn explicit_match(segment: &str, count: i64) -> Option<&str> {
    let (condition, value) = split_condition(segment)?;

    let matches = if let Some((from, to)) = condition.split_once(',') {
        let (from, to) = (from.trim(), to.trim());
        match (from, to) {
            ("*", "*") => true,
            (from, "*") => from.parse::<i64>().is_ok_and(|from| count >= from),
            ("*", to) => to.parse::<i64>().is_ok_and(|to| count <= to),
            (from, to) => match (from.parse::<i64>(), to.parse::<i64>()) {
                (Ok(from), Ok(to)) => (from..=to).contains(&count),
                _ => false,
            },
        }
    } else {
        condition.trim().parse::<i64>().is_ok_and(|exact| exact == count)
    };

    matches.then_some(value)
}

/// Index of the plural variant for `count` in `locale`.
///
/// # 言語グループ
/// - 複数形なし (ja, zh, ko, ...): 常に 0
/// - 0 と 1 が単数 (fr, pt_BR, ...)
/// - 東スラブ系 (ru, uk, ...): 3 形
/// - cs, sk / pl: 3 形
/// - その他: 1 が単数
///
/// `count` は符号付きのまま判定する (`-1` は単数にならない)。
#[must_use]
pub fn plural_index(locale: &str, count: i64) -> usize {
    let normalized = normalize_locale(locale);
    let language = if normalized == "pt_br" {
        normalized.as_str()
    } else {
        normalized.split('_').next().unwrap_or_default()
    };
    let n = count;

    match language {
        "az" | "bo" | "dz" | "id" | "ja" | "jv" | "ka" | "km" | "kn" | "ko" | "ms" | "th"
        | "tr" | "vi" | "zh" => 0,
        "am" | "bh" | "fil" | "fr" | "gun" | "hi" | "hy" | "ln" | "mg" | "nso" | "pt_br"
        | "ti" | "wa" => usize::from(!matches!(n, 0 | 1)),
        "be" | "bs" | "hr" | "ru" | "sh" | "sr" | "uk" => {
            if n % 10 == 1 && n % 100 != 11 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(10..20).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        "cs" | "sk" => match n {
            1 => 0,
            2..=4 => 1,
            _ => 2,
        },
        "pl" => {
            if n == 1 {
                0
            } else if (2..=4).contains(&(n % 10)) && !(12..=14).contains(&(n % 100)) {
                1
            } else {
                2
            }
        }
        _ => usize::from(n != 1),
    }
}
