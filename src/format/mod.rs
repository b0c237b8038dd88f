//! Placeholder replacement and plural selection for resolved lines.

mod choice;
mod replace;

use std::fmt;

use crate::types::Replacements;

pub use choice::{
    choose,
    plural_index,
};
pub use replace::replace_placeholders;

/// String templating used by the translator.
///
/// The translator only hands over the raw line; how placeholders and plural
/// variants are written is up to the implementation.
pub trait MessageFormatter: Send + Sync + fmt::Debug {
    /// Substitute `replace` into `line`.
    fn replace(&self, line: &str, replace: &Replacements) -> String;

    /// Select the variant of `line` matching `count`.
    fn choose(&self, line: &str, count: i64, locale: &str) -> String;
}

/// `:name` placeholders and `|`-separated plural variants.
#[derive(Debug, Default, Clone, Copy)]
pub struct PlaceholderFormatter;

impl MessageFormatter for PlaceholderFormatter {
    fn replace(&self, line: &str, replace: &Replacements) -> String {
        replace_placeholders(line, replace)
    }

    fn choose(&self, line: &str, count: i64, locale: &str) -> String {
        choose(line, count, locale)
    }
}
