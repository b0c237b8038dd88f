//! Ordered composition of several sources.

use super::{
    DatabaseSource,
    FileSource,
    KeyValueSource,
    SourceError,
};
use crate::config::AggregateStrategy;
use crate::types::{
    TranslationMap,
    merge_translations,
};

/// Merges the lines of its sources in order.
///
/// For identical paths a later source wins; paths that only an earlier source
/// defines are kept. A source that fails with a recoverable error contributes
/// nothing.
#[derive(Debug, Default)]
pub struct AggregateSource {
    sources: Vec<Box<dyn KeyValueSource>>,
}

impl AggregateSource {
    #[must_use]
    pub fn new(sources: Vec<Box<dyn KeyValueSource>>) -> Self {
        Self { sources }
    }

    /// Builds the built-in composition named by `strategy`.
    #[must_use]
    pub fn from_strategy(
        strategy: AggregateStrategy,
        file: FileSource,
        database: DatabaseSource,
    ) -> Self {
        let sources: Vec<Box<dyn KeyValueSource>> = match strategy {
            AggregateStrategy::FileThenDatabase => vec![Box::new(file), Box::new(database)],
            AggregateStrategy::DatabaseThenFile => vec![Box::new(database), Box::new(file)],
            AggregateStrategy::FileOnly => vec![Box::new(file)],
            AggregateStrategy::DatabaseOnly => vec![Box::new(database)],
        };
        Self::new(sources)
    }

    /// Appends a source with the highest precedence so far.
    pub fn push(&mut self, source: impl KeyValueSource + 'static) {
        self.sources.push(Box::new(source));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl KeyValueSource for AggregateSource {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        let mut lines = TranslationMap::new();

        for source in &self.sources {
            match source.load(locale, group) {
                Ok(loaded) => merge_translations(&mut lines, loaded),
                Err(err) if err.is_recoverable() => {
                    tracing::warn!(locale, group, error = %err, "Skipping translation source");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(lines)
    }
}
