//! Loaded translation buckets.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use crate::types::TranslationMap;

/// Lines already loaded, keyed by `(group, locale)`.
///
/// A bucket is stored even when empty so a group unknown to every source is
/// not loaded again.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedCache {
    buckets: HashMap<(String, String), TranslationMap>,
}

impl LoadedCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, group: &str, locale: &str, lines: TranslationMap) {
        self.buckets.insert((group.to_string(), locale.to_string()), lines);
    }

    #[must_use]
    pub fn get(&self, group: &str, locale: &str) -> Option<&TranslationMap> {
        self.buckets.get(&(group.to_string(), locale.to_string()))
    }

    #[must_use]
    pub fn is_loaded(&self, group: &str, locale: &str) -> bool {
        self.get(group, locale).is_some()
    }

    /// Number of loaded buckets.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Returns the bucket, loading it with `load` on the first access.
    ///
    /// A failed load leaves the bucket absent.
    pub(crate) fn get_or_try_load<E>(
        &mut self,
        group: &str,
        locale: &str,
        load: impl FnOnce() -> Result<TranslationMap, E>,
    ) -> Result<&TranslationMap, E> {
        match self.buckets.entry((group.to_string(), locale.to_string())) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => Ok(entry.insert(load()?)),
        }
    }
}
