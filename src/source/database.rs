//! Lines stored in a [`TranslationStore`].

use std::sync::Arc;

use super::{
    KeyValueSource,
    SourceError,
};
use crate::store::TranslationStore;
use crate::types::{
    TranslationMap,
    TranslationValue,
    UNGROUPED,
    insert_dotted,
};

/// Projects the rows of a group onto one locale.
///
/// Rows without a value for the locale are skipped, so a blank row never
/// shadows a file value. Keys of the ungrouped namespace stay flat; keys of
/// any other group are expanded on `.` into nested groups.
#[derive(Debug, Clone)]
pub struct DatabaseSource {
    store: Arc<dyn TranslationStore>,
}

impl DatabaseSource {
    #[must_use]
    pub fn new(store: Arc<dyn TranslationStore>) -> Self {
        Self { store }
    }
}

impl KeyValueSource for DatabaseSource {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        let entries = self.store.group_entries(group)?;

        let mut lines = TranslationMap::new();
        for entry in &entries {
            let Some(value) = entry.value(locale) else {
                continue;
            };
            let value = TranslationValue::text(value);
            if group == UNGROUPED {
                lines.insert(entry.key.clone(), value);
            } else {
                insert_dotted(&mut lines, &entry.key, value);
            }
        }

        tracing::trace!(locale, group, rows = entries.len(), lines = lines.len(), "Loaded database lines");
        Ok(lines)
    }
}
