//! Bookkeeping for keys that did not resolve.

use std::collections::HashSet;

use super::key::is_in_namespace;

/// Keys seen as missing during the lifetime of a translator.
///
/// Every `(group, key)` is accepted once; later sightings are ignored. Pending
/// keys wait for [`MissingKeyQueue::drain`].
#[derive(Debug, Default)]
pub struct MissingKeyQueue {
    attempted: HashSet<(String, String)>,
    pending: Vec<(String, String)>,
}

impl MissingKeyQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `(group, key)`; returns false if it was already recorded.
    pub fn enqueue(&mut self, group: &str, key: &str) -> bool {
        let entry = (group.to_string(), key.to_string());
        if !self.attempted.insert(entry.clone()) {
            return false;
        }
        self.pending.push(entry);
        true
    }

    /// Takes every pending key, oldest first.
    pub fn drain(&mut self) -> Vec<(String, String)> {
        std::mem::take(&mut self.pending)
    }

    #[must_use]
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    #[must_use]
    pub fn contains(&self, group: &str, key: &str) -> bool {
        self.attempted.contains(&(group.to_string(), key.to_string()))
    }
}

/// Key prefixes owned by the host validator.
///
/// Lookups in these namespaces happen on every validation failure and are
/// expected to miss, so they never create placeholder rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReservedNamespaces(Vec<String>);

impl ReservedNamespaces {
    #[must_use]
    pub fn new<I, S>(namespaces: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(namespaces.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|namespace| is_in_namespace(key, namespace))
    }
}

impl Default for ReservedNamespaces {
    fn default() -> Self {
        Self::new(["validation"])
    }
}
