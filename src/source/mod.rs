//! Key/value sources that produce the lines of one `(locale, group)`.

mod aggregate;
mod database;
mod file;

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;

use crate::store::StoreError;
use crate::types::TranslationMap;

pub use aggregate::AggregateSource;
pub use database::DatabaseSource;
pub use file::FileSource;

/// Errors raised while loading a group from a source.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read translation file {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse translation file {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Translation file {path:?} must contain a JSON object")]
    NotAnObject { path: PathBuf },

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl SourceError {
    /// Recoverable errors are replaced by an empty contribution; store
    /// failures are not.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Store(_))
    }
}

/// A source of translation lines.
///
/// `group` is either [`crate::types::UNGROUPED`] for flat keys or the name of a
/// nested group (`"errors"`, `"validation"`, ...). A group the source does not
/// know yields an empty map.
pub trait KeyValueSource: Send + Sync + fmt::Debug {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError>;
}

impl<T: KeyValueSource + ?Sized> KeyValueSource for Box<T> {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        (**self).load(locale, group)
    }
}

impl<T: KeyValueSource + ?Sized> KeyValueSource for Arc<T> {
    fn load(&self, locale: &str, group: &str) -> Result<TranslationMap, SourceError> {
        (**self).load(locale, group)
    }
}
