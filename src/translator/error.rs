use thiserror::Error;

use crate::config::ConfigError;
use crate::source::SourceError;
use crate::store::StoreError;

/// Errors that may surface from the translator
#[derive(Error, Debug)]
pub enum TranslatorError {
    /// A source could not load a group and the failure is not recoverable
    #[error("Failed to load translations: {0}")]
    Source(#[from] SourceError),
    /// The translation store could not be opened
    #[error(transparent)]
    Store(#[from] StoreError),
    /// The settings are invalid
    #[error(transparent)]
    Config(#[from] ConfigError),
}
