//! translation-loader
//!
//! データベースの行をファイルの翻訳より優先して解決する翻訳ローダー
//!
//! - [`source`]: ファイル / DB / 合成ソース
//! - [`store`]: 翻訳行の永続化 (SQLite)
//! - [`translator`]: キャッシュ・フォールバック・未翻訳キーの処理
//! - [`format`]: プレースホルダー置換と複数形の選択

pub mod config;
pub mod format;
pub mod source;
pub mod store;
pub mod translator;
pub mod types;

#[cfg(test)]
mod test_utils;

// よく使う型を再エクスポート
pub use translator::{
    LoadedCache,
    MissingKeyCallback,
    Translated,
    Translator,
    TranslatorBuilder,
    TranslatorError,
};
pub use types::{
    Replacements,
    TranslationMap,
    TranslationValue,
    replacements,
};
