//! 設定管理を行うモジュール

use std::path::{
    Path,
    PathBuf,
};

use super::{
    ConfigError,
    TranslatorSettings,
    loader,
};

/// 設定管理を行う
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 現在の設定
    current_settings: TranslatorSettings,
}

impl ConfigManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current_settings: TranslatorSettings::default() }
    }

    /// 設定を読み込む
    ///
    /// 相対パス (`langPath`, `database.path`) は `config_dir` を基準に解決する。
    ///
    /// # Arguments
    /// * `config_dir` - 設定ファイルを探すディレクトリ
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー
    pub fn load_settings(&mut self, config_dir: Option<PathBuf>) -> Result<(), ConfigError> {
        tracing::debug!("Loading settings from: {:?}", config_dir);

        let mut settings = if let Some(dir) = &config_dir {
            loader::load_from_dir(dir)?.map_or_else(TranslatorSettings::default, |loaded| {
                tracing::debug!("Loaded settings file: {:?}", loaded);
                loaded
            })
        } else {
            TranslatorSettings::default()
        };

        // バリデーション
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        if let Some(dir) = &config_dir {
            resolve_relative_paths(&mut settings, dir);
        }

        self.current_settings = settings;
        tracing::debug!("Settings loaded successfully: {:?}", self.current_settings);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn get_settings(&self) -> &TranslatorSettings {
        &self.current_settings
    }
}

/// 相対パスを設定ディレクトリ基準の絶対パスに変換
fn resolve_relative_paths(settings: &mut TranslatorSettings, config_dir: &Path) {
    if settings.lang_path.is_relative() {
        settings.lang_path = config_dir.join(&settings.lang_path);
    }
    if !settings.database.is_in_memory() && settings.database.path.is_relative() {
        settings.database.path = config_dir.join(&settings.database.path);
    }
}
