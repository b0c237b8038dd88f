//! Command line access to the translation loader.

use std::io::{
    self,
    Write,
};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{
    Parser,
    Subcommand,
};
use thiserror::Error;
use tracing_subscriber::EnvFilter;
use translation_loader::config::{
    ConfigError,
    ConfigManager,
};
use translation_loader::store::{
    SqliteStore,
    StoreError,
    TranslationStore,
};
use translation_loader::{
    Replacements,
    Translated,
    Translator,
    TranslatorError,
};

#[derive(Parser, Debug)]
#[command(name = "translation-loader", version, about = "Resolve translations from files and a database")]
struct Cli {
    /// Directory holding `.translation-loader.json`.
    #[arg(long, value_name = "DIR", default_value = ".", global = true)]
    config_dir: PathBuf,

    /// Locale to resolve in (defaults to the configured locale).
    #[arg(long, value_name = "LOCALE", global = true)]
    locale: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the translation for a key.
    Get {
        key: String,
        /// Placeholder replacement (`name=value`); repeatable.
        #[arg(short = 'p', long = "param", value_name = "NAME=VALUE", value_parser = parse_replacement)]
        params: Vec<(String, String)>,
        /// Select the plural variant for this count.
        #[arg(long)]
        count: Option<i64>,
    },
    /// Print whether a key resolves.
    Has { key: String },
    /// Set the value of a stored translation.
    Set { group: String, key: String, locale: String, value: String },
    /// Print the number of stored translations.
    Count,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Translator(#[from] TranslatorError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Failed to render translation: {0}")]
    Render(#[from] serde_json::Error),
    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),
}

fn parse_replacement(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, value)| (name.to_string(), value.to_string()))
        .ok_or_else(|| format!("expected NAME=VALUE, got '{raw}'"))
}

fn print_translated(out: &mut impl Write, translated: &Translated) -> Result<(), CliError> {
    match translated {
        Translated::Text(line) => writeln!(out, "{line}")?,
        Translated::Group(group) => writeln!(out, "{}", serde_json::to_string_pretty(group)?)?,
    }
    Ok(())
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(cli.config_dir))?;
    let settings = config_manager.get_settings();
    let locale = cli.locale.as_deref();
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::Get { key, params, count } => {
            let translator = Translator::from_settings(settings)?;
            let replace: Replacements = params.into_iter().collect();
            let translated = match count {
                Some(count) => translator.choice(&key, count, &replace, locale)?,
                None => translator.resolve(&key, &replace, locale)?,
            };
            translator.flush_missing_translations();
            print_translated(&mut out, &translated)?;
        }
        Commands::Has { key } => {
            let translator = Translator::from_settings(settings)?;
            writeln!(out, "{}", translator.has(&key, locale)?)?;
        }
        Commands::Set { group, key, locale, value } => {
            let store = SqliteStore::from_settings(&settings.database, &settings.locales)?;
            store.upsert_value(&group, &key, &locale, Some(&value))?;
            tracing::debug!(%group, %key, %locale, "Stored translation");
        }
        Commands::Count => {
            let store = SqliteStore::from_settings(&settings.database, &settings.locales)?;
            writeln!(out, "{}", store.count()?)?;
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "translation-loader failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
#[allow(clippy::panic)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;
    use translation_loader::config::CONFIG_FILE_NAME;

    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("translation-loader").chain(args.iter().copied())).unwrap()
    }

    fn config_dir(config: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), config).unwrap();
        dir
    }

    #[rstest]
    #[case("name=Ada", Some(("name", "Ada")))]
    #[case("a=b", Some(("a", "b")))]
    #[case("a=b=c", Some(("a", "b=c")))]
    #[case("empty=", Some(("empty", "")))]
    #[case("=x", None)]
    #[case("noequals", None)]
    fn test_parse_replacement(#[case] raw: &str, #[case] expected: Option<(&str, &str)>) {
        let parsed = parse_replacement(raw).ok();

        assert_eq!(parsed.as_ref().map(|(name, value)| (name.as_str(), value.as_str())), expected);
    }

    #[rstest]
    fn test_parse_get_with_params_and_count() {
        let cli = parse(&[
            "--locale", "nl", "get", "cart.items", "-p", "name=Ada", "--param", "what=apples",
            "--count", "3",
        ]);

        assert_eq!(cli.locale.as_deref(), Some("nl"));
        assert_eq!(cli.config_dir, PathBuf::from("."));
        let (key, params, count) = match cli.command {
            Commands::Get { key, params, count } => (key, params, count),
            other => panic!("expected get, got {other:?}"),
        };
        assert_eq!(key, "cart.items");
        assert_eq!(
            params,
            [("name".to_string(), "Ada".to_string()), ("what".to_string(), "apples".to_string())]
        );
        assert_eq!(count, Some(3));
    }

    #[rstest]
    fn test_parse_global_options_after_subcommand() {
        let cli = parse(&["has", "file.key", "--config-dir", "/srv/app", "--locale", "en"]);

        assert_eq!(cli.config_dir, PathBuf::from("/srv/app"));
        assert_eq!(cli.locale.as_deref(), Some("en"));
        assert!(matches!(cli.command, Commands::Has { key } if key == "file.key"));
    }

    #[rstest]
    fn test_parse_set() {
        let cli = parse(&["set", "*", "welcome", "nl", "Welkom"]);

        let (group, key, locale, value) = match cli.command {
            Commands::Set { group, key, locale, value } => (group, key, locale, value),
            other => panic!("expected set, got {other:?}"),
        };
        assert_eq!((group.as_str(), key.as_str()), ("*", "welcome"));
        assert_eq!((locale.as_str(), value.as_str()), ("nl", "Welkom"));
    }

    #[rstest]
    fn test_parse_count() {
        assert!(matches!(parse(&["count"]).command, Commands::Count));
    }

    #[rstest]
    #[case(&["get"])]
    #[case(&["get", "file.key", "-p", "noequals"])]
    #[case(&["get", "file.key", "--count", "many"])]
    #[case(&["set", "*", "welcome", "nl"])]
    #[case(&[])]
    fn test_parse_rejects_invalid_arguments(#[case] args: &[&str]) {
        let result =
            Cli::try_parse_from(std::iter::once("translation-loader").chain(args.iter().copied()));

        assert!(result.is_err());
    }

    #[rstest]
    fn test_run_set_then_count_uses_the_configured_database() {
        let dir = config_dir(r#"{"locales": ["en", "nl"], "database": {"path": "cli.sqlite3"}}"#);
        let dir_arg = dir.path().to_str().unwrap();

        run(parse(&["--config-dir", dir_arg, "set", "*", "welcome", "nl", "Welkom"])).unwrap();
        run(parse(&["--config-dir", dir_arg, "count"])).unwrap();

        let store = SqliteStore::open(
            &dir.path().join("cli.sqlite3"),
            &["en".to_string(), "nl".to_string()],
            std::time::Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(store.count().unwrap(), 1);
        assert_eq!(
            store.find("*", "welcome").unwrap().unwrap().value("nl"),
            Some("Welkom")
        );
    }

    #[rstest]
    fn test_run_get_reads_language_files() {
        let dir = config_dir(r#"{"database": {"path": ":memory:"}}"#);
        fs::create_dir_all(dir.path().join("lang/en")).unwrap();
        fs::write(dir.path().join("lang/en/file.json"), r#"{"key": "en value"}"#).unwrap();

        let result = run(parse(&["--config-dir", dir.path().to_str().unwrap(), "get", "file.key"]));

        assert!(result.is_ok());
    }

    #[rstest]
    fn test_run_invalid_config_is_an_error() {
        let dir = config_dir(r#"{"locales": []}"#);

        let result = run(parse(&["--config-dir", dir.path().to_str().unwrap(), "count"]));

        assert!(matches!(result, Err(CliError::Config(ConfigError::ValidationErrors(_)))));
    }

    #[rstest]
    fn test_run_unknown_store_locale_is_an_error() {
        let dir = config_dir(r#"{"locales": ["en"], "database": {"path": ":memory:"}}"#);

        let result =
            run(parse(&["--config-dir", dir.path().to_str().unwrap(), "set", "*", "k", "fr", "v"]));

        assert!(matches!(result, Err(CliError::Store(StoreError::InvalidLocale(_)))));
    }
}
