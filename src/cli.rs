//! Command-line interface of the `dashboard-i18n` binary

use std::path::PathBuf;

use clap::Parser;

use crate::config::{
    ConfigError,
    I18nSettings,
};
use crate::storage::FileStorage;
use crate::sync::I18n;

/// Audits the dashboard translation table.
///
/// Exits with a failure status when a key is missing from a locale.
#[derive(Parser, Debug, Clone, PartialEq, Eq)]
#[command(name = "dashboard-i18n")]
#[command(about = "Audit and export the dashboard translation table")]
#[command(long_about = None)]
pub struct Cli {
    /// Write the table to stdout as JSON
    #[arg(short, long)]
    pub export: bool,

    /// Directory holding `.dashboard-i18n.json`
    #[arg(short, long, value_name = "DIR")]
    pub config: Option<PathBuf>,

    /// Storage file whose persisted locale should be reported
    #[arg(short, long, value_name = "FILE")]
    pub storage: Option<PathBuf>,
}

impl Cli {
    /// Settings from `--config`, or the defaults when it is not given.
    ///
    /// # Errors
    /// Returns an error if the settings file cannot be read, parsed or validated.
    pub fn settings(&self) -> Result<I18nSettings, ConfigError> {
        self.config
            .as_deref()
            .map_or_else(|| Ok(I18nSettings::default()), I18nSettings::load_from_dir)
    }

    /// Translator over `--storage`, if given.
    ///
    /// # Errors
    /// Returns an error if the settings cannot be loaded.
    pub fn translator(&self) -> Result<Option<I18n<FileStorage>>, ConfigError> {
        let Some(path) = &self.storage else {
            return Ok(None);
        };
        let settings = self.settings()?;
        Ok(Some(I18n::with_settings(FileStorage::open(path), settings)))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::CONFIG_FILE_NAME;
    use crate::locale::Locale;
    use crate::storage::Storage;

    #[rstest]
    #[case::none(&["dashboard-i18n"], false)]
    #[case::long(&["dashboard-i18n", "--export"], true)]
    #[case::short(&["dashboard-i18n", "-e"], true)]
    fn test_parse_export_flag(#[case] args: &[&str], #[case] expected: bool) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();

        assert_that!(cli.export, eq(expected));
        assert_that!(cli.config, none());
    }

    #[rstest]
    #[case::misspelled_flag(&["dashboard-i18n", "--exprt"])]
    #[case::stray_argument(&["dashboard-i18n", "export"])]
    #[case::missing_value(&["dashboard-i18n", "--config"])]
    fn test_unknown_arguments_are_rejected(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args.iter().copied()).is_err());
    }

    #[rstest]
    fn test_settings_from_config_dir() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE_NAME), r#"{"storageKey": "ui.lang"}"#).unwrap();
        let config = temp_dir.path().to_str().unwrap();

        let cli = Cli::try_parse_from(["dashboard-i18n", "--config", config]).unwrap();

        assert_that!(cli.settings().unwrap().storage_key, eq("ui.lang"));
    }

    #[rstest]
    fn test_settings_default_without_config() {
        let cli = Cli::try_parse_from(["dashboard-i18n"]).unwrap();

        assert_that!(cli.settings().unwrap(), eq(&I18nSettings::default()));
        assert_that!(cli.translator().unwrap(), none());
    }

    #[rstest]
    fn test_translator_reads_persisted_locale() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("storage.json");
        FileStorage::open(&path).set_item("language", "en").unwrap();
        let storage = path.to_str().unwrap();

        let cli = Cli::try_parse_from(["dashboard-i18n", "--storage", storage]).unwrap();
        let i18n = cli.translator().unwrap().unwrap();

        assert_that!(i18n.active_locale(), eq(Locale::En));
    }
}
