//! Audits the dashboard translation table.
//!
//! Exits with a failure status when a key is missing from a locale. With
//! `--export`, the table is written to stdout as JSON.

use std::io::Write;
use std::process::ExitCode;

use clap::Parser;
use dashboard_i18n::DASHBOARD;
use dashboard_i18n::cli::Cli;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match cli.translator() {
        Ok(Some(i18n)) => {
            tracing::info!(
                locale = %i18n.active_locale(),
                stored = ?i18n.stored_tag(),
                storage = %i18n.storage().path().display(),
                "Active locale"
            );
        }
        Ok(None) => {}
        Err(e) => {
            tracing::error!("{e}");
            return ExitCode::FAILURE;
        }
    }

    let missing = DASHBOARD.audit();
    for entry in &missing {
        tracing::warn!(locale = %entry.locale, key = %entry.key, "Missing translation");
    }

    if cli.export {
        let json = match serde_json::to_string_pretty(&DASHBOARD.to_json()) {
            Ok(json) => json,
            Err(e) => {
                tracing::error!("Failed to serialize translation table: {e}");
                return ExitCode::FAILURE;
            }
        };
        if let Err(e) = writeln!(std::io::stdout().lock(), "{json}") {
            tracing::error!("Failed to write translation table: {e}");
            return ExitCode::FAILURE;
        }
    }

    if missing.is_empty() {
        tracing::info!("Translation table is complete");
        ExitCode::SUCCESS
    } else {
        tracing::error!(count = missing.len(), "Translation table is incomplete");
        ExitCode::FAILURE
    }
}
