//! Settings for the markup contract, their validation and the config file

use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

use crate::locale::Locale;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "textAttribute")
    pub field_path: String,
    /// What is wrong and how to fix it
    pub message: String,
}

impl ValidationError {
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Name of the settings file looked up in a directory.
pub const CONFIG_FILE_NAME: &str = ".dashboard-i18n.json";

/// Markup contract between the host page and the synchronizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct I18nSettings {
    /// Attribute whose value is the key for the element's text.
    pub text_attribute: String,
    /// Attribute whose value is the key for the element's placeholder.
    pub placeholder_attribute: String,

    /// Class shared by the language switch controls.
    pub language_button_class: String,
    /// Attribute on a language switch control naming its locale.
    pub language_attribute: String,
    /// Class marking the control of the active locale.
    pub active_class: String,

    /// Storage key holding the active locale tag.
    pub storage_key: String,
    /// Locale used when storage holds no recognized tag.
    pub default_locale: String,
}

impl I18nSettings {
    /// Loads `.dashboard-i18n.json` from `dir` and validates it.
    ///
    /// A missing file yields the defaults. Fields absent from the file keep
    /// their default values.
    ///
    /// # Errors
    /// - The file exists but cannot be read
    /// - The file is not valid JSON for these settings
    /// - The loaded settings fail [`I18nSettings::validate`]
    pub fn load_from_dir(dir: &Path) -> Result<Self, ConfigError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if !config_path.exists() {
            tracing::debug!("Configuration file not found: {:?}", config_path);
            return Ok(Self::default());
        }

        tracing::debug!("Loading configuration from: {:?}", config_path);

        let content = std::fs::read_to_string(&config_path)?;
        let settings: Self = serde_json::from_str(&content)?;
        settings.validate().map_err(ConfigError::ValidationErrors)?;

        Ok(settings)
    }

    /// Locale used when storage holds no recognized tag.
    ///
    /// An invalid `default_locale` falls back to [`Locale::FALLBACK`].
    #[must_use]
    pub fn default_locale(&self) -> Locale {
        Locale::resolve_tag(Some(&self.default_locale))
    }

    /// # Errors
    /// - Empty name
    /// - Name containing whitespace
    /// - Unsupported default locale
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        let names = [
            ("textAttribute", &self.text_attribute),
            ("placeholderAttribute", &self.placeholder_attribute),
            ("languageButtonClass", &self.language_button_class),
            ("languageAttribute", &self.language_attribute),
            ("activeClass", &self.active_class),
            ("storageKey", &self.storage_key),
        ];

        for (field, value) in names {
            if value.is_empty() {
                errors.push(ValidationError::new(
                    field,
                    "The name cannot be empty. Please specify a value or remove this field",
                ));
            } else if value.chars().any(char::is_whitespace) {
                errors.push(ValidationError::new(
                    field,
                    format!("Invalid name '{value}': whitespace is not allowed"),
                ));
            }
        }

        if self.text_attribute == self.placeholder_attribute && !self.text_attribute.is_empty() {
            errors.push(ValidationError::new(
                "textAttribute/placeholderAttribute",
                "Text and placeholder markers must use different attributes",
            ));
        }

        if Locale::from_tag(&self.default_locale).is_none() {
            errors.push(ValidationError::new(
                "defaultLocale",
                format!(
                    "Unsupported locale '{}'. Expected one of: fr, en",
                    self.default_locale
                ),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for I18nSettings {
    fn default() -> Self {
        Self {
            text_attribute: "data-i18n".to_string(),
            placeholder_attribute: "data-i18n-placeholder".to_string(),
            language_button_class: "lang-btn".to_string(),
            language_attribute: "data-lang".to_string(),
            active_class: "active".to_string(),
            storage_key: "language".to_string(),
            default_locale: Locale::FALLBACK.tag().to_string(),
        }
    }
}
