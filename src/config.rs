//! Markup contract and defaults
/// Configuration types, validation and the settings file
mod types;

pub use types::{
    CONFIG_FILE_NAME,
    ConfigError,
    I18nSettings,
    ValidationError,
};
