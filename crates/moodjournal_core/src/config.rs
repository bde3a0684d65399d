//! Store configuration.
//!
//! # Responsibility
//! - Carry the knobs that change store behavior (flush mode, duplicate ids).
//! - Load them from JSON for hosts that keep settings in a file.
//!
//! # Invariants
//! - Every field has a default, so `{}` is a valid configuration.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// How `AddEntry` treats an id that already exists in the collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateIdPolicy {
    /// Leave the collection unchanged and report the action as rejected.
    #[default]
    Reject,
    /// Replace the stored entry in place, keeping its position.
    Overwrite,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Flush the write queue after every applied action.
    pub autoflush: bool,
    pub duplicate_id_policy: DuplicateIdPolicy,
    /// Locale used when the `locale` slice has never been stored.
    pub default_locale: String,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            autoflush: true,
            duplicate_id_policy: DuplicateIdPolicy::Reject,
            default_locale: "en".to_string(),
        }
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    InvalidLocale(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid store config: {err}"),
            Self::InvalidLocale(value) => write!(f, "invalid default locale: `{value}`"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::InvalidLocale(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

impl StoreConfig {
    /// Parses a JSON config document; missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_locale.trim().is_empty() {
            return Err(ConfigError::InvalidLocale(self.default_locale.clone()));
        }
        Ok(())
    }
}
