//! Device profile and preference models.
//!
//! # Invariants
//! - There is exactly one profile per store.
//! - An empty `wallet` means "not connected".

use serde::{Deserialize, Serialize};

/// Singleton user profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    /// External wallet address as returned by the wallet provider.
    #[serde(default)]
    pub wallet: String,
}

impl Profile {
    pub fn is_wallet_connected(&self) -> bool {
        !self.wallet.is_empty()
    }
}

/// Color scheme preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    Light,
    Dark,
    /// Follow the device setting.
    #[default]
    System,
}

/// Locale preference as a language code (`en`, `fr`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Locale(String);

impl Locale {
    pub const DEFAULT: &'static str = "en";

    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Locale {
    fn default() -> Self {
        Self::new(Self::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::{Locale, Profile, Theme};

    #[test]
    fn empty_wallet_means_disconnected() {
        let mut profile = Profile::default();
        assert!(!profile.is_wallet_connected());
        profile.wallet = "0xabc".to_string();
        assert!(profile.is_wallet_connected());
    }

    #[test]
    fn theme_and_locale_use_plain_json_values() {
        assert_eq!(serde_json::to_string(&Theme::Dark).unwrap(), "\"dark\"");
        assert_eq!(serde_json::to_string(&Locale::new("fr")).unwrap(), "\"fr\"");
        assert_eq!(Locale::default().as_str(), "en");
    }
}
