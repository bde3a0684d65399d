//! Profile and preference use-case service.
//!
//! # Responsibility
//! - Update name/email, record wallet connect/disconnect results.
//! - Update theme, locale and the selected calendar day.
//!
//! # Invariants
//! - Logout clears the wallet field only; name, email and entries remain.
//! - An empty address from the wallet provider never overwrites a stored one.

use crate::model::profile::{Locale, Profile, Theme};
use crate::persist::storage::KeyValueStorage;
use crate::store::action::Action;
use crate::store::Store;
use log::info;
use std::error::Error;
use std::fmt::{Display, Formatter};

const WALLET_HEAD_CHARS: usize = 6;
const WALLET_TAIL_CHARS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileServiceError {
    InvalidLocale(String),
}

impl Display for ProfileServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidLocale(value) => write!(f, "invalid locale: `{value}`"),
        }
    }
}

impl Error for ProfileServiceError {}

pub struct ProfileService<'s, S: KeyValueStorage> {
    store: &'s mut Store<S>,
}

impl<'s, S: KeyValueStorage> ProfileService<'s, S> {
    pub fn new(store: &'s mut Store<S>) -> Self {
        Self { store }
    }

    pub fn profile(&self) -> &Profile {
        self.store.profile()
    }

    /// Overwrites name and email together, as the profile form submits them.
    pub fn update_profile(&mut self, name: impl Into<String>, email: impl Into<String>) -> Profile {
        self.store.dispatch(Action::SetName(name.into()));
        self.store.dispatch(Action::SetEmail(email.into()));
        self.store.profile().clone()
    }

    /// Records the address reported by the wallet provider.
    ///
    /// Returns `false` when the provider reported no address.
    pub fn connect_wallet(&mut self, address: &str) -> bool {
        let address = address.trim();
        if address.is_empty() {
            return false;
        }
        self.store.dispatch(Action::SetWallet(address.to_string()));
        info!("event=wallet_connect module=service status=ok");
        true
    }

    /// Clears the wallet association after the provider disconnected.
    pub fn logout(&mut self) {
        self.store.dispatch(Action::SetWallet(String::new()));
        info!("event=wallet_disconnect module=service status=ok");
    }

    /// Shortened, upper-cased wallet for display; empty when disconnected.
    pub fn wallet_display(&self) -> String {
        shorten_wallet(&self.store.profile().wallet).to_uppercase()
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.store.dispatch(Action::SetTheme(theme));
    }

    pub fn set_locale(&mut self, code: &str) -> Result<(), ProfileServiceError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ProfileServiceError::InvalidLocale(code.to_string()));
        }
        self.store.dispatch(Action::SetLocale(Locale::new(code)));
        Ok(())
    }

    /// Selects the calendar day shown by date-based views.
    pub fn select_date(&mut self, epoch_ms: i64) {
        self.store.dispatch(Action::SetDate(epoch_ms));
    }
}

/// Keeps the head and tail of an address: `0x1234...cdef`.
pub fn shorten_wallet(address: &str) -> String {
    let chars = address.chars().collect::<Vec<_>>();
    if chars.len() <= WALLET_HEAD_CHARS + WALLET_TAIL_CHARS {
        return address.to_string();
    }
    let head = chars[..WALLET_HEAD_CHARS].iter().collect::<String>();
    let tail = chars[chars.len() - WALLET_TAIL_CHARS..]
        .iter()
        .collect::<String>();
    format!("{head}...{tail}")
}

#[cfg(test)]
mod tests {
    use super::shorten_wallet;

    #[test]
    fn shorten_keeps_head_and_tail() {
        assert_eq!(
            shorten_wallet("0x1234567890abcdef1234567890abcdef12345678"),
            "0x1234...5678"
        );
    }

    #[test]
    fn short_and_empty_addresses_are_unchanged() {
        assert_eq!(shorten_wallet(""), "");
        assert_eq!(shorten_wallet("0xabc"), "0xabc");
    }
}
