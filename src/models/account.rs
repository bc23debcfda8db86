// Online Accounts GTK - Account Model
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Display copy of an account owned by the accounts service.

use std::fmt;

/// Unique account identifier as assigned by the accounts service.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AccountId(String);

impl AccountId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// An online account as last reported by the service.
///
/// The service owns the account; this is a snapshot refreshed on every
/// change notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Object path the service exports the account under.
    pub object_path: String,
    /// Provider type key, e.g. `google`.
    pub provider_type: String,
    /// Human-readable provider name.
    pub provider_name: String,
    /// Serialized icon (as produced by `g_icon_to_string`).
    pub provider_icon: String,
    /// Label identifying the account to the user, e.g. an email address.
    pub presentation_identity: String,
    /// Credentials need refreshing.
    pub attention_needed: bool,
    /// Account is managed by an administrator and cannot be removed.
    pub locked: bool,
}

impl Account {
    /// Create an account with just the identifying fields set.
    pub fn new(id: impl Into<String>, provider_type: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            object_path: format!("{}/{}", crate::models::GOA_ACCOUNTS_PATH, id),
            id: AccountId::new(id),
            provider_type: provider_type.into(),
            provider_name: String::new(),
            provider_icon: String::new(),
            presentation_identity: String::new(),
            attention_needed: false,
            locked: false,
        }
    }

    /// Provider name, falling back to the provider type key.
    pub fn display_provider(&self) -> &str {
        if self.provider_name.is_empty() {
            &self.provider_type
        } else {
            &self.provider_name
        }
    }

    /// Whether the remove action may be offered.
    pub fn can_remove(&self) -> bool {
        !self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_ids_order_lexically() {
        let mut ids = vec![
            AccountId::new("account_1700000002_0"),
            AccountId::new("account_1700000000_0"),
            AccountId::new("account_1700000001_0"),
        ];
        ids.sort();
        assert_eq!(ids[0].as_str(), "account_1700000000_0");
        assert_eq!(ids[2].as_str(), "account_1700000002_0");
    }

    #[test]
    fn test_display_provider_falls_back_to_type() {
        let mut account = Account::new("account_1", "imap_smtp");
        assert_eq!(account.display_provider(), "imap_smtp");
        account.provider_name = "IMAP and SMTP".to_string();
        assert_eq!(account.display_provider(), "IMAP and SMTP");
    }

    #[test]
    fn test_locked_account_cannot_be_removed() {
        let mut account = Account::new("account_1", "google");
        assert!(account.can_remove());
        account.locked = true;
        assert!(!account.can_remove());
        assert_eq!(account.object_path, "/org/gnome/OnlineAccounts/Accounts/account_1");
    }
}
