// Online Accounts GTK - Shell Reactions
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! What the main window does in response to user and service events.
//!
//! The window performs these steps in order; keeping them here lets the
//! ordering be checked without a display.

use crate::models::Account;

/// One step the main window performs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellAction {
    /// Push the detail page for the account.
    OpenDetail(Account),
    /// Run the provider's show-account flow.
    ShowAccount(Account),
    /// Take the account snapshot and follow notifications.
    WatchAccounts,
    /// Enumerate providers into the providers page.
    LoadProviders,
    /// Leave the application.
    Quit,
}

/// An account row was activated, or an add flow produced a new account.
pub fn account_opened(account: &Account) -> Vec<ShellAction> {
    vec![
        ShellAction::OpenDetail(account.clone()),
        ShellAction::ShowAccount(account.clone()),
    ]
}

/// The accounts service connection attempt finished.
///
/// Providers are only offered once the service is reachable.
pub fn client_acquired(connected: bool) -> Vec<ShellAction> {
    if connected {
        vec![ShellAction::WatchAccounts, ShellAction::LoadProviders]
    } else {
        vec![ShellAction::Quit]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activation_opens_detail_then_show_flow() {
        let account = Account::new("account_1_0", "google");
        assert_eq!(
            account_opened(&account),
            vec![
                ShellAction::OpenDetail(account.clone()),
                ShellAction::ShowAccount(account),
            ]
        );
    }

    #[test]
    fn test_providers_load_after_client() {
        assert_eq!(
            client_acquired(true),
            vec![ShellAction::WatchAccounts, ShellAction::LoadProviders]
        );
    }

    #[test]
    fn test_client_failure_loads_nothing() {
        let actions = client_acquired(false);
        assert_eq!(actions, vec![ShellAction::Quit]);
        assert!(!actions.contains(&ShellAction::LoadProviders));
    }
}
