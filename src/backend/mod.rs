// Online Accounts GTK - Backends
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Clients for the collaborators that do the real work.
//!
//! - **GoaClient**: the accounts service on the session bus
//! - **ProviderBackend**: provider catalog and the add/manage dialogs

mod goa_client;
mod providers;

pub use goa_client::GoaClient;
pub use providers::ProviderBackend;

use crate::models::{Account, AccountId};

/// Notification from the accounts service.
#[derive(Debug, Clone)]
pub enum AccountEvent {
    Added(Account),
    Changed(Account),
    Removed(AccountId),
}

/// Receives account notifications on the main loop.
pub trait AccountsObserver {
    fn account_added(&self, account: Account);
    fn account_changed(&self, account: Account);
    fn account_removed(&self, id: &AccountId);
}

impl AccountEvent {
    /// Deliver this event to the matching observer method.
    pub fn dispatch(self, observer: &impl AccountsObserver) {
        match self {
            Self::Added(account) => observer.account_added(account),
            Self::Changed(account) => observer.account_changed(account),
            Self::Removed(id) => observer.account_removed(&id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
    }

    impl AccountsObserver for Recorder {
        fn account_added(&self, account: Account) {
            self.calls.borrow_mut().push(format!("added {}", account.id));
        }

        fn account_changed(&self, account: Account) {
            self.calls.borrow_mut().push(format!("changed {}", account.id));
        }

        fn account_removed(&self, id: &AccountId) {
            self.calls.borrow_mut().push(format!("removed {}", id));
        }
    }

    #[test]
    fn test_dispatch_routes_events() {
        let recorder = Recorder::default();
        AccountEvent::Added(Account::new("a", "google")).dispatch(&recorder);
        AccountEvent::Changed(Account::new("a", "google")).dispatch(&recorder);
        AccountEvent::Removed(AccountId::new("a")).dispatch(&recorder);

        assert_eq!(
            *recorder.calls.borrow(),
            vec!["added a", "changed a", "removed a"]
        );
    }
}
