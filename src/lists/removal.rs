// Online Accounts GTK - Pending Removal
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Two-phase account removal.
//!
//! Removing an account first hides its row and offers an undo window. Only
//! when the window elapses (or the user confirms) is the request sent to the
//! accounts service.
//!
//! ```text
//!   Visible ──remove──▶ PendingRemoval ──timeout/confirm──▶ Removed
//!      ▲                     │
//!      └────────undo─────────┘
//! ```

use crate::models::Account;

/// Where an account is in the removal gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemovalState {
    /// Row is shown.
    Visible,
    /// Row is hidden; undo is still possible.
    PendingRemoval,
    /// Removal request sent (or the row is otherwise gone).
    Removed,
}

/// Identifies one removal gesture. Undo/commit with a stale ticket is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RemovalTicket(u64);

impl RemovalTicket {
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// A hidden account waiting for its undo window to close.
#[derive(Debug, Clone)]
pub struct PendingRemoval {
    ticket: RemovalTicket,
    account: Account,
}

impl PendingRemoval {
    pub fn ticket(&self) -> RemovalTicket {
        self.ticket
    }

    pub fn account(&self) -> &Account {
        &self.account
    }
}

/// Holds at most one pending removal.
#[derive(Debug, Default)]
pub struct RemovalSlot {
    pending: Option<PendingRemoval>,
    next_ticket: u64,
}

impl RemovalSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a removal. Returns the new ticket and any removal it superseded,
    /// which the caller must commit right away.
    pub fn begin(&mut self, account: Account) -> (RemovalTicket, Option<Account>) {
        self.next_ticket += 1;
        let ticket = RemovalTicket(self.next_ticket);
        let superseded = self
            .pending
            .replace(PendingRemoval { ticket, account })
            .map(|previous| previous.account);
        (ticket, superseded)
    }

    /// Take the pending account back if `ticket` is still current.
    pub fn take(&mut self, ticket: RemovalTicket) -> Option<Account> {
        match &self.pending {
            Some(pending) if pending.ticket == ticket => {
                self.pending.take().map(|pending| pending.account)
            }
            _ => None,
        }
    }

    /// Drop the pending removal for `id`, whatever its ticket.
    pub fn take_by_id(&mut self, id: &crate::models::AccountId) -> Option<Account> {
        match &self.pending {
            Some(pending) if &pending.account.id == id => {
                self.pending.take().map(|pending| pending.account)
            }
            _ => None,
        }
    }

    pub fn pending(&self) -> Option<&PendingRemoval> {
        self.pending.as_ref()
    }

    /// Replace the pending account's snapshot after a change notification.
    pub fn refresh(&mut self, account: &Account) -> bool {
        match &mut self.pending {
            Some(pending) if pending.account.id == account.id => {
                pending.account = account.clone();
                true
            }
            _ => false,
        }
    }

    pub fn is_pending(&self, id: &crate::models::AccountId) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|pending| &pending.account.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_requires_current_ticket() {
        let mut slot = RemovalSlot::new();
        let (ticket, superseded) = slot.begin(Account::new("a", "google"));
        assert!(superseded.is_none());

        let stale = RemovalTicket(ticket.id() + 100);
        assert!(slot.take(stale).is_none());
        assert!(slot.pending().is_some());

        let account = slot.take(ticket).expect("current ticket");
        assert_eq!(account.id.as_str(), "a");
        assert!(slot.take(ticket).is_none());
    }

    #[test]
    fn test_new_removal_supersedes_previous() {
        let mut slot = RemovalSlot::new();
        let (first, _) = slot.begin(Account::new("a", "google"));
        let (second, superseded) = slot.begin(Account::new("b", "google"));

        assert_ne!(first, second);
        assert_eq!(superseded.map(|a| a.id.to_string()), Some("a".to_string()));
        assert!(slot.take(first).is_none());
        assert!(slot.is_pending(&"b".into()));
    }

    #[test]
    fn test_refresh_only_touches_pending_account() {
        let mut slot = RemovalSlot::new();
        slot.begin(Account::new("a", "google"));

        let mut changed = Account::new("a", "google");
        changed.attention_needed = true;
        assert!(slot.refresh(&changed));
        assert!(!slot.refresh(&Account::new("b", "google")));
        assert!(slot.pending().is_some_and(|p| p.account().attention_needed));
    }
}
