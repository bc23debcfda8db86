// Online Accounts GTK - Account List
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Local mirror of the service's account collection.
//!
//! Every mutation reports the row position it touched so the list box can
//! follow along one row at a time. Rows are kept sorted by account id.

use std::collections::HashSet;
use tracing::{debug, warn};

use super::removal::{RemovalSlot, RemovalState, RemovalTicket};
use crate::models::{Account, AccountId};

/// Row-level effect of a mutation, in visible-row coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListChange {
    Inserted(usize),
    Removed(usize),
    Updated(usize),
}

/// Result of a "removed" notification from the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    /// A visible row was dropped.
    Removed(usize),
    /// The account was hidden pending removal; the gesture is finished.
    PendingCompleted,
    /// The service confirmed a removal we requested.
    Confirmed,
    /// The account was never in the list.
    Unknown,
}

impl RemoveOutcome {
    /// Row change the list box has to mirror, if any.
    pub fn change(&self) -> Option<ListChange> {
        match self {
            Self::Removed(pos) => Some(ListChange::Removed(*pos)),
            _ => None,
        }
    }
}

/// Started removal: the row to hide and what else to do.
#[derive(Debug, Clone)]
pub struct BeginRemoval {
    pub ticket: RemovalTicket,
    /// Row that was hidden.
    pub position: usize,
    /// An earlier pending removal that must now be sent to the service.
    pub superseded: Option<Account>,
}

/// Sorted mirror of the accounts reported by the service.
#[derive(Debug, Default)]
pub struct AccountList {
    rows: Vec<Account>,
    removal: RemovalSlot,
    /// Removals sent to the service and not yet confirmed.
    requested: HashSet<AccountId>,
}

impl AccountList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of visible rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.rows.iter()
    }

    /// Account shown at `position`.
    pub fn get(&self, position: usize) -> Option<&Account> {
        self.rows.get(position)
    }

    pub fn find(&self, id: &AccountId) -> Option<&Account> {
        self.position(id).map(|pos| &self.rows[pos])
    }

    pub fn position(&self, id: &AccountId) -> Option<usize> {
        self.rows.binary_search_by(|row| row.id.cmp(id)).ok()
    }

    pub fn state_of(&self, id: &AccountId) -> RemovalState {
        if self.position(id).is_some() {
            RemovalState::Visible
        } else if self.removal.is_pending(id) {
            RemovalState::PendingRemoval
        } else {
            RemovalState::Removed
        }
    }

    /// The account currently hidden behind the undo affordance.
    pub fn pending_removal(&self) -> Option<&Account> {
        self.removal.pending().map(|pending| pending.account())
    }

    /// Ticket of the pending removal, if any.
    pub fn pending_ticket(&self) -> Option<RemovalTicket> {
        self.removal.pending().map(|pending| pending.ticket())
    }

    // ========================================================================
    // Service notifications
    // ========================================================================

    /// Load the initial snapshot.
    pub fn populate(&mut self, accounts: impl IntoIterator<Item = Account>) -> Vec<ListChange> {
        accounts
            .into_iter()
            .filter_map(|account| self.added(account))
            .collect()
    }

    /// "Account added" notification.
    pub fn added(&mut self, account: Account) -> Option<ListChange> {
        if self.removal.refresh(&account) {
            debug!("Account {} re-announced while pending removal", account.id);
            return None;
        }
        self.requested.remove(&account.id);

        match self.rows.binary_search_by(|row| row.id.cmp(&account.id)) {
            Ok(pos) => {
                self.rows[pos] = account;
                Some(ListChange::Updated(pos))
            }
            Err(pos) => {
                self.rows.insert(pos, account);
                Some(ListChange::Inserted(pos))
            }
        }
    }

    /// "Account changed" notification.
    pub fn changed(&mut self, account: Account) -> Option<ListChange> {
        if self.removal.refresh(&account) {
            return None;
        }
        match self.position(&account.id) {
            Some(pos) => {
                self.rows[pos] = account;
                Some(ListChange::Updated(pos))
            }
            None => {
                debug!("Change for account {} that is not listed", account.id);
                None
            }
        }
    }

    /// "Account removed" notification.
    pub fn removed(&mut self, id: &AccountId) -> RemoveOutcome {
        if let Some(pos) = self.position(id) {
            self.rows.remove(pos);
            return RemoveOutcome::Removed(pos);
        }
        if self.removal.take_by_id(id).is_some() {
            debug!("Account {} removed while pending removal", id);
            return RemoveOutcome::PendingCompleted;
        }
        if self.requested.remove(id) {
            debug!("Removal of account {} confirmed", id);
            return RemoveOutcome::Confirmed;
        }

        warn!("Account removed that was never added: {}", id);
        RemoveOutcome::Unknown
    }

    // ========================================================================
    // Two-phase removal
    // ========================================================================

    /// Hide `id` and open its undo window.
    ///
    /// Returns `None` if the account is not visible.
    pub fn begin_removal(&mut self, id: &AccountId) -> Option<BeginRemoval> {
        let position = self.position(id)?;
        let account = self.rows.remove(position);
        let (ticket, superseded) = self.removal.begin(account);
        if let Some(previous) = &superseded {
            self.requested.insert(previous.id.clone());
        }
        Some(BeginRemoval {
            ticket,
            position,
            superseded,
        })
    }

    /// Undo a pending removal. Returns the row position it was restored to.
    pub fn undo(&mut self, ticket: RemovalTicket) -> Option<usize> {
        let account = self.removal.take(ticket)?;
        let pos = match self.rows.binary_search_by(|row| row.id.cmp(&account.id)) {
            Ok(pos) => {
                self.rows[pos] = account;
                pos
            }
            Err(pos) => {
                self.rows.insert(pos, account);
                pos
            }
        };
        Some(pos)
    }

    /// Close the undo window (timeout or explicit confirm). Returns the account
    /// whose removal must be sent to the service.
    pub fn commit(&mut self, ticket: RemovalTicket) -> Option<Account> {
        let account = self.removal.take(ticket)?;
        self.requested.insert(account.id.clone());
        Some(account)
    }

    /// The service refused to remove `account`; show it again.
    pub fn removal_failed(&mut self, account: Account) -> Option<ListChange> {
        if !self.requested.remove(&account.id) {
            return None;
        }
        self.added(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    fn account(id: &str) -> Account {
        Account::new(id, "google")
    }

    fn ids(list: &AccountList) -> Vec<String> {
        list.iter().map(|a| a.id.to_string()).collect()
    }

    #[test]
    fn test_rows_sorted_by_id() {
        let mut list = AccountList::new();
        assert_eq!(list.added(account("b")), Some(ListChange::Inserted(0)));
        assert_eq!(list.added(account("d")), Some(ListChange::Inserted(1)));
        assert_eq!(list.added(account("a")), Some(ListChange::Inserted(0)));
        assert_eq!(list.added(account("c")), Some(ListChange::Inserted(2)));
        assert_eq!(ids(&list), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_duplicate_add_updates_in_place() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);

        let mut again = account("b");
        again.presentation_identity = "me@example.com".into();
        assert_eq!(list.added(again), Some(ListChange::Updated(1)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.get(1).map(|a| a.presentation_identity.as_str()), Some("me@example.com"));
    }

    #[test]
    fn test_change_refreshes_row() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);

        let mut changed = account("a");
        changed.attention_needed = true;
        assert_eq!(list.changed(changed), Some(ListChange::Updated(0)));
        assert!(list.find(&"a".into()).is_some_and(|a| a.attention_needed));

        assert_eq!(list.changed(account("zzz")), None);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_remove_unknown_leaves_list_unchanged() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);

        assert_eq!(list.removed(&"nope".into()), RemoveOutcome::Unknown);
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    /// Counts events at WARN level.
    struct WarnCounter(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for WarnCounter {
        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == tracing::Level::WARN {
                self.0.fetch_add(1, Ordering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarnCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(Ordering::SeqCst)
    }

    #[test]
    fn test_remove_unknown_warns_once() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);

        let warnings = count_warnings(|| {
            assert_eq!(list.removed(&"nope".into()), RemoveOutcome::Unknown);
        });

        assert_eq!(warnings, 1);
        assert_eq!(ids(&list), vec!["a", "b"]);
    }

    #[test]
    fn test_remove_known_does_not_warn() {
        let mut list = AccountList::new();
        list.populate([account("a")]);

        let warnings = count_warnings(|| {
            assert_eq!(list.removed(&"a".into()), RemoveOutcome::Removed(0));
        });

        assert_eq!(warnings, 0);
    }

    #[test]
    fn test_row_count_tracks_live_accounts() {
        let mut list = AccountList::new();
        let mut live: Vec<&str> = Vec::new();
        let script: &[(&str, char)] = &[
            ("c", '+'), ("a", '+'), ("b", '+'), ("a", '~'), ("c", '-'),
            ("e", '+'), ("b", '-'), ("d", '+'), ("e", '~'), ("a", '-'),
        ];

        for (id, op) in script {
            match *op {
                '+' => {
                    list.added(account(id));
                    live.push(*id);
                }
                '-' => {
                    assert!(matches!(list.removed(&(*id).into()), RemoveOutcome::Removed(_)));
                    live.retain(|l| l != id);
                }
                _ => {
                    list.changed(account(id));
                }
            }
            assert_eq!(list.len(), live.len());
        }

        live.sort();
        assert_eq!(ids(&list), live);
    }

    #[test]
    fn test_undo_restores_exact_row() {
        let mut list = AccountList::new();
        let mut b = account("b");
        b.presentation_identity = "bee@example.com".into();
        list.populate([account("a"), b.clone(), account("c")]);

        let begin = list.begin_removal(&"b".into()).expect("visible");
        assert_eq!(begin.position, 1);
        assert!(begin.superseded.is_none());
        assert_eq!(list.len(), 2);
        assert_eq!(list.state_of(&"b".into()), RemovalState::PendingRemoval);

        assert_eq!(list.undo(begin.ticket), Some(1));
        assert_eq!(ids(&list), vec!["a", "b", "c"]);
        assert_eq!(list.get(1), Some(&b));
        assert_eq!(list.state_of(&"b".into()), RemovalState::Visible);

        // A second undo must not duplicate the row.
        assert_eq!(list.undo(begin.ticket), None);
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_undo_after_commit_is_noop() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);

        let begin = list.begin_removal(&"a".into()).expect("visible");
        let committed = list.commit(begin.ticket).expect("pending");
        assert_eq!(committed.id.as_str(), "a");
        assert_eq!(list.state_of(&"a".into()), RemovalState::Removed);

        assert_eq!(list.undo(begin.ticket), None);
        assert_eq!(ids(&list), vec!["b"]);
        assert!(list.commit(begin.ticket).is_none());

        // The service's confirmation is expected, not an anomaly.
        assert_eq!(list.removed(&"a".into()), RemoveOutcome::Confirmed);
        assert_eq!(list.removed(&"a".into()), RemoveOutcome::Unknown);
    }

    #[test]
    fn test_new_removal_commits_previous() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b"), account("c")]);

        let first = list.begin_removal(&"a".into()).expect("visible");
        let second = list.begin_removal(&"c".into()).expect("visible");

        assert_eq!(second.superseded.map(|a| a.id.to_string()), Some("a".to_string()));
        assert_eq!(list.undo(first.ticket), None);
        assert_eq!(ids(&list), vec!["b"]);
        assert_eq!(list.removed(&"a".into()), RemoveOutcome::Confirmed);

        assert_eq!(list.undo(second.ticket), Some(1));
        assert_eq!(ids(&list), vec!["b", "c"]);
    }

    #[test]
    fn test_service_removal_completes_pending() {
        let mut list = AccountList::new();
        list.populate([account("a")]);

        let begin = list.begin_removal(&"a".into()).expect("visible");
        assert_eq!(list.removed(&"a".into()), RemoveOutcome::PendingCompleted);
        assert_eq!(list.undo(begin.ticket), None);
        assert!(list.commit(begin.ticket).is_none());
        assert!(list.is_empty());
    }

    #[test]
    fn test_change_while_pending_is_kept_for_undo() {
        let mut list = AccountList::new();
        list.populate([account("a")]);
        let begin = list.begin_removal(&"a".into()).expect("visible");

        let mut changed = account("a");
        changed.locked = true;
        assert_eq!(list.changed(changed), None);
        assert!(list.is_empty());

        list.undo(begin.ticket);
        assert!(list.find(&"a".into()).is_some_and(|a| a.locked));
    }

    #[test]
    fn test_failed_removal_shows_row_again() {
        let mut list = AccountList::new();
        list.populate([account("a"), account("b")]);
        let begin = list.begin_removal(&"a".into()).expect("visible");
        let committed = list.commit(begin.ticket).expect("pending");

        assert_eq!(list.removal_failed(committed.clone()), Some(ListChange::Inserted(0)));
        assert_eq!(ids(&list), vec!["a", "b"]);
        assert_eq!(list.removal_failed(committed), None);
    }

    #[test]
    fn test_begin_removal_of_hidden_account() {
        let mut list = AccountList::new();
        list.populate([account("a")]);
        assert!(list.begin_removal(&"a".into()).is_some());
        assert!(list.begin_removal(&"a".into()).is_none());
        assert!(list.begin_removal(&"missing".into()).is_none());
    }
}
