// Online Accounts GTK - Accounts Page
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! List of configured accounts.
//!
//! The list box mirrors an [`AccountList`] row for row. Removal is two-phase:
//! the row disappears at once, and the request only reaches the service when
//! the undo window closes.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::glib;
use gtk4::subclass::prelude::*;
use std::cell::{Cell, RefCell};
use std::collections::HashSet;
use std::time::Duration;
use tracing::debug;

use crate::i18n;
use crate::lists::{AccountList, ListChange, RemovalTicket, RemoveOutcome};
use crate::models::{Account, AccountId};
use crate::ui::widgets::AccountRow;

type AccountHandler = Box<dyn Fn(Account)>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct AccountsPage {
        pub heading: RefCell<Option<gtk::Label>>,
        pub list_box: RefCell<Option<gtk::ListBox>>,
        pub accounts: RefCell<AccountList>,
        pub undo_timer: RefCell<Option<glib::SourceId>>,
        pub undo_timeout: Cell<Duration>,
        pub activate_handler: RefCell<Option<AccountHandler>>,
        pub commit_handler: RefCell<Option<AccountHandler>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for AccountsPage {
        const NAME: &'static str = "OaAccountsPage";
        type Type = super::AccountsPage;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for AccountsPage {
        fn constructed(&self) {
            self.parent_constructed();
            self.undo_timeout.set(Duration::from_secs(10));
            self.obj().setup_ui();
        }

        fn dispose(&self) {
            if let Some(source) = self.undo_timer.take() {
                source.remove();
            }
        }
    }

    impl WidgetImpl for AccountsPage {}
    impl BoxImpl for AccountsPage {}
}

glib::wrapper! {
    pub struct AccountsPage(ObjectSubclass<imp::AccountsPage>)
        @extends gtk::Widget, gtk::Box;
}

impl AccountsPage {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("spacing", 12)
            .build()
    }

    fn setup_ui(&self) {
        let imp = self.imp();

        let heading = gtk::Label::new(Some(&i18n!("Accounts")));
        heading.add_css_class("heading");
        heading.set_xalign(0.0);
        self.append(&heading);

        let list_box = gtk::ListBox::new();
        list_box.set_selection_mode(gtk::SelectionMode::None);
        list_box.add_css_class("boxed-list");
        self.append(&list_box);

        let page_weak = self.downgrade();
        list_box.connect_row_activated(move |_, row| {
            let Some(page) = page_weak.upgrade() else { return };
            let account = page.imp().accounts.borrow().get(row.index() as usize).cloned();
            if let (Some(account), Some(handler)) = (account, page.imp().activate_handler.borrow().as_ref()) {
                handler(account);
            };
        });

        *imp.heading.borrow_mut() = Some(heading);
        *imp.list_box.borrow_mut() = Some(list_box);

        self.sync_visibility();
    }

    /// Set how long a removed account can be restored.
    pub fn set_undo_timeout(&self, timeout: Duration) {
        self.imp().undo_timeout.set(timeout);
    }

    /// Called with the account behind an activated row.
    pub fn connect_account_activated<F: Fn(Account) + 'static>(&self, f: F) {
        *self.imp().activate_handler.borrow_mut() = Some(Box::new(f));
    }

    /// Called when a removal becomes final and must be sent to the service.
    pub fn connect_removal_committed<F: Fn(Account) + 'static>(&self, f: F) {
        *self.imp().commit_handler.borrow_mut() = Some(Box::new(f));
    }

    // ========================================================================
    // Row mirroring
    // ========================================================================

    fn apply(&self, change: ListChange) {
        let imp = self.imp();
        let list_box = imp.list_box.borrow();
        let Some(list_box) = list_box.as_ref() else { return };

        match change {
            ListChange::Inserted(pos) => {
                if let Some(account) = imp.accounts.borrow().get(pos) {
                    list_box.insert(&AccountRow::new(account), pos as i32);
                }
            }
            ListChange::Removed(pos) => {
                if let Some(row) = list_box.row_at_index(pos as i32) {
                    list_box.remove(&row);
                }
            }
            ListChange::Updated(pos) => {
                let row = list_box.row_at_index(pos as i32).and_downcast::<AccountRow>();
                if let (Some(row), Some(account)) = (row, imp.accounts.borrow().get(pos)) {
                    row.set_account(account);
                }
            }
        }
        drop(list_box);

        self.sync_visibility();
    }

    /// Heading and list are only shown while there is something to list.
    fn sync_visibility(&self) {
        let imp = self.imp();
        let has_accounts = !imp.accounts.borrow().is_empty();
        if let Some(heading) = imp.heading.borrow().as_ref() {
            heading.set_visible(has_accounts);
        }
        if let Some(list_box) = imp.list_box.borrow().as_ref() {
            list_box.set_visible(has_accounts);
        }
        self.set_visible(has_accounts);
    }

    /// Ids of all shown accounts.
    pub fn account_ids(&self) -> HashSet<AccountId> {
        self.imp().accounts.borrow().iter().map(|a| a.id.clone()).collect()
    }

    /// First shown account of `provider_type` that is not in `before`.
    pub fn find_new_account(&self, before: &HashSet<AccountId>, provider_type: &str) -> Option<Account> {
        self.imp()
            .accounts
            .borrow()
            .iter()
            .find(|a| a.provider_type == provider_type && !before.contains(&a.id))
            .cloned()
    }

    // ========================================================================
    // Service notifications
    // ========================================================================

    pub fn populate(&self, accounts: Vec<Account>) {
        let changes = self.imp().accounts.borrow_mut().populate(accounts);
        for change in changes {
            self.apply(change);
        }
    }

    pub fn account_added(&self, account: Account) {
        let change = self.imp().accounts.borrow_mut().added(account);
        if let Some(change) = change {
            self.apply(change);
        }
    }

    pub fn account_changed(&self, account: Account) {
        let change = self.imp().accounts.borrow_mut().changed(account);
        if let Some(change) = change {
            self.apply(change);
        }
    }

    pub fn account_removed(&self, id: &AccountId) -> RemoveOutcome {
        let outcome = self.imp().accounts.borrow_mut().removed(id);
        match outcome {
            RemoveOutcome::PendingCompleted => self.cancel_undo_timer(),
            _ => {
                if let Some(change) = outcome.change() {
                    self.apply(change);
                }
            }
        }
        outcome
    }

    // ========================================================================
    // Two-phase removal
    // ========================================================================

    /// Hide the account's row and start the undo window.
    pub fn begin_removal(&self, id: &AccountId) -> Option<RemovalTicket> {
        let begin = self.imp().accounts.borrow_mut().begin_removal(id)?;
        self.apply(ListChange::Removed(begin.position));

        if let Some(previous) = begin.superseded {
            debug!("Removal of {} superseded, committing it", previous.id);
            self.cancel_undo_timer();
            self.emit_committed(previous);
        }

        let ticket = begin.ticket;
        debug!("Removal {} of {} started", ticket.id(), id);
        let page_weak = self.downgrade();
        let source = glib::timeout_add_local_once(self.imp().undo_timeout.get(), move || {
            if let Some(page) = page_weak.upgrade() {
                // The source is done once it has fired.
                page.imp().undo_timer.take();
                page.finish_removal(ticket);
            }
        });
        *self.imp().undo_timer.borrow_mut() = Some(source);

        Some(ticket)
    }

    /// Restore the row if the undo window is still open.
    pub fn undo_removal(&self, ticket: RemovalTicket) -> bool {
        let restored = self.imp().accounts.borrow_mut().undo(ticket);
        match restored {
            Some(pos) => {
                self.cancel_undo_timer();
                self.apply(ListChange::Inserted(pos));
                true
            }
            None => false,
        }
    }

    /// Close the undo window early.
    pub fn confirm_removal(&self, ticket: RemovalTicket) {
        if self.imp().accounts.borrow().pending_ticket() != Some(ticket) {
            return;
        }
        self.cancel_undo_timer();
        self.finish_removal(ticket);
    }

    /// Commit whatever removal is pending, e.g. when the window closes.
    pub fn flush_pending_removal(&self) {
        let ticket = self.imp().accounts.borrow().pending_ticket();
        if let Some(ticket) = ticket {
            self.confirm_removal(ticket);
        }
    }

    /// The service refused the removal; show the row again.
    pub fn removal_failed(&self, account: Account) {
        let change = self.imp().accounts.borrow_mut().removal_failed(account);
        if let Some(change) = change {
            self.apply(change);
        }
    }

    fn finish_removal(&self, ticket: RemovalTicket) {
        let committed = self.imp().accounts.borrow_mut().commit(ticket);
        if let Some(account) = committed {
            self.emit_committed(account);
        }
    }

    fn cancel_undo_timer(&self) {
        if let Some(source) = self.imp().undo_timer.take() {
            source.remove();
        }
    }

    fn emit_committed(&self, account: Account) {
        if let Some(handler) = self.imp().commit_handler.borrow().as_ref() {
            handler(account);
        }
    }
}

impl Default for AccountsPage {
    fn default() -> Self {
        Self::new()
    }
}
