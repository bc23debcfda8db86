// Online Accounts GTK - Status Pill Widget
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A small pill-shaped account status indicator.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::glib;
use gtk4::subclass::prelude::*;
use std::cell::{Cell, RefCell};

use crate::i18n;
use crate::models::Account;

/// What the pill reports about an account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PillStatus {
    /// Nothing to report; the pill is hidden.
    #[default]
    Ok,
    /// Credentials need refreshing.
    Attention,
    /// Managed by an administrator.
    Locked,
}

impl PillStatus {
    /// Attention takes precedence over locked.
    pub fn for_account(account: &Account) -> Self {
        if account.attention_needed {
            Self::Attention
        } else if account.locked {
            Self::Locked
        } else {
            Self::Ok
        }
    }

    fn css_class(&self) -> &'static str {
        match self {
            PillStatus::Ok => "success",
            PillStatus::Attention => "warning",
            PillStatus::Locked => "dim-label",
        }
    }

    fn icon_name(&self) -> &'static str {
        match self {
            PillStatus::Ok => "emblem-ok-symbolic",
            PillStatus::Attention => "dialog-warning-symbolic",
            PillStatus::Locked => "system-lock-screen-symbolic",
        }
    }

    fn text(&self) -> String {
        match self {
            PillStatus::Ok => String::new(),
            PillStatus::Attention => i18n!("Needs attention"),
            PillStatus::Locked => i18n!("Locked"),
        }
    }
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct StatusPill {
        pub icon: RefCell<gtk::Image>,
        pub label: RefCell<gtk::Label>,
        pub status: Cell<PillStatus>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for StatusPill {
        const NAME: &'static str = "OaStatusPill";
        type Type = super::StatusPill;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for StatusPill {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for StatusPill {}
    impl BoxImpl for StatusPill {}
}

glib::wrapper! {
    pub struct StatusPill(ObjectSubclass<imp::StatusPill>)
        @extends gtk::Widget, gtk::Box;
}

impl StatusPill {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("orientation", gtk::Orientation::Horizontal)
            .property("spacing", 4)
            .build()
    }

    fn setup_ui(&self) {
        let imp = self.imp();

        self.add_css_class("status-pill");
        self.add_css_class("pill");
        self.set_halign(gtk::Align::Start);
        self.set_valign(gtk::Align::Center);

        let icon = gtk::Image::new();
        icon.set_icon_size(gtk::IconSize::Normal);
        self.append(&icon);

        let label = gtk::Label::new(None);
        label.add_css_class("caption");
        self.append(&label);

        *imp.icon.borrow_mut() = icon;
        *imp.label.borrow_mut() = label;

        self.apply(PillStatus::Ok);
    }

    /// Set the status (changes text, icon, styling and visibility).
    pub fn set_status(&self, status: PillStatus) {
        if status != self.status() {
            self.apply(status);
        }
    }

    fn apply(&self, status: PillStatus) {
        let imp = self.imp();

        self.remove_css_class(imp.status.get().css_class());
        self.add_css_class(status.css_class());
        imp.status.set(status);

        imp.icon.borrow().set_icon_name(Some(status.icon_name()));
        imp.label.borrow().set_text(&status.text());
        self.set_visible(status != PillStatus::Ok);
    }

    /// Get the current status.
    pub fn status(&self) -> PillStatus {
        self.imp().status.get()
    }
}

impl Default for StatusPill {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_account() {
        let mut account = Account::new("a", "google");
        assert_eq!(PillStatus::for_account(&account), PillStatus::Ok);

        account.locked = true;
        assert_eq!(PillStatus::for_account(&account), PillStatus::Locked);

        account.attention_needed = true;
        assert_eq!(PillStatus::for_account(&account), PillStatus::Attention);
    }
}
