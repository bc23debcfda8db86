// Online Accounts GTK - Account Row Widget
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A list row showing one account.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use adw::prelude::*;
use adw::subclass::prelude::*;
use std::cell::RefCell;
use tracing::warn;

use super::status_pill::{PillStatus, StatusPill};
use crate::models::Account;

/// Pixel size of provider icons in list rows.
pub const ROW_ICON_SIZE: i32 = 48;

/// Resolve a serialized provider icon. Failures are logged and yield `None`.
pub fn provider_gicon(serialized: &str, owner: &str) -> Option<gio::Icon> {
    match gio::Icon::for_string(serialized) {
        Ok(icon) => Some(icon),
        Err(e) => {
            warn!("Error creating GIcon for {}: {}", owner, e);
            None
        }
    }
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct AccountRow {
        pub icon: RefCell<Option<gtk::Image>>,
        pub status_pill: RefCell<Option<StatusPill>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for AccountRow {
        const NAME: &'static str = "OaAccountRow";
        type Type = super::AccountRow;
        type ParentType = adw::ActionRow;
    }

    impl ObjectImpl for AccountRow {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for AccountRow {}
    impl ListBoxRowImpl for AccountRow {}
    impl PreferencesRowImpl for AccountRow {}
    impl ActionRowImpl for AccountRow {}
}

glib::wrapper! {
    pub struct AccountRow(ObjectSubclass<imp::AccountRow>)
        @extends gtk::Widget, gtk::ListBoxRow, adw::PreferencesRow, adw::ActionRow;
}

impl AccountRow {
    pub fn new(account: &Account) -> Self {
        let row: Self = glib::Object::builder().build();
        row.set_account(account);
        row
    }

    fn setup_ui(&self) {
        let imp = self.imp();

        self.add_css_class("account-row");
        self.set_use_markup(false);
        self.set_title_lines(1);
        self.set_subtitle_lines(1);

        let icon = gtk::Image::new();
        icon.set_pixel_size(ROW_ICON_SIZE);
        icon.add_css_class("provider-icon");
        self.add_prefix(&icon);
        *imp.icon.borrow_mut() = Some(icon);

        let status_pill = StatusPill::new();
        status_pill.set_margin_end(12);
        self.add_suffix(&status_pill);
        *imp.status_pill.borrow_mut() = Some(status_pill);

        let chevron = gtk::Image::from_icon_name("go-next-symbolic");
        chevron.add_css_class("dim-label");
        self.add_suffix(&chevron);
        self.set_activatable(true);
    }

    /// Configure the row from an account snapshot.
    pub fn set_account(&self, account: &Account) {
        let imp = self.imp();

        self.set_title(account.display_provider());
        self.set_subtitle(&account.presentation_identity);

        if let Some(icon) = imp.icon.borrow().as_ref() {
            let owner = format!("account {}", account.id);
            match provider_gicon(&account.provider_icon, &owner) {
                Some(gicon) => icon.set_from_gicon(&gicon),
                None => icon.clear(),
            }
        }

        if let Some(pill) = imp.status_pill.borrow().as_ref() {
            pill.set_status(PillStatus::for_account(account));
        }
    }
}
