// Online Accounts GTK - Account Detail Page
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Detail view for a single account.
//!
//! The page is reused across accounts: showing another account tears down
//! the previous content before building the new one.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::glib;
use libadwaita as adw;
use adw::prelude::*;
use adw::subclass::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

use crate::i18n;
use crate::models::{Account, AccountId};
use crate::ui::widgets::provider_gicon;

/// Navigation tag of the detail page.
pub const DETAIL_PAGE_TAG: &str = "account";

const DETAIL_ICON_SIZE: i32 = 96;

type AccountHandler = Rc<dyn Fn(Account)>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct AccountDetailPage {
        pub content: RefCell<Option<gtk::Box>>,
        pub account: RefCell<Option<Account>>,
        pub manage_handler: RefCell<Option<AccountHandler>>,
        pub remove_handler: RefCell<Option<AccountHandler>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for AccountDetailPage {
        const NAME: &'static str = "OaAccountDetailPage";
        type Type = super::AccountDetailPage;
        type ParentType = adw::NavigationPage;
    }

    impl ObjectImpl for AccountDetailPage {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for AccountDetailPage {}
    impl NavigationPageImpl for AccountDetailPage {}
}

glib::wrapper! {
    pub struct AccountDetailPage(ObjectSubclass<imp::AccountDetailPage>)
        @extends gtk::Widget, adw::NavigationPage;
}

impl AccountDetailPage {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("title", i18n!("Account"))
            .property("tag", DETAIL_PAGE_TAG)
            .build()
    }

    fn setup_ui(&self) {
        self.add_css_class("account-detail");

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&adw::HeaderBar::new());

        let content = gtk::Box::new(gtk::Orientation::Vertical, 18);
        content.set_margin_top(24);
        content.set_margin_bottom(24);
        content.set_margin_start(12);
        content.set_margin_end(12);

        let clamp = adw::Clamp::builder()
            .maximum_size(600)
            .child(&content)
            .build();

        let scrolled = gtk::ScrolledWindow::builder()
            .hscrollbar_policy(gtk::PolicyType::Never)
            .vexpand(true)
            .child(&clamp)
            .build();

        toolbar.set_content(Some(&scrolled));
        self.set_child(Some(&toolbar));

        *self.imp().content.borrow_mut() = Some(content);
    }

    /// Called when the user wants the provider's own settings flow.
    pub fn connect_manage<F: Fn(Account) + 'static>(&self, f: F) {
        *self.imp().manage_handler.borrow_mut() = Some(Rc::new(f));
    }

    /// Called when the user asks to remove the shown account.
    pub fn connect_remove<F: Fn(Account) + 'static>(&self, f: F) {
        *self.imp().remove_handler.borrow_mut() = Some(Rc::new(f));
    }

    /// The account currently shown, if any.
    pub fn account_id(&self) -> Option<AccountId> {
        self.imp().account.borrow().as_ref().map(|a| a.id.clone())
    }

    /// Show `account`, replacing whatever was shown before.
    pub fn set_account(&self, account: &Account) {
        let imp = self.imp();
        let content = imp.content.borrow();
        let Some(content) = content.as_ref() else { return };

        while let Some(child) = content.first_child() {
            content.remove(&child);
        }
        *imp.account.borrow_mut() = Some(account.clone());

        self.set_title(account.display_provider());

        if account.attention_needed {
            let banner = adw::Banner::builder()
                .title(i18n!("Credentials have expired"))
                .button_label(i18n!("Sign In"))
                .revealed(true)
                .build();
            let page_weak = self.downgrade();
            banner.connect_button_clicked(move |_| {
                if let Some(page) = page_weak.upgrade() {
                    page.emit(&page.imp().manage_handler);
                }
            });
            content.append(&banner);
        }

        content.append(&self.build_header(account));
        content.append(&self.build_details(account));
        content.append(&self.build_remove_button(account));
    }

    /// Clear the page when its account went away.
    pub fn clear(&self) {
        let imp = self.imp();
        imp.account.borrow_mut().take();
        if let Some(content) = imp.content.borrow().as_ref() {
            while let Some(child) = content.first_child() {
                content.remove(&child);
            }
        }
    }

    fn build_header(&self, account: &Account) -> gtk::Box {
        let header = gtk::Box::new(gtk::Orientation::Vertical, 6);
        header.set_halign(gtk::Align::Center);

        let icon = gtk::Image::new();
        icon.set_pixel_size(DETAIL_ICON_SIZE);
        icon.add_css_class("provider-icon");
        let owner = format!("account {}", account.id);
        if let Some(gicon) = provider_gicon(&account.provider_icon, &owner) {
            icon.set_from_gicon(&gicon);
        }
        header.append(&icon);

        let name = gtk::Label::new(Some(account.display_provider()));
        name.add_css_class("title-1");
        header.append(&name);

        let identity = gtk::Label::new(Some(&account.presentation_identity));
        identity.add_css_class("identity");
        identity.add_css_class("dim-label");
        identity.set_selectable(true);
        identity.set_ellipsize(gtk4::pango::EllipsizeMode::Middle);
        header.append(&identity);

        header
    }

    fn build_details(&self, account: &Account) -> adw::PreferencesGroup {
        let group = adw::PreferencesGroup::new();

        let manage = adw::ActionRow::builder()
            .title(i18n!("Manage Account"))
            .subtitle(i18n!("Change settings in the provider's own dialog"))
            .activatable(true)
            .build();
        manage.add_suffix(&gtk::Image::from_icon_name("go-next-symbolic"));
        let page_weak = self.downgrade();
        manage.connect_activated(move |_| {
            if let Some(page) = page_weak.upgrade() {
                page.emit(&page.imp().manage_handler);
            }
        });
        group.add(&manage);

        if account.locked {
            let locked = adw::ActionRow::builder()
                .title(i18n!("Managed by your administrator"))
                .build();
            locked.add_prefix(&gtk::Image::from_icon_name("system-lock-screen-symbolic"));
            group.add(&locked);
        }

        group
    }

    fn build_remove_button(&self, account: &Account) -> gtk::Button {
        let button = gtk::Button::builder()
            .label(i18n!("Remove Account"))
            .halign(gtk::Align::Center)
            .sensitive(account.can_remove())
            .build();
        button.add_css_class("destructive-action");
        button.add_css_class("pill");

        let page_weak = self.downgrade();
        button.connect_clicked(move |_| {
            if let Some(page) = page_weak.upgrade() {
                page.emit(&page.imp().remove_handler);
            }
        });

        button
    }

    fn emit(&self, handler: &RefCell<Option<AccountHandler>>) {
        let account = self.imp().account.borrow().clone();
        let handler = handler.borrow().clone();
        if let (Some(account), Some(handler)) = (account, handler) {
            handler(account);
        }
    }
}

impl Default for AccountDetailPage {
    fn default() -> Self {
        Self::new()
    }
}
