// Online Accounts GTK - Providers Page
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! List of providers a new account can be added for.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::glib;
use gtk4::subclass::prelude::*;
use std::cell::RefCell;

use crate::i18n;
use crate::lists::ProviderList;
use crate::models::Provider;
use crate::ui::widgets::ProviderRow;

type ProviderHandler = Box<dyn Fn(Provider)>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ProvidersPage {
        pub list_box: RefCell<Option<gtk::ListBox>>,
        pub providers: RefCell<ProviderList>,
        pub activate_handler: RefCell<Option<ProviderHandler>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ProvidersPage {
        const NAME: &'static str = "OaProvidersPage";
        type Type = super::ProvidersPage;
        type ParentType = gtk::Box;
    }

    impl ObjectImpl for ProvidersPage {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for ProvidersPage {}
    impl BoxImpl for ProvidersPage {}
}

glib::wrapper! {
    pub struct ProvidersPage(ObjectSubclass<imp::ProvidersPage>)
        @extends gtk::Widget, gtk::Box;
}

impl ProvidersPage {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("orientation", gtk::Orientation::Vertical)
            .property("spacing", 12)
            .build()
    }

    fn setup_ui(&self) {
        let heading = gtk::Label::new(Some(&i18n!("Connect an Account")));
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
            let provider = page.imp().providers.borrow().get(row.index() as usize).cloned();
            if let (Some(provider), Some(handler)) = (provider, page.imp().activate_handler.borrow().as_ref()) {
                handler(provider);
            };
        });

        *self.imp().list_box.borrow_mut() = Some(list_box);
    }

    /// Called with the provider behind an activated row.
    pub fn connect_provider_activated<F: Fn(Provider) + 'static>(&self, f: F) {
        *self.imp().activate_handler.borrow_mut() = Some(Box::new(f));
    }

    /// The widget whose sensitivity follows network availability.
    pub fn list_widget(&self) -> gtk::Widget {
        self.imp()
            .list_box
            .borrow()
            .as_ref()
            .map(|list_box| list_box.clone().upcast())
            .unwrap_or_else(|| self.clone().upcast())
    }

    /// Add enumerated providers, keeping display order.
    pub fn append_providers(&self, providers: Vec<Provider>) {
        let imp = self.imp();
        let list_box = imp.list_box.borrow();
        let Some(list_box) = list_box.as_ref() else { return };

        let rows: Vec<ProviderRow> = providers.iter().map(ProviderRow::new).collect();
        let positions = imp.providers.borrow_mut().extend(providers);
        for (row, position) in rows.iter().zip(positions) {
            list_box.insert(row, position as i32);
        }
    }
}

impl Default for ProvidersPage {
    fn default() -> Self {
        Self::new()
    }
}
