// Online Accounts GTK - Provider Row Widget
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! A list row offering one provider.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::glib;
use libadwaita as adw;
use adw::prelude::*;
use adw::subclass::prelude::*;

use super::account_row::ROW_ICON_SIZE;
use crate::models::Provider;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ProviderRow;

    #[glib::object_subclass]
    impl ObjectSubclass for ProviderRow {
        const NAME: &'static str = "OaProviderRow";
        type Type = super::ProviderRow;
        type ParentType = adw::ActionRow;
    }

    impl ObjectImpl for ProviderRow {}
    impl WidgetImpl for ProviderRow {}
    impl ListBoxRowImpl for ProviderRow {}
    impl PreferencesRowImpl for ProviderRow {}
    impl ActionRowImpl for ProviderRow {}
}

glib::wrapper! {
    pub struct ProviderRow(ObjectSubclass<imp::ProviderRow>)
        @extends gtk::Widget, gtk::ListBoxRow, adw::PreferencesRow, adw::ActionRow;
}

impl ProviderRow {
    pub fn new(provider: &Provider) -> Self {
        let row: Self = glib::Object::builder()
            .property("title", &provider.name)
            .property("use-markup", false)
            .property("activatable", true)
            .build();

        let features = provider.features.labels().join(", ");
        if !features.is_empty() {
            row.set_subtitle(&features);
        }

        let icon = gtk::Image::from_icon_name(&provider.icon_name);
        icon.set_pixel_size(ROW_ICON_SIZE);
        icon.add_css_class("provider-icon");
        row.add_prefix(&icon);

        let add = gtk::Image::from_icon_name("list-add-symbolic");
        add.add_css_class("dim-label");
        row.add_suffix(&add);

        row
    }
}
