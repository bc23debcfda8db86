// Online Accounts GTK - Main Window
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Main Application Window.
//!
//! A navigation view whose root page lists the configured accounts above
//! the providers a new account can be added for. Activating an account
//! pushes its detail page.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use adw::prelude::*;
use adw::subclass::prelude::*;
use std::cell::RefCell;
use std::collections::HashSet;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, info, warn};

use crate::application::{run_on_runtime, tokio_runtime, Application};
use crate::backend::{AccountsObserver, GoaClient, ProviderBackend};
use crate::i18n;
use crate::lists::{RemovalTicket, RemoveOutcome};
use crate::models::{Account, AccountId, Provider};
use crate::ui::network::NetworkStateReflector;
use crate::ui::pages::{AccountDetailPage, AccountsPage, ProvidersPage, DETAIL_PAGE_TAG};
use crate::ui::shell::{self, ShellAction};

/// An add flow waiting for its account to show up.
struct PendingAdd {
    provider_type: String,
    known: HashSet<AccountId>,
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct MainWindow {
        pub toast_overlay: RefCell<Option<adw::ToastOverlay>>,
        pub navigation_view: RefCell<Option<adw::NavigationView>>,
        pub offline_banner: RefCell<Option<adw::Banner>>,

        // Views
        pub accounts_page: RefCell<Option<AccountsPage>>,
        pub providers_page: RefCell<Option<ProvidersPage>>,
        pub detail_page: RefCell<Option<AccountDetailPage>>,

        // Backends
        pub client: RefCell<Option<GoaClient>>,
        pub provider_backend: RefCell<Option<ProviderBackend>>,
        pub network: RefCell<Option<NetworkStateReflector>>,

        pub undo_toast: RefCell<Option<(RemovalTicket, adw::Toast)>>,
        pub pending_add: RefCell<Option<PendingAdd>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for MainWindow {
        const NAME: &'static str = "OaMainWindow";
        type Type = super::MainWindow;
        type ParentType = adw::ApplicationWindow;
    }

    impl ObjectImpl for MainWindow {
        fn constructed(&self) {
            self.parent_constructed();
            self.obj().setup_ui();
        }
    }

    impl WidgetImpl for MainWindow {}
    impl WindowImpl for MainWindow {}
    impl ApplicationWindowImpl for MainWindow {}
    impl AdwApplicationWindowImpl for MainWindow {}
}

glib::wrapper! {
    pub struct MainWindow(ObjectSubclass<imp::MainWindow>)
        @extends gtk::Widget, gtk::Window, gtk::ApplicationWindow, adw::ApplicationWindow,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl MainWindow {
    pub fn new(app: &Application) -> Self {
        let config = app.config();

        let window: Self = glib::Object::builder()
            .property("application", app)
            .property("default-width", config.window_width)
            .property("default-height", config.window_height)
            .build();

        if config.window_maximized {
            window.maximize();
        }

        window.set_title(Some(crate::APP_NAME));

        if let Some(page) = window.accounts_page() {
            page.set_undo_timeout(config.undo_timeout());
        }
        *window.imp().provider_backend.borrow_mut() = Some(ProviderBackend::new(&config));

        // Commit any pending removal and save window state on close
        let app_weak = app.downgrade();
        window.connect_close_request(move |win| {
            if let Some(page) = win.accounts_page() {
                page.flush_pending_removal();
            }

            if let Some(app) = app_weak.upgrade() {
                let mut config = app.config();

                // Only save size if not maximized
                config.window_maximized = win.is_maximized();
                if !config.window_maximized {
                    let (width, height) = win.default_size();
                    config.window_width = width;
                    config.window_height = height;
                }

                app.update_config(config);
            }
            glib::Propagation::Proceed
        });

        window
    }

    fn setup_ui(&self) {
        let imp = self.imp();

        let header = adw::HeaderBar::new();
        let menu_button = gtk::MenuButton::builder()
            .icon_name("open-menu-symbolic")
            .menu_model(&Self::main_menu())
            .primary(true)
            .tooltip_text(i18n!("Main Menu"))
            .build();
        header.pack_end(&menu_button);

        let offline_banner =
            adw::Banner::new(&i18n!("Offline. Connect to the internet to add accounts."));
        offline_banner.add_css_class("offline-banner");

        let toolbar = adw::ToolbarView::new();
        toolbar.add_top_bar(&header);
        toolbar.add_top_bar(&offline_banner);

        let content = gtk::Box::new(gtk::Orientation::Vertical, 24);
        content.set_margin_top(24);
        content.set_margin_bottom(24);
        content.set_margin_start(12);
        content.set_margin_end(12);

        let accounts_page = AccountsPage::new();
        content.append(&accounts_page);

        let providers_page = ProvidersPage::new();
        content.append(&providers_page);

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

        let root = adw::NavigationPage::builder()
            .title(crate::APP_NAME)
            .tag("accounts")
            .child(&toolbar)
            .build();

        let navigation_view = adw::NavigationView::new();
        navigation_view.add(&root);

        let toast_overlay = adw::ToastOverlay::new();
        toast_overlay.set_child(Some(&navigation_view));
        self.set_content(Some(&toast_overlay));

        let detail_page = AccountDetailPage::new();

        let network = NetworkStateReflector::attach(&offline_banner, &providers_page.list_widget());

        // Wire page callbacks
        let win_weak = self.downgrade();
        accounts_page.connect_account_activated(move |account| {
            if let Some(win) = win_weak.upgrade() {
                win.perform_all(shell::account_opened(&account));
            }
        });

        let win_weak = self.downgrade();
        accounts_page.connect_removal_committed(move |account| {
            if let Some(win) = win_weak.upgrade() {
                win.remove_account(account);
            }
        });

        let win_weak = self.downgrade();
        providers_page.connect_provider_activated(move |provider| {
            if let Some(win) = win_weak.upgrade() {
                win.add_account(provider);
            }
        });

        let win_weak = self.downgrade();
        detail_page.connect_manage(move |account| {
            if let Some(win) = win_weak.upgrade() {
                win.show_account(account);
            }
        });

        let win_weak = self.downgrade();
        detail_page.connect_remove(move |account| {
            if let Some(win) = win_weak.upgrade() {
                win.begin_removal(&account);
            }
        });

        *imp.toast_overlay.borrow_mut() = Some(toast_overlay);
        *imp.navigation_view.borrow_mut() = Some(navigation_view);
        *imp.offline_banner.borrow_mut() = Some(offline_banner);
        *imp.accounts_page.borrow_mut() = Some(accounts_page);
        *imp.providers_page.borrow_mut() = Some(providers_page);
        *imp.detail_page.borrow_mut() = Some(detail_page);
        *imp.network.borrow_mut() = Some(network);
    }

    /// Apply a new undo window to future removals.
    pub fn set_undo_timeout(&self, timeout: std::time::Duration) {
        if let Some(page) = self.accounts_page() {
            page.set_undo_timeout(timeout);
        }
    }

    fn main_menu() -> gio::Menu {
        let menu = gio::Menu::new();
        menu.append(Some(&i18n!("Preferences")), Some("app.preferences"));
        menu.append(Some(&i18n!("About Online Accounts")), Some("app.about"));
        menu.append(Some(&i18n!("Quit")), Some("app.quit"));
        menu
    }

    fn accounts_page(&self) -> Option<AccountsPage> {
        self.imp().accounts_page.borrow().clone()
    }

    fn providers_page(&self) -> Option<ProvidersPage> {
        self.imp().providers_page.borrow().clone()
    }

    fn detail_page(&self) -> Option<AccountDetailPage> {
        self.imp().detail_page.borrow().clone()
    }

    fn provider_backend(&self) -> Option<ProviderBackend> {
        self.imp().provider_backend.borrow().clone()
    }

    // ========================================================================
    // Startup
    // ========================================================================

    /// Connect to the accounts service, then load accounts and providers.
    ///
    /// Failing to reach the service quits the application.
    pub fn start(&self) {
        let win_weak = self.downgrade();
        glib::spawn_future_local(async move {
            let result = run_on_runtime(GoaClient::connect()).await;
            let Some(win) = win_weak.upgrade() else { return };

            match &result {
                Ok(client) => {
                    info!("Connected to the online accounts service");
                    *win.imp().client.borrow_mut() = Some(client.clone());
                }
                Err(e) => error!("Could not connect to the online accounts service: {}", e),
            }
            win.perform_all(shell::client_acquired(result.is_ok()));
        });
    }

    fn perform_all(&self, actions: Vec<ShellAction>) {
        for action in actions {
            self.perform(action);
        }
    }

    fn perform(&self, action: ShellAction) {
        match action {
            ShellAction::OpenDetail(account) => self.show_account_detail(&account),
            ShellAction::ShowAccount(account) => self.show_account(account),
            ShellAction::WatchAccounts => self.watch_accounts(),
            ShellAction::LoadProviders => self.load_providers(),
            ShellAction::Quit => {
                if let Some(app) = self.application() {
                    app.quit();
                }
            }
        }
    }

    fn watch_accounts(&self) {
        let Some(client) = self.imp().client.borrow().clone() else { return };

        let (snapshot_tx, snapshot_rx) = oneshot::channel();
        let (event_tx, mut event_rx) = mpsc::unbounded_channel();

        tokio_runtime().spawn(async move {
            if let Err(e) = client.watch(snapshot_tx, event_tx).await {
                warn!("Account notifications stopped: {}", e);
            }
        });

        let win_weak = self.downgrade();
        glib::spawn_future_local(async move {
            match snapshot_rx.await {
                Ok(Ok(accounts)) => {
                    info!("Loaded {} account(s)", accounts.len());
                    if let Some(page) = win_weak.upgrade().and_then(|win| win.accounts_page()) {
                        page.populate(accounts);
                    }
                }
                Ok(Err(e)) => warn!("Could not list accounts: {}", e),
                Err(_) => warn!("Account list was never delivered"),
            }

            while let Some(event) = event_rx.recv().await {
                let Some(win) = win_weak.upgrade() else { break };
                event.dispatch(&win);
            }
        });
    }

    fn load_providers(&self) {
        let Some(backend) = self.provider_backend() else { return };

        let win_weak = self.downgrade();
        glib::spawn_future_local(async move {
            let providers = match backend.all().await {
                Ok(providers) => providers,
                Err(e) => {
                    warn!("Could not enumerate providers: {}", e);
                    return;
                }
            };
            if let Some(page) = win_weak.upgrade().and_then(|win| win.providers_page()) {
                page.append_providers(providers);
            }
        });
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    fn show_account_detail(&self, account: &Account) {
        let (Some(detail), Some(nav)) = (self.detail_page(), self.imp().navigation_view.borrow().clone()) else {
            return;
        };

        detail.set_account(account);

        let showing = nav
            .visible_page()
            .and_then(|page| page.tag())
            .is_some_and(|tag| tag.as_str() == DETAIL_PAGE_TAG);
        if !showing {
            nav.push(&detail);
        }
    }

    /// Leave the detail page if it shows `id`.
    fn close_account_detail(&self, id: &AccountId) {
        let Some(detail) = self.detail_page() else { return };
        if detail.account_id().as_ref() != Some(id) {
            return;
        }
        if let Some(nav) = self.imp().navigation_view.borrow().as_ref() {
            nav.pop_to_tag("accounts");
        }
        detail.clear();
    }

    // ========================================================================
    // Provider flows
    // ========================================================================

    fn add_account(&self, provider: Provider) {
        let (Some(backend), Some(page)) = (self.provider_backend(), self.accounts_page()) else {
            return;
        };

        *self.imp().pending_add.borrow_mut() = Some(PendingAdd {
            provider_type: provider.provider_type.clone(),
            known: page.account_ids(),
        });

        let win_weak = self.downgrade();
        glib::spawn_future_local(async move {
            let result = backend.add_account(&provider).await;
            let Some(win) = win_weak.upgrade() else { return };

            match result {
                Ok(()) => win.take_new_account(None),
                Err(e) => {
                    win.imp().pending_add.borrow_mut().take();
                    if e.is_dismissed() {
                        debug!("Add flow for {} dismissed", provider.provider_type);
                    } else {
                        warn!("Could not add {} account: {}", provider.provider_type, e);
                    }
                }
            }
        });
    }

    /// Match a finished add flow against the accounts now shown.
    ///
    /// The add notification may arrive before or after the flow exits, so
    /// this runs on both; whichever sees the new account first opens it.
    fn take_new_account(&self, added: Option<&Account>) {
        let Some(page) = self.accounts_page() else { return };

        let found = {
            let pending = self.imp().pending_add.borrow();
            let Some(pending) = pending.as_ref() else { return };
            match added {
                Some(account) => (account.provider_type == pending.provider_type
                    && !pending.known.contains(&account.id))
                    .then(|| account.clone()),
                None => page.find_new_account(&pending.known, &pending.provider_type),
            }
        };

        if let Some(account) = found {
            self.imp().pending_add.borrow_mut().take();
            info!("New account {} added", account.id);
            self.perform_all(shell::account_opened(&account));
        }
    }

    fn show_account(&self, account: Account) {
        let Some(backend) = self.provider_backend() else { return };

        glib::spawn_future_local(async move {
            match backend.show_account(&account).await {
                Ok(()) => {}
                Err(e) if e.is_dismissed() => debug!("Account dialog for {} dismissed", account.id),
                Err(e) => warn!("Could not show account {}: {}", account.id, e),
            }
        });
    }

    // ========================================================================
    // Removal
    // ========================================================================

    /// Hide the account and offer to undo.
    fn begin_removal(&self, account: &Account) {
        let Some(page) = self.accounts_page() else { return };
        let Some(ticket) = page.begin_removal(&account.id) else {
            debug!("Account {} is not removable right now", account.id);
            return;
        };

        self.close_account_detail(&account.id);

        if let Some((_, previous)) = self.imp().undo_toast.take() {
            previous.dismiss();
        }

        let toast = adw::Toast::builder()
            .title(i18n!("{} account removed").replacen("{}", account.display_provider(), 1))
            .button_label(i18n!("Undo"))
            .priority(adw::ToastPriority::High)
            .timeout(self.app_config_undo_secs())
            .build();

        let page_weak = page.downgrade();
        toast.connect_button_clicked(move |_| {
            if let Some(page) = page_weak.upgrade() {
                page.undo_removal(ticket);
            }
        });

        // Closing the toast confirms the removal early
        let page_weak = page.downgrade();
        let win_weak = self.downgrade();
        toast.connect_dismissed(move |_| {
            if let Some(win) = win_weak.upgrade() {
                let mut current = win.imp().undo_toast.borrow_mut();
                if current.as_ref().is_some_and(|(t, _)| *t == ticket) {
                    current.take();
                }
            }
            if let Some(page) = page_weak.upgrade() {
                page.confirm_removal(ticket);
            }
        });

        if let Some(overlay) = self.imp().toast_overlay.borrow().as_ref() {
            overlay.add_toast(toast.clone());
        }
        *self.imp().undo_toast.borrow_mut() = Some((ticket, toast));
    }

    fn app_config_undo_secs(&self) -> u32 {
        self.application()
            .and_downcast::<Application>()
            .map(|app| app.config().undo_secs())
            .unwrap_or(10)
    }

    /// Send a committed removal to the service.
    fn remove_account(&self, account: Account) {
        let Some(client) = self.imp().client.borrow().clone() else {
            warn!("Cannot remove {}: not connected", account.id);
            if let Some(page) = self.accounts_page() {
                page.removal_failed(account);
            }
            return;
        };

        // Keep the application alive until the service has answered
        let hold = self.application().map(|app| app.hold());

        let win_weak = self.downgrade();
        glib::spawn_future_local(async move {
            let target = account.clone();
            let result = run_on_runtime(async move { client.remove_account(&target).await }).await;
            drop(hold);

            let Err(e) = result else {
                info!("Removed account {}", account.id);
                return;
            };

            warn!("Failed to remove account {}: {}", account.id, e);
            let Some(win) = win_weak.upgrade() else { return };
            if let Some(page) = win.accounts_page() {
                page.removal_failed(account);
            }
            win.show_error_dialog(&i18n!("Error removing account"), &e.to_string());
        });
    }

    fn show_error_dialog(&self, heading: &str, body: &str) {
        let dialog = adw::AlertDialog::new(Some(heading), Some(body));
        dialog.add_response("close", &i18n!("Close"));
        dialog.set_default_response(Some("close"));
        dialog.set_close_response("close");
        dialog.present(Some(self));
    }
}

impl AccountsObserver for MainWindow {
    fn account_added(&self, account: Account) {
        debug!("Account added: {}", account.id);
        if let Some(page) = self.accounts_page() {
            page.account_added(account.clone());
        }
        self.take_new_account(Some(&account));
    }

    fn account_changed(&self, account: Account) {
        debug!("Account changed: {}", account.id);
        if let Some(page) = self.accounts_page() {
            page.account_changed(account.clone());
        }
        if let Some(detail) = self.detail_page() {
            if detail.account_id().as_ref() == Some(&account.id) {
                detail.set_account(&account);
            }
        }
    }

    fn account_removed(&self, id: &AccountId) {
        debug!("Account removed: {}", id);
        let Some(page) = self.accounts_page() else { return };

        if page.account_removed(id) == RemoveOutcome::PendingCompleted {
            if let Some((_, toast)) = self.imp().undo_toast.take() {
                toast.dismiss();
            }
        }
        self.close_account_detail(id);
    }
}
