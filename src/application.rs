//! Adwaita application root object and lifecycle wiring.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use adw::prelude::*;
use adw::subclass::prelude::*;
use std::cell::RefCell;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::i18n;
use crate::models::{AppConfig, Error, Result, ThemePreference};
use crate::storage::DataStore;
use crate::ui::MainWindow;
use crate::{APP_ID, APP_NAME, VERSION};

/// Global Tokio runtime for D-Bus traffic.
static TOKIO_RUNTIME: std::sync::OnceLock<tokio::runtime::Runtime> = std::sync::OnceLock::new();

/// Get the global Tokio runtime handle.
pub fn tokio_runtime() -> &'static tokio::runtime::Runtime {
    TOKIO_RUNTIME.get_or_init(|| {
        tokio::runtime::Builder::new_multi_thread()
            .worker_threads(2)
            .enable_all()
            .build()
            .expect("Failed to create Tokio runtime")
    })
}

/// Run `future` on the Tokio runtime and await its result from the main loop.
pub async fn run_on_runtime<F, T>(future: F) -> Result<T>
where
    F: Future<Output = Result<T>> + Send + 'static,
    T: Send + 'static,
{
    let (tx, rx) = tokio::sync::oneshot::channel();
    tokio_runtime().spawn(async move {
        let _ = tx.send(future.await);
    });
    rx.await
        .map_err(|_| Error::Internal("runtime task dropped its result".to_string()))?
}

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct Application {
        pub data_store: RefCell<Option<Arc<DataStore>>>,
        pub config: RefCell<AppConfig>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for Application {
        const NAME: &'static str = "OaApplication";
        type Type = super::Application;
        type ParentType = adw::Application;
    }

    impl ObjectImpl for Application {
        fn constructed(&self) {
            self.parent_constructed();
            let obj = self.obj();
            obj.setup_actions();
            obj.set_accels_for_action("app.quit", &["<primary>q"]);
        }
    }

    impl ApplicationImpl for Application {
        fn activate(&self) {
            let application = self.obj();

            let window = if let Some(window) = application.active_window() {
                window
            } else {
                let window = MainWindow::new(&*application);
                window.start();
                window.upcast()
            };

            window.present();
        }

        fn startup(&self) {
            self.parent_startup();
            let obj = self.obj();

            info!("{} {} starting up", APP_NAME, VERSION);

            gtk::Window::set_default_icon_name("goa-panel");

            let data_store = Arc::new(DataStore::new());
            debug!("Settings directory: {}", data_store.config_dir().display());
            let config = data_store.settings();
            *self.data_store.borrow_mut() = Some(data_store);
            *self.config.borrow_mut() = config.clone();

            obj.apply_theme(config.theme);

            if config.wants_libadwaita_theme() {
                info!("Using the libadwaita stylesheet");
            } else {
                obj.load_css();
            }
        }
    }

    impl GtkApplicationImpl for Application {}
    impl AdwApplicationImpl for Application {}
}

glib::wrapper! {
    pub struct Application(ObjectSubclass<imp::Application>)
        @extends gio::Application, gtk::Application, adw::Application,
        @implements gio::ActionGroup, gio::ActionMap;
}

impl Application {
    pub fn new() -> Self {
        glib::Object::builder()
            .property("application-id", APP_ID)
            .property("flags", gio::ApplicationFlags::FLAGS_NONE)
            .build()
    }

    fn setup_actions(&self) {
        let action_quit = gio::ActionEntry::builder("quit")
            .activate(move |app: &Self, _, _| {
                app.quit();
            })
            .build();

        let action_about = gio::ActionEntry::builder("about")
            .activate(move |app: &Self, _, _| {
                app.show_about();
            })
            .build();

        let action_preferences = gio::ActionEntry::builder("preferences")
            .activate(move |app: &Self, _, _| {
                app.show_preferences();
            })
            .build();

        self.add_action_entries([action_quit, action_about, action_preferences]);
    }

    /// Install the minimal stylesheet that makes the libadwaita widgets sit
    /// well on top of the system theme.
    fn load_css(&self) {
        let Some(display) = gtk::gdk::Display::default() else {
            warn!("No default display available; skipping CSS provider installation");
            return;
        };

        let provider = gtk::CssProvider::new();
        let css = include_str!("../data/style.css");
        provider.load_from_string(css);

        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }

    /// Apply the theme preference.
    pub fn apply_theme(&self, theme: ThemePreference) {
        let style_manager = adw::StyleManager::default();
        match theme {
            ThemePreference::System => {
                style_manager.set_color_scheme(adw::ColorScheme::Default);
            }
            ThemePreference::Light => {
                style_manager.set_color_scheme(adw::ColorScheme::ForceLight);
            }
            ThemePreference::Dark => {
                style_manager.set_color_scheme(adw::ColorScheme::ForceDark);
            }
        }
    }

    fn show_about(&self) {
        let window = self.active_window();

        let about = adw::AboutDialog::builder()
            .application_name(APP_NAME)
            .application_icon("goa-panel")
            .developer_name("Linux Mint")
            .version(VERSION)
            .license_type(gtk::License::Gpl30)
            .website("https://www.github.com/linuxmint/gnome-online-accounts-gtk")
            .issue_url("https://github.com/linuxmint/gnome-online-accounts-gtk/issues")
            .comments(i18n!("Connect your online accounts"))
            .translator_credits(i18n!("translator-credits"))
            .build();

        about.present(window.as_ref());
    }

    fn show_preferences(&self) {
        let window = self.active_window();

        let dialog = adw::PreferencesDialog::new();
        dialog.set_title(&i18n!("Preferences"));

        let appearance_page = adw::PreferencesPage::new();
        appearance_page.set_title(&i18n!("Appearance"));
        appearance_page.set_icon_name(Some("preferences-desktop-appearance-symbolic"));

        let theme_group = adw::PreferencesGroup::new();
        theme_group.set_title(&i18n!("Theme"));

        let labels = [i18n!("Follow System"), i18n!("Light"), i18n!("Dark")];
        let labels: Vec<&str> = labels.iter().map(String::as_str).collect();
        let theme_model = gtk::StringList::new(&labels);
        let theme_row = adw::ComboRow::builder()
            .title(i18n!("Color Scheme"))
            .subtitle(i18n!("Choose the application's appearance"))
            .model(&theme_model)
            .build();
        theme_row.set_selected(self.config().theme.index());

        let app_weak = self.downgrade();
        theme_row.connect_selected_notify(move |row| {
            if let Some(app) = app_weak.upgrade() {
                let theme = ThemePreference::from_index(row.selected());
                app.apply_theme(theme);
                let mut config = app.config();
                config.theme = theme;
                app.update_config(config);
            }
        });

        theme_group.add(&theme_row);
        appearance_page.add(&theme_group);

        let accounts_group = adw::PreferencesGroup::new();
        accounts_group.set_title(&i18n!("Accounts"));

        let undo_row = adw::SpinRow::with_range(1.0, 60.0, 1.0);
        undo_row.set_title(&i18n!("Undo Time"));
        undo_row.set_subtitle(&i18n!("Seconds a removed account can be restored"));
        undo_row.set_value(f64::from(self.config().undo_timeout_secs));

        let app_weak = self.downgrade();
        undo_row.connect_value_notify(move |row| {
            if let Some(app) = app_weak.upgrade() {
                let mut config = app.config();
                config.undo_timeout_secs = row.value() as u32;
                let timeout = config.undo_timeout();
                app.update_config(config);
                if let Some(window) = app.active_window().and_downcast::<MainWindow>() {
                    window.set_undo_timeout(timeout);
                }
            }
        });

        accounts_group.add(&undo_row);
        appearance_page.add(&accounts_group);

        dialog.add(&appearance_page);
        dialog.present(window.as_ref());
    }

    /// Get the data store.
    pub fn data_store(&self) -> Option<Arc<DataStore>> {
        self.imp().data_store.borrow().clone()
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.imp().config.borrow().clone()
    }

    /// Update and save configuration.
    pub fn update_config(&self, config: AppConfig) {
        *self.imp().config.borrow_mut() = config.clone();
        if let Some(store) = self.data_store() {
            if let Err(e) = store.update_settings(config) {
                warn!("Failed to save settings: {}", e);
            }
        }
    }
}

impl Default for Application {
    fn default() -> Self {
        Self::new()
    }
}
