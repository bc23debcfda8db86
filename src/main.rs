// Online Accounts GTK - Main Entry Point
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! # Online Accounts GTK
//!
//! A GTK4/libadwaita front-end for GNOME Online Accounts.
//!
//! This is the main entry point for the GUI application.

use gtk4::prelude::*;
use gtk4::glib;
use std::env;

mod application;
mod backend;
mod lists;
mod models;
mod storage;
mod ui;

use application::Application;

/// Application ID for GNOME/Freedesktop.
pub const APP_ID: &str = models::APP_ID;

/// Human-readable application name.
pub const APP_NAME: &str = "Online Accounts";

/// Application version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Gettext domain for translations.
pub const GETTEXT_DOMAIN: &str = "gnome-online-accounts-gtk";

/// Print version information and exit.
fn print_version() {
    println!("{} {}", env!("CARGO_PKG_NAME"), VERSION);
}

/// Print help information and exit.
fn print_help() {
    println!(
        "Usage: {} [OPTIONS]",
        env::args().next().unwrap_or_else(|| env!("CARGO_PKG_NAME").to_string())
    );
    println!();
    println!("Add, manage and remove your online accounts.");
    println!();
    println!("Options:");
    println!("  -h, --help       Show this help message and exit");
    println!("      --version    Show version information and exit");
    println!("  -d, --debug      Enable debug logging");
    println!();
    println!("Environment variables:");
    println!("  RUST_LOG              Set log level (trace, debug, info, warn, error)");
    println!("  USE_LIBADWAITA_THEME  Use the libadwaita look instead of the GTK theme");
}

/// Initialize internationalization (gettext).
fn setup_i18n() {
    use gettextrs::{bindtextdomain, setlocale, textdomain, LocaleCategory};

    setlocale(LocaleCategory::LcAll, "");

    let locale_dirs = [
        "/usr/share/locale",
        "/usr/local/share/locale",
        concat!(env!("CARGO_MANIFEST_DIR"), "/po"),
    ];

    for dir in &locale_dirs {
        if std::path::Path::new(dir).exists() {
            if let Err(e) = bindtextdomain(GETTEXT_DOMAIN, *dir) {
                tracing::warn!("Failed to bind textdomain to {}: {}", dir, e);
            } else {
                tracing::debug!("Bound textdomain to {}", dir);
                break;
            }
        }
    }

    if let Err(e) = textdomain(GETTEXT_DOMAIN) {
        tracing::warn!("Failed to set textdomain: {}", e);
    }
}

/// Keep the system GTK theme once libadwaita is initialized.
///
/// libadwaita replaces the theme unless `GTK_THEME` is set, so the current
/// theme name is exported before it loads.
fn preserve_gtk_theme(config: &models::AppConfig) {
    let gtk_theme_set = env::var_os("GTK_THEME").is_some();
    let libadwaita_env = env::var_os("USE_LIBADWAITA_THEME").is_some();
    if !config.exports_gtk_theme(gtk_theme_set, libadwaita_env) {
        return;
    }

    let Some(settings) = gtk4::Settings::default() else {
        return;
    };
    if let Some(theme_name) = settings.gtk_theme_name() {
        tracing::info!("Setting GTK_THEME variable to '{}'", theme_name);
        env::set_var("GTK_THEME", theme_name.as_str());
    }
}

/// What the command line asked for.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Run { debug: bool },
    Help,
    Version,
    Unknown(String),
}

/// Parse the arguments that follow the program name.
fn parse_args<S: AsRef<str>>(args: &[S]) -> Command {
    let mut debug = false;

    for arg in args {
        match arg.as_ref() {
            "-h" | "--help" => return Command::Help,
            "--version" => return Command::Version,
            "-d" | "--debug" => debug = true,
            other if other.starts_with('-') => return Command::Unknown(other.to_string()),
            _ => {}
        }
    }

    Command::Run { debug }
}

fn main() -> glib::ExitCode {
    // Parse command-line arguments before GTK initialization
    let args: Vec<String> = env::args().collect();
    let (program, options) = args.split_first().map_or((&[][..], &[][..]), |(first, rest)| {
        (std::slice::from_ref(first), rest)
    });

    let debug_mode = match parse_args(options) {
        Command::Run { debug } => debug,
        Command::Help => {
            print_help();
            return glib::ExitCode::SUCCESS;
        }
        Command::Version => {
            print_version();
            return glib::ExitCode::SUCCESS;
        }
        Command::Unknown(arg) => {
            eprintln!("Unknown option: {}", arg);
            eprintln!("Try '--help' for more information.");
            return glib::ExitCode::FAILURE;
        }
    };

    // Set the program name to match StartupWMClass in the .desktop file
    glib::set_prgname(Some(APP_ID));
    glib::set_application_name(APP_NAME);

    // Initialize logging with appropriate level
    let log_level = if debug_mode {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(log_level.into()),
        )
        .init();

    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    setup_i18n();

    if let Err(e) = gtk4::init() {
        eprintln!("Failed to initialize GTK: {}", e);
        eprintln!("This application requires a graphical environment.");
        return glib::ExitCode::FAILURE;
    }

    preserve_gtk_theme(&storage::DataStore::new().settings());

    if let Err(e) = libadwaita::init() {
        eprintln!("Failed to initialize libadwaita: {}", e);
        return glib::ExitCode::FAILURE;
    }

    // Arguments were handled above; GApplication only sees the program name
    let app = Application::new();
    app.run_with_args(program)
}

/// Helper macro for gettext translations.
#[macro_export]
macro_rules! i18n {
    ($s:expr) => {
        gettextrs::gettext($s)
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_arguments_runs() {
        let args: [&str; 0] = [];
        assert_eq!(parse_args(&args), Command::Run { debug: false });
    }

    #[test]
    fn test_debug_flag() {
        assert_eq!(parse_args(&["--debug"]), Command::Run { debug: true });
        assert_eq!(parse_args(&["-d"]), Command::Run { debug: true });
    }

    #[test]
    fn test_help_and_version_win() {
        assert_eq!(parse_args(&["-d", "--help"]), Command::Help);
        assert_eq!(parse_args(&["--version", "-d"]), Command::Version);
    }

    #[test]
    fn test_unknown_option() {
        assert_eq!(parse_args(&["--frobnicate"]), Command::Unknown("--frobnicate".to_string()));
        assert_eq!(parse_args(&["leftover"]), Command::Run { debug: false });
    }
}
