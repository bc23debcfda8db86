// Online Accounts GTK - Models
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! # Shared Models
//!
//! Plain data types shared between the backend clients and the UI:
//!
//! - **Account**: display copy of an account held by the accounts service
//! - **Provider**: an account type that can be added
//! - **Config**: persisted application settings
//! - **Error**: shared error type
//!
//! None of these types touch GTK, so the list adapters built on them can be
//! exercised without a display.

pub mod account;
pub mod config;
pub mod error;
pub mod provider;

pub use account::{Account, AccountId};
pub use config::{AppConfig, ThemePreference};
pub use error::{Error, Result};
pub use provider::{Provider, ProviderFeatures};

/// Application ID (matches desktop/D-Bus identifiers).
pub const APP_ID: &str = "org.x.GnomeOnlineAccountsGtk";

/// Well-known bus name of the accounts service.
pub const GOA_SERVICE_NAME: &str = "org.gnome.OnlineAccounts";

/// Object manager path of the accounts service.
pub const GOA_MANAGER_PATH: &str = "/org/gnome/OnlineAccounts";

/// Prefix under which the service exports account objects.
pub const GOA_ACCOUNTS_PATH: &str = "/org/gnome/OnlineAccounts/Accounts";

/// D-Bus interface carrying account properties.
pub const GOA_ACCOUNT_INTERFACE: &str = "org.gnome.OnlineAccounts.Account";

/// Configuration directory name (under XDG_CONFIG_HOME).
pub const CONFIG_DIR_NAME: &str = "gnome-online-accounts-gtk";
