// Online Accounts GTK - Provider Backend
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Provider enumeration and the provider-specific dialogs.
//!
//! The sign-in and account settings dialogs belong to the desktop's online
//! accounts panel. This backend launches it for the requested provider or
//! account and waits for it on the main loop.

use gtk4::gio;
use std::ffi::OsStr;
use tracing::{debug, info};

use crate::models::provider::builtin_catalog;
use crate::models::{Account, AppConfig, Error, Provider, Result};

/// Panel name passed to the launcher.
const PANEL: &str = "online-accounts";

/// Provider catalog plus the add/show account flows.
#[derive(Debug, Clone)]
pub struct ProviderBackend {
    launcher: String,
    extra_providers: Vec<Provider>,
}

impl ProviderBackend {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            launcher: config.control_center_command.clone(),
            extra_providers: config.extra_providers.clone(),
        }
    }

    /// Enumerate available providers.
    ///
    /// Configured providers replace built-in ones of the same type and are
    /// otherwise appended. The catalog is local, so the future is ready on
    /// its first poll; it stays async to match the other provider calls.
    pub async fn all(&self) -> Result<Vec<Provider>> {
        let mut providers = builtin_catalog();
        for extra in &self.extra_providers {
            match providers
                .iter_mut()
                .find(|p| p.provider_type == extra.provider_type)
            {
                Some(existing) => *existing = extra.clone(),
                None => providers.push(extra.clone()),
            }
        }
        debug!("Enumerated {} provider(s)", providers.len());
        Ok(providers)
    }

    /// Run the sign-in flow for `provider`.
    pub async fn add_account(&self, provider: &Provider) -> Result<()> {
        info!("Adding {} account", provider.provider_type);
        self.run("Add account", &[PANEL, "add", provider.provider_type.as_str()])
            .await
    }

    /// Open the provider's settings for `account`.
    pub async fn show_account(&self, account: &Account) -> Result<()> {
        info!("Showing account {}", account.id);
        self.run("Show account", &[PANEL, account.id.as_str()]).await
    }

    fn argv<'a>(&'a self, args: &[&'a str]) -> Vec<&'a OsStr> {
        std::iter::once(self.launcher.as_str())
            .chain(args.iter().copied())
            .map(OsStr::new)
            .collect()
    }

    async fn run(&self, flow: &str, args: &[&str]) -> Result<()> {
        let argv = self.argv(args);
        let process = gio::Subprocess::newv(&argv, gio::SubprocessFlags::NONE).map_err(|e| {
            Error::LaunchFailed {
                program: self.launcher.clone(),
                reason: e.to_string(),
            }
        })?;

        match process.wait_check_future().await {
            Ok(()) => Ok(()),
            Err(e) => match Error::from(e) {
                Error::DialogDismissed => Err(Error::DialogDismissed),
                other => Err(Error::flow_failed(flow, other.to_string())),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ProviderFeatures;

    fn backend(extra: Vec<Provider>) -> ProviderBackend {
        ProviderBackend::new(&AppConfig {
            extra_providers: extra,
            ..Default::default()
        })
    }

    #[test]
    fn test_enumeration_matches_catalog() {
        let providers = glib::MainContext::default().block_on(backend(Vec::new()).all());
        assert_eq!(providers.expect("enumeration").len(), builtin_catalog().len());
    }

    #[test]
    fn test_enumeration_is_ready_on_first_poll() {
        use futures_util::FutureExt;

        let providers = backend(Vec::new())
            .all()
            .now_or_never()
            .expect("enumeration should not suspend");
        assert!(!providers.expect("enumeration").is_empty());
    }

    #[test]
    fn test_extra_providers_override_and_append() {
        let backend = backend(vec![
            Provider::new("webdav", "My WebDAV").branded(),
            Provider::new("mastodon", "Mastodon").with_features(ProviderFeatures {
                contacts: true,
                ..Default::default()
            }),
        ]);
        let providers = glib::MainContext::default()
            .block_on(backend.all())
            .expect("enumeration");

        assert_eq!(providers.len(), builtin_catalog().len() + 1);
        let webdav = providers
            .iter()
            .find(|p| p.provider_type == "webdav")
            .expect("webdav present");
        assert_eq!(webdav.name, "My WebDAV");
        assert!(webdav.is_branded());
        assert_eq!(providers.last().map(|p| p.name.as_str()), Some("Mastodon"));
    }

    #[test]
    fn test_launcher_arguments() {
        let backend = backend(Vec::new());
        let argv = backend.argv(&[PANEL, "add", "google"]);
        assert_eq!(
            argv,
            vec![
                OsStr::new("gnome-control-center"),
                OsStr::new("online-accounts"),
                OsStr::new("add"),
                OsStr::new("google"),
            ]
        );
    }

    #[test]
    fn test_missing_launcher_is_reported() {
        let backend = ProviderBackend::new(&AppConfig {
            control_center_command: "/nonexistent/launcher".into(),
            ..Default::default()
        });
        let account = Account::new("account_1", "google");
        let result = glib::MainContext::default().block_on(backend.show_account(&account));
        assert!(matches!(result, Err(Error::LaunchFailed { .. })));
    }
}
