// Online Accounts GTK - Network State
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Reflects network availability into the window.
//!
//! While offline the banner is revealed and the provider list is made
//! insensitive, since adding an account needs the network.

use gtk4 as gtk;
use gtk4::prelude::*;
use gtk4::{gio, glib};
use libadwaita as adw;
use tracing::debug;

/// UI state derived from network availability.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkState {
    pub offline_banner_revealed: bool,
    pub providers_sensitive: bool,
}

impl NetworkState {
    pub fn from_available(available: bool) -> Self {
        Self {
            offline_banner_revealed: !available,
            providers_sensitive: available,
        }
    }
}

/// Keeps an offline banner and the provider list in step with the
/// platform network monitor.
pub struct NetworkStateReflector {
    monitor: gio::NetworkMonitor,
    handler: Option<glib::SignalHandlerId>,
}

impl NetworkStateReflector {
    /// Subscribe to the default monitor and sync immediately.
    pub fn attach(banner: &adw::Banner, providers: &impl IsA<gtk::Widget>) -> Self {
        let monitor = gio::NetworkMonitor::default();

        let banner_weak = banner.downgrade();
        let providers_weak = providers.as_ref().downgrade();
        let sync = move |available: bool| {
            let state = NetworkState::from_available(available);
            debug!("Network available: {}", available);
            if let Some(banner) = banner_weak.upgrade() {
                banner.set_revealed(state.offline_banner_revealed);
            }
            if let Some(providers) = providers_weak.upgrade() {
                providers.set_sensitive(state.providers_sensitive);
            }
        };

        sync(monitor.is_network_available());
        let handler = monitor.connect_network_available_notify(move |monitor| {
            sync(monitor.is_network_available());
        });

        Self {
            monitor,
            handler: Some(handler),
        }
    }
}

impl Drop for NetworkStateReflector {
    fn drop(&mut self) {
        if let Some(handler) = self.handler.take() {
            self.monitor.disconnect(handler);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_online_state() {
        let state = NetworkState::from_available(true);
        assert!(!state.offline_banner_revealed);
        assert!(state.providers_sensitive);
    }

    #[test]
    fn test_offline_state() {
        let state = NetworkState::from_available(false);
        assert!(state.offline_banner_revealed);
        assert!(!state.providers_sensitive);
    }
}
