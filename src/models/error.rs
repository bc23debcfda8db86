// Online Accounts GTK - Error Types
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Shared error types for the application.

use thiserror::Error;

/// Result type alias for application operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================
    // Accounts Service Errors
    // ========================================
    #[error("D-Bus error: {0}")]
    Dbus(String),

    #[error("Could not reach the online accounts service: {0}")]
    ClientUnavailable(String),

    #[error("Malformed account object {path}: {reason}")]
    MalformedAccount { path: String, reason: String },

    #[error("Failed to remove account {account}: {reason}")]
    RemoveFailed { account: String, reason: String },

    // ========================================
    // Provider Flow Errors
    // ========================================
    #[error("Dialog dismissed")]
    DialogDismissed,

    #[error("Could not launch {program}: {reason}")]
    LaunchFailed { program: String, reason: String },

    #[error("{flow} flow failed: {reason}")]
    FlowFailed { flow: String, reason: String },

    // ========================================
    // Storage Errors
    // ========================================
    #[error("Failed to read configuration: {0}")]
    ConfigReadFailed(String),

    #[error("Failed to write configuration: {0}")]
    ConfigWriteFailed(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParseFailed(String),

    // ========================================
    // System Errors
    // ========================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create a new malformed account error.
    pub fn malformed(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedAccount {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a new flow failed error.
    pub fn flow_failed(flow: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::FlowFailed {
            flow: flow.into(),
            reason: reason.into(),
        }
    }

    /// The user closed the dialog; not something to report.
    pub fn is_dismissed(&self) -> bool {
        matches!(self, Self::DialogDismissed)
    }
}

// Convert from zbus errors
impl From<zbus::Error> for Error {
    fn from(err: zbus::Error) -> Self {
        Error::Dbus(err.to_string())
    }
}

impl From<zbus::fdo::Error> for Error {
    fn from(err: zbus::fdo::Error) -> Self {
        Error::Dbus(err.to_string())
    }
}

impl From<zbus::zvariant::Error> for Error {
    fn from(err: zbus::zvariant::Error) -> Self {
        Error::Dbus(err.to_string())
    }
}

impl From<glib::Error> for Error {
    fn from(err: glib::Error) -> Self {
        if err.matches(gio::IOErrorEnum::Cancelled) {
            Error::DialogDismissed
        } else {
            Error::Internal(err.to_string())
        }
    }
}

// Convert from toml parse errors
impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::ConfigParseFailed(err.to_string())
    }
}

// Convert from toml serialize errors
impl From<toml::ser::Error> for Error {
    fn from(err: toml::ser::Error) -> Self {
        Error::ConfigWriteFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dismissed_is_not_reported() {
        assert!(Error::DialogDismissed.is_dismissed());
        assert!(!Error::flow_failed("Add account", "boom").is_dismissed());
    }

    #[test]
    fn test_cancelled_glib_error_maps_to_dismissed() {
        let err = glib::Error::new(gio::IOErrorEnum::Cancelled, "cancelled");
        assert!(Error::from(err).is_dismissed());

        let err = glib::Error::new(gio::IOErrorEnum::NotFound, "missing");
        assert!(!Error::from(err).is_dismissed());
    }

    #[test]
    fn test_error_messages() {
        let err = Error::malformed("/org/gnome/OnlineAccounts/Accounts/x", "missing Id");
        assert_eq!(
            err.to_string(),
            "Malformed account object /org/gnome/OnlineAccounts/Accounts/x: missing Id"
        );
    }
}
