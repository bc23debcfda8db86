// Online Accounts GTK - Provider Model
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Account providers and the built-in provider catalog.

use serde::{Deserialize, Serialize};

/// Feature flags advertised by a provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFeatures {
    /// Provider is a named service (as opposed to a generic protocol).
    #[serde(default)]
    pub branded: bool,
    #[serde(default)]
    pub mail: bool,
    #[serde(default)]
    pub calendar: bool,
    #[serde(default)]
    pub contacts: bool,
    #[serde(default)]
    pub documents: bool,
    #[serde(default)]
    pub files: bool,
    #[serde(default)]
    pub ticketing: bool,
}

impl ProviderFeatures {
    /// Short list of feature names for display.
    pub fn labels(&self) -> Vec<&'static str> {
        let mut labels = Vec::new();
        if self.mail {
            labels.push("Mail");
        }
        if self.calendar {
            labels.push("Calendar");
        }
        if self.contacts {
            labels.push("Contacts");
        }
        if self.documents {
            labels.push("Documents");
        }
        if self.files {
            labels.push("Files");
        }
        if self.ticketing {
            labels.push("Enterprise Login");
        }
        labels
    }
}

/// An account type that can be added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Provider {
    /// Provider type key, e.g. `google`. Matches `Account::provider_type`.
    pub provider_type: String,
    /// Display name.
    pub name: String,
    /// Themed icon name.
    #[serde(default)]
    pub icon_name: String,
    #[serde(default)]
    pub features: ProviderFeatures,
}

impl Provider {
    pub fn new(provider_type: impl Into<String>, name: impl Into<String>) -> Self {
        let provider_type = provider_type.into();
        Self {
            icon_name: format!("goa-account-{}", provider_type),
            provider_type,
            name: name.into(),
            features: ProviderFeatures::default(),
        }
    }

    pub fn branded(mut self) -> Self {
        self.features.branded = true;
        self
    }

    pub fn with_features(mut self, features: ProviderFeatures) -> Self {
        let branded = self.features.branded;
        self.features = features;
        self.features.branded |= branded;
        self
    }

    pub fn is_branded(&self) -> bool {
        self.features.branded
    }
}

/// Providers shipped by the accounts service, in its enumeration order.
pub fn builtin_catalog() -> Vec<Provider> {
    let groupware = ProviderFeatures {
        mail: true,
        calendar: true,
        contacts: true,
        files: true,
        ..Default::default()
    };

    vec![
        Provider::new("google", "Google").branded().with_features(ProviderFeatures {
            documents: true,
            ..groupware
        }),
        Provider::new("owncloud", "Nextcloud").branded().with_features(ProviderFeatures {
            mail: false,
            ..groupware
        }),
        Provider::new("ms365", "Microsoft 365").branded().with_features(ProviderFeatures {
            mail: true,
            files: true,
            ..Default::default()
        }),
        Provider::new("exchange", "Microsoft Exchange").branded().with_features(ProviderFeatures {
            files: false,
            ..groupware
        }),
        Provider::new("fedora", "Fedora").branded().with_features(ProviderFeatures {
            ticketing: true,
            ..Default::default()
        }),
        Provider::new("imap_smtp", "IMAP and SMTP").with_features(ProviderFeatures {
            mail: true,
            ..Default::default()
        }),
        Provider::new("webdav", "WebDAV").with_features(ProviderFeatures {
            calendar: true,
            contacts: true,
            files: true,
            ..Default::default()
        }),
        Provider::new("kerberos", "Enterprise Login (Kerberos)").with_features(ProviderFeatures {
            ticketing: true,
            ..Default::default()
        }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_defaults_icon_from_type() {
        let provider = Provider::new("google", "Google");
        assert_eq!(provider.icon_name, "goa-account-google");
        assert!(!provider.is_branded());
        assert!(provider.branded().is_branded());
    }

    #[test]
    fn test_with_features_keeps_branding() {
        let provider = Provider::new("google", "Google")
            .branded()
            .with_features(ProviderFeatures {
                mail: true,
                ..Default::default()
            });
        assert!(provider.is_branded());
        assert_eq!(provider.features.labels(), vec!["Mail"]);
    }

    #[test]
    fn test_builtin_catalog() {
        let catalog = builtin_catalog();
        assert_eq!(catalog.len(), 8);
        assert!(catalog.iter().any(|p| p.provider_type == "imap_smtp" && !p.is_branded()));
        assert!(catalog.iter().any(|p| p.provider_type == "google" && p.is_branded()));
    }
}
