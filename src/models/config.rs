// Online Accounts GTK - Application Configuration
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Application configuration model.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::Provider;

/// Theme preference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ThemePreference {
    /// Follow system theme.
    #[default]
    System,
    /// Force light theme.
    Light,
    /// Force dark theme.
    Dark,
}

impl ThemePreference {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "system",
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Position in the preferences combo row.
    pub fn index(&self) -> u32 {
        match self {
            Self::System => 0,
            Self::Light => 1,
            Self::Dark => 2,
        }
    }

    pub fn from_index(index: u32) -> Self {
        match index {
            1 => Self::Light,
            2 => Self::Dark,
            _ => Self::System,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Theme preference.
    #[serde(default)]
    pub theme: ThemePreference,

    /// Seconds a removed account can still be restored.
    #[serde(default = "default_undo_timeout")]
    pub undo_timeout_secs: u32,

    /// Use the stock libadwaita look instead of the system GTK theme.
    #[serde(default)]
    pub use_libadwaita_theme: bool,

    /// Program that hosts the provider add/manage dialogs.
    #[serde(default = "default_launcher")]
    pub control_center_command: String,

    /// Providers added to the built-in catalog.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_providers: Vec<Provider>,

    /// Window width.
    #[serde(default = "default_window_width")]
    pub window_width: i32,

    /// Window height.
    #[serde(default = "default_window_height")]
    pub window_height: i32,

    /// Window maximized state.
    #[serde(default)]
    pub window_maximized: bool,
}

fn default_undo_timeout() -> u32 {
    10
}

fn default_launcher() -> String {
    "gnome-control-center".to_string()
}

fn default_window_width() -> i32 {
    640
}

fn default_window_height() -> i32 {
    720
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            theme: ThemePreference::System,
            undo_timeout_secs: default_undo_timeout(),
            use_libadwaita_theme: false,
            control_center_command: default_launcher(),
            extra_providers: Vec::new(),
            window_width: default_window_width(),
            window_height: default_window_height(),
            window_maximized: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from TOML file.
    pub fn load_from_file(path: &std::path::Path) -> Result<Self, super::Error> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| super::Error::ConfigReadFailed(format!("{}: {}", path.display(), e)))?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to TOML file with restrictive permissions (0600).
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), super::Error> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600));
        }
        Ok(())
    }

    /// Undo window for account removal, in whole seconds. Never zero.
    pub fn undo_secs(&self) -> u32 {
        self.undo_timeout_secs.max(1)
    }

    /// Undo window for account removal. Never zero.
    pub fn undo_timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.undo_secs()))
    }

    /// Whether the libadwaita stylesheet should be used as-is.
    ///
    /// `USE_LIBADWAITA_THEME` in the environment overrides the setting.
    pub fn wants_libadwaita_theme(&self) -> bool {
        self.libadwaita_theme_requested(std::env::var_os("USE_LIBADWAITA_THEME").is_some())
    }

    fn libadwaita_theme_requested(&self, env_flag: bool) -> bool {
        self.use_libadwaita_theme || env_flag
    }

    /// Whether the system theme name must be exported as `GTK_THEME`
    /// before libadwaita loads.
    ///
    /// Nothing is exported when `GTK_THEME` is already set or when the
    /// libadwaita look was asked for, by setting or by environment.
    pub fn exports_gtk_theme(&self, gtk_theme_set: bool, libadwaita_env: bool) -> bool {
        !gtk_theme_set && !self.libadwaita_theme_requested(libadwaita_env)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.undo_timeout(), Duration::from_secs(10));
        assert_eq!(config.control_center_command, "gnome-control-center");
        assert_eq!(config.theme, ThemePreference::System);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config should parse");
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn test_partial_file() {
        let config: AppConfig = toml::from_str(
            r#"
            theme = "dark"
            undo_timeout_secs = 5

            [[extra_providers]]
            provider_type = "mastodon"
            name = "Mastodon"

            [extra_providers.features]
            branded = true
            "#,
        )
        .expect("config should parse");

        assert_eq!(config.theme, ThemePreference::Dark);
        assert_eq!(config.undo_timeout(), Duration::from_secs(5));
        assert_eq!(config.extra_providers.len(), 1);
        assert!(config.extra_providers[0].is_branded());
        assert_eq!(config.window_width, 640);
    }

    #[test]
    fn test_zero_undo_timeout_is_clamped() {
        let config = AppConfig {
            undo_timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.undo_timeout(), Duration::from_secs(1));
        assert_eq!(config.undo_secs(), 1);
    }

    #[test]
    fn test_large_undo_timeout_keeps_whole_seconds() {
        let config = AppConfig {
            undo_timeout_secs: u32::MAX,
            ..Default::default()
        };
        assert_eq!(config.undo_secs(), u32::MAX);
        assert_eq!(config.undo_timeout(), Duration::from_secs(u64::from(u32::MAX)));
    }

    #[test]
    fn test_gtk_theme_export() {
        let config = AppConfig::default();
        assert!(config.exports_gtk_theme(false, false));
        assert!(!config.exports_gtk_theme(true, false));
        assert!(!config.exports_gtk_theme(false, true));
    }

    #[test]
    fn test_persisted_libadwaita_theme_skips_gtk_theme_export() {
        let config: AppConfig =
            toml::from_str("use_libadwaita_theme = true").expect("config should parse");
        assert!(!config.exports_gtk_theme(false, false));
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("goa-gtk-config-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("temp dir");
        let path = dir.join("settings.toml");

        let config = AppConfig {
            theme: ThemePreference::Light,
            window_maximized: true,
            ..Default::default()
        };
        config.save_to_file(&path).expect("save");
        let loaded = AppConfig::load_from_file(&path).expect("load");
        assert_eq!(loaded, config);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_theme_index() {
        for theme in [ThemePreference::System, ThemePreference::Light, ThemePreference::Dark] {
            assert_eq!(ThemePreference::from_index(theme.index()), theme);
        }
        assert_eq!(ThemePreference::from_index(42), ThemePreference::System);
    }
}
