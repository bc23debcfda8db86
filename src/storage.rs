// Online Accounts GTK - Local Storage
// Copyright (C) 2026 Online Accounts GTK Contributors
// SPDX-License-Identifier: GPL-3.0-or-later

//! Persistence of application settings.
//!
//! Account data is never stored here; it belongs to the accounts service.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use tracing::{error, info, warn};

use crate::models::{AppConfig, Result, CONFIG_DIR_NAME};

/// Settings store backed by `settings.toml` in the config directory.
#[derive(Debug)]
pub struct DataStore {
    /// Configuration directory path.
    config_dir: PathBuf,
    /// Settings file path.
    settings_file: PathBuf,
    /// Application settings.
    settings: RwLock<AppConfig>,
}

impl DataStore {
    /// Create a new data store with default config directory.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_DIR_NAME);
        Self::with_config_dir(config_dir)
    }

    /// Create a new data store with a specific config directory.
    pub fn with_config_dir(config_dir: PathBuf) -> Self {
        if let Err(e) = fs::create_dir_all(&config_dir) {
            error!("Failed to create config directory: {}", e);
        }
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = fs::set_permissions(&config_dir, fs::Permissions::from_mode(0o700));
        }

        let store = Self {
            settings_file: config_dir.join("settings.toml"),
            config_dir,
            settings: RwLock::new(AppConfig::default()),
        };

        store.load_settings();
        store
    }

    /// Load settings from disk, keeping defaults on any failure.
    fn load_settings(&self) {
        if !self.settings_file.exists() {
            return;
        }
        match AppConfig::load_from_file(&self.settings_file) {
            Ok(config) => {
                match self.settings.write() {
                    Ok(mut guard) => *guard = config,
                    Err(poisoned) => *poisoned.into_inner() = config,
                }
                info!("Loaded settings from {:?}", self.settings_file);
            }
            Err(e) => {
                warn!("Failed to load settings, using defaults: {}", e);
            }
        }
    }

    /// Get the current settings.
    pub fn settings(&self) -> AppConfig {
        match self.settings.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => {
                warn!("RwLock poisoned reading settings, recovering");
                poisoned.into_inner().clone()
            }
        }
    }

    /// Replace the settings and write them to disk.
    pub fn update_settings(&self, settings: AppConfig) -> Result<()> {
        settings.save_to_file(&self.settings_file)?;
        match self.settings.write() {
            Ok(mut guard) => *guard = settings,
            Err(poisoned) => *poisoned.into_inner() = settings,
        }
        Ok(())
    }

    /// Get the config directory path.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }
}

impl Default for DataStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ThemePreference;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("goa-gtk-{}-{}", name, std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = temp_dir("missing");
        let store = DataStore::with_config_dir(dir.clone());
        assert_eq!(store.settings(), AppConfig::default());
        assert!(store.config_dir().exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_update_persists() {
        let dir = temp_dir("persist");
        let store = DataStore::with_config_dir(dir.clone());
        let settings = AppConfig {
            theme: ThemePreference::Dark,
            undo_timeout_secs: 20,
            ..Default::default()
        };
        store.update_settings(settings.clone()).expect("save settings");

        let reopened = DataStore::with_config_dir(dir.clone());
        assert_eq!(reopened.settings(), settings);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn test_corrupt_file_gives_defaults() {
        let dir = temp_dir("corrupt");
        fs::create_dir_all(&dir).expect("temp dir");
        fs::write(dir.join("settings.toml"), "theme = [not toml").expect("write");

        let store = DataStore::with_config_dir(dir.clone());
        assert_eq!(store.settings(), AppConfig::default());
        let _ = fs::remove_dir_all(dir);
    }
}
