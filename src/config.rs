// This file is part of the product Stockyard.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    #[serde(default = "default_app_name")]
    pub name: String,
}

fn default_app_name() -> String {
    "Stockyard".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
}

fn default_bind() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8970
}

fn default_workers() -> usize {
    2
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            port: default_port(),
            workers: default_workers(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ListingConfig {
    /// Default page size for flat resource listings (products, suppliers).
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    10
}

impl Default for ListingConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

/// Configuration after structural validation. Loaded once at startup from
/// `config.yaml` in the runtime root; a starter file is written when none
/// exists yet.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ValidatedConfig {
    #[serde(default)]
    pub app: AppConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub listing: ListingConfig,
}

impl Default for ValidatedConfig {
    fn default() -> Self {
        Self {
            app: AppConfig::default(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            listing: ListingConfig::default(),
        }
    }
}

impl ValidatedConfig {
    /// Loads the config file, creating a starter file first when absent.
    /// Returns the validated config and whether the file was created.
    pub fn load_or_create(path: &Path) -> Result<(Self, bool), ConfigError> {
        let created = if path.exists() {
            false
        } else {
            let starter = serde_yaml::to_string(&Self::default()).map_err(|err| {
                ConfigError::LoadError(format!("Failed to serialize starter config: {}", err))
            })?;
            fs::write(path, starter).map_err(|err| {
                ConfigError::LoadError(format!(
                    "Failed to write starter config {}: {}",
                    path.display(),
                    err
                ))
            })?;
            true
        };

        let content = fs::read_to_string(path).map_err(|err| {
            ConfigError::LoadError(format!("Failed to read {}: {}", path.display(), err))
        })?;
        let config: Self = serde_yaml::from_str(&content).map_err(|err| {
            ConfigError::LoadError(format!("Failed to parse {}: {}", path.display(), err))
        })?;
        config.validate()?;
        Ok((config, created))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.app.name.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "app.name must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ConfigError::ValidationError(
                "server.port must be non-zero".to_string(),
            ));
        }
        if self.server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if self.server.bind.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "server.bind must not be empty".to_string(),
            ));
        }
        if self.listing.page_size == 0 {
            return Err(ConfigError::ValidationError(
                "listing.page_size must be at least 1".to_string(),
            ));
        }
        match self.logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "logging.level \"{}\" is not one of trace/debug/info/warn/error",
                other
            ))),
        }
    }
}
