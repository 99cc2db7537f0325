//! # Configuration
//!
//! `AppConfig` is read from a YAML file (path from `BEAUTY_PALACE_CONFIG`,
//! default `beauty_palace.yaml`; a missing file means defaults) and then
//! overridden from the environment:
//!
//! | variable                       | setting                                  |
//! |--------------------------------|------------------------------------------|
//! | `BEAUTY_PALACE_BIND`           | `server.bind`                            |
//! | `BEAUTY_PALACE_DATA_DIR`       | `storage.data_directory`                 |
//! | `BEAUTY_PALACE_STORAGE`        | `storage.backend` (`memory` or `csv`)    |
//! | `BEAUTY_PALACE_JWT_SECRET`     | `auth.jwt_secret`                        |
//! | `BEAUTY_PALACE_ADMIN_USER`     | `auth.admin_username`                    |
//! | `BEAUTY_PALACE_ADMIN_PASSWORD` | `auth.admin_password_hash` (hashed here) |
//! | `BEAUTY_PALACE_OWNER_PHONE`    | `notifications.owner_phone`              |

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::auth::{self, DEFAULT_TOKEN_HOURS};
use crate::domain::models::TransitionPolicy;

pub const CONFIG_PATH_VAR: &str = "BEAUTY_PALACE_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "beauty_palace.yaml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },

    #[error("Could not hash admin password: {0}")]
    PasswordHash(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Csv,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind: String,
    /// Origin allowed by CORS; any origin when unset
    pub allowed_origin: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:3000".to_string(),
            allowed_origin: Some("http://localhost:8080".to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    pub data_directory: PathBuf,
    /// Seed empty collections with the sample salon data
    pub seed_fixtures: bool,
    /// Artificial delay applied to every collection mutation
    pub simulated_latency_ms: Option<u64>,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_directory: PathBuf::from("data"),
            seed_fixtures: true,
            simulated_latency_ms: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    pub admin_username: String,
    /// Argon2 PHC string; login is disabled without one
    pub admin_password_hash: Option<String>,
    /// Random per process when unset
    pub jwt_secret: Option<String>,
    pub token_lifetime_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            admin_username: "admin".to_string(),
            admin_password_hash: None,
            jwt_secret: None,
            token_lifetime_hours: DEFAULT_TOKEN_HOURS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Host of the messaging deep links
    pub domain: String,
    /// Receives booking and review alerts
    pub owner_phone: Option<String>,
    pub outbox_capacity: usize,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            domain: "wa.me".to_string(),
            owner_phone: None,
            outbox_capacity: 100,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub status_transitions: TransitionPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub notifications: NotificationConfig,
    pub policy: PolicyConfig,
}

impl AppConfig {
    /// Config file named by `BEAUTY_PALACE_CONFIG` plus environment overrides
    pub fn load() -> Result<Self, ConfigError> {
        let path = std::env::var(CONFIG_PATH_VAR).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::from_file(Path::new(&path))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Parse a YAML file; a missing file yields the defaults
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            info!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = serde_yaml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply overrides read through `lookup` (the process environment in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(bind) = value("BEAUTY_PALACE_BIND") {
            self.server.bind = bind;
        }
        if let Some(dir) = value("BEAUTY_PALACE_DATA_DIR") {
            self.storage.data_directory = PathBuf::from(dir);
        }
        if let Some(backend) = value("BEAUTY_PALACE_STORAGE") {
            self.storage.backend = match backend.to_lowercase().as_str() {
                "memory" => StorageBackend::Memory,
                "csv" => StorageBackend::Csv,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: "BEAUTY_PALACE_STORAGE",
                        value: backend,
                    })
                }
            };
        }
        if let Some(secret) = value("BEAUTY_PALACE_JWT_SECRET") {
            self.auth.jwt_secret = Some(secret);
        }
        if let Some(user) = value("BEAUTY_PALACE_ADMIN_USER") {
            self.auth.admin_username = user;
        }
        if let Some(password) = value("BEAUTY_PALACE_ADMIN_PASSWORD") {
            let hash = auth::hash_password(&password).map_err(|e| ConfigError::PasswordHash(e.to_string()))?;
            self.auth.admin_password_hash = Some(hash);
        }
        if let Some(phone) = value("BEAUTY_PALACE_OWNER_PHONE") {
            self.notifications.owner_phone = Some(phone);
        }
        Ok(())
    }
}
