//! Application configuration.
//!
//! Read from `config.json` in the platform config directory, then
//! overridden by `PARCEL_DESK_*` environment variables.

use std::{fs, io, path::PathBuf, sync::Arc, time::Duration};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Role;
use crate::infra::{api::DashboardApi, cache::SnapshotStore, http::HttpApi, memory::InMemoryApi};

use super::persistence::{APP_NAME, APP_ORG, APP_QUALIFIER};

pub const ENV_API_URL: &str = "PARCEL_DESK_API_URL";
pub const ENV_EXPORT_DIR: &str = "PARCEL_DESK_EXPORT_DIR";
pub const ENV_DEMO: &str = "PARCEL_DESK_DEMO";

const CONFIG_FILENAME: &str = "config.json";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub api_base_url: String,
    pub default_role: Role,
    pub seller_id: String,
    /// Where exports are saved; the Downloads folder when unset.
    pub export_dir: Option<PathBuf>,
    /// Serve seeded data instead of calling the backend.
    pub demo_mode: bool,
    pub cache_ttl_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:8080/".to_string(),
            default_role: Role::Seller,
            seller_id: "SLR-1001".to_string(),
            export_dir: None,
            demo_mode: true,
            cache_ttl_secs: 5 * 60,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] io::Error),
    #[error("invalid config file: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{name} must be true/false, got '{value}'")]
    InvalidFlag { name: &'static str, value: String },
}

fn config_file() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

impl AppConfig {
    /// Config file plus process environment. A missing file means defaults.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match config_file() {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };
        Ok(base.with_env(|name| std::env::var(name).ok()))
    }

    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err.into()),
        }
    }

    /// Applies overrides from `lookup`, usually `std::env::var`.
    ///
    /// An unreadable override is skipped with a warning; it never costs the
    /// rest of the configuration.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            self.api_base_url = url.trim().to_string();
            // An explicit backend means live data unless demo is also requested.
            self.demo_mode = false;
        }
        if let Some(dir) = lookup(ENV_EXPORT_DIR).filter(|v| !v.trim().is_empty()) {
            self.export_dir = Some(PathBuf::from(dir.trim()));
        }
        if let Some(flag) = lookup(ENV_DEMO) {
            match parse_flag(ENV_DEMO, &flag) {
                Ok(demo) => self.demo_mode = demo,
                Err(err) => tracing::warn!(error = %err, "ignoring environment override"),
            }
        }
        self
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// The backend the UI talks to.
    pub fn build_api(&self) -> Arc<dyn DashboardApi> {
        if self.demo_mode {
            tracing::info!("demo mode; serving seeded data");
            return Arc::new(InMemoryApi::demo());
        }
        match HttpApi::new(&self.api_base_url) {
            Ok(client) => {
                let client = client.with_ttl(self.cache_ttl());
                let client = match SnapshotStore::default_location() {
                    Some(store) => client.with_snapshots(store),
                    None => client,
                };
                Arc::new(client)
            }
            Err(err) => {
                tracing::error!(url = %self.api_base_url, error = %err, "invalid API URL; falling back to demo data");
                Arc::new(InMemoryApi::demo())
            }
        }
    }
}

fn parse_flag(name: &'static str, raw: &str) -> Result<bool, ConfigError> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: raw.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn api_url_override_switches_to_live_data() {
        let config = AppConfig::default()
            .with_env(env(&[(ENV_API_URL, "https://api.example.test/")]));

        assert_eq!(config.api_base_url, "https://api.example.test/");
        assert!(!config.demo_mode);
    }

    #[test]
    fn demo_flag_wins_over_api_url() {
        let config = AppConfig::default()
            .with_env(env(&[
                (ENV_API_URL, "https://api.example.test/"),
                (ENV_DEMO, "yes"),
                (ENV_EXPORT_DIR, "/tmp/exports"),
            ]));

        assert!(config.demo_mode);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
    }

    #[test]
    fn invalid_flags_are_reported() {
        let err = parse_flag(ENV_DEMO, "maybe").expect_err("invalid flag");
        assert!(matches!(err, ConfigError::InvalidFlag { name: ENV_DEMO, .. }));
    }

    #[test]
    fn a_bad_flag_keeps_the_file_settings() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"{"seller_id":"SLR-1002","demo_mode":false}"#).expect("write");

        let config = AppConfig::from_file(&path)
            .expect("config")
            .with_env(env(&[(ENV_DEMO, "maybe"), (ENV_EXPORT_DIR, "/tmp/exports")]));

        assert_eq!(config.seller_id, "SLR-1002");
        assert!(!config.demo_mode);
        assert_eq!(config.export_dir, Some(PathBuf::from("/tmp/exports")));
    }

    #[test]
    fn partial_config_files_fill_in_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CONFIG_FILENAME);
        fs::write(&path, r#"{"seller_id":"SLR-1002","default_role":"Admin"}"#).expect("write");

        let config = AppConfig::from_file(&path).expect("config");
        assert_eq!(config.seller_id, "SLR-1002");
        assert_eq!(config.default_role, Role::Admin);
        assert_eq!(config.cache_ttl(), Duration::from_secs(300));

        let missing = AppConfig::from_file(&dir.path().join("absent.json")).expect("defaults");
        assert_eq!(missing, AppConfig::default());
    }
}
