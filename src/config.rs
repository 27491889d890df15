//! User configuration: which backend to talk to, where to put exports and logs.
//!
//! Stored as JSON under the platform config directory. Environment variables
//! override the file, command-line flags override both.

use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";
const APP_DIR: &str = "spendr";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

pub const ENV_SERVER_URL: &str = "SPENDR_SERVER_URL";
pub const ENV_TOKEN: &str = "SPENDR_TOKEN";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Remote,
    Local,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "Config::default_server_url")]
    pub server_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_dir: Option<PathBuf>,
    #[serde(default = "Config::default_export_scale")]
    pub export_scale: u32,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_filter: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            server_url: Self::default_server_url(),
            token: None,
            database_path: None,
            export_dir: None,
            export_scale: Self::default_export_scale(),
            currency_symbol: Self::default_currency_symbol(),
            log_filter: None,
        }
    }
}

impl Config {
    fn default_server_url() -> String {
        DEFAULT_SERVER_URL.to_string()
    }

    fn default_export_scale() -> u32 {
        crate::export::DEFAULT_SCALE
    }

    fn default_currency_symbol() -> String {
        "₹".to_string()
    }

    /// Applies `SPENDR_SERVER_URL` / `SPENDR_TOKEN` when set and non-empty.
    pub fn apply_env(&mut self) {
        self.apply_overrides(
            std::env::var(ENV_SERVER_URL).ok(),
            std::env::var(ENV_TOKEN).ok(),
        );
    }

    fn apply_overrides(&mut self, server_url: Option<String>, token: Option<String>) {
        if let Some(url) = server_url.filter(|value| !value.trim().is_empty()) {
            self.server_url = url.trim().to_string();
        }
        if let Some(token) = token.filter(|value| !value.trim().is_empty()) {
            self.token = Some(token.trim().to_string());
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| data_dir().join("spendr.db"))
    }

    /// Where chart exports land; the download directory when known.
    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn log_path(&self) -> PathBuf {
        data_dir().join("spendr.log")
    }
}

/// Per-user data directory, falling back to the working directory.
pub fn data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Loads and saves [`Config`] at a fixed path.
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf) -> Self {
        Self { config_path }
    }

    pub fn with_default_path() -> Self {
        let base = dirs::config_dir()
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("."));
        Self::new(base.join(CONFIG_FILE))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn load(&self) -> Result<Config, ConfigError> {
        if self.config_path.exists() {
            let data = fs::read_to_string(&self.config_path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), ConfigError> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.config_path);
        write_file(&tmp, &json)?;
        fs::rename(&tmp, &self.config_path)?;
        Ok(())
    }

    /// Drops the stored session token, leaving the rest untouched.
    pub fn clear_token(&self) -> Result<(), ConfigError> {
        let mut config = self.load()?;
        if config.token.take().is_some() {
            self.save(&config)?;
        }
        Ok(())
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &str) -> Result<(), ConfigError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        let config = manager.load().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.export_scale, 2);
        assert_eq!(config.backend, Backend::Remote);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("nested").join("config.json"));
        let config = Config {
            backend: Backend::Local,
            token: Some("abc".to_string()),
            export_dir: Some(dir.path().to_path_buf()),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        assert_eq!(manager.load().unwrap(), config);
        assert!(!manager.config_path().with_extension("json.tmp").exists());
    }

    #[test]
    fn partial_files_fill_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "backend": "local" }"#).unwrap();
        let config = ConfigManager::new(path).load().unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.currency_symbol, "₹");
    }

    #[test]
    fn clear_token_keeps_other_settings() {
        let dir = tempfile::tempdir().unwrap();
        let manager = ConfigManager::new(dir.path().join("config.json"));
        let config = Config {
            token: Some("secret".to_string()),
            server_url: "https://example.test".to_string(),
            ..Config::default()
        };
        manager.save(&config).unwrap();
        manager.clear_token().unwrap();
        let loaded = manager.load().unwrap();
        assert_eq!(loaded.token, None);
        assert_eq!(loaded.server_url, "https://example.test");
    }

    #[test]
    fn blank_overrides_are_ignored() {
        let mut config = Config::default();
        config.apply_overrides(Some("  ".to_string()), Some("tok ".to_string()));
        assert_eq!(config.server_url, DEFAULT_SERVER_URL);
        assert_eq!(config.token.as_deref(), Some("tok"));
    }
}
