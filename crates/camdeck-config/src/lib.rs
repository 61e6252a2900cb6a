//! Configuration for camdeck front ends.
//!
//! A single TOML file at the XDG config path, with `CAMDECK_`-prefixed
//! environment variables layered on top. The registry itself is
//! unauthenticated on the admin surface, so there is no credential
//! handling here — the per-device upload token lives in the config form,
//! not in this file.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config struct ──────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Registry base URL (e.g., "http://192.168.1.10:8000").
    #[serde(default = "default_registry")]
    pub registry: String,

    /// Seconds between automatic device-list refreshes.
    #[serde(default = "default_refresh_interval")]
    pub refresh_interval_secs: u64,

    /// HTTP request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Log file path; defaults to `camdeck.log` next to the config file.
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            registry: default_registry(),
            refresh_interval_secs: default_refresh_interval(),
            timeout_secs: default_timeout(),
            log_file: None,
        }
    }
}

fn default_registry() -> String {
    "http://127.0.0.1:8000".into()
}
fn default_refresh_interval() -> u64 {
    5
}
fn default_timeout() -> u64 {
    10
}

impl Config {
    /// The registry base URL, parsed and validated.
    pub fn registry_url(&self) -> Result<url::Url, ConfigError> {
        self.registry.parse().map_err(|_| ConfigError::Validation {
            field: "registry".into(),
            reason: format!("invalid URL: {}", self.registry),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs)
    }

    /// Where the TUI writes its log file.
    pub fn log_path(&self) -> PathBuf {
        self.log_file.clone().unwrap_or_else(|| {
            let mut p = config_path();
            p.set_file_name("camdeck.log");
            p
        })
    }
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "camdeck", "camdeck").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("camdeck");
    p
}

// ── Loading / saving ────────────────────────────────────────────────

/// Load the config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(config_path()))
        .merge(Env::prefixed("CAMDECK_"));

    Ok(figment.extract()?)
}

/// Load config, falling back to defaults when the file is absent or
/// unreadable.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

/// Serialize config to TOML and write it to the canonical path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    let path = config_path();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&path, toml::to_string_pretty(cfg)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_sane() {
        let cfg = Config::default();
        assert_eq!(cfg.refresh_interval_secs, 5);
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert!(cfg.registry_url().is_ok());
    }

    #[test]
    fn bad_registry_url_is_a_validation_error() {
        let cfg = Config {
            registry: "not a url".into(),
            ..Config::default()
        };
        assert!(matches!(
            cfg.registry_url(),
            Err(ConfigError::Validation { .. })
        ));
    }

    #[test]
    fn toml_round_trip() {
        let cfg = Config {
            registry: "http://10.0.0.2:8000".into(),
            refresh_interval_secs: 30,
            ..Config::default()
        };
        let text = toml::to_string_pretty(&cfg).expect("serialize");
        let back: Config = toml::from_str(&text).expect("parse");
        assert_eq!(back.registry, cfg.registry);
        assert_eq!(back.refresh_interval_secs, 30);
    }

    #[test]
    fn log_path_defaults_beside_config() {
        let cfg = Config::default();
        assert_eq!(
            cfg.log_path().file_name().and_then(|n| n.to_str()),
            Some("camdeck.log")
        );
    }
}
