// ABOUTME: Environment configuration management for deployment-specific settings
// ABOUTME: Merges the installer manifest, config file keys, and SRRD_* env overrides
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2026 SRRD Builder contributors

//! Environment-based configuration management
//!
//! Precedence, lowest to highest: built-in defaults, the optional
//! `installed_features` manifest written by the installer, then `SRRD_*`
//! environment variables. Capability predicates are read from the finished
//! [`ServerConfig`] exactly once, at tool-registration time.

use crate::constants::{defaults, env_config};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Strongly typed log level configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Suppress all output
    Off,
    /// Informational and above
    #[default]
    Info,
    /// Everything, including per-frame traces
    Debug,
}

impl LogLevel {
    /// Parse from string with fallback
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "off" | "none" => Self::Off,
            "debug" | "trace" => Self::Debug,
            _ => Self::Info,
        }
    }

    /// Directive string for `tracing_subscriber::EnvFilter`
    #[must_use]
    pub const fn as_filter(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Info => "info",
            Self::Debug => "debug",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_filter())
    }
}

/// Optional feature groups decided at install time.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    /// LaTeX toolchain installed; enables document compilation tools
    #[serde(default)]
    pub latex: bool,
    /// Vector database installed; enables knowledge-search tools
    #[serde(default)]
    pub vector_db: bool,
}

/// The recognized configuration mapping, with env overrides applied.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// WebSocket listen port
    pub mcp_port: u16,
    /// WebSocket bind address
    pub mcp_host: String,
    /// Logging verbosity
    pub log_level: LogLevel,
    /// Installed optional feature groups
    pub features: FeatureFlags,
    /// Identifier passed to vector collaborators
    pub embedding_model: String,
    /// Neutral project used when no context resolves
    pub global_home_project: PathBuf,
}

/// On-disk shape of the installer's `installed_features` manifest.
#[derive(Debug, Clone, Default, Deserialize)]
struct InstalledFeaturesManifest {
    #[serde(default)]
    mcp_port: Option<u16>,
    #[serde(default)]
    mcp_host: Option<String>,
    #[serde(default)]
    log_level: Option<String>,
    #[serde(default)]
    features: FeatureFlags,
    #[serde(default)]
    embedding_model: Option<String>,
    #[serde(default)]
    global_home_project: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            mcp_port: defaults::MCP_PORT,
            mcp_host: defaults::MCP_HOST.to_owned(),
            log_level: LogLevel::default(),
            features: FeatureFlags::default(),
            embedding_model: "all-MiniLM-L6-v2".to_owned(),
            global_home_project: default_home_project(),
        }
    }
}

fn default_home_project() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("srrd-projects")
        .join("home")
}

impl ServerConfig {
    /// Load configuration from defaults, an optional manifest file, and
    /// environment variables, in that precedence order.
    ///
    /// # Errors
    ///
    /// Returns an error when a manifest file exists but cannot be parsed, or
    /// when an environment override carries an unparseable value.
    pub fn load(manifest_path: Option<&Path>) -> AppResult<Self> {
        let mut config = Self::default();

        if let Some(path) = manifest_path {
            if path.exists() {
                let raw = std::fs::read_to_string(path).map_err(|e| {
                    AppError::internal(format!(
                        "failed to read installed_features manifest {}: {e}",
                        path.display()
                    ))
                })?;
                let manifest: InstalledFeaturesManifest =
                    serde_json::from_str(&raw).map_err(|e| {
                        AppError::internal(format!(
                            "installed_features manifest {} is not valid JSON: {e}",
                            path.display()
                        ))
                    })?;
                config.apply_manifest(manifest);
            } else {
                warn!(
                    path = %path.display(),
                    "installed_features manifest not found; using defaults"
                );
            }
        }

        config.apply_env()?;
        Ok(config)
    }

    fn apply_manifest(&mut self, manifest: InstalledFeaturesManifest) {
        if let Some(port) = manifest.mcp_port {
            self.mcp_port = port;
        }
        if let Some(host) = manifest.mcp_host {
            self.mcp_host = host;
        }
        if let Some(level) = manifest.log_level {
            self.log_level = LogLevel::from_str_or_default(&level);
        }
        self.features = manifest.features;
        if let Some(model) = manifest.embedding_model {
            self.embedding_model = model;
        }
        if let Some(home) = manifest.global_home_project {
            self.global_home_project = home;
        }
    }

    fn apply_env(&mut self) -> AppResult<()> {
        if let Ok(port) = env::var(env_config::MCP_PORT) {
            self.mcp_port = port.parse().map_err(|_| {
                AppError::internal(format!(
                    "{} must be a port number, got '{port}'",
                    env_config::MCP_PORT
                ))
            })?;
        }
        if let Ok(level) = env::var(env_config::LOG_LEVEL) {
            self.log_level = LogLevel::from_str_or_default(&level);
        }
        if let Some(latex) = env_bool(env_config::LATEX_INSTALLED) {
            self.features.latex = latex;
        }
        if let Some(vector) = env_bool(env_config::VECTOR_DB_INSTALLED) {
            self.features.vector_db = vector;
        }
        Ok(())
    }
}

fn env_bool(name: &str) -> Option<bool> {
    let raw = env::var(name).ok()?;
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        other => {
            warn!("ignoring unparseable boolean in {name}: '{other}'");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_bind_loopback_on_8765() {
        let config = ServerConfig::default();
        assert_eq!(config.mcp_port, 8765);
        assert_eq!(config.mcp_host, "127.0.0.1");
        assert!(!config.features.latex);
        assert!(!config.features.vector_db);
    }

    #[test]
    fn manifest_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installed_features.json");
        std::fs::write(
            &path,
            r#"{"mcp_port": 9100, "features": {"latex": true}, "log_level": "debug"}"#,
        )
        .unwrap();
        let config = ServerConfig::load(Some(&path)).unwrap();
        assert_eq!(config.mcp_port, 9100);
        assert!(config.features.latex);
        assert!(!config.features.vector_db);
        assert_eq!(config.log_level, LogLevel::Debug);
    }

    #[test]
    fn malformed_manifest_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("installed_features.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(ServerConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn log_level_parse_falls_back_to_info() {
        assert_eq!(LogLevel::from_str_or_default("warn"), LogLevel::Info);
        assert_eq!(LogLevel::from_str_or_default("OFF"), LogLevel::Off);
        assert_eq!(LogLevel::from_str_or_default("trace"), LogLevel::Debug);
    }
}
