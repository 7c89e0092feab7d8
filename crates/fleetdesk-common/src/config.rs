//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Shared primitives and utilities for the dashboard runtime."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DurationMilliSeconds};
use tracing::debug;

use crate::logging::LogFormat;

fn default_storage_path() -> PathBuf {
    PathBuf::from("target/fleetdesk/session.json")
}

fn default_storage_key() -> String {
    "user".to_owned()
}

fn default_auth_latency() -> Duration {
    Duration::from_millis(1000)
}

fn default_submit_latency() -> Duration {
    Duration::from_millis(1000)
}

fn default_logging_directory() -> PathBuf {
    PathBuf::from("target/logs")
}

fn default_log_format() -> LogFormat {
    LogFormat::StructuredJson
}

/// Primary configuration object for the dashboard runtime.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub forms: FormsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Metadata describing where an [`AppConfig`] was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedAppConfig {
    pub config: AppConfig,
    pub source: PathBuf,
}

impl AppConfig {
    pub const ENV_CONFIG_PATH: &str = "FLEETDESK_CONFIG";

    /// Path named by `FLEETDESK_CONFIG`, when set to something non-blank.
    pub fn env_override() -> Option<PathBuf> {
        std::env::var_os(Self::ENV_CONFIG_PATH)
            .filter(|value| !value.to_string_lossy().trim().is_empty())
            .map(PathBuf::from)
    }

    /// Load the first configuration that applies: the `FLEETDESK_CONFIG`
    /// override, otherwise the first existing entry of `candidates`.
    pub fn load<P: AsRef<Path>>(candidates: &[P]) -> Result<Self> {
        Ok(Self::load_with_source(candidates)?.config)
    }

    /// [`AppConfig::load`] that also reports which file was read.
    pub fn load_with_source<P: AsRef<Path>>(candidates: &[P]) -> Result<LoadedAppConfig> {
        let source = match Self::env_override() {
            Some(path) => path,
            None => candidates
                .iter()
                .map(|candidate| candidate.as_ref())
                .find(|candidate| candidate.exists())
                .map(Path::to_path_buf)
                .ok_or_else(|| {
                    let inspected: Vec<String> = candidates
                        .iter()
                        .map(|candidate| candidate.as_ref().display().to_string())
                        .collect();
                    anyhow!(
                        "no configuration files found. inspected: {}",
                        inspected.join(", ")
                    )
                })?,
        };
        let config = Self::from_file(&source)?;
        Ok(LoadedAppConfig { config, source })
    }

    /// Read, parse and validate one TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!(config_path = %path.display(), "loading configuration");
        let contents = fs::read_to_string(path)
            .with_context(|| format!("unable to read config file {}", path.display()))?;
        contents
            .parse()
            .with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.session.validate()?;
        if self.logging.directory.as_os_str().is_empty() {
            return Err(anyhow!("logging directory cannot be empty"));
        }
        Ok(())
    }
}

impl std::str::FromStr for AppConfig {
    type Err = anyhow::Error;

    fn from_str(content: &str) -> std::result::Result<Self, Self::Err> {
        let config: AppConfig = toml::from_str(content).context("failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }
}

/// Where the signed-in identity is cached and how slow the simulated
/// credential service is.
#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default = "default_storage_path")]
    pub storage_path: PathBuf,
    #[serde(default = "default_storage_key")]
    pub storage_key: String,
    #[serde(default = "default_auth_latency", rename = "latency_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub latency: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            storage_key: default_storage_key(),
            latency: default_auth_latency(),
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.storage_key.trim().is_empty() {
            return Err(anyhow!("session storage_key cannot be empty"));
        }
        Ok(())
    }
}

#[serde_as]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormsConfig {
    #[serde(default = "default_submit_latency", rename = "submit_latency_ms")]
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    pub submit_latency: Duration,
}

impl Default for FormsConfig {
    fn default() -> Self {
        Self {
            submit_latency: default_submit_latency(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_directory")]
    pub directory: PathBuf,
    #[serde(default = "default_log_format")]
    pub format: LogFormat,
    #[serde(default)]
    pub file_prefix: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: default_logging_directory(),
            format: default_log_format(),
            file_prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn empty_document_uses_defaults() {
        let config = AppConfig::from_str("").unwrap();
        assert_eq!(config.session.storage_key, "user");
        assert_eq!(config.session.latency, Duration::from_millis(1000));
        assert_eq!(config.forms.submit_latency, Duration::from_millis(1000));
        assert_eq!(config.logging.format, LogFormat::StructuredJson);
    }

    #[test]
    fn latency_is_read_in_milliseconds() {
        let config = AppConfig::from_str(
            r#"
            [session]
            storage_key = "desk-user"
            latency_ms = 25

            [forms]
            submit_latency_ms = 5

            [logging]
            format = "pretty"
            "#,
        )
        .unwrap();
        assert_eq!(config.session.storage_key, "desk-user");
        assert_eq!(config.session.latency, Duration::from_millis(25));
        assert_eq!(config.forms.submit_latency, Duration::from_millis(5));
        assert_eq!(config.logging.format, LogFormat::Pretty);
    }

    #[test]
    fn shipped_example_parses() {
        let config =
            AppConfig::from_str(include_str!("../../../configs/fleetdesk.example.toml")).unwrap();
        assert_eq!(
            config.session.storage_path,
            PathBuf::from("target/fleetdesk/session.json")
        );
        assert_eq!(config.logging.file_prefix, None);
    }

    #[test]
    fn blank_storage_key_is_rejected() {
        let err = AppConfig::from_str("[session]\nstorage_key = \"  \"\n").unwrap_err();
        assert!(err.to_string().contains("storage_key"));
    }

    #[test]
    fn load_picks_first_existing_candidate() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing.toml");
        let present = dir.path().join("desk.toml");
        fs::write(&present, "[session]\nlatency_ms = 10\n").unwrap();

        let loaded = AppConfig::load_with_source(&[missing, present.clone()]).unwrap();
        assert_eq!(loaded.source, present);
        assert_eq!(loaded.config.session.latency, Duration::from_millis(10));
    }

    #[test]
    fn load_without_candidates_reports_inspected_paths() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nowhere.toml");
        let err = AppConfig::load(&[missing]).unwrap_err();
        assert!(err.to_string().contains("nowhere.toml"));
    }
}
