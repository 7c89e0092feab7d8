//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Shared primitives and utilities for the dashboard runtime."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::path::Path;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::layer::{Layer, SubscriberExt};
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::Registry;

use crate::config::LoggingConfig;

const LOG_ENV: &str = "FLEETDESK_LOG";
const DEFAULT_DIRECTIVE: &str = "info";

/// Flush guards for the non-blocking writers; live for the whole process.
static GUARDS: OnceCell<(WorkerGuard, WorkerGuard)> = OnceCell::new();

/// Console rendering of log events.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum LogFormat {
    /// One JSON object per event.
    #[default]
    StructuredJson,
    /// Multi-line human-readable output.
    Pretty,
    /// Single-line human-readable output.
    Compact,
}

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber: console events on stderr in the
/// configured format plus a daily-rolling JSON file under
/// `config.directory` named after `file_prefix` (or `service_name`).
///
/// The filter comes from `FLEETDESK_LOG`, then `RUST_LOG`, then `info`.
/// Calling this again after a subscriber is installed is a no-op.
pub fn init_tracing(service_name: &str, config: &LoggingConfig) -> Result<()> {
    std::fs::create_dir_all(&config.directory).with_context(|| {
        format!("unable to create log directory {}", config.directory.display())
    })?;
    let prefix = config.file_prefix.as_deref().unwrap_or(service_name);

    let (file_writer, file_guard) = tracing_appender::non_blocking(rolling::daily(
        &config.directory,
        format!("{prefix}.log"),
    ));
    let (console_writer, console_guard) = tracing_appender::non_blocking(std::io::stderr());
    let _ = GUARDS.set((file_guard, console_guard));

    let console: BoxedLayer = match config.format {
        LogFormat::StructuredJson => fmt::layer()
            .json()
            .with_target(false)
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(console_writer)
            .boxed(),
        LogFormat::Pretty => fmt::layer()
            .pretty()
            .with_timer(fmt::time::UtcTime::rfc_3339())
            .with_writer(console_writer)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .without_time()
            .with_writer(console_writer)
            .boxed(),
    };
    let file: BoxedLayer = fmt::layer()
        .json()
        .with_timer(fmt::time::UtcTime::rfc_3339())
        .with_writer(file_writer)
        .boxed();

    let installed = tracing_subscriber::registry()
        .with(vec![console, file])
        .with(env_filter())
        .try_init()
        .is_ok();
    if installed {
        info!(
            service = service_name,
            log_file = %log_file_hint(&config.directory, prefix),
            format = ?config.format,
            "tracing initialised"
        );
    }
    Ok(())
}

fn env_filter() -> EnvFilter {
    if let Ok(directive) = std::env::var(LOG_ENV) {
        match EnvFilter::try_new(&directive) {
            Ok(filter) => return filter,
            Err(err) => eprintln!("ignoring invalid {LOG_ENV} directive {directive:?}: {err}"),
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE))
}

/// Path pattern of the rolling log file, for the startup event.
fn log_file_hint(directory: &Path, prefix: &str) -> String {
    directory
        .join(format!("{prefix}.log.YYYY-MM-DD"))
        .display()
        .to_string()
}
