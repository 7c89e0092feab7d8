//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Shared primitives and utilities for the dashboard runtime."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Shared primitives for the FleetDesk workspace: configuration loading,
//! tracing setup, and wall-clock helpers consumed across the crates.

pub mod config;
pub mod logging;
pub mod time;

pub use config::{AppConfig, FormsConfig, LoadedAppConfig, LoggingConfig, SessionConfig};
pub use logging::{init_tracing, LogFormat};
