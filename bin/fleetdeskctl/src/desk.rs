//! ---
//! fd_section: "05-external-interfaces"
//! fd_subsection: "binary"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Control CLI for driving a FleetDesk session from a terminal."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Wiring shared by every command: configuration, the persisted session,
//! demo data, a history stack, and the security counters.

use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use fleetdesk_common::config::AppConfig;
use fleetdesk_core::{
    HistoryNavigator, InMemoryDataSource, NavigationController, Navigator, PageContext,
};
use fleetdesk_persistence::JsonFileStore;
use fleetdesk_security::{DirectoryAuthenticator, SecurityMetrics, UserDirectory};
use fleetdesk_session::SessionStore;
use serde::Serialize;
use tokio::runtime::Runtime;

use crate::GlobalOptions;

pub struct Desk {
    pub config: AppConfig,
    pub session: Arc<SessionStore>,
    pub data: InMemoryDataSource,
    pub history: Arc<HistoryNavigator>,
    pub metrics: SecurityMetrics,
    json: bool,
    runtime: Runtime,
}

impl Desk {
    pub fn open(options: &GlobalOptions) -> Result<Self> {
        let config = load_config(options)?;
        let storage = JsonFileStore::open(&config.session.storage_path)?;
        let authenticator = DirectoryAuthenticator::new(UserDirectory::demo(), config.session.latency);
        let metrics = SecurityMetrics::new(Arc::new(prometheus::Registry::new()))?;
        let session = SessionStore::new(
            Arc::new(authenticator),
            Arc::new(storage),
            config.session.storage_key.clone(),
        )
        .with_metrics(metrics.clone());
        Ok(Self {
            config,
            session: Arc::new(session),
            data: InMemoryDataSource::demo(),
            history: Arc::new(HistoryNavigator::new()),
            metrics,
            json: options.json,
            runtime: Runtime::new()?,
        })
    }

    /// Pick up the identity persisted by an earlier invocation.
    pub fn restore(&self) {
        self.session.restore_from_persistence();
    }

    pub fn context(&self) -> PageContext<'_> {
        PageContext::new(&self.session, &self.data, self.history.as_ref())
    }

    /// Navigation controller over this desk's session and history.
    pub fn navigation(&self) -> NavigationController {
        let navigator: Arc<dyn Navigator> = self.history.clone();
        NavigationController::new(self.session.clone(), navigator)
            .with_metrics(self.metrics.clone())
    }

    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.runtime.block_on(future)
    }

    /// Print `value` as JSON when requested, otherwise run `text`.
    pub fn emit<T: Serialize>(&self, value: &T, text: impl FnOnce(&T)) -> Result<()> {
        if self.json {
            println!("{}", serde_json::to_string_pretty(value)?);
        } else {
            text(value);
        }
        Ok(())
    }
}

/// Explicit `--config`, then `FLEETDESK_CONFIG`, then the repository
/// defaults. Built-in defaults apply only when none of those exist.
fn load_config(options: &GlobalOptions) -> Result<AppConfig> {
    if let Some(path) = &options.config {
        return AppConfig::from_file(path);
    }
    let candidates = [
        PathBuf::from("configs/fleetdesk.toml"),
        PathBuf::from("configs/fleetdesk.example.toml"),
    ];
    if AppConfig::env_override().is_none() && !candidates.iter().any(|path| path.exists()) {
        return Ok(AppConfig::default());
    }
    AppConfig::load(&candidates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleetdesk_core::pages::login::LoginForm;
    use fleetdesk_security::{Role, SecurityEvent};
    use std::fs;

    fn options_for(dir: &tempfile::TempDir) -> GlobalOptions {
        let config = dir.path().join("fleetdesk.toml");
        let storage = dir.path().join("session.json");
        fs::write(
            &config,
            format!(
                "[session]\nstorage_path = {:?}\nlatency_ms = 0\n",
                storage.display().to_string()
            ),
        )
        .unwrap();
        GlobalOptions {
            config: Some(config),
            json: true,
            log_to_file: false,
            metrics: false,
        }
    }

    #[test]
    fn identity_survives_between_invocations() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_for(&dir);

        let first = Desk::open(&options).unwrap();
        first.restore();
        let form = LoginForm::prefilled(Role::CompanyEmployee);
        let notice = first.block_on(form.submit(&first.context()));
        assert!(!notice.is_error());
        drop(first);

        let second = Desk::open(&options).unwrap();
        assert!(second.session.is_loading());
        second.restore();
        let user = second.session.current_user().unwrap();
        assert_eq!(user.email, "employee@company.com");
        assert_eq!(second.session.role(), Some(Role::CompanyEmployee));
    }

    #[test]
    fn commands_feed_the_security_counters() {
        let dir = tempfile::tempdir().unwrap();
        let desk = Desk::open(&options_for(&dir)).unwrap();
        desk.restore();
        let navigation = desk.navigation();
        desk.block_on(navigation.navigate("/tasks"));
        let form = LoginForm::prefilled(Role::DealerAdmin);
        desk.block_on(form.submit(&desk.context()));
        desk.block_on(navigation.navigate("/machine-installation"));

        assert_eq!(desk.metrics.count(SecurityEvent::AuthAttempt), 1);
        assert_eq!(desk.metrics.count(SecurityEvent::UnauthenticatedRedirect), 1);
        assert_eq!(desk.metrics.count(SecurityEvent::RbacDenial), 1);
        assert!(desk.metrics.render().unwrap().contains("rbac_denials_total 1"));
    }

    #[test]
    fn explicit_config_is_honoured() {
        let dir = tempfile::tempdir().unwrap();
        let options = options_for(&dir);
        let desk = Desk::open(&options).unwrap();
        assert_eq!(desk.config.session.latency, std::time::Duration::ZERO);
        assert!(desk.config.session.storage_path.starts_with(dir.path()));
    }
}
