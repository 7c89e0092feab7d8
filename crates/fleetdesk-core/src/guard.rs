//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Route guard and the navigation controller that applies its decisions.
//!
//! The guard itself is a pure function of the session snapshot and the
//! route's required roles. [`NavigationController`] waits for the session to
//! stop loading, evaluates the guard, and applies the result only if no newer
//! navigation has started in the meantime.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fleetdesk_logging::{desk_debug, log_access_event, AccessOutcome, LogContext};
use fleetdesk_security::{Page, Role, SecurityEvent, SecurityMetrics};
use fleetdesk_session::{SessionSnapshot, SessionStore};
use parking_lot::Mutex;
use serde::Serialize;

use crate::error::DeskError;
use crate::routes::{PublicPage, Route, LOGIN_PATH, UNAUTHORIZED_PATH};

/// Guard decision for one navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum GuardState {
    /// The session is still loading; show a neutral indicator.
    Checking,
    /// Nobody is signed in; go to the login page.
    DeniedUnauthenticated,
    /// Signed in without a required role; go to the unauthorized page.
    DeniedUnauthorized,
    /// Render the requested page.
    Granted,
}

impl GuardState {
    /// Where a denial sends the user.
    pub fn redirect_target(&self) -> Option<&'static str> {
        match self {
            GuardState::DeniedUnauthenticated => Some(LOGIN_PATH),
            GuardState::DeniedUnauthorized => Some(UNAUTHORIZED_PATH),
            GuardState::Checking | GuardState::Granted => None,
        }
    }
}

/// Stateless route guard.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteGuard;

impl RouteGuard {
    /// Decide for a protected route. `required` empty means any signed-in
    /// identity with a recognised role. An identity without one has an empty
    /// page set and is refused every protected route.
    pub fn evaluate(session: &SessionSnapshot, required: &[Role]) -> GuardState {
        if session.loading {
            return GuardState::Checking;
        }
        let Some(identity) = &session.identity else {
            return GuardState::DeniedUnauthenticated;
        };
        match identity.role {
            Some(role) if required.is_empty() || required.contains(&role) => GuardState::Granted,
            _ => GuardState::DeniedUnauthorized,
        }
    }
}

/// Navigation collaborator.
pub trait Navigator: Send + Sync {
    /// User-initiated navigation; adds a history entry.
    fn push(&self, path: &str);
    /// Guard-driven redirect; replaces the current entry.
    fn replace(&self, path: &str);
    fn current(&self) -> Option<String>;
}

/// In-memory history stack.
#[derive(Debug, Default)]
pub struct HistoryNavigator {
    entries: Mutex<Vec<String>>,
}

impl HistoryNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(path: impl Into<String>) -> Self {
        Self {
            entries: Mutex::new(vec![path.into()]),
        }
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().clone()
    }
}

impl Navigator for HistoryNavigator {
    fn push(&self, path: &str) {
        self.entries.lock().push(path.to_owned());
    }

    fn replace(&self, path: &str) {
        let mut entries = self.entries.lock();
        match entries.last_mut() {
            Some(last) => *last = path.to_owned(),
            None => entries.push(path.to_owned()),
        }
    }

    fn current(&self) -> Option<String> {
        self.entries.lock().last().cloned()
    }
}

/// What ended up on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "kebab-case")]
pub enum View {
    Public(PublicPage),
    Page(Page),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationOutcome {
    Rendered(View),
    Redirected { to: &'static str, state: GuardState },
    /// A newer navigation started before this one's decision was ready.
    Superseded,
}

/// Runs the guard for each navigation; only the latest attempt applies.
pub struct NavigationController {
    session: Arc<SessionStore>,
    navigator: Arc<dyn Navigator>,
    generation: AtomicU64,
    metrics: Option<SecurityMetrics>,
}

impl NavigationController {
    pub fn new(session: Arc<SessionStore>, navigator: Arc<dyn Navigator>) -> Self {
        Self {
            session,
            navigator,
            generation: AtomicU64::new(0),
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: SecurityMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn session(&self) -> &Arc<SessionStore> {
        &self.session
    }

    pub fn navigator(&self) -> &Arc<dyn Navigator> {
        &self.navigator
    }

    /// Guard decision for `path` against the current snapshot, without
    /// waiting or navigating. Public and unknown paths are always granted.
    pub fn check(&self, path: &str) -> GuardState {
        match Route::resolve(path) {
            route @ Route::Protected(_) => {
                RouteGuard::evaluate(&self.session.snapshot(), &route.required_roles())
            }
            _ => GuardState::Granted,
        }
    }

    /// User-initiated navigation to `path`.
    pub async fn navigate(&self, path: &str) -> NavigationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.navigator.push(path);

        let mut route = Route::resolve(path);
        if let Route::Redirect(target) = route {
            self.navigator.replace(target);
            route = Route::resolve(target);
        }

        let page = match route {
            Route::Public(page) => return self.finish(generation, View::Public(page)),
            Route::NotFound => return self.finish(generation, View::NotFound),
            Route::Redirect(_) => return self.finish(generation, View::NotFound),
            Route::Protected(page) => page,
        };

        let snapshot = self.settled_snapshot().await;
        if !self.is_latest(generation) {
            desk_debug!("navigation to {} superseded", page.path());
            return NavigationOutcome::Superseded;
        }

        let state = RouteGuard::evaluate(&snapshot, &route.required_roles());
        let user = snapshot.identity.as_ref().map(|i| i.id.as_str()).unwrap_or("");
        let role = snapshot.role().map(|role| role.as_str()).unwrap_or("");
        let ctx = LogContext::new()
            .with_user(user)
            .with_role(role)
            .with_route(page.path())
            .with_action("navigate");

        match state.redirect_target() {
            None => {
                log_access_event(Some(&ctx), "guard.decision", "granted", AccessOutcome::Granted);
                NavigationOutcome::Rendered(View::Page(page))
            }
            Some(target) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record(match state {
                        GuardState::DeniedUnauthenticated => SecurityEvent::UnauthenticatedRedirect,
                        _ => SecurityEvent::RbacDenial,
                    });
                }
                let reason = match state {
                    GuardState::DeniedUnauthorized => DeskError::Authorization {
                        page,
                        role: snapshot.role(),
                    }
                    .to_string(),
                    _ => "nobody is signed in".to_owned(),
                };
                log_access_event(
                    Some(&ctx),
                    "guard.decision",
                    &format!("redirecting to {target}: {reason}"),
                    AccessOutcome::Denied,
                );
                self.navigator.replace(target);
                NavigationOutcome::Redirected { to: target, state }
            }
        }
    }

    async fn settled_snapshot(&self) -> SessionSnapshot {
        let mut updates = self.session.subscribe();
        let settled = match updates.wait_for(|snapshot| !snapshot.loading).await {
            Ok(snapshot) => Some(snapshot.clone()),
            Err(_) => None,
        };
        settled.unwrap_or_else(|| self.session.snapshot())
    }

    fn is_latest(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    fn finish(&self, generation: u64, view: View) -> NavigationOutcome {
        if self.is_latest(generation) {
            NavigationOutcome::Rendered(view)
        } else {
            NavigationOutcome::Superseded
        }
    }
}
