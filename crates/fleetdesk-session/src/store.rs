//! ---
//! fd_section: "02-session-lifecycle"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Session store owning the signed-in identity and loading flag."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use fleetdesk_logging::{desk_error, desk_info, desk_warn, LogContext};
use fleetdesk_persistence::KeyValueStore;
use fleetdesk_security::{
    AuthError, Authenticator, Credentials, Identity, RegistrationRequest, Role, SecurityEvent,
    SecurityMetrics,
};
use tokio::sync::watch;

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Signed-in identity, if any.
    pub identity: Option<Identity>,
    /// True while a restore, login, or registration is outstanding.
    pub loading: bool,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }

    /// Role of the signed-in identity; `None` when signed out or unrecognised.
    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().and_then(|identity| identity.role)
    }
}

/// The single session of a running client.
///
/// Starts in the loading state and stays there until
/// [`SessionStore::restore_from_persistence`] has run. Login and register
/// raise the loading flag for as long as the credential service call is
/// outstanding.
pub struct SessionStore {
    authenticator: Arc<dyn Authenticator>,
    storage: Arc<dyn KeyValueStore>,
    storage_key: String,
    state: watch::Sender<SessionSnapshot>,
    restored: AtomicBool,
    pending: AtomicUsize,
    metrics: Option<SecurityMetrics>,
}

impl fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("storage_key", &self.storage_key)
            .field("snapshot", &*self.state.borrow())
            .finish()
    }
}

/// Holds the loading flag up until dropped.
struct LoadingGuard<'a> {
    store: &'a SessionStore,
}

impl<'a> LoadingGuard<'a> {
    fn enter(store: &'a SessionStore) -> Self {
        store.pending.fetch_add(1, Ordering::SeqCst);
        store.refresh_loading();
        Self { store }
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.store.pending.fetch_sub(1, Ordering::SeqCst);
        self.store.refresh_loading();
    }
}

impl SessionStore {
    pub fn new(
        authenticator: Arc<dyn Authenticator>,
        storage: Arc<dyn KeyValueStore>,
        storage_key: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(SessionSnapshot {
            identity: None,
            loading: true,
        });
        Self {
            authenticator,
            storage,
            storage_key: storage_key.into(),
            state,
            restored: AtomicBool::new(false),
            pending: AtomicUsize::new(0),
            metrics: None,
        }
    }

    /// Attach security counters.
    pub fn with_metrics(mut self, metrics: SecurityMetrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Populate the session from the persisted identity, if one is stored.
    ///
    /// Unreadable or invalid records are removed. The loading flag raised at
    /// construction is cleared on every path.
    pub fn restore_from_persistence(&self) {
        let ctx = LogContext::new().with_action("session.restore");
        let restored = match self.storage.get(&self.storage_key) {
            Ok(Some(raw)) => match serde_json::from_str::<Identity>(&raw) {
                Ok(identity) => match identity.validate() {
                    Ok(()) => Some(identity),
                    Err(err) => {
                        desk_warn!(context = ctx, "discarding persisted identity: {err}");
                        self.discard_persisted();
                        None
                    }
                },
                Err(err) => {
                    desk_warn!(context = ctx, "discarding unreadable persisted identity: {err}");
                    self.discard_persisted();
                    None
                }
            },
            Ok(None) => None,
            Err(err) => {
                desk_error!(context = ctx, "session storage unreadable: {err}");
                self.discard_persisted();
                None
            }
        };

        if let Some(identity) = &restored {
            let ctx = ctx
                .clone()
                .with_user(&identity.id)
                .with_role(identity.role.map(|role| role.as_str()).unwrap_or(""));
            desk_info!(context = ctx, "session restored for {}", identity.email);
        }
        self.state.send_modify(|snapshot| snapshot.identity = restored);
        self.restored.store(true, Ordering::SeqCst);
        self.refresh_loading();
    }

    /// Sign in by email. The password is passed through to the credential
    /// service, which does not verify it.
    ///
    /// Returns `false` and leaves the session untouched when no account
    /// matches or the service call fails.
    pub async fn login(&self, email: &str, password: &str) -> bool {
        self.try_login(email, password).await.is_ok()
    }

    /// [`SessionStore::login`] keeping the failure kind, for callers that
    /// report unknown accounts and service errors differently.
    pub async fn try_login(&self, email: &str, password: &str) -> Result<Identity, AuthError> {
        let _loading = LoadingGuard::enter(self);
        if let Some(metrics) = &self.metrics {
            metrics.record(SecurityEvent::AuthAttempt);
        }
        let ctx = LogContext::new().with_action("login");

        let credentials = Credentials::new(email, password);
        match self.authenticator.authenticate(&credentials).await {
            Ok(identity) => {
                self.persist(&identity);
                let signed_in = ctx
                    .clone()
                    .with_user(&identity.id)
                    .with_role(identity.role.map(|role| role.as_str()).unwrap_or(""));
                desk_info!(context = signed_in, "signed in as {}", identity.email);
                let issued = identity.clone();
                self.state
                    .send_modify(|snapshot| snapshot.identity = Some(issued));
                Ok(identity)
            }
            Err(err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record(SecurityEvent::AuthFailure);
                }
                match err {
                    AuthError::UnknownEmail { .. } => {
                        desk_warn!(context = ctx, "login rejected: {err}");
                    }
                    AuthError::Transient(_) => {
                        desk_error!(context = ctx, "login failed: {err}");
                    }
                }
                Err(err)
            }
        }
    }

    /// Clear the identity and its persisted copy.
    pub fn logout(&self) {
        let previous = self.state.borrow().identity.as_ref().map(|i| i.id.clone());
        self.discard_persisted();
        self.state.send_modify(|snapshot| snapshot.identity = None);
        let ctx = LogContext::new().with_action("logout");
        match previous {
            Some(id) => desk_info!(context = ctx.with_user(&id), "signed out"),
            None => desk_info!(context = ctx, "logout without an active session"),
        }
    }

    /// Submit a registration. Never changes the session.
    pub async fn register(&self, request: &RegistrationRequest) -> bool {
        let _loading = LoadingGuard::enter(self);
        let ctx = LogContext::new().with_action("register");
        match self.authenticator.register(request).await {
            Ok(()) => {
                desk_info!(
                    context = ctx,
                    "registration accepted for {}",
                    request.email.as_deref().unwrap_or("<no email>")
                );
                true
            }
            Err(err) => {
                desk_error!(context = ctx, "registration failed: {err}");
                false
            }
        }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Receiver that observes every identity and loading change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.subscribe()
    }

    pub fn current_user(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.borrow().identity.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    pub fn role(&self) -> Option<Role> {
        self.state.borrow().role()
    }

    fn refresh_loading(&self) {
        let loading =
            !self.restored.load(Ordering::SeqCst) || self.pending.load(Ordering::SeqCst) > 0;
        self.state.send_if_modified(|snapshot| {
            if snapshot.loading == loading {
                return false;
            }
            snapshot.loading = loading;
            true
        });
    }

    fn persist(&self, identity: &Identity) {
        let encoded = match serde_json::to_string(identity) {
            Ok(encoded) => encoded,
            Err(err) => {
                desk_error!("unable to encode identity {}: {err}", identity.id);
                return;
            }
        };
        if let Err(err) = self.storage.set(&self.storage_key, &encoded) {
            desk_error!("unable to persist identity {}: {err}", identity.id);
        }
    }

    fn discard_persisted(&self) {
        if let Err(err) = self.storage.remove(&self.storage_key) {
            desk_error!("unable to clear persisted identity: {err}");
        }
    }
}
