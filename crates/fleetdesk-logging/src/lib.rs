//! ---
//! fd_section: "03-persistence-logging"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Structured logging adapters and sinks."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
#![warn(missing_docs)]

use tracing::Level;
use tracing_subscriber::{fmt as subscriber_fmt, prelude::*, EnvFilter, Registry};

pub mod macros;

/// Initialize a baseline tracing subscriber suitable for development.
///
/// Events go to stderr so command output on stdout stays parseable.
pub fn init() {
    let _ = Registry::default()
        .with(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(subscriber_fmt::layer().with_writer(std::io::stderr))
        .try_init();
}

/// Structured logging context propagated by the convenience macros.
#[derive(Debug, Default, Clone)]
pub struct LogContext<'a> {
    /// Identifier of the signed-in user, if any.
    pub user: Option<&'a str>,
    /// Role of the signed-in user.
    pub role: Option<&'a str>,
    /// Route path being evaluated or rendered.
    pub route: Option<&'a str>,
    /// Action being attempted (`login`, `ticket.close`, ...).
    pub action: Option<&'a str>,
}

impl<'a> LogContext<'a> {
    /// Create an empty logging context.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a user identifier.
    pub fn with_user(mut self, user: &'a str) -> Self {
        self.user = Some(user);
        self
    }

    /// Attach a role name.
    pub fn with_role(mut self, role: &'a str) -> Self {
        self.role = Some(role);
        self
    }

    /// Attach a route path.
    pub fn with_route(mut self, route: &'a str) -> Self {
        self.route = Some(route);
        self
    }

    /// Attach an action name.
    pub fn with_action(mut self, action: &'a str) -> Self {
        self.action = Some(action);
        self
    }
}

/// Outcome of an access-control decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    /// The request was allowed.
    Granted,
    /// The request was refused (redirect, disabled action, failed login).
    Denied,
}

impl AccessOutcome {
    fn as_str(&self) -> &'static str {
        match self {
            AccessOutcome::Granted => "granted",
            AccessOutcome::Denied => "denied",
        }
    }
}

/// Emit a standardized access event. Grants log at INFO, denials at WARN.
pub fn log_access_event(
    context: Option<&LogContext>,
    event: &str,
    message: &str,
    outcome: AccessOutcome,
) {
    let ctx = context.cloned().unwrap_or_default();
    let user = ctx.user.unwrap_or("");
    let role = ctx.role.unwrap_or("");
    let route = ctx.route.unwrap_or("");
    let action = ctx.action.unwrap_or("");
    match outcome {
        AccessOutcome::Granted => tracing::info!(
            event,
            outcome = outcome.as_str(),
            user,
            role,
            route,
            action,
            message = %message
        ),
        AccessOutcome::Denied => tracing::warn!(
            event,
            outcome = outcome.as_str(),
            user,
            role,
            route,
            action,
            message = %message
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn macros_emit_without_panic() {
        init();
        let ctx = LogContext::new().with_user("3").with_role("COMPANY_EMPLOYEE");
        desk_info!(context = ctx.clone(), "session restored");
        desk_debug!("debug message");
        desk_warn!(context = ctx.clone().with_route("/machine-installation"), "redirecting");
        desk_error!(context = ctx, "simulated failure: {}", "timeout");
    }

    #[test]
    fn access_event_helper_emits() {
        init();
        let ctx = LogContext::new().with_route("/tasks").with_action("navigate");
        log_access_event(Some(&ctx), "guard.decision", "granted", AccessOutcome::Granted);
        log_access_event(None, "guard.decision", "no identity", AccessOutcome::Denied);
    }
}
