//! ---
//! fd_section: "06-security-access-control"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Role policy, identity, and credential collaborators."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Prometheus counters for sign-in and route-guard outcomes.

use std::fmt;
use std::sync::Arc;

use prometheus::{IntCounter, Registry, TextEncoder};
use strum::{EnumIter, IntoEnumIterator};

/// Security-relevant outcome worth counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter)]
pub enum SecurityEvent {
    AuthAttempt,
    AuthFailure,
    /// Guard sent a signed-in user to the unauthorized page.
    RbacDenial,
    /// Guard sent a signed-out visitor to the login page.
    UnauthenticatedRedirect,
}

impl SecurityEvent {
    pub fn metric_name(&self) -> &'static str {
        match self {
            SecurityEvent::AuthAttempt => "auth_attempts_total",
            SecurityEvent::AuthFailure => "auth_failures_total",
            SecurityEvent::RbacDenial => "rbac_denials_total",
            SecurityEvent::UnauthenticatedRedirect => "unauthenticated_redirects_total",
        }
    }

    fn help(&self) -> &'static str {
        match self {
            SecurityEvent::AuthAttempt => "Login attempts",
            SecurityEvent::AuthFailure => "Login attempts that did not sign anyone in",
            SecurityEvent::RbacDenial => "Navigations redirected to the unauthorized page",
            SecurityEvent::UnauthenticatedRedirect => "Navigations redirected to the login page",
        }
    }
}

/// One counter per [`SecurityEvent`], registered on a shared registry.
#[derive(Clone)]
pub struct SecurityMetrics {
    registry: Arc<Registry>,
    counters: Vec<(SecurityEvent, IntCounter)>,
}

impl fmt::Debug for SecurityMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (event, counter) in &self.counters {
            map.entry(&event.metric_name(), &counter.get());
        }
        map.finish()
    }
}

impl SecurityMetrics {
    pub fn new(registry: Arc<Registry>) -> anyhow::Result<Self> {
        let counters = SecurityEvent::iter()
            .map(|event| {
                let counter = IntCounter::new(event.metric_name(), event.help())?;
                registry.register(Box::new(counter.clone()))?;
                Ok((event, counter))
            })
            .collect::<anyhow::Result<Vec<_>>>()?;
        Ok(Self { registry, counters })
    }

    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    pub fn record(&self, event: SecurityEvent) {
        if let Some(counter) = self.counter(event) {
            counter.inc();
        }
    }

    pub fn count(&self, event: SecurityEvent) -> u64 {
        self.counter(event).map(IntCounter::get).unwrap_or(0)
    }

    /// Registry contents in the Prometheus text exposition format.
    pub fn render(&self) -> anyhow::Result<String> {
        Ok(TextEncoder::new().encode_to_string(&self.registry.gather())?)
    }

    fn counter(&self, event: SecurityEvent) -> Option<&IntCounter> {
        self.counters
            .iter()
            .find_map(|(candidate, counter)| (*candidate == event).then_some(counter))
    }
}
