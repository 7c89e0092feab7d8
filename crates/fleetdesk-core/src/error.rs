//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use fleetdesk_security::{Action, AuthError, Page, Role};
use thiserror::Error;

use crate::model::{TicketAction, TicketStatus};

/// Result alias used by the page controllers.
pub type DeskResult<T> = std::result::Result<T, DeskError>;

/// Failures surfaced by dashboard operations. None of them escape to the
/// rendering layer; controllers turn them into notices or redirects.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DeskError {
    /// Login found no matching identity.
    #[error("invalid email or password")]
    Authentication,
    /// A signed-in identity lacks the role a page requires.
    #[error("{} may not open {}", Role::display_name_of(*.role), .page.path())]
    Authorization { page: Page, role: Option<Role> },
    /// A signed-in identity lacks the capability for an action.
    #[error("{} may not perform {action:?}", Role::display_name_of(*.role))]
    ActionDenied { action: Action, role: Option<Role> },
    /// Required form fields were empty; nothing was submitted.
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation { missing: Vec<&'static str> },
    /// A submission from the same form is still outstanding.
    #[error("a submission is already in progress")]
    Busy,
    /// The simulated backend call failed.
    #[error("simulated request failed: {0}")]
    TransientSimulation(String),
    /// Ticket status may only move forward.
    #[error("cannot {action} a ticket that is {from}")]
    InvalidTransition {
        from: TicketStatus,
        action: TicketAction,
    },
}

impl DeskError {
    /// Collect the names of empty required fields; `Ok` when none are empty.
    pub fn require(fields: &[(&'static str, bool)]) -> DeskResult<()> {
        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, present)| !present)
            .map(|(name, _)| *name)
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(DeskError::Validation { missing })
        }
    }
}

impl From<AuthError> for DeskError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownEmail { .. } => DeskError::Authentication,
            AuthError::Transient(reason) => DeskError::TransientSimulation(reason),
        }
    }
}
