//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Page controllers. Each one reads the session and the record collections
//! through a [`PageContext`], asks the capability table what the viewer may
//! do, and reports outcomes as [`Notice`] values.

pub mod dashboard;
pub mod installation;
pub mod layout;
pub mod login;
pub mod machines;
pub mod tasks;
pub mod tickets;
pub mod unauthorized;

use std::sync::atomic::{AtomicBool, Ordering};

use fleetdesk_security::{Capabilities, Identity};
use fleetdesk_session::SessionStore;
use serde::Serialize;

use crate::data::DataSource;
use crate::error::DeskError;
use crate::guard::Navigator;

/// Collaborators shared by every page.
#[derive(Clone, Copy)]
pub struct PageContext<'a> {
    pub session: &'a SessionStore,
    pub data: &'a dyn DataSource,
    pub navigator: &'a dyn Navigator,
}

impl<'a> PageContext<'a> {
    pub fn new(
        session: &'a SessionStore,
        data: &'a dyn DataSource,
        navigator: &'a dyn Navigator,
    ) -> Self {
        Self {
            session,
            data,
            navigator,
        }
    }

    pub fn viewer(&self) -> Option<Identity> {
        self.session.current_user()
    }

    /// Capabilities of the signed-in identity; the empty record when signed out.
    pub fn capabilities(&self) -> &'static Capabilities {
        match self.session.current_user() {
            Some(identity) => Capabilities::of(identity.role),
            None => &Capabilities::NONE,
        }
    }
}

/// Raises a form's submitting flag until dropped.
pub(crate) struct SubmittingGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> SubmittingGuard<'a> {
    /// `Busy` when the flag is already raised.
    pub(crate) fn acquire(flag: &'a AtomicBool) -> Result<Self, DeskError> {
        flag.compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .map_err(|_| DeskError::Busy)?;
        Ok(Self { flag })
    }
}

impl Drop for SubmittingGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Destructive,
}

/// Transient user-facing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(description: impl Into<String>) -> Self {
        Self {
            title: "Success".to_owned(),
            description: description.into(),
            variant: NoticeVariant::Default,
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self::destructive("Error", description)
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

impl From<&DeskError> for Notice {
    fn from(err: &DeskError) -> Self {
        match err {
            DeskError::Authentication => {
                Notice::destructive("Login Failed", "Invalid email or password")
            }
            DeskError::Validation { .. } => Notice::error("Please fill in all required fields"),
            other => Notice::error(other.to_string()),
        }
    }
}
