//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use serde::Serialize;

use super::PageContext;
use crate::routes::HOME_PATH;

/// Static message page: access denied or not found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MessagePage {
    pub heading: &'static str,
    pub message: &'static str,
    pub signed_in_as: Option<String>,
    pub link_label: &'static str,
    pub link_path: &'static str,
}

pub fn unauthorized(ctx: &PageContext<'_>) -> MessagePage {
    MessagePage {
        heading: "Access Denied",
        message: "You don't have permission to access this page. Please contact your administrator if you believe this is a mistake.",
        signed_in_as: ctx
            .viewer()
            .map(|user| format!("{} ({})", user.name, user.email)),
        link_label: "Return to Dashboard",
        link_path: HOME_PATH,
    }
}

pub fn not_found() -> MessagePage {
    MessagePage {
        heading: "404",
        message: "Oops! Page not found",
        signed_in_as: None,
        link_label: "Return to Home",
        link_path: "/",
    }
}
