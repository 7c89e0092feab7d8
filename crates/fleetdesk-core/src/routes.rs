//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use fleetdesk_security::{roles_with_access, Page, Role};
use serde::Serialize;

pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const UNAUTHORIZED_PATH: &str = "/unauthorized";
pub const HOME_PATH: &str = "/dashboard";

/// Pages anyone may open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum PublicPage {
    Login,
    Register,
    Unauthorized,
}

impl PublicPage {
    pub fn path(&self) -> &'static str {
        match self {
            PublicPage::Login => LOGIN_PATH,
            PublicPage::Register => REGISTER_PATH,
            PublicPage::Unauthorized => UNAUTHORIZED_PATH,
        }
    }
}

/// Result of matching a path against the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "target", rename_all = "kebab-case")]
pub enum Route {
    Public(PublicPage),
    Protected(Page),
    Redirect(&'static str),
    NotFound,
}

const PROTECTED: [Page; 5] = [
    Page::Dashboard,
    Page::Machines,
    Page::Tasks,
    Page::Tickets,
    Page::MachineInstallation,
];

impl Route {
    /// Match `path`. A single trailing slash is ignored.
    pub fn resolve(path: &str) -> Route {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };
        match path {
            "" | "/" => Route::Redirect(HOME_PATH),
            LOGIN_PATH => Route::Public(PublicPage::Login),
            REGISTER_PATH => Route::Public(PublicPage::Register),
            UNAUTHORIZED_PATH => Route::Public(PublicPage::Unauthorized),
            other => match Page::from_path(other) {
                Some(page) if PROTECTED.contains(&page) => Route::Protected(page),
                _ => Route::NotFound,
            },
        }
    }

    /// Roles allowed through the guard. Empty means any signed-in identity.
    pub fn required_roles(&self) -> Vec<Role> {
        match self {
            Route::Protected(page) => required_roles(*page),
            _ => Vec::new(),
        }
    }
}

/// Roles required for a protected page, read from the capability table.
/// Pages every role may open need no particular role.
pub fn required_roles(page: Page) -> Vec<Role> {
    let roles = roles_with_access(page);
    if roles.len() == Role::ALL.len() {
        Vec::new()
    } else {
        roles
    }
}
