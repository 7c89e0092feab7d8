//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use fleetdesk_security::{Capabilities, Role, RoleTier};
use serde::Serialize;

use super::PageContext;
use crate::routes::LOGIN_PATH;

pub const APP_TITLE: &str = "RBAC System";
pub const APP_SUBTITLE: &str = "Machine Management";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavLink {
    pub label: &'static str,
    pub path: &'static str,
    pub active: bool,
}

/// Sidebar shown around every protected page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    pub title: &'static str,
    pub subtitle: &'static str,
    pub user_name: String,
    pub avatar: char,
    pub role_label: &'static str,
    /// `None` for an unrecognised role, which gets the neutral theme.
    pub tier: Option<RoleTier>,
    pub links: Vec<NavLink>,
}

/// Build the sidebar for the signed-in identity; `None` when signed out.
pub fn sidebar(ctx: &PageContext<'_>, current_path: &str) -> Option<Sidebar> {
    let identity = ctx.viewer()?;
    let links = Capabilities::of(identity.role)
        .navigation
        .iter()
        .map(|item| NavLink {
            label: item.label,
            path: item.page.path(),
            active: item.page.path() == current_path,
        })
        .collect();
    Some(Sidebar {
        title: APP_TITLE,
        subtitle: APP_SUBTITLE,
        user_name: identity.name.clone(),
        avatar: identity.initial(),
        role_label: Role::display_name_of(identity.role),
        tier: identity.role.map(|role| role.tier()),
        links,
    })
}

/// Sign out and go to the login page.
pub fn logout(ctx: &PageContext<'_>) {
    ctx.session.logout();
    ctx.navigator.push(LOGIN_PATH);
}
