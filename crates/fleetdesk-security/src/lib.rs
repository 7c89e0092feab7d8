//! ---
//! fd_section: "06-security-access-control"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Role policy, identity, and credential collaborators."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---

pub mod identity;
pub mod metrics;
pub mod rbac;

pub use identity::{
    demo_credentials, AuthError, Authenticator, Credentials, DirectoryAuthenticator, Identity,
    IdentityError, RegistrationRequest, UserDirectory, UserId,
};
pub use metrics::{SecurityEvent, SecurityMetrics};
pub use rbac::{
    is_allowed, roles_with_access, Action, Capabilities, MachineScope, NavItem, Page, Role,
    RoleTier, TaskScope, TicketScope,
};
