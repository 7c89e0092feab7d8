//! ---
//! fd_section: "02-session-lifecycle"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Session store owning the signed-in identity and loading flag."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Exactly one [`SessionStore`] exists per running client. It is created
//! explicitly, restored once at startup, and passed to whatever needs it.

pub mod store;

pub use store::{SessionSnapshot, SessionStore};
