//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Login and registration forms.

use fleetdesk_security::{demo_credentials, Credentials, RegistrationRequest, Role};

use super::{Notice, PageContext};
use crate::error::DeskError;
use crate::routes::{HOME_PATH, LOGIN_PATH};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl LoginForm {
    /// Form prefilled with the demo account for `role`.
    pub fn prefilled(role: Role) -> Self {
        let Credentials { email, password } = demo_credentials(role);
        Self { email, password }
    }

    /// Submit the form. On success the session holds the identity and the
    /// navigator is on the dashboard.
    pub async fn submit(&self, ctx: &PageContext<'_>) -> Notice {
        if self.email.is_empty() || self.password.is_empty() {
            return Notice::error("Please enter both email and password");
        }
        match ctx.session.try_login(&self.email, &self.password).await {
            Ok(_) => {
                ctx.navigator.push(HOME_PATH);
                Notice::success("You have successfully logged in")
            }
            Err(err) => match DeskError::from(err) {
                DeskError::TransientSimulation(_) => {
                    Notice::error("An error occurred during login")
                }
                other => Notice::from(&other),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Option<Role>,
}

impl RegisterForm {
    /// Submit the form. Nothing is stored; success only leads back to login.
    pub async fn submit(&self, ctx: &PageContext<'_>) -> Notice {
        if let Err(err) = DeskError::require(&[
            ("name", !self.name.is_empty()),
            ("email", !self.email.is_empty()),
            ("password", !self.password.is_empty()),
        ]) {
            return Notice::from(&err);
        }
        let request = RegistrationRequest {
            name: Some(self.name.clone()),
            email: Some(self.email.clone()),
            password: Some(self.password.clone()),
            role: self.role,
            company_id: None,
            dealer_id: None,
        };
        if ctx.session.register(&request).await {
            ctx.navigator.push(LOGIN_PATH);
            Notice::success("Account created, please sign in")
        } else {
            Notice::error("An error occurred during registration")
        }
    }
}
