//! ---
//! fd_section: "06-security-access-control"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Role policy, identity, and credential collaborators."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::rbac::Role;

/// Identifier for a user account.
pub type UserId = String;

/// Authenticated user. Issued by an [`Authenticator`] and never edited in
/// place; a new login replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Stable identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Role, or `None` when the stored value is missing or unrecognised.
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: Option<Role>,
    /// Owning company, set for every company and dealer role.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_id: Option<String>,
    /// Owning dealer, set for dealer roles.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dealer_id: Option<String>,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<Option<Role>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| Role::from_str(&value).ok()))
}

/// Violations of the identity scoping rules.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    /// A company or dealer role without a company id.
    #[error("{role} identity {id} has no company id")]
    MissingCompany { id: UserId, role: Role },
    /// A dealer role without a dealer id.
    #[error("{role} identity {id} has no dealer id")]
    MissingDealer { id: UserId, role: Role },
    /// An application admin carrying company or dealer scope.
    #[error("application admin {0} must not carry company or dealer ids")]
    UnexpectedScope(UserId),
}

impl Identity {
    /// Construct an identity with no company or dealer scope.
    pub fn new(
        id: impl Into<UserId>,
        name: impl Into<String>,
        email: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            email: email.into(),
            role: Some(role),
            company_id: None,
            dealer_id: None,
        }
    }

    pub fn with_company(mut self, company_id: impl Into<String>) -> Self {
        self.company_id = Some(company_id.into());
        self
    }

    pub fn with_dealer(mut self, dealer_id: impl Into<String>) -> Self {
        self.dealer_id = Some(dealer_id.into());
        self
    }

    /// Check the company/dealer scoping rules for the identity's role.
    pub fn validate(&self) -> Result<(), IdentityError> {
        let Some(role) = self.role else {
            return Ok(());
        };
        if role.requires_company() && self.company_id.is_none() {
            return Err(IdentityError::MissingCompany {
                id: self.id.clone(),
                role,
            });
        }
        if role.requires_dealer() && self.dealer_id.is_none() {
            return Err(IdentityError::MissingDealer {
                id: self.id.clone(),
                role,
            });
        }
        if !role.requires_company() && (self.company_id.is_some() || self.dealer_id.is_some()) {
            return Err(IdentityError::UnexpectedScope(self.id.clone()));
        }
        Ok(())
    }

    /// First character of the name, used as the avatar fallback.
    pub fn initial(&self) -> char {
        self.name.chars().next().unwrap_or('U')
    }
}

/// Email/password pair submitted by the login form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Partial identity submitted by the registration form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
    pub company_id: Option<String>,
    pub dealer_id: Option<String>,
}

/// In-memory user directory holding the demo accounts.
#[derive(Debug, Clone, Default)]
pub struct UserDirectory {
    users: Vec<Identity>,
}

impl UserDirectory {
    pub fn new(users: Vec<Identity>) -> Self {
        Self { users }
    }

    /// The five demo accounts, one per role.
    pub fn demo() -> Self {
        Self::new(vec![
            Identity::new("1", "System Admin", "admin@system.com", Role::ApplicationAdmin),
            Identity::new("2", "Company Admin", "admin@company.com", Role::CompanyAdmin)
                .with_company("1"),
            Identity::new(
                "3",
                "Company Employee",
                "employee@company.com",
                Role::CompanyEmployee,
            )
            .with_company("1"),
            Identity::new("4", "Dealer Admin", "admin@dealer.com", Role::DealerAdmin)
                .with_company("1")
                .with_dealer("1"),
            Identity::new(
                "5",
                "Dealer Employee",
                "employee@dealer.com",
                Role::DealerEmployee,
            )
            .with_company("1")
            .with_dealer("1"),
        ])
    }

    /// Exact email match.
    pub fn find_by_email(&self, email: &str) -> Option<&Identity> {
        self.users.iter().find(|user| user.email == email)
    }

    pub fn find_by_id(&self, id: &str) -> Option<&Identity> {
        self.users.iter().find(|user| user.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Identity> {
        self.users.iter()
    }

    /// Users offered in the task assignee picker.
    pub fn assignable_employees(&self) -> Vec<&Identity> {
        self.users
            .iter()
            .filter(|user| {
                matches!(
                    user.role,
                    Some(Role::CompanyEmployee) | Some(Role::DealerEmployee)
                )
            })
            .collect()
    }
}

/// Prefilled demo credentials for each role's account.
pub fn demo_credentials(role: Role) -> Credentials {
    let email = match role {
        Role::ApplicationAdmin => "admin@system.com",
        Role::CompanyAdmin => "admin@company.com",
        Role::CompanyEmployee => "employee@company.com",
        Role::DealerAdmin => "admin@dealer.com",
        Role::DealerEmployee => "employee@dealer.com",
    };
    Credentials::new(email, "password")
}

/// Failures reported by a credential service.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No account matches the submitted email.
    #[error("no account registered for {email}")]
    UnknownEmail { email: String },
    /// The (simulated) network call itself failed.
    #[error("credential service unavailable: {0}")]
    Transient(String),
}

/// Credential-issuance service.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Exchange credentials for an identity.
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError>;

    /// Create an account.
    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthError>;
}

/// Authenticator backed by a [`UserDirectory`] with a fixed simulated delay.
///
/// Passwords are not checked and registration writes nothing.
#[derive(Debug, Clone)]
pub struct DirectoryAuthenticator {
    directory: UserDirectory,
    latency: Duration,
}

impl DirectoryAuthenticator {
    pub fn new(directory: UserDirectory, latency: Duration) -> Self {
        Self { directory, latency }
    }

    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }
}

#[async_trait]
impl Authenticator for DirectoryAuthenticator {
    async fn authenticate(&self, credentials: &Credentials) -> Result<Identity, AuthError> {
        tokio::time::sleep(self.latency).await;
        let found = self.directory.find_by_email(&credentials.email).cloned();
        debug!(email = %credentials.email, found = found.is_some(), "directory lookup");
        found.ok_or_else(|| AuthError::UnknownEmail {
            email: credentials.email.clone(),
        })
    }

    async fn register(&self, request: &RegistrationRequest) -> Result<(), AuthError> {
        tokio::time::sleep(self.latency).await;
        debug!(email = ?request.email, "registration accepted without write");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_directory_satisfies_scoping_rules() {
        let directory = UserDirectory::demo();
        assert_eq!(directory.iter().count(), 5);
        for user in directory.iter() {
            user.validate().unwrap();
        }
    }

    #[test]
    fn dealer_without_dealer_id_is_invalid() {
        let identity =
            Identity::new("9", "Loose Dealer", "x@dealer.com", Role::DealerAdmin).with_company("1");
        assert_eq!(
            identity.validate(),
            Err(IdentityError::MissingDealer {
                id: "9".into(),
                role: Role::DealerAdmin
            })
        );
    }

    #[test]
    fn company_role_without_company_is_invalid() {
        let identity = Identity::new("9", "Nobody", "x@company.com", Role::CompanyEmployee);
        assert!(matches!(
            identity.validate(),
            Err(IdentityError::MissingCompany { .. })
        ));
    }

    #[test]
    fn serialises_as_flat_camel_case_record() {
        let directory = UserDirectory::demo();
        let dealer = directory.find_by_id("4").unwrap();
        let value = serde_json::to_value(dealer).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "4",
                "name": "Dealer Admin",
                "email": "admin@dealer.com",
                "role": "DEALER_ADMIN",
                "companyId": "1",
                "dealerId": "1",
            })
        );
        let admin = serde_json::to_value(directory.find_by_id("1").unwrap()).unwrap();
        assert!(admin.get("companyId").is_none());
    }

    #[test]
    fn unknown_role_deserialises_to_none() {
        let identity: Identity = serde_json::from_str(
            r#"{"id":"7","name":"Ghost","email":"g@x.com","role":"SUPER_USER"}"#,
        )
        .unwrap();
        assert_eq!(identity.role, None);
        let missing: Identity =
            serde_json::from_str(r#"{"id":"7","name":"Ghost","email":"g@x.com"}"#).unwrap();
        assert_eq!(missing.role, None);
    }

    #[test]
    fn assignable_employees_are_the_two_employee_accounts() {
        let directory = UserDirectory::demo();
        let ids: Vec<&str> = directory
            .assignable_employees()
            .into_iter()
            .map(|user| user.id.as_str())
            .collect();
        assert_eq!(ids, vec!["3", "5"]);
    }

    #[test]
    fn demo_credentials_resolve_to_matching_role() {
        let directory = UserDirectory::demo();
        for role in Role::ALL {
            let credentials = demo_credentials(role);
            let user = directory.find_by_email(&credentials.email).unwrap();
            assert_eq!(user.role, Some(role));
        }
    }

    #[tokio::test]
    async fn authenticate_ignores_password_and_rejects_unknown_email() {
        let auth = DirectoryAuthenticator::new(UserDirectory::demo(), Duration::ZERO);
        let identity = auth
            .authenticate(&Credentials::new("employee@company.com", "anything"))
            .await
            .unwrap();
        assert_eq!(identity.id, "3");

        let err = auth
            .authenticate(&Credentials::new("nobody@nowhere.com", "password"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            AuthError::UnknownEmail {
                email: "nobody@nowhere.com".into()
            }
        );
    }

    #[tokio::test]
    async fn register_always_succeeds_without_writing() {
        let auth = DirectoryAuthenticator::new(UserDirectory::demo(), Duration::ZERO);
        let request = RegistrationRequest {
            email: Some("admin@system.com".into()),
            ..Default::default()
        };
        auth.register(&request).await.unwrap();
        assert_eq!(auth.directory().iter().count(), 5);
    }
}
