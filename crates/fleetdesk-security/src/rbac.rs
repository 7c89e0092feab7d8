//! ---
//! fd_section: "06-security-access-control"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Role policy, identity, and credential collaborators."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Role to capability lookup.
//!
//! Every menu, route requirement, action button and row filter in the
//! dashboard reads from [`Capabilities`]; nothing branches on [`Role`]
//! directly. Roles carry no implied ordering: each one has an explicit
//! record below. Lookups take `Option<Role>` and fail closed, so an identity
//! without a recognised role gets [`Capabilities::NONE`].

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoEnumIterator, IntoStaticStr};

/// The five organisational roles.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    IntoStaticStr,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Operator of the whole application.
    ApplicationAdmin,
    /// Administrator of one company.
    CompanyAdmin,
    /// Field employee of a company.
    CompanyEmployee,
    /// Administrator of one dealer under a company.
    DealerAdmin,
    /// Employee of a dealer.
    DealerEmployee,
}

/// Organisational tier a role belongs to; drives the sidebar theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleTier {
    /// Application-wide administration.
    Application,
    /// Company staff.
    Company,
    /// Dealer staff.
    Dealer,
}

impl Role {
    /// All roles in declaration order.
    pub const ALL: [Role; 5] = [
        Role::ApplicationAdmin,
        Role::CompanyAdmin,
        Role::CompanyEmployee,
        Role::DealerAdmin,
        Role::DealerEmployee,
    ];

    /// Wire name, e.g. `COMPANY_EMPLOYEE`.
    pub fn as_str(&self) -> &'static str {
        (*self).into()
    }

    /// Label shown under the user's name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Role::ApplicationAdmin => "System Admin",
            Role::CompanyAdmin => "Company Admin",
            Role::CompanyEmployee => "Company Employee",
            Role::DealerAdmin => "Dealer Admin",
            Role::DealerEmployee => "Dealer Employee",
        }
    }

    /// Label for an optional role; anything unrecognised is a plain `User`.
    pub fn display_name_of(role: Option<Role>) -> &'static str {
        role.map(|role| role.display_name()).unwrap_or("User")
    }

    pub fn tier(&self) -> RoleTier {
        match self {
            Role::ApplicationAdmin => RoleTier::Application,
            Role::CompanyAdmin | Role::CompanyEmployee => RoleTier::Company,
            Role::DealerAdmin | Role::DealerEmployee => RoleTier::Dealer,
        }
    }

    /// Company-scoped roles must carry a company id.
    pub fn requires_company(&self) -> bool {
        !matches!(self, Role::ApplicationAdmin)
    }

    /// Dealer-scoped roles must carry a dealer id as well.
    pub fn requires_dealer(&self) -> bool {
        matches!(self, Role::DealerAdmin | Role::DealerEmployee)
    }
}

/// Page identifiers known to the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "kebab-case")]
pub enum Page {
    Dashboard,
    Users,
    Companies,
    Dealers,
    Machines,
    Tasks,
    Tickets,
    MachineInstallation,
}

impl Page {
    pub fn path(&self) -> &'static str {
        match self {
            Page::Dashboard => "/dashboard",
            Page::Users => "/users",
            Page::Companies => "/companies",
            Page::Dealers => "/dealers",
            Page::Machines => "/machines",
            Page::Tasks => "/tasks",
            Page::Tickets => "/tickets",
            Page::MachineInstallation => "/machine-installation",
        }
    }

    pub fn from_path(path: &str) -> Option<Page> {
        Page::iter().find(|page| page.path() == path)
    }
}

/// One entry of the sidebar menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NavItem {
    pub page: Page,
    pub label: &'static str,
}

const fn nav(page: Page, label: &'static str) -> NavItem {
    NavItem { page, label }
}

/// Permission-gated actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Manage user accounts (the Users / Employees page).
    ManageUsers,
    /// Start the add-machine flow (route-level; the form may still be read-only).
    AddMachines,
    /// Fill in the installation form fields (field-level).
    InstallMachines,
    /// Create and assign tasks.
    AssignTasks,
    /// Open service tickets.
    CreateTickets,
    /// Resolve and close service tickets.
    CloseTickets,
}

/// Which tasks a role sees before search and status filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TaskScope {
    All,
    AssignedToSelf,
    AssignedByOrToSelf,
    Nothing,
}

/// Which tickets a role sees before search and status filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TicketScope {
    All,
    ReportedBySelf,
    Nothing,
}

/// Which machines a role sees before search and status filters apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MachineScope {
    All,
    Nothing,
}

/// Capability record for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Capabilities {
    /// Ordered sidebar menu.
    pub navigation: &'static [NavItem],
    /// Pages reachable by direct navigation; a superset of `navigation`.
    pub pages: &'static [Page],
    pub actions: &'static [Action],
    pub machines: MachineScope,
    pub tasks: TaskScope,
    pub tickets: TicketScope,
}

impl Capabilities {
    pub const APPLICATION_ADMIN: Capabilities = Capabilities {
        navigation: &[
            nav(Page::Dashboard, "Dashboard"),
            nav(Page::Users, "Users"),
            nav(Page::Companies, "Companies"),
            nav(Page::Dealers, "Dealers"),
            nav(Page::Machines, "Machines"),
            nav(Page::Tasks, "Tasks"),
            nav(Page::Tickets, "Tickets"),
        ],
        pages: &[
            Page::Dashboard,
            Page::Users,
            Page::Companies,
            Page::Dealers,
            Page::Machines,
            Page::Tasks,
            Page::Tickets,
            Page::MachineInstallation,
        ],
        actions: &[
            Action::ManageUsers,
            Action::AddMachines,
            Action::AssignTasks,
            Action::CloseTickets,
        ],
        machines: MachineScope::All,
        tasks: TaskScope::All,
        tickets: TicketScope::All,
    };

    pub const COMPANY_ADMIN: Capabilities = Capabilities {
        navigation: &[
            nav(Page::Dashboard, "Dashboard"),
            nav(Page::Users, "Employees"),
            nav(Page::Dealers, "Dealers"),
            nav(Page::Machines, "Machines"),
            nav(Page::Tasks, "Tasks"),
            nav(Page::Tickets, "Tickets"),
        ],
        pages: &[
            Page::Dashboard,
            Page::Users,
            Page::Dealers,
            Page::Machines,
            Page::Tasks,
            Page::Tickets,
            Page::MachineInstallation,
        ],
        actions: &[
            Action::ManageUsers,
            Action::AddMachines,
            Action::AssignTasks,
            Action::CloseTickets,
        ],
        machines: MachineScope::All,
        tasks: TaskScope::All,
        tickets: TicketScope::All,
    };

    pub const COMPANY_EMPLOYEE: Capabilities = Capabilities {
        navigation: &[
            nav(Page::Dashboard, "Dashboard"),
            nav(Page::Machines, "Machines"),
            nav(Page::Tasks, "Tasks"),
            nav(Page::Tickets, "Tickets"),
        ],
        pages: &[
            Page::Dashboard,
            Page::Machines,
            Page::Tasks,
            Page::Tickets,
            Page::MachineInstallation,
        ],
        actions: &[
            Action::InstallMachines,
            Action::AssignTasks,
            Action::CloseTickets,
        ],
        machines: MachineScope::All,
        tasks: TaskScope::AssignedToSelf,
        tickets: TicketScope::All,
    };

    pub const DEALER_ADMIN: Capabilities = Capabilities {
        navigation: &[
            nav(Page::Dashboard, "Dashboard"),
            nav(Page::Users, "Employees"),
            nav(Page::Machines, "Machines"),
            nav(Page::Tasks, "Tasks"),
            nav(Page::Tickets, "Tickets"),
        ],
        pages: &[
            Page::Dashboard,
            Page::Users,
            Page::Machines,
            Page::Tasks,
            Page::Tickets,
        ],
        actions: &[
            Action::ManageUsers,
            Action::AssignTasks,
            Action::CreateTickets,
        ],
        machines: MachineScope::All,
        tasks: TaskScope::AssignedByOrToSelf,
        tickets: TicketScope::ReportedBySelf,
    };

    pub const DEALER_EMPLOYEE: Capabilities = Capabilities {
        navigation: &[
            nav(Page::Dashboard, "Dashboard"),
            nav(Page::Machines, "Machines"),
            nav(Page::Tasks, "Tasks"),
            nav(Page::Tickets, "Tickets"),
        ],
        pages: &[
            Page::Dashboard,
            Page::Machines,
            Page::Tasks,
            Page::Tickets,
            Page::MachineInstallation,
        ],
        actions: &[Action::InstallMachines, Action::CreateTickets],
        machines: MachineScope::All,
        tasks: TaskScope::AssignedToSelf,
        tickets: TicketScope::ReportedBySelf,
    };

    /// Record for identities without a recognised role.
    pub const NONE: Capabilities = Capabilities {
        navigation: &[],
        pages: &[],
        actions: &[],
        machines: MachineScope::Nothing,
        tasks: TaskScope::Nothing,
        tickets: TicketScope::Nothing,
    };

    /// Look up the record for `role`.
    pub fn of(role: Option<Role>) -> &'static Capabilities {
        match role {
            Some(Role::ApplicationAdmin) => &Self::APPLICATION_ADMIN,
            Some(Role::CompanyAdmin) => &Self::COMPANY_ADMIN,
            Some(Role::CompanyEmployee) => &Self::COMPANY_EMPLOYEE,
            Some(Role::DealerAdmin) => &Self::DEALER_ADMIN,
            Some(Role::DealerEmployee) => &Self::DEALER_EMPLOYEE,
            None => &Self::NONE,
        }
    }

    pub fn allows(&self, action: Action) -> bool {
        self.actions.contains(&action)
    }

    pub fn can_access(&self, page: Page) -> bool {
        self.pages.contains(&page)
    }

    pub fn can_manage_users(&self) -> bool {
        self.allows(Action::ManageUsers)
    }

    /// Route-level: may start the add-machine flow.
    pub fn can_add_machines(&self) -> bool {
        self.allows(Action::AddMachines)
    }

    /// Field-level: may fill in the installation form.
    pub fn can_install_machines(&self) -> bool {
        self.allows(Action::InstallMachines)
    }

    pub fn can_assign_tasks(&self) -> bool {
        self.allows(Action::AssignTasks)
    }

    pub fn can_create_tickets(&self) -> bool {
        self.allows(Action::CreateTickets)
    }

    pub fn can_close_tickets(&self) -> bool {
        self.allows(Action::CloseTickets)
    }
}

/// Shorthand for `Capabilities::of(role).allows(action)`.
pub fn is_allowed(role: Option<Role>, action: Action) -> bool {
    Capabilities::of(role).allows(action)
}

/// Roles whose page-access set contains `page`, in [`Role::ALL`] order.
pub fn roles_with_access(page: Page) -> Vec<Role> {
    Role::iter()
        .filter(|role| Capabilities::of(Some(*role)).can_access(page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn menu(role: Role) -> Vec<(Page, &'static str)> {
        Capabilities::of(Some(role))
            .navigation
            .iter()
            .map(|item| (item.page, item.label))
            .collect()
    }

    #[test]
    fn menus_match_each_role() {
        assert_eq!(
            menu(Role::ApplicationAdmin),
            vec![
                (Page::Dashboard, "Dashboard"),
                (Page::Users, "Users"),
                (Page::Companies, "Companies"),
                (Page::Dealers, "Dealers"),
                (Page::Machines, "Machines"),
                (Page::Tasks, "Tasks"),
                (Page::Tickets, "Tickets"),
            ]
        );
        assert_eq!(
            menu(Role::CompanyAdmin),
            vec![
                (Page::Dashboard, "Dashboard"),
                (Page::Users, "Employees"),
                (Page::Dealers, "Dealers"),
                (Page::Machines, "Machines"),
                (Page::Tasks, "Tasks"),
                (Page::Tickets, "Tickets"),
            ]
        );
        assert_eq!(
            menu(Role::DealerAdmin),
            vec![
                (Page::Dashboard, "Dashboard"),
                (Page::Users, "Employees"),
                (Page::Machines, "Machines"),
                (Page::Tasks, "Tasks"),
                (Page::Tickets, "Tickets"),
            ]
        );
        let employee_menu = vec![
            (Page::Dashboard, "Dashboard"),
            (Page::Machines, "Machines"),
            (Page::Tasks, "Tasks"),
            (Page::Tickets, "Tickets"),
        ];
        assert_eq!(menu(Role::CompanyEmployee), employee_menu);
        assert_eq!(menu(Role::DealerEmployee), employee_menu);
    }

    #[test]
    fn page_access_is_superset_of_navigation() {
        for role in Role::iter() {
            let caps = Capabilities::of(Some(role));
            for item in caps.navigation {
                assert!(caps.can_access(item.page), "{role} cannot reach {:?}", item.page);
            }
        }
    }

    #[test]
    fn installation_page_excludes_dealer_admin() {
        assert_eq!(
            roles_with_access(Page::MachineInstallation),
            vec![
                Role::ApplicationAdmin,
                Role::CompanyAdmin,
                Role::CompanyEmployee,
                Role::DealerEmployee,
            ]
        );
    }

    #[test]
    fn add_and_install_machine_predicates_are_disjoint() {
        let adders: Vec<Role> = Role::iter()
            .filter(|role| Capabilities::of(Some(*role)).can_add_machines())
            .collect();
        let installers: Vec<Role> = Role::iter()
            .filter(|role| Capabilities::of(Some(*role)).can_install_machines())
            .collect();
        assert_eq!(adders, vec![Role::ApplicationAdmin, Role::CompanyAdmin]);
        assert_eq!(
            installers,
            vec![Role::CompanyEmployee, Role::DealerEmployee]
        );
    }

    #[test]
    fn action_table_matches_policy() {
        let expect = |action: Action, roles: &[Role]| {
            for role in Role::iter() {
                assert_eq!(
                    is_allowed(Some(role), action),
                    roles.contains(&role),
                    "{role} / {action:?}"
                );
            }
        };
        expect(
            Action::AssignTasks,
            &[
                Role::ApplicationAdmin,
                Role::CompanyAdmin,
                Role::DealerAdmin,
                Role::CompanyEmployee,
            ],
        );
        expect(
            Action::CreateTickets,
            &[Role::DealerAdmin, Role::DealerEmployee],
        );
        expect(
            Action::CloseTickets,
            &[
                Role::ApplicationAdmin,
                Role::CompanyAdmin,
                Role::CompanyEmployee,
            ],
        );
        expect(
            Action::ManageUsers,
            &[Role::ApplicationAdmin, Role::CompanyAdmin, Role::DealerAdmin],
        );
    }

    #[test]
    fn missing_role_fails_closed() {
        let caps = Capabilities::of(None);
        assert!(caps.navigation.is_empty());
        assert!(caps.pages.is_empty());
        for action in Action::iter() {
            assert!(!caps.allows(action));
        }
        assert_eq!(caps.tasks, TaskScope::Nothing);
        assert_eq!(caps.tickets, TicketScope::Nothing);
        assert_eq!(caps.machines, MachineScope::Nothing);
    }

    #[test]
    fn machines_are_never_scoped_by_role() {
        for role in Role::iter() {
            assert_eq!(Capabilities::of(Some(role)).machines, MachineScope::All);
        }
    }

    #[test]
    fn role_names_round_trip_through_strings() {
        assert_eq!(Role::DealerEmployee.to_string(), "DEALER_EMPLOYEE");
        assert_eq!(
            Role::from_str("COMPANY_ADMIN").unwrap(),
            Role::CompanyAdmin
        );
        assert!(Role::from_str("SUPER_USER").is_err());
        assert_eq!(
            serde_json::to_string(&Role::ApplicationAdmin).unwrap(),
            "\"APPLICATION_ADMIN\""
        );
    }

    #[test]
    fn display_names_and_tiers() {
        assert_eq!(Role::ApplicationAdmin.display_name(), "System Admin");
        assert_eq!(Role::display_name_of(None), "User");
        assert_eq!(Role::CompanyEmployee.tier(), RoleTier::Company);
        assert_eq!(Role::DealerAdmin.tier(), RoleTier::Dealer);
    }

    #[test]
    fn pages_resolve_from_paths() {
        assert_eq!(
            Page::from_path("/machine-installation"),
            Some(Page::MachineInstallation)
        );
        assert_eq!(Page::from_path("/login"), None);
    }
}
