//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use fleetdesk_security::Role;
use indexmap::IndexMap;
use serde::Serialize;

use super::PageContext;
use crate::model::{MachineStatus, TaskStatus, TicketStatus};
use crate::visibility::{visible_machines, visible_tasks, visible_tickets};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Stat {
    pub title: &'static str,
    pub value: u32,
}

const fn stat(title: &'static str, value: u32) -> Stat {
    Stat { title, value }
}

/// Headline figures for one role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Overview {
    pub title: &'static str,
    pub stats: [Stat; 4],
}

impl Overview {
    const APPLICATION_ADMIN: Overview = Overview {
        title: "System Overview",
        stats: [
            stat("Total Users", 28),
            stat("Total Companies", 4),
            stat("Total Dealers", 7),
            stat("Total Machines", 45),
        ],
    };
    const COMPANY_ADMIN: Overview = Overview {
        title: "Company Overview",
        stats: [
            stat("Total Employees", 12),
            stat("Active Dealers", 5),
            stat("Active Machines", 32),
            stat("Open Tickets", 6),
        ],
    };
    const COMPANY_EMPLOYEE: Overview = Overview {
        title: "Your Overview",
        stats: [
            stat("Assigned Tasks", 8),
            stat("Machines Installed", 15),
            stat("Open Tickets", 3),
            stat("Pending Installation", 2),
        ],
    };
    const DEALER_ADMIN: Overview = Overview {
        title: "Dealer Overview",
        stats: [
            stat("Total Employees", 6),
            stat("Managed Machines", 18),
            stat("Open Tasks", 4),
            stat("Active Tickets", 2),
        ],
    };
    const DEALER_EMPLOYEE: Overview = Overview {
        title: "Your Overview",
        stats: [
            stat("Assigned Tasks", 5),
            stat("Installations Assisted", 8),
            stat("Open Tickets", 2),
            stat("Pending Tasks", 3),
        ],
    };
    const FALLBACK: Overview = Overview {
        title: "Dashboard",
        stats: [
            stat("Tasks", 0),
            stat("Machines", 0),
            stat("Tickets", 0),
            stat("Users", 0),
        ],
    };

    pub fn of(role: Option<Role>) -> &'static Overview {
        match role {
            Some(Role::ApplicationAdmin) => &Self::APPLICATION_ADMIN,
            Some(Role::CompanyAdmin) => &Self::COMPANY_ADMIN,
            Some(Role::CompanyEmployee) => &Self::COMPANY_EMPLOYEE,
            Some(Role::DealerAdmin) => &Self::DEALER_ADMIN,
            Some(Role::DealerEmployee) => &Self::DEALER_EMPLOYEE,
            None => &Self::FALLBACK,
        }
    }
}

pub fn greeting(hour: u32) -> &'static str {
    if hour < 12 {
        "Good morning"
    } else if hour < 18 {
        "Good afternoon"
    } else {
        "Good evening"
    }
}

/// Record counts per status label, in chart order.
pub type Series = IndexMap<&'static str, usize>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DashboardView {
    pub heading: String,
    pub overview: &'static Overview,
    pub tasks: Series,
    pub tickets: Series,
    pub machines: Series,
}

/// Assemble the dashboard for the signed-in identity at `hour` local time.
pub fn dashboard(ctx: &PageContext<'_>, hour: u32) -> DashboardView {
    let viewer = ctx.viewer();
    let name = viewer.as_ref().map(|user| user.name.as_str()).unwrap_or("");

    let mut tasks: Series = [TaskStatus::Pending, TaskStatus::InProgress, TaskStatus::Completed]
        .iter()
        .map(|status| (status.label(), 0))
        .collect();
    for task in visible_tasks(ctx.data.tasks(), viewer.as_ref()) {
        *tasks.entry(task.status.label()).or_insert(0) += 1;
    }

    let mut tickets: Series = [
        TicketStatus::Open,
        TicketStatus::InProgress,
        TicketStatus::Resolved,
        TicketStatus::Closed,
    ]
    .iter()
    .map(|status| (status.label(), 0))
    .collect();
    for ticket in visible_tickets(ctx.data.tickets(), viewer.as_ref()) {
        *tickets.entry(ticket.status.label()).or_insert(0) += 1;
    }

    let mut machines: Series = [
        MachineStatus::Installed,
        MachineStatus::Pending,
        MachineStatus::Servicing,
    ]
    .iter()
    .map(|status| (status.label(), 0))
    .collect();
    for machine in visible_machines(ctx.data.machines(), viewer.as_ref()) {
        *machines.entry(machine.status.label()).or_insert(0) += 1;
    }

    DashboardView {
        heading: format!("{}, {}", greeting(hour), name),
        overview: Overview::of(viewer.as_ref().and_then(|user| user.role)),
        tasks,
        tickets,
        machines,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::tests::signed_in;

    #[test]
    fn greeting_boundaries() {
        assert_eq!(greeting(0), "Good morning");
        assert_eq!(greeting(11), "Good morning");
        assert_eq!(greeting(12), "Good afternoon");
        assert_eq!(greeting(17), "Good afternoon");
        assert_eq!(greeting(18), "Good evening");
    }

    #[test]
    fn every_role_has_its_own_overview() {
        assert_eq!(Overview::of(Some(Role::DealerAdmin)).title, "Dealer Overview");
        assert_eq!(Overview::of(Some(Role::DealerEmployee)).stats[1].title, "Installations Assisted");
        assert_eq!(Overview::of(None).stats.iter().map(|s| s.value).sum::<u32>(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn charts_count_only_visible_records() {
        let harness = signed_in("employee@dealer.com").await;
        let view = dashboard(&harness.context(), 9);
        assert_eq!(view.heading, "Good morning, Dealer Employee");
        assert_eq!(view.overview.title, "Your Overview");
        assert_eq!(view.tasks["Pending"], 1);
        assert_eq!(view.tasks["Completed"], 0);
        assert_eq!(view.tickets["Resolved"], 1);
        assert_eq!(view.tickets["In Progress"], 1);
        assert_eq!(view.tickets["Open"], 0);
        assert_eq!(view.machines["Installed"], 2);
        let order: Vec<&str> = view.tickets.keys().copied().collect();
        assert_eq!(order, ["Open", "In Progress", "Resolved", "Closed"]);
    }
}
