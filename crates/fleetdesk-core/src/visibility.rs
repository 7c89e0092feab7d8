//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Record visibility: which machines, tasks, and tickets a viewer may see.
//!
//! Role scoping comes from the capability table and runs first. The search
//! term and status filter are then ANDed on top. Machines are never narrowed
//! by role for a recognised role; tasks and tickets are.

use fleetdesk_security::{Capabilities, Identity, MachineScope, TaskScope, TicketScope};

use crate::model::{Machine, MachineStatus, Task, TaskStatus, Ticket, TicketStatus};

/// A record that can be searched and filtered by status.
pub trait Filterable {
    type Status: Copy + PartialEq;

    fn status(&self) -> Self::Status;

    /// Fields matched by the free-text search.
    fn search_fields(&self) -> Vec<&str>;
}

impl Filterable for Machine {
    type Status = MachineStatus;

    fn status(&self) -> MachineStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.model.as_str(), self.serial_number.as_str()];
        if let Some(location) = &self.location {
            fields.push(location);
        }
        fields
    }
}

impl Filterable for Task {
    type Status = TaskStatus;

    fn status(&self) -> TaskStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.title.as_str(), self.description.as_str()]
    }
}

impl Filterable for Ticket {
    type Status = TicketStatus;

    fn status(&self) -> TicketStatus {
        self.status
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.issue_description.as_str()]
    }
}

/// Search term plus optional status. `status: None` lets every status
/// through; an empty search term matches everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFilter<S> {
    pub search: String,
    pub status: Option<S>,
}

impl<S> Default for RecordFilter<S> {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: None,
        }
    }
}

impl<S: Copy + PartialEq> RecordFilter<S> {
    pub fn new(search: impl Into<String>, status: Option<S>) -> Self {
        Self {
            search: search.into(),
            status,
        }
    }

    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Filterable<Status = S>,
    {
        let status_ok = self.status.map_or(true, |status| record.status() == status);
        if !status_ok {
            return false;
        }
        let needle = self.search.to_lowercase();
        needle.is_empty()
            || record
                .search_fields()
                .iter()
                .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply<'a, T>(&self, records: impl IntoIterator<Item = &'a T>) -> Vec<&'a T>
    where
        T: Filterable<Status = S> + 'a,
    {
        records
            .into_iter()
            .filter(|record| self.matches(*record))
            .collect()
    }
}

fn capabilities(viewer: Option<&Identity>) -> &'static Capabilities {
    match viewer {
        Some(identity) => Capabilities::of(identity.role),
        None => &Capabilities::NONE,
    }
}

/// Tasks the viewer may see before search and status filtering.
pub fn visible_tasks<'a>(tasks: &'a [Task], viewer: Option<&Identity>) -> Vec<&'a Task> {
    let Some(identity) = viewer else {
        return Vec::new();
    };
    let id = identity.id.as_str();
    let scope = capabilities(viewer).tasks;
    tasks
        .iter()
        .filter(|task| match scope {
            TaskScope::All => true,
            TaskScope::AssignedToSelf => task.assignee_id == id,
            TaskScope::AssignedByOrToSelf => task.assigner_id == id || task.assignee_id == id,
            TaskScope::Nothing => false,
        })
        .collect()
}

/// Tickets the viewer may see before search and status filtering.
pub fn visible_tickets<'a>(tickets: &'a [Ticket], viewer: Option<&Identity>) -> Vec<&'a Ticket> {
    let Some(identity) = viewer else {
        return Vec::new();
    };
    let scope = capabilities(viewer).tickets;
    tickets
        .iter()
        .filter(|ticket| match scope {
            TicketScope::All => true,
            TicketScope::ReportedBySelf => ticket.reported_by_id == identity.id,
            TicketScope::Nothing => false,
        })
        .collect()
}

/// Machines the viewer may see before search and status filtering.
pub fn visible_machines<'a>(machines: &'a [Machine], viewer: Option<&Identity>) -> Vec<&'a Machine> {
    match capabilities(viewer).machines {
        MachineScope::All => machines.iter().collect(),
        MachineScope::Nothing => Vec::new(),
    }
}

pub fn filter_tasks<'a>(
    tasks: &'a [Task],
    viewer: Option<&Identity>,
    filter: &RecordFilter<TaskStatus>,
) -> Vec<&'a Task> {
    filter.apply(visible_tasks(tasks, viewer))
}

pub fn filter_tickets<'a>(
    tickets: &'a [Ticket],
    viewer: Option<&Identity>,
    filter: &RecordFilter<TicketStatus>,
) -> Vec<&'a Ticket> {
    filter.apply(visible_tickets(tickets, viewer))
}

pub fn filter_machines<'a>(
    machines: &'a [Machine],
    viewer: Option<&Identity>,
    filter: &RecordFilter<MachineStatus>,
) -> Vec<&'a Machine> {
    filter.apply(visible_machines(machines, viewer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{DataSource, InMemoryDataSource};
    use fleetdesk_security::{Role, UserDirectory};

    fn task_ids(records: &[&Task]) -> Vec<String> {
        records.iter().map(|task| task.id.clone()).collect()
    }

    fn ticket_ids(records: &[&Ticket]) -> Vec<String> {
        records.iter().map(|ticket| ticket.id.clone()).collect()
    }

    fn machine_ids(records: &[&Machine]) -> Vec<String> {
        records.iter().map(|machine| machine.id.clone()).collect()
    }

    fn user(id: &str) -> Identity {
        UserDirectory::demo().find_by_id(id).cloned().unwrap()
    }

    #[test]
    fn employees_see_only_their_assignments() {
        let data = InMemoryDataSource::demo();
        let company_employee = user("3");
        let visible = visible_tasks(data.tasks(), Some(&company_employee));
        assert_eq!(task_ids(&visible), ["1", "2", "4"]);

        let dealer_employee = user("5");
        let visible = visible_tasks(data.tasks(), Some(&dealer_employee));
        assert_eq!(task_ids(&visible), ["3"]);
    }

    #[test]
    fn dealer_admin_sees_tasks_assigned_by_or_to_them() {
        let data = InMemoryDataSource::demo();
        let visible = visible_tasks(data.tasks(), Some(&user("4")));
        assert_eq!(task_ids(&visible), ["3"]);
    }

    #[test]
    fn admins_see_every_task() {
        let data = InMemoryDataSource::demo();
        for id in ["1", "2"] {
            assert_eq!(visible_tasks(data.tasks(), Some(&user(id))).len(), 4);
        }
    }

    #[test]
    fn dealer_roles_see_only_reported_tickets() {
        let data = InMemoryDataSource::demo();
        let visible = visible_tickets(data.tickets(), Some(&user("5")));
        assert_eq!(ticket_ids(&visible), ["1", "2"]);
        let visible = visible_tickets(data.tickets(), Some(&user("4")));
        assert_eq!(ticket_ids(&visible), ["3"]);
        assert_eq!(visible_tickets(data.tickets(), Some(&user("3"))).len(), 3);
    }

    #[test]
    fn machines_are_never_narrowed_by_role() {
        let data = InMemoryDataSource::demo();
        for role in Role::ALL {
            let viewer = UserDirectory::demo()
                .iter()
                .find(|identity| identity.role == Some(role))
                .cloned()
                .unwrap();
            assert_eq!(visible_machines(data.machines(), Some(&viewer)).len(), 4);
        }
    }

    #[test]
    fn unknown_role_and_signed_out_see_nothing() {
        let data = InMemoryDataSource::demo();
        let mut ghost = user("1");
        ghost.role = None;
        assert!(visible_tasks(data.tasks(), Some(&ghost)).is_empty());
        assert!(visible_tickets(data.tickets(), Some(&ghost)).is_empty());
        assert!(visible_machines(data.machines(), Some(&ghost)).is_empty());
        assert!(visible_tasks(data.tasks(), None).is_empty());
        assert!(visible_machines(data.machines(), None).is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_fixed_fields() {
        let data = InMemoryDataSource::demo();
        let admin = user("1");
        let hits = filter_machines(
            data.machines(),
            Some(&admin),
            &RecordFilter::new("new york", None),
        );
        assert_eq!(machine_ids(&hits), ["1"]);

        let hits = filter_machines(data.machines(), Some(&admin), &RecordFilter::new("rvx", None));
        assert_eq!(machine_ids(&hits), ["2", "4"]);

        // notes are not searchable
        let hits = filter_machines(
            data.machines(),
            Some(&admin),
            &RecordFilter::new("training", None),
        );
        assert!(hits.is_empty());

        let hits = filter_tasks(data.tasks(), Some(&admin), &RecordFilter::new("OVERHEATING", None));
        assert_eq!(task_ids(&hits), ["4"]);
    }

    #[test]
    fn status_filter_composes_with_role_scope() {
        let data = InMemoryDataSource::demo();
        let employee = user("3");
        let completed = filter_tasks(
            data.tasks(),
            Some(&employee),
            &RecordFilter::new("", Some(TaskStatus::Completed)),
        );
        assert_eq!(task_ids(&completed), ["1", "2"]);

        let pending = filter_tasks(
            data.tasks(),
            Some(&employee),
            &RecordFilter::new("", Some(TaskStatus::Pending)),
        );
        assert!(pending.is_empty());

        let dealer = user("5");
        let open = filter_tickets(
            data.tickets(),
            Some(&dealer),
            &RecordFilter::new("", Some(TicketStatus::Open)),
        );
        assert!(open.is_empty());
    }
}
