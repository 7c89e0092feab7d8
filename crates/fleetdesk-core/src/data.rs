//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use chrono::NaiveDate;
use fleetdesk_security::UserDirectory;

use crate::model::{
    Machine, MachineStatus, Task, TaskPriority, TaskStatus, Ticket, TicketStatus, TicketUrgency,
};

/// Models offered by the installation form.
pub const MACHINE_MODELS: [&str; 5] = [
    "CLX-5000 Standard",
    "CLX-6000 Pro",
    "CLX-7500 Enterprise",
    "RVX-200 Compact",
    "RVX-300 Advanced",
];

/// Read-only access to the record collections. The dashboard never writes
/// through this interface.
pub trait DataSource: Send + Sync {
    fn machines(&self) -> &[Machine];
    fn tasks(&self) -> &[Task];
    fn tickets(&self) -> &[Ticket];
    fn directory(&self) -> &UserDirectory;

    fn machine(&self, id: &str) -> Option<&Machine> {
        self.machines().iter().find(|machine| machine.id == id)
    }
}

/// Fixed record set held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDataSource {
    directory: UserDirectory,
    machines: Vec<Machine>,
    tasks: Vec<Task>,
    tickets: Vec<Ticket>,
}

impl InMemoryDataSource {
    pub fn new(
        directory: UserDirectory,
        machines: Vec<Machine>,
        tasks: Vec<Task>,
        tickets: Vec<Ticket>,
    ) -> Self {
        Self {
            directory,
            machines,
            tasks,
            tickets,
        }
    }

    /// Demo records: the five demo users, four machines, four tasks, three
    /// tickets.
    pub fn demo() -> Self {
        Self::new(
            UserDirectory::demo(),
            demo_machines(),
            demo_tasks(),
            demo_tickets(),
        )
    }
}

impl DataSource for InMemoryDataSource {
    fn machines(&self) -> &[Machine] {
        &self.machines
    }

    fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    fn tickets(&self) -> &[Ticket] {
        &self.tickets
    }

    fn directory(&self) -> &UserDirectory {
        &self.directory
    }
}

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}

#[allow(clippy::too_many_arguments)]
fn installed(
    id: &str,
    model: &str,
    serial: &str,
    on: NaiveDate,
    by: &str,
    location: &str,
    notes: Option<&str>,
    status: MachineStatus,
) -> Machine {
    Machine {
        id: id.to_owned(),
        model: model.to_owned(),
        serial_number: serial.to_owned(),
        installation_date: Some(on),
        installed_by_id: Some(by.to_owned()),
        location: Some(location.to_owned()),
        notes: notes.map(str::to_owned),
        status,
    }
}

fn demo_machines() -> Vec<Machine> {
    vec![
        installed(
            "1",
            "CLX-5000 Standard",
            "CLX5000-12345-AB",
            date(2023, 5, 15),
            "3",
            "123 Main St, New York, NY",
            Some("Installed without issues"),
            MachineStatus::Installed,
        ),
        installed(
            "2",
            "RVX-300 Advanced",
            "RVX300-67890-CD",
            date(2023, 6, 22),
            "3",
            "456 Park Ave, Los Angeles, CA",
            Some("Client requested additional training"),
            MachineStatus::Installed,
        ),
        Machine {
            id: "3".into(),
            model: "CLX-6000 Pro".into(),
            serial_number: "CLX6000-24680-EF".into(),
            installation_date: None,
            installed_by_id: None,
            location: None,
            notes: None,
            status: MachineStatus::Pending,
        },
        installed(
            "4",
            "RVX-200 Compact",
            "RVX200-13579-GH",
            date(2023, 4, 10),
            "5",
            "789 Broadway, Chicago, IL",
            None,
            MachineStatus::Servicing,
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn task(
    id: &str,
    title: &str,
    description: &str,
    created_at: NaiveDate,
    deadline: NaiveDate,
    priority: TaskPriority,
    status: TaskStatus,
    assigner: &str,
    assignee: &str,
    machine: &str,
) -> Task {
    Task {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        created_at,
        deadline,
        priority,
        status,
        assigner_id: assigner.to_owned(),
        assignee_id: assignee.to_owned(),
        machine_id: Some(machine.to_owned()),
    }
}

fn demo_tasks() -> Vec<Task> {
    vec![
        task(
            "1",
            "Install CLX-5000 at Client HQ",
            "New machine installation at client headquarters",
            date(2023, 5, 10),
            date(2023, 5, 15),
            TaskPriority::High,
            TaskStatus::Completed,
            "2",
            "3",
            "1",
        ),
        task(
            "2",
            "Verify RVX-300 installation",
            "Perform quality check on recent installation",
            date(2023, 6, 18),
            date(2023, 6, 22),
            TaskPriority::Medium,
            TaskStatus::Completed,
            "2",
            "3",
            "2",
        ),
        task(
            "3",
            "Prepare site for CLX-6000 installation",
            "Visit client site and ensure all requirements are met",
            date(2023, 7, 1),
            date(2023, 7, 10),
            TaskPriority::Low,
            TaskStatus::Pending,
            "4",
            "5",
            "3",
        ),
        task(
            "4",
            "Repair RVX-200 cooling system",
            "Client reported overheating issues",
            date(2023, 4, 5),
            date(2023, 4, 10),
            TaskPriority::Urgent,
            TaskStatus::InProgress,
            "2",
            "3",
            "4",
        ),
    ]
}

fn demo_tickets() -> Vec<Ticket> {
    vec![
        Ticket {
            id: "1".into(),
            machine_id: "1".into(),
            issue_description: "Display showing error code E-501".into(),
            date_reported: date(2023, 6, 10),
            reported_by_id: "5".into(),
            assigned_to_id: Some("3".into()),
            status: TicketStatus::Resolved,
            urgency: TicketUrgency::Medium,
            resolution_notes: Some("Replaced display module and recalibrated".into()),
        },
        Ticket {
            id: "2".into(),
            machine_id: "2".into(),
            issue_description: "Machine not powering on after installation".into(),
            date_reported: date(2023, 7, 5),
            reported_by_id: "5".into(),
            assigned_to_id: Some("3".into()),
            status: TicketStatus::InProgress,
            urgency: TicketUrgency::High,
            resolution_notes: None,
        },
        Ticket {
            id: "3".into(),
            machine_id: "4".into(),
            issue_description: "Overheating during extended operation".into(),
            date_reported: date(2023, 4, 12),
            reported_by_id: "4".into(),
            assigned_to_id: Some("3".into()),
            status: TicketStatus::Open,
            urgency: TicketUrgency::Critical,
            resolution_notes: None,
        },
    ]
}
