//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Dashboard core: domain records, the route table and guard, record
//! visibility, and the page controllers built on them.

pub mod data;
pub mod error;
pub mod guard;
pub mod model;
pub mod pages;
pub mod routes;
pub mod visibility;

pub use data::{DataSource, InMemoryDataSource, MACHINE_MODELS};
pub use error::{DeskError, DeskResult};
pub use guard::{
    GuardState, HistoryNavigator, NavigationController, NavigationOutcome, Navigator, RouteGuard,
    View,
};
pub use model::{
    Machine, MachineStatus, Task, TaskPriority, TaskStatus, Ticket, TicketAction, TicketStatus,
    TicketUrgency,
};
pub use pages::{Notice, NoticeVariant, PageContext};
pub use routes::{PublicPage, Route};
pub use visibility::{
    filter_machines, filter_tasks, filter_tickets, visible_machines, visible_tasks,
    visible_tickets, Filterable, RecordFilter,
};
