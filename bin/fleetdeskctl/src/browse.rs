//! ---
//! fd_section: "05-external-interfaces"
//! fd_subsection: "binary"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Control CLI for driving a FleetDesk session from a terminal."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::fmt::Display;
use std::str::FromStr;

use anyhow::{anyhow, Result};
use clap::Args;
use fleetdesk_common::time::local_hour;
use fleetdesk_core::pages::dashboard::{dashboard, DashboardView, Series};
use fleetdesk_core::pages::installation::InstallationPage;
use fleetdesk_core::pages::layout::sidebar;
use fleetdesk_core::pages::machines::MachinesPage;
use fleetdesk_core::pages::tasks::TasksPage;
use fleetdesk_core::pages::tickets::TicketsPage;
use fleetdesk_core::pages::unauthorized::{not_found, unauthorized, MessagePage};
use fleetdesk_core::{
    Machine, MachineStatus, NavigationOutcome, Navigator, PageContext, PublicPage, RecordFilter,
    Route, Task, TaskStatus, Ticket, TicketAction, TicketStatus, View,
};
use fleetdesk_security::{Capabilities, Page, Role};
use serde::Serialize;
use strum::IntoEnumIterator;

use crate::desk::Desk;

#[derive(Debug, Args)]
pub struct OpenArgs {
    /// Path to navigate to, e.g. /tickets.
    pub path: String,
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Case-insensitive substring matched against the searchable columns.
    #[arg(long, default_value = "")]
    pub search: String,
    /// Only show records in this status (kebab-case, e.g. in-progress).
    #[arg(long)]
    pub status: Option<String>,
}

#[derive(Debug, Args)]
pub struct CapabilitiesArgs {
    /// Role to describe; defaults to the signed-in identity's role.
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,
}

/// Ticket row with its machine and the button the viewer would see.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct TicketRow<'a> {
    #[serde(flatten)]
    ticket: &'a Ticket,
    machine_model: Option<&'a str>,
    action: Option<TicketAction>,
}

/// What a protected or public page shows.
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "kebab-case")]
enum Screen<'a> {
    Dashboard(DashboardView),
    Machines {
        rows: Vec<&'a Machine>,
        can_add_machine: bool,
    },
    Tasks {
        rows: Vec<&'a Task>,
        can_create_task: bool,
    },
    Tickets {
        rows: Vec<TicketRow<'a>>,
        can_create_ticket: bool,
    },
    Installation {
        models: &'static [&'static str],
        installed_by: String,
        editable: bool,
    },
    Message(MessagePage),
    Login,
    Register,
}

#[derive(Debug, Serialize)]
struct Visit<'a> {
    outcome: NavigationOutcome,
    location: Option<String>,
    screen: Option<Screen<'a>>,
}

pub fn menu(desk: &Desk) -> Result<()> {
    let current = desk.history.current().unwrap_or_default();
    let bar = sidebar(&desk.context(), &current);
    desk.emit(&bar, |bar| match bar {
        Some(bar) => {
            println!("{} | {}", bar.title, bar.subtitle);
            println!("[{}] {} ({})", bar.avatar, bar.user_name, bar.role_label);
            for link in &bar.links {
                let marker = if link.active { "*" } else { " " };
                println!(" {marker} {:<12} {}", link.label, link.path);
            }
        }
        None => println!("Not signed in"),
    })
}

pub fn open(desk: &Desk, args: OpenArgs) -> Result<()> {
    let controller = desk.navigation();
    let outcome = desk.block_on(controller.navigate(&args.path));

    let ctx = desk.context();
    let screen = match &outcome {
        NavigationOutcome::Rendered(view) => Some(screen_for(desk, ctx, *view)),
        NavigationOutcome::Redirected { to, .. } => match Route::resolve(to) {
            Route::Public(page) => Some(screen_for(desk, ctx, View::Public(page))),
            _ => None,
        },
        NavigationOutcome::Superseded => None,
    };
    let visit = Visit {
        outcome,
        location: desk.history.current(),
        screen,
    };
    desk.emit(&visit, print_visit)
}

pub fn machines(desk: &Desk, args: ListArgs) -> Result<()> {
    let mut page = MachinesPage::new(desk.context());
    let status = parse_status::<MachineStatus>(args.status.as_deref())?;
    page.filter = RecordFilter::new(args.search, status);
    let screen = Screen::Machines {
        rows: page.rows(),
        can_add_machine: page.can_add_machine(),
    };
    desk.emit(&screen, print_screen)
}

pub fn tasks(desk: &Desk, args: ListArgs) -> Result<()> {
    let mut page = TasksPage::new(desk.context());
    let status = parse_status::<TaskStatus>(args.status.as_deref())?;
    page.filter = RecordFilter::new(args.search, status);
    let screen = Screen::Tasks {
        rows: page.rows(),
        can_create_task: page.can_create_task(),
    };
    desk.emit(&screen, print_screen)
}

pub fn tickets(desk: &Desk, args: ListArgs) -> Result<()> {
    let mut page = TicketsPage::new(desk.context());
    let status = parse_status::<TicketStatus>(args.status.as_deref())?;
    page.filter = RecordFilter::new(args.search, status);
    let screen = tickets_screen(&page);
    desk.emit(&screen, print_screen)
}

pub fn capabilities(desk: &Desk, args: CapabilitiesArgs) -> Result<()> {
    let role = args.role.or_else(|| desk.session.role());
    let record = Capabilities::of(role);
    desk.emit(record, |record| {
        println!("{}", Role::display_name_of(role));
        let menu: Vec<&str> = record.navigation.iter().map(|item| item.label).collect();
        let pages: Vec<&str> = record.pages.iter().map(Page::path).collect();
        println!("  menu:     {}", menu.join(", "));
        println!("  pages:    {}", pages.join(", "));
        println!("  actions:  {:?}", record.actions);
        println!("  machines: {:?}", record.machines);
        println!("  tasks:    {:?}", record.tasks);
        println!("  tickets:  {:?}", record.tickets);
    })
}

fn screen_for<'a>(desk: &'a Desk, ctx: PageContext<'a>, view: View) -> Screen<'a> {
    match view {
        View::Public(PublicPage::Login) => Screen::Login,
        View::Public(PublicPage::Register) => Screen::Register,
        View::Public(PublicPage::Unauthorized) => Screen::Message(unauthorized(&ctx)),
        View::NotFound => Screen::Message(not_found()),
        View::Page(Page::Dashboard) => Screen::Dashboard(dashboard(&ctx, local_hour())),
        View::Page(Page::Machines) => {
            let page = MachinesPage::new(ctx);
            Screen::Machines {
                rows: page.rows(),
                can_add_machine: page.can_add_machine(),
            }
        }
        View::Page(Page::Tasks) => {
            let page = TasksPage::new(ctx);
            Screen::Tasks {
                rows: page.rows(),
                can_create_task: page.can_create_task(),
            }
        }
        View::Page(Page::Tickets) => tickets_screen(&TicketsPage::new(ctx)),
        View::Page(Page::MachineInstallation) => {
            let page = InstallationPage::new(ctx, desk.config.forms.submit_latency);
            Screen::Installation {
                models: page.models(),
                installed_by: page.form().installed_by.clone(),
                editable: page.is_editable(),
            }
        }
        View::Page(Page::Users | Page::Companies | Page::Dealers) => {
            Screen::Message(not_found())
        }
    }
}

fn tickets_screen<'a>(page: &TicketsPage<'a>) -> Screen<'a> {
    let rows = page
        .rows()
        .into_iter()
        .map(|ticket| TicketRow {
            ticket,
            machine_model: page.machine_for(ticket).map(|machine| machine.model.as_str()),
            action: page.row_action(ticket),
        })
        .collect();
    Screen::Tickets {
        rows,
        can_create_ticket: page.can_create_ticket(),
    }
}

/// Parse a kebab-case status, listing the accepted values on failure.
fn parse_status<S>(raw: Option<&str>) -> Result<Option<S>>
where
    S: FromStr + IntoEnumIterator + Display,
{
    let Some(raw) = raw.filter(|value| !value.is_empty() && *value != "all") else {
        return Ok(None);
    };
    raw.parse::<S>().map(Some).map_err(|_| {
        let accepted: Vec<String> = S::iter().map(|status| status.to_string()).collect();
        anyhow!("unknown status '{raw}'; expected one of: all, {}", accepted.join(", "))
    })
}

fn print_visit(visit: &Visit<'_>) {
    match &visit.outcome {
        NavigationOutcome::Rendered(_) => {}
        NavigationOutcome::Redirected { to, state } => {
            println!("Redirected to {to} ({state:?})");
        }
        NavigationOutcome::Superseded => println!("Navigation superseded"),
    }
    if let Some(screen) = &visit.screen {
        print_screen(screen);
    }
}

fn print_screen(screen: &Screen<'_>) {
    match screen {
        Screen::Dashboard(view) => {
            println!("{}", view.heading);
            println!("{}", view.overview.title);
            for stat in &view.overview.stats {
                println!("  {:<24} {}", stat.title, stat.value);
            }
            print_series("Tasks", &view.tasks);
            print_series("Tickets", &view.tickets);
            print_series("Machines", &view.machines);
        }
        Screen::Machines {
            rows,
            can_add_machine,
        } => {
            if *can_add_machine {
                println!("[New Installation]");
            }
            for machine in rows {
                println!(
                    "{:<4} {:<22} {:<20} {:<14} {}",
                    machine.id,
                    machine.model,
                    machine.serial_number,
                    machine.status.label(),
                    machine.location.as_deref().unwrap_or("-")
                );
            }
            println!("{} machine(s)", rows.len());
        }
        Screen::Tasks {
            rows,
            can_create_task,
        } => {
            if *can_create_task {
                println!("[Create Task]");
            }
            for task in rows {
                println!(
                    "{:<4} {:<32} {:<8} {:<12} due {}",
                    task.id,
                    task.title,
                    task.priority,
                    task.status.label(),
                    task.deadline
                );
            }
            println!("{} task(s)", rows.len());
        }
        Screen::Tickets {
            rows,
            can_create_ticket,
        } => {
            if *can_create_ticket {
                println!("[Create Ticket]");
            }
            for row in rows {
                let action = row.action.map(|action| action.label()).unwrap_or("");
                println!(
                    "{:<4} {:<22} {:<8} {:<12} {:<40} {}",
                    row.ticket.id,
                    row.machine_model.unwrap_or("Unknown"),
                    row.ticket.urgency,
                    row.ticket.status.label(),
                    row.ticket.issue_description,
                    action
                );
            }
            println!("{} ticket(s)", rows.len());
        }
        Screen::Installation {
            models,
            installed_by,
            editable,
        } => {
            println!("Machine Installation");
            println!("  installed by: {installed_by}");
            println!("  models:       {}", models.join(", "));
            if !editable {
                println!("  (read-only)");
            }
        }
        Screen::Message(page) => {
            println!("{}", page.heading);
            println!("{}", page.message);
            if let Some(user) = &page.signed_in_as {
                println!("Signed in as {user}");
            }
            println!("{} -> {}", page.link_label, page.link_path);
        }
        Screen::Login => println!("Sign in with `fleetdeskctl login`"),
        Screen::Register => println!("Create an account with `fleetdeskctl register`"),
    }
}

fn print_series(title: &str, series: &Series) {
    let parts: Vec<String> = series
        .iter()
        .map(|(label, count)| format!("{label}: {count}"))
        .collect();
    println!("{title}: {}", parts.join(", "));
}
