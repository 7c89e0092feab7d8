//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Service tickets. Dealers open them; company staff resolve and close them.

use chrono::NaiveDate;
use fleetdesk_common::time::today;
use fleetdesk_logging::{desk_info, desk_warn, LogContext};
use fleetdesk_security::{Action, Page, UserId};
use uuid::Uuid;

use super::{Notice, PageContext};
use crate::error::{DeskError, DeskResult};
use crate::model::{Machine, Ticket, TicketAction, TicketStatus, TicketUrgency};
use crate::visibility::{filter_tickets, RecordFilter};

/// "Create Ticket" dialog contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketForm {
    pub machine_id: Option<String>,
    pub issue_description: String,
    pub date_reported: NaiveDate,
    pub reported_by_id: Option<UserId>,
    pub status: TicketStatus,
    pub urgency: Option<TicketUrgency>,
}

pub struct TicketsPage<'a> {
    ctx: PageContext<'a>,
    pub filter: RecordFilter<TicketStatus>,
}

impl<'a> TicketsPage<'a> {
    pub fn new(ctx: PageContext<'a>) -> Self {
        Self {
            ctx,
            filter: RecordFilter::default(),
        }
    }

    pub fn rows(&self) -> Vec<&'a Ticket> {
        filter_tickets(
            self.ctx.data.tickets(),
            self.ctx.viewer().as_ref(),
            &self.filter,
        )
    }

    /// Machine shown next to a ticket.
    pub fn machine_for(&self, ticket: &Ticket) -> Option<&'a Machine> {
        self.ctx.data.machine(&ticket.machine_id)
    }

    /// Machines offered in the dialog's picker.
    pub fn machine_options(&self) -> &'a [Machine] {
        self.ctx.data.machines()
    }

    /// Whether the "Create Ticket" button is enabled.
    pub fn can_create_ticket(&self) -> bool {
        self.ctx.capabilities().can_create_tickets()
    }

    pub fn can_close_tickets(&self) -> bool {
        self.ctx.capabilities().can_close_tickets()
    }

    /// Row button for `ticket`: Close once resolved, Resolve before that,
    /// nothing for closed tickets or viewers who may not close tickets.
    pub fn row_action(&self, ticket: &Ticket) -> Option<TicketAction> {
        if !self.can_close_tickets() {
            return None;
        }
        ticket.status.next_action()
    }

    /// Apply a row button, returning the updated ticket.
    pub fn apply(&self, ticket: &Ticket, action: TicketAction) -> DeskResult<Ticket> {
        let viewer = self.ctx.viewer();
        let user = viewer.as_ref().map(|u| u.id.as_str()).unwrap_or("");
        let ctx = LogContext::new()
            .with_user(user)
            .with_route(Page::Tickets.path())
            .with_action("ticket.transition");
        if !self.can_close_tickets() {
            desk_warn!(context = ctx, "{action} on ticket {} refused", ticket.id);
            return Err(DeskError::ActionDenied {
                action: Action::CloseTickets,
                role: viewer.and_then(|u| u.role),
            });
        }
        let status = ticket.status.apply(action)?;
        desk_info!(
            context = ctx,
            "ticket {} moved from {} to {}",
            ticket.id,
            ticket.status,
            status
        );
        Ok(Ticket {
            status,
            ..ticket.clone()
        })
    }

    /// Empty dialog with the defaults filled in.
    pub fn blank_form(&self) -> TicketForm {
        TicketForm {
            machine_id: None,
            issue_description: String::new(),
            date_reported: today(),
            reported_by_id: self.ctx.viewer().map(|user| user.id),
            status: TicketStatus::Open,
            urgency: Some(TicketUrgency::Medium),
        }
    }

    /// Validate the dialog and build the ticket it describes.
    pub fn create(&self, form: &TicketForm) -> DeskResult<Ticket> {
        let viewer = self.ctx.viewer();
        if !self.can_create_ticket() {
            return Err(DeskError::ActionDenied {
                action: Action::CreateTickets,
                role: viewer.and_then(|user| user.role),
            });
        }
        let machine_id = form.machine_id.as_deref().unwrap_or("");
        DeskError::require(&[
            ("machine", !machine_id.is_empty()),
            ("issue description", !form.issue_description.is_empty()),
            ("urgency", form.urgency.is_some()),
        ])?;
        let (Some(urgency), Some(reporter)) = (form.urgency, viewer.map(|user| user.id)) else {
            return Err(DeskError::Validation {
                missing: vec!["reporter"],
            });
        };

        let ticket = Ticket {
            id: Uuid::new_v4().to_string(),
            machine_id: machine_id.to_owned(),
            issue_description: form.issue_description.clone(),
            date_reported: form.date_reported,
            reported_by_id: reporter,
            assigned_to_id: None,
            status: form.status,
            urgency,
            resolution_notes: None,
        };
        let ctx = LogContext::new()
            .with_user(&ticket.reported_by_id)
            .with_route(Page::Tickets.path())
            .with_action("ticket.create");
        desk_info!(context = ctx, "ticket opened for machine {}", ticket.machine_id);
        Ok(ticket)
    }

    pub fn notice(result: &DeskResult<Ticket>) -> Notice {
        match result {
            Ok(_) => Notice::success("Ticket has been created successfully"),
            Err(err) => Notice::from(err),
        }
    }
}
