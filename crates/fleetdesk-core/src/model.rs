//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Machine, task, and ticket records as the data-access collaborator hands
//! them out. Statuses use the same lowercase, hyphenated names on the wire
//! and in filters.

use chrono::NaiveDate;
use fleetdesk_security::UserId;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

use crate::error::{DeskError, DeskResult};

/// Installation state of a machine.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum MachineStatus {
    Pending,
    Installed,
    Servicing,
    Decommissioned,
}

impl MachineStatus {
    pub fn label(&self) -> &'static str {
        match self {
            MachineStatus::Pending => "Pending",
            MachineStatus::Installed => "Installed",
            MachineStatus::Servicing => "Servicing",
            MachineStatus::Decommissioned => "Decommissioned",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Machine {
    pub id: String,
    pub model: String,
    pub serial_number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installation_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub installed_by_id: Option<UserId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub status: MachineStatus,
}

impl Machine {
    /// A pending machine carries no installation details.
    pub fn is_consistent(&self) -> bool {
        self.status != MachineStatus::Pending
            || (self.installation_date.is_none()
                && self.installed_by_id.is_none()
                && self.location.is_none())
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
    Urgent,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl TaskStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TaskStatus::Pending => "Pending",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Completed => "Completed",
            TaskStatus::Cancelled => "Cancelled",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: String,
    pub created_at: NaiveDate,
    pub deadline: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigner_id: UserId,
    pub assignee_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub machine_id: Option<String>,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Resolved,
    Closed,
}

impl TicketStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TicketStatus::Open => "Open",
            TicketStatus::InProgress => "In Progress",
            TicketStatus::Resolved => "Resolved",
            TicketStatus::Closed => "Closed",
        }
    }

    /// The row action offered for a ticket in this status, if any.
    pub fn next_action(&self) -> Option<TicketAction> {
        match self {
            TicketStatus::Open | TicketStatus::InProgress => Some(TicketAction::Resolve),
            TicketStatus::Resolved => Some(TicketAction::Close),
            TicketStatus::Closed => None,
        }
    }

    /// Apply `action`, moving strictly forward through
    /// open → in-progress → resolved → closed.
    pub fn apply(self, action: TicketAction) -> DeskResult<TicketStatus> {
        match (self, action) {
            (TicketStatus::Open, TicketAction::Start) => Ok(TicketStatus::InProgress),
            (TicketStatus::Open | TicketStatus::InProgress, TicketAction::Resolve) => {
                Ok(TicketStatus::Resolved)
            }
            (TicketStatus::Resolved, TicketAction::Close) => Ok(TicketStatus::Closed),
            (from, action) => Err(DeskError::InvalidTransition { from, action }),
        }
    }
}

/// Status changes a ticket handler may request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TicketAction {
    Start,
    Resolve,
    Close,
}

impl TicketAction {
    /// Button caption.
    pub fn label(&self) -> &'static str {
        match self {
            TicketAction::Start => "Start",
            TicketAction::Resolve => "Resolve",
            TicketAction::Close => "Close",
        }
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TicketUrgency {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub id: String,
    pub machine_id: String,
    pub issue_description: String,
    pub date_reported: NaiveDate,
    pub reported_by_id: UserId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<UserId>,
    pub status: TicketStatus,
    pub urgency: TicketUrgency,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution_notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn statuses_use_hyphenated_names() {
        assert_eq!(TaskStatus::InProgress.to_string(), "in-progress");
        assert_eq!(TicketStatus::from_str("in-progress").unwrap(), TicketStatus::InProgress);
        assert_eq!(
            serde_json::to_string(&MachineStatus::Decommissioned).unwrap(),
            "\"decommissioned\""
        );
        assert!(TaskStatus::from_str("done").is_err());
    }

    #[test]
    fn tickets_only_move_forward() {
        assert_eq!(
            TicketStatus::Open.apply(TicketAction::Start),
            Ok(TicketStatus::InProgress)
        );
        assert_eq!(
            TicketStatus::InProgress.apply(TicketAction::Resolve),
            Ok(TicketStatus::Resolved)
        );
        assert_eq!(
            TicketStatus::Resolved.apply(TicketAction::Close),
            Ok(TicketStatus::Closed)
        );
        assert!(TicketStatus::Open.apply(TicketAction::Close).is_err());
        assert!(TicketStatus::Resolved.apply(TicketAction::Resolve).is_err());
        assert!(TicketStatus::Closed.apply(TicketAction::Resolve).is_err());
    }

    #[test]
    fn row_action_follows_status() {
        assert_eq!(TicketStatus::Open.next_action(), Some(TicketAction::Resolve));
        assert_eq!(TicketStatus::InProgress.next_action(), Some(TicketAction::Resolve));
        assert_eq!(TicketStatus::Resolved.next_action(), Some(TicketAction::Close));
        assert_eq!(TicketStatus::Closed.next_action(), None);
    }

    #[test]
    fn ticket_json_matches_camel_case_shape() {
        let ticket: Ticket = serde_json::from_str(
            r#"{
                "id": "3",
                "machineId": "4",
                "issueDescription": "Overheating during extended operation",
                "dateReported": "2023-04-12",
                "reportedById": "4",
                "assignedToId": "3",
                "status": "open",
                "urgency": "critical"
            }"#,
        )
        .unwrap();
        assert_eq!(ticket.urgency, TicketUrgency::Critical);
        assert_eq!(ticket.date_reported, NaiveDate::from_ymd_opt(2023, 4, 12).unwrap());
        assert_eq!(ticket.resolution_notes, None);
    }

    #[test]
    fn pending_machine_with_location_is_inconsistent() {
        let machine = Machine {
            id: "9".into(),
            model: "CLX-6000 Pro".into(),
            serial_number: "X".into(),
            installation_date: None,
            installed_by_id: None,
            location: Some("Somewhere".into()),
            notes: None,
            status: MachineStatus::Pending,
        };
        assert!(!machine.is_consistent());
    }
}
