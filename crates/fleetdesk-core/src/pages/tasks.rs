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
use fleetdesk_common::time::today;
use fleetdesk_logging::{desk_info, LogContext};
use fleetdesk_security::{Action, Identity, Page, UserId};
use uuid::Uuid;

use super::{Notice, PageContext};
use crate::error::{DeskError, DeskResult};
use crate::model::{Task, TaskPriority, TaskStatus};
use crate::visibility::{filter_tasks, RecordFilter};

/// "Create Task" dialog contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    pub deadline: NaiveDate,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    pub assigner_id: Option<UserId>,
    pub assignee_id: Option<UserId>,
    pub machine_id: Option<String>,
}

pub struct TasksPage<'a> {
    ctx: PageContext<'a>,
    pub filter: RecordFilter<TaskStatus>,
}

impl<'a> TasksPage<'a> {
    pub fn new(ctx: PageContext<'a>) -> Self {
        Self {
            ctx,
            filter: RecordFilter::default(),
        }
    }

    pub fn rows(&self) -> Vec<&'a Task> {
        filter_tasks(self.ctx.data.tasks(), self.ctx.viewer().as_ref(), &self.filter)
    }

    /// Whether the "Create Task" button is enabled.
    pub fn can_create_task(&self) -> bool {
        self.ctx.capabilities().can_assign_tasks()
    }

    /// Users offered in the assignee picker.
    pub fn assignees(&self) -> Vec<&'a Identity> {
        self.ctx.data.directory().assignable_employees()
    }

    /// Empty dialog with the defaults filled in.
    pub fn blank_form(&self) -> TaskForm {
        TaskForm {
            title: String::new(),
            description: String::new(),
            deadline: today(),
            priority: TaskPriority::Medium,
            status: TaskStatus::Pending,
            assigner_id: self.ctx.viewer().map(|user| user.id),
            assignee_id: None,
            machine_id: None,
        }
    }

    /// Validate the dialog and build the task it describes.
    pub fn create(&self, form: &TaskForm) -> DeskResult<Task> {
        let viewer = self.ctx.viewer();
        if !self.can_create_task() {
            return Err(DeskError::ActionDenied {
                action: Action::AssignTasks,
                role: viewer.and_then(|user| user.role),
            });
        }
        let assignee = form.assignee_id.as_deref().unwrap_or("");
        DeskError::require(&[
            ("title", !form.title.is_empty()),
            ("description", !form.description.is_empty()),
            ("assignee", !assignee.is_empty()),
        ])?;

        let assigner = viewer.map(|user| user.id).unwrap_or_default();
        let task = Task {
            id: Uuid::new_v4().to_string(),
            title: form.title.clone(),
            description: form.description.clone(),
            created_at: today(),
            deadline: form.deadline,
            priority: form.priority,
            status: form.status,
            assigner_id: assigner.clone(),
            assignee_id: assignee.to_owned(),
            machine_id: form.machine_id.clone(),
        };
        let ctx = LogContext::new()
            .with_user(&assigner)
            .with_route(Page::Tasks.path())
            .with_action("task.create");
        desk_info!(context = ctx, "task '{}' assigned to {}", task.title, task.assignee_id);
        Ok(task)
    }

    pub fn notice(result: &DeskResult<Task>) -> Notice {
        match result {
            Ok(_) => Notice::success("Task has been created successfully"),
            Err(err) => Notice::from(err),
        }
    }
}
