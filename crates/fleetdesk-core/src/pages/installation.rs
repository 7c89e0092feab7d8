//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
//! Machine installation form.
//!
//! Admins reach this page through "New Installation" but see it read-only;
//! only employees may fill it in and submit it.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use chrono::NaiveDate;
use fleetdesk_common::time::today;
use fleetdesk_logging::{desk_info, LogContext};
use fleetdesk_security::{Action, Page};
use uuid::Uuid;

use super::{Notice, PageContext, SubmittingGuard};
use crate::data::MACHINE_MODELS;
use crate::error::{DeskError, DeskResult};
use crate::model::{Machine, MachineStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallationForm {
    pub model: String,
    pub serial_number: String,
    pub installation_date: NaiveDate,
    /// Display name of the installer; prefilled with the signed-in user.
    pub installed_by: String,
    pub location: String,
    pub notes: String,
}

pub struct InstallationPage<'a> {
    ctx: PageContext<'a>,
    form: InstallationForm,
    submitting: AtomicBool,
    latency: Duration,
}

impl<'a> InstallationPage<'a> {
    pub fn new(ctx: PageContext<'a>, latency: Duration) -> Self {
        let installed_by = ctx.viewer().map(|user| user.name).unwrap_or_default();
        Self {
            ctx,
            form: InstallationForm {
                model: String::new(),
                serial_number: String::new(),
                installation_date: today(),
                installed_by,
                location: String::new(),
                notes: String::new(),
            },
            submitting: AtomicBool::new(false),
            latency,
        }
    }

    pub fn models(&self) -> &'static [&'static str] {
        &MACHINE_MODELS
    }

    pub fn form(&self) -> &InstallationForm {
        &self.form
    }

    /// Mutable form access; `None` when the fields are read-only.
    pub fn form_mut(&mut self) -> Option<&mut InstallationForm> {
        if self.is_editable() {
            Some(&mut self.form)
        } else {
            None
        }
    }

    /// Field-level permission.
    pub fn can_fill_form(&self) -> bool {
        self.ctx.capabilities().can_install_machines()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn is_editable(&self) -> bool {
        self.can_fill_form() && !self.is_submitting()
    }

    /// Record the installation and return to the machine list.
    pub async fn submit(&self) -> DeskResult<Machine> {
        let viewer = self.ctx.viewer();
        if !self.can_fill_form() {
            return Err(DeskError::ActionDenied {
                action: Action::InstallMachines,
                role: viewer.and_then(|user| user.role),
            });
        }
        DeskError::require(&[
            ("model", !self.form.model.is_empty()),
            ("serial number", !self.form.serial_number.is_empty()),
            ("location", !self.form.location.is_empty()),
        ])?;

        let _submitting = SubmittingGuard::acquire(&self.submitting)?;
        tokio::time::sleep(self.latency).await;

        let installer = viewer.map(|user| user.id);
        let machine = Machine {
            id: Uuid::new_v4().to_string(),
            model: self.form.model.clone(),
            serial_number: self.form.serial_number.clone(),
            installation_date: Some(self.form.installation_date),
            installed_by_id: installer.clone(),
            location: Some(self.form.location.clone()),
            notes: (!self.form.notes.is_empty()).then(|| self.form.notes.clone()),
            status: MachineStatus::Installed,
        };
        let ctx = LogContext::new()
            .with_user(installer.as_deref().unwrap_or(""))
            .with_route(Page::MachineInstallation.path())
            .with_action("machine.install");
        desk_info!(context = ctx, "recorded installation of {}", machine.serial_number);
        self.ctx.navigator.push(Page::Machines.path());
        Ok(machine)
    }

    pub fn notice(result: &DeskResult<Machine>) -> Notice {
        match result {
            Ok(_) => Notice::success("Machine installation recorded successfully"),
            Err(DeskError::Validation { .. }) => Notice::error("Please fill all required fields"),
            Err(err) => Notice::from(err),
        }
    }
}
