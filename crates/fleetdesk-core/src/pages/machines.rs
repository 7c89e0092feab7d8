//! ---
//! fd_section: "01-core-functionality"
//! fd_subsection: "module"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Dashboard routes, guard, visibility, and page controllers."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use fleetdesk_security::{Action, Page};

use super::PageContext;
use crate::error::{DeskError, DeskResult};
use crate::model::{Machine, MachineStatus};
use crate::visibility::{filter_machines, RecordFilter};

/// Statuses offered by the machine list's filter.
pub const STATUS_FILTERS: [MachineStatus; 4] = [
    MachineStatus::Installed,
    MachineStatus::Pending,
    MachineStatus::Servicing,
    MachineStatus::Decommissioned,
];

pub struct MachinesPage<'a> {
    ctx: PageContext<'a>,
    pub filter: RecordFilter<MachineStatus>,
}

impl<'a> MachinesPage<'a> {
    pub fn new(ctx: PageContext<'a>) -> Self {
        Self {
            ctx,
            filter: RecordFilter::default(),
        }
    }

    pub fn rows(&self) -> Vec<&'a Machine> {
        filter_machines(
            self.ctx.data.machines(),
            self.ctx.viewer().as_ref(),
            &self.filter,
        )
    }

    /// Whether the "New Installation" button is enabled.
    pub fn can_add_machine(&self) -> bool {
        self.ctx.capabilities().can_add_machines()
    }

    /// Follow the "New Installation" button.
    pub fn new_installation(&self) -> DeskResult<()> {
        if !self.can_add_machine() {
            return Err(DeskError::ActionDenied {
                action: Action::AddMachines,
                role: self.ctx.viewer().and_then(|user| user.role),
            });
        }
        self.ctx.navigator.push(Page::MachineInstallation.path());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guard::Navigator;
    use crate::pages::tests::signed_in;

    #[tokio::test(start_paused = true)]
    async fn admins_may_start_an_installation() {
        let harness = signed_in("admin@company.com").await;
        let page = MachinesPage::new(harness.context());
        assert!(page.can_add_machine());
        page.new_installation().unwrap();
        assert_eq!(
            harness.history.current().as_deref(),
            Some("/machine-installation")
        );
    }

    #[tokio::test(start_paused = true)]
    async fn employees_see_every_machine_but_cannot_add() {
        let harness = signed_in("employee@dealer.com").await;
        let mut page = MachinesPage::new(harness.context());
        assert_eq!(page.rows().len(), 4);
        assert!(!page.can_add_machine());
        assert!(matches!(
            page.new_installation(),
            Err(DeskError::ActionDenied { .. })
        ));

        page.filter.status = Some(MachineStatus::Pending);
        let pending: Vec<&str> = page.rows().iter().map(|m| m.serial_number.as_str()).collect();
        assert_eq!(pending, ["CLX6000-24680-EF"]);
    }
}
