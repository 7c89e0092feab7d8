//! ---
//! fd_section: "15-testing-qa"
//! fd_subsection: "integration-tests"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Integration and validation tests for the FleetDesk stack."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::sync::Arc;
use std::time::Duration;

use fleetdesk_core::pages::dashboard::{dashboard, greeting};
use fleetdesk_core::pages::installation::InstallationPage;
use fleetdesk_core::pages::layout::{logout, sidebar};
use fleetdesk_core::pages::login::{LoginForm, RegisterForm};
use fleetdesk_core::pages::machines::MachinesPage;
use fleetdesk_core::pages::tasks::TasksPage;
use fleetdesk_core::pages::tickets::TicketsPage;
use fleetdesk_core::pages::unauthorized::unauthorized;
use fleetdesk_core::{
    DeskError, HistoryNavigator, InMemoryDataSource, MachineStatus, NavigationController,
    NavigationOutcome, Navigator, PageContext, TicketAction, TicketStatus, View,
};
use fleetdesk_persistence::MemoryStore;
use fleetdesk_security::{DirectoryAuthenticator, Page, Role, UserDirectory};
use fleetdesk_session::SessionStore;

const LATENCY: Duration = Duration::from_millis(1000);

/// One browser tab: a session, the demo records, a history stack and the
/// guard in front of them.
struct Tab {
    session: Arc<SessionStore>,
    data: InMemoryDataSource,
    history: Arc<HistoryNavigator>,
    controller: NavigationController,
}

impl Tab {
    fn open() -> Self {
        let auth = DirectoryAuthenticator::new(UserDirectory::demo(), LATENCY);
        let session = Arc::new(SessionStore::new(
            Arc::new(auth),
            Arc::new(MemoryStore::new()),
            "user",
        ));
        session.restore_from_persistence();
        let history = Arc::new(HistoryNavigator::new());
        let navigator: Arc<dyn Navigator> = history.clone();
        Self {
            controller: NavigationController::new(session.clone(), navigator),
            session,
            data: InMemoryDataSource::demo(),
            history,
        }
    }

    fn ctx(&self) -> PageContext<'_> {
        PageContext::new(&self.session, &self.data, self.history.as_ref())
    }

    async fn sign_in(&self, role: Role) {
        let notice = LoginForm::prefilled(role).submit(&self.ctx()).await;
        assert!(!notice.is_error(), "{notice:?}");
    }
}

#[tokio::test(start_paused = true)]
async fn login_lands_on_a_role_specific_dashboard() {
    let tab = Tab::open();
    let rejected = LoginForm {
        email: "ghost@company.com".into(),
        password: "password".into(),
    }
    .submit(&tab.ctx())
    .await;
    assert_eq!(rejected.title, "Login Failed");
    assert!(tab.history.current().is_none());

    tab.sign_in(Role::CompanyEmployee).await;
    assert_eq!(tab.history.current().as_deref(), Some("/dashboard"));
    assert_eq!(
        tab.controller.navigate("/dashboard").await,
        NavigationOutcome::Rendered(View::Page(Page::Dashboard))
    );

    let view = dashboard(&tab.ctx(), 9);
    assert_eq!(view.heading, "Good morning, Company Employee");
    assert_eq!(view.overview.title, "Your Overview");
    assert_eq!(view.overview.stats[0].title, "Assigned Tasks");
    let tasks: Vec<(&str, usize)> = view.tasks.iter().map(|(k, v)| (*k, *v)).collect();
    assert_eq!(
        tasks,
        [("Pending", 0), ("In Progress", 1), ("Completed", 2)]
    );
    assert_eq!(view.tickets.get("Closed"), Some(&0));
    assert_eq!(view.machines.get("Installed"), Some(&2));
    assert_eq!(greeting(20), "Good evening");
}

#[tokio::test(start_paused = true)]
async fn admin_starts_an_installation_an_employee_completes_one() {
    let tab = Tab::open();
    tab.sign_in(Role::CompanyAdmin).await;

    let machines = MachinesPage::new(tab.ctx());
    assert!(machines.can_add_machine());
    machines.new_installation().unwrap();
    assert_eq!(
        tab.controller
            .navigate(&tab.history.current().unwrap())
            .await,
        NavigationOutcome::Rendered(View::Page(Page::MachineInstallation))
    );
    let mut read_only = InstallationPage::new(tab.ctx(), LATENCY);
    assert!(!read_only.is_editable());
    assert!(read_only.form_mut().is_none());

    logout(&tab.ctx());
    tab.sign_in(Role::DealerEmployee).await;
    let machines = MachinesPage::new(tab.ctx());
    assert!(!machines.can_add_machine());
    assert!(matches!(
        machines.new_installation(),
        Err(DeskError::ActionDenied { .. })
    ));

    let mut page = InstallationPage::new(tab.ctx(), LATENCY);
    {
        let form = page.form_mut().unwrap();
        form.model = page_model(0);
        form.serial_number = "CLX5000-99999-ZZ".into();
        form.location = "12 Dock St, Portland, OR".into();
    }
    let machine = page.submit().await.unwrap();
    assert_eq!(machine.status, MachineStatus::Installed);
    assert_eq!(machine.installed_by_id.as_deref(), Some("5"));
    assert_eq!(tab.history.current().as_deref(), Some("/machines"));
    assert_eq!(
        InstallationPage::notice(&Ok(machine)).description,
        "Machine installation recorded successfully"
    );
}

fn page_model(index: usize) -> String {
    fleetdesk_core::MACHINE_MODELS[index].to_owned()
}

#[tokio::test(start_paused = true)]
async fn dealer_admin_is_turned_away_from_installation() {
    let tab = Tab::open();
    tab.sign_in(Role::DealerAdmin).await;
    let outcome = tab.controller.navigate("/machine-installation").await;
    assert!(matches!(outcome, NavigationOutcome::Redirected { to: "/unauthorized", .. }));

    let page = unauthorized(&tab.ctx());
    assert_eq!(page.heading, "Access Denied");
    assert_eq!(page.signed_in_as.as_deref(), Some("Dealer Admin (admin@dealer.com)"));

    let bar = sidebar(&tab.ctx(), "/machines").unwrap();
    assert!(bar.links.iter().all(|link| link.path != "/machine-installation"));
}

#[tokio::test(start_paused = true)]
async fn ticket_raised_by_a_dealer_is_closed_by_company_staff() {
    let tab = Tab::open();
    tab.sign_in(Role::DealerAdmin).await;
    let dealer_view = TicketsPage::new(tab.ctx());
    let mut form = dealer_view.blank_form();
    form.machine_id = Some("2".into());
    form.issue_description = "Display flickers".into();
    let raised = dealer_view.create(&form).unwrap();
    assert_eq!(raised.reported_by_id, "4");
    assert_eq!(dealer_view.row_action(&raised), None);
    let own: Vec<&str> = dealer_view.rows().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(own, ["3"]);

    logout(&tab.ctx());
    tab.sign_in(Role::CompanyEmployee).await;
    let staff_view = TicketsPage::new(tab.ctx());
    assert!(!staff_view.can_create_ticket());
    assert_eq!(staff_view.row_action(&raised), Some(TicketAction::Resolve));
    let resolved = staff_view.apply(&raised, TicketAction::Resolve).unwrap();
    assert_eq!(staff_view.row_action(&resolved), Some(TicketAction::Close));
    let closed = staff_view.apply(&resolved, TicketAction::Close).unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);
    assert!(matches!(
        staff_view.apply(&closed, TicketAction::Close),
        Err(DeskError::InvalidTransition { .. })
    ));
}

#[tokio::test(start_paused = true)]
async fn task_creation_respects_assignment_rights() {
    let tab = Tab::open();
    tab.sign_in(Role::DealerEmployee).await;
    let page = TasksPage::new(tab.ctx());
    assert!(!page.can_create_task());

    logout(&tab.ctx());
    tab.sign_in(Role::DealerAdmin).await;
    let page = TasksPage::new(tab.ctx());
    let visible: Vec<&str> = page.rows().iter().map(|t| t.id.as_str()).collect();
    assert_eq!(visible, ["3"]);

    let mut form = page.blank_form();
    form.title = "Train new operator".into();
    form.description = "Walk through daily checks".into();
    form.assignee_id = page.assignees().last().map(|user| user.id.clone());
    let created = page.create(&form).unwrap();
    assert_eq!(created.assigner_id, "4");
    assert_eq!(created.assignee_id, "5");
}

#[tokio::test(start_paused = true)]
async fn registration_returns_to_login_without_signing_in() {
    let tab = Tab::open();
    let incomplete = RegisterForm {
        name: "Pat".into(),
        ..RegisterForm::default()
    }
    .submit(&tab.ctx())
    .await;
    assert!(incomplete.is_error());
    assert!(tab.history.current().is_none());

    let notice = RegisterForm {
        name: "Pat".into(),
        email: "pat@dealer.com".into(),
        password: "secret".into(),
        role: Some(Role::DealerEmployee),
    }
    .submit(&tab.ctx())
    .await;
    assert!(!notice.is_error());
    assert_eq!(tab.history.current().as_deref(), Some("/login"));
    assert!(!tab.session.is_authenticated());
}
