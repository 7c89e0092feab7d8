//! ---
//! fd_section: "05-external-interfaces"
//! fd_subsection: "binary"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Control CLI for driving a FleetDesk session from a terminal."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use anyhow::{bail, Result};
use clap::Args;
use fleetdesk_core::pages::layout;
use fleetdesk_core::pages::login::{LoginForm, RegisterForm};
use fleetdesk_core::Notice;
use fleetdesk_security::{Identity, Role};

use crate::desk::Desk;

#[derive(Debug, Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Use the demo account of this role (e.g. DEALER_ADMIN).
    #[arg(long, value_name = "ROLE", conflicts_with_all = ["email", "password"])]
    pub demo: Option<Role>,
}

#[derive(Debug, Args)]
pub struct RegisterArgs {
    #[arg(long, default_value = "")]
    pub name: String,
    #[arg(long, default_value = "")]
    pub email: String,
    #[arg(long, default_value = "")]
    pub password: String,
    #[arg(long, value_name = "ROLE")]
    pub role: Option<Role>,
}

pub fn login(desk: &Desk, args: LoginArgs) -> Result<()> {
    let form = match args.demo {
        Some(role) => LoginForm::prefilled(role),
        None => LoginForm {
            email: args.email.unwrap_or_default(),
            password: args.password.unwrap_or_default(),
        },
    };
    let ctx = desk.context();
    let notice = desk.block_on(form.submit(&ctx));
    report(desk, &notice)
}

pub fn logout(desk: &Desk) -> Result<()> {
    layout::logout(&desk.context());
    report(desk, &Notice::success("You have been signed out"))
}

pub fn whoami(desk: &Desk) -> Result<()> {
    let identity = desk.session.current_user();
    desk.emit(&identity, |identity| match identity {
        Some(user) => print_identity(user),
        None => println!("Not signed in"),
    })
}

pub fn register(desk: &Desk, args: RegisterArgs) -> Result<()> {
    let form = RegisterForm {
        name: args.name,
        email: args.email,
        password: args.password,
        role: args.role,
    };
    let ctx = desk.context();
    let notice = desk.block_on(form.submit(&ctx));
    report(desk, &notice)
}

fn print_identity(user: &Identity) {
    println!("{} <{}>", user.name, user.email);
    println!("  id:      {}", user.id);
    println!("  role:    {}", Role::display_name_of(user.role));
    if let Some(company) = &user.company_id {
        println!("  company: {company}");
    }
    if let Some(dealer) = &user.dealer_id {
        println!("  dealer:  {dealer}");
    }
}

/// Print a notice; destructive notices fail the command.
fn report(desk: &Desk, notice: &Notice) -> Result<()> {
    desk.emit(notice, |notice| {
        println!("{}: {}", notice.title, notice.description)
    })?;
    if notice.is_error() {
        bail!("{}", notice.description);
    }
    Ok(())
}
