//! ---
//! fd_section: "05-external-interfaces"
//! fd_subsection: "binary"
//! fd_type: "source"
//! fd_scope: "code"
//! fd_description: "Control CLI for driving a FleetDesk session from a terminal."
//! fd_version: "v0.0.0-prealpha"
//! fd_owner: "tbd"
//! ---
use std::path::PathBuf;

use anyhow::Result;
use clap::{ArgAction, Args, Parser, Subcommand};
use fleetdesk_logging as logging;

mod browse;
mod desk;
mod session;

#[derive(Debug, Parser)]
#[command(author, version, about = "FleetDesk dashboard control utility", long_about = None)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command.
#[derive(Debug, Args)]
pub struct GlobalOptions {
    /// Path to the configuration file.
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Print machine-readable JSON instead of text.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub json: bool,
    /// Use the configured log format and also write a rolling log file.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub log_to_file: bool,
    /// Print the security counters to stderr after the command.
    #[arg(long, global = true, action = ArgAction::SetTrue)]
    pub metrics: bool,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Sign in and persist the identity for later commands.
    Login(session::LoginArgs),
    /// Sign out and clear the persisted identity.
    Logout,
    /// Show the signed-in identity.
    Whoami,
    /// Submit the registration form.
    Register(session::RegisterArgs),
    /// Show the sidebar menu for the signed-in identity.
    Menu,
    /// Navigate to a path and render whatever the guard allows.
    Open(browse::OpenArgs),
    /// List visible machines.
    Machines(browse::ListArgs),
    /// List visible tasks.
    Tasks(browse::ListArgs),
    /// List visible tickets.
    Tickets(browse::ListArgs),
    /// Print the capability record of a role.
    Capabilities(browse::CapabilitiesArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let desk = desk::Desk::open(&cli.global)?;
    if cli.global.log_to_file {
        fleetdesk_common::logging::init_tracing("fleetdeskctl", &desk.config.logging)?;
    } else {
        logging::init();
    }
    desk.restore();

    match cli.command {
        Commands::Login(args) => session::login(&desk, args)?,
        Commands::Logout => session::logout(&desk)?,
        Commands::Whoami => session::whoami(&desk)?,
        Commands::Register(args) => session::register(&desk, args)?,
        Commands::Menu => browse::menu(&desk)?,
        Commands::Open(args) => browse::open(&desk, args)?,
        Commands::Machines(args) => browse::machines(&desk, args)?,
        Commands::Tasks(args) => browse::tasks(&desk, args)?,
        Commands::Tickets(args) => browse::tickets(&desk, args)?,
        Commands::Capabilities(args) => browse::capabilities(&desk, args)?,
    }
    if cli.global.metrics {
        eprint!("{}", desk.metrics.render()?);
    }
    Ok(())
}
