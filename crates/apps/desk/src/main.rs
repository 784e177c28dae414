//! Desk - terminal front-end for the campus portal
//!
//! Drives the support-ticket inbox and the chat page from a prompt, either
//! against a running portal or fully offline.

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;

use portal::{Folder, PortalSettings};

mod backend;
mod repl;
mod surface;

use backend::{Backend, demo_tickets, load_tickets};
use repl::Repl;
use surface::TerminalSurface;

/// Terminal client for the campus portal's support tickets and chat
#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Portal base URL (overrides the settings file)
    #[arg(long, env = "PORTAL_BASE_URL")]
    base_url: Option<String>,

    /// Settings file to use instead of the default location
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON array of tickets to list
    #[arg(long, value_name = "PATH")]
    tickets: Option<PathBuf>,

    /// Use an in-memory portal instead of the network
    #[arg(long)]
    offline: bool,

    /// Answer yes to every confirmation
    #[arg(short, long)]
    yes: bool,

    /// Folder to open first
    #[arg(long, default_value = "inbox")]
    view: Folder,
}

fn main() {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    // Bootstrap config directory
    if let Err(e) = config::init() {
        error!("Failed to initialize config directory: {}", e);
    }

    if let Err(e) = run(Cli::parse()) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut settings = match &cli.config {
        Some(path) => PortalSettings::from_file(path)?,
        None => PortalSettings::load().context("Failed to load portal settings")?,
    };
    if let Some(base_url) = cli.base_url {
        settings = settings.with_base_url(base_url);
    }

    let tickets = match &cli.tickets {
        Some(path) => load_tickets(path)?,
        None if cli.offline => demo_tickets(),
        None => Vec::new(),
    };

    let backend = if cli.offline {
        Backend::offline(tickets)
    } else {
        Backend::online(&settings, tickets)?
    };
    info!("Desk started against {}", settings.base_url);

    let surface = Arc::new(TerminalSurface::new(settings.base_url.clone(), cli.yes));
    Repl::new(backend, surface, cli.view).run()
}
