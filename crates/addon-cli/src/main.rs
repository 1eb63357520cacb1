//! Add-on manager CLI
//!
//! The command-line interface for installing, updating and removing add-ons.

mod cli;
mod commands;
mod error;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use addon_core::{AddonManager, ManagerConfig};
use cli::{Cli, Commands};
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        tracing::subscriber::set_global_default(subscriber)
            .expect("Failed to set tracing subscriber");
        tracing::debug!("Verbose mode enabled");
    }

    let Some(command) = cli.command else {
        println!("{} Add-on manager", "addons".green().bold());
        println!();
        println!("Run {} for available commands.", "addons --help".cyan());
        return Ok(());
    };

    let config = ManagerConfig::relative_to_executable(
        cli.install_root.as_deref(),
        cli.state_path.as_deref(),
    )?;
    tracing::debug!(
        install_root = %config.install_root.display(),
        state_path = %config.state_path.display(),
        "Resolved configuration"
    );
    let manager = AddonManager::new(config);

    execute_command(&manager, command)
}

fn execute_command(manager: &AddonManager, cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Install { names } => commands::run_install(manager, &names),
        Commands::Remove {
            names,
            keep_dependents,
            yes,
        } => commands::run_remove(manager, names.as_deref(), !keep_dependents, yes),
        Commands::List { installed_only } => commands::run_list(manager, installed_only),
        Commands::Outdated => commands::run_outdated(manager),
        Commands::Dirty => commands::run_dirty(manager),
        Commands::InstallExternal { dry_run } => commands::run_install_external(manager, dry_run),
        Commands::Find {
            category,
            fields,
            extension,
        } => commands::run_find(manager, &category, &fields, extension.as_deref()),
        Commands::Path { name } => commands::run_path(manager, name.as_deref()),
    }
}
