//! External package install command

use addon_core::AddonManager;
use colored::Colorize;

use crate::error::Result;

/// Run the install-external command
pub fn run_install_external(manager: &AddonManager, dry_run: bool) -> Result<()> {
    if dry_run {
        match manager.install_external(true)? {
            Some(command) => println!("{command}"),
            None => println!("{} No external packages declared.", "=>".blue().bold()),
        }
        return Ok(());
    }

    let packages = manager.external_packages()?;
    if packages.is_empty() {
        println!("{} No external packages declared.", "=>".blue().bold());
        return Ok(());
    }

    println!(
        "{} Installing {} external package(s)...",
        "=>".blue().bold(),
        packages.len()
    );
    if let Some(command) = manager.install_external(false)? {
        println!("{} {}", "OK".green().bold(), command.dimmed());
    }
    Ok(())
}
