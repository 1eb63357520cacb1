//! Status listing commands

use std::collections::BTreeSet;

use addon_core::{AddonManager, CatalogClient, short_revision};
use colored::Colorize;

use crate::error::Result;

/// Run the list command
///
/// Shows installed add-ons and, unless `installed_only`, the official add-ons
/// not yet installed. A catalog failure is reported as a warning.
pub fn run_list(manager: &AddonManager, installed_only: bool) -> Result<()> {
    let state = manager.installed()?;

    println!("{} Currently installed add-ons:", "=>".blue().bold());
    if state.is_empty() {
        println!("   None.");
    }
    for (identity, record) in state.iter() {
        let remote = if record.remote.is_some() {
            ", with remote content"
        } else {
            ""
        };
        println!(
            "   {} ({}{})",
            identity.cyan(),
            short_revision(&record.revision).yellow(),
            remote
        );
    }

    if installed_only {
        return Ok(());
    }

    let catalog = CatalogClient::default();
    println!();
    println!(
        "{} Official add-ons available from {}:",
        "=>".blue().bold(),
        catalog.org_url().cyan()
    );
    match catalog.official_addons() {
        Ok(official) => {
            let installed: BTreeSet<&str> = state.identities().collect();
            let missing: BTreeSet<&str> = official
                .iter()
                .map(String::as_str)
                .filter(|name| !installed.contains(name))
                .collect();
            if missing.is_empty() {
                println!("   None!");
            }
            for name in missing {
                println!("   {name}");
            }
        }
        Err(e) => {
            eprintln!(
                "{} Could not query the official catalog: {}",
                "warning:".yellow().bold(),
                e
            );
        }
    }

    Ok(())
}

/// Run the outdated command
pub fn run_outdated(manager: &AddonManager) -> Result<()> {
    print_identities("Add-ons behind their remote", &manager.outdated()?);
    Ok(())
}

/// Run the dirty command
pub fn run_dirty(manager: &AddonManager) -> Result<()> {
    print_identities("Add-ons with local changes", &manager.dirty()?);
    Ok(())
}

fn print_identities(heading: &str, identities: &[String]) {
    println!("{} {}:", "=>".blue().bold(), heading);
    if identities.is_empty() {
        println!("   None.");
    }
    for identity in identities {
        println!("   {}", identity.cyan());
    }
}
