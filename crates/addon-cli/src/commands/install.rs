//! Install command

use addon_core::{AddonInstall, AddonManager, AssetOutcome, InstallEvent, SyncOutcome, short_revision};
use colored::Colorize;

use crate::error::Result;

/// Run the install command for a comma separated list of add-ons
///
/// Steps are printed as they complete, so a failure part way through still
/// shows what was already done.
pub fn run_install(manager: &AddonManager, names: &str) -> Result<()> {
    println!(
        "{} Installing {} in {}",
        "=>".blue().bold(),
        names.cyan(),
        manager.config().install_root.display().to_string().yellow()
    );

    let report = manager.install_many_with(names, |event| match event {
        InstallEvent::Synced(step) => print_step(manager, step),
        InstallEvent::CycleSkipped(identity) => eprintln!(
            "{} Skipped '{}': it depends on itself through its own dependencies",
            "warning:".yellow().bold(),
            identity
        ),
        InstallEvent::Recorded(identity) => {
            tracing::debug!(identity = %identity, "Add-on recorded");
        }
    })?;

    println!(
        "{} Installed: {}",
        "OK".green().bold(),
        report.installed.join(", ").cyan()
    );
    Ok(())
}

fn print_step(manager: &AddonManager, step: &AddonInstall) {
    let relative = step
        .path
        .strip_prefix(&manager.config().install_root)
        .unwrap_or(&step.path)
        .display()
        .to_string();

    println!("{} {}", "=>".blue().bold(), step.id.to_string().cyan());
    let location = if step.created { "Created" } else { "Found" };
    println!("   {} install path ./{}", location.dimmed(), relative);

    match &step.sync {
        SyncOutcome::Cloned { revision } => {
            println!("   {} at {}", "Cloned".dimmed(), short_revision(revision).yellow())
        }
        SyncOutcome::Current { revision } => println!(
            "   {} latest already installed ({})",
            "No action:".dimmed(),
            short_revision(revision).yellow()
        ),
        SyncOutcome::Upgraded { from, to } => println!(
            "   {} from {} to {}",
            "Upgraded".dimmed(),
            short_revision(from).yellow(),
            short_revision(to).yellow()
        ),
    }

    match &step.asset {
        AssetOutcome::NotDeclared => {}
        AssetOutcome::Unchanged(asset) => println!(
            "   {} remote content already installed in '{}'",
            "No action:".dimmed(),
            asset.target
        ),
        AssetOutcome::Fetched(asset) => println!(
            "   {} remote content from {} into '{}'",
            "Fetched".dimmed(),
            asset.url,
            asset.target
        ),
        AssetOutcome::Failed { asset, reason } => eprintln!(
            "   {} fetching remote content from {} failed: {}",
            "warning:".yellow().bold(),
            asset.url,
            reason
        ),
    }

    if !step.dependencies.is_empty() {
        println!(
            "   {} {}",
            "Dependencies:".dimmed(),
            step.dependencies.join(", ")
        );
    }
}
