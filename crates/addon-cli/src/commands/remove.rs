//! Remove command

use addon_core::{AddonManager, RemovalPlan};
use colored::Colorize;
use dialoguer::Confirm;

use crate::error::Result;

/// Run the remove command
///
/// Without `names`, every installed add-on is removed. Asks for confirmation
/// unless `yes` is set.
pub fn run_remove(manager: &AddonManager, names: Option<&str>, cascade: bool, yes: bool) -> Result<()> {
    let names: Vec<String> = names
        .map(|list| list.split(',').map(str::to_string).collect())
        .unwrap_or_default();

    let plan = manager.plan_removal(&names, cascade)?;
    if plan.is_empty() {
        println!("{} No add-ons installed.", "=>".blue().bold());
        return Ok(());
    }

    print_plan(&plan);

    if !yes {
        let proceed = Confirm::new()
            .with_prompt("Are you sure you want to remove these add-ons?")
            .default(false)
            .interact()?;
        if !proceed {
            println!("{} Removal cancelled.", "=>".blue().bold());
            return Ok(());
        }
    }

    let report = manager.execute_removal(&plan)?;
    for removed in &report.removed {
        println!(
            "{} Removed {} from {}",
            "OK".green().bold(),
            removed.id.to_string().cyan(),
            removed.path.display()
        );
        if let Some(parent) = &removed.pruned_parent {
            println!("   {} {}", "Removed empty directory".dimmed(), parent.display());
        }
    }
    Ok(())
}

fn print_plan(plan: &RemovalPlan) {
    println!("{} Removing the requested add-ons:", "=>".blue().bold());
    for id in &plan.requested {
        println!("   {}", id.to_string().cyan());
    }
    if !plan.dependents.is_empty() {
        println!("{} And the add-ons that depend on them:", "=>".blue().bold());
        for id in &plan.dependents {
            println!("   {}", id.to_string().cyan());
        }
    }
}
