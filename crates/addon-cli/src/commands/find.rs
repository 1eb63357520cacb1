//! Resource lookup and path commands

use addon_core::{AddonManager, ResourceCategory};
use colored::Colorize;

use crate::error::{CliError, Result};

/// Run the find command
///
/// Without `fields`, prints every resource file of the category. With
/// `fields`, prints the first resource whose fields all match.
pub fn run_find(
    manager: &AddonManager,
    category: &str,
    fields: &[(String, String)],
    extension: Option<&str>,
) -> Result<()> {
    let category: ResourceCategory = category.parse()?;
    let query = manager.resources();

    if fields.is_empty() {
        for path in query.find_all(category, extension)? {
            println!("{}", path.display());
        }
        return Ok(());
    }

    let criteria: Vec<(&str, &str)> = fields
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();
    match query.get_match(category, &criteria)? {
        Some(path) => {
            println!("{}", path.display());
            Ok(())
        }
        None => Err(CliError::user(format!(
            "No {} resource matches {}",
            category,
            fields
                .iter()
                .map(|(key, value)| format!("{key}={value}"))
                .collect::<Vec<_>>()
                .join(", ")
        ))),
    }
}

/// Run the path command
pub fn run_path(manager: &AddonManager, name: Option<&str>) -> Result<()> {
    let path = match name {
        Some(name) => manager.path_of(name)?,
        None => manager.local_addon_path(),
    };
    println!("{}", path.display());
    if !path.exists() {
        tracing::debug!(path = %path.display(), "Path does not exist yet");
        eprintln!("{} {} is not installed", "note:".dimmed(), path.display());
    }
    Ok(())
}
