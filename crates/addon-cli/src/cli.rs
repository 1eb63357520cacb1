//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Add-on manager - install, update and remove add-ons and their dependencies
#[derive(Parser, Debug)]
#[command(name = "addons")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Directory add-ons are installed under (relative paths resolve against the executable's directory)
    #[arg(long, global = true, env = "INSTALL_LOCATION", value_name = "DIR")]
    pub install_root: Option<PathBuf>,

    /// Location of the installed-state file (relative paths resolve against the executable's directory)
    #[arg(long, global = true, env = "STATE_PATH", value_name = "FILE")]
    pub state_path: Option<PathBuf>,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Install or upgrade add-ons and their dependencies
    ///
    /// Examples:
    ///   addons install acme/widgets
    ///   addons install acme/widgets,https://github.com/acme/maps
    Install {
        /// Comma separated add-on names (`owner/name` or repository URL)
        names: String,
    },

    /// Remove add-ons, and by default every add-on depending on them
    Remove {
        /// Comma separated add-on names; all installed add-ons when omitted
        names: Option<String>,

        /// Leave add-ons that depend on the removed ones installed
        #[arg(long)]
        keep_dependents: bool,

        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// List installed add-ons and available official ones
    List {
        /// Do not query the official catalog
        #[arg(long)]
        installed_only: bool,
    },

    /// List installed add-ons behind their remote default branch
    Outdated,

    /// List installed add-ons with uncommitted changes
    Dirty,

    /// Install the external packages declared by installed add-ons
    InstallExternal {
        /// Print the install command without running it
        #[arg(long)]
        dry_run: bool,
    },

    /// Find resource files contributed by installed add-ons
    ///
    /// Examples:
    ///   addons find robots
    ///   addons find environments --field name=miniroom --field variant=1
    Find {
        /// Resource category (batches, environments, evaluation_methods,
        /// examples, formats, ground_truths, robots, tasks)
        category: String,

        /// Show the first resource whose fields equal the given values
        #[arg(long = "field", value_name = "KEY=VALUE", value_parser = parse_field)]
        fields: Vec<(String, String)>,

        /// File extension pattern (regular expression)
        #[arg(long, conflicts_with = "fields")]
        extension: Option<String>,
    },

    /// Print the install directory of an add-on (the local add-on by default)
    Path {
        /// Add-on name
        name: Option<String>,
    },
}

fn parse_field(raw: &str) -> Result<(String, String), String> {
    raw.split_once('=')
        .map(|(key, value)| (key.trim().to_string(), value.to_string()))
        .filter(|(key, _)| !key.is_empty())
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_install() {
        let cli = Cli::parse_from(["addons", "install", "acme/widgets,acme/maps"]);
        assert_eq!(
            cli.command,
            Some(Commands::Install {
                names: "acme/widgets,acme/maps".to_string()
            })
        );
    }

    #[test]
    fn parse_remove_flags() {
        let cli = Cli::parse_from(["addons", "remove", "--keep-dependents", "-y"]);
        assert_eq!(
            cli.command,
            Some(Commands::Remove {
                names: None,
                keep_dependents: true,
                yes: true,
            })
        );
    }

    #[test]
    fn parse_find_fields() {
        let cli = Cli::parse_from([
            "addons",
            "find",
            "environments",
            "--field",
            "name=miniroom",
            "--field",
            "variant=1",
        ]);
        match cli.command {
            Some(Commands::Find { category, fields, .. }) => {
                assert_eq!(category, "environments");
                assert_eq!(
                    fields,
                    vec![
                        ("name".to_string(), "miniroom".to_string()),
                        ("variant".to_string(), "1".to_string())
                    ]
                );
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parse_field_rejects_missing_separator() {
        assert!(parse_field("name").is_err());
        assert!(parse_field("=value").is_err());
        assert_eq!(
            parse_field("url=a=b").unwrap(),
            ("url".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn global_paths_after_subcommand() {
        let cli = Cli::parse_from([
            "addons",
            "list",
            "--install-root",
            "/srv/addons",
            "--state-path",
            "/srv/state.json",
        ]);
        assert_eq!(cli.install_root, Some(PathBuf::from("/srv/addons")));
        assert_eq!(cli.state_path, Some(PathBuf::from("/srv/state.json")));
    }
}
