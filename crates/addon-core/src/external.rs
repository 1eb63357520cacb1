//! External (non add-on) package dependencies
//!
//! Installed add-ons may list Python packages in `.dependencies-python`. The
//! lists are merged across every installed add-on and installed with a single
//! package-manager invocation.

use std::collections::BTreeSet;
use std::process::{Command, Stdio};

use crate::declaration;
use crate::identity::AddonRef;
use crate::manager::AddonManager;
use crate::{Error, Result};

/// Installs external packages in one batch.
pub trait PackageInstaller {
    /// The command line that [`install`](Self::install) would run.
    fn command(&self, packages: &[String]) -> String;

    /// Install `packages`, streaming the tool's output to the terminal.
    fn install(&self, packages: &[String]) -> Result<()>;
}

/// [`PackageInstaller`] running `pip3 install`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new("pip3")
    }
}

impl PackageInstaller for PipInstaller {
    fn command(&self, packages: &[String]) -> String {
        format!("{} install {}", self.program, packages.join(" "))
    }

    fn install(&self, packages: &[String]) -> Result<()> {
        let command = self.command(packages);
        let failed = |exit_code| Error::ExternalInstall {
            command: command.clone(),
            exit_code,
        };

        let status = Command::new(&self.program)
            .arg("install")
            .args(packages)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|_| failed(None))?;

        if !status.success() {
            return Err(failed(status.code()));
        }
        Ok(())
    }
}

impl AddonManager {
    /// Union of the external packages declared by every installed add-on.
    ///
    /// Add-ons whose directory is missing contribute nothing.
    pub fn external_packages(&self) -> Result<BTreeSet<String>> {
        let state = self.state.load()?;
        let mut packages = BTreeSet::new();
        for identity in state.identities() {
            let path = self.addon_path(&AddonRef::parse(identity)?.id);
            packages.extend(declaration::read_external_packages(&path)?);
        }
        Ok(packages)
    }

    /// Install all declared external packages in one batch.
    ///
    /// Returns the command line, or `None` when no add-on declares any
    /// package. With `dry_run` the command is only built, not run.
    pub fn install_external(&self, dry_run: bool) -> Result<Option<String>> {
        let packages: Vec<String> = self.external_packages()?.into_iter().collect();
        if packages.is_empty() {
            tracing::debug!("No external packages declared");
            return Ok(None);
        }

        let command = self.packages.command(&packages);
        if dry_run {
            tracing::debug!(command = %command, "Dry run, not installing external packages");
        } else {
            tracing::info!(command = %command, count = packages.len(), "Installing external packages");
            self.packages.install(&packages)?;
        }
        Ok(Some(command))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pip_command_lists_packages() {
        let pip = PipInstaller::default();
        let packages = vec!["numpy".to_string(), "scipy>=1.10".to_string()];
        assert_eq!(pip.command(&packages), "pip3 install numpy scipy>=1.10");
    }

    #[test]
    fn missing_program_is_install_failure() {
        let pip = PipInstaller::new("definitely-not-a-real-pip-binary");
        let err = pip.install(&["numpy".to_string()]).unwrap_err();
        assert!(
            matches!(err, Error::ExternalInstall { exit_code: None, .. }),
            "got: {err:?}"
        );
    }
}
