//! Remote asset bundles
//!
//! An add-on may declare a large archive to be downloaded and unpacked into a
//! subdirectory of its working copy. The archive is only fetched again when the
//! declared `(url, target)` pair differs from the one last recorded.

use std::fs::{self, File};
use std::path::Path;
use std::time::Duration;

use crate::state::RemoteAsset;
use crate::{Error, Result};

pub(crate) const USER_AGENT: &str = concat!("addons/", env!("CARGO_PKG_VERSION"));
const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Build a configured client, falling back to reqwest defaults with a warning.
pub(crate) fn build_client(
    builder: reqwest::blocking::ClientBuilder,
    purpose: &str,
) -> reqwest::blocking::Client {
    builder.build().unwrap_or_else(|e| {
        tracing::warn!(purpose, error = %e, "HTTP client configuration rejected, using defaults");
        reqwest::blocking::Client::new()
    })
}

/// Download and extraction capability.
pub trait AssetFetcher {
    /// Download `url` into the file at `dest`, replacing its contents.
    fn download(&self, url: &str, dest: &Path) -> Result<()>;

    /// Unpack the archive at `archive` into the directory `target`.
    fn extract(&self, archive: &Path, target: &Path) -> Result<()>;
}

/// [`AssetFetcher`] backed by a blocking HTTP client and zip archives.
#[derive(Debug, Clone)]
pub struct HttpArchiveFetcher {
    client: reqwest::blocking::Client,
}

impl HttpArchiveFetcher {
    pub fn new() -> Self {
        // Bundles can be large, so only the connect phase is bounded
        let client = build_client(
            reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
                .timeout(None::<Duration>),
            "asset",
        );
        Self { client }
    }
}

impl Default for HttpArchiveFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetFetcher for HttpArchiveFetcher {
    fn download(&self, url: &str, dest: &Path) -> Result<()> {
        let download_error = |message: String| Error::Download {
            url: url.to_string(),
            message,
        };

        let mut response = self
            .client
            .get(url)
            .send()
            .map_err(|e| download_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(download_error(format!("server returned {}", response.status())));
        }

        let mut file = File::create(dest).map_err(|e| addon_fs::Error::io(dest, e))?;
        let bytes = response
            .copy_to(&mut file)
            .map_err(|e| download_error(e.to_string()))?;

        tracing::debug!(url = %url, bytes, "Downloaded asset archive");
        Ok(())
    }

    fn extract(&self, archive: &Path, target: &Path) -> Result<()> {
        let extract_error = |message: String| Error::Extract {
            archive: archive.to_path_buf(),
            message,
        };

        let file = File::open(archive).map_err(|e| addon_fs::Error::io(archive, e))?;
        let mut zip = zip::ZipArchive::new(file).map_err(|e| extract_error(e.to_string()))?;

        fs::create_dir_all(target).map_err(|e| addon_fs::Error::io(target, e))?;
        zip.extract(target).map_err(|e| extract_error(e.to_string()))?;

        tracing::debug!(target = %target.display(), entries = zip.len(), "Extracted asset archive");
        Ok(())
    }
}

/// What happened to an add-on's asset bundle during an install.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetOutcome {
    /// The add-on declares no asset bundle.
    NotDeclared,
    /// The declared bundle matches the recorded one; nothing was fetched.
    Unchanged(RemoteAsset),
    /// The bundle was downloaded and extracted.
    Fetched(RemoteAsset),
    /// Fetching failed. The install still succeeds and the next run retries.
    Failed { asset: RemoteAsset, reason: String },
}

impl AssetOutcome {
    /// Value to record in the add-on's state entry.
    pub fn recorded(&self, previous: Option<&RemoteAsset>) -> Option<RemoteAsset> {
        match self {
            Self::Fetched(asset) | Self::Unchanged(asset) => Some(asset.clone()),
            Self::NotDeclared | Self::Failed { .. } => previous.cloned(),
        }
    }
}

/// Bring an add-on's asset bundle in line with its declaration.
///
/// The existing target is only removed after a successful download, so a
/// network failure leaves the previous content in place.
pub fn refresh_asset(
    fetcher: &dyn AssetFetcher,
    addon_dir: &Path,
    declared: Option<RemoteAsset>,
    previous: Option<&RemoteAsset>,
) -> AssetOutcome {
    let Some(asset) = declared else {
        return AssetOutcome::NotDeclared;
    };

    if previous == Some(&asset) {
        tracing::debug!(url = %asset.url, target = %asset.target, "Remote content already installed");
        return AssetOutcome::Unchanged(asset);
    }

    match fetch_into(fetcher, addon_dir, &asset) {
        Ok(()) => {
            tracing::info!(url = %asset.url, target = %asset.target, "Installed remote content");
            AssetOutcome::Fetched(asset)
        }
        Err(e) => {
            tracing::warn!(url = %asset.url, error = %e, "Fetching of remote content failed");
            AssetOutcome::Failed {
                asset,
                reason: e.to_string(),
            }
        }
    }
}

fn fetch_into(fetcher: &dyn AssetFetcher, addon_dir: &Path, asset: &RemoteAsset) -> Result<()> {
    // Kept out of the working copy so removing the target never touches it
    let download = tempfile::Builder::new()
        .prefix("addon-asset-")
        .suffix(".zip")
        .tempfile()
        .map_err(|e| addon_fs::Error::io(std::env::temp_dir(), e))?;

    fetcher.download(&asset.url, download.path())?;

    let target = addon_dir.join(&asset.target);
    if target.exists() {
        tracing::debug!(target = %target.display(), "Removing previous remote content");
        let removed = if target.is_dir() {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        removed.map_err(|e| addon_fs::Error::io(&target, e))?;
    }

    fetcher.extract(download.path(), &target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn recorded_keeps_previous_on_failure() {
        let previous = RemoteAsset::new("https://example.org/v1.zip", "data");
        let failed = AssetOutcome::Failed {
            asset: RemoteAsset::new("https://example.org/v2.zip", "data"),
            reason: "offline".into(),
        };
        assert_eq!(failed.recorded(Some(&previous)), Some(previous.clone()));
        assert_eq!(AssetOutcome::NotDeclared.recorded(None), None);
    }

    #[test]
    fn rejected_client_configuration_falls_back() {
        let builder = reqwest::blocking::Client::builder().user_agent("bad\nagent");
        let client = build_client(builder, "test");
        assert!(client.get("https://example.org/data.zip").build().is_ok());
    }

    #[test]
    fn recorded_takes_fetched_value() {
        let fetched = RemoteAsset::new("https://example.org/v2.zip", "data");
        let outcome = AssetOutcome::Fetched(fetched.clone());
        assert_eq!(outcome.recorded(None), Some(fetched));
    }
}
