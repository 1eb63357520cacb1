//! Official add-on catalog
//!
//! Lists the repositories of the hosting organisation through the public
//! GitHub API. Used only for reporting; install and removal never consult it.

use std::time::Duration;

use serde::Deserialize;

use crate::asset::{USER_AGENT, build_client};
use crate::{Error, Result};

/// Organisation whose repositories are the official add-ons.
pub const DEFAULT_ORG: &str = "benchbot-addons";

const API_BASE: &str = "https://api.github.com";
const ACCEPT: &str = "application/vnd.github.v3+json";
const TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct RepositoryEntry {
    full_name: String,
}

/// Client for the official add-on listing.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: reqwest::blocking::Client,
    org: String,
}

impl CatalogClient {
    pub fn new(org: impl Into<String>) -> Self {
        let client = build_client(
            reqwest::blocking::Client::builder()
                .user_agent(USER_AGENT)
                .timeout(Duration::from_secs(TIMEOUT_SECS)),
            "catalog",
        );
        Self {
            client,
            org: org.into(),
        }
    }

    pub fn org(&self) -> &str {
        &self.org
    }

    /// Web page listing the organisation's repositories.
    pub fn org_url(&self) -> String {
        format!("https://github.com/{}", self.org)
    }

    fn api_url(&self) -> String {
        format!("{API_BASE}/orgs/{}/repos", self.org)
    }

    /// `owner/name` of every repository in the organisation.
    pub fn official_addons(&self) -> Result<Vec<String>> {
        let catalog_error = |message: String| Error::Catalog { message };

        let response = self
            .client
            .get(self.api_url())
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .map_err(|e| catalog_error(e.to_string()))?;

        if !response.status().is_success() {
            return Err(catalog_error(format!(
                "GitHub API returned {}",
                response.status()
            )));
        }

        let entries: Vec<RepositoryEntry> = response
            .json()
            .map_err(|e| catalog_error(format!("unexpected response: {e}")))?;

        tracing::debug!(org = %self.org, count = entries.len(), "Fetched official add-on catalog");
        Ok(entries.into_iter().map(|e| e.full_name).collect())
    }
}

impl Default for CatalogClient {
    fn default() -> Self {
        Self::new(DEFAULT_ORG)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn urls_follow_org() {
        let client = CatalogClient::default();
        assert_eq!(client.api_url(), "https://api.github.com/orgs/benchbot-addons/repos");
        assert_eq!(client.org_url(), "https://github.com/benchbot-addons");
    }

    #[test]
    fn entries_keep_full_name_only() {
        let json = r#"[{"full_name": "benchbot-addons/tasks_base", "private": false}]"#;
        let entries: Vec<RepositoryEntry> = serde_json::from_str(json).unwrap();
        assert_eq!(entries[0].full_name, "benchbot-addons/tasks_base");
    }
}
