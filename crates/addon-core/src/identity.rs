//! Add-on identifiers
//!
//! An add-on may be named in short form (`owner/name`) or by a full URL whose
//! path ends in `owner/name`. Both forms resolve to the same [`AddonId`].

use std::fmt;
use std::path::PathBuf;
use std::sync::LazyLock;

use regex::Regex;

use crate::{Error, Result};

/// Host prepended to short-form identifiers to build a clone URL.
pub const DEFAULT_HOST: &str = "https://github.com";

/// Identity of the reserved local, non-remote add-on directory.
pub const LOCAL_ADDON: &str = ".local/my_addons";

static TRAILING_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|/)([^/\s]+)/([^/\s]+)$").unwrap());

/// Canonical `owner/name` identity of an add-on.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AddonId {
    owner: String,
    name: String,
}

impl AddonId {
    /// Build an identity from its parts without validation.
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// The reserved local add-on.
    pub fn local() -> Self {
        let (owner, name) = LOCAL_ADDON.split_once('/').unwrap_or((LOCAL_ADDON, ""));
        Self::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical `owner/name` key used in the persisted state.
    pub fn key(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    /// Whether this is the reserved local add-on.
    pub fn is_local(&self) -> bool {
        self.key() == LOCAL_ADDON
    }

    /// Install location relative to the install root.
    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.owner).join(&self.name)
    }
}

impl fmt::Display for AddonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// A resolved add-on reference: where to clone from and what it is called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddonRef {
    /// Remote repository URL.
    pub url: String,
    /// Canonical identity.
    pub id: AddonId,
}

impl AddonRef {
    /// Parse a short-form or URL-form identifier.
    ///
    /// A trailing `/` and a trailing `.git` are ignored when deriving the
    /// identity, so `acme/widgets`, `https://github.com/acme/widgets` and
    /// `https://github.com/acme/widgets.git` all name `acme/widgets`.
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        let invalid = |reason: &str| Error::InvalidName {
            input: input.to_string(),
            reason: reason.to_string(),
        };

        if trimmed.is_empty() {
            return Err(invalid("name is empty"));
        }

        let is_url = trimmed.contains("://");
        let (url, path) = if is_url {
            let url = trimmed.trim_end_matches('/');
            let path = url
                .split_once("://")
                .and_then(|(_, rest)| rest.split_once('/'))
                .map(|(_host, path)| path)
                .ok_or_else(|| invalid("URL has no repository path"))?;
            (url.to_string(), path)
        } else {
            (format!("{DEFAULT_HOST}/{trimmed}"), trimmed)
        };

        let path = path.strip_suffix(".git").unwrap_or(path);
        let captures = TRAILING_PAIR
            .captures(path)
            .ok_or_else(|| invalid("expected 'owner/name' or a URL ending in 'owner/name'"))?;

        if !is_url && captures.get(0).map(|m| m.as_str()) != Some(path) {
            return Err(invalid("short form must be exactly 'owner/name'"));
        }

        let owner = &captures[1];
        let name = &captures[2];
        if [owner, name].iter().any(|part| *part == "." || *part == "..") {
            return Err(invalid("'.' and '..' are not valid owner or repository names"));
        }

        Ok(Self {
            url,
            id: AddonId::new(owner, name),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("acme/widgets")]
    #[case("https://github.com/acme/widgets")]
    #[case("https://github.com/acme/widgets/")]
    #[case("https://github.com/acme/widgets.git")]
    #[case("http://mirror.example.org/git/acme/widgets")]
    #[case("  acme/widgets\n")]
    fn forms_share_identity(#[case] input: &str) {
        let parsed = AddonRef::parse(input).unwrap();
        assert_eq!(parsed.id, AddonId::new("acme", "widgets"));
        assert_eq!(parsed.id.key(), "acme/widgets");
    }

    #[rstest]
    #[case("httpie/cli", "httpie", "cli")]
    #[case("httpx/httpx", "httpx", "httpx")]
    #[case("http/server", "http", "server")]
    fn short_form_owner_may_look_like_scheme(
        #[case] input: &str,
        #[case] owner: &str,
        #[case] name: &str,
    ) {
        let parsed = AddonRef::parse(input).unwrap();
        assert_eq!(parsed.id, AddonId::new(owner, name));
        assert_eq!(parsed.url, format!("https://github.com/{owner}/{name}"));
    }

    #[test]
    fn short_form_builds_default_url() {
        let parsed = AddonRef::parse("acme/widgets").unwrap();
        assert_eq!(parsed.url, "https://github.com/acme/widgets");
    }

    #[test]
    fn url_form_is_kept_for_cloning() {
        let parsed = AddonRef::parse("https://gitlab.example.com/acme/widgets.git").unwrap();
        assert_eq!(parsed.url, "https://gitlab.example.com/acme/widgets.git");
    }

    #[rstest]
    #[case("")]
    #[case("widgets")]
    #[case("a/b/c")]
    #[case("https://github.com/widgets")]
    #[case("https://github.com")]
    #[case("../widgets")]
    #[case("acme/..")]
    fn rejects_unparseable(#[case] input: &str) {
        let err = AddonRef::parse(input).unwrap_err();
        assert!(
            matches!(err, Error::InvalidName { .. }),
            "expected InvalidName for {input:?}, got: {err:?}"
        );
    }

    #[test]
    fn local_addon_identity() {
        let local = AddonId::local();
        assert_eq!(local.owner(), ".local");
        assert_eq!(local.name(), "my_addons");
        assert!(local.is_local());
        assert_eq!(local.relative_path(), PathBuf::from(".local/my_addons"));
    }

    #[test]
    fn local_addon_parses_in_short_form() {
        let parsed = AddonRef::parse(LOCAL_ADDON).unwrap();
        assert!(parsed.id.is_local());
    }
}
