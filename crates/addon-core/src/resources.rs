//! Read-only queries over resource files contributed by add-ons
//!
//! Add-ons place YAML resource files in directories named after a resource
//! category, e.g. `<addon>/robots/carter.yaml`. Queries scan the whole install
//! tree, so results span every installed add-on.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use regex::Regex;
use serde_yaml::{Mapping, Value};
use walkdir::WalkDir;

use crate::{Error, Result};

/// Key added to every loaded resource holding the file it came from.
pub const FILE_PATH_KEY: &str = "_file_path";

/// Extension pattern used when none is given.
pub const DEFAULT_EXTENSION: &str = "ya?ml";

const NAME_FIELD: &str = "name";
const VARIANT_FIELD: &str = "variant";
const ENV_SEPARATOR: char = ':';

/// Closed set of resource categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceCategory {
    Batches,
    Environments,
    EvaluationMethods,
    Examples,
    Formats,
    GroundTruths,
    Robots,
    Tasks,
}

impl ResourceCategory {
    pub const ALL: [ResourceCategory; 8] = [
        Self::Batches,
        Self::Environments,
        Self::EvaluationMethods,
        Self::Examples,
        Self::Formats,
        Self::GroundTruths,
        Self::Robots,
        Self::Tasks,
    ];

    /// Directory name used for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Batches => "batches",
            Self::Environments => "environments",
            Self::EvaluationMethods => "evaluation_methods",
            Self::Examples => "examples",
            Self::Formats => "formats",
            Self::GroundTruths => "ground_truths",
            Self::Robots => "robots",
            Self::Tasks => "tasks",
        }
    }
}

impl fmt::Display for ResourceCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| Error::UnknownCategory {
                name: s.to_string(),
                supported: Self::ALL.map(|c| c.as_str()).join(", "),
            })
    }
}

/// Query surface rooted at an install tree.
#[derive(Debug, Clone)]
pub struct ResourceQuery {
    root: PathBuf,
}

impl ResourceQuery {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Every resource file of `category`, as sorted canonical paths.
    ///
    /// A file matches when its parent directory is named after the category
    /// and its name ends with `extension` (a regular expression, defaulting to
    /// [`DEFAULT_EXTENSION`]).
    pub fn find_all(&self, category: ResourceCategory, extension: Option<&str>) -> Result<Vec<PathBuf>> {
        let extension = extension.unwrap_or(DEFAULT_EXTENSION);
        let pattern = format!("^[^/]*(?:{extension})$");
        let file_name = Regex::new(&pattern).map_err(|e| Error::InvalidPattern {
            pattern: extension.to_string(),
            message: e.to_string(),
        })?;

        let mut found = Vec::new();
        for entry in WalkDir::new(&self.root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
        {
            let path = entry.path();
            let in_category = path
                .parent()
                .and_then(Path::file_name)
                .is_some_and(|dir| dir == category.as_str());
            let name_matches = entry
                .file_name()
                .to_str()
                .is_some_and(|name| file_name.is_match(name));
            if in_category && name_matches {
                found.push(dunce::canonicalize(path).map_err(|e| addon_fs::Error::io(path, e))?);
            }
        }

        found.sort();
        found.dedup();
        Ok(found)
    }

    /// First resource of `category` whose fields equal all `criteria`.
    ///
    /// Field values are compared in their string form, so `("variant", "1")`
    /// matches both `variant: 1` and `variant: "1"`.
    pub fn get_match(&self, category: ResourceCategory, criteria: &[(&str, &str)]) -> Result<Option<PathBuf>> {
        Ok(self.find_match(category, criteria)?.map(|(path, _)| path))
    }

    /// Parsed form of [`get_match`](Self::get_match).
    pub fn get_match_data(&self, category: ResourceCategory, criteria: &[(&str, &str)]) -> Result<Option<Mapping>> {
        Ok(self.find_match(category, criteria)?.map(|(_, data)| data))
    }

    pub fn exists(&self, category: ResourceCategory, criteria: &[(&str, &str)]) -> Result<bool> {
        Ok(self.find_match(category, criteria)?.is_some())
    }

    fn find_match(
        &self,
        category: ResourceCategory,
        criteria: &[(&str, &str)],
    ) -> Result<Option<(PathBuf, Mapping)>> {
        for path in self.find_all(category, None)? {
            let data = load_yaml(&path)?;
            let matches = criteria.iter().all(|(field, expected)| {
                data.get(*field)
                    .is_some_and(|value| value_string(value) == *expected)
            });
            if matches {
                return Ok(Some((path, data)));
            }
        }
        Ok(None)
    }

    /// Value of `field` in every resource of `category`.
    pub fn get_field(&self, category: ResourceCategory, field: &str) -> Result<Vec<Option<Value>>> {
        self.find_all(category, None)?
            .iter()
            .map(|path| get_value(path, field))
            .collect()
    }

    /// Values of each of `fields` in every resource of `category`.
    pub fn get_fields(&self, category: ResourceCategory, fields: &[&str]) -> Result<Vec<Vec<Option<Value>>>> {
        self.find_all(category, None)?
            .iter()
            .map(|path| {
                let data = load_yaml(path)?;
                Ok(fields.iter().map(|field| data.get(*field).cloned()).collect())
            })
            .collect()
    }

    /// Value of `field` in the resource named `name`.
    ///
    /// For [`ResourceCategory::Environments`], `name` is an environment string
    /// `<name>:<variant>` and both parts must match.
    pub fn get_value_by_name(&self, category: ResourceCategory, name: &str, field: &str) -> Result<Option<Value>> {
        let criteria: Vec<(&str, &str)> = if category == ResourceCategory::Environments {
            vec![(NAME_FIELD, env_name(name)), (VARIANT_FIELD, env_variant(name))]
        } else {
            vec![(NAME_FIELD, name)]
        };
        Ok(self
            .get_match_data(category, &criteria)?
            .and_then(|data| data.get(field).cloned()))
    }
}

/// Parse a resource file, adding [`FILE_PATH_KEY`].
pub fn load_yaml(path: &Path) -> Result<Mapping> {
    let content = addon_fs::io::read_text(path)?;
    let parse_error = |message: String| Error::ResourceParse {
        path: path.to_path_buf(),
        message,
    };

    let mut data = match serde_yaml::from_str::<Value>(&content).map_err(|e| parse_error(e.to_string()))? {
        Value::Mapping(mapping) => mapping,
        Value::Null => Mapping::new(),
        _ => return Err(parse_error("top level is not a mapping".to_string())),
    };
    data.insert(
        Value::from(FILE_PATH_KEY),
        Value::from(path.to_string_lossy().into_owned()),
    );
    Ok(data)
}

/// Value of `field` in a single resource file.
pub fn get_value(path: &Path, field: &str) -> Result<Option<Value>> {
    Ok(load_yaml(path)?.get(field).cloned())
}

/// Name part of an environment string (`"miniroom:2"` gives `"miniroom"`).
pub fn env_name(env: &str) -> &str {
    env.rsplit_once(ENV_SEPARATOR).map_or(env, |(name, _)| name)
}

/// Variant part of an environment string (`"miniroom:2"` gives `"2"`).
pub fn env_variant(env: &str) -> &str {
    env.rsplit_once(ENV_SEPARATOR).map_or(env, |(_, variant)| variant)
}

/// Environment string for one or more environment resources.
///
/// The name comes from the first resource and every variant is appended:
/// `<name>:<variant>[:<variant>...]`. Returns `None` for an empty slice or
/// when the first resource has no name.
pub fn env_string(envs: &[Mapping]) -> Option<String> {
    let name = envs.first()?.get(NAME_FIELD).map(value_string)?;
    let variants: Vec<String> = envs
        .iter()
        .map(|env| env.get(VARIANT_FIELD).map(value_string).unwrap_or_default())
        .collect();
    Some(format!("{name}{ENV_SEPARATOR}{}", variants.join(":")))
}

fn value_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        other => serde_yaml::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("miniroom:2", "miniroom", "2")]
    #[case("house:scene:1", "house:scene", "1")]
    #[case("plain", "plain", "plain")]
    fn env_string_parts(#[case] env: &str, #[case] name: &str, #[case] variant: &str) {
        assert_eq!(env_name(env), name);
        assert_eq!(env_variant(env), variant);
    }

    #[test]
    fn env_string_joins_variants() {
        let first: Mapping = serde_yaml::from_str("name: miniroom\nvariant: 1").unwrap();
        let second: Mapping = serde_yaml::from_str("name: miniroom\nvariant: 3").unwrap();
        assert_eq!(env_string(&[first, second]).as_deref(), Some("miniroom:1:3"));
        assert_eq!(env_string(&[]), None);
    }

    #[test]
    fn category_round_trips_through_name() {
        for category in ResourceCategory::ALL {
            assert_eq!(category.as_str().parse::<ResourceCategory>().unwrap(), category);
        }
    }

    #[test]
    fn unknown_category_lists_supported() {
        let err = "widgets".parse::<ResourceCategory>().unwrap_err();
        let message = err.to_string();
        assert!(message.contains("widgets"));
        assert!(message.contains("ground_truths"));
    }
}
