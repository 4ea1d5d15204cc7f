use std::{
    fs::read_to_string,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::{error::RuleboundError, rule::RuleId, viewer::DEFAULT_HOME_LABEL};

/// Shell configuration, loaded from an explicit TOML path.
///
/// Everything here is presentation defaults for the embedding shell; the
/// core components take these values as plain parameters and never read
/// configuration ambiently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Label of the fixed first breadcrumb entry.
    pub home_label: String,
    /// Default nesting cap for the tree navigator.
    pub max_depth: Option<usize>,
    /// Render the tree rooted at this id instead of the whole forest.
    pub root: Option<RuleId>,
    /// Default dataset path, so the CLI can be pointed at a rulebook once.
    pub dataset: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            home_label: DEFAULT_HOME_LABEL.to_string(),
            max_depth: None,
            root: None,
            dataset: None,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self, RuleboundError> {
        tracing::debug!("reading config from {}", path.display());
        let content = read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load from `path` when given, otherwise fall back to defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, RuleboundError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
