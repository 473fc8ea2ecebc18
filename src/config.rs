//! Settings for a review run
//!
//! Loaded with the following priority:
//! 1. Command line flags (applied by the CLI, highest)
//! 2. Environment variables (`COMMIT_REVIEW_*`)
//! 3. `commit-review.toml` in the working directory, or an explicit path
//!
//! # Configuration Format
//!
//! ```toml
//! # commit-review.toml
//! instance_base_url = "http://sonar.internal:9000"
//! public_base_url = "https://sonar.example.com"
//! ignore_files_not_modified = false
//! comment_when_no_issues = false
//! max_global_issues = 10
//! status_name = "sonarqube"
//! ```
//!
//! Blank URLs and a blank status name count as unset, wherever they come from.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Default config file name, looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "commit-review.toml";

/// Default number of issues listed one by one in the summary comment
pub const DEFAULT_MAX_GLOBAL_ISSUES: usize = 10;

pub const ENV_INSTANCE_URL: &str = "COMMIT_REVIEW_INSTANCE_URL";
pub const ENV_PUBLIC_URL: &str = "COMMIT_REVIEW_PUBLIC_URL";
pub const ENV_MAX_GLOBAL_ISSUES: &str = "COMMIT_REVIEW_MAX_GLOBAL_ISSUES";
pub const ENV_STATUS_NAME: &str = "COMMIT_REVIEW_STATUS_NAME";

/// Name the commit status is published under unless configured otherwise
pub const DEFAULT_STATUS_NAME: &str = "sonarqube";

fn default_max_global_issues() -> usize {
    DEFAULT_MAX_GLOBAL_ISSUES
}

fn default_status_name() -> String {
    DEFAULT_STATUS_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReviewConfig {
    /// URL of the analysis server as seen from the machine running the analysis
    #[serde(default)]
    pub instance_base_url: Option<String>,

    /// URL of the analysis server as seen by review readers; wins over `instance_base_url`
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Drop issues on files the revision does not touch
    #[serde(default)]
    pub ignore_files_not_modified: bool,

    /// Post the summary comment even when there is nothing to report
    #[serde(default)]
    pub comment_when_no_issues: bool,

    /// Issues listed one by one in the summary comment; the rest are only counted
    #[serde(default = "default_max_global_issues")]
    pub max_global_issues: usize,

    /// Name of the commit status, shown by the platform next to the pass/fail marker
    #[serde(default = "default_status_name")]
    pub status_name: String,
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            instance_base_url: None,
            public_base_url: None,
            ignore_files_not_modified: false,
            comment_when_no_issues: false,
            max_global_issues: DEFAULT_MAX_GLOBAL_ISSUES,
            status_name: default_status_name(),
        }
    }
}

impl ReviewConfig {
    /// Load from `path`, or from `commit-review.toml` in the working directory
    /// when no path is given, then apply environment overrides.
    ///
    /// An explicit path must exist. The default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = PathBuf::from(CONFIG_FILE_NAME);
                if default_path.exists() {
                    Self::from_file(&default_path)?
                } else {
                    debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let mut config: ReviewConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        config.normalize();
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Treat blank values as unset.
    fn normalize(&mut self) {
        self.instance_base_url = self.instance_base_url.take().filter(|v| !v.trim().is_empty());
        self.public_base_url = self.public_base_url.take().filter(|v| !v.trim().is_empty());
        if self.status_name.trim().is_empty() {
            self.status_name = default_status_name();
        }
    }

    /// Override settings from environment variables, read through `var`.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = var(ENV_INSTANCE_URL).filter(|v| !v.trim().is_empty()) {
            self.instance_base_url = Some(url);
        }
        if let Some(url) = var(ENV_PUBLIC_URL).filter(|v| !v.trim().is_empty()) {
            self.public_base_url = Some(url);
        }
        if let Some(raw) = var(ENV_MAX_GLOBAL_ISSUES) {
            match raw.trim().parse::<usize>() {
                Ok(max) => self.max_global_issues = max,
                Err(_) => warn!(
                    "Ignoring {}={}: not a non-negative integer",
                    ENV_MAX_GLOBAL_ISSUES, raw
                ),
            }
        }
        if let Some(name) = var(ENV_STATUS_NAME).filter(|v| !v.trim().is_empty()) {
            self.status_name = name;
        }
    }

    /// Write an example config file into `dir`, unless one exists. Returns its path.
    pub fn init(dir: &Path) -> Result<PathBuf> {
        let path = dir.join(CONFIG_FILE_NAME);
        if !path.exists() {
            std::fs::write(&path, EXAMPLE_CONFIG)
                .with_context(|| format!("Failed to write {}", path.display()))?;
        }
        Ok(path)
    }
}

const EXAMPLE_CONFIG: &str = r#"# commit-review configuration

# Analysis server used for rule documentation links.
# public_base_url wins over instance_base_url when both are set.
instance_base_url = "http://localhost:9000"
# public_base_url = "https://sonar.example.com"

# Drop issues raised on files the revision does not modify
ignore_files_not_modified = false

# Post the summary comment even when no new issues were found
comment_when_no_issues = false

# Issues listed individually in the summary comment
max_global_issues = 10

# Name of the commit status
status_name = "sonarqube"
"#;
