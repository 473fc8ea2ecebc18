//! Component key to file lookup
//!
//! The analysis engine names the file an issue was raised on by component
//! key (`<project>:<relative/path>`). The review client needs the file
//! itself. The lookup is filled once from the source tree and only read
//! while reporting.

use anyhow::{Context, Result};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::ffi::OsStr;
use std::path::Path;
use tracing::debug;

/// A source file of the analysed revision, by path relative to the repository root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InputFile {
    path: String,
}

impl InputFile {
    /// `path` is relative to the repository root; `\` separators are normalized to `/`.
    pub fn new(path: impl Into<String>) -> Self {
        let path: String = path.into();
        Self {
            path: path.replace('\\', "/"),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl std::fmt::Display for InputFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Read-only table from component key to file.
#[derive(Debug, Clone, Default)]
pub struct FileLocationLookup {
    by_key: HashMap<String, InputFile>,
}

impl FileLocationLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file. A later registration for the same key replaces the earlier one.
    pub fn insert(&mut self, component_key: impl Into<String>, file: InputFile) {
        self.by_key.insert(component_key.into(), file);
    }

    /// The file for `component_key`, or `None` when the key names no indexed file
    /// (a directory, a module, or the project itself).
    pub fn resolve(&self, component_key: &str) -> Option<&InputFile> {
        self.by_key.get(component_key)
    }

    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }
}

impl FromIterator<(String, InputFile)> for FileLocationLookup {
    fn from_iter<I: IntoIterator<Item = (String, InputFile)>>(iter: I) -> Self {
        Self {
            by_key: iter.into_iter().collect(),
        }
    }
}

/// Component key the analysis engine uses for a file
pub fn component_key(project_key: &str, file: &InputFile) -> String {
    format!("{}:{}", project_key, file.path())
}

/// Index every non-ignored file under `root` as `<project_key>:<relative path>`.
///
/// Dot-directories such as `.github/` are indexed. The `.git` directory and
/// anything matched by `.gitignore` are skipped.
pub fn index_sources(project_key: &str, root: &Path) -> Result<FileLocationLookup> {
    if !root.is_dir() {
        anyhow::bail!("Source root is not a directory: {}", root.display());
    }

    let walker = WalkBuilder::new(root)
        .hidden(false)
        .git_ignore(true)
        .git_global(false)
        .git_exclude(true)
        .require_git(false)
        .filter_entry(|entry| entry.file_name() != OsStr::new(".git"))
        .build();

    let mut lookup = FileLocationLookup::new();
    for entry in walker {
        let entry = entry.with_context(|| format!("Failed to walk {}", root.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let file = InputFile::new(relative.to_string_lossy());
        lookup.insert(component_key(project_key, &file), file);
    }

    debug!(
        "Indexed {} files under {} for project {}",
        lookup.len(),
        root.display(),
        project_key
    );
    Ok(lookup)
}
