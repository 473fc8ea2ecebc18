//! Diff visibility loaded from a manifest file
//!
//! The code hosting platform knows which lines a revision shows. A CI job
//! exports that as JSON so a run can be replayed without network access:
//!
//! ```json
//! {
//!   "blob_url": "https://gitlab.example.com/group/project/blob/0a1b2c3",
//!   "files": {
//!     "src/main.rs": [{ "start": 10, "end": 24 }],
//!     "README.md": []
//!   }
//! }
//! ```
//!
//! A file listed with no ranges is changed but shows no commentable lines
//! (a deletion, a binary, or a rename).

use crate::client::DiffContext;
use crate::location::InputFile;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use url::Url;

/// Inclusive range of new-side line numbers shown by a diff hunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn contains(&self, line: u32) -> bool {
        self.start <= line && line <= self.end
    }
}

/// Changed files and visible lines of one revision
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DiffManifest {
    /// Prefix for file links, e.g. `<project url>/blob/<sha>`
    #[serde(default)]
    pub blob_url: Option<String>,
    #[serde(default)]
    pub files: HashMap<String, Vec<LineRange>>,
}

impl DiffManifest {
    pub fn from_json(content: &str) -> Result<Self> {
        let manifest: DiffManifest =
            serde_json::from_str(content).context("Failed to parse diff manifest")?;
        if let Some(blob_url) = &manifest.blob_url {
            let parsed = Url::parse(blob_url)
                .with_context(|| format!("Invalid blob_url '{}' in diff manifest", blob_url))?;
            if parsed.cannot_be_a_base() {
                anyhow::bail!("blob_url '{}' in diff manifest cannot hold a path", blob_url);
            }
        }
        for (path, ranges) in &manifest.files {
            if let Some(bad) = ranges.iter().find(|r| r.start == 0 || r.start > r.end) {
                anyhow::bail!(
                    "Invalid line range {}-{} for {} in diff manifest",
                    bad.start,
                    bad.end,
                    path
                );
            }
        }
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read diff manifest {}", path.display()))?;
        Self::from_json(&content)
    }
}

impl DiffContext for DiffManifest {
    fn has_file(&self, file: &InputFile) -> bool {
        self.files.contains_key(file.path())
    }

    fn is_line_visible(&self, file: &InputFile, line: u32) -> bool {
        self.files
            .get(file.path())
            .is_some_and(|ranges| ranges.iter().any(|r| r.contains(line)))
    }

    /// Path segments are percent-encoded so the link survives in markdown.
    fn url_for(&self, file: &InputFile, line: Option<u32>) -> Option<String> {
        let mut url = Url::parse(self.blob_url.as_deref()?).ok()?;
        url.path_segments_mut()
            .ok()?
            .pop_if_empty()
            .extend(file.path().split('/'));
        url.set_fragment(line.map(|line| format!("L{}", line)).as_deref());
        Some(url.into())
    }
}
