//! Core data models for commit-review
//!
//! Issues come from the analysis engine and are read-only here. Severity
//! and status are the only vocabulary the rest of the crate matches on.

use serde::{Deserialize, Serialize};

/// Severity levels reported by the analysis engine.
///
/// Ordered from most to least severe. Anything the engine reports outside
/// the five known levels deserializes to `Unknown` and is rendered with the
/// fallback marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE", from = "String")]
pub enum Severity {
    Blocker,
    Critical,
    Major,
    Minor,
    Info,
    Unknown,
}

impl Severity {
    /// Known severities in reporting order.
    pub const ALL: [Severity; 5] = [
        Severity::Blocker,
        Severity::Critical,
        Severity::Major,
        Severity::Minor,
        Severity::Info,
    ];

    /// Parse an engine severity name. Never fails: unrecognised names map to `Unknown`.
    pub fn parse(name: &str) -> Severity {
        match name.trim().to_ascii_uppercase().as_str() {
            "BLOCKER" => Severity::Blocker,
            "CRITICAL" => Severity::Critical,
            "MAJOR" => Severity::Major,
            "MINOR" => Severity::Minor,
            "INFO" => Severity::Info,
            _ => Severity::Unknown,
        }
    }
}

impl From<String> for Severity {
    fn from(name: String) -> Self {
        Severity::parse(&name)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Blocker => write!(f, "blocker"),
            Severity::Critical => write!(f, "critical"),
            Severity::Major => write!(f, "major"),
            Severity::Minor => write!(f, "minor"),
            Severity::Info => write!(f, "info"),
            Severity::Unknown => write!(f, "unknown"),
        }
    }
}

fn default_true() -> bool {
    true
}

/// One finding produced by the analysis engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    pub rule_key: String,
    pub component_key: String,
    #[serde(default)]
    pub line: Option<u32>,
    /// Pre-existing issues are carried through by the engine but never reported
    #[serde(default = "default_true")]
    pub is_new: bool,
}

/// Pass/fail marker attached to the analysed revision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Ok,
    Failed,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Ok => write!(f, "ok"),
            Status::Failed => write!(f, "failed"),
        }
    }
}
