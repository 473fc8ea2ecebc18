//! commit-review - publish static-analysis findings on a code review
//!
//! Takes the issues an analysis run produced, keeps the new ones, and turns
//! them into one comment per visible line, a summary comment, and a
//! pass/fail status for the revision.
//!
//! The review platform is reached through two traits: [`DiffContext`]
//! answers questions about the diff, [`ReviewClient`] performs writes.
//! [`Publisher::review`] computes everything up front and
//! [`Publisher::publish`] sends it.

pub mod capped;
pub mod cli;
pub mod client;
pub mod config;
pub mod diff;
pub mod error;
pub mod location;
pub mod markdown;
pub mod models;
pub mod publisher;
pub mod report;

pub use client::{DiffContext, RecordingClient, ReviewClient};
pub use config::ReviewConfig;
pub use diff::DiffManifest;
pub use error::{ReviewError, ReviewResult};
pub use location::{FileLocationLookup, InputFile};
pub use markdown::MarkdownFormatter;
pub use models::{Issue, Severity, Status};
pub use publisher::{Publisher, Review};
pub use report::GlobalReport;
