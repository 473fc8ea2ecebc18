//! Publish command - review issues against a diff and print the result

use super::OutputFormat;
use crate::client::RecordingClient;
use crate::config::ReviewConfig;
use crate::diff::DiffManifest;
use crate::location::index_sources;
use crate::models::{Issue, Status};
use crate::publisher::{Publisher, Review};
use anyhow::{Context, Result};
use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct PublishArgs {
    pub issues: PathBuf,
    pub diff: PathBuf,
    pub source_root: PathBuf,
    pub project_key: String,
    pub config: Option<PathBuf>,
    pub format: OutputFormat,
    pub ignore_files_not_modified: bool,
    pub comment_when_no_issues: bool,
    pub max_global_issues: Option<usize>,
    pub status_name: Option<String>,
    pub fail_on_failed: bool,
}

/// JSON shape of a dry run
#[derive(Serialize)]
struct PublishOutput<'a> {
    status: Status,
    total_new: usize,
    total_inline_reported: usize,
    overflow: usize,
    #[serde(flatten)]
    recorded: &'a RecordingClient,
}

/// Run the publish command
pub fn run(args: PublishArgs) -> Result<()> {
    let mut config = ReviewConfig::load(args.config.as_deref())?;
    // Flags only switch behaviour on; config can't be overridden to false from here.
    if args.ignore_files_not_modified {
        config.ignore_files_not_modified = true;
    }
    if args.comment_when_no_issues {
        config.comment_when_no_issues = true;
    }
    if let Some(max) = args.max_global_issues {
        config.max_global_issues = max;
    }
    if let Some(name) = args.status_name.filter(|n| !n.trim().is_empty()) {
        config.status_name = name;
    }

    let publisher = Publisher::from_config(&config)?;

    let issues = load_issues(&args.issues)?;
    let diff = DiffManifest::load(&args.diff)?;
    let files = index_sources(&args.project_key, &args.source_root)?;
    info!(
        "Loaded {} issues, {} changed files, {} source files",
        issues.len(),
        diff.files.len(),
        files.len()
    );

    let mut client = RecordingClient::new();
    let review = publisher.run(&issues, &files, &diff, &mut client)?;

    match args.format {
        OutputFormat::Json => {
            let output = PublishOutput {
                status: review.report.status(),
                total_new: review.report.total_new(),
                total_inline_reported: review.report.total_inline_reported(),
                overflow: review.report.overflow(),
                recorded: &client,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => print_text(&review, &client),
    }

    if args.fail_on_failed && review.report.status() == Status::Failed {
        eprintln!("Failing due to --fail-on-failed: status is failed");
        std::process::exit(1);
    }
    Ok(())
}

fn load_issues(path: &Path) -> Result<Vec<Issue>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read issues {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid issues file {}", path.display()))
}

fn print_text(review: &Review, client: &RecordingClient) {
    for comment in &client.comments {
        println!(
            "{} {}",
            style(format!("{}:{}", comment.file, comment.line)).cyan().bold(),
            style("(line comment)").dim()
        );
        for line in comment.body.lines() {
            println!("  {}", line);
        }
        println!();
    }

    for body in &client.global_comments {
        println!("{}", style("Summary comment").bold());
        for line in body.lines() {
            println!("  {}", line);
        }
        println!();
    }

    if let Some(status) = client.status() {
        let label = match status.status {
            Status::Ok => style(status.status.to_string().to_uppercase()).green().bold(),
            Status::Failed => style(status.status.to_string().to_uppercase()).red().bold(),
        };
        println!(
            "{} {} {} {}",
            style("Status:").bold(),
            style(&status.name).cyan(),
            label,
            status.description
        );
    }

    println!(
        "{}",
        style(format!(
            "{} new, {} inline on {} lines, {} not listed",
            review.report.total_new(),
            review.report.total_inline_reported(),
            review.comments.len(),
            review.report.overflow()
        ))
        .dim()
    );
}
