//! CLI command definitions and handlers

mod init;
mod publish;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// commit-review - publish analysis findings on a code review
#[derive(Parser, Debug)]
#[command(name = "commit-review")]
#[command(
    version,
    about = "Turn static-analysis issues into review comments, a summary, and a commit status",
    long_about = "commit-review anchors new analysis issues to the lines a revision shows, \
renders one comment per line and a summary comment, and derives a pass/fail status.\n\n\
Runs are offline: the diff is read from a manifest file and the review is printed \
instead of sent.",
    after_help = "\
Examples:
  commit-review init                                   Write an example commit-review.toml
  commit-review publish --issues issues.json --diff diff.json
  commit-review publish --issues issues.json --diff diff.json --format json
  commit-review publish --issues issues.json --diff diff.json --fail-on-failed"
)]
pub struct Cli {
    /// Log level (error, warn, info, debug, trace); RUST_LOG wins when set
    #[arg(long, global = true, default_value = "warn", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write an example commit-review.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Review an analysis run against a diff and print what would be published
    Publish {
        /// JSON array of issues from the analysis engine
        #[arg(long)]
        issues: PathBuf,

        /// Diff manifest: changed files and visible line ranges
        #[arg(long)]
        diff: PathBuf,

        /// Root of the analysed sources, used to resolve component keys
        #[arg(long, default_value = ".")]
        source_root: PathBuf,

        /// Project key prefixing component keys (`<key>:<path>`)
        #[arg(long, env = "COMMIT_REVIEW_PROJECT_KEY", default_value = "project")]
        project_key: String,

        /// Config file (default: ./commit-review.toml if present)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Output format
        #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Drop issues on files the revision does not modify
        #[arg(long)]
        ignore_files_not_modified: bool,

        /// Produce the summary comment even with no new issues
        #[arg(long)]
        comment_when_no_issues: bool,

        /// Issues listed one by one in the summary
        #[arg(long)]
        max_global_issues: Option<usize>,

        /// Name the commit status is published under
        #[arg(long)]
        status_name: Option<String>,

        /// Exit with code 1 when the status is failed
        #[arg(long)]
        fail_on_failed: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init { path } => init::run(&path),

        Commands::Publish {
            issues,
            diff,
            source_root,
            project_key,
            config,
            format,
            ignore_files_not_modified,
            comment_when_no_issues,
            max_global_issues,
            status_name,
            fail_on_failed,
        } => publish::run(publish::PublishArgs {
            issues,
            diff,
            source_root,
            project_key,
            config,
            format,
            ignore_files_not_modified,
            comment_when_no_issues,
            max_global_issues,
            status_name,
            fail_on_failed,
        }),
    }
}
