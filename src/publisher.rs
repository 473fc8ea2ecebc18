//! Turns the issues of one analysis run into a published review
//!
//! Two steps, so nothing is sent before everything is computed:
//! - [`Publisher::review`] walks the issues once, in the order supplied,
//!   and builds the line comments and the [`GlobalReport`].
//! - [`Publisher::publish`] hands the result to a [`ReviewClient`].
//!
//! Filtering happens at two levels. With `ignore_files_not_modified`, an
//! issue on a file the revision does not touch is dropped before anything
//! counts it. An issue on a touched file whose line is not visible in the
//! diff is still counted, and listed in the summary instead of inline.

use crate::client::{DiffContext, ReviewClient};
use crate::config::ReviewConfig;
use crate::error::{ReviewError, ReviewResult};
use crate::location::{FileLocationLookup, InputFile};
use crate::markdown::MarkdownFormatter;
use crate::models::Issue;
use crate::report::GlobalReport;
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Markdown fragments for one line, one per issue, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentBody {
    fragments: Vec<String>,
}

impl CommentBody {
    pub fn push(&mut self, fragment: String) {
        self.fragments.push(fragment);
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }

    /// Fragments joined, each terminated by a newline
    pub fn render(&self) -> String {
        let mut body = String::new();
        for fragment in &self.fragments {
            body.push_str(fragment);
            body.push('\n');
        }
        body
    }
}

/// Everything computed for one run, ready to publish
#[derive(Debug, Clone)]
pub struct Review {
    /// Line comments keyed by file and line, visited in path then line order
    pub comments: BTreeMap<(InputFile, u32), CommentBody>,
    pub report: GlobalReport,
}

/// Policy for one reporting pass
#[derive(Debug, Clone)]
pub struct Publisher {
    formatter: MarkdownFormatter,
    ignore_files_not_modified: bool,
    comment_when_no_issues: bool,
    max_global_issues: usize,
    status_name: String,
}

impl Publisher {
    pub fn new(formatter: MarkdownFormatter, config: &ReviewConfig) -> Self {
        Self {
            formatter,
            ignore_files_not_modified: config.ignore_files_not_modified,
            comment_when_no_issues: config.comment_when_no_issues,
            max_global_issues: config.max_global_issues,
            status_name: config.status_name.clone(),
        }
    }

    /// Build the formatter from the same settings. Fails when no base URL is configured.
    pub fn from_config(config: &ReviewConfig) -> ReviewResult<Self> {
        Ok(Self::new(MarkdownFormatter::from_config(config)?, config))
    }

    /// Classify every issue and render all comment text.
    ///
    /// Pre-existing issues are skipped. Every other issue that survives the
    /// modified-file filter reaches the report exactly once.
    pub fn review<D>(
        &self,
        issues: &[Issue],
        files: &FileLocationLookup,
        diff: &D,
    ) -> ReviewResult<Review>
    where
        D: DiffContext + ?Sized,
    {
        let mut comments: BTreeMap<(InputFile, u32), CommentBody> = BTreeMap::new();
        let mut report = GlobalReport::new(self.formatter.clone(), self.max_global_issues);
        let mut skipped_old = 0usize;
        let mut skipped_unmodified = 0usize;

        for issue in issues {
            if !issue.is_new {
                skipped_old += 1;
                continue;
            }

            let file = files.resolve(&issue.component_key);
            if self.ignore_files_not_modified {
                if let Some(file) = file.filter(|f| !diff.has_file(f)) {
                    debug!(
                        "Skipping {} on {}: file not modified",
                        issue.rule_key, file
                    );
                    skipped_unmodified += 1;
                    continue;
                }
            }

            let anchor = match (file, issue.line) {
                (Some(file), Some(line)) if diff.is_line_visible(file, line) => Some((file, line)),
                _ => None,
            };

            if let Some((file, line)) = anchor {
                let fragment =
                    self.formatter
                        .inline_issue(issue.severity, &issue.message, &issue.rule_key)?;
                comments
                    .entry((file.clone(), line))
                    .or_default()
                    .push(fragment);
            }

            let url = file.and_then(|f| diff.url_for(f, issue.line));
            report.process(issue, url.as_deref(), anchor.is_some())?;
        }

        info!(
            "Reviewed {} issues: {} new, {} inline on {} lines, {} pre-existing, {} on unmodified files",
            issues.len(),
            report.total_new(),
            report.total_inline_reported(),
            comments.len(),
            skipped_old,
            skipped_unmodified
        );

        Ok(Review { comments, report })
    }

    /// Send a computed review: line comments, then the summary, then the status.
    ///
    /// Stops at the first client failure. The review itself is left intact,
    /// so publishing it again is safe.
    pub fn publish<C>(&self, review: &Review, client: &mut C) -> ReviewResult<()>
    where
        C: ReviewClient + ?Sized,
    {
        for ((file, line), body) in &review.comments {
            if body.is_empty() {
                continue;
            }
            client
                .upsert_review_comment(file, *line, &body.render())
                .map_err(|source| ReviewError::ExternalClient {
                    operation: "update review comment",
                    source,
                })?;
        }

        if review.report.has_new_issue() || self.comment_when_no_issues {
            client
                .post_global_comment(&review.report.format_for_markdown())
                .map_err(|source| ReviewError::ExternalClient {
                    operation: "post global comment",
                    source,
                })?;
        }

        let status = review.report.status();
        let description = review.report.status_description();
        debug!("Setting status {} {}: {}", self.status_name, status, description);
        client
            .set_status(&self.status_name, status, &description)
            .map_err(|source| ReviewError::ExternalClient {
                operation: "set status",
                source,
            })?;

        Ok(())
    }

    /// Review then publish
    pub fn run<D, C>(
        &self,
        issues: &[Issue],
        files: &FileLocationLookup,
        diff: &D,
        client: &mut C,
    ) -> ReviewResult<Review>
    where
        D: DiffContext + ?Sized,
        C: ReviewClient + ?Sized,
    {
        let review = self.review(issues, files, diff)?;
        self.publish(&review, client)?;
        Ok(review)
    }
}
