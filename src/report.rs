//! Summary of one analysis run
//!
//! Counts every new issue by severity, keeps a capped list of the issues
//! that could not be shown inline, and derives the revision status.

use crate::capped::CappedBuffer;
use crate::error::ReviewResult;
use crate::markdown::{emoji_for_severity, MarkdownFormatter};
use crate::models::{Issue, Severity, Status};

/// Per-severity tallies
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeverityCounts {
    pub blocker: usize,
    pub critical: usize,
    pub major: usize,
    pub minor: usize,
    pub info: usize,
}

impl SeverityCounts {
    fn increment(&mut self, severity: Severity) {
        match severity {
            Severity::Blocker => self.blocker += 1,
            Severity::Critical => self.critical += 1,
            Severity::Major => self.major += 1,
            Severity::Minor => self.minor += 1,
            Severity::Info => self.info += 1,
            Severity::Unknown => {}
        }
    }

    pub fn get(&self, severity: Severity) -> usize {
        match severity {
            Severity::Blocker => self.blocker,
            Severity::Critical => self.critical,
            Severity::Major => self.major,
            Severity::Minor => self.minor,
            Severity::Info => self.info,
            Severity::Unknown => 0,
        }
    }

    /// Known severities with a non-zero count, most severe first
    fn non_zero(&self) -> impl Iterator<Item = (Severity, usize)> + '_ {
        Severity::ALL
            .into_iter()
            .map(|s| (s, self.get(s)))
            .filter(|(_, n)| *n > 0)
    }
}

/// Aggregated state for the summary comment and the status.
///
/// Created fresh for each run and fed every surviving issue exactly once.
#[derive(Debug, Clone)]
pub struct GlobalReport {
    formatter: MarkdownFormatter,
    counts: SeverityCounts,
    total_new: usize,
    total_inline_reported: usize,
    not_inline: CappedBuffer<String>,
}

impl GlobalReport {
    pub fn new(formatter: MarkdownFormatter, max_global_issues: usize) -> Self {
        Self {
            formatter,
            counts: SeverityCounts::default(),
            total_new: 0,
            total_inline_reported: 0,
            not_inline: CappedBuffer::new(max_global_issues),
        }
    }

    /// Account for one new issue.
    ///
    /// Issues already shown inline are only counted. The others are rendered
    /// for the summary list while it has room, and counted as overflow after.
    pub fn process(
        &mut self,
        issue: &Issue,
        url: Option<&str>,
        reported_inline: bool,
    ) -> ReviewResult<()> {
        if reported_inline {
            self.total_inline_reported += 1;
        } else {
            // Validate overflowed issues too.
            let entry = self.formatter.global_issue(
                issue.severity,
                &issue.message,
                &issue.rule_key,
                url,
                &issue.component_key,
            )?;
            self.not_inline.push(entry);
        }

        self.counts.increment(issue.severity);
        self.total_new += 1;
        Ok(())
    }

    pub fn has_new_issue(&self) -> bool {
        self.total_new > 0
    }

    pub fn counts(&self) -> &SeverityCounts {
        &self.counts
    }

    pub fn total_new(&self) -> usize {
        self.total_new
    }

    pub fn total_inline_reported(&self) -> usize {
        self.total_inline_reported
    }

    /// Summary entries rendered individually, in processing order
    pub fn global_entries(&self) -> &[String] {
        self.not_inline.items()
    }

    /// Issues not shown inline that did not fit in the summary list
    pub fn overflow(&self) -> usize {
        self.not_inline.overflow()
    }

    pub fn status(&self) -> Status {
        if self.counts.blocker > 0 || self.counts.critical > 0 {
            Status::Failed
        } else {
            Status::Ok
        }
    }

    /// One-line description attached to the status
    pub fn status_description(&self) -> String {
        if !self.has_new_issue() {
            return "Analysis reported no issues".to_string();
        }

        let mut description = format!(
            "Analysis reported {} {}",
            self.total_new,
            plural(self.total_new, "issue", "issues")
        );
        let breakdown: Vec<String> = self
            .counts
            .non_zero()
            .map(|(severity, n)| format!("{} {}", n, severity))
            .collect();
        if !breakdown.is_empty() {
            description.push_str(", with ");
            description.push_str(&breakdown.join(", "));
        }
        description
    }

    /// Render the summary comment
    pub fn format_for_markdown(&self) -> String {
        let mut md = String::new();

        if !self.has_new_issue() {
            md.push_str("Analysis reported no issues.\n");
            return md;
        }

        md.push_str(&format!(
            "Analysis reported {} {}\n\n",
            self.total_new,
            plural(self.total_new, "issue", "issues")
        ));
        for (severity, n) in self.counts.non_zero() {
            md.push_str(&format!(
                "* {} {} {}\n",
                emoji_for_severity(severity),
                n,
                severity
            ));
        }

        if self.total_inline_reported > 0 {
            md.push_str("\nWatch the comments in this conversation to review them.\n");
        }

        let not_inline = self.not_inline.total();
        if not_inline > 0 {
            md.push_str(&format!(
                "\n#### {} extra {}\n\nThe following issues could not be reported as comments because they are located on lines that are not displayed in this revision:\n\n",
                not_inline,
                plural(not_inline, "issue", "issues")
            ));
            for (i, entry) in self.not_inline.iter().enumerate() {
                md.push_str(&format!("{}. {}\n", i + 1, entry));
            }
            if self.overflow() > 0 {
                md.push_str(&format!("* ... {} more\n", self.overflow()));
            }
        }

        md
    }
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(max: usize) -> GlobalReport {
        GlobalReport::new(MarkdownFormatter::new("http://sonar").unwrap(), max)
    }

    fn issue(severity: Severity, message: &str) -> Issue {
        Issue {
            severity,
            message: message.to_string(),
            rule_key: "squid:S1".to_string(),
            component_key: "proj:src/a.rs".to_string(),
            line: Some(1),
            is_new: true,
        }
    }

    #[test]
    fn test_empty_report() {
        let r = report(10);
        assert!(!r.has_new_issue());
        assert_eq!(r.status(), Status::Ok);
        assert_eq!(r.status_description(), "Analysis reported no issues");
        assert_eq!(r.format_for_markdown(), "Analysis reported no issues.\n");
    }

    #[test]
    fn test_critical_fails_status() {
        let mut r = report(10);
        r.process(&issue(Severity::Critical, "a"), None, true).unwrap();
        assert_eq!(r.status(), Status::Failed);
        assert_eq!(r.status_description(), "Analysis reported 1 issue, with 1 critical");
    }

    #[test]
    fn test_blocker_fails_status() {
        let mut r = report(10);
        r.process(&issue(Severity::Blocker, "a"), None, false).unwrap();
        assert_eq!(r.status(), Status::Failed);
    }

    #[test]
    fn test_minor_and_info_pass() {
        let mut r = report(10);
        r.process(&issue(Severity::Minor, "a"), None, false).unwrap();
        r.process(&issue(Severity::Info, "b"), None, true).unwrap();
        r.process(&issue(Severity::Info, "c"), None, true).unwrap();
        assert_eq!(r.status(), Status::Ok);
        assert_eq!(
            r.status_description(),
            "Analysis reported 3 issues, with 1 minor, 2 info"
        );
    }

    #[test]
    fn test_description_orders_by_severity() {
        let mut r = report(10);
        for s in [Severity::Info, Severity::Major, Severity::Blocker, Severity::Major] {
            r.process(&issue(s, "x"), None, true).unwrap();
        }
        assert_eq!(
            r.status_description(),
            "Analysis reported 4 issues, with 1 blocker, 2 major, 1 info"
        );
    }

    #[test]
    fn test_inline_issues_not_listed() {
        let mut r = report(10);
        r.process(&issue(Severity::Major, "inline one"), None, true).unwrap();
        r.process(&issue(Severity::Major, "global one"), Some("https://x/a.rs#L1"), false)
            .unwrap();

        assert_eq!(r.total_new(), 2);
        assert_eq!(r.total_inline_reported(), 1);
        assert_eq!(r.global_entries().len(), 1);
        assert!(r.global_entries()[0].contains("[global one](https://x/a.rs#L1)"));
    }

    #[test]
    fn test_capping_keeps_totals() {
        let mut r = report(2);
        for i in 0..5 {
            r.process(&issue(Severity::Major, &format!("issue {}", i)), None, false)
                .unwrap();
        }

        assert_eq!(r.global_entries().len(), 2);
        assert_eq!(r.overflow(), 3);
        assert_eq!(r.total_new(), 5);
        assert_eq!(r.counts().major, 5);

        let md = r.format_for_markdown();
        assert!(md.contains("1. :warning: issue 0 (proj:src/a.rs)"));
        assert!(md.contains("2. :warning: issue 1 (proj:src/a.rs)"));
        assert!(!md.contains("issue 2"));
        assert!(md.contains("* ... 3 more\n"));
        assert!(md.contains("#### 5 extra issues"));
    }

    #[test]
    fn test_unknown_severity_counts_toward_total_only() {
        let mut r = report(10);
        r.process(&issue(Severity::Unknown, "odd"), None, false).unwrap();
        assert_eq!(r.total_new(), 1);
        assert_eq!(r.counts(), &SeverityCounts::default());
        assert_eq!(r.status(), Status::Ok);
        assert_eq!(r.status_description(), "Analysis reported 1 issue");
        assert!(r.global_entries()[0].starts_with(":grey_question: odd"));
    }

    #[test]
    fn test_markdown_layout() {
        let mut r = report(10);
        r.process(&issue(Severity::Critical, "inline"), None, true).unwrap();
        r.process(&issue(Severity::Minor, "elsewhere"), None, false).unwrap();

        let expected = "Analysis reported 2 issues\n\n\
* :no_entry_sign: 1 critical\n\
* :arrow_down_small: 1 minor\n\
\n\
Watch the comments in this conversation to review them.\n\
\n\
#### 1 extra issue\n\
\n\
The following issues could not be reported as comments because they are located on lines that are not displayed in this revision:\n\
\n\
1. :arrow_down_small: elsewhere (proj:src/a.rs) [:blue_book:](http://sonar/coding_rules#rule_key=squid%3AS1)\n";
        assert_eq!(r.format_for_markdown(), expected);
    }

    #[test]
    fn test_validation_error_surfaces_even_when_full() {
        let mut r = report(0);
        let mut bad = issue(Severity::Major, "m");
        bad.rule_key.clear();
        assert!(r.process(&bad, None, false).is_err());
        assert_eq!(r.total_new(), 0);
    }
}
