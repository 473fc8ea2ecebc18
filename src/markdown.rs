//! Markdown fragments for review comments
//!
//! Every comment line follows the same shape: a severity emoji shortcode,
//! the issue message, and a link to the rule documentation on the analysis
//! server. Shortcodes are used instead of unicode emoji so that GitLab and
//! GitHub both render them.

use crate::config::ReviewConfig;
use crate::error::{require, ReviewError, ReviewResult};
use crate::models::Severity;
use url::{form_urlencoded, Url};

/// Marker for severities outside the known table
pub const FALLBACK_EMOJI: &str = ":grey_question:";

/// Markdown emoji shortcode for a severity
pub fn emoji_for_severity(severity: Severity) -> &'static str {
    match severity {
        Severity::Blocker => ":no_entry:",
        Severity::Critical => ":no_entry_sign:",
        Severity::Major => ":warning:",
        Severity::Minor => ":arrow_down_small:",
        Severity::Info => ":information_source:",
        _ => FALLBACK_EMOJI,
    }
}

/// UTF-8 form-encode a value for use in a URL.
///
/// ASCII alphanumerics and `.-*_` are kept, a space becomes `+`, every other
/// byte becomes `%XX`.
pub fn encode_for_url(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

/// Builds comment text with rule links pointing at one analysis server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownFormatter {
    /// Base URL, always ending with exactly one `/`
    rule_url_prefix: String,
}

impl MarkdownFormatter {
    /// Create a formatter for the server at `base_url`.
    pub fn new(base_url: &str) -> ReviewResult<Self> {
        let trimmed = base_url.trim();
        if trimmed.is_empty() {
            return Err(ReviewError::Configuration(
                "base URL must not be empty".to_string(),
            ));
        }
        // Validate only; the configured spelling is kept as-is in links.
        Url::parse(trimmed).map_err(|e| {
            ReviewError::Configuration(format!("invalid base URL '{}': {}", trimmed, e))
        })?;

        Ok(Self {
            rule_url_prefix: format!("{}/", trimmed.trim_end_matches('/')),
        })
    }

    /// Create a formatter from settings. The public base URL wins over the
    /// instance URL. Blank values count as unset.
    pub fn from_config(config: &ReviewConfig) -> ReviewResult<Self> {
        let base_url = non_blank(&config.public_base_url)
            .or_else(|| non_blank(&config.instance_base_url))
            .ok_or_else(|| {
                ReviewError::Configuration(
                    "A base URL must be provided with the setting public_base_url or instance_base_url"
                        .to_string(),
                )
            })?;
        Self::new(base_url)
    }

    pub fn rule_url_prefix(&self) -> &str {
        &self.rule_url_prefix
    }

    /// Markdown link to the documentation of a coding rule
    pub fn rule_link(&self, rule_key: &str) -> ReviewResult<String> {
        require(rule_key, "rule_key")?;
        Ok(format!(
            "[:blue_book:]({}coding_rules#rule_key={})",
            self.rule_url_prefix,
            encode_for_url(rule_key)
        ))
    }

    /// One issue as shown in a comment anchored to its line
    pub fn inline_issue(
        &self,
        severity: Severity,
        message: &str,
        rule_key: &str,
    ) -> ReviewResult<String> {
        require(message, "message")?;
        let rule_link = self.rule_link(rule_key)?;
        Ok(format!(
            "{} {} {}",
            emoji_for_severity(severity),
            message,
            rule_link
        ))
    }

    /// One issue as listed in the summary comment.
    ///
    /// Links the message to `url` when the issue has a browsable location,
    /// otherwise names the component it was raised on.
    pub fn global_issue(
        &self,
        severity: Severity,
        message: &str,
        rule_key: &str,
        url: Option<&str>,
        component_key: &str,
    ) -> ReviewResult<String> {
        require(message, "message")?;
        require(component_key, "component_key")?;
        let rule_link = self.rule_link(rule_key)?;

        let emoji = emoji_for_severity(severity);
        Ok(match url {
            Some(url) => format!("{} [{}]({}) {}", emoji, message, url, rule_link),
            None => format!("{} {} ({}) {}", emoji, message, component_key, rule_link),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}
