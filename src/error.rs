//! Errors raised while building or publishing a review

use thiserror::Error;

/// Errors that can occur while reporting an analysis run
#[derive(Error, Debug)]
pub enum ReviewError {
    /// Settings that make the formatter or publisher unusable
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A required formatting argument was empty. Signals a caller bug.
    #[error("{argument} must not be empty")]
    Validation { argument: &'static str },

    /// The review client failed; retry policy belongs to the caller
    #[error("Review client failed to {operation}: {source}")]
    ExternalClient {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

pub type ReviewResult<T> = Result<T, ReviewError>;

/// Fail with a validation error when `value` is empty.
pub(crate) fn require(value: &str, argument: &'static str) -> ReviewResult<()> {
    if value.is_empty() {
        Err(ReviewError::Validation { argument })
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_message_names_argument() {
        let err = require("", "rule_key").unwrap_err();
        assert_eq!(err.to_string(), "rule_key must not be empty");
        assert!(require("squid:S1", "rule_key").is_ok());
    }

    #[test]
    fn test_external_client_keeps_source() {
        let err = ReviewError::ExternalClient {
            operation: "set status",
            source: anyhow::anyhow!("502 Bad Gateway"),
        };
        assert_eq!(err.to_string(), "Review client failed to set status: 502 Bad Gateway");
        assert!(std::error::Error::source(&err).is_some());
    }
}
