//! Seams to the code hosting platform
//!
//! The publisher never talks to the network itself. It asks a
//! [`DiffContext`] which files and lines the revision shows, and hands
//! finished comments to a [`ReviewClient`].

use crate::location::InputFile;
use crate::models::Status;
use anyhow::Result;
use serde::Serialize;

/// What the revision under review shows
pub trait DiffContext {
    /// Whether `file` is part of the revision's changed files
    fn has_file(&self, file: &InputFile) -> bool;

    /// Whether `line` of `file` is visible in the revision's diff, so a comment can anchor to it
    fn is_line_visible(&self, file: &InputFile, line: u32) -> bool;

    /// Browsable URL for a file, optionally at a line
    fn url_for(&self, file: &InputFile, line: Option<u32>) -> Option<String>;
}

/// Where the finished review goes
///
/// Every call may fail; the publisher stops at the first failure and
/// reports it to its caller.
pub trait ReviewClient {
    /// Create the comment on `file:line`, or replace the one posted by an earlier run
    fn upsert_review_comment(&mut self, file: &InputFile, line: u32, body: &str) -> Result<()>;

    fn post_global_comment(&mut self, body: &str) -> Result<()>;

    /// Set the commit status published under `name`
    fn set_status(&mut self, name: &str, status: Status, description: &str) -> Result<()>;
}

/// A line comment as it would be posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedComment {
    pub file: InputFile,
    pub line: u32,
    pub body: String,
}

/// A status update as it would be posted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordedStatus {
    pub name: String,
    pub status: Status,
    pub description: String,
}

/// Review client that keeps every call instead of sending it.
///
/// Used for dry runs: the CLI prints what was recorded.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RecordingClient {
    pub comments: Vec<RecordedComment>,
    pub global_comments: Vec<String>,
    pub statuses: Vec<RecordedStatus>,
}

impl RecordingClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last status set, if any
    pub fn status(&self) -> Option<&RecordedStatus> {
        self.statuses.last()
    }
}

impl ReviewClient for RecordingClient {
    fn upsert_review_comment(&mut self, file: &InputFile, line: u32, body: &str) -> Result<()> {
        match self
            .comments
            .iter_mut()
            .find(|c| c.file == *file && c.line == line)
        {
            Some(existing) => existing.body = body.to_string(),
            None => self.comments.push(RecordedComment {
                file: file.clone(),
                line,
                body: body.to_string(),
            }),
        }
        Ok(())
    }

    fn post_global_comment(&mut self, body: &str) -> Result<()> {
        self.global_comments.push(body.to_string());
        Ok(())
    }

    fn set_status(&mut self, name: &str, status: Status, description: &str) -> Result<()> {
        self.statuses.push(RecordedStatus {
            name: name.to_string(),
            status,
            description: description.to_string(),
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upsert_overwrites_same_line() {
        let mut client = RecordingClient::new();
        let file = InputFile::new("src/a.rs");
        client.upsert_review_comment(&file, 3, "first\n").unwrap();
        client.upsert_review_comment(&file, 4, "other\n").unwrap();
        client.upsert_review_comment(&file, 3, "second\n").unwrap();

        assert_eq!(client.comments.len(), 2);
        assert_eq!(client.comments[0].body, "second\n");
        assert_eq!(client.comments[1].line, 4);
    }

    #[test]
    fn test_status_is_last_set() {
        let mut client = RecordingClient::new();
        assert!(client.status().is_none());
        client.set_status("sonarqube", Status::Ok, "fine").unwrap();
        client.set_status("sonarqube", Status::Failed, "broken").unwrap();
        assert_eq!(client.status().unwrap().status, Status::Failed);
        assert_eq!(client.status().unwrap().name, "sonarqube");
        assert_eq!(client.statuses.len(), 2);
    }
}
