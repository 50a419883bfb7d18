//! # Run log
//!
//! Records every request a run issued, in order, for the JSON report.

use serde::Serialize;

use crate::http::method::HttpMethod;

/// A single executed request and how it ended.
#[derive(Debug, Clone, Serialize)]
pub struct LogEntry {
    pub name: String,
    pub method: HttpMethod,
    pub url: String,
    pub expected_status: u16,
    pub status: Option<u16>,
    pub duration_ms: Option<u128>,
    pub passed: bool,
    pub error: Option<String>,
}

/// Requests in the order they were run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct RunLog {
    entries: Vec<LogEntry>,
}

impl RunLog {
    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries that did not pass, oldest first.
    pub fn failures(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries().iter().filter(|entry| !entry.passed)
    }
}
