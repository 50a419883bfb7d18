use std::time::Duration;

use thiserror::Error;

/// Failures that keep a request from producing a status code.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Invalid URL `{url}`: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Request timed out after {after:?}: {source}")]
    Timeout {
        after: Duration,
        #[source]
        source: reqwest::Error,
    },

    #[error("Connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error("Request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Failed to read response: {0}")]
    ReadBody(#[source] reqwest::Error),

    #[error("Failed to write report `{path}`: {reason}")]
    Report { path: String, reason: String },
}

impl ProbeError {
    pub fn from_send(err: reqwest::Error, timeout: Duration) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout {
                after: timeout,
                source: err,
            }
        } else if err.is_connect() {
            ProbeError::Connect(err)
        } else {
            ProbeError::Transport(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbeError>;
