use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReclaimError {
    #[error("malformed size '{input}': {reason}")]
    MalformedSize { input: String, reason: String },

    #[error("inventory scan failed at {}", path.display())]
    Inventory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no mounted filesystem contains {}", .0.display())]
    FreeSpaceUnavailable(PathBuf),

    #[error("invalid rewrite pattern '{pattern}'")]
    Rewrite {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("remote control endpoint unavailable: {0}")]
    RemoteUnavailable(String),

    #[error("move dispatch failed for {path}: {reason}")]
    Dispatch { path: String, reason: String },

    #[error("invalid cron expression '{expression}': {reason}")]
    InvalidSchedule { expression: String, reason: String },

    #[error("http client error: {0}")]
    Http(String),
}

impl From<reqwest::Error> for ReclaimError {
    fn from(err: reqwest::Error) -> Self {
        ReclaimError::Http(err.to_string())
    }
}
