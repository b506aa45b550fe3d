//! Error types for tool-cache

use thiserror::Error;

/// Errors that can occur while provisioning a tool
#[derive(Error, Debug)]
pub enum ToolCacheError {
    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(String),

    /// Server answered with a non-success status
    #[error("download of {url} failed with status {status}")]
    DownloadFailed { url: String, status: u16 },

    /// Downloaded archive does not match the pinned digest
    #[error("checksum mismatch for {tool}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        tool: String,
        expected: String,
        actual: String,
    },

    /// Archive could not be unpacked
    #[error("failed to extract {archive}: {reason}")]
    Extraction { archive: String, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for ToolCacheError {
    fn from(err: reqwest::Error) -> Self {
        ToolCacheError::Http(err.to_string())
    }
}
