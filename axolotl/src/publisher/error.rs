//! Error types for the publisher module.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::config::ConfigError;

/// Result type for publisher operations.
pub type PublishResult<T> = Result<T, PublishError>;

/// Errors that can occur while publishing a pack.
#[derive(Debug)]
pub enum PublishError {
    /// The archive could not be read before upload.
    ArchiveRead { path: PathBuf, source: io::Error },

    /// Bucket URL configuration error.
    InvalidUrl(String),

    /// Transport-level HTTP failure.
    Http(String),

    /// The bucket answered with a non-success status.
    UnexpectedStatus { url: String, status: u16 },

    /// The bucket answered without a hash.
    EmptyResponse,

    /// The bucket answered with a hash that cannot be placed in a URL.
    InvalidHash(String),

    /// Publishing was requested outside a Tokio runtime.
    NoRuntime,

    /// The new pack reference could not be persisted.
    Config(ConfigError),

    /// The upload task panicked or was aborted.
    TaskFailed(String),
}

impl fmt::Display for PublishError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishError::ArchiveRead { path, source } => {
                write!(f, "failed to read archive {}: {}", path.display(), source)
            }
            PublishError::InvalidUrl(msg) => {
                write!(f, "invalid URL: {}", msg)
            }
            PublishError::Http(msg) => {
                write!(f, "HTTP request failed: {}", msg)
            }
            PublishError::UnexpectedStatus { url, status } => {
                write!(f, "upload to {} failed with HTTP {}", url, status)
            }
            PublishError::EmptyResponse => {
                write!(f, "bucket returned an empty hash")
            }
            PublishError::InvalidHash(hash) => {
                write!(f, "bucket returned an unusable hash '{}'", hash)
            }
            PublishError::NoRuntime => {
                write!(f, "no Tokio runtime available for the upload task")
            }
            PublishError::Config(e) => {
                write!(f, "failed to persist pack reference: {}", e)
            }
            PublishError::TaskFailed(msg) => {
                write!(f, "upload task failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for PublishError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PublishError::ArchiveRead { source, .. } => Some(source),
            PublishError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for PublishError {
    fn from(e: ConfigError) -> Self {
        PublishError::Config(e)
    }
}
