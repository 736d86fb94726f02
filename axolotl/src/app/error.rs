//! Application error types.

use std::fmt;

use crate::config::ConfigError;
use crate::pack::PackError;
use crate::publisher::PublishError;

/// Errors surfaced by [`PackService`](super::PackService).
#[derive(Debug)]
pub enum AppError {
    /// Loading, creating or validating the configuration failed.
    Config(ConfigError),

    /// The pack build failed.
    Build(PackError),

    /// The publisher could not be set up.
    Publisher(PublishError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Build(e) => write!(f, "Pack build failed: {}", e),
            AppError::Publisher(e) => write!(f, "Publisher error: {}", e),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(e) => Some(e),
            AppError::Build(e) => Some(e),
            AppError::Publisher(e) => Some(e),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<PackError> for AppError {
    fn from(e: PackError) -> Self {
        AppError::Build(e)
    }
}

impl From<PublishError> for AppError {
    fn from(e: PublishError) -> Self {
        AppError::Publisher(e)
    }
}
