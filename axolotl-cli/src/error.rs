//! CLI error type and exit handling.

use std::fmt;

use axolotl::app::AppError;
use axolotl::config::ConfigError;
use axolotl::glyph::GlyphError;
use axolotl::logging::LoggingError;

/// Errors reported by CLI commands.
#[derive(Debug)]
pub enum CliError {
    /// Configuration could not be read or is unusable.
    Config(String),

    /// Building or publishing the pack failed.
    App(AppError),

    /// A background task panicked or was cancelled.
    Task(String),

    /// Glyph descriptors could not be loaded.
    Glyph(GlyphError),

    /// Logging could not be initialized.
    Logging(LoggingError),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::Config(msg) => write!(f, "{}", msg),
            CliError::App(e) => write!(f, "{}", e),
            CliError::Task(msg) => write!(f, "Task failed: {}", msg),
            CliError::Glyph(e) => write!(f, "Glyph error: {}", e),
            CliError::Logging(e) => write!(f, "Logging error: {}", e),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Print the error to stderr and exit with a failure status.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);
        std::process::exit(1);
    }
}

impl From<AppError> for CliError {
    fn from(e: AppError) -> Self {
        CliError::App(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<GlyphError> for CliError {
    fn from(e: GlyphError) -> Self {
        CliError::Glyph(e)
    }
}

impl From<LoggingError> for CliError {
    fn from(e: LoggingError) -> Self {
        CliError::Logging(e)
    }
}
