//! Error types for the pack build.

use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::glyph::GlyphError;
use crate::item::ItemError;
use crate::sound::SoundError;

/// Result type for pack build operations.
pub type PackResult<T> = Result<T, PackError>;

/// Errors that abort a pack build.
#[derive(Debug)]
pub enum PackError {
    /// The hand-authored source tree does not exist.
    SourceMissing(PathBuf),

    /// Failed to create a directory.
    CreateDirectoryFailed { path: PathBuf, source: io::Error },

    /// Failed to remove a directory before recreating it.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// Failed to read a file.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write, copy or move a file.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Walking a directory tree failed.
    TraversalFailed { path: PathBuf, reason: String },

    /// A generated JSON file could not be serialized.
    SerializeFailed {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Compression level outside 0-9.
    InvalidCompressionLevel(u32),

    /// Writing the zip archive failed.
    ArchiveFailed(String),

    /// Glyph loading or allocation failed.
    Glyph(GlyphError),

    /// Sound catalog loading failed.
    Sound(SoundError),

    /// Item loading or model generation failed.
    Item(ItemError),
}

impl fmt::Display for PackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackError::SourceMissing(path) => {
                write!(f, "source pack directory does not exist: {}", path.display())
            }
            PackError::CreateDirectoryFailed { path, source } => {
                write!(
                    f,
                    "failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            PackError::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            PackError::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            PackError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            PackError::TraversalFailed { path, reason } => {
                write!(f, "failed to walk {}: {}", path.display(), reason)
            }
            PackError::SerializeFailed { path, source } => {
                write!(f, "failed to serialize {}: {}", path.display(), source)
            }
            PackError::InvalidCompressionLevel(level) => {
                write!(f, "invalid compression level {} (expected 0-9)", level)
            }
            PackError::ArchiveFailed(msg) => {
                write!(f, "archive failed: {}", msg)
            }
            PackError::Glyph(e) => write!(f, "glyphs: {}", e),
            PackError::Sound(e) => write!(f, "sounds: {}", e),
            PackError::Item(e) => write!(f, "items: {}", e),
        }
    }
}

impl std::error::Error for PackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackError::CreateDirectoryFailed { source, .. } => Some(source),
            PackError::RemoveFailed { source, .. } => Some(source),
            PackError::ReadFailed { source, .. } => Some(source),
            PackError::WriteFailed { source, .. } => Some(source),
            PackError::SerializeFailed { source, .. } => Some(source),
            PackError::Glyph(e) => Some(e),
            PackError::Sound(e) => Some(e),
            PackError::Item(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GlyphError> for PackError {
    fn from(e: GlyphError) -> Self {
        PackError::Glyph(e)
    }
}

impl From<SoundError> for PackError {
    fn from(e: SoundError) -> Self {
        PackError::Sound(e)
    }
}

impl From<ItemError> for PackError {
    fn from(e: ItemError) -> Self {
        PackError::Item(e)
    }
}
