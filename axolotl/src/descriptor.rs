//! Descriptor folder loading shared by glyphs and custom items.
//!
//! A descriptor folder holds JSON files, each containing an array of
//! descriptor objects. Loading follows the same rules for every kind:
//!
//! - Entries are visited in file-name order so codepoint allocation and
//!   override order are stable between builds.
//! - Directories and files without a `.json` extension are skipped with a
//!   warning.
//! - A missing folder yields no descriptors.
//! - Malformed JSON is fatal: the whole build aborts.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};

/// File extension recognized for descriptor files.
pub const DESCRIPTOR_EXTENSION: &str = "json";

/// Errors raised while loading descriptor files.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// The descriptor folder could not be listed.
    #[error("failed to list descriptor folder {}: {source}", .path.display())]
    ListFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file could not be read.
    #[error("failed to read descriptor {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A descriptor file is not a valid JSON array of descriptors.
    #[error("malformed descriptor {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Descriptors parsed from a single file.
#[derive(Debug, Clone)]
pub struct DescriptorFile<T> {
    /// Path of the file the descriptors came from.
    pub path: PathBuf,

    /// Descriptors in file order.
    pub entries: Vec<T>,
}

/// Load every descriptor file in `dir`.
///
/// `kind` is only used for log messages ("glyph", "item").
pub fn load_dir<T: DeserializeOwned>(
    dir: &Path,
    kind: &str,
) -> Result<Vec<DescriptorFile<T>>, DescriptorError> {
    if !dir.exists() {
        debug!(path = %dir.display(), "No {} folder, nothing to load", kind);
        return Ok(Vec::new());
    }

    let mut paths = Vec::new();
    let entries = fs::read_dir(dir).map_err(|e| DescriptorError::ListFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;
    for entry in entries {
        let entry = entry.map_err(|e| DescriptorError::ListFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
        paths.push(entry.path());
    }
    paths.sort();

    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            warn!(
                path = %path.display(),
                "Directories for {} descriptors are not supported, skipping", kind
            );
            continue;
        }

        if !has_descriptor_extension(&path) {
            warn!(
                path = %path.display(),
                "Skipping {} file as it does not end with '.{}'", kind, DESCRIPTOR_EXTENSION
            );
            continue;
        }

        let entries = parse_file(&path)?;
        debug!(path = %path.display(), count = entries.len(), "Loaded {} descriptors", kind);
        files.push(DescriptorFile { path, entries });
    }

    Ok(files)
}

/// Parse a single descriptor file holding a JSON array.
pub fn parse_file<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, DescriptorError> {
    let content = fs::read_to_string(path).map_err(|e| DescriptorError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    serde_json::from_str(&content).map_err(|e| DescriptorError::Malformed {
        path: path.to_path_buf(),
        source: e,
    })
}

fn has_descriptor_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == DESCRIPTOR_EXTENSION)
        .unwrap_or(false)
}
