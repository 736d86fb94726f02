//! Archive packaging for pack distribution.
//!
//! Compresses the staging tree into a zip archive. Entries are written in
//! sorted traversal order with a fixed timestamp and mode, so an unchanged
//! staging tree always produces a byte-identical archive.

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::{Component, Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, DateTime, ZipWriter};

use super::{PackError, PackResult};
use crate::config::MAX_COMPRESSION_LEVEL;

/// Buffer size for reading files during checksum calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// Permission bits recorded for every entry.
const ENTRY_MODE: u32 = 0o644;

/// Result of building an archive.
#[derive(Debug, Clone)]
pub struct PackArtifact {
    /// Full path to the archive.
    pub path: PathBuf,

    /// Size of the archive in bytes.
    pub size: u64,

    /// SHA-256 checksum of the archive.
    pub checksum: String,

    /// Number of file entries written.
    pub file_count: usize,
}

/// Package `staging_root` into `archive_path` and remove the staging tree.
///
/// When packaging fails the staging tree is left in place for inspection.
/// Failing to remove it after a successful build only logs a warning.
pub fn pack(staging_root: &Path, archive_path: &Path, level: u32) -> PackResult<PackArtifact> {
    let artifact = build_archive(staging_root, archive_path, level)?;

    if let Err(e) = fs::remove_dir_all(staging_root) {
        warn!(
            path = %staging_root.display(),
            error = %e,
            "Failed to remove staging directory"
        );
    }

    Ok(artifact)
}

/// Build a zip archive of `staging_root` at `archive_path`.
///
/// The archive is written next to its destination and renamed into place,
/// so a failed build never leaves a truncated archive at `archive_path`.
pub fn build_archive(
    staging_root: &Path,
    archive_path: &Path,
    level: u32,
) -> PackResult<PackArtifact> {
    let options = entry_options(level)?;

    if !staging_root.is_dir() {
        return Err(PackError::SourceMissing(staging_root.to_path_buf()));
    }

    if let Some(parent) = archive_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|e| PackError::CreateDirectoryFailed {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
    }

    let tmp_path = archive_path.with_extension("zip.tmp");
    let file_count = match write_zip(staging_root, &tmp_path, options) {
        Ok(count) => count,
        Err(e) => {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }
    };
    fs::rename(&tmp_path, archive_path).map_err(|e| PackError::WriteFailed {
        path: archive_path.to_path_buf(),
        source: e,
    })?;

    let size = fs::metadata(archive_path)
        .map_err(|e| PackError::ReadFailed {
            path: archive_path.to_path_buf(),
            source: e,
        })?
        .len();
    let checksum = calculate_sha256(archive_path)?;

    info!(
        path = %archive_path.display(),
        size,
        files = file_count,
        sha256 = %checksum,
        "Built pack archive"
    );

    Ok(PackArtifact {
        path: archive_path.to_path_buf(),
        size,
        checksum,
        file_count,
    })
}

/// Zip options for a compression level: 0 stores, 1-9 deflate.
fn entry_options(level: u32) -> PackResult<SimpleFileOptions> {
    if level > MAX_COMPRESSION_LEVEL {
        return Err(PackError::InvalidCompressionLevel(level));
    }

    let options = SimpleFileOptions::default()
        .last_modified_time(DateTime::default())
        .unix_permissions(ENTRY_MODE);

    Ok(if level == 0 {
        options.compression_method(CompressionMethod::Stored)
    } else {
        options
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(level as i64))
    })
}

fn write_zip(root: &Path, output: &Path, options: SimpleFileOptions) -> PackResult<usize> {
    let file = File::create(output).map_err(|e| PackError::WriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;
    let mut zip = ZipWriter::new(BufWriter::new(file));
    let mut file_count = 0;

    for entry in WalkDir::new(root)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| PackError::TraversalFailed {
            path: e.path().unwrap_or(root).to_path_buf(),
            reason: e.to_string(),
        })?;
        let name = entry_name(root, entry.path())?;

        if entry.file_type().is_dir() {
            zip.add_directory(format!("{}/", name), options)
                .map_err(|e| PackError::ArchiveFailed(format!("{}: {}", name, e)))?;
            continue;
        }

        zip.start_file(name.as_str(), options)
            .map_err(|e| PackError::ArchiveFailed(format!("{}: {}", name, e)))?;
        let mut source = File::open(entry.path()).map_err(|e| PackError::ReadFailed {
            path: entry.path().to_path_buf(),
            source: e,
        })?;
        io::copy(&mut source, &mut zip).map_err(|e| PackError::WriteFailed {
            path: output.to_path_buf(),
            source: e,
        })?;
        file_count += 1;
    }

    let mut writer = zip
        .finish()
        .map_err(|e| PackError::ArchiveFailed(e.to_string()))?;
    writer.flush().map_err(|e| PackError::WriteFailed {
        path: output.to_path_buf(),
        source: e,
    })?;

    Ok(file_count)
}

/// Archive entry name: the path relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> PackResult<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|e| PackError::TraversalFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => parts.push(part.to_string_lossy().into_owned()),
            _ => {
                return Err(PackError::ArchiveFailed(format!(
                    "unexpected path component in {}",
                    relative.display()
                )))
            }
        }
    }
    Ok(parts.join("/"))
}

/// Calculate the SHA-256 checksum of a file as lowercase hex.
pub fn calculate_sha256(path: &Path) -> PackResult<String> {
    let mut file = File::open(path).map_err(|e| PackError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    loop {
        let bytes_read = file.read(&mut buffer).map_err(|e| PackError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use zip::ZipArchive;

    fn staging_tree(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("pack-prod");
        let textures = root.join("assets/minecraft/textures/item");
        fs::create_dir_all(&textures).unwrap();
        fs::write(textures.join("ruby.png"), vec![7u8; 4096]).unwrap();
        fs::write(root.join("pack.mcmeta"), r#"{"pack":{"pack_format":9}}"#).unwrap();
        root
    }

    fn entry_names(path: &Path) -> Vec<String> {
        let archive = ZipArchive::new(File::open(path).unwrap()).unwrap();
        let mut names: Vec<String> = archive.file_names().map(str::to_string).collect();
        names.sort();
        names
    }

    #[test]
    fn test_pack_writes_archive_and_removes_staging() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);
        let archive = temp.path().join("pack.zip");

        let artifact = pack(&root, &archive, 9).unwrap();

        assert!(!root.exists());
        assert_eq!(artifact.path, archive);
        assert_eq!(artifact.file_count, 2);
        assert_eq!(artifact.checksum.len(), 64);
        assert!(artifact.size > 0);
        assert!(!archive.with_extension("zip.tmp").exists());

        let names = entry_names(&archive);
        assert!(names.contains(&"pack.mcmeta".to_string()));
        assert!(names.contains(&"assets/minecraft/textures/item/ruby.png".to_string()));
        assert!(names.contains(&"assets/".to_string()));
    }

    #[test]
    fn test_contents_round_trip() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);
        let archive = temp.path().join("pack.zip");
        build_archive(&root, &archive, 0).unwrap();

        let mut zip = ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        let mut content = String::new();
        zip.by_name("pack.mcmeta")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, r#"{"pack":{"pack_format":9}}"#);
    }

    #[test]
    fn test_identical_trees_give_identical_archives() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);

        let first = build_archive(&root, &temp.path().join("a.zip"), 6).unwrap();
        let second = build_archive(&root, &temp.path().join("b.zip"), 6).unwrap();

        assert_eq!(first.checksum, second.checksum);
    }

    #[test]
    fn test_higher_level_compresses_better_than_store() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);

        let stored = build_archive(&root, &temp.path().join("stored.zip"), 0).unwrap();
        let deflated = build_archive(&root, &temp.path().join("deflated.zip"), 9).unwrap();

        assert!(deflated.size < stored.size);
    }

    #[test]
    fn test_invalid_level_keeps_staging() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);
        let archive = temp.path().join("pack.zip");

        let err = pack(&root, &archive, 10).unwrap_err();

        assert!(matches!(err, PackError::InvalidCompressionLevel(10)));
        assert!(root.exists());
        assert!(!archive.exists());
    }

    #[test]
    fn test_missing_staging_tree() {
        let temp = TempDir::new().unwrap();
        let err = pack(&temp.path().join("absent"), &temp.path().join("pack.zip"), 9).unwrap_err();
        assert!(matches!(err, PackError::SourceMissing(_)));
    }

    #[test]
    fn test_replaces_existing_archive() {
        let temp = TempDir::new().unwrap();
        let root = staging_tree(&temp);
        let archive = temp.path().join("pack.zip");
        fs::write(&archive, "stale").unwrap();

        build_archive(&root, &archive, 9).unwrap();
        assert!(ZipArchive::new(File::open(&archive).unwrap()).is_ok());
    }

    #[test]
    fn test_entry_name_uses_forward_slashes() {
        let root = Path::new("/stage");
        let name = entry_name(root, &root.join("assets").join("minecraft").join("a.json")).unwrap();
        assert_eq!(name, "assets/minecraft/a.json");
    }
}
