//! Staging: merging authored assets with generated files.
//!
//! The staging tree is rebuilt from scratch on every build:
//!
//! 1. The previous staging directory, if any, is removed.
//! 2. The source tree is copied in.
//! 3. Flat top-level asset folders (`textures/`, `models/`, ...) are moved
//!    to `assets/minecraft/`, replacing whatever was there.
//! 4. The font provider file and sound manifest are written.
//! 5. Item models are generated into the now namespaced model folder.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use super::font::FontFile;
use super::{BuildContext, PackError, PackResult};
use crate::item::{GeneratedModels, ItemModelGenerator, DEFAULT_NAMESPACE};

/// Namespace holding the pack's own sounds.
pub const PACK_NAMESPACE: &str = "axolotl";

/// Top-level folders authors may keep outside `assets/minecraft/`.
pub const DEFAULT_DIRS: [&str; 7] = [
    "textures",
    "lang",
    "shaders",
    "sounds",
    "blockstates",
    "optifine",
    "models",
];

/// Font file path relative to the staging root.
pub fn font_file_path() -> PathBuf {
    Path::new("assets")
        .join(DEFAULT_NAMESPACE)
        .join("font")
        .join("default.json")
}

/// Sound manifest path relative to the staging root.
pub fn sound_manifest_path() -> PathBuf {
    Path::new("assets").join(PACK_NAMESPACE).join("sounds.json")
}

/// Summary of a finished staging run.
#[derive(Debug, Clone)]
pub struct StagedPack {
    /// Root of the staging tree.
    pub root: PathBuf,

    /// Number of files copied from the source tree.
    pub copied_files: usize,

    /// Default folders that were moved under the default namespace.
    pub relocated: Vec<String>,

    /// Item models written by the generator.
    pub models: GeneratedModels,
}

/// Builds the staging tree for one pack build.
#[derive(Debug, Clone)]
pub struct PackStager {
    source: PathBuf,
    staging: PathBuf,
}

impl PackStager {
    pub fn new(source: impl Into<PathBuf>, staging: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            staging: staging.into(),
        }
    }

    pub fn staging_root(&self) -> &Path {
        &self.staging
    }

    /// Build the staging tree from the source tree and `context`.
    pub fn stage(&self, context: &BuildContext) -> PackResult<StagedPack> {
        if !self.source.is_dir() {
            return Err(PackError::SourceMissing(self.source.clone()));
        }

        self.prepare_staging_dir()?;
        let copied_files = copy_tree(&self.source, &self.staging)?;
        debug!(files = copied_files, "Copied source pack");

        let relocated = self.relocate_default_dirs()?;
        self.write_font(context)?;
        self.write_sound_manifest(context)?;

        let models = ItemModelGenerator::new(&context.items)
            .generate(&self.staging)
            .map_err(PackError::from)?;

        info!(
            files = copied_files,
            glyphs = context.glyphs.len(),
            base_models = models.base_models.len(),
            custom_models = models.custom_models.len(),
            "Staged pack"
        );

        Ok(StagedPack {
            root: self.staging.clone(),
            copied_files,
            relocated,
            models,
        })
    }

    fn prepare_staging_dir(&self) -> PackResult<()> {
        recreate_dir(&self.staging)
    }

    /// Move flat default folders to `assets/minecraft/<dir>`.
    fn relocate_default_dirs(&self) -> PackResult<Vec<String>> {
        let namespace_root = self.staging.join("assets").join(DEFAULT_NAMESPACE);
        let mut relocated = Vec::new();

        for dir in DEFAULT_DIRS {
            let flat = self.staging.join(dir);
            if !flat.is_dir() {
                continue;
            }

            let target = namespace_root.join(dir);
            if target.exists() {
                fs::remove_dir_all(&target).map_err(|e| PackError::RemoveFailed {
                    path: target.clone(),
                    source: e,
                })?;
            }
            fs::create_dir_all(&namespace_root).map_err(|e| {
                PackError::CreateDirectoryFailed {
                    path: namespace_root.clone(),
                    source: e,
                }
            })?;
            fs::rename(&flat, &target).map_err(|e| PackError::WriteFailed {
                path: target.clone(),
                source: e,
            })?;

            debug!(dir, "Moved default folder under the default namespace");
            relocated.push(dir.to_string());
        }

        Ok(relocated)
    }

    fn write_font(&self, context: &BuildContext) -> PackResult<()> {
        let font = FontFile::from_registry(&context.glyphs);
        write_json(&self.staging.join(font_file_path()), &font)
    }

    fn write_sound_manifest(&self, context: &BuildContext) -> PackResult<()> {
        let namespace_dir = self.staging.join("assets").join(PACK_NAMESPACE);
        let authored = count_files(&namespace_dir);
        if authored > 0 {
            warn!(
                path = %namespace_dir.display(),
                files = authored,
                "Discarding authored files under the generated sound namespace"
            );
        }
        recreate_dir(&namespace_dir)?;
        write_json(
            &self.staging.join(sound_manifest_path()),
            &context.sounds.manifest(),
        )
    }
}

/// Remove `dir` if present and create it empty.
fn recreate_dir(dir: &Path) -> PackResult<()> {
    if dir.exists() {
        fs::remove_dir_all(dir).map_err(|e| PackError::RemoveFailed {
            path: dir.to_path_buf(),
            source: e,
        })?;
    }
    fs::create_dir_all(dir).map_err(|e| PackError::CreateDirectoryFailed {
        path: dir.to_path_buf(),
        source: e,
    })
}

/// Number of regular files below `dir`; zero when it does not exist.
fn count_files(dir: &Path) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .count()
}

/// Copy every file below `source` into `dest`, returning the file count.
fn copy_tree(source: &Path, dest: &Path) -> PackResult<usize> {
    let mut copied = 0;

    for entry in WalkDir::new(source)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = entry.map_err(|e| PackError::TraversalFailed {
            path: e.path().unwrap_or(source).to_path_buf(),
            reason: e.to_string(),
        })?;

        let relative = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| PackError::TraversalFailed {
                path: entry.path().to_path_buf(),
                reason: e.to_string(),
            })?;
        let target = dest.join(relative);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| PackError::CreateDirectoryFailed {
                path: target.clone(),
                source: e,
            })?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| PackError::WriteFailed {
                path: target.clone(),
                source: e,
            })?;
            copied += 1;
        }
    }

    Ok(copied)
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> PackResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| PackError::CreateDirectoryFailed {
            path: parent.to_path_buf(),
            source: e,
        })?;
    }

    let content = serde_json::to_string(value).map_err(|e| PackError::SerializeFailed {
        path: path.to_path_buf(),
        source: e,
    })?;
    fs::write(path, content).map_err(|e| PackError::WriteFailed {
        path: path.to_path_buf(),
        source: e,
    })
}
