//! On-disk layout of the data root.

use std::path::{Path, PathBuf};

/// Data root used when none is configured.
pub const DEFAULT_DATA_ROOT: &str = "mods/Axolotl";

const GLYPHS_DIR: &str = "glyphs";
const ITEMS_DIR: &str = "items";
const SOUNDS_FILE: &str = "sounds.json";
const SOURCE_PACK_DIR: &str = "pack";
const STAGING_DIR: &str = "pack-prod";
const ARCHIVE_FILE: &str = "pack.zip";
const CONFIG_FILE: &str = "config.json";

/// Paths of every input and output below the data root.
///
/// ```text
/// mods/Axolotl/
/// ├── config.json     persisted configuration
/// ├── glyphs/*.json   glyph descriptors
/// ├── items/*.json    custom item descriptors
/// ├── sounds.json     sound descriptors (optional)
/// ├── pack/           hand-authored assets
/// ├── pack-prod/      staging tree (exists only during a build)
/// └── pack.zip        built archive
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataLayout {
    root: PathBuf,
}

impl Default for DataLayout {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}

impl DataLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_file(&self) -> PathBuf {
        self.root.join(CONFIG_FILE)
    }

    pub fn glyphs_dir(&self) -> PathBuf {
        self.root.join(GLYPHS_DIR)
    }

    pub fn items_dir(&self) -> PathBuf {
        self.root.join(ITEMS_DIR)
    }

    pub fn sounds_file(&self) -> PathBuf {
        self.root.join(SOUNDS_FILE)
    }

    pub fn source_pack_dir(&self) -> PathBuf {
        self.root.join(SOURCE_PACK_DIR)
    }

    pub fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    pub fn archive_file(&self) -> PathBuf {
        self.root.join(ARCHIVE_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_layout() {
        let layout = DataLayout::default();
        assert_eq!(layout.root(), Path::new("mods/Axolotl"));
        assert_eq!(layout.archive_file(), Path::new("mods/Axolotl/pack.zip"));
        assert_eq!(layout.staging_dir(), Path::new("mods/Axolotl/pack-prod"));
        assert_eq!(layout.glyphs_dir(), Path::new("mods/Axolotl/glyphs"));
    }
}
