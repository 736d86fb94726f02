//! Resource pack build pipeline.
//!
//! A build runs synchronously from descriptors to archive:
//!
//! 1. Load glyphs (allocating codepoints), sounds and custom items into a
//!    [`BuildContext`] owned by this build
//! 2. Stage the source tree together with generated files ([`PackStager`])
//! 3. Compress the staging tree into the pack archive ([`archive::pack`])
//!
//! Publishing the archive is a separate, asynchronous step handled by
//! [`crate::publisher`].
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use axolotl::config::DataLayout;
//! use axolotl::item::NamespacedResolver;
//! use axolotl::pack::PackBuilder;
//!
//! let builder = PackBuilder::new(DataLayout::default(), 9, Arc::new(NamespacedResolver));
//! let output = builder.build()?;
//! println!("Built {} ({} bytes)", output.artifact.path.display(), output.artifact.size);
//! ```

pub mod archive;
mod error;
mod font;
mod stager;

use std::sync::Arc;

use tracing::info;

use crate::config::DataLayout;
use crate::glyph::GlyphRegistry;
use crate::item::{self, ItemResolver, ResolvedItem};
use crate::sound::SoundCatalog;

pub use archive::{build_archive, calculate_sha256, pack, PackArtifact};
pub use error::{PackError, PackResult};
pub use font::{FontFile, FontProvider, BITMAP_PROVIDER};
pub use stager::{
    font_file_path, sound_manifest_path, PackStager, StagedPack, DEFAULT_DIRS, PACK_NAMESPACE,
};

/// Everything loaded from descriptors for one build.
#[derive(Debug, Clone, Default)]
pub struct BuildContext {
    pub glyphs: GlyphRegistry,
    pub sounds: SoundCatalog,
    pub items: Vec<ResolvedItem>,
}

impl BuildContext {
    /// Load all descriptors named by `layout`.
    pub fn load(layout: &DataLayout, resolver: &dyn ItemResolver) -> PackResult<Self> {
        info!("Generating glyphs..");
        let glyphs = GlyphRegistry::load(&layout.glyphs_dir())?;
        let sounds = SoundCatalog::load(&layout.sounds_file())?;
        let items = item::load_items(&layout.items_dir(), resolver)?;

        Ok(Self {
            glyphs,
            sounds,
            items,
        })
    }
}

/// Result of a successful build.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    pub artifact: PackArtifact,

    /// Registry of this build, needed to render glyphs until the next one.
    pub glyphs: GlyphRegistry,

    /// Default folders moved under the default namespace.
    pub relocated: Vec<String>,
}

/// Runs full pack builds for a data root.
#[derive(Clone)]
pub struct PackBuilder {
    layout: DataLayout,
    compression_level: u32,
    resolver: Arc<dyn ItemResolver>,
}

impl std::fmt::Debug for PackBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackBuilder")
            .field("layout", &self.layout)
            .field("compression_level", &self.compression_level)
            .finish_non_exhaustive()
    }
}

impl PackBuilder {
    pub fn new(layout: DataLayout, compression_level: u32, resolver: Arc<dyn ItemResolver>) -> Self {
        Self {
            layout,
            compression_level,
            resolver,
        }
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    /// Run a full build.
    ///
    /// On failure after staging has started the staging tree is kept.
    pub fn build(&self) -> PackResult<BuildOutput> {
        let context = BuildContext::load(&self.layout, self.resolver.as_ref())?;

        let stager = PackStager::new(self.layout.source_pack_dir(), self.layout.staging_dir());
        let staged = stager.stage(&context)?;

        info!("Compressing pack..");
        let artifact = archive::pack(
            &staged.root,
            &self.layout.archive_file(),
            self.compression_level,
        )?;

        Ok(BuildOutput {
            artifact,
            glyphs: context.glyphs,
            relocated: staged.relocated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::NamespacedResolver;
    use std::fs;
    use tempfile::TempDir;

    fn data_root(temp: &TempDir) -> DataLayout {
        let layout = DataLayout::new(temp.path().join("Axolotl"));
        let source = layout.source_pack_dir();
        fs::create_dir_all(source.join("textures/item")).unwrap();
        fs::write(source.join("textures/item/ruby.png"), b"png").unwrap();
        fs::write(source.join("pack.mcmeta"), r#"{"pack":{"pack_format":9}}"#).unwrap();

        fs::create_dir_all(layout.glyphs_dir()).unwrap();
        fs::write(
            layout.glyphs_dir().join("shift.json"),
            r#"[{"name":"shift_1","texture":"axolotl:font/s1","ascent":-32768,"height":-3}]"#,
        )
        .unwrap();
        layout
    }

    fn builder(layout: DataLayout, level: u32) -> PackBuilder {
        PackBuilder::new(layout, level, Arc::new(NamespacedResolver))
    }

    #[test]
    fn test_build_produces_archive() {
        let temp = TempDir::new().unwrap();
        let layout = data_root(&temp);

        let output = builder(layout.clone(), 9).build().unwrap();

        assert_eq!(output.artifact.path, layout.archive_file());
        assert!(layout.archive_file().is_file());
        assert!(!layout.staging_dir().exists());
        assert_eq!(output.relocated, vec!["textures".to_string()]);
        assert!(output.glyphs.lookup("shift_1").is_some());
    }

    #[test]
    fn test_build_without_source_fails() {
        let temp = TempDir::new().unwrap();
        let layout = DataLayout::new(temp.path().join("empty"));

        let err = builder(layout, 9).build().unwrap_err();
        assert!(matches!(err, PackError::SourceMissing(_)));
    }

    #[test]
    fn test_bad_compression_level_keeps_staging() {
        let temp = TempDir::new().unwrap();
        let layout = data_root(&temp);

        let err = builder(layout.clone(), 11).build().unwrap_err();

        assert!(matches!(err, PackError::InvalidCompressionLevel(11)));
        assert!(layout.staging_dir().is_dir());
        assert!(!layout.archive_file().exists());
    }

    #[test]
    fn test_items_cannot_write_outside_staging() {
        let temp = TempDir::new().unwrap();
        let layout = data_root(&temp);
        fs::create_dir_all(layout.items_dir()).unwrap();
        fs::write(
            layout.items_dir().join("escape.json"),
            r#"[{"name":"../../../../escaped_custom","display_name":"x","item":"paper",
                "generate_model":true,"custom_model_data":1,
                "parent_model":"item/generated","textures":["axolotl:item/x"]}]"#,
        )
        .unwrap();

        let err = builder(layout.clone(), 9).build().unwrap_err();
        assert!(matches!(err, PackError::Item(_)));

        fs::write(
            layout.items_dir().join("escape.json"),
            r#"[{"name":"base","display_name":"x","item":"x/../../../../../../escaped_base",
                "model":"custom/base","custom_model_data":1}]"#,
        )
        .unwrap();

        let err = builder(layout.clone(), 9).build().unwrap_err();
        assert!(matches!(err, PackError::Item(_)));
        assert!(!layout.root().join("escaped_custom.json").exists());
        assert!(!layout.root().join("escaped_base.json").exists());
    }

    #[test]
    fn test_malformed_glyphs_abort_before_staging() {
        let temp = TempDir::new().unwrap();
        let layout = data_root(&temp);
        fs::write(layout.glyphs_dir().join("broken.json"), "{not json").unwrap();

        let err = builder(layout.clone(), 9).build().unwrap_err();

        assert!(matches!(err, PackError::Glyph(_)));
        assert!(!layout.staging_dir().exists());
    }
}
