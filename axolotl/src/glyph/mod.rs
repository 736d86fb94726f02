//! Font glyph registry.
//!
//! Glyphs are bitmap textures rendered through the default font. Each glyph
//! loaded for a build is given a unique codepoint, which is what the server
//! sends in chat or titles to display the texture.
//!
//! Codepoints are not persisted: every build reallocates from
//! [`MIN_CODEPOINT`] in descriptor load order, so the mapping is only stable
//! while the descriptor files themselves are.
//!
//! # Example
//!
//! ```ignore
//! use axolotl::glyph::GlyphRegistry;
//!
//! let registry = GlyphRegistry::load("mods/Axolotl/glyphs".as_ref())?;
//! let heart = registry.lookup("heart").and_then(|g| g.codepoint);
//! let spacer = registry.encode_length(48, false);
//! ```

mod allocator;
mod encode;

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::descriptor::{self, DescriptorError};

pub use allocator::{CodepointAllocator, MIN_CODEPOINT};
pub use encode::{shift_glyph_name, RIGHT_ALIGNED_PREFIX, SHIFT_GLYPH_PREFIX};

/// Result type for glyph operations.
pub type GlyphResult<T> = Result<T, GlyphError>;

/// Errors raised while building the glyph registry.
#[derive(Debug, Error)]
pub enum GlyphError {
    /// A glyph descriptor file could not be loaded.
    #[error(transparent)]
    Descriptor(#[from] DescriptorError),

    /// A glyph was handed to the registry with a codepoint already set.
    #[error("glyph '{0}' already has a codepoint assigned")]
    AlreadyAssigned(String),

    /// No codepoints remain for the glyph.
    #[error("no free codepoint left for glyph '{0}'")]
    CodepointsExhausted(String),
}

/// A glyph as written in a descriptor file.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct GlyphDescriptor {
    pub name: String,
    pub texture: String,
    pub ascent: i32,
    pub height: i32,
}

/// A glyph registered for this build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Logical name used for lookups.
    pub name: String,

    /// Texture path in `namespace:path` form.
    pub texture: String,

    pub ascent: i32,
    pub height: i32,

    /// Codepoint assigned by the registry.
    pub codepoint: Option<char>,
}

impl Glyph {
    /// Create an unassigned glyph.
    pub fn new(
        name: impl Into<String>,
        texture: impl Into<String>,
        ascent: i32,
        height: i32,
    ) -> Self {
        Self {
            name: name.into(),
            texture: texture.into(),
            ascent,
            height,
            codepoint: None,
        }
    }
}

impl From<GlyphDescriptor> for Glyph {
    fn from(descriptor: GlyphDescriptor) -> Self {
        Self::new(
            descriptor.name,
            descriptor.texture,
            descriptor.ascent,
            descriptor.height,
        )
    }
}

/// All glyphs of one build, in load order.
#[derive(Debug, Clone, Default)]
pub struct GlyphRegistry {
    glyphs: Vec<Glyph>,
    by_name: HashMap<String, usize>,
    allocator: CodepointAllocator,
}

impl GlyphRegistry {
    /// Create an empty registry allocating from [`MIN_CODEPOINT`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry allocating from `min`.
    pub fn with_min_codepoint(min: u32) -> Self {
        Self {
            allocator: CodepointAllocator::new(min),
            ..Self::default()
        }
    }

    /// Load every glyph descriptor file in `dir` and allocate codepoints.
    pub fn load(dir: &Path) -> GlyphResult<Self> {
        let mut registry = Self::new();
        registry.load_dir(dir)?;
        Ok(registry)
    }

    /// Load descriptor files from `dir` into this registry.
    ///
    /// Returns the number of glyphs added.
    pub fn load_dir(&mut self, dir: &Path) -> GlyphResult<usize> {
        let files = descriptor::load_dir::<GlyphDescriptor>(dir, "glyph")?;

        let mut added = 0;
        for file in files {
            let count = file.entries.len();
            for descriptor in file.entries {
                self.allocate(descriptor.into())?;
            }
            added += count;

            let file_name = file
                .path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Found {} glyphs ({})", count, file_name);
        }

        Ok(added)
    }

    /// Assign the next free codepoint to `glyph` and register it.
    pub fn allocate(&mut self, mut glyph: Glyph) -> GlyphResult<&Glyph> {
        if glyph.codepoint.is_some() {
            return Err(GlyphError::AlreadyAssigned(glyph.name));
        }

        let codepoint = self
            .allocator
            .allocate()
            .ok_or_else(|| GlyphError::CodepointsExhausted(glyph.name.clone()))?;
        glyph.codepoint = Some(codepoint);

        let index = self.glyphs.len();
        if self.by_name.insert(glyph.name.clone(), index).is_some() {
            warn!(
                glyph = %glyph.name,
                "Duplicate glyph name, lookups now resolve to the later definition"
            );
        }
        self.glyphs.push(glyph);

        Ok(&self.glyphs[index])
    }

    /// Find a glyph by name.
    pub fn lookup(&self, name: &str) -> Option<&Glyph> {
        self.by_name.get(name).map(|&index| &self.glyphs[index])
    }

    /// Glyphs in load order.
    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }
}
