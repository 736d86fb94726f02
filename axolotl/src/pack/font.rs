//! Default font provider file.

use serde::Serialize;

use crate::glyph::GlyphRegistry;

/// Provider type for texture-backed glyphs.
pub const BITMAP_PROVIDER: &str = "bitmap";

/// `assets/<ns>/font/default.json` contents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontFile {
    pub providers: Vec<FontProvider>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FontProvider {
    #[serde(rename = "type")]
    pub kind: String,
    pub file: String,
    pub ascent: i32,
    pub height: i32,
    pub chars: Vec<String>,
}

impl FontFile {
    /// One bitmap provider per glyph, in registry order.
    pub fn from_registry(registry: &GlyphRegistry) -> Self {
        let providers = registry
            .glyphs()
            .iter()
            .filter_map(|glyph| {
                glyph.codepoint.map(|c| FontProvider {
                    kind: BITMAP_PROVIDER.to_string(),
                    file: glyph.texture.clone(),
                    ascent: glyph.ascent,
                    height: glyph.height,
                    chars: vec![c.to_string()],
                })
            })
            .collect();
        Self { providers }
    }
}
