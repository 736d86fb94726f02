//! Encoding pixel lengths as sequences of spacing glyphs.
//!
//! Spacing glyphs follow a naming convention: `shift_<n>` moves the cursor by
//! `n` pixels, `neg_shift_<n>` is its right-aligned counterpart. Any length
//! is expressed through its binary decomposition, one glyph per set bit,
//! largest term first.

use tracing::warn;

use super::GlyphRegistry;

/// Name prefix shared by all spacing glyphs.
pub const SHIFT_GLYPH_PREFIX: &str = "shift_";

/// Prefix marking the right-aligned variant of a spacing glyph.
pub const RIGHT_ALIGNED_PREFIX: &str = "neg_";

/// Glyph name for a spacing term of `magnitude` pixels.
pub fn shift_glyph_name(magnitude: u32, right_aligned: bool) -> String {
    if right_aligned {
        format!("{}{}{}", RIGHT_ALIGNED_PREFIX, SHIFT_GLYPH_PREFIX, magnitude)
    } else {
        format!("{}{}", SHIFT_GLYPH_PREFIX, magnitude)
    }
}

impl GlyphRegistry {
    /// Encode `length` as a string of spacing glyph characters.
    ///
    /// Stops at the first term whose glyph is missing, returning what was
    /// encoded so far.
    pub fn encode_length(&self, length: u32, right_aligned: bool) -> String {
        let mut encoded = String::new();

        for bit in (0..u32::BITS).rev() {
            let magnitude = 1u32 << bit;
            if length & magnitude == 0 {
                continue;
            }

            let name = shift_glyph_name(magnitude, right_aligned);
            match self.lookup(&name).and_then(|glyph| glyph.codepoint) {
                Some(c) => encoded.push(c),
                None => {
                    warn!(
                        glyph = %name,
                        length,
                        "Missing spacing glyph, encoded length is truncated"
                    );
                    break;
                }
            }
        }

        encoded
    }
}
