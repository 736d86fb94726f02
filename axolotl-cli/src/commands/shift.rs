//! Shift command - show the glyph string for a spacing length.

use std::path::PathBuf;

use axolotl::glyph::GlyphRegistry;

use super::common::resolve_layout;
use crate::error::CliError;

/// Arguments for the shift command.
#[derive(Debug, Clone, Default)]
pub struct ShiftArgs {
    pub data_dir: Option<PathBuf>,
    pub length: u32,
    pub right_aligned: bool,
}

/// Run the shift command.
pub fn run(args: ShiftArgs) -> Result<(), CliError> {
    let layout = resolve_layout(args.data_dir);
    let registry = GlyphRegistry::load(&layout.glyphs_dir())?;

    let encoded = registry.encode_length(args.length, args.right_aligned);
    if encoded.is_empty() {
        println!("(empty)");
    } else {
        println!("{}", format_codepoints(&encoded));
    }
    Ok(())
}

/// Render each char as `U+XXXX`, space separated.
pub fn format_codepoints(s: &str) -> String {
    s.chars()
        .map(|c| format!("U+{:04X}", c as u32))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_codepoints() {
        assert_eq!(format_codepoints("\u{A410}\u{A411}"), "U+A410 U+A411");
        assert_eq!(format_codepoints(""), "");
    }

    #[test]
    fn test_run_without_glyphs() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = run(ShiftArgs {
            data_dir: Some(temp.path().to_path_buf()),
            length: 48,
            right_aligned: false,
        });
        assert!(result.is_ok());
    }
}
