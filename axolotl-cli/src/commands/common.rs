//! Common helpers shared across CLI commands.

use std::path::PathBuf;

use axolotl::config::{DataLayout, DEFAULT_DATA_ROOT};

/// Resolve the data root from the `--data-dir` argument.
pub fn resolve_layout(data_dir: Option<PathBuf>) -> DataLayout {
    DataLayout::new(data_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_ROOT)))
}

/// Format a byte count for display.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}
