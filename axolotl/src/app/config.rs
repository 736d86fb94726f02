//! Startup options for [`PackService`](super::PackService).

use std::path::PathBuf;

use crate::config::{DataLayout, DEFAULT_DATA_ROOT};

/// Options the host or CLI passes when opening the service.
///
/// Everything else comes from the configuration file under the data root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    /// Data root layout.
    pub layout: DataLayout,

    /// When false, builds never upload regardless of `bucket.upload`.
    pub allow_upload: bool,

    /// Write a default configuration file if none exists.
    pub create_missing_config: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_ROOT)
    }
}

impl AppConfig {
    pub fn new(data_root: impl Into<PathBuf>) -> Self {
        Self {
            layout: DataLayout::new(data_root),
            allow_upload: true,
            create_missing_config: true,
        }
    }

    /// Disable uploads for this process.
    pub fn without_upload(mut self) -> Self {
        self.allow_upload = false;
        self
    }

    /// Fail instead of creating a missing configuration file.
    pub fn require_config(mut self) -> Self {
        self.create_missing_config = false;
        self
    }
}
