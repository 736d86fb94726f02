//! Persisted configuration.
//!
//! The configuration file is shared with the host: besides the fields the
//! pipeline reads, it carries the current pack reference (`url`, `hash`)
//! which the publisher rewrites after every successful upload. Keys this
//! crate does not know about are preserved on rewrite.
//!
//! ```json
//! {
//!   "url": "https://bucket.example/api/pack?hash=abc123",
//!   "hash": "abc123",
//!   "bucket": {
//!     "upload": true,
//!     "bucket_api_url": "https://bucket.example/api/%s",
//!     "bucket_api_key": "secret"
//!   },
//!   "resource_pack": {
//!     "send_pack_on_join": true,
//!     "force_pack": false,
//!     "prompt_message": null,
//!     "pack_compression": 9
//!   }
//! }
//! ```

mod layout;
mod store;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

pub use layout::{DataLayout, DEFAULT_DATA_ROOT};
pub use store::{ConfigStore, PublishTicket};

/// Highest accepted `pack_compression` level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Placeholder substituted in `bucket_api_url`.
pub const URL_PLACEHOLDER: &str = "%s";

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while reading or writing the configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to write config {}: {source}", .path.display())]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize config: {0}")]
    SerializeFailed(#[source] serde_json::Error),

    /// A value is present but unusable.
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// The location and identity of the last published pack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackReference {
    pub url: String,
    pub hash: String,
}

/// What the host sends to a joining client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackOffer {
    pub url: String,
    pub hash: String,
    pub force: bool,
    pub prompt_message: Option<String>,
}

/// Remote bucket settings.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BucketConfig {
    /// Whether built packs are uploaded at all.
    #[serde(default)]
    pub upload: bool,

    /// Endpoint template with one `%s` for the resource kind.
    #[serde(default)]
    pub bucket_api_url: String,

    #[serde(default)]
    pub bucket_api_key: String,
}

/// Pack build and delivery settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePackConfig {
    #[serde(default = "default_true")]
    pub send_pack_on_join: bool,

    #[serde(default)]
    pub force_pack: bool,

    #[serde(default)]
    pub prompt_message: Option<String>,

    /// Zip compression level, 0 (store) to 9 (best).
    #[serde(default = "default_compression")]
    pub pack_compression: u32,
}

impl Default for ResourcePackConfig {
    fn default() -> Self {
        Self {
            send_pack_on_join: true,
            force_pack: false,
            prompt_message: None,
            pack_compression: MAX_COMPRESSION_LEVEL,
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_compression() -> u32 {
    MAX_COMPRESSION_LEVEL
}

/// Top-level configuration file.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AxolotlConfig {
    /// Download URL of the current pack.
    #[serde(rename = "url", default, skip_serializing_if = "Option::is_none")]
    pub pack_url: Option<String>,

    /// Content hash of the current pack.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,

    #[serde(default)]
    pub bucket: BucketConfig,

    #[serde(default)]
    pub resource_pack: ResourcePackConfig,

    /// Keys owned by the host.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AxolotlConfig {
    /// Read and parse the configuration at `path`.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(|e| ConfigError::Malformed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Write the configuration to `path`, replacing it atomically.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(self).map_err(ConfigError::SerializeFailed)?;

        let tmp_path = path.with_extension("json.tmp");
        fs::write(&tmp_path, content).map_err(|e| ConfigError::WriteFailed {
            path: tmp_path.clone(),
            source: e,
        })?;
        fs::rename(&tmp_path, path).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Check values the pipeline depends on.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.resource_pack.pack_compression > MAX_COMPRESSION_LEVEL {
            return Err(ConfigError::Invalid(format!(
                "resource_pack.pack_compression must be 0-{}, got {}",
                MAX_COMPRESSION_LEVEL, self.resource_pack.pack_compression
            )));
        }

        if self.bucket.upload {
            let placeholders = self.bucket.bucket_api_url.matches(URL_PLACEHOLDER).count();
            if placeholders != 1 {
                return Err(ConfigError::Invalid(format!(
                    "bucket.bucket_api_url must contain exactly one '{}', found {}",
                    URL_PLACEHOLDER, placeholders
                )));
            }
        }

        Ok(())
    }

    /// The current pack reference, if both halves are set.
    pub fn pack_reference(&self) -> Option<PackReference> {
        match (&self.pack_url, &self.hash) {
            (Some(url), Some(hash)) => Some(PackReference {
                url: url.clone(),
                hash: hash.clone(),
            }),
            _ => None,
        }
    }

    pub fn set_pack_reference(&mut self, reference: &PackReference) {
        self.pack_url = Some(reference.url.clone());
        self.hash = Some(reference.hash.clone());
    }

    /// The offer to send joining clients.
    ///
    /// `None` when sending is disabled or no pack has been published yet.
    pub fn pack_offer(&self) -> Option<PackOffer> {
        if !self.resource_pack.send_pack_on_join {
            return None;
        }

        let reference = self.pack_reference()?;
        if reference.hash.is_empty() {
            return None;
        }

        Some(PackOffer {
            url: reference.url,
            hash: reference.hash,
            force: self.resource_pack.force_pack,
            prompt_message: self.resource_pack.prompt_message.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "url": "https://bucket.example/api/pack?hash=old",
        "hash": "old",
        "bucket": {
            "upload": true,
            "bucket_api_url": "https://bucket.example/api/%s",
            "bucket_api_key": "secret"
        },
        "resource_pack": {
            "send_pack_on_join": true,
            "force_pack": true,
            "prompt_message": "Please accept",
            "pack_compression": 6
        },
        "motd": "kept"
    }"#;

    #[test]
    fn test_parse_full_config() {
        let config: AxolotlConfig = serde_json::from_str(SAMPLE).unwrap();
        assert!(config.bucket.upload);
        assert_eq!(config.bucket.bucket_api_key, "secret");
        assert_eq!(config.resource_pack.pack_compression, 6);
        assert_eq!(config.hash.as_deref(), Some("old"));
        assert_eq!(config.extra["motd"], "kept");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_config_uses_defaults() {
        let config: AxolotlConfig = serde_json::from_str("{}").unwrap();
        assert!(!config.bucket.upload);
        assert!(config.resource_pack.send_pack_on_join);
        assert_eq!(config.resource_pack.pack_compression, 9);
        assert!(config.pack_reference().is_none());
    }

    #[test]
    fn test_save_preserves_unknown_keys() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        let mut config: AxolotlConfig = serde_json::from_str(SAMPLE).unwrap();
        config.set_pack_reference(&PackReference {
            url: "https://bucket.example/api/pack?hash=new".into(),
            hash: "new".into(),
        });
        config.save(&path).unwrap();

        let reloaded = AxolotlConfig::load(&path).unwrap();
        assert_eq!(reloaded, config);
        assert_eq!(reloaded.extra["motd"], "kept");
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[test]
    fn test_validate_rejects_bad_compression() {
        let mut config = AxolotlConfig::default();
        config.resource_pack.pack_compression = 10;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_requires_single_placeholder_when_uploading() {
        let mut config = AxolotlConfig::default();
        config.bucket.bucket_api_url = "https://bucket.example/api".into();
        assert!(config.validate().is_ok());

        config.bucket.upload = true;
        assert!(config.validate().is_err());

        config.bucket.bucket_api_url = "https://bucket.example/%s/%s".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pack_offer() {
        let mut config: AxolotlConfig = serde_json::from_str(SAMPLE).unwrap();
        let offer = config.pack_offer().unwrap();
        assert_eq!(offer.hash, "old");
        assert!(offer.force);
        assert_eq!(offer.prompt_message.as_deref(), Some("Please accept"));

        config.hash = Some(String::new());
        assert!(config.pack_offer().is_none());

        config.hash = Some("old".into());
        config.resource_pack.send_pack_on_join = false;
        assert!(config.pack_offer().is_none());
    }

    #[test]
    fn test_load_missing_file() {
        let temp = TempDir::new().unwrap();
        let err = AxolotlConfig::load(&temp.path().join("config.json")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadFailed { .. }));
    }
}
