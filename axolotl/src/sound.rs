//! Sound catalog for the pack's own sound namespace.
//!
//! Sounds are described in a single optional JSON file. The catalog turns
//! them into the `sounds.json` manifest that the client reads to register
//! sound events.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors raised while loading the sound catalog.
#[derive(Debug, Error)]
pub enum SoundError {
    /// The sound file exists but could not be read.
    #[error("failed to read sound file {}: {source}", .path.display())]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The sound file is not a valid JSON array of sounds.
    #[error("malformed sound file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Audio category a sound plays under, controlling which volume slider
/// applies to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundCategory {
    #[serde(alias = "MASTER")]
    Master,
    #[serde(alias = "MUSIC")]
    Music,
    #[serde(alias = "RECORD", alias = "RECORDS")]
    Record,
    #[serde(alias = "WEATHER")]
    Weather,
    #[serde(alias = "BLOCK", alias = "BLOCKS")]
    Block,
    #[serde(alias = "HOSTILE")]
    Hostile,
    #[serde(alias = "NEUTRAL")]
    Neutral,
    #[serde(alias = "PLAYER", alias = "PLAYERS")]
    Player,
    #[serde(alias = "AMBIENT")]
    Ambient,
    #[serde(alias = "VOICE")]
    Voice,
}

impl SoundCategory {
    /// Category name as written in the manifest.
    pub fn as_str(&self) -> &'static str {
        match self {
            SoundCategory::Master => "master",
            SoundCategory::Music => "music",
            SoundCategory::Record => "record",
            SoundCategory::Weather => "weather",
            SoundCategory::Block => "block",
            SoundCategory::Hostile => "hostile",
            SoundCategory::Neutral => "neutral",
            SoundCategory::Player => "player",
            SoundCategory::Ambient => "ambient",
            SoundCategory::Voice => "voice",
        }
    }
}

/// A sound as written in the sound file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SoundEntry {
    pub name: String,
    pub category: SoundCategory,
    pub file: String,
}

/// Sounds loaded for one build, in file order.
#[derive(Debug, Clone, Default)]
pub struct SoundCatalog {
    entries: Vec<SoundEntry>,
}

impl SoundCatalog {
    /// Create a catalog from already loaded entries.
    pub fn new(entries: Vec<SoundEntry>) -> Self {
        Self { entries }
    }

    /// Load the sound file at `path`.
    ///
    /// A missing file is an empty catalog.
    pub fn load(path: &Path) -> Result<Self, SoundError> {
        if !path.exists() {
            debug!(path = %path.display(), "No sound file, catalog is empty");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| SoundError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        let entries: Vec<SoundEntry> =
            serde_json::from_str(&content).map_err(|e| SoundError::Malformed {
                path: path.to_path_buf(),
                source: e,
            })?;

        info!("Found {} sounds", entries.len());
        Ok(Self { entries })
    }

    pub fn entries(&self) -> &[SoundEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the `sounds.json` manifest.
    ///
    /// Keys keep first-insertion order; a later sound with the same name
    /// replaces the earlier value.
    pub fn manifest(&self) -> Value {
        let mut manifest = Map::new();
        for entry in &self.entries {
            let event = json!({
                "category": entry.category.as_str(),
                "sounds": [entry.name],
            });
            if manifest.insert(entry.name.clone(), event).is_some() {
                warn!(sound = %entry.name, "Duplicate sound name, later definition wins");
            }
        }
        Value::Object(manifest)
    }
}
