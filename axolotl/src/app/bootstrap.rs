//! Service wiring: configuration, build and publish.

use std::sync::Arc;

use tracing::{error, info};

use super::config::AppConfig;
use super::error::AppError;
use crate::config::{AxolotlConfig, ConfigStore, DataLayout};
use crate::glyph::GlyphRegistry;
use crate::item::{ItemResolver, NamespacedResolver};
use crate::pack::{PackArtifact, PackBuilder};
use crate::publisher::{
    HttpPackUploader, PackUploader, PublishOutcome, PublishResult, Publisher,
};

/// Result of one [`PackService::rebuild`].
#[derive(Debug)]
pub struct RebuildReport {
    pub artifact: PackArtifact,

    /// Glyphs of this build, valid until the next rebuild.
    pub glyphs: GlyphRegistry,

    /// Upload state. A publish error never fails the build.
    pub publish: PublishResult<PublishOutcome>,
}

/// Owns everything a rebuild needs.
///
/// # Example
///
/// ```ignore
/// use axolotl::app::{AppConfig, PackService};
///
/// let service = PackService::open(AppConfig::new("mods/Axolotl"))?;
/// let report = service.rebuild()?;
/// if let PublishOutcome::Pending(handle) = report.publish? {
///     handle.wait().await?;
/// }
/// ```
pub struct PackService {
    config: AppConfig,
    store: Arc<ConfigStore>,
    resolver: Arc<dyn ItemResolver>,
    publisher: Publisher,
}

impl std::fmt::Debug for PackService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PackService")
            .field("config", &self.config)
            .field("publisher", &self.publisher)
            .finish_non_exhaustive()
    }
}

impl PackService {
    /// Open the service with the HTTP uploader and namespaced item lookup.
    pub fn open(config: AppConfig) -> Result<Self, AppError> {
        let uploader = Arc::new(HttpPackUploader::new()?);
        Self::with_parts(config, Arc::new(NamespacedResolver), uploader)
    }

    /// Open the service with explicit collaborators.
    pub fn with_parts(
        config: AppConfig,
        resolver: Arc<dyn ItemResolver>,
        uploader: Arc<dyn PackUploader>,
    ) -> Result<Self, AppError> {
        let store = Arc::new(open_store(&config)?);
        store.snapshot().validate()?;

        info!(
            root = %config.layout.root().display(),
            upload = config.allow_upload,
            "Pack service ready"
        );

        let publisher = Publisher::new(Arc::clone(&store), uploader);
        Ok(Self {
            config,
            store,
            resolver,
            publisher,
        })
    }

    pub fn layout(&self) -> &DataLayout {
        &self.config.layout
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Build the pack and start publishing it.
    ///
    /// Must run inside a Tokio runtime when uploads are enabled.
    pub fn rebuild(&self) -> Result<RebuildReport, AppError> {
        let config = self.store.snapshot();
        let builder = PackBuilder::new(
            self.config.layout.clone(),
            config.resource_pack.pack_compression,
            Arc::clone(&self.resolver),
        );
        let output = builder.build()?;

        let publish = if self.config.allow_upload {
            self.publisher.publish(&output.artifact.path)
        } else {
            info!("Uploads disabled for this run");
            Ok(PublishOutcome::Skipped)
        };
        if let Err(e) = &publish {
            error!(error = %e, "Failed to start pack upload");
        }

        Ok(RebuildReport {
            artifact: output.artifact,
            glyphs: output.glyphs,
            publish,
        })
    }
}

fn open_store(config: &AppConfig) -> Result<ConfigStore, AppError> {
    let path = config.layout.config_file();
    if path.exists() || !config.create_missing_config {
        return Ok(ConfigStore::open(path)?);
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            AppError::Config(crate::config::ConfigError::WriteFailed {
                path: parent.to_path_buf(),
                source: e,
            })
        })?;
    }
    let defaults = AxolotlConfig::default();
    defaults.save(&path)?;
    info!(path = %path.display(), "Created default configuration");
    Ok(ConfigStore::new(path, defaults))
}
