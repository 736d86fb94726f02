//! Pack publishing.
//!
//! After a successful build the archive is uploaded to the remote bucket.
//! The bucket answers with the pack hash, which becomes the new pack
//! reference (`url` + `hash`) in the configuration file.
//!
//! Uploads run on a spawned Tokio task so the build returns immediately.
//! The caller gets a [`PublishHandle`] it can await or detach. Failures are
//! logged and surfaced through the handle; they never touch the stored
//! reference.

mod endpoints;
mod error;
mod uploader;

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, error, info};

use crate::config::{ConfigStore, PackReference, PublishTicket};

pub use endpoints::{BucketEndpoints, MODFOLDER_ENDPOINT, PACK_ENDPOINT};
pub use error::{PublishError, PublishResult};
pub use uploader::{
    BoxFuture, HttpPackUploader, PackUploader, UploadRequest, API_KEY_HEADER, UPLOAD_FIELD,
    UPLOAD_FILE_NAME, UPLOAD_MIME, UPLOAD_TIMEOUT,
};

/// Result of starting a publish.
#[derive(Debug)]
pub enum PublishOutcome {
    /// Uploading is disabled in the configuration.
    Skipped,

    /// An upload is in flight.
    Pending(PublishHandle),
}

impl PublishOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, PublishOutcome::Skipped)
    }
}

/// A finished upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub reference: PackReference,

    /// False when a newer publish had already been applied.
    pub applied: bool,

    pub elapsed: Duration,
}

/// Handle to an in-flight upload.
///
/// Dropping the handle detaches the task; the upload still completes and
/// still updates the configuration.
#[derive(Debug)]
pub struct PublishHandle {
    ticket: PublishTicket,
    task: JoinHandle<PublishResult<PublishReceipt>>,
}

impl PublishHandle {
    pub fn ticket(&self) -> PublishTicket {
        self.ticket
    }

    /// Wait for the upload to complete.
    pub async fn wait(self) -> PublishResult<PublishReceipt> {
        match self.task.await {
            Ok(result) => result,
            Err(e) => Err(PublishError::TaskFailed(e.to_string())),
        }
    }

    /// Let the upload finish in the background.
    pub fn detach(self) {
        debug!(ticket = self.ticket.value(), "Publish detached");
    }
}

/// Uploads archives and records the resulting pack reference.
#[derive(Clone)]
pub struct Publisher {
    store: Arc<ConfigStore>,
    uploader: Arc<dyn PackUploader>,
}

impl std::fmt::Debug for Publisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Publisher")
            .field("config", &self.store.path())
            .finish_non_exhaustive()
    }
}

impl Publisher {
    pub fn new(store: Arc<ConfigStore>, uploader: Arc<dyn PackUploader>) -> Self {
        Self { store, uploader }
    }

    pub fn store(&self) -> &Arc<ConfigStore> {
        &self.store
    }

    /// Start publishing the archive at `archive`.
    ///
    /// Returns [`PublishOutcome::Skipped`] without reading the archive when
    /// uploading is disabled. Otherwise the archive is read now and sent on
    /// a task spawned on the current Tokio runtime.
    pub fn publish(&self, archive: &Path) -> PublishResult<PublishOutcome> {
        let config = self.store.snapshot();
        if !config.bucket.upload {
            info!("Bucket upload disabled, not publishing pack");
            return Ok(PublishOutcome::Skipped);
        }

        let endpoints = BucketEndpoints::new(config.bucket.bucket_api_url.as_str())?;
        let runtime = Handle::try_current().map_err(|_| PublishError::NoRuntime)?;
        let bytes = fs::read(archive).map_err(|e| PublishError::ArchiveRead {
            path: archive.to_path_buf(),
            source: e,
        })?;

        let request = UploadRequest {
            url: endpoints.pack_url(),
            api_key: config.bucket.bucket_api_key.clone(),
            archive: bytes,
        };
        let ticket = self.store.issue_ticket();
        info!(
            url = %request.url,
            size = request.archive.len(),
            ticket = ticket.value(),
            "Uploading pack"
        );

        let store = Arc::clone(&self.store);
        let uploader = Arc::clone(&self.uploader);
        let task = runtime.spawn(async move {
            let started = Instant::now();
            let result = complete_upload(store, uploader.as_ref(), &endpoints, ticket, request)
                .await
                .map(|(reference, applied)| PublishReceipt {
                    reference,
                    applied,
                    elapsed: started.elapsed(),
                });

            match &result {
                Ok(receipt) => {
                    info!("Got new hash in {}ms", receipt.elapsed.as_millis());
                }
                Err(e) => {
                    error!(error = %e, ticket = ticket.value(), "Failed to publish pack");
                }
            }
            result
        });

        Ok(PublishOutcome::Pending(PublishHandle { ticket, task }))
    }
}

async fn complete_upload(
    store: Arc<ConfigStore>,
    uploader: &dyn PackUploader,
    endpoints: &BucketEndpoints,
    ticket: PublishTicket,
    request: UploadRequest,
) -> PublishResult<(PackReference, bool)> {
    let body = uploader.upload(request).await?;
    let hash = body.trim();
    if hash.is_empty() {
        return Err(PublishError::EmptyResponse);
    }

    let reference = PackReference {
        url: endpoints.download_url(hash)?,
        hash: hash.to_string(),
    };

    // Persisting rewrites config.json, so keep it off the async workers.
    let pending = reference.clone();
    let applied = tokio::task::spawn_blocking(move || store.apply_pack_reference(ticket, &pending))
        .await
        .map_err(|e| PublishError::TaskFailed(e.to_string()))??;
    Ok((reference, applied))
}
