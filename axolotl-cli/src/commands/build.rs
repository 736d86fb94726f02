//! Build command - rebuild the pack and publish it.

use std::path::PathBuf;

use axolotl::app::{AppConfig, PackService};
use axolotl::publisher::{PublishOutcome, PublishReceipt, PublishResult};
use tracing::warn;

use super::common::{format_size, resolve_layout};
use crate::error::CliError;

/// Arguments for the build command.
#[derive(Debug, Clone, Default)]
pub struct BuildArgs {
    pub data_dir: Option<PathBuf>,
    pub no_upload: bool,
}

/// How the upload after a build ended.
#[derive(Debug)]
pub enum UploadStatus {
    Skipped,
    Published(PublishReceipt),
    Failed(String),
}

/// Run the build command.
///
/// The command fails only when the archive could not be built. Upload
/// failures are reported but leave the exit status at success, since the
/// archive on disk is still valid.
pub async fn run(args: BuildArgs) -> Result<UploadStatus, CliError> {
    let layout = resolve_layout(args.data_dir);
    let mut app_config = AppConfig::new(layout.root());
    if args.no_upload {
        app_config = app_config.without_upload();
    }

    // Building walks and zips the whole pack; keep it off the async workers.
    let report = tokio::task::spawn_blocking(move || PackService::open(app_config)?.rebuild())
        .await
        .map_err(|e| CliError::Task(e.to_string()))??;

    println!(
        "Built {} ({}, {} files)",
        report.artifact.path.display(),
        format_size(report.artifact.size),
        report.artifact.file_count
    );
    println!("  sha256 {}", report.artifact.checksum);
    println!("  {} glyphs", report.glyphs.len());

    let status = finish_upload(report.publish).await;
    match &status {
        UploadStatus::Skipped => println!("Upload skipped"),
        UploadStatus::Published(receipt) => println!(
            "Published {} in {}ms",
            receipt.reference.url,
            receipt.elapsed.as_millis()
        ),
        UploadStatus::Failed(reason) => eprintln!("Upload failed: {}", reason),
    }
    Ok(status)
}

/// Wait for the upload started by a rebuild.
async fn finish_upload(publish: PublishResult<PublishOutcome>) -> UploadStatus {
    let outcome = match publish {
        Ok(outcome) => outcome,
        Err(e) => {
            warn!(error = %e, "Upload not started");
            return UploadStatus::Failed(e.to_string());
        }
    };

    match outcome {
        PublishOutcome::Skipped => UploadStatus::Skipped,
        PublishOutcome::Pending(handle) => match handle.wait().await {
            Ok(receipt) => UploadStatus::Published(receipt),
            Err(e) => UploadStatus::Failed(e.to_string()),
        },
    }
}
