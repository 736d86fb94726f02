//! Configuration CLI commands.

use std::path::PathBuf;

use axolotl::config::{AxolotlConfig, DataLayout};
use axolotl::publisher::BucketEndpoints;
use clap::Subcommand;

use super::common::resolve_layout;
use crate::error::CliError;

/// Config subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommands {
    /// Show the current pack reference and bucket endpoints
    Show,

    /// Show the configuration file path
    Path,
}

/// Run a config subcommand.
pub fn run(command: ConfigCommands, data_dir: Option<PathBuf>) -> Result<(), CliError> {
    let layout = resolve_layout(data_dir);
    match command {
        ConfigCommands::Show => run_show(&layout),
        ConfigCommands::Path => {
            println!("{}", layout.config_file().display());
            Ok(())
        }
    }
}

fn run_show(layout: &DataLayout) -> Result<(), CliError> {
    let path = layout.config_file();
    if !path.exists() {
        return Err(CliError::Config(format!(
            "No configuration at {}. Run 'axolotl build' to create one.",
            path.display()
        )));
    }

    let config = AxolotlConfig::load(&path)?;
    for line in describe(&config) {
        println!("{}", line);
    }
    Ok(())
}

/// Human readable summary of `config`.
pub fn describe(config: &AxolotlConfig) -> Vec<String> {
    let mut lines = Vec::new();

    match config.pack_reference() {
        Some(reference) => {
            lines.push(format!("url:  {}", reference.url));
            lines.push(format!("hash: {}", reference.hash));
        }
        None => lines.push("No pack published yet".to_string()),
    }

    lines.push(format!(
        "compression: {}",
        config.resource_pack.pack_compression
    ));
    lines.push(format!(
        "send on join: {} (force: {})",
        config.resource_pack.send_pack_on_join, config.resource_pack.force_pack
    ));

    if !config.bucket.upload {
        lines.push("upload: disabled".to_string());
        return lines;
    }

    match BucketEndpoints::new(config.bucket.bucket_api_url.as_str()) {
        Ok(endpoints) => {
            lines.push(format!("upload:    {}", endpoints.pack_url()));
            lines.push(format!("modfolder: {}", endpoints.modfolder_url()));
        }
        Err(e) => lines.push(format!("upload: {}", e)),
    }
    lines
}
