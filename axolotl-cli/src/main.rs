//! Axolotl CLI - build and publish the resource pack
//!
//! This binary drives the `axolotl` library from the command line.

mod commands;
mod error;

use std::path::PathBuf;

use axolotl::logging::{init_logging, LoggingConfig};
use clap::{Parser, Subcommand};

use commands::build::BuildArgs;
use commands::config::ConfigCommands;
use commands::shift::ShiftArgs;
use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "axolotl", version, about = "Build and publish the Axolotl resource pack")]
struct Cli {
    /// Data root holding descriptors, the source pack and config.json
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Also write logs to this directory
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Rebuild the pack and upload it
    Build {
        /// Skip the upload even if the bucket is enabled
        #[arg(long)]
        no_upload: bool,
    },

    /// Print the glyph codepoints encoding a spacing length
    Shift {
        /// Length in pixels
        length: u32,

        /// Use the right-aligned glyph set
        #[arg(long)]
        right: bool,
    },

    /// Inspect configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let mut logging = LoggingConfig::default();
    if let Some(dir) = &cli.log_dir {
        logging = logging.with_log_dir(dir);
    }
    let _guard = match init_logging(&logging) {
        Ok(guard) => guard,
        Err(e) => CliError::from(e).exit(),
    };

    if let Err(e) = run(cli).await {
        e.exit();
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Commands::Build { no_upload } => commands::build::run(BuildArgs {
            data_dir: cli.data_dir,
            no_upload,
        })
        .await
        .map(|_| ()),
        Commands::Shift { length, right } => commands::shift::run(ShiftArgs {
            data_dir: cli.data_dir,
            length,
            right_aligned: right,
        }),
        Commands::Config(command) => commands::config::run(command, cli.data_dir),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_build_flags() {
        let cli = Cli::try_parse_from(["axolotl", "build", "--no-upload", "--data-dir", "/srv/ax"])
            .unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/srv/ax")));
        assert!(matches!(cli.command, Commands::Build { no_upload: true }));
    }

    #[test]
    fn test_build_always_waits_for_upload() {
        assert!(Cli::try_parse_from(["axolotl", "build", "--detach"]).is_err());
    }

    #[test]
    fn test_parse_shift() {
        let cli = Cli::try_parse_from(["axolotl", "shift", "48", "--right"]).unwrap();
        assert!(matches!(
            cli.command,
            Commands::Shift {
                length: 48,
                right: true
            }
        ));
    }

    #[test]
    fn test_parse_config_show() {
        let cli = Cli::try_parse_from(["axolotl", "config", "show"]).unwrap();
        assert!(matches!(cli.command, Commands::Config(ConfigCommands::Show)));
    }

    #[test]
    fn test_shift_requires_length() {
        assert!(Cli::try_parse_from(["axolotl", "shift"]).is_err());
    }
}
