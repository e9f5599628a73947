//! CLI for partcheck.

mod aws;
mod commands;
mod report;

use anyhow::Result;
use clap::{Parser, Subcommand};
use clap_complete::Shell;
use partcheck_core::config::{self, PartcheckConfig};
use partcheck_core::locator::ObjectLocator;
use std::path::{Path, PathBuf};

use commands::{run_checksum, run_completions, run_verify, VerifyArgs};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "partcheck")]
#[command(
    about = "Verify a local file against the SHA-256 checksums of a multipart-uploaded S3 object",
    long_about = None
)]
pub struct Cli {
    /// Config file to use instead of ~/.config/partcheck/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Compare a local file with a remote object, part by part.
    Verify {
        /// Remote object, e.g. s3://my-bucket/path/to/key.
        object: ObjectLocator,

        /// Local file to check.
        file: PathBuf,

        /// Read object attributes from this JSON file instead of calling S3.
        #[arg(long, value_name = "PATH")]
        attributes: Option<PathBuf>,

        /// Bytes per part; overrides the remote part size and the config.
        #[arg(long, value_name = "BYTES")]
        part_size: Option<u64>,

        /// Print the full report as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Compute the per-part and composite SHA-256 a multipart upload of FILE would get.
    Checksum {
        /// Local file.
        file: PathBuf,

        /// Bytes per part (default: part_size from config).
        #[arg(long, value_name = "BYTES")]
        part_size: Option<u64>,

        /// Print the result as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print shell completions.
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// What a successful command concluded. Errors are reported separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    Mismatched,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<Outcome> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Verify {
                object,
                file,
                attributes,
                part_size,
                json,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                let args = VerifyArgs {
                    object,
                    file,
                    attributes,
                    part_size,
                    json,
                };
                run_verify(&cfg, &args).await
            }
            CliCommand::Checksum {
                file,
                part_size,
                json,
            } => {
                let cfg = load_config(cli.config.as_deref())?;
                run_checksum(&cfg, &file, part_size, json)?;
                Ok(Outcome::Matched)
            }
            CliCommand::Completions { shell } => {
                run_completions(shell);
                Ok(Outcome::Matched)
            }
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<PartcheckConfig> {
    let cfg = match path {
        Some(path) => config::load_from(path)?,
        None => config::load_or_init()?,
    };
    tracing::debug!("loaded config: {:?}", cfg);
    Ok(cfg)
}

#[cfg(test)]
mod tests;
