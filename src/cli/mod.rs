//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod compare;
mod config;

use clap::{Parser, Subcommand};
use image::Rgba;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::color::parse_color;
use crate::tile::TileSize;

/// Exit codes
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;
/// The images were compared and differ
pub(crate) const EXIT_DIFFERENT: u8 = 66;

/// pxdiff - Perceptual pixel-level image comparison
#[derive(Parser)]
#[command(name = "pxdiff")]
#[command(about = "pxdiff - Compare two images pixel by pixel, ignoring anti-aliasing")]
#[command(version)]
pub struct Cli {
    /// Log debug output to stderr (RUST_LOG takes precedence)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two images and optionally write a diff image
    Compare {
        /// First image
        first: PathBuf,

        /// Second image
        second: PathBuf,

        /// Write the diff visualization to this PNG file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Matching threshold, 0 to 1; smaller is more sensitive
        #[arg(short, long)]
        threshold: Option<f64>,

        /// Opacity of the faded first image in the diff output, 0 to 1
        #[arg(long)]
        alpha: Option<f64>,

        /// Count anti-aliased pixels as differences
        #[arg(long)]
        include_aa: bool,

        /// Draw only differences on a transparent background
        #[arg(long)]
        diff_mask: bool,

        /// Color for anti-aliased pixels (hex or CSS)
        #[arg(long, value_parser = parse_color)]
        aa_color: Option<Rgba<u8>>,

        /// Color for different pixels (hex or CSS)
        #[arg(long, value_parser = parse_color)]
        diff_color: Option<Rgba<u8>>,

        /// Maximum tile size for parallel processing (e.g., "512x512")
        #[arg(long)]
        tile_size: Option<TileSize>,

        /// Number of worker threads (default: available cores)
        #[arg(short, long)]
        jobs: Option<usize>,

        /// Path to pixeldiff.toml (default: discovered from the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Path to pixeldiff.toml (default: discovered from the working directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

/// Install the stderr log subscriber.
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // a subscriber may already be installed when embedded
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .try_init();
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Compare {
            first,
            second,
            output,
            threshold,
            alpha,
            include_aa,
            diff_mask,
            aa_color,
            diff_color,
            tile_size,
            jobs,
            config,
            json,
        } => {
            let overrides = crate::config::CliOverrides {
                threshold,
                alpha,
                include_aa: include_aa.then_some(true),
                diff_mask: diff_mask.then_some(true),
                aa_color,
                diff_color,
                tile_size,
                jobs,
            };
            compare::run_compare(
                &first,
                &second,
                output.as_deref(),
                config.as_deref(),
                &overrides,
                json,
            )
        }
        Commands::Config { config: path } => config::run_config(path.as_deref()),
    }
}
