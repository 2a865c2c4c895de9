//! CLI dispatch for the `pxdiff compare` command.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use image::RgbaImage;
use serde::Serialize;

use crate::config::{load_config, merge_cli_overrides, CliOverrides};
use crate::diff::{diff_with_stats, DiffStats};
use crate::output::{load_image, save_png};

use super::{EXIT_DIFFERENT, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Machine-readable result of a comparison
#[derive(Debug, Serialize)]
struct CompareReport<'a> {
    #[serde(flatten)]
    stats: DiffStats,
    diff_ratio: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<&'a Path>,
}

/// Size the global rayon pool. Only the first call in a process wins.
fn configure_threads(jobs: Option<usize>) {
    let Some(jobs) = jobs else { return };
    if let Err(e) = rayon::ThreadPoolBuilder::new().num_threads(jobs).build_global() {
        tracing::warn!("could not configure {} worker threads: {}", jobs, e);
    }
}

/// Execute the compare command.
pub fn run_compare(
    first: &Path,
    second: &Path,
    output: Option<&Path>,
    config_path: Option<&Path>,
    overrides: &CliOverrides,
    json: bool,
) -> ExitCode {
    let mut config = match load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    merge_cli_overrides(&mut config, overrides);

    let errors = config.validate();
    if !errors.is_empty() {
        for e in errors {
            eprintln!("Error: {}", e);
        }
        return ExitCode::from(EXIT_INVALID_ARGS);
    }
    let options = match config.to_options() {
        Ok(o) => o,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };
    configure_threads(config.run.jobs);

    let (a, b) = match (load_image(first), load_image(second)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) => {
            eprintln!("Error: cannot read '{}': {}", first.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
        (_, Err(e)) => {
            eprintln!("Error: cannot read '{}': {}", second.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    let mut out = RgbaImage::new(a.width(), a.height());
    let stats = match diff_with_stats(&a, &b, &mut out, &options) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if let Some(path) = output {
        if let Err(e) = save_png(&out, path) {
            eprintln!("Error: cannot write '{}': {}", path.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    }

    if json {
        let report = CompareReport { stats, diff_ratio: stats.diff_ratio(), output };
        match serde_json::to_string_pretty(&report) {
            Ok(text) => println!("{}", text),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    } else {
        print_summary(&stats, output.map(Path::to_path_buf));
    }

    if stats.is_identical() {
        ExitCode::from(EXIT_SUCCESS)
    } else {
        ExitCode::from(EXIT_DIFFERENT)
    }
}

fn print_summary(stats: &DiffStats, output: Option<PathBuf>) {
    println!(
        "{} different pixels ({:.2}%), {} anti-aliased, {}x{}",
        stats.diff_count,
        stats.diff_ratio() * 100.0,
        stats.anti_aliased_count,
        stats.width,
        stats.height
    );
    if let Some(path) = output {
        println!("Diff image written to {}", path.display());
    }
}
