//! pxdiff - Command-line tool for perceptual image comparison

use std::process::ExitCode;

use pixeldiff::cli;

fn main() -> ExitCode {
    cli::run()
}
