//! pixeldiff - Perceptual pixel-level image comparison
//!
//! This library provides functionality to:
//! - Compare two RGBA images in YIQ space and count differing pixels
//! - Detect and discount anti-aliased edges
//! - Paint a diff visualization into an output image
//! - Process large images in parallel tiles
//!
//! Start with [`diff()`] and [`Options`].

pub mod antialias;
pub mod cli;
pub mod color;
pub mod compositor;
pub mod config;
pub mod delta;
pub mod diff;
pub mod output;
pub mod pixels;
pub mod tile;

pub use diff::{diff, diff_with_stats, DiffError, DiffStats, Options};
pub use pixels::{Packing, PixelGrid, PremultipliedImage};
pub use tile::TileSize;
