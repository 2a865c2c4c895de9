//! Perceptual image comparison
//!
//! [`diff`] compares two equally sized RGBA images pixel by pixel in YIQ
//! space, counts the pixels whose perceptual delta exceeds the configured
//! threshold, and paints a visualization into an output buffer of the same
//! size. Pixels that only differ because of anti-aliasing are detected and
//! painted separately unless [`Options::include_aa`] is set.
//!
//! The image plane is cut into tiles (see [`crate::tile`]) and every tile
//! is processed as an independent rayon task. Each task owns the output
//! pixels of its tile exclusively and returns its own counts, so results are
//! identical for any tile size and any thread count.
//!
//! # Example
//!
//! ```
//! use image::{Rgba, RgbaImage};
//! use pixeldiff::diff::{diff, Options};
//!
//! let a = RgbaImage::from_pixel(4, 4, Rgba([255, 255, 255, 255]));
//! let mut b = a.clone();
//! b.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
//! let mut out = RgbaImage::new(4, 4);
//!
//! let count = diff(&a, &b, &mut out, &Options::default()).unwrap();
//! assert_eq!(count, 1);
//! assert_eq!(*out.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
//! ```

mod error;
mod options;

pub use error::{check_images, check_storage, DiffError, ImageRole, SizeMismatch};
pub use options::Options;

use crate::antialias::is_antialiased;
use crate::compositor::{paint, Classification};
use crate::delta::{color_delta, DeltaMode};
use crate::pixels::{Packing, PixelGrid, PixelView};
use crate::tile::{TileLayout, TileMut};
use rayon::prelude::*;
use serde::Serialize;
use std::ops::Add;

/// Summary of one comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiffStats {
    pub width: u32,
    pub height: u32,
    /// Number of tiles the plane was split into
    pub tiles: usize,
    /// Pixels classified as real differences
    pub diff_count: u64,
    /// Pixels above the threshold but explained by anti-aliasing
    pub anti_aliased_count: u64,
}

impl DiffStats {
    /// Total number of pixels compared.
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Fraction of pixels that differ, in `[0, 1]`.
    pub fn diff_ratio(&self) -> f64 {
        match self.pixel_count() {
            0 => 0.0,
            n => self.diff_count as f64 / n as f64,
        }
    }

    pub fn is_identical(&self) -> bool {
        self.diff_count == 0
    }
}

/// Compare `first` and `second`, painting the result into `output`.
///
/// # Arguments
///
/// * `first` - The reference image; its faded copy forms the diff background
/// * `second` - The image compared against `first`
/// * `output` - Buffer receiving the visualization, same size as the inputs
/// * `options` - Threshold, anti-aliasing handling, colors and tile size
///
/// # Returns
///
/// The number of pixels classified as different. Anti-aliased pixels are
/// not included unless [`Options::include_aa`] is set.
///
/// # Errors
///
/// [`DiffError::EmptyImage`] if any buffer has zero area, and
/// [`DiffError::ImageSizeMismatch`] if the dimensions differ or a byte buffer
/// does not hold `width * height * 4` bytes. `output` is left untouched in
/// both cases.
///
/// # Examples
///
/// ```
/// use image::{Rgba, RgbaImage};
/// use pixeldiff::diff::{diff, DiffError, Options};
///
/// let a = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
/// let b = RgbaImage::from_pixel(3, 2, Rgba([255, 255, 255, 255]));
/// let mut out = RgbaImage::new(2, 2);
///
/// let err = diff(&a, &b, &mut out, &Options::default()).unwrap_err();
/// assert!(matches!(err, DiffError::ImageSizeMismatch(_)));
/// assert_eq!(diff(&a, &a, &mut out, &Options::default()), Ok(0));
/// ```
pub fn diff<A, B, O>(
    first: &A,
    second: &B,
    output: &mut O,
    options: &Options,
) -> Result<u64, DiffError>
where
    A: PixelGrid + ?Sized,
    B: PixelGrid + ?Sized,
    O: PixelGrid + ?Sized,
{
    diff_with_stats(first, second, output, options).map(|stats| stats.diff_count)
}

/// Like [`diff`], but returns the full [`DiffStats`].
pub fn diff_with_stats<A, B, O>(
    first: &A,
    second: &B,
    output: &mut O,
    options: &Options,
) -> Result<DiffStats, DiffError>
where
    A: PixelGrid + ?Sized,
    B: PixelGrid + ?Sized,
    O: PixelGrid + ?Sized,
{
    check_images([first.dimensions(), second.dimensions(), output.dimensions()])?;
    check_storage([
        (first.dimensions(), first.as_bytes().len()),
        (second.dimensions(), second.as_bytes().len()),
        (output.dimensions(), output.as_bytes().len()),
    ])?;

    let (width, height) = first.dimensions();
    let layout = TileLayout::new(width, height, options.tile_size);
    tracing::debug!(
        width,
        height,
        tiles = layout.len(),
        tile_size = %layout.tile_size(),
        "comparing images"
    );

    let a = first.view();
    let b = second.view();
    let packing = output.packing();
    let bytes = output.as_bytes_mut();
    let len = bytes.len();
    let tiles = layout.split_mut(bytes).ok_or_else(|| {
        DiffError::ImageSizeMismatch(vec![SizeMismatch::Storage {
            role: ImageRole::Output,
            size: (width, height),
            len,
        }])
    })?;

    let kernel = Kernel { a, b, options, max_delta: options.max_delta(), packing };
    let counts = tiles
        .into_par_iter()
        .map(|tile| kernel.run(tile))
        .reduce(TileCounts::default, |x, y| x + y);

    let stats = DiffStats {
        width,
        height,
        tiles: layout.len(),
        diff_count: counts.diff,
        anti_aliased_count: counts.anti_aliased,
    };
    tracing::debug!(
        diff_count = stats.diff_count,
        anti_aliased_count = stats.anti_aliased_count,
        "comparison finished"
    );
    Ok(stats)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct TileCounts {
    diff: u64,
    anti_aliased: u64,
}

impl Add for TileCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self { diff: self.diff + other.diff, anti_aliased: self.anti_aliased + other.anti_aliased }
    }
}

/// Read-only state shared by every tile task.
struct Kernel<'a> {
    a: PixelView<'a>,
    b: PixelView<'a>,
    options: &'a Options,
    max_delta: f64,
    packing: Packing,
}

impl Kernel<'_> {
    fn classify(&self, x: u32, y: u32) -> Classification {
        let delta = color_delta(self.a.pixel(x, y), self.b.pixel(x, y), DeltaMode::Perceptual);
        // a NaN bound is never exceeded
        let exceeds = delta.abs() > self.max_delta;
        if !exceeds {
            return Classification::Similar;
        }

        let anti_aliased = !self.options.include_aa
            && (is_antialiased(&self.a, &self.b, x, y) || is_antialiased(&self.b, &self.a, x, y));
        if anti_aliased {
            Classification::AntiAliased
        } else {
            Classification::Different
        }
    }

    fn run(&self, mut out: TileMut<'_>) -> TileCounts {
        let tile = out.tile();
        let mut counts = TileCounts::default();

        for y in tile.y0..tile.y1 {
            for x in tile.x0..tile.x1 {
                let class = self.classify(x, y);
                match class {
                    Classification::Different => counts.diff += 1,
                    Classification::AntiAliased => counts.anti_aliased += 1,
                    Classification::Similar => {}
                }
                if let Some(color) = paint(class, self.a.pixel(x, y), self.options) {
                    out.put(x, y, self.packing.pack(color));
                }
            }
        }

        tracing::trace!(?tile, diff = counts.diff, anti_aliased = counts.anti_aliased, "tile done");
        counts
    }
}
