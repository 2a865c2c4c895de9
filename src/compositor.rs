//! Output painting for classified pixels

use crate::color::{blend, rgb2y};
use crate::diff::Options;
use image::Rgba;

/// Outcome of comparing one pixel position across the two images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    /// Delta at or below the threshold
    Similar,
    /// Above the threshold, but explained by anti-aliasing
    AntiAliased,
    /// A real difference
    Different,
}

/// Color to write for a classified pixel, or `None` to leave it untouched.
///
/// `source` is the first image's pixel, used for the faded background.
/// In mask mode only differences are drawn.
pub fn paint(class: Classification, source: Rgba<u8>, options: &Options) -> Option<Rgba<u8>> {
    match class {
        Classification::Different => Some(options.diff_color),
        Classification::AntiAliased if !options.diff_mask => Some(options.aa_color),
        Classification::Similar if !options.diff_mask => Some(gray_pixel(source, options.alpha)),
        _ => None,
    }
}

/// Grayscale version of `pixel`, faded toward white by `alpha` and by the
/// pixel's own opacity. The result is always opaque.
pub fn gray_pixel(pixel: Rgba<u8>, alpha: f64) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let luma = rgb2y(r as f64, g as f64, b as f64);
    let val = blend(luma, alpha * a as f64 / 255.0).round().clamp(0.0, 255.0) as u8;
    Rgba([val, val, val, 255])
}
