//! Comparison options

use crate::delta::max_delta;
use crate::tile::TileSize;
use image::Rgba;

/// Immutable settings for one comparison.
///
/// Construct with [`Options::default`] and adjust with the `with_*`
/// builders; the engine only ever reads it.
///
/// # Example
///
/// ```
/// use pixeldiff::diff::Options;
///
/// let options = Options::default().with_threshold(0.05).with_diff_mask(true);
/// assert_eq!(options.threshold, 0.05);
/// assert!(!options.include_aa);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Matching threshold in `[0, 1]`; smaller is more sensitive
    pub threshold: f64,
    /// Count anti-aliased pixels as differences instead of detecting them
    pub include_aa: bool,
    /// Opacity of the first image in the faded background, `[0, 1]`
    pub alpha: f64,
    /// Marker for anti-aliased pixels
    pub aa_color: Rgba<u8>,
    /// Marker for different pixels
    pub diff_color: Rgba<u8>,
    /// Alternative marker for pixels that got darker. Carried through
    /// configuration but not applied when painting.
    pub diff_color_alt: Option<Rgba<u8>>,
    /// Draw only differences, leaving every other pixel untouched
    pub diff_mask: bool,
    /// Maximum extent of one parallel tile
    pub tile_size: TileSize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            include_aa: false,
            alpha: 0.1,
            aa_color: Rgba([255, 255, 0, 255]),
            diff_color: Rgba([255, 0, 0, 255]),
            diff_color_alt: None,
            diff_mask: false,
            tile_size: TileSize::default(),
        }
    }
}

impl Options {
    /// Set the threshold, clamped to `[0, 1]`. NaN keeps the current value.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        if !threshold.is_nan() {
            self.threshold = threshold.clamp(0.0, 1.0);
        }
        self
    }

    pub fn with_include_aa(mut self, include_aa: bool) -> Self {
        self.include_aa = include_aa;
        self
    }

    /// Set the background opacity, clamped to `[0, 1]`. NaN keeps the
    /// current value.
    pub fn with_alpha(mut self, alpha: f64) -> Self {
        if !alpha.is_nan() {
            self.alpha = alpha.clamp(0.0, 1.0);
        }
        self
    }

    pub fn with_aa_color(mut self, color: Rgba<u8>) -> Self {
        self.aa_color = color;
        self
    }

    pub fn with_diff_color(mut self, color: Rgba<u8>) -> Self {
        self.diff_color = color;
        self
    }

    pub fn with_diff_color_alt(mut self, color: Option<Rgba<u8>>) -> Self {
        self.diff_color_alt = color;
        self
    }

    pub fn with_diff_mask(mut self, diff_mask: bool) -> Self {
        self.diff_mask = diff_mask;
        self
    }

    pub fn with_tile_size(mut self, tile_size: TileSize) -> Self {
        self.tile_size = TileSize::new(tile_size.width, tile_size.height);
        self
    }

    /// Absolute perceptual delta above which a pixel pair differs.
    pub fn max_delta(&self) -> f64 {
        max_delta(self.threshold)
    }
}
