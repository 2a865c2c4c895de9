//! Perceptual color distance between two pixels
//!
//! Implements the YIQ-space metric from "Measuring perceived color difference
//! using YIQ NTSC transmission color space in mobile applications"
//! (Y. Kotsarenko, F. Ramos). The sign of the result encodes direction.

use crate::color::Yiq;
use image::Rgba;

/// Largest magnitude [`color_delta`] can return in perceptual mode.
pub const MAX_YIQ_DELTA: f64 = 35215.0;

/// What [`color_delta`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaMode {
    /// Weighted squared distance across Y, I and Q
    Perceptual,
    /// Signed luma difference only, used for neighborhood brightness scans
    LumaOnly,
}

/// Absolute delta a pixel pair must exceed to count as different.
///
/// `threshold` is the user-facing sensitivity in `[0, 1]`.
pub fn max_delta(threshold: f64) -> f64 {
    MAX_YIQ_DELTA * threshold * threshold
}

/// Signed distance between `first` and `second`.
///
/// Identical pixels short-circuit to exactly `0.0`. In
/// [`DeltaMode::LumaOnly`] the result is `Y(first) - Y(second)`. In
/// [`DeltaMode::Perceptual`] it is `0.5053ΔY² + 0.299ΔI² + 0.1957ΔQ²`,
/// negated when `first` is brighter than `second`.
///
/// # Arguments
///
/// * `first` - Straight-alpha color; translucent colors are blended onto white
/// * `second` - Straight-alpha color to compare against
/// * `mode` - Which distance to compute
///
/// # Returns
///
/// A value in `[-35215, 35215]` for [`DeltaMode::Perceptual`]; compare its
/// magnitude against [`max_delta`].
///
/// # Examples
///
/// ```
/// use image::Rgba;
/// use pixeldiff::delta::{color_delta, DeltaMode, MAX_YIQ_DELTA};
///
/// let white = Rgba([255, 255, 255, 255]);
/// let black = Rgba([0, 0, 0, 255]);
/// assert_eq!(color_delta(white, white, DeltaMode::Perceptual), 0.0);
/// let delta = color_delta(white, black, DeltaMode::Perceptual);
/// assert!(delta < 0.0 && delta.abs() <= MAX_YIQ_DELTA);
/// ```
pub fn color_delta(first: Rgba<u8>, second: Rgba<u8>, mode: DeltaMode) -> f64 {
    if first == second {
        return 0.0;
    }

    let a = Yiq::from_rgba(first);
    let b = Yiq::from_rgba(second);
    let y = a.y - b.y;

    if mode == DeltaMode::LumaOnly {
        return y;
    }

    let i = a.i - b.i;
    let q = a.q - b.q;
    let delta = 0.5053 * y * y + 0.299 * i * i + 0.1957 * q * q;

    if a.y > b.y {
        -delta
    } else {
        delta
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
    const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);

    fn sample_pixels() -> Vec<Rgba<u8>> {
        vec![
            WHITE,
            BLACK,
            Rgba([255, 0, 0, 255]),
            Rgba([0, 128, 255, 255]),
            Rgba([12, 200, 77, 128]),
            Rgba([90, 90, 90, 0]),
            Rgba([250, 251, 252, 255]),
        ]
    }

    #[test]
    fn test_identical_pixels_are_zero() {
        for p in sample_pixels() {
            assert_eq!(color_delta(p, p, DeltaMode::Perceptual), 0.0);
            assert_eq!(color_delta(p, p, DeltaMode::LumaOnly), 0.0);
        }
    }

    #[test]
    fn test_antisymmetry() {
        let pixels = sample_pixels();
        for &p1 in &pixels {
            for &p2 in &pixels {
                let luma = color_delta(p1, p2, DeltaMode::LumaOnly);
                assert_eq!(luma, -color_delta(p2, p1, DeltaMode::LumaOnly));

                // direction is only defined when the lumas differ
                if luma != 0.0 {
                    assert_eq!(
                        color_delta(p1, p2, DeltaMode::Perceptual),
                        -color_delta(p2, p1, DeltaMode::Perceptual)
                    );
                }
            }
        }
    }

    #[test]
    fn test_darker_second_pixel_is_negative() {
        assert!(color_delta(WHITE, BLACK, DeltaMode::Perceptual) < 0.0);
        assert!(color_delta(BLACK, WHITE, DeltaMode::Perceptual) > 0.0);
    }

    #[test]
    fn test_luma_only_black_white() {
        let delta = color_delta(WHITE, BLACK, DeltaMode::LumaOnly);
        assert!((delta - 255.0).abs() < 1e-3);
    }

    #[test]
    fn test_magnitude_bounded() {
        let pixels = sample_pixels();
        for &p1 in &pixels {
            for &p2 in &pixels {
                assert!(color_delta(p1, p2, DeltaMode::Perceptual).abs() <= MAX_YIQ_DELTA);
            }
        }
    }

    #[test]
    fn test_transparent_equals_white() {
        // fully transparent composites to white, but the raw bytes differ
        let transparent = Rgba([0, 0, 0, 0]);
        assert_eq!(color_delta(transparent, WHITE, DeltaMode::Perceptual), 0.0);
    }

    #[test]
    fn test_max_delta() {
        assert_eq!(max_delta(0.0), 0.0);
        assert_eq!(max_delta(1.0), MAX_YIQ_DELTA);
        assert!((max_delta(0.1) - 352.15).abs() < 1e-9);
    }
}
