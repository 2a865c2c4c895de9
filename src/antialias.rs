//! Anti-aliasing detection for pixel comparison
//!
//! Decides whether a pixel that differs between two images is an
//! anti-aliasing artifact rather than a content change, following
//! "Anti-aliased Pixel and Intensity Slope Detector" (V. Vysniauskas, 2009).
//!
//! Both checks here scan the 8-connected neighborhood of a pixel, clamped to
//! the image bounds. Pixels on an edge or corner have fewer neighbors; they
//! start their equal-neighbor count at 1 to make up for it.

use crate::delta::{color_delta, DeltaMode};
use crate::pixels::PixelView;

/// The clamped 3x3 window around a pixel (bounds inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighborhood {
    x: u32,
    y: u32,
    x0: u32,
    y0: u32,
    x1: u32,
    y1: u32,
}

impl Neighborhood {
    /// Window around `(x, y)` in a `width` x `height` plane.
    pub fn around(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            x0: x.saturating_sub(1),
            y0: y.saturating_sub(1),
            x1: (x + 1).min(width - 1),
            y1: (y + 1).min(height - 1),
        }
    }

    /// Whether the window was cut by the image bounds on any side.
    pub fn is_clamped(&self) -> bool {
        self.x == self.x0 || self.x == self.x1 || self.y == self.y0 || self.y == self.y1
    }

    /// Starting count of equal neighbors: 1 for clamped windows, else 0.
    pub fn boundary_seed(&self) -> u32 {
        u32::from(self.is_clamped())
    }

    /// Neighbor positions, column by column, excluding the center.
    pub fn neighbors(self) -> impl Iterator<Item = (u32, u32)> {
        (self.x0..=self.x1)
            .flat_map(move |nx| (self.y0..=self.y1).map(move |ny| (nx, ny)))
            .filter(move |&(nx, ny)| nx != self.x || ny != self.y)
    }
}

/// True if at least 3 neighbors of `(x, y)` have exactly the same color.
pub fn has_many_siblings(image: &PixelView<'_>, x: u32, y: u32) -> bool {
    let window = Neighborhood::around(x, y, image.width(), image.height());
    let center = image.pixel(x, y);
    let mut zeroes = window.boundary_seed();

    for (nx, ny) in window.neighbors() {
        if image.pixel(nx, ny) == center {
            zeroes += 1;
        }
        if zeroes > 2 {
            return true;
        }
    }

    false
}

/// True if the pixel at `(x, y)` in `image` looks like an anti-aliased edge.
///
/// The pixel must sit between strictly darker and strictly brighter
/// neighbors with at most two neighbors of equal brightness. It counts as
/// anti-aliasing when the extreme neighbor on either side lies in a flat
/// region in both `image` and `other`.
pub fn is_antialiased(image: &PixelView<'_>, other: &PixelView<'_>, x: u32, y: u32) -> bool {
    let window = Neighborhood::around(x, y, image.width(), image.height());
    let center = image.pixel(x, y);
    let mut zeroes = window.boundary_seed();

    let mut min = 0.0;
    let mut max = 0.0;
    let mut min_pos = (0, 0);
    let mut max_pos = (0, 0);

    for (nx, ny) in window.neighbors() {
        let delta = color_delta(center, image.pixel(nx, ny), DeltaMode::LumaOnly);

        if delta == 0.0 {
            zeroes += 1;
            // flat surroundings, not an edge
            if zeroes > 2 {
                return false;
            }
        } else if delta < min {
            min = delta;
            min_pos = (nx, ny);
        } else if delta > max {
            max = delta;
            max_pos = (nx, ny);
        }
    }

    if min == 0.0 || max == 0.0 {
        return false;
    }

    let flat_in_both = |(px, py): (u32, u32)| {
        has_many_siblings(image, px, py) && has_many_siblings(other, px, py)
    };
    flat_in_both(min_pos) || flat_in_both(max_pos)
}
