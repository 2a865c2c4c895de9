//! Tiling of the image plane for parallel comparison
//!
//! A [`TileLayout`] cuts a `width` x `height` plane into a grid of disjoint
//! rectangles no larger than a [`TileSize`]. [`TileLayout::split_mut`]
//! turns an output byte buffer into one [`TileMut`] per tile, each holding
//! mutable borrows of exactly the row segments inside its rectangle. Tasks
//! can then write their own pixels concurrently while the borrow checker
//! guarantees no two tasks touch the same byte.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default maximum tile extent in each dimension.
pub const DEFAULT_TILE_EXTENT: u32 = 2000;

/// Maximum extent of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileSize {
    pub width: u32,
    pub height: u32,
}

impl TileSize {
    /// A tile size, with each dimension raised to at least 1.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width: width.max(1), height: height.max(1) }
    }

    pub fn square(extent: u32) -> Self {
        Self::new(extent, extent)
    }
}

impl Default for TileSize {
    fn default() -> Self {
        Self::square(DEFAULT_TILE_EXTENT)
    }
}

impl fmt::Display for TileSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for TileSize {
    type Err = String;

    /// Parse `WxH` (e.g. `256x128`) or a single extent (e.g. `256`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse = |part: &str| {
            part.trim()
                .parse::<u32>()
                .map_err(|_| format!("Invalid tile size '{}'. Use WxH (e.g., 256x256)", s))
        };

        let (w, h) = match s.split_once('x') {
            Some((w, h)) => (parse(w)?, parse(h)?),
            None => {
                let n = parse(s)?;
                (n, n)
            }
        };

        if w == 0 || h == 0 {
            return Err("Tile width and height must be greater than 0".to_string());
        }
        Ok(Self { width: w, height: h })
    }
}

/// A half-open rectangle `[x0, x1) x [y0, y1)` of the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub x0: u32,
    pub y0: u32,
    pub x1: u32,
    pub y1: u32,
}

impl Tile {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    pub fn area(&self) -> u64 {
        self.width() as u64 * self.height() as u64
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

/// Grid of tiles covering a plane exactly once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayout {
    width: u32,
    height: u32,
    size: TileSize,
    columns: Vec<(u32, u32)>,
    rows: Vec<(u32, u32)>,
}

impl TileLayout {
    /// Partition a `width` x `height` plane.
    ///
    /// The tile extent is clamped to the plane, so a plane smaller than
    /// `size` becomes a single tile. Tiles in the last row and column are
    /// cut short to end exactly at the plane's edge.
    ///
    /// # Arguments
    ///
    /// * `width` - Plane width in pixels
    /// * `height` - Plane height in pixels
    /// * `size` - Maximum extent of one tile
    ///
    /// # Returns
    ///
    /// A layout whose tiles cover every pixel of the plane exactly once,
    /// in row-major order.
    ///
    /// # Examples
    ///
    /// ```
    /// use pixeldiff::tile::{TileLayout, TileSize};
    ///
    /// let layout = TileLayout::new(10, 5, TileSize::new(4, 4));
    /// assert_eq!(layout.len(), 6);
    /// let widths: Vec<u32> = layout.tiles().take(3).map(|t| t.width()).collect();
    /// assert_eq!(widths, vec![4, 4, 2]);
    /// ```
    pub fn new(width: u32, height: u32, size: TileSize) -> Self {
        let size = TileSize::new(size.width.min(width), size.height.min(height));
        Self {
            width,
            height,
            size,
            columns: spans(width, size.width),
            rows: spans(height, size.height),
        }
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The effective tile extent after clamping.
    pub fn tile_size(&self) -> TileSize {
        self.size
    }

    /// Number of tiles.
    pub fn len(&self) -> usize {
        self.columns.len() * self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// All tiles in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        self.rows.iter().flat_map(move |&(y0, y1)| {
            self.columns.iter().map(move |&(x0, x1)| Tile { x0, y0, x1, y1 })
        })
    }

    /// Split a row-major RGBA byte buffer of this layout's dimensions into
    /// one mutable view per tile, in the same order as [`Self::tiles`].
    ///
    /// Returns `None` if the buffer length does not match the plane.
    pub fn split_mut<'a>(&self, bytes: &'a mut [u8]) -> Option<Vec<TileMut<'a>>> {
        let stride = self.width as usize * 4;
        if self.is_empty() || bytes.len() != stride * self.height as usize {
            return None;
        }

        let mut tiles: Vec<TileMut<'a>> = self
            .tiles()
            .map(|tile| TileMut { tile, rows: Vec::with_capacity(tile.height() as usize) })
            .collect();

        let band_height = self.size.height as usize;
        let columns = self.columns.len();

        for (y, row) in bytes.chunks_exact_mut(stride).enumerate() {
            let band = y / band_height;
            let mut rest = row;
            for (col, &(x0, x1)) in self.columns.iter().enumerate() {
                let (segment, tail) =
                    std::mem::take(&mut rest).split_at_mut((x1 - x0) as usize * 4);
                tiles[band * columns + col].rows.push(segment);
                rest = tail;
            }
        }

        Some(tiles)
    }
}

/// Consecutive `[start, end)` spans of at most `step` covering `0..extent`.
fn spans(extent: u32, step: u32) -> Vec<(u32, u32)> {
    (0..extent).step_by(step as usize).map(|start| (start, (start + step).min(extent))).collect()
}

/// Exclusive write access to the output pixels of one tile.
#[derive(Debug)]
pub struct TileMut<'a> {
    tile: Tile,
    rows: Vec<&'a mut [u8]>,
}

impl<'a> TileMut<'a> {
    pub fn tile(&self) -> Tile {
        self.tile
    }

    /// Store raw pixel bytes at absolute plane coordinates `(x, y)`.
    ///
    /// Panics if `(x, y)` lies outside this tile.
    #[inline]
    pub fn put(&mut self, x: u32, y: u32, raw: [u8; 4]) {
        debug_assert!(self.tile.contains(x, y), "({x}, {y}) outside {:?}", self.tile);
        let row = &mut self.rows[(y - self.tile.y0) as usize];
        let i = (x - self.tile.x0) as usize * 4;
        row[i..i + 4].copy_from_slice(&raw);
    }
}
