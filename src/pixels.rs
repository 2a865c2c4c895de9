//! Pixel grid capability shared by the inputs and the output of a diff
//!
//! Every buffer handed to the diff engine is a rectangular grid of 8-bit
//! RGBA pixels addressed as raw bytes. How those bytes relate to color is
//! the buffer's [`Packing`]: straight (non-premultiplied) alpha as produced
//! by PNG decoders, or premultiplied alpha as used by most rasterizers.
//! The packing is read once when a [`PixelView`] is created; the comparison
//! kernel only ever sees straight-alpha [`Rgba`] values.

use image::{Rgba, RgbaImage};
use std::ops::DerefMut;

/// How color channels relate to alpha in a byte buffer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Packing {
    /// Channels stored independently of alpha (NRGBA)
    #[default]
    Straight,
    /// Channels stored pre-multiplied by alpha
    Premultiplied,
}

impl Packing {
    /// Decode four stored bytes into a straight-alpha color.
    pub fn unpack(self, raw: [u8; 4]) -> Rgba<u8> {
        match self {
            Packing::Straight => Rgba(raw),
            Packing::Premultiplied => Rgba(demultiply(raw)),
        }
    }

    /// Encode a straight-alpha color into four stored bytes.
    pub fn pack(self, color: Rgba<u8>) -> [u8; 4] {
        match self {
            Packing::Straight => color.0,
            Packing::Premultiplied => premultiply(color.0),
        }
    }
}

fn premultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    let scale = |c: u8| ((c as u16 * a as u16 + 127) / 255) as u8;
    [scale(r), scale(g), scale(b), a]
}

fn demultiply([r, g, b, a]: [u8; 4]) -> [u8; 4] {
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let a16 = a as u16;
    let scale = |c: u8| ((c as u16 * 255 + a16 / 2) / a16).min(255) as u8;
    [scale(r), scale(g), scale(b), a]
}

/// A rectangular RGBA pixel buffer the diff engine can read and write.
///
/// Implementors guarantee `as_bytes().len() == width * height * 4`, rows
/// stored top to bottom without padding.
pub trait PixelGrid {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Channel packing of the stored bytes.
    fn packing(&self) -> Packing;

    /// Raw RGBA bytes, row-major.
    fn as_bytes(&self) -> &[u8];

    /// Raw RGBA bytes, row-major, for writing.
    fn as_bytes_mut(&mut self) -> &mut [u8];

    /// A read-only view decoding pixels according to this grid's packing.
    fn view(&self) -> PixelView<'_> {
        let (width, height) = self.dimensions();
        PixelView { bytes: self.as_bytes(), width, height, packing: self.packing() }
    }
}

impl PixelGrid for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    fn packing(&self) -> Packing {
        Packing::Straight
    }

    fn as_bytes(&self) -> &[u8] {
        self.as_raw()
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        self.deref_mut()
    }
}

/// An RGBA buffer whose color channels are premultiplied by alpha.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PremultipliedImage {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PremultipliedImage {
    /// A fully transparent image.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height, data: vec![0; width as usize * height as usize * 4] }
    }

    /// Wrap existing premultiplied bytes. Returns `None` if the length does
    /// not match the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        if data.len() != width as usize * height as usize * 4 {
            return None;
        }
        Some(Self { width, height, data })
    }

    /// Premultiply a straight-alpha image.
    pub fn from_straight(image: &RgbaImage) -> Self {
        let data = image
            .as_raw()
            .chunks_exact(4)
            .flat_map(|px| premultiply([px[0], px[1], px[2], px[3]]))
            .collect();
        Self { width: image.width(), height: image.height(), data }
    }

    /// Demultiply into a straight-alpha image.
    pub fn to_straight(&self) -> RgbaImage {
        let data = self
            .data
            .chunks_exact(4)
            .flat_map(|px| demultiply([px[0], px[1], px[2], px[3]]))
            .collect();
        RgbaImage::from_raw(self.width, self.height, data)
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// The stored straight-alpha color at `(x, y)`.
    pub fn get_pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        self.view().pixel(x, y)
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl PixelGrid for PremultipliedImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn packing(&self) -> Packing {
        Packing::Premultiplied
    }

    fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

/// Borrowed, immutable, packing-aware access to a pixel grid.
#[derive(Debug, Clone, Copy)]
pub struct PixelView<'a> {
    bytes: &'a [u8],
    width: u32,
    height: u32,
    packing: Packing,
}

impl<'a> PixelView<'a> {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Straight-alpha color at `(x, y)`. Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba<u8> {
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.bytes[i..i + 4];
        self.packing.unpack([px[0], px[1], px[2], px[3]])
    }
}
