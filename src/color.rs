//! Color utilities for perceptual comparison
//!
//! Two concerns live here:
//! - Conversion of 8-bit RGBA pixels into the NTSC YIQ space used by the
//!   perceptual delta metric, including alpha compositing over white
//! - Parsing of marker colors (`aa_color`, `diff_color`) from hex or CSS strings

use image::Rgba;
use lightningcss::traits::Parse;
use lightningcss::values::color::CssColor;
use thiserror::Error;

/// Error type for color parsing failures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorError {
    /// Input string was empty
    #[error("empty color string")]
    Empty,
    /// Invalid length (must be 3, 4, 6, or 8 hex chars after #)
    #[error("invalid color length {0}, expected 3, 4, 6, or 8")]
    InvalidLength(usize),
    /// Contains non-hex characters
    #[error("invalid hex character '{0}'")]
    InvalidHex(char),
    /// CSS parsing error from lightningcss
    #[error("CSS parse error: {0}")]
    CssParse(String),
}

/// A pixel in YIQ space: luma (`y`) and the two chroma axes (`i`, `q`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Yiq {
    pub y: f64,
    pub i: f64,
    pub q: f64,
}

impl Yiq {
    /// Convert a straight-alpha RGBA pixel to YIQ.
    ///
    /// Translucent pixels are first composited over a white backdrop, so a
    /// fully transparent pixel of any color converts like pure white.
    /// Opaque pixels skip the blend.
    pub fn from_rgba(pixel: Rgba<u8>) -> Self {
        let (r, g, b) = composite_over_white(pixel);
        Self { y: rgb2y(r, g, b), i: rgb2i(r, g, b), q: rgb2q(r, g, b) }
    }
}

/// Luma of an RGB triple.
pub fn rgb2y(r: f64, g: f64, b: f64) -> f64 {
    r * 0.29889531 + g * 0.58662247 + b * 0.11448223
}

/// In-phase chroma of an RGB triple.
pub fn rgb2i(r: f64, g: f64, b: f64) -> f64 {
    r * 0.59597799 - g * 0.27417610 - b * 0.32180189
}

/// Quadrature chroma of an RGB triple.
pub fn rgb2q(r: f64, g: f64, b: f64) -> f64 {
    r * 0.21147017 - g * 0.52261711 + b * 0.31114694
}

/// Blend a channel value toward white by opacity `a` in `[0, 1]`.
pub fn blend(c: f64, a: f64) -> f64 {
    255.0 + (c - 255.0) * a
}

/// Channel values of `pixel` as they appear over a white background.
pub fn composite_over_white(pixel: Rgba<u8>) -> (f64, f64, f64) {
    let [r, g, b, a] = pixel.0;
    let (r, g, b) = (r as f64, g as f64, b as f64);
    if a == 255 {
        return (r, g, b);
    }

    let a = a as f64 / 255.0;
    (blend(r, a), blend(g, a), blend(b, a))
}

/// Parse a marker color string into an RGBA color.
///
/// Accepts `#RGB`, `#RGBA`, `#RRGGBB`, `#RRGGBBAA`, and any CSS color
/// understood by lightningcss (`rgb()`, `hsl()`, named colors, ...).
///
/// # Examples
///
/// ```
/// use pixeldiff::color::parse_color;
///
/// assert_eq!(parse_color("#FF0").unwrap(), image::Rgba([255, 255, 0, 255]));
/// assert_eq!(parse_color("#ff000080").unwrap(), image::Rgba([255, 0, 0, 128]));
/// assert_eq!(parse_color("red").unwrap(), image::Rgba([255, 0, 0, 255]));
/// ```
///
/// # Errors
///
/// Returns `ColorError` if the input is invalid or unparseable.
pub fn parse_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(ColorError::Empty);
    }

    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex_color(hex);
    }

    parse_css_color(s)
}

/// Format a color as `#RRGGBBAA`, or `#RRGGBB` when fully opaque.
pub fn format_color(color: Rgba<u8>) -> String {
    let [r, g, b, a] = color.0;
    if a == 255 {
        format!("#{:02X}{:02X}{:02X}", r, g, b)
    } else {
        format!("#{:02X}{:02X}{:02X}{:02X}", r, g, b, a)
    }
}

/// Parse the hex digits following a '#'
fn parse_hex_color(hex: &str) -> Result<Rgba<u8>, ColorError> {
    if let Some(c) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
        return Err(ColorError::InvalidHex(c));
    }

    let digits: Vec<u8> = hex.bytes().map(hex_value).collect();
    match digits.len() {
        // short forms double each digit
        3 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, 255])),
        4 => Ok(Rgba([digits[0] * 17, digits[1] * 17, digits[2] * 17, digits[3] * 17])),
        6 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            255,
        ])),
        8 => Ok(Rgba([
            digits[0] * 16 + digits[1],
            digits[2] * 16 + digits[3],
            digits[4] * 16 + digits[5],
            digits[6] * 16 + digits[7],
        ])),
        len => Err(ColorError::InvalidLength(len)),
    }
}

/// Value of an ASCII hex digit already known to be valid
fn hex_value(b: u8) -> u8 {
    match b {
        b'0'..=b'9' => b - b'0',
        b'a'..=b'f' => b - b'a' + 10,
        _ => b - b'A' + 10,
    }
}

/// Parse a CSS color using lightningcss (rgb, hsl, hwb, oklch, named colors)
fn parse_css_color(s: &str) -> Result<Rgba<u8>, ColorError> {
    let css_color = CssColor::parse_string(s).map_err(|e| ColorError::CssParse(e.to_string()))?;
    css_color_to_rgba(css_color)
}

/// Convert a lightningcss CssColor to RGBA
fn css_color_to_rgba(color: CssColor) -> Result<Rgba<u8>, ColorError> {
    use lightningcss::values::color::FloatColor;

    let rgb_color = color
        .to_rgb()
        .map_err(|_| ColorError::CssParse("cannot convert color to RGB".to_string()))?;

    match rgb_color {
        CssColor::RGBA(rgba) => Ok(Rgba([rgba.red, rgba.green, rgba.blue, rgba.alpha])),
        // 'none' components come back as float colors
        CssColor::Float(float_color) => match float_color.as_ref() {
            FloatColor::RGB(rgb) => {
                let r = (rgb.r * 255.0).round() as u8;
                let g = (rgb.g * 255.0).round() as u8;
                let b = (rgb.b * 255.0).round() as u8;
                let a = (rgb.alpha * 255.0).round() as u8;
                Ok(Rgba([r, g, b, a]))
            }
            _ => Err(ColorError::CssParse("unexpected float color format".to_string())),
        },
        _ => Err(ColorError::CssParse("color conversion did not produce RGB".to_string())),
    }
}
