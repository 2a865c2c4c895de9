//! End-to-end comparison scenarios through the public library API.

use image::{Rgba, RgbaImage};
use pixeldiff::{diff, diff_with_stats, DiffError, Options, PremultipliedImage, TileSize};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);
const BLACK: Rgba<u8> = Rgba([0, 0, 0, 255]);
const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const YELLOW: Rgba<u8> = Rgba([255, 255, 0, 255]);
const CLEAR: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Black above the diagonal, white below, `diagonal` on it.
fn diagonal_edge(size: u32, diagonal: Rgba<u8>) -> RgbaImage {
    RgbaImage::from_fn(size, size, |x, y| match x.cmp(&y) {
        std::cmp::Ordering::Greater => BLACK,
        std::cmp::Ordering::Less => WHITE,
        std::cmp::Ordering::Equal => diagonal,
    })
}

/// Blocky image with a few scattered edits in the second variant.
fn blocks(width: u32, height: u32, edited: bool) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let base = match (x / 4 + y / 3) % 3 {
            0 => WHITE,
            1 => Rgba([30, 120, 200, 255]),
            _ => Rgba([240, 200, 40, 180]),
        };
        if edited && (x * 7 + y * 13) % 23 == 0 {
            Rgba([base[2], base[0], base[1], 255])
        } else {
            base
        }
    })
}

// ============================================================================
// Scenarios
// ============================================================================

#[test]
fn test_solid_red_images_are_equal() {
    let a = RgbaImage::from_pixel(4, 4, RED);
    let b = a.clone();
    let mut out = RgbaImage::new(4, 4);

    let stats = diff_with_stats(&a, &b, &mut out, &Options::default()).unwrap();
    assert_eq!(stats.diff_count, 0);
    assert_eq!(stats.anti_aliased_count, 0);
    // red luma 76.2 faded 10% toward white
    assert!(out.pixels().all(|p| *p == Rgba([237, 237, 237, 255])));
}

#[test]
fn test_single_interior_pixel_changed() {
    let a = RgbaImage::from_pixel(5, 5, WHITE);
    let mut b = a.clone();
    b.put_pixel(2, 2, BLACK);
    let mut out = RgbaImage::new(5, 5);

    let count = diff(&a, &b, &mut out, &Options::default()).unwrap();
    assert_eq!(count, 1);
    for (x, y, p) in out.enumerate_pixels() {
        if (x, y) == (2, 2) {
            assert_eq!(*p, RED);
        } else {
            assert_eq!(*p, WHITE, "({x}, {y})");
        }
    }
}

#[test]
fn test_antialiased_diagonal_is_not_counted() {
    let soft = diagonal_edge(8, Rgba([128, 128, 128, 255]));
    let hard = diagonal_edge(8, WHITE);
    let mut out = RgbaImage::new(8, 8);

    let stats = diff_with_stats(&soft, &hard, &mut out, &Options::default()).unwrap();
    assert_eq!(stats.diff_count, 0);
    assert_eq!(stats.anti_aliased_count, 8);
    for i in 0..8 {
        assert_eq!(*out.get_pixel(i, i), YELLOW);
    }

    // both argument orders agree
    let reversed = diff_with_stats(&hard, &soft, &mut out, &Options::default()).unwrap();
    assert_eq!(reversed.diff_count, 0);
    assert_eq!(reversed.anti_aliased_count, 8);
}

#[test]
fn test_antialiased_diagonal_with_mask() {
    let soft = diagonal_edge(8, Rgba([128, 128, 128, 255]));
    let hard = diagonal_edge(8, WHITE);
    let mut out = RgbaImage::new(8, 8);

    let options = Options::default().with_diff_mask(true);
    assert_eq!(diff(&soft, &hard, &mut out, &options).unwrap(), 0);
    assert!(out.pixels().all(|p| *p == CLEAR));
}

#[test]
fn test_custom_marker_colors() {
    let a = RgbaImage::from_pixel(3, 3, WHITE);
    let mut b = a.clone();
    b.put_pixel(1, 1, BLACK);
    let mut out = RgbaImage::new(3, 3);

    let blue = Rgba([0, 0, 255, 255]);
    let options = Options::default().with_diff_color(blue).with_alpha(1.0);
    assert_eq!(diff(&a, &b, &mut out, &options).unwrap(), 1);
    assert_eq!(*out.get_pixel(1, 1), blue);
    assert_eq!(*out.get_pixel(0, 0), WHITE);
}

// ============================================================================
// Invariants
// ============================================================================

#[test]
fn test_masking_invariant() {
    let a = blocks(23, 17, false);
    let b = blocks(23, 17, true);

    let mut masked = RgbaImage::new(23, 17);
    let options = Options::default().with_diff_mask(true);
    let count = diff(&a, &b, &mut masked, &options).unwrap();
    assert!(count > 0);
    let painted = masked.pixels().filter(|p| **p != CLEAR).count() as u64;
    assert_eq!(painted, count);
    assert!(masked.pixels().all(|p| *p == CLEAR || *p == RED));

    let mut full = RgbaImage::new(23, 17);
    diff(&a, &b, &mut full, &Options::default()).unwrap();
    // every pixel is painted opaque without the mask
    assert!(full.pixels().all(|p| p[3] == 255));
}

#[test]
fn test_tiling_invariance() {
    let a = blocks(37, 29, false);
    let b = blocks(37, 29, true);

    let run = |size: TileSize| {
        let mut out = RgbaImage::new(37, 29);
        let options = Options::default().with_tile_size(size);
        let count = diff(&a, &b, &mut out, &options).unwrap();
        (count, out)
    };

    let whole = run(TileSize::new(37, 29));
    for size in [TileSize::new(1, 1), TileSize::new(5, 3), TileSize::new(36, 28), TileSize::new(2, 29)]
    {
        assert_eq!(run(size), whole, "tile size {size}");
    }
}

#[test]
fn test_differences_across_default_tile_boundary() {
    let a = RgbaImage::from_pixel(2100, 3, WHITE);
    let mut b = a.clone();
    b.put_pixel(1999, 1, BLACK);
    b.put_pixel(2000, 1, BLACK);
    let mut out = RgbaImage::new(2100, 3);

    let stats = diff_with_stats(&a, &b, &mut out, &Options::default()).unwrap();
    assert_eq!(stats.tiles, 2);
    assert_eq!(stats.diff_count, 2);
    assert_eq!(*out.get_pixel(1999, 1), RED);
    assert_eq!(*out.get_pixel(2000, 1), RED);
}

#[test]
fn test_degenerate_shapes() {
    for (w, h) in [(1, 1), (1, 6), (6, 1)] {
        let a = RgbaImage::from_pixel(w, h, WHITE);
        let mut b = a.clone();
        b.put_pixel(0, 0, BLACK);
        let mut out = RgbaImage::new(w, h);
        assert_eq!(diff(&a, &b, &mut out, &Options::default()).unwrap(), 1, "{w}x{h}");
    }
}

#[test]
fn test_transparent_pixels_compare_as_white() {
    let a = RgbaImage::from_pixel(3, 3, CLEAR);
    let b = RgbaImage::from_pixel(3, 3, WHITE);
    let mut out = RgbaImage::new(3, 3);
    assert_eq!(diff(&a, &b, &mut out, &Options::default()).unwrap(), 0);
}

#[test]
fn test_premultiplied_opaque_matches_straight() {
    let a = blocks(12, 9, false);
    let b = blocks(12, 9, true);
    let opaque = |img: &RgbaImage| {
        let mut img = img.clone();
        img.pixels_mut().for_each(|p| p[3] = 255);
        img
    };
    let (a, b) = (opaque(&a), opaque(&b));

    let mut straight_out = RgbaImage::new(12, 9);
    let expected = diff(&a, &b, &mut straight_out, &Options::default()).unwrap();

    let mut out = PremultipliedImage::new(12, 9);
    let count = diff(
        &PremultipliedImage::from_straight(&a),
        &PremultipliedImage::from_straight(&b),
        &mut out,
        &Options::default(),
    )
    .unwrap();
    assert_eq!(count, expected);
    assert_eq!(out.to_straight(), straight_out);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_empty_image_error() {
    let a = RgbaImage::new(0, 0);
    let b = RgbaImage::new(0, 0);
    let mut out = RgbaImage::new(2, 2);
    let err = diff(&a, &b, &mut out, &Options::default()).unwrap_err();
    assert!(matches!(err, DiffError::EmptyImage(_)));
    assert_eq!(err.to_string(), "image is empty: images: first img,second img");
}

#[test]
fn test_size_mismatch_error_keeps_output() {
    let a = RgbaImage::from_pixel(4, 4, WHITE);
    let b = RgbaImage::from_pixel(4, 4, BLACK);
    let mut out = RgbaImage::from_pixel(4, 3, RED);

    let err = diff(&a, &b, &mut out, &Options::default()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "size of images must be equal: images: \"second img\" (4x4) != \"output img\" (4x3)"
    );
    assert!(out.pixels().all(|p| *p == RED));
}
