//! Precondition errors for image comparison

use std::fmt;
use thiserror::Error;

/// Which of the three buffers of a diff an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageRole {
    First,
    Second,
    Output,
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageRole::First => write!(f, "first img"),
            ImageRole::Second => write!(f, "second img"),
            ImageRole::Output => write!(f, "output img"),
        }
    }
}

/// One reason the three buffers cannot be compared pixel for pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SizeMismatch {
    /// Two buffers whose bounds differ
    Bounds { left: ImageRole, left_size: (u32, u32), right: ImageRole, right_size: (u32, u32) },
    /// A buffer whose byte length contradicts its bounds
    Storage { role: ImageRole, size: (u32, u32), len: usize },
}

impl fmt::Display for SizeMismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            SizeMismatch::Bounds { left, left_size, right, right_size } => write!(
                f,
                "\"{}\" ({}x{}) != \"{}\" ({}x{})",
                left, left_size.0, left_size.1, right, right_size.0, right_size.1
            ),
            SizeMismatch::Storage { role, size, len } => write!(
                f,
                "\"{}\" ({}x{}) holds {} bytes, expected {}",
                role,
                size.0,
                size.1,
                len,
                expected_len(size).map_or_else(|| "more".to_string(), |n| n.to_string())
            ),
        }
    }
}

/// Byte length of a tightly packed RGBA buffer, if it fits in memory.
fn expected_len((width, height): (u32, u32)) -> Option<usize> {
    (width as usize).checked_mul(height as usize)?.checked_mul(4)
}

/// Why a comparison could not start. No pixel is written when this is
/// returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiffError {
    /// One or more buffers have zero area
    #[error("image is empty: images: {}", join(.0))]
    EmptyImage(Vec<ImageRole>),
    /// Buffers do not share identical bounds
    #[error("size of images must be equal: images: {}", join(.0))]
    ImageSizeMismatch(Vec<SizeMismatch>),
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|i| i.to_string()).collect::<Vec<_>>().join(",")
}

/// Validate the first, second and output dimensions, in that order.
pub fn check_images(sizes: [(u32, u32); 3]) -> Result<(), DiffError> {
    let roles = [ImageRole::First, ImageRole::Second, ImageRole::Output];

    let empty: Vec<ImageRole> = roles
        .iter()
        .zip(sizes.iter())
        .filter(|(_, &(w, h))| w == 0 || h == 0)
        .map(|(&role, _)| role)
        .collect();
    if !empty.is_empty() {
        return Err(DiffError::EmptyImage(empty));
    }

    let mismatched: Vec<SizeMismatch> = (0..sizes.len() - 1)
        .filter(|&i| sizes[i] != sizes[i + 1])
        .map(|i| SizeMismatch::Bounds {
            left: roles[i],
            left_size: sizes[i],
            right: roles[i + 1],
            right_size: sizes[i + 1],
        })
        .collect();
    if !mismatched.is_empty() {
        return Err(DiffError::ImageSizeMismatch(mismatched));
    }

    Ok(())
}

/// Validate that the first, second and output byte buffers hold exactly
/// `width * height * 4` bytes for their dimensions.
pub fn check_storage(grids: [((u32, u32), usize); 3]) -> Result<(), DiffError> {
    let roles = [ImageRole::First, ImageRole::Second, ImageRole::Output];

    let mismatched: Vec<SizeMismatch> = roles
        .iter()
        .zip(grids.iter())
        .filter(|(_, &(size, len))| expected_len(size) != Some(len))
        .map(|(&role, &(size, len))| SizeMismatch::Storage { role, size, len })
        .collect();
    if !mismatched.is_empty() {
        return Err(DiffError::ImageSizeMismatch(mismatched));
    }

    Ok(())
}
