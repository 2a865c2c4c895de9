//! Configuration schema types for `pixeldiff.toml`
//!
//! Defines the structure and validation rules for comparison settings.

use crate::color::{format_color, parse_color, ColorError};
use crate::diff::Options;
use crate::tile::{TileSize, DEFAULT_TILE_EXTENT};
use serde::{Deserialize, Serialize};

/// `[diff]` section: how pixels are compared and painted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiffConfig {
    /// Matching threshold, 0 to 1
    pub threshold: f64,
    /// Count anti-aliased pixels as differences
    pub include_aa: bool,
    /// Opacity of the faded background, 0 to 1
    pub alpha: f64,
    /// Marker color for anti-aliased pixels
    pub aa_color: String,
    /// Marker color for different pixels
    pub diff_color: String,
    /// Alternative marker color for pixels that got darker
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff_color_alt: Option<String>,
    /// Paint differences only
    pub diff_mask: bool,
    /// Maximum tile extent [width, height]
    pub tile_size: [u32; 2],
}

impl Default for DiffConfig {
    fn default() -> Self {
        let options = Options::default();
        Self {
            threshold: options.threshold,
            include_aa: options.include_aa,
            alpha: options.alpha,
            aa_color: format_color(options.aa_color),
            diff_color: format_color(options.diff_color),
            diff_color_alt: None,
            diff_mask: options.diff_mask,
            tile_size: [DEFAULT_TILE_EXTENT, DEFAULT_TILE_EXTENT],
        }
    }
}

/// `[run]` section: execution settings for the command-line tool
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Worker threads; unset means one per available core
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jobs: Option<usize>,
}

/// Complete `pixeldiff.toml` configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PixeldiffConfig {
    pub diff: DiffConfig,
    pub run: RunConfig,
}

/// Configuration validation error
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigValidationError {
    /// Path to the invalid field (e.g., "diff.threshold")
    pub field: String,
    /// Error message
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "pixeldiff.toml: '{}' {}", self.field, self.message)
    }
}

impl PixeldiffConfig {
    /// Validate the configuration and return any errors
    pub fn validate(&self) -> Vec<ConfigValidationError> {
        let mut errors = Vec::new();
        let mut push = |field: &str, message: String| {
            errors.push(ConfigValidationError { field: field.to_string(), message })
        };

        let diff = &self.diff;
        if !(0.0..=1.0).contains(&diff.threshold) {
            push("diff.threshold", "must be between 0 and 1".to_string());
        }
        if !(0.0..=1.0).contains(&diff.alpha) {
            push("diff.alpha", "must be between 0 and 1".to_string());
        }
        if diff.tile_size[0] == 0 || diff.tile_size[1] == 0 {
            push("diff.tile_size", "dimensions must be positive".to_string());
        }

        let colors = [
            ("diff.aa_color", Some(&diff.aa_color)),
            ("diff.diff_color", Some(&diff.diff_color)),
            ("diff.diff_color_alt", diff.diff_color_alt.as_ref()),
        ];
        for (field, value) in colors {
            if let Some(Err(e)) = value.map(|v| parse_color(v)) {
                push(field, format!("is not a valid color: {}", e));
            }
        }

        if self.run.jobs == Some(0) {
            push("run.jobs", "must be a positive integer".to_string());
        }

        errors
    }

    /// Build comparison options from this configuration.
    ///
    /// Out-of-range numbers are clamped; colors that fail to parse are
    /// reported as errors.
    pub fn to_options(&self) -> Result<Options, ColorError> {
        let diff = &self.diff;
        let diff_color_alt = diff.diff_color_alt.as_deref().map(parse_color).transpose()?;

        Ok(Options::default()
            .with_threshold(diff.threshold)
            .with_include_aa(diff.include_aa)
            .with_alpha(diff.alpha)
            .with_aa_color(parse_color(&diff.aa_color)?)
            .with_diff_color(parse_color(&diff.diff_color)?)
            .with_diff_color_alt(diff_color_alt)
            .with_diff_mask(diff.diff_mask)
            .with_tile_size(TileSize::new(diff.tile_size[0], diff.tile_size[1])))
    }
}
