//! Render configuration.
//!
//! Everything device or platform dependent is carried here and handed to the
//! [`Canvas`](crate::Canvas) constructor.

use crate::error::SnapResult;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Host platform the layout was captured on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
    Ios,
    Android,
    Mac,
    Windows,
    Devtools,
    #[default]
    #[serde(other)]
    Other,
}

impl Platform {
    pub fn is_mobile(self) -> bool {
        matches!(self, Platform::Ios | Platform::Android)
    }
}

/// How right-to-left lines are prepared before they are drawn.
///
/// Hosts differ in how their text primitive orders RTL runs, so this is a
/// compatibility shim chosen once per render rather than a layout rule.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDirectionStrategy {
    /// Move a trailing delimiter run to the front of the line.
    #[default]
    RotateTrailingDelimiter,
    /// Reverse the whole line grapheme by grapheme.
    ReverseGraphemes,
    /// Draw lines as laid out.
    None,
}

/// Empirical corrections between layout text metrics and the surface's.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextCalibration {
    /// Line height multiplier used for `line-height: normal`.
    pub default_line_height: f64,
    /// Fraction of the font size added to every baseline.
    pub font_size_offset: f64,
    /// Fraction of the line height added when it differs from the font size.
    pub line_height_offset: f64,
}

impl Default for TextCalibration {
    fn default() -> Self {
        Self {
            default_line_height: 1.35,
            font_size_offset: 0.08,
            line_height_offset: 0.11,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// User requested output scale.
    pub scale: f64,
    /// Physical pixels per layout pixel.
    pub device_pixel_ratio: f64,
    pub platform: Platform,
    pub text_direction: TextDirectionStrategy,
    /// Use UAX #29 word boundaries for line breaking. When false a
    /// delimiter scan is used instead.
    pub word_segmentation: bool,
    /// Forward `filter` styles to the surface.
    pub filter: bool,
    pub text_metrics: TextCalibration,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            device_pixel_ratio: 1.0,
            platform: Platform::Other,
            text_direction: TextDirectionStrategy::default(),
            word_segmentation: true,
            filter: true,
            text_metrics: TextCalibration::default(),
        }
    }
}

impl RenderConfig {
    /// Defaults for a platform. Mobile hosts reverse RTL lines grapheme by
    /// grapheme; everything else rotates the trailing delimiter.
    pub fn for_platform(platform: Platform, device_pixel_ratio: f64) -> Self {
        let text_direction = if platform.is_mobile() {
            TextDirectionStrategy::ReverseGraphemes
        } else {
            TextDirectionStrategy::RotateTrailingDelimiter
        };
        Self {
            platform,
            device_pixel_ratio,
            text_direction,
            ..Self::default()
        }
    }

    /// Layout pixel to surface pixel factor.
    pub fn device_scale(&self) -> f64 {
        let scale = self.scale * self.device_pixel_ratio;
        if scale.is_finite() && scale > 0.0 {
            scale
        } else {
            1.0
        }
    }

    /// Read a JSON configuration file. Missing keys keep their defaults.
    pub fn from_json_file(path: &Path) -> SnapResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }
}
