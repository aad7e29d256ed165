//! Multi-line text layout.
//!
//! Text is split into break units ([`segment`]) and packed greedily into
//! the lines the content box can hold ([`layout`]). Measuring is left to
//! the caller so the same layout runs against any surface.

pub mod layout;
pub mod segment;

pub use layout::{layout_text, line_budget, LayoutParams, TextLayout, ELLIPSIS};
pub use segment::{break_units, Segment, SegmentKind};

use crate::css::{self, LengthPercent};

/// Resolve a computed `line-height` to pixels.
///
/// `normal` and anything unparseable use `default_factor` times the font
/// size.
pub fn line_height(value: &str, font_size: f64, default_factor: f64) -> f64 {
    let value = value.trim();
    if let Ok(factor) = value.parse::<f64>() {
        if factor.is_finite() && factor >= 0.0 {
            return font_size * factor;
        }
    }
    if value.ends_with("px") || value.ends_with('%') {
        if let Some(lp) = LengthPercent::parse(value) {
            let px = lp.resolve(font_size);
            if px > 0.0 {
                return px;
            }
        }
    }
    font_size * default_factor
}

/// Font size in pixels, 16 when unparseable.
pub fn font_size(value: &str) -> f64 {
    css::parse_number_prefix(value)
        .filter(|v| *v > 0.0)
        .unwrap_or(16.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("normal", 21.6)]
    #[case("1.5", 24.0)]
    #[case("30px", 30.0)]
    #[case("150%", 24.0)]
    #[case("junk", 21.6)]
    fn test_line_height(#[case] value: &str, #[case] expected: f64) {
        assert!((line_height(value, 16.0, 1.35) - expected).abs() < 1e-9);
    }

    #[rstest]
    #[case("14px", 14.0)]
    #[case("", 16.0)]
    #[case("0px", 16.0)]
    fn test_font_size(#[case] value: &str, #[case] expected: f64) {
        assert_eq!(font_size(value), expected);
    }
}
