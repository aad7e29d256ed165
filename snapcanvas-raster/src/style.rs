//! Fill styles and text placement enums.

use crate::gradient::CanvasGradient;

/// Paint source used for fills and strokes.
#[derive(Debug, Clone)]
pub enum FillStyle {
    Color(tiny_skia::Color),
    Gradient(CanvasGradient),
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle::Color(tiny_skia::Color::BLACK)
    }
}

/// Horizontal anchoring of text relative to the x coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
}

/// Vertical anchoring of text relative to the y coordinate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextBaseline {
    Top,
    Middle,
    #[default]
    Alphabetic,
    Bottom,
}
