//! Raster rendering context.

mod drawing;
mod image_ops;
mod text_rendering;
mod transform;

use crate::drawing_state::DrawingState;
use crate::error::{RasterError, RasterResult};
use crate::font_config::FontConfig;
use crate::gradient::CanvasGradient;
use crate::shadow::Shadow;
use crate::style::FillStyle;
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::Pixmap;

/// Maximum surface dimension (same as Chrome).
const MAX_DIMENSION: u32 = 32767;

/// Canvas 2D style rendering context over a tiny-skia pixmap.
pub struct RasterContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixmap: Pixmap,
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
    pub(crate) state: DrawingState,
    state_stack: Vec<DrawingState>,
}

impl std::fmt::Debug for RasterContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterContext")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl RasterContext {
    /// Create a context that can draw text with the system fonts.
    pub fn new(width: u32, height: u32) -> RasterResult<Self> {
        Self::with_fonts(width, height, &FontConfig::default())
    }

    /// Create a context with an explicit font configuration.
    pub fn with_fonts(width: u32, height: u32, config: &FontConfig) -> RasterResult<Self> {
        Self::with_font_database(width, height, config.to_database())
    }

    /// Create a context from an already built font database, avoiding a
    /// second system font scan when several surfaces share fonts.
    pub fn with_font_database(
        width: u32,
        height: u32,
        font_db: fontdb::Database,
    ) -> RasterResult<Self> {
        if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
            return Err(RasterError::InvalidDimensions { width, height });
        }
        let pixmap =
            Pixmap::new(width, height).ok_or(RasterError::InvalidDimensions { width, height })?;
        let font_system = FontSystem::new_with_locale_and_db("en".to_string(), font_db);

        Ok(Self {
            width,
            height,
            pixmap,
            font_system,
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            state_stack: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Save the current drawing state.
    pub fn save(&mut self) {
        log::debug!(target: "canvas", "save");
        self.state_stack.push(self.state.clone());
    }

    /// Restore the most recently saved drawing state. Does nothing when the
    /// stack is empty.
    pub fn restore(&mut self) {
        log::debug!(target: "canvas", "restore");
        if let Some(state) = self.state_stack.pop() {
            self.state = state;
        }
    }

    /// Number of states currently on the save stack.
    pub fn save_depth(&self) -> usize {
        self.state_stack.len()
    }

    // --- Style setters ---

    /// Set the fill style from a CSS color string.
    pub fn set_fill_style(&mut self, style: &str) -> RasterResult<()> {
        self.state.fill_style = FillStyle::Color(parse_color(style)?);
        Ok(())
    }

    pub fn set_fill_color(&mut self, color: tiny_skia::Color) {
        self.state.fill_style = FillStyle::Color(color);
    }

    pub fn set_fill_gradient(&mut self, gradient: CanvasGradient) {
        self.state.fill_style = FillStyle::Gradient(gradient);
    }

    /// Set the stroke style from a CSS color string.
    pub fn set_stroke_style(&mut self, style: &str) -> RasterResult<()> {
        self.state.stroke_style = FillStyle::Color(parse_color(style)?);
        Ok(())
    }

    pub fn set_stroke_color(&mut self, color: tiny_skia::Color) {
        self.state.stroke_style = FillStyle::Color(color);
    }

    pub fn set_stroke_gradient(&mut self, gradient: CanvasGradient) {
        self.state.stroke_style = FillStyle::Gradient(gradient);
    }

    /// Set the line width. Non-finite or non-positive widths are ignored.
    pub fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    /// Set the global alpha. Values outside `[0, 1]` are ignored.
    pub fn set_global_alpha(&mut self, alpha: f32) {
        if alpha.is_finite() && (0.0..=1.0).contains(&alpha) {
            self.state.global_alpha = alpha;
        }
    }

    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Set the line dash pattern.
    /// Ignored if any value is non-finite or negative; odd-length patterns
    /// are repeated to make them even.
    pub fn set_line_dash(&mut self, mut segments: Vec<f32>) {
        if segments.iter().any(|&v| !v.is_finite() || v < 0.0) {
            return;
        }
        if segments.len() % 2 != 0 {
            let copy = segments.clone();
            segments.extend(copy);
        }
        self.state.line_dash = segments;
    }

    pub fn line_dash(&self) -> &[f32] {
        &self.state.line_dash
    }

    pub fn set_line_dash_offset(&mut self, offset: f32) {
        if offset.is_finite() {
            self.state.line_dash_offset = offset;
        }
    }

    /// Set the shadow used by subsequent fills.
    pub fn set_shadow(&mut self, shadow: Shadow) {
        self.state.shadow = shadow;
    }

    /// Clear the shadow so later fills draw without one.
    pub fn clear_shadow(&mut self) {
        self.state.shadow = Shadow::default();
    }
}

/// Parse a CSS color string to a tiny-skia color.
pub(crate) fn parse_color(s: &str) -> RasterResult<tiny_skia::Color> {
    let color = csscolorparser::parse(s)
        .map_err(|e| RasterError::ColorParseError(format!("{}: {}", s, e)))?;
    let [r, g, b, a] = color.to_array();
    tiny_skia::Color::from_rgba(r, g, b, a)
        .ok_or_else(|| RasterError::ColorParseError(s.to_string()))
}
