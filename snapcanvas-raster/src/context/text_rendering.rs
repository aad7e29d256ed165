//! Text rendering operations for RasterContext.

use super::RasterContext;
use crate::error::RasterResult;
use crate::font::{parse_font, ParsedFont};
use crate::style::{TextAlign, TextBaseline};
use crate::text::{buffer_metrics, shape_line, text_x_offset, text_y_offset, TextMetrics};
use cosmic_text::Command;

impl RasterContext {
    /// Set the font from a CSS font shorthand.
    pub fn set_font(&mut self, font: &str) -> RasterResult<()> {
        self.state.font = parse_font(font)?;
        Ok(())
    }

    pub fn font(&self) -> &ParsedFont {
        &self.state.font
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    /// Number of font faces available for text.
    pub fn font_face_count(&self) -> usize {
        self.font_system.db().len()
    }

    /// Measure text with the current font.
    pub fn measure_text(&mut self, text: &str) -> TextMetrics {
        crate::text::measure_text(&mut self.font_system, text, &self.state.font)
    }

    /// Fill a single line of text at (x, y) using the fill style.
    ///
    /// Glyphs are drawn as vector outlines so they follow the current
    /// transform exactly; the current shadow applies to them.
    pub fn fill_text(&mut self, text: &str, x: f32, y: f32) {
        log::debug!(target: "canvas", "fillText \"{}\" {} {}", text, x, y);
        if text.is_empty() {
            return;
        }
        let Some(buffer) = shape_line(&mut self.font_system, text, &self.state.font) else {
            log::warn!("no fonts loaded, skipping text");
            return;
        };
        let metrics = buffer_metrics(&buffer, &self.state.font);
        let base_x = x + text_x_offset(metrics.width, self.state.text_align);
        let base_y = y + text_y_offset(metrics.ascent, metrics.descent, self.state.text_baseline);

        // Collect every glyph outline into one path so shadows blur once
        let mut pb = tiny_skia::PathBuilder::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs.iter() {
                let physical = glyph.physical((base_x, base_y), 1.0);
                let gx = base_x + glyph.x + glyph.font_size * glyph.x_offset;
                let gy = base_y + glyph.y - glyph.font_size * glyph.y_offset;

                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, physical.cache_key)
                else {
                    continue;
                };
                // Font outlines are y-up
                for cmd in commands {
                    match cmd {
                        Command::MoveTo(p) => pb.move_to(gx + p.x, gy - p.y),
                        Command::LineTo(p) => pb.line_to(gx + p.x, gy - p.y),
                        Command::QuadTo(ctrl, end) => {
                            pb.quad_to(gx + ctrl.x, gy - ctrl.y, gx + end.x, gy - end.y)
                        }
                        Command::CurveTo(c1, c2, end) => pb.cubic_to(
                            gx + c1.x,
                            gy - c1.y,
                            gx + c2.x,
                            gy - c2.y,
                            gx + end.x,
                            gy - end.y,
                        ),
                        Command::Close => pb.close(),
                    }
                }
            }
        }

        if let Some(path) = pb.finish() {
            let transform = self.state.transform;
            self.fill_skia_path(&path, transform);
        }
    }
}
