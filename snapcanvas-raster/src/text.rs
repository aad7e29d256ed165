//! Text shaping and measurement using cosmic-text.

use crate::font::ParsedFont;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Family, FontSystem, Metrics, Shaping};

/// Metrics returned by `measure_text`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TextMetrics {
    /// Advance width of the text in pixels.
    pub width: f32,
    /// Distance from the baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from the baseline to the bottom of the line box.
    pub descent: f32,
}

/// Map a CSS family name to a cosmic-text family.
fn family_for(name: &str) -> Family<'_> {
    match name {
        "sans-serif" | "system-ui" => Family::SansSerif,
        "serif" => Family::Serif,
        "monospace" => Family::Monospace,
        "cursive" => Family::Cursive,
        "fantasy" => Family::Fantasy,
        other => Family::Name(other),
    }
}

/// Shape a single line of text with the given font.
///
/// The first family that the database knows is used; cosmic-text falls back
/// per glyph for anything it cannot cover. Returns `None` when no font faces
/// are loaded at all.
pub(crate) fn shape_line(
    font_system: &mut FontSystem,
    text: &str,
    font: &ParsedFont,
) -> Option<Buffer> {
    if font_system.db().len() == 0 {
        return None;
    }
    let metrics = Metrics::new(font.size_px, font.size_px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);
    // Unbounded width so the line never wraps
    buffer.set_size(font_system, None, None);

    let family = font
        .families
        .iter()
        .map(|f| family_for(f))
        .find(|family| match family {
            Family::Name(name) => font_system
                .db()
                .faces()
                .any(|face| face.families.iter().any(|(f, _)| f == name)),
            _ => true,
        })
        .unwrap_or(Family::SansSerif);

    let attrs = Attrs::new()
        .family(family)
        .weight(font.weight)
        .style(font.style)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    Some(buffer)
}

/// Measure a shaped line.
pub(crate) fn buffer_metrics(buffer: &Buffer, font: &ParsedFont) -> TextMetrics {
    let mut metrics = TextMetrics::default();
    for run in buffer.layout_runs() {
        metrics.width = metrics.width.max(run.line_w);
        metrics.ascent = metrics.ascent.max(run.line_y - run.line_top);
        metrics.descent = metrics
            .descent
            .max((run.line_top + run.line_height) - run.line_y);
    }
    if metrics.ascent == 0.0 && metrics.descent == 0.0 {
        metrics.ascent = font.size_px * 0.8;
        metrics.descent = font.size_px * 0.2;
    }
    metrics
}

/// Measure text without drawing it.
pub(crate) fn measure_text(
    font_system: &mut FontSystem,
    text: &str,
    font: &ParsedFont,
) -> TextMetrics {
    match shape_line(font_system, text, font) {
        Some(buffer) => buffer_metrics(&buffer, font),
        None => TextMetrics {
            width: 0.0,
            ascent: font.size_px * 0.8,
            descent: font.size_px * 0.2,
        },
    }
}

/// X offset for text alignment.
pub(crate) fn text_x_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Y offset from the anchor to the alphabetic baseline.
pub(crate) fn text_y_offset(ascent: f32, descent: f32, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => -descent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(TextAlign::Left, 0.0)]
    #[case(TextAlign::Center, -50.0)]
    #[case(TextAlign::Right, -100.0)]
    fn test_x_offset(#[case] align: TextAlign, #[case] expected: f32) {
        assert_eq!(text_x_offset(100.0, align), expected);
    }

    #[test]
    fn test_y_offset() {
        assert_eq!(text_y_offset(8.0, 2.0, TextBaseline::Top), 8.0);
        assert_eq!(text_y_offset(8.0, 2.0, TextBaseline::Middle), 3.0);
        assert_eq!(text_y_offset(8.0, 2.0, TextBaseline::Alphabetic), 0.0);
        assert_eq!(text_y_offset(8.0, 2.0, TextBaseline::Bottom), -2.0);
    }

    #[test]
    fn test_generic_families() {
        assert_eq!(family_for("serif"), Family::Serif);
        assert_eq!(family_for("Arial"), Family::Name("Arial"));
    }
}
