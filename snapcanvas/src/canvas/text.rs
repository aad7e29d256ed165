//! Text content.

use super::Canvas;
use crate::css::{LengthPercent, Rgba};
use crate::element::{BoxRect, BoxSizing};
use crate::error::SnapResult;
use crate::surface::{DrawingSurface, Paint, TextAlign};
use crate::text::{self, layout_text, LayoutParams};
use kurbo::{BezPath, Point};

/// Decorations drawn over or under a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decoration {
    Underline,
    Overline,
    LineThrough,
}

fn decorations(value: &str) -> Vec<Decoration> {
    value
        .split_whitespace()
        .filter_map(|t| match t {
            "underline" => Some(Decoration::Underline),
            "overline" => Some(Decoration::Overline),
            "line-through" => Some(Decoration::LineThrough),
            _ => None,
        })
        .collect()
}

/// Alignment of `text-align` under `direction`.
fn text_align(value: &str, rtl: bool) -> TextAlign {
    match value.trim() {
        "center" => TextAlign::Center,
        "right" => TextAlign::Right,
        "end" if !rtl => TextAlign::Right,
        "start" if rtl => TextAlign::Right,
        "left" | "justify" | "start" | "end" => TextAlign::Left,
        _ if rtl => TextAlign::Right,
        _ => TextAlign::Left,
    }
}

/// Anchor of a line. `text-indent` sits on the start edge, the right edge
/// under rtl.
fn line_x(rect: &BoxRect, align: TextAlign, indent: f64, rtl: bool) -> f64 {
    let start_shift = if rtl { -indent } else { indent };
    match align {
        TextAlign::Left if rtl => rect.left,
        TextAlign::Left => rect.left + indent,
        TextAlign::Center => rect.left + rect.width / 2.0 + start_shift / 2.0,
        TextAlign::Right if rtl => rect.right - indent,
        TextAlign::Right => rect.right,
    }
}

impl<S: DrawingSurface> Canvas<S> {
    /// Lay out and draw `dataset.text`, or the icon glyph when the node
    /// carries no text.
    pub fn draw_text(&mut self) -> SnapResult<()> {
        let scale = self.config.device_scale();
        let calibration = self.config.text_metrics;
        let direction = self.config.text_direction;
        let word_boundaries = self.config.word_segmentation;
        let Some((element, surface)) = self.parts() else {
            return Ok(());
        };
        let dataset = element.dataset();
        let content = match (dataset.icon_char(), dataset.text.as_deref()) {
            (_, Some(text)) => text.to_string(),
            (Some(icon), None) => icon.to_string(),
            (None, None) => return Ok(()),
        };
        if content.is_empty() {
            return Ok(());
        }

        let style = element.style();
        let font_size = text::font_size(&style.font_size);
        let font = format!(
            "{} {} {}px {}",
            style.font_style, style.font_weight, font_size, style.font_family
        );
        if let Err(err) = surface.set_font(&font) {
            log::debug!("font {font:?} rejected ({err}), using sans-serif");
            surface.set_font(&format!("{font_size}px sans-serif"))?;
        }

        let rect = element.box_rect(BoxSizing::Content);
        let rtl = style.direction.trim() == "rtl";
        let align = text_align(&style.text_align, rtl);
        let indent = LengthPercent::parse(&style.text_indent).map_or(0.0, |v| v.resolve(rect.width));
        let params = LayoutParams {
            max_width: rect.width.ceil(),
            content_height: rect.height,
            line_height: text::line_height(
                &style.line_height,
                font_size,
                calibration.default_line_height,
            ),
            indent,
            ellipsis: style.text_overflow.trim() == "ellipsis",
            rtl,
            direction,
            word_boundaries,
        };
        let layout = layout_text(&content, &params, |s| surface.measure_text(s));
        log::debug!(
            "text {:?}: {} line(s) of {}",
            element.record().id,
            layout.lines.len(),
            layout.max_lines
        );

        let color = Rgba::parse(&style.color).unwrap_or(Rgba::BLACK);
        let paint = Paint::Solid(color);
        let shadow = *element.text_shadow();
        if let Some(shadow_color) = shadow.color.filter(|_| shadow.is_visible()) {
            surface.set_shadow(
                shadow_color,
                shadow.blur * scale,
                shadow.offset_x * scale,
                shadow.offset_y * scale,
            );
        }

        let line_height = layout.line_height;
        let baseline_shift = font_size * calibration.font_size_offset
            + if (line_height - font_size).abs() > f64::EPSILON {
                line_height * calibration.line_height_offset
            } else {
                0.0
            };
        let decoration_lines = decorations(&style.text_decoration_line);
        let decoration_paint = Paint::Solid(
            style
                .text_decoration_color
                .as_deref()
                .and_then(Rgba::parse)
                .unwrap_or(color),
        );
        let decoration_style = style.text_decoration_style.trim();
        let thickness = (font_size / 15.0).max(1.0);

        for (i, line) in layout.lines.iter().enumerate() {
            if line.is_empty() {
                continue;
            }
            let y = rect.top + i as f64 * line_height + baseline_shift;
            let x = line_x(&rect, align, if i == 0 { indent } else { 0.0 }, rtl);
            surface.fill_text(line, x, y, align, &paint);

            if decoration_lines.is_empty() {
                continue;
            }
            let width = surface.measure_text(line);
            let start = match align {
                TextAlign::Left => x,
                TextAlign::Center => x - width / 2.0,
                TextAlign::Right => x - width,
            };
            for decoration in &decoration_lines {
                let (offset, spread) = match decoration {
                    Decoration::Underline => (font_size * 0.9, 2.0),
                    Decoration::Overline => (thickness / 2.0, -2.0),
                    Decoration::LineThrough => (font_size * 0.55, 2.0),
                };
                let mut rows = vec![y + offset];
                if decoration_style == "double" {
                    rows.push(y + offset + spread * thickness);
                }
                match decoration_style {
                    "dashed" => surface.set_line_dash(&[thickness * 3.0, thickness * 3.0], 0.0),
                    "dotted" => surface.set_line_dash(&[thickness, thickness], 0.0),
                    _ => surface.set_line_dash(&[], 0.0),
                }
                for row in rows {
                    let mut path = BezPath::new();
                    path.move_to(Point::new(start, row));
                    path.line_to(Point::new(start + width, row));
                    surface.stroke(&path, &decoration_paint, thickness);
                }
            }
            surface.set_line_dash(&[], 0.0);
        }

        if shadow.is_visible() {
            surface.clear_shadow();
        }
        Ok(())
    }
}
