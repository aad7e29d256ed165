//! Fill, stroke, clip, and shadow operations for RasterContext.

use super::RasterContext;
use crate::path::to_skia_path;
use crate::shadow::blur_rgba8_premul;
use crate::style::FillStyle;
use kurbo::BezPath;
use tiny_skia::{FillRule, Mask, Paint, Pixmap, PixmapPaint, Transform};

impl RasterContext {
    // --- Clipping ---

    /// Intersect the clip region with `path` under the current transform.
    ///
    /// An empty path clips everything away.
    pub fn clip_path(&mut self, path: &BezPath) {
        log::debug!(target: "canvas", "clip");
        let transform = self.state.transform;
        let Some(path) = to_skia_path(path) else {
            self.state.clip_mask = Mask::new(self.width, self.height);
            return;
        };
        match self.state.clip_mask.as_mut() {
            Some(mask) => mask.intersect_path(&path, FillRule::Winding, true, transform),
            None => {
                if let Some(mut mask) = Mask::new(self.width, self.height) {
                    mask.fill_path(&path, FillRule::Winding, true, transform);
                    self.state.clip_mask = Some(mask);
                }
            }
        }
    }

    // --- Drawing operations ---

    /// Fill `path` with the fill style, casting the current shadow if any.
    pub fn fill_path(&mut self, path: &BezPath) {
        log::debug!(target: "canvas", "fill");
        if let Some(path) = to_skia_path(path) {
            let transform = self.state.transform;
            self.fill_skia_path(&path, transform);
        }
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: kurbo::Rect) {
        log::debug!(target: "canvas", "fillRect {} {} {} {}", rect.x0, rect.y0, rect.width(), rect.height());
        let rect = rect.abs();
        if let Some(r) = tiny_skia::Rect::from_ltrb(
            rect.x0 as f32,
            rect.y0 as f32,
            rect.x1 as f32,
            rect.y1 as f32,
        ) {
            let path = tiny_skia::PathBuilder::from_rect(r);
            let transform = self.state.transform;
            self.fill_skia_path(&path, transform);
        }
    }

    /// Stroke `path` with the stroke style, line width and dash pattern.
    ///
    /// Strokes never cast shadows.
    pub fn stroke_path(&mut self, path: &BezPath) {
        log::debug!(target: "canvas", "stroke");
        let Some(path) = to_skia_path(path) else {
            return;
        };
        let stroke = tiny_skia::Stroke {
            width: self.state.line_width,
            dash: if self.state.line_dash.is_empty() {
                None
            } else {
                tiny_skia::StrokeDash::new(
                    self.state.line_dash.clone(),
                    self.state.line_dash_offset,
                )
            },
            ..Default::default()
        };
        let Some(paint) = self.make_paint(&self.state.stroke_style) else {
            return;
        };
        self.pixmap.stroke_path(
            &path,
            &paint,
            &stroke,
            self.state.transform,
            self.state.clip_mask.as_ref(),
        );
    }

    /// Fill a tiny-skia path with the current fill style.
    pub(crate) fn fill_skia_path(&mut self, path: &tiny_skia::Path, transform: Transform) {
        if self.state.shadow.is_visible() {
            if let Some(device) = path.clone().transform(transform) {
                self.draw_shadow(device.bounds(), |layer, shift, paint| {
                    layer.fill_path(
                        path,
                        paint,
                        FillRule::Winding,
                        transform.post_concat(shift),
                        None,
                    );
                });
            }
        }

        let Some(paint) = self.make_paint(&self.state.fill_style) else {
            return;
        };
        self.pixmap.fill_path(
            path,
            &paint,
            FillRule::Winding,
            transform,
            self.state.clip_mask.as_ref(),
        );
    }

    /// Render a shape's shadow.
    ///
    /// `draw` paints the shape in the shadow color onto a scratch layer; the
    /// `Transform` it receives maps device space onto that layer. The layer is
    /// blurred and composited at the shadow offset, under the current clip.
    fn draw_shadow(
        &mut self,
        device_bounds: tiny_skia::Rect,
        draw: impl FnOnce(&mut Pixmap, Transform, &Paint<'static>),
    ) {
        let shadow = self.state.shadow;
        let margin = shadow.margin() as f32 + 1.0;
        let left = (device_bounds.left() - margin).floor();
        let top = (device_bounds.top() - margin).floor();
        let width = (device_bounds.right() + margin).ceil() - left;
        let height = (device_bounds.bottom() + margin).ceil() - top;
        let max = super::MAX_DIMENSION as f32;
        if width <= 0.0 || height <= 0.0 || width > max || height > max {
            return;
        }
        let Some(mut layer) = Pixmap::new(width as u32, height as u32) else {
            return;
        };

        let mut color = shadow.color;
        color.apply_opacity(self.state.global_alpha);
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;

        draw(&mut layer, Transform::from_translate(-left, -top), &paint);
        blur_rgba8_premul(layer.data_mut(), width as u32, height as u32, shadow.sigma());

        log::debug!(target: "canvas", "shadow blur={} offset=({}, {})", shadow.blur, shadow.offset_x, shadow.offset_y);
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.as_ref(),
            &PixmapPaint::default(),
            Transform::from_translate(left + shadow.offset_x, top + shadow.offset_y),
            self.state.clip_mask.as_ref(),
        );
    }

    /// Build a paint for a fill style, applying global alpha.
    ///
    /// Returns `None` when the style paints nothing (e.g. a gradient
    /// without stops).
    pub(crate) fn make_paint(&self, style: &FillStyle) -> Option<Paint<'static>> {
        let mut paint = Paint {
            anti_alias: true,
            ..Default::default()
        };
        match style {
            FillStyle::Color(color) => {
                let mut c = *color;
                c.apply_opacity(self.state.global_alpha);
                paint.set_color(c);
            }
            FillStyle::Gradient(gradient) => {
                paint.shader = gradient.to_shader(self.state.global_alpha, Transform::identity())?;
            }
        }
        Some(paint)
    }
}
